use serde::{Deserialize, Serialize};

/// Garment kinds handled by the inventory. Wire values are the Portuguese
/// names the backend stores, so the serde renames are the source of truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GarmentKind {
    #[serde(rename = "Macacão")]
    Coverall,
    #[serde(rename = "Botas")]
    Boots,
    #[serde(rename = "Panos")]
    Wipes,
    #[serde(rename = "Óculos")]
    Goggles,
}

impl GarmentKind {
    pub const ALL: [GarmentKind; 4] = [
        GarmentKind::Coverall,
        GarmentKind::Boots,
        GarmentKind::Wipes,
        GarmentKind::Goggles,
    ];

    /// Coveralls and boots are stocked per size; wipes and goggles are not.
    pub fn requires_size(&self) -> bool {
        matches!(self, GarmentKind::Coverall | GarmentKind::Boots)
    }

    pub fn wire_name(&self) -> &'static str {
        match self {
            GarmentKind::Coverall => "Macacão",
            GarmentKind::Boots => "Botas",
            GarmentKind::Wipes => "Panos",
            GarmentKind::Goggles => "Óculos",
        }
    }
}

impl std::fmt::Display for GarmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.wire_name())
    }
}

/// Size grades in rack order. Variant names match the wire strings exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Size {
    PP,
    P,
    M,
    G,
    GG,
    G3,
    G4,
}

impl Size {
    pub const ALL: [Size; 7] = [
        Size::PP,
        Size::P,
        Size::M,
        Size::G,
        Size::GG,
        Size::G3,
        Size::G4,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Size::PP => "PP",
            Size::P => "P",
            Size::M => "M",
            Size::G => "G",
            Size::GG => "GG",
            Size::G3 => "G3",
            Size::G4 => "G4",
        }
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Label shown for unsized rows. Matches what the planning endpoint emits
/// in `lista_tamanhos`.
pub const DEFAULT_SIZE_LABEL: &str = "Padrão";

/// Older rows carry `null` or `"-"` where a size was never recorded.
pub fn display_size(size: Option<&str>) -> &str {
    match size {
        Some(s) if !s.is_empty() && s != "-" => s,
        _ => DEFAULT_SIZE_LABEL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_wire_names() {
        let json = serde_json::to_string(&GarmentKind::Coverall).unwrap();
        assert_eq!(json, "\"Macacão\"");
        let kind: GarmentKind = serde_json::from_str("\"Óculos\"").unwrap();
        assert_eq!(kind, GarmentKind::Goggles);
    }

    #[test]
    fn test_sized_kinds() {
        assert!(GarmentKind::Coverall.requires_size());
        assert!(GarmentKind::Boots.requires_size());
        assert!(!GarmentKind::Wipes.requires_size());
        assert!(!GarmentKind::Goggles.requires_size());
    }

    #[test]
    fn test_size_wire_names() {
        let json = serde_json::to_string(&Size::GG).unwrap();
        assert_eq!(json, "\"GG\"");
        let size: Size = serde_json::from_str("\"PP\"").unwrap();
        assert_eq!(size, Size::PP);
    }

    #[test]
    fn test_display_size_fallbacks() {
        assert_eq!(display_size(Some("M")), "M");
        assert_eq!(display_size(Some("-")), "Padrão");
        assert_eq!(display_size(Some("")), "Padrão");
        assert_eq!(display_size(None), "Padrão");
    }
}
