use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use super::garment::{GarmentKind, Size};
use crate::utils::parse_timestamp;

/// Direction of a stock movement, applied batch-wide at submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementAction {
    #[serde(rename = "entrada")]
    Entry,
    #[serde(rename = "saida")]
    Exit,
}

impl MovementAction {
    pub fn wire_name(&self) -> &'static str {
        match self {
            MovementAction::Entry => "entrada",
            MovementAction::Exit => "saida",
        }
    }

    /// Display label, matching the navigation bar wording.
    pub fn label(&self) -> &'static str {
        match self {
            MovementAction::Entry => "Entrada",
            MovementAction::Exit => "Saída",
        }
    }

    /// History rows carry the action as a free string; unknown values get no
    /// direction-specific treatment.
    pub fn from_wire(raw: &str) -> Option<Self> {
        match raw {
            "entrada" => Some(MovementAction::Entry),
            "saida" => Some(MovementAction::Exit),
            _ => None,
        }
    }
}

/// Why a cart line (or the cart itself) cannot be submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("{0} requires a size")]
    MissingSize(GarmentKind),
    #[error("quantity must be at least 1")]
    ZeroQuantity,
    #[error("the cart is empty")]
    Empty,
}

/// One line of a movement batch as the user builds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovementItem {
    pub kind: GarmentKind,
    pub size: Option<Size>,
    pub quantity: u32,
}

impl MovementItem {
    /// Checked when the line is added and again before the batch goes out,
    /// so nothing invalid ever reaches the wire.
    pub fn validate(&self) -> Result<(), CartError> {
        if self.quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }
        if self.kind.requires_size() && self.size.is_none() {
            return Err(CartError::MissingSize(self.kind));
        }
        Ok(())
    }

    pub fn describe(&self) -> String {
        match self.size {
            Some(size) => format!("{} {} x{}", self.kind, size, self.quantity),
            None => format!("{} x{}", self.kind, self.quantity),
        }
    }
}

/// Validate a whole batch before submission.
pub fn validate_batch(items: &[MovementItem]) -> Result<(), CartError> {
    if items.is_empty() {
        return Err(CartError::Empty);
    }
    for item in items {
        item.validate()?;
    }
    Ok(())
}

/// Body of POST /api/movimentar.
#[derive(Debug, Serialize)]
pub struct MovementRequest {
    pub itens: Vec<MovementPayload>,
}

#[derive(Debug, Serialize)]
pub struct MovementPayload {
    #[serde(rename = "tipo")]
    pub kind: GarmentKind,
    #[serde(rename = "tamanho")]
    pub size: Option<Size>,
    #[serde(rename = "quantidade")]
    pub quantity: u32,
    #[serde(rename = "acao")]
    pub action: MovementAction,
}

impl MovementRequest {
    pub fn new(action: MovementAction, items: &[MovementItem]) -> Self {
        let itens = items
            .iter()
            .map(|item| MovementPayload {
                kind: item.kind,
                size: item.size,
                quantity: item.quantity,
                action,
            })
            .collect();
        MovementRequest { itens }
    }
}

/// Response of POST /api/movimentar.
#[derive(Debug, Clone, Deserialize)]
pub struct MovementReceipt {
    #[serde(default)]
    pub status: String,
    #[serde(rename = "ordem_id", default)]
    pub order_id: String,
    #[serde(rename = "mensagem", default)]
    pub messages: Vec<String>,
}

/// One row of GET /api/historico. Kind and size stay raw strings here:
/// rows predating the current vocabulary exist and must still display.
#[derive(Debug, Clone, Deserialize)]
pub struct MovementRecord {
    #[serde(rename = "ordem_id", default)]
    pub order_id: Option<String>,
    #[serde(rename = "usuario", default)]
    pub user: String,
    #[serde(rename = "tipo", default)]
    pub kind: String,
    #[serde(rename = "tamanho", default)]
    pub size: Option<String>,
    #[serde(rename = "quantidade", default)]
    pub quantity: i64,
    #[serde(rename = "acao", default)]
    pub action: String,
    #[serde(rename = "data", default)]
    pub date: Option<String>,
}

/// A submitted batch reassembled from its history rows.
#[derive(Debug, Clone)]
pub struct MovementOrder {
    pub order_id: String,
    pub user: String,
    pub action: String,
    pub date: Option<String>,
    pub items: Vec<OrderLine>,
}

#[derive(Debug, Clone)]
pub struct OrderLine {
    pub kind: String,
    pub size: Option<String>,
    pub quantity: i64,
}

impl MovementOrder {
    pub fn sort_key(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.date.as_deref().and_then(parse_timestamp)
    }
}

/// Collapse history rows into orders keyed by `ordem_id`, keeping the first
/// row's user/action/date as the order header, then sort newest first.
pub fn group_orders(records: Vec<MovementRecord>) -> Vec<MovementOrder> {
    let mut orders: Vec<MovementOrder> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        let key = record.order_id.clone().unwrap_or_default();
        let line = OrderLine {
            kind: record.kind,
            size: record.size,
            quantity: record.quantity,
        };
        match index.get(&key) {
            Some(&i) => orders[i].items.push(line),
            None => {
                index.insert(key.clone(), orders.len());
                orders.push(MovementOrder {
                    order_id: key,
                    user: record.user,
                    action: record.action,
                    date: record.date,
                    items: vec![line],
                });
            }
        }
    }

    orders.sort_by(|a, b| b.sort_key().cmp(&a.sort_key()));
    orders
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(kind: GarmentKind, size: Option<Size>, quantity: u32) -> MovementItem {
        MovementItem {
            kind,
            size,
            quantity,
        }
    }

    #[test]
    fn test_sized_kind_requires_size() {
        let line = item(GarmentKind::Coverall, None, 2);
        assert_eq!(
            line.validate(),
            Err(CartError::MissingSize(GarmentKind::Coverall))
        );
        let line = item(GarmentKind::Coverall, Some(Size::G), 2);
        assert_eq!(line.validate(), Ok(()));
    }

    #[test]
    fn test_unsized_kind_needs_no_size() {
        let line = item(GarmentKind::Wipes, None, 10);
        assert_eq!(line.validate(), Ok(()));
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let line = item(GarmentKind::Goggles, None, 0);
        assert_eq!(line.validate(), Err(CartError::ZeroQuantity));
    }

    #[test]
    fn test_batch_validation_catches_bad_line() {
        assert_eq!(validate_batch(&[]), Err(CartError::Empty));
        let items = vec![
            item(GarmentKind::Wipes, None, 1),
            item(GarmentKind::Boots, None, 3),
        ];
        assert_eq!(
            validate_batch(&items),
            Err(CartError::MissingSize(GarmentKind::Boots))
        );
    }

    #[test]
    fn test_request_serialization() {
        let items = vec![item(GarmentKind::Coverall, Some(Size::M), 2)];
        let request = MovementRequest::new(MovementAction::Exit, &items);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "itens": [
                    {"tipo": "Macacão", "tamanho": "M", "quantidade": 2, "acao": "saida"}
                ]
            })
        );
    }

    #[test]
    fn test_parse_receipt() {
        let json = r#"{
            "status": "ok",
            "ordem_id": "ORD-20250107-142530-a1b2",
            "mensagem": ["Entrada registrada: Macacão M +2"]
        }"#;
        let receipt: MovementReceipt = serde_json::from_str(json).unwrap();
        assert_eq!(receipt.order_id, "ORD-20250107-142530-a1b2");
        assert_eq!(receipt.messages.len(), 1);
    }

    #[test]
    fn test_group_orders_by_id_and_sort_desc() {
        let json = r#"[
            {"ordem_id": "ORD-A", "usuario": "ana", "tipo": "Macacão", "tamanho": "M",
             "quantidade": 2, "acao": "saida", "data": "2025-01-06T10:00:00+00:00"},
            {"ordem_id": "ORD-A", "usuario": "ana", "tipo": "Botas", "tamanho": "G",
             "quantidade": 1, "acao": "saida", "data": "2025-01-06T10:00:00+00:00"},
            {"ordem_id": "ORD-B", "usuario": "rui", "tipo": "Panos", "tamanho": null,
             "quantidade": 5, "acao": "entrada", "data": "2025-01-07T09:30:00+00:00"}
        ]"#;
        let records: Vec<MovementRecord> = serde_json::from_str(json).unwrap();
        let orders = group_orders(records);

        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].order_id, "ORD-B");
        assert_eq!(orders[1].order_id, "ORD-A");
        assert_eq!(orders[1].items.len(), 2);
        assert_eq!(orders[1].user, "ana");
    }

    #[test]
    fn test_group_orders_missing_date_sorts_last() {
        let json = r#"[
            {"ordem_id": "ORD-X", "usuario": "ana", "tipo": "Panos", "tamanho": null,
             "quantidade": 1, "acao": "entrada", "data": null},
            {"ordem_id": "ORD-Y", "usuario": "rui", "tipo": "Panos", "tamanho": null,
             "quantidade": 2, "acao": "entrada", "data": "2025-01-05T08:00:00+00:00"}
        ]"#;
        let records: Vec<MovementRecord> = serde_json::from_str(json).unwrap();
        let orders = group_orders(records);
        assert_eq!(orders[0].order_id, "ORD-Y");
        assert_eq!(orders[1].order_id, "ORD-X");
    }
}
