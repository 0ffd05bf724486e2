use serde::Deserialize;

/// One row of GET /api/saldo. The server emits rows already sorted by its
/// fixed kind order and then size order, so display keeps received order.
#[derive(Debug, Clone, Deserialize)]
pub struct BalanceEntry {
    #[serde(rename = "tipo", default)]
    pub kind: String,
    #[serde(rename = "tamanho", default)]
    pub size: Option<String>,
    #[serde(rename = "saldo", default)]
    pub balance: i64,
}

/// Balance rows for a single garment kind.
#[derive(Debug, Clone)]
pub struct KindBalance {
    pub kind: String,
    pub entries: Vec<BalanceEntry>,
}

/// Group balance rows by kind, preserving the order rows arrived in.
pub fn group_by_kind(rows: Vec<BalanceEntry>) -> Vec<KindBalance> {
    let mut groups: Vec<KindBalance> = Vec::new();
    for row in rows {
        match groups.iter_mut().find(|g| g.kind == row.kind) {
            Some(group) => group.entries.push(row),
            None => groups.push(KindBalance {
                kind: row.kind.clone(),
                entries: vec![row],
            }),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_balance_rows() {
        let json = r#"[
            {"tipo": "Macacão", "tamanho": "M", "saldo": 12},
            {"tipo": "Macacão", "tamanho": "G", "saldo": 0},
            {"tipo": "Panos", "tamanho": null, "saldo": 40}
        ]"#;
        let rows: Vec<BalanceEntry> = serde_json::from_str(json).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].kind, "Macacão");
        assert_eq!(rows[2].size, None);
        assert_eq!(rows[2].balance, 40);
    }

    #[test]
    fn test_group_by_kind_preserves_order() {
        let json = r#"[
            {"tipo": "Macacão", "tamanho": "PP", "saldo": 1},
            {"tipo": "Macacão", "tamanho": "M", "saldo": 2},
            {"tipo": "Botas", "tamanho": "G", "saldo": 3},
            {"tipo": "Óculos", "tamanho": null, "saldo": 4}
        ]"#;
        let rows: Vec<BalanceEntry> = serde_json::from_str(json).unwrap();
        let groups = group_by_kind(rows);

        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].kind, "Macacão");
        assert_eq!(groups[0].entries.len(), 2);
        assert_eq!(groups[1].kind, "Botas");
        assert_eq!(groups[2].kind, "Óculos");
    }
}
