use serde::Deserialize;
use std::collections::BTreeMap;

/// GET /api/dashboard/resumo - the month-to-date movement picture.
#[derive(Debug, Clone, Deserialize)]
pub struct MonthlySummary {
    #[serde(rename = "mes_referencia", default)]
    pub reference_month: String,
    #[serde(rename = "entradas", default)]
    pub entries: i64,
    #[serde(rename = "saidas", default)]
    pub exits: i64,
    #[serde(rename = "balanco_liquido", default)]
    pub net_balance: i64,
    #[serde(rename = "ranking_saidas", default)]
    pub outflow_ranking: Vec<RankedOutflow>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RankedOutflow {
    #[serde(default)]
    pub item: String,
    #[serde(rename = "qtd", default)]
    pub quantity: i64,
}

/// GET /api/dashboard/planejamento.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanningData {
    #[serde(rename = "menos_movimentados", default)]
    pub slow_movers: Vec<SlowMover>,
    #[serde(rename = "grafico_consumo", default)]
    pub consumption: Vec<ConsumptionPoint>,
    #[serde(rename = "lista_tamanhos", default)]
    pub size_labels: Vec<String>,
}

/// Items with little outflow over the trailing 30 days.
#[derive(Debug, Clone, Deserialize)]
pub struct SlowMover {
    #[serde(default)]
    pub item: String,
    #[serde(rename = "saidas_30d", default)]
    pub exits_30d: i64,
    #[serde(rename = "estoque_parado", default)]
    pub idle_stock: i64,
}

/// One chart group: a garment kind plus its weekly-average consumption per
/// size. The size keys vary per response, hence the flattened map.
#[derive(Debug, Clone, Deserialize)]
pub struct ConsumptionPoint {
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub series: BTreeMap<String, f64>,
}

impl ConsumptionPoint {
    /// Weekly average across all sizes, the figure the printed report shows.
    pub fn total(&self) -> f64 {
        self.series.values().sum()
    }

    pub fn value_for(&self, label: &str) -> f64 {
        self.series.get(label).copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_monthly_summary() {
        let json = r#"{
            "mes_referencia": "1/2025",
            "entradas": 120,
            "saidas": 85,
            "balanco_liquido": 35,
            "ranking_saidas": [
                {"item": "Macacão M", "qtd": 30},
                {"item": "Panos", "qtd": 25}
            ]
        }"#;
        let summary: MonthlySummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.reference_month, "1/2025");
        assert_eq!(summary.net_balance, 35);
        assert_eq!(summary.outflow_ranking[0].item, "Macacão M");
        assert_eq!(summary.outflow_ranking[1].quantity, 25);
    }

    #[test]
    fn test_parse_planning_data() {
        // previsao_dias ships empty from the backend and is not modelled
        let json = r#"{
            "menos_movimentados": [
                {"item": "Botas G4", "saidas_30d": 1, "estoque_parado": 18}
            ],
            "previsao_dias": [],
            "grafico_consumo": [
                {"name": "Macacão", "M": 12.5, "G": 7, "Padrão": 0},
                {"name": "Panos", "Padrão": 30.2}
            ],
            "lista_tamanhos": ["M", "G", "Padrão"]
        }"#;
        let planning: PlanningData = serde_json::from_str(json).unwrap();

        assert_eq!(planning.slow_movers.len(), 1);
        assert_eq!(planning.slow_movers[0].idle_stock, 18);
        assert_eq!(planning.size_labels.len(), 3);

        let coverall = &planning.consumption[0];
        assert_eq!(coverall.name, "Macacão");
        assert_eq!(coverall.value_for("M"), 12.5);
        assert_eq!(coverall.value_for("G"), 7.0);
        assert_eq!(coverall.value_for("GG"), 0.0);
        assert!((coverall.total() - 19.5).abs() < f64::EPSILON);
    }
}
