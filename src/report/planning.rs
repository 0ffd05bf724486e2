use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::models::PlanningData;

/// File name users already expect from the old exporter.
const CSV_FILE_NAME: &str = "Relatorio_Estoque.csv";

/// Semicolon-separated: these files open in spreadsheets configured for
/// pt-BR locales, where the comma is the decimal separator.
pub fn build_csv(data: &PlanningData) -> String {
    let mut out = String::from("Item;Saidas (30d);Estoque Atual\n");
    for mover in &data.slow_movers {
        out.push_str(&format!(
            "{};{};{}\n",
            mover.item, mover.exits_30d, mover.idle_stock
        ));
    }
    out
}

/// Printable planning report: the consumption averages and the slow-mover
/// table, with a generation date in the header.
pub fn build_report(data: &PlanningData, generated: NaiveDate) -> String {
    let mut out = String::new();
    out.push_str("Relatório de Planejamento Estratégico\n");
    out.push_str(&format!("Gerado em: {}\n\n", generated.format("%d/%m/%Y")));

    out.push_str("1. Dados de Consumo\n");
    let name_width = data
        .consumption
        .iter()
        .map(|p| p.name.chars().count())
        .chain(std::iter::once("Tipo".len()))
        .max()
        .unwrap_or(4);
    out.push_str(&format!(
        "{:<width$}  {}\n",
        "Tipo",
        "Média (unid/semana)",
        width = name_width
    ));
    for point in &data.consumption {
        out.push_str(&format!(
            "{:<width$}  {:.1}\n",
            point.name,
            point.total(),
            width = name_width
        ));
    }

    out.push_str("\n2. Itens com Baixa Movimentação\n");
    let item_width = data
        .slow_movers
        .iter()
        .map(|m| m.item.chars().count())
        .chain(std::iter::once("Item".len()))
        .max()
        .unwrap_or(4);
    out.push_str(&format!(
        "{:<width$}  {:>12}  {:>8}\n",
        "Item",
        "Saídas (30d)",
        "Estoque",
        width = item_width
    ));
    for mover in &data.slow_movers {
        out.push_str(&format!(
            "{:<width$}  {:>12}  {:>8}\n",
            mover.item,
            mover.exits_30d,
            mover.idle_stock,
            width = item_width
        ));
    }
    out
}

/// Where exports land: the user's download directory when there is one.
fn export_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Write the low-movement CSV, returning its path for the status line.
pub fn export_csv(data: &PlanningData) -> Result<PathBuf> {
    let path = export_dir().join(CSV_FILE_NAME);
    std::fs::write(&path, build_csv(data))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

/// Write the text report, returning its path for the status line.
pub fn export_report(data: &PlanningData) -> Result<PathBuf> {
    let generated = chrono::Local::now().date_naive();
    let file_name = format!("Relatorio_Planejamento_{}.txt", generated.format("%d-%m-%Y"));
    let path = export_dir().join(file_name);
    std::fs::write(&path, build_report(data, generated))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PlanningData {
        serde_json::from_str(
            r#"{
                "menos_movimentados": [
                    {"item": "Botas G4", "saidas_30d": 1, "estoque_parado": 18},
                    {"item": "Óculos", "saidas_30d": 3, "estoque_parado": 7}
                ],
                "grafico_consumo": [
                    {"name": "Macacão", "M": 12.5, "G": 7.0},
                    {"name": "Panos", "Padrão": 30.2}
                ],
                "lista_tamanhos": ["M", "G", "Padrão"]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_csv_format_is_exact() {
        let csv = build_csv(&sample());
        assert_eq!(
            csv,
            "Item;Saidas (30d);Estoque Atual\n\
             Botas G4;1;18\n\
             Óculos;3;7\n"
        );
    }

    #[test]
    fn test_csv_with_no_slow_movers_is_header_only() {
        let data: PlanningData = serde_json::from_str(
            r#"{"menos_movimentados": [], "grafico_consumo": [], "lista_tamanhos": []}"#,
        )
        .unwrap();
        assert_eq!(build_csv(&data), "Item;Saidas (30d);Estoque Atual\n");
    }

    #[test]
    fn test_report_sections_and_totals() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 7).unwrap();
        let report = build_report(&sample(), date);

        assert!(report.starts_with("Relatório de Planejamento Estratégico\n"));
        assert!(report.contains("Gerado em: 07/01/2025"));
        assert!(report.contains("1. Dados de Consumo"));
        // 12.5 + 7.0, one decimal place
        assert!(report.contains("19.5"));
        assert!(report.contains("2. Itens com Baixa Movimentação"));
        assert!(report.contains("Botas G4"));
    }
}
