//! Columnar export surface for spreadsheet rendering.
//!
//! The column set is fixed and stable regardless of batch composition —
//! service-only columns are present (and empty) for goods batches. The five
//! numeric columns carry true numbers parsed back from the records' display
//! strings; everything else is text.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::core::LineRecord;
use crate::core::numeric::try_parse_amount;

/// Export column order. Headers use the accounting terms consumers of the
/// spreadsheet expect; the order matches [`LineRecord`]'s field order.
pub const COLUMNS: &[&str] = &[
    "numero",
    "cnpjEmitente",
    "nomeEmitente",
    "dataEmissao",
    "cnpjDestinatario",
    "nomeDestinatario",
    "produto",
    "ncm",
    "cfop",
    "cst",
    "quantidade",
    "valorUnitario",
    "pis",
    "cofins",
    "icms",
    "cstPis",
    "cstCofins",
    "tipoDocumento",
    "valorServico",
    "valorIss",
];

/// One export cell: text, or a true number for the numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Number(Decimal),
    Text(String),
}

/// Maps records to rows in [`COLUMNS`] order.
///
/// The numeric columns (`quantidade`, `valorUnitario`, `pis`, `cofins`,
/// `icms`) parse their display strings; a field that does not parse stays
/// textual, so service lines keep their empty PIS/COFINS cells.
pub fn rows(records: &[LineRecord]) -> Vec<Vec<Cell>> {
    records.iter().map(row).collect()
}

fn row(record: &LineRecord) -> Vec<Cell> {
    vec![
        Cell::Text(record.number.clone()),
        Cell::Text(record.issuer_tax_id.clone()),
        Cell::Text(record.issuer_name.clone()),
        Cell::Text(record.issued_at.clone()),
        Cell::Text(record.recipient_tax_id.clone()),
        Cell::Text(record.recipient_name.clone()),
        Cell::Text(record.description.clone()),
        Cell::Text(record.ncm.clone()),
        Cell::Text(record.cfop.clone()),
        Cell::Text(record.cst.clone()),
        numeric_cell(&record.quantity),
        numeric_cell(&record.unit_price),
        numeric_cell(&record.pis),
        numeric_cell(&record.cofins),
        numeric_cell(&record.icms),
        Cell::Text(record.cst_pis.clone()),
        Cell::Text(record.cst_cofins.clone()),
        Cell::Text(record.kind.label().to_string()),
        Cell::Text(record.service_value.clone().unwrap_or_default()),
        Cell::Text(record.iss_value.clone().unwrap_or_default()),
    ]
}

fn numeric_cell(display: &str) -> Cell {
    match try_parse_amount(display) {
        Some(value) => Cell::Number(value),
        None => Cell::Text(display.to_string()),
    }
}

/// Renders records as semicolon-separated CSV: a header row, quoted text
/// fields, comma-decimal numbers.
pub fn to_csv(records: &[LineRecord]) -> String {
    let mut out = String::new();
    for (i, column) in COLUMNS.iter().enumerate() {
        if i > 0 {
            out.push(';');
        }
        csv_field_str(&mut out, column);
    }
    out.push_str("\r\n");

    for cells in rows(records) {
        for (i, cell) in cells.iter().enumerate() {
            if i > 0 {
                out.push(';');
            }
            match cell {
                Cell::Number(value) => csv_field_decimal(&mut out, *value),
                Cell::Text(text) => csv_field_str(&mut out, text),
            }
        }
        out.push_str("\r\n");
    }
    out
}

fn csv_field_str(out: &mut String, value: &str) {
    out.push('"');
    // Escape internal double quotes
    for ch in value.chars() {
        if ch == '"' {
            out.push_str("\"\"");
        } else {
            out.push(ch);
        }
    }
    out.push('"');
}

fn csv_field_decimal(out: &mut String, value: Decimal) {
    let scaled = value.round_dp(2);
    let s = format!("{:.2}", scaled);
    out.push_str(&s.replace('.', ","));
}

/// File stem for a batch report: the subject name folded to `[a-z0-9_]`
/// (Portuguese accents mapped to their base letters) plus a
/// `YYYY_MM_DD_HH_MM` stamp.
pub fn report_basename(subject: &str, at: NaiveDateTime) -> String {
    let mut folded = String::with_capacity(subject.len());
    for ch in subject.chars() {
        match fold_char(ch) {
            Some(mapped) => folded.push(mapped),
            None => {
                if !folded.is_empty() && !folded.ends_with('_') {
                    folded.push('_');
                }
            }
        }
    }
    let folded = folded.trim_matches('_');
    let name = if folded.is_empty() { "emitente" } else { folded };
    format!("relatorio_documentos_{}_{}", name, at.format("%Y_%m_%d_%H_%M"))
}

/// Maps a character to its folded form, or `None` for separators and
/// anything else that is dropped to a single underscore.
fn fold_char(ch: char) -> Option<char> {
    let folded = match ch.to_lowercase().next().unwrap_or(ch) {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        other => other,
    };
    if folded.is_ascii_alphanumeric() {
        Some(folded)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use crate::core::DocumentKind;

    fn sample_record() -> LineRecord {
        LineRecord {
            kind: DocumentKind::Nfe,
            number: "101".into(),
            issuer_tax_id: "12345678000199".into(),
            issuer_name: "ACME Ltda".into(),
            recipient_tax_id: "98765432000188".into(),
            recipient_name: "Cliente SA".into(),
            issued_at: "2024-06-15T10:00:00-03:00".into(),
            description: "Parafuso \"zincado\"".into(),
            ncm: "73181500".into(),
            cfop: "5102".into(),
            cst: "00".into(),
            quantity: "2,00".into(),
            unit_price: "1.050,00".into(),
            pis: "".into(),
            cofins: "".into(),
            icms: "2,10".into(),
            cst_pis: "".into(),
            cst_cofins: "".into(),
            service_value: None,
            iss_value: None,
        }
    }

    #[test]
    fn columns_and_row_width_agree() {
        let rows = rows(&[sample_record()]);
        assert_eq!(COLUMNS.len(), 20);
        assert_eq!(rows[0].len(), COLUMNS.len());
    }

    #[test]
    fn numeric_columns_carry_parsed_numbers() {
        let rows = rows(&[sample_record()]);
        assert_eq!(rows[0][10], Cell::Number(dec!(2)));
        assert_eq!(rows[0][11], Cell::Number(dec!(1050)));
        assert_eq!(rows[0][14], Cell::Number(dec!(2.10)));
        // Empty PIS stays textual, not zero.
        assert_eq!(rows[0][12], Cell::Text(String::new()));
    }

    #[test]
    fn csv_quotes_and_comma_decimals() {
        let csv = to_csv(&[sample_record()]);
        let mut lines = csv.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("\"numero\";\"cnpjEmitente\""));
        let row = lines.next().unwrap();
        assert!(row.contains("\"Parafuso \"\"zincado\"\"\""));
        assert!(row.contains(";2,00;"));
        assert!(row.contains(";1050,00;"));
        assert!(row.contains("\"NFe\""));
    }

    #[test]
    fn report_basename_folds_subject() {
        let at = NaiveDate::from_ymd_opt(2024, 6, 15)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        assert_eq!(
            report_basename("Padaria São João Ltda.", at),
            "relatorio_documentos_padaria_sao_joao_ltda_2024_06_15_14_30"
        );
        assert_eq!(
            report_basename("", at),
            "relatorio_documentos_emitente_2024_06_15_14_30"
        );
    }
}
