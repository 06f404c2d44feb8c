//! End-to-end pipeline tests over inline XML fixtures.

use notafiscal::{DocumentKind, NotaError, process_batch};
use rust_decimal_macros::dec;

/// Minimal NF-e with a single product line.
fn nfe(number: &str, cnpj: &str, name: &str, issued_at: &str, ncm: &str, item: &str) -> String {
    format!(
        "<nfeProc><NFe><infNFe>\
         <ide><nNF>{number}</nNF><serie>1</serie><dhEmi>{issued_at}</dhEmi></ide>\
         <emit><CNPJ>{cnpj}</CNPJ><xNome>{name}</xNome></emit>\
         <dest><CNPJ>98765432000188</CNPJ><xNome>Cliente SA</xNome></dest>\
         <det nItem=\"1\"><prod>\
           <xProd>Produto</xProd><NCM>{ncm}</NCM><CFOP>5102</CFOP>\
           {item}\
         </prod><imposto>\
           <ICMS><ICMS00><orig>0</orig><CST>00</CST><vICMS>2.10</vICMS></ICMS00></ICMS>\
           <PIS><PISAliq><CST>01</CST><vPIS>0.14</vPIS></PISAliq></PIS>\
           <COFINS><COFINSAliq><CST>01</CST><vCOFINS>0.63</vCOFINS></COFINSAliq></COFINS>\
         </imposto></det>\
         </infNFe></NFe></nfeProc>"
    )
}

fn simple_nfe(number: &str) -> String {
    nfe(
        number,
        "12345678000199",
        "ACME Ltda",
        "2024-06-15T10:00:00-03:00",
        "1234.56.78",
        "<qCom>2.0000</qCom><vUnCom>10.50</vUnCom>",
    )
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

#[test]
fn end_to_end_single_goods_document() {
    let report = process_batch([simple_nfe("101")]).unwrap();

    assert_eq!(report.records.len(), 1);
    let record = &report.records[0];
    assert_eq!(record.kind, DocumentKind::Nfe);
    assert_eq!(record.quantity, "2,00");
    assert_eq!(record.unit_price, "10,50");
    assert_eq!(record.icms, "2,10");

    assert_eq!(report.ncm_summaries.len(), 1);
    let summary = &report.ncm_summaries[0];
    assert_eq!(summary.ncm, "1234.56.78");
    assert_eq!(summary.total_value, dec!(21.00));
    assert_eq!(summary.icms_share, "10.00");

    assert_eq!(report.ncm_codes, ["1234.56.78"]);
    assert_eq!(report.months, ["2024-06"]);
    assert_eq!(report.monthly_revenue.len(), 1);
    assert_eq!(report.monthly_revenue[0].month, "2024-06");
    assert_eq!(report.monthly_revenue[0].total_revenue, dec!(21.00));
    assert_eq!(report.monthly_revenue[0].total_icms, dec!(2.10));
}

#[test]
fn records_without_timestamp_excluded_from_monthly_view() {
    let dated = simple_nfe("1");
    let undated = nfe(
        "2",
        "12345678000199",
        "ACME Ltda",
        "",
        "1234.56.78",
        "<qCom>1.0000</qCom><vUnCom>5.00</vUnCom>",
    );
    let report = process_batch([dated, undated]).unwrap();

    assert_eq!(report.records.len(), 2);
    assert_eq!(report.months, ["2024-06"]);
    assert_eq!(report.monthly_revenue.len(), 1);
    // The undated document still reaches the NCM view.
    assert_eq!(report.ncm_summaries[0].total_value, dec!(26.00));
}

#[test]
fn multiple_months_sorted() {
    let january = nfe(
        "1",
        "111",
        "A",
        "2024-01-10T08:00:00",
        "100",
        "<qCom>1.0000</qCom><vUnCom>10.00</vUnCom>",
    );
    let june = nfe(
        "2",
        "111",
        "A",
        "2024-06-15T10:00:00",
        "100",
        "<qCom>1.0000</qCom><vUnCom>20.00</vUnCom>",
    );
    let report = process_batch([june, january]).unwrap();

    assert_eq!(report.months, ["2024-01", "2024-06"]);
    assert_eq!(report.monthly_revenue[0].total_revenue, dec!(10));
    assert_eq!(report.monthly_revenue[1].total_revenue, dec!(20));
}

// ---------------------------------------------------------------------------
// Fault isolation
// ---------------------------------------------------------------------------

#[test]
fn malformed_document_does_not_abort_batch() {
    let batch = [
        simple_nfe("1"),
        "<NFe><infNFe><broken".to_string(),
        simple_nfe("3"),
    ];
    let report = process_batch(batch).unwrap();

    assert_eq!(report.records.len(), 2);
    let numbers: Vec<&str> = report.records.iter().map(|r| r.number.as_str()).collect();
    assert_eq!(numbers, ["1", "3"]);
}

#[test]
fn empty_batch_is_an_error() {
    let documents: [&str; 0] = [];
    assert!(matches!(
        process_batch(documents),
        Err(NotaError::EmptyBatch)
    ));
}

#[test]
fn batch_of_only_unusable_documents_yields_empty_report() {
    let report = process_batch(["<vazio/>", "not xml at all"]).unwrap();
    assert!(report.records.is_empty());
    assert!(report.ncm_summaries.is_empty());
    assert_eq!(report.subject_name, "");
    assert_eq!(report.subject_tax_id, "");
}

// ---------------------------------------------------------------------------
// Batch subject
// ---------------------------------------------------------------------------

#[test]
fn first_extractable_document_names_the_subject() {
    let batch = [
        "<NFe><infNFe><ide><nNF>9</nNF></ide></infNFe></NFe>".to_string(), // no lines
        nfe(
            "10",
            "11111111000111",
            "Primeira Ltda",
            "2024-06-01T00:00:00",
            "100",
            "<qCom>1.0000</qCom><vUnCom>1.00</vUnCom>",
        ),
        nfe(
            "11",
            "22222222000122",
            "Segunda Ltda",
            "2024-06-02T00:00:00",
            "100",
            "<qCom>1.0000</qCom><vUnCom>1.00</vUnCom>",
        ),
    ];
    let report = process_batch(batch).unwrap();

    assert_eq!(report.subject_name, "Primeira Ltda");
    assert_eq!(report.subject_tax_id, "11111111000111");
}

// ---------------------------------------------------------------------------
// Sequence gaps
// ---------------------------------------------------------------------------

#[test]
fn numbering_gaps_detected_across_batch() {
    let batch: Vec<String> = ["100", "101", "103", "104", "107"]
        .iter()
        .map(|n| simple_nfe(n))
        .collect();
    let report = process_batch(batch).unwrap();

    assert_eq!(report.sequence_gaps.len(), 1);
    let gap = &report.sequence_gaps[0];
    assert_eq!(gap.issuer_tax_id, "12345678000199");
    assert_eq!(gap.series, "1");
    assert_eq!(gap.missing, ["102", "105", "106"]);
}

#[test]
fn multi_line_document_counts_once_for_sequencing() {
    let two_lines = "<NFe><infNFe>\
        <ide><nNF>5</nNF><dhEmi>2024-06-01T00:00:00</dhEmi></ide>\
        <emit><CNPJ>111</CNPJ><xNome>A</xNome></emit>\
        <det><prod><xProd>P1</xProd><NCM>100</NCM><qCom>1.0</qCom><vUnCom>1.00</vUnCom></prod></det>\
        <det><prod><xProd>P2</xProd><NCM>100</NCM><qCom>1.0</qCom><vUnCom>1.00</vUnCom></prod></det>\
        </infNFe></NFe>";
    let seven = "<NFe><infNFe>\
        <ide><nNF>7</nNF><dhEmi>2024-06-01T00:00:00</dhEmi></ide>\
        <emit><CNPJ>111</CNPJ><xNome>A</xNome></emit>\
        <det><prod><xProd>P</xProd><NCM>100</NCM><qCom>1.0</qCom><vUnCom>1.00</vUnCom></prod></det>\
        </infNFe></NFe>";
    let report = process_batch([two_lines, seven]).unwrap();

    // Two records from document 5, but only one sequence observation:
    // the gap is exactly {6}.
    assert_eq!(report.records.len(), 3);
    assert_eq!(report.sequence_gaps.len(), 1);
    assert_eq!(report.sequence_gaps[0].missing, ["6"]);
}

#[test]
fn contiguous_numbering_reports_no_gaps() {
    let batch: Vec<String> = ["200", "201", "202"].iter().map(|n| simple_nfe(n)).collect();
    let report = process_batch(batch).unwrap();
    assert!(report.sequence_gaps.is_empty());
}

// ---------------------------------------------------------------------------
// Mixed document families
// ---------------------------------------------------------------------------

#[test]
fn mixed_goods_and_service_batch() {
    let nfse = "<xmlNfpse>\
        <numeroAEDF>900</numeroAEDF>\
        <cnpjPrestador>33333333000133</cnpjPrestador>\
        <razaoSocialPrestador>Oficina de Software</razaoSocialPrestador>\
        <dataEmissao>2024-06-20T11:00:00</dataEmissao>\
        <valorTotalServicos>1000.00</valorTotalServicos>\
        <valorISSQN>50.00</valorISSQN>\
        </xmlNfpse>";
    let report = process_batch([simple_nfe("101"), nfse.to_string()]).unwrap();

    assert_eq!(report.records.len(), 2);
    assert_eq!(report.records[0].kind, DocumentKind::Nfe);
    assert_eq!(report.records[1].kind, DocumentKind::Nfse);
    assert_eq!(report.records[1].service_value.as_deref(), Some("1.000,00"));

    // The synthetic service line (1 × 1000,00) joins June's revenue.
    assert_eq!(report.monthly_revenue.len(), 1);
    assert_eq!(report.monthly_revenue[0].total_revenue, dec!(1021.00));

    // The service record has no classification code, so the NCM view only
    // contains the goods line.
    assert_eq!(report.ncm_codes, ["1234.56.78"]);
}
