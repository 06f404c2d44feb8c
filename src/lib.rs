//! # notafiscal
//!
//! Reader and tax-reporting library for Brazilian electronic fiscal
//! documents: NF-e (goods), NFC-e (consumer goods), and NFS-e (municipal
//! services). The three schema families diverge widely — optional tags,
//! missing nodes, municipal NFS-e dialects with no national standard — and
//! this crate normalizes all of them into one line-item record shape, then
//! derives per-NCM tax summaries, monthly revenue, and gap reports over
//! each issuer's document-number sequence.
//!
//! All monetary values are accumulated as [`rust_decimal::Decimal`] — never
//! floating point. Record fields travel as pt-BR display strings
//! (`1.234,56`), mirroring the locale of the source documents, and are
//! parsed back to decimals at aggregation and export time.
//!
//! ## Quick start
//!
//! ```rust
//! let xml = r#"<nfeProc><NFe><infNFe>
//!   <ide><nNF>101</nNF><serie>1</serie><dhEmi>2024-06-15T10:00:00-03:00</dhEmi></ide>
//!   <emit><CNPJ>12345678000199</CNPJ><xNome>ACME Ltda</xNome></emit>
//!   <dest><CNPJ>98765432000188</CNPJ><xNome>Cliente SA</xNome></dest>
//!   <det nItem="1">
//!     <prod>
//!       <xProd>Parafuso</xProd><NCM>73181500</NCM><CFOP>5102</CFOP>
//!       <qCom>2.0000</qCom><vUnCom>10.50</vUnCom>
//!     </prod>
//!     <imposto><ICMS><ICMS00><CST>00</CST><vICMS>2.10</vICMS></ICMS00></ICMS></imposto>
//!   </det>
//! </infNFe></NFe></nfeProc>"#;
//!
//! let report = notafiscal::process_batch([xml]).unwrap();
//! assert_eq!(report.records.len(), 1);
//! assert_eq!(report.records[0].unit_price, "10,50");
//! assert_eq!(report.ncm_summaries[0].icms_share, "10.00");
//! assert_eq!(report.months, vec!["2024-06".to_string()]);
//! ```
//!
//! ## Fault tolerance
//!
//! Per-document faults never abort a batch: a document that is not
//! well-formed XML is logged and skipped, and absent fields degrade to
//! empty strings or formatted zeros. Only batch-level conditions (an empty
//! batch) surface as errors.

pub mod aggregate;
pub mod batch;
pub mod core;
pub mod export;
pub mod extract;
pub mod xml;

// Re-export the record model and pipeline entry point at the crate root.
pub use crate::batch::{is_supported_file, is_xml_file, process_batch};
pub use crate::core::*;
