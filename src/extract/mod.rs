//! Document classification and per-schema field extraction.
//!
//! Classification is a best-effort marker check, not validation: a document
//! with no recognizable marker is treated as an NF-e and extraction simply
//! yields whatever fields it can find, possibly none.

mod goods;
mod service;

pub use goods::{extract_nfce, extract_nfe};
pub use service::extract_nfse;

use crate::core::{DocumentKind, LineRecord};
use crate::xml::Document;

/// Marker elements identifying a service invoice. NFS-e has no national
/// schema; each municipal provider wraps the payload differently.
const NFSE_MARKERS: &[&str] = &[
    "NFSe",
    "Nfse",
    "CompNfse",
    "Rps",
    "GerarNfseResposta",
    "ConsultarNfseResposta",
    "xmlNfpse",
];

/// Determines the document family from type-specific marker elements,
/// in fixed priority order. Defaults to [`DocumentKind::Nfe`].
pub fn classify(doc: &Document) -> DocumentKind {
    if doc.select("NFe").is_some() {
        return DocumentKind::Nfe;
    }
    if doc.select("NFCe").is_some() {
        return DocumentKind::Nfce;
    }
    if NFSE_MARKERS.iter().any(|marker| doc.select(marker).is_some()) {
        return DocumentKind::Nfse;
    }
    DocumentKind::Nfe
}

/// Classifies the document and runs the matching extractor.
pub fn extract(doc: &Document) -> (DocumentKind, Vec<LineRecord>) {
    let kind = classify(doc);
    let records = match kind {
        DocumentKind::Nfe => extract_nfe(doc),
        DocumentKind::Nfce => extract_nfce(doc),
        DocumentKind::Nfse => extract_nfse(doc),
    };
    (kind, records)
}
