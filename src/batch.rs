//! Batch orchestration: classify, extract, aggregate, and track numbering
//! across a set of decoded XML documents.

use log::{debug, warn};

use crate::aggregate::{Aggregator, DEFAULT_SERIES, SequenceTracker};
use crate::core::{BatchReport, NotaError};
use crate::extract;
use crate::xml::Document;

/// Runs the full pipeline over decoded XML texts, strictly in input order.
///
/// Order is observable: the first document that yields records names the
/// batch subject. Each document is isolated — one that fails to parse is
/// logged and skipped without aborting the batch, and a document yielding
/// no line items contributes nothing.
///
/// Returns [`NotaError::EmptyBatch`] when `documents` is empty; that is the
/// only batch-level failure.
pub fn process_batch<I>(documents: I) -> Result<BatchReport, NotaError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut aggregator = Aggregator::new();
    let mut tracker = SequenceTracker::new();
    let mut records = Vec::new();
    let mut subject: Option<(String, String)> = None;
    let mut seen_any = false;

    for (index, text) in documents.into_iter().enumerate() {
        seen_any = true;
        let doc = match Document::parse(text.as_ref()) {
            Ok(doc) => doc,
            Err(err) => {
                warn!("document {index}: {err}; skipping");
                continue;
            }
        };

        let (kind, extracted) = extract::extract(&doc);
        let Some(first) = extracted.first() else {
            debug!("document {index}: no line items in {}; skipping", kind.label());
            continue;
        };

        if subject.is_none() {
            subject = Some((first.issuer_name.clone(), first.issuer_tax_id.clone()));
        }

        // One sequence observation per document, from its first line.
        if !first.number.is_empty() && !first.issuer_tax_id.is_empty() {
            tracker.record(&first.issuer_tax_id, DEFAULT_SERIES, &first.number);
        }

        for record in &extracted {
            aggregator.add_record(record);
        }
        records.extend(extracted);
    }

    if !seen_any {
        return Err(NotaError::EmptyBatch);
    }

    let totals = aggregator.finalize();
    let (subject_name, subject_tax_id) = subject.unwrap_or_default();

    Ok(BatchReport {
        records,
        ncm_summaries: totals.ncm_summaries,
        monthly_revenue: totals.monthly_revenue,
        ncm_codes: totals.ncm_codes,
        months: totals.months,
        sequence_gaps: tracker.finalize(),
        subject_name,
        subject_tax_id,
    })
}

/// Intake acceptance: `.xml` and `.zip` members, case-insensitive. Archive
/// unpacking itself is the caller's concern — the pipeline only consumes
/// decoded XML text.
pub fn is_supported_file(name: &str) -> bool {
    is_xml_file(name) || has_extension(name, ".zip")
}

/// True for `.xml` members, case-insensitive.
pub fn is_xml_file(name: &str) -> bool {
    has_extension(name, ".xml")
}

fn has_extension(name: &str, extension: &str) -> bool {
    let (name, extension) = (name.as_bytes(), extension.as_bytes());
    name.len() >= extension.len()
        && name[name.len() - extension.len()..].eq_ignore_ascii_case(extension)
}
