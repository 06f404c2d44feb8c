use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The three Brazilian electronic fiscal document families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    /// NF-e — electronic goods invoice (model 55).
    Nfe,
    /// NFC-e — consumer-facing goods invoice (model 65).
    Nfce,
    /// NFS-e — municipal service invoice (no national schema).
    Nfse,
}

impl DocumentKind {
    /// Short label used in reports and exports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Nfe => "NFe",
            Self::Nfce => "NFCe",
            Self::Nfse => "NFSe",
        }
    }
}

/// One normalized product or service line extracted from a fiscal document.
///
/// Which optional fields are meaningful is determined by [`kind`]: the
/// service-only fields are `None` for goods documents, and the PIS/COFINS
/// situation codes are empty for most service documents.
///
/// Quantity, price, and tax amounts are pt-BR display strings (`1.234,56`);
/// use [`core::numeric`](crate::core::numeric) to get decimals back.
///
/// [`kind`]: LineRecord::kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineRecord {
    /// Document family this line was extracted from.
    pub kind: DocumentKind,
    /// `nNF` / `numeroAEDF` — issuer-assigned document number. Empty when
    /// absent; usually but not necessarily numeric.
    pub number: String,
    /// `emit/CNPJ` / `cnpjPrestador` — issuer tax id.
    pub issuer_tax_id: String,
    /// `emit/xNome` / `razaoSocialPrestador` — issuer legal name.
    pub issuer_name: String,
    /// `dest/CNPJ` / `identificacaoTomador` — recipient tax id.
    pub recipient_tax_id: String,
    /// `dest/xNome` / `razaoSocialTomador` — recipient legal name.
    pub recipient_name: String,
    /// `dhEmi` / `dataEmissao` — issue timestamp, kept in the source's own
    /// format. Only the date portion is consumed downstream.
    pub issued_at: String,
    /// `xProd` / `descricaoServico` — line description.
    pub description: String,
    /// `NCM` (goods) or `codigoCNAE` (services) — classification code.
    pub ncm: String,
    /// `CFOP` / `cfps` — operation nature code.
    pub cfop: String,
    /// ICMS situation code (`CST`, or `CSOSN` under Simples Nacional).
    pub cst: String,
    /// `qCom` — commercial quantity, display-formatted.
    pub quantity: String,
    /// `vUnCom` — unit price, display-formatted.
    pub unit_price: String,
    /// `vPIS` amount. Empty when the PIS block is absent and for service
    /// invoices, where it does not apply.
    pub pis: String,
    /// `vCOFINS` amount. Empty under the same rules as [`pis`](LineRecord::pis).
    pub cofins: String,
    /// `vICMS` amount. Empty when the ICMS block is absent; formatted zero
    /// for service invoices.
    pub icms: String,
    /// PIS situation code.
    pub cst_pis: String,
    /// COFINS situation code.
    pub cst_cofins: String,
    /// `valorTotalServicos` — whole-document service value. Service
    /// invoices only.
    pub service_value: Option<String>,
    /// `valorISSQN` — ISS tax on the service. Service invoices only.
    pub iss_value: Option<String>,
}

/// Batch totals for one NCM classification code.
///
/// Created on the code's first occurrence during a run, finalized once at
/// end of batch, immutable after.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NcmSummary {
    /// Classification code.
    pub ncm: String,
    /// Accumulated quantity.
    pub total_quantity: Decimal,
    /// Sum of quantity × unit price over every line with this code.
    pub total_value: Decimal,
    /// Accumulated PIS.
    pub total_pis: Decimal,
    /// Accumulated COFINS.
    pub total_cofins: Decimal,
    /// Accumulated ICMS.
    pub total_icms: Decimal,
    /// PIS as a percentage of `total_value`, two decimals. `"0.00"` when
    /// the total value is zero.
    pub pis_share: String,
    /// COFINS percentage, same convention.
    pub cofins_share: String,
    /// ICMS percentage, same convention.
    pub icms_share: String,
}

/// Revenue and tax totals for one `YYYY-MM` calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRevenue {
    /// Month key, `YYYY-MM`.
    pub month: String,
    /// Accumulated line value across every document issued in the month.
    pub total_revenue: Decimal,
    /// Accumulated ICMS.
    pub total_icms: Decimal,
    /// Accumulated PIS.
    pub total_pis: Decimal,
    /// Accumulated COFINS.
    pub total_cofins: Decimal,
}

/// Missing document numbers detected in one issuer's numbering run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceGap {
    /// Issuer tax id the run belongs to.
    pub issuer_tax_id: String,
    /// Numbering stream id. Always [`DEFAULT_SERIES`] for the schemas read
    /// here, which expose no usable series at tracking time.
    ///
    /// [`DEFAULT_SERIES`]: crate::aggregate::DEFAULT_SERIES
    pub series: String,
    /// Missing numbers, ascending.
    pub missing: Vec<String>,
}

/// Everything derived from one processing run.
///
/// All fields are batch-scoped value data, recomputed in full on every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Every extracted line record, in input order.
    pub records: Vec<LineRecord>,
    /// Per-NCM totals, sorted by code (lexicographic).
    pub ncm_summaries: Vec<NcmSummary>,
    /// Per-month totals, sorted by month.
    pub monthly_revenue: Vec<MonthlyRevenue>,
    /// Distinct classification codes seen, sorted. Filter population.
    pub ncm_codes: Vec<String>,
    /// Distinct `YYYY-MM` months seen, sorted.
    pub months: Vec<String>,
    /// Numbering gaps per (issuer, series).
    pub sequence_gaps: Vec<SequenceGap>,
    /// Issuer name of the first document that yielded records.
    pub subject_name: String,
    /// Issuer tax id of that same document.
    pub subject_tax_id: String,
}
