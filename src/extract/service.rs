//! NFS-e extraction.
//!
//! Service invoices have no national schema, so every header field carries
//! an ordered candidate list covering the dialects seen in production: the
//! Florianópolis `xmlNfpse` layout (camel-case tags), ABRASF
//! `CompNfse`/`PrestadorServico` trees, the short `Prestador`/`Tomador`
//! variant, and NF-e-style tags as a last resort. The first candidate with
//! a non-empty value wins.

use crate::core::numeric::reformat;
use crate::core::{DocumentKind, LineRecord};
use crate::xml::{Document, Element};

const NUMBER: &[&str] = &["numeroAEDF", "Numero", "nNF"];
const ISSUER_TAX_ID: &[&str] = &[
    "cnpjPrestador",
    "PrestadorServico/IdentificacaoPrestador/Cnpj",
    "Prestador/Cnpj",
    "emit/CNPJ",
];
const ISSUER_NAME: &[&str] = &[
    "razaoSocialPrestador",
    "PrestadorServico/RazaoSocial",
    "Prestador/RazaoSocial",
    "emit/xNome",
];
const ISSUED_AT: &[&str] = &["dataEmissao", "DataEmissao", "dhEmi"];
const RECIPIENT_TAX_ID: &[&str] = &[
    "identificacaoTomador",
    "TomadorServico/IdentificacaoTomador/Cnpj",
    "Tomador/Cnpj",
    "dest/CNPJ",
];
const RECIPIENT_NAME: &[&str] = &[
    "razaoSocialTomador",
    "TomadorServico/RazaoSocial",
    "Tomador/RazaoSocial",
    "dest/xNome",
];
const SERVICE_VALUE: &[&str] = &["valorTotalServicos", "ValorServicos"];
const ISS_VALUE: &[&str] = &["valorISSQN", "ValorIss"];
const OPERATION_CODE: &[&str] = &["cfps", "Cfop"];

const ITEMS: &[&str] = &[
    "itensServico/itemServico",
    "ItensServico/ItemServico",
    "Servico/ItemServico",
];
const ITEM_DESCRIPTION: &[&str] = &["descricaoServico", "Descricao"];
const ITEM_CODE: &[&str] = &["codigoCNAE", "CodigoServico"];
const ITEM_QUANTITY: &[&str] = &["quantidade", "Quantidade"];
const ITEM_UNIT_PRICE: &[&str] = &["valorUnitario", "ValorUnitario"];

/// Extracts one record per service item; a document with no itemized lines
/// yields exactly one synthetic record covering the whole document.
pub fn extract_nfse(doc: &Document) -> Vec<LineRecord> {
    let number = doc.first_text(NUMBER);
    let issuer_tax_id = doc.first_text(ISSUER_TAX_ID);
    let issuer_name = doc.first_text(ISSUER_NAME);
    let issued_at = doc.first_text(ISSUED_AT);
    let recipient_tax_id = doc.first_text(RECIPIENT_TAX_ID);
    let recipient_name = doc.first_text(RECIPIENT_NAME);
    let cfop = doc.first_text(OPERATION_CODE);

    let service_value_raw = non_empty_or(doc.first_text(SERVICE_VALUE), "0");
    let iss_value_raw = non_empty_or(doc.first_text(ISS_VALUE), "0");
    let service_value = reformat(&service_value_raw);
    let iss_value = reformat(&iss_value_raw);

    // ICMS does not apply to services; PIS/COFINS stay empty because the
    // municipal schemas do not itemize them.
    let base = LineRecord {
        kind: DocumentKind::Nfse,
        number,
        issuer_tax_id,
        issuer_name,
        recipient_tax_id,
        recipient_name,
        issued_at,
        description: String::new(),
        ncm: String::new(),
        cfop,
        cst: String::new(),
        quantity: String::new(),
        unit_price: String::new(),
        pis: String::new(),
        cofins: String::new(),
        icms: reformat("0"),
        cst_pis: String::new(),
        cst_cofins: String::new(),
        service_value: Some(service_value),
        iss_value: Some(iss_value),
    };

    let items = service_items(doc);
    if items.is_empty() {
        return vec![LineRecord {
            description: "Serviço".to_string(),
            quantity: reformat("1"),
            unit_price: reformat(&service_value_raw),
            ..base
        }];
    }

    items
        .into_iter()
        .map(|item| LineRecord {
            description: item.first_text(ITEM_DESCRIPTION),
            ncm: item.first_text(ITEM_CODE),
            quantity: reformat(&non_empty_or(item.first_text(ITEM_QUANTITY), "1")),
            unit_price: reformat(&non_empty_or(
                item.first_text(ITEM_UNIT_PRICE),
                &service_value_raw,
            )),
            ..base.clone()
        })
        .collect()
}

/// Item elements under the first dialect spelling that matches any.
fn service_items<'a>(doc: &'a Document) -> Vec<&'a Element> {
    ITEMS
        .iter()
        .map(|path| doc.select_all(path))
        .find(|items| !items.is_empty())
        .unwrap_or_default()
}

fn non_empty_or(value: String, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value
    }
}
