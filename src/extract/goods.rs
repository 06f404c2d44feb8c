//! NF-e / NFC-e extraction.
//!
//! Both goods schemas share the `infNFe` layout: `emit`/`dest` header
//! blocks plus one `det` element per product line. NFC-e differs from NF-e
//! only in consumer-facing fields this reader does not consume, so both run
//! through the same body tagged with their own kind.

use crate::core::numeric::reformat;
use crate::core::{DocumentKind, LineRecord};
use crate::xml::{Document, Element};

/// Known ICMS situation groups: `ICMS00`–`ICMS90` keyed by CST under the
/// general regime, `ICMSSN*` keyed by CSOSN under Simples Nacional.
/// An unknown group falls back to the first child of the `ICMS` block.
const ICMS_GROUPS: &[&str] = &[
    "ICMS00", "ICMS02", "ICMS10", "ICMS15", "ICMS20", "ICMS30", "ICMS40", "ICMS51", "ICMS53",
    "ICMS60", "ICMS61", "ICMS70", "ICMS90", "ICMSPart", "ICMSST", "ICMSSN101", "ICMSSN102",
    "ICMSSN201", "ICMSSN202", "ICMSSN500", "ICMSSN900",
];

/// Known PIS situation groups.
const PIS_GROUPS: &[&str] = &["PISAliq", "PISQtde", "PISNT", "PISOutr", "PISST"];

/// Known COFINS situation groups.
const COFINS_GROUPS: &[&str] = &["COFINSAliq", "COFINSQtde", "COFINSNT", "COFINSOutr", "COFINSST"];

/// Situation-code tags inside a group, in lookup order.
const SITUATION_TAGS: &[&str] = &["CST", "CSOSN"];

/// Extracts one record per `det` line from an NF-e.
pub fn extract_nfe(doc: &Document) -> Vec<LineRecord> {
    extract_goods(doc, DocumentKind::Nfe)
}

/// Extracts one record per `det` line from an NFC-e.
pub fn extract_nfce(doc: &Document) -> Vec<LineRecord> {
    extract_goods(doc, DocumentKind::Nfce)
}

fn extract_goods(doc: &Document, kind: DocumentKind) -> Vec<LineRecord> {
    let number = doc.first_text(&["nNF"]);
    let issuer_tax_id = doc.first_text(&["emit/CNPJ"]);
    let issuer_name = doc.first_text(&["emit/xNome"]);
    let issued_at = doc.first_text(&["dhEmi"]);
    let recipient_tax_id = doc.first_text(&["dest/CNPJ"]);
    let recipient_name = doc.first_text(&["dest/xNome"]);

    let mut records = Vec::new();
    for det in doc.select_all("det") {
        let prod = det.child("prod");
        let imposto = det.child("imposto");

        let (cst, icms) = tax_block(imposto, "ICMS", ICMS_GROUPS, "vICMS");
        let (cst_pis, pis) = tax_block(imposto, "PIS", PIS_GROUPS, "vPIS");
        let (cst_cofins, cofins) = tax_block(imposto, "COFINS", COFINS_GROUPS, "vCOFINS");

        records.push(LineRecord {
            kind,
            number: number.clone(),
            issuer_tax_id: issuer_tax_id.clone(),
            issuer_name: issuer_name.clone(),
            recipient_tax_id: recipient_tax_id.clone(),
            recipient_name: recipient_name.clone(),
            issued_at: issued_at.clone(),
            description: child_text(prod, "xProd"),
            ncm: child_text(prod, "NCM"),
            cfop: child_text(prod, "CFOP"),
            cst,
            quantity: reformat(amount_or_zero(prod, "qCom")),
            unit_price: reformat(amount_or_zero(prod, "vUnCom")),
            pis,
            cofins,
            icms,
            cst_pis,
            cst_cofins,
            service_value: None,
            iss_value: None,
        });
    }
    records
}

fn child_text(parent: Option<&Element>, name: &str) -> String {
    parent
        .and_then(|p| p.child(name))
        .map(|e| e.text().to_string())
        .unwrap_or_default()
}

/// Raw amount text of a child tag, `"0"` when the tag is absent or empty.
fn amount_or_zero<'a>(parent: Option<&'a Element>, name: &str) -> &'a str {
    parent
        .and_then(|p| p.child(name))
        .map(Element::text)
        .filter(|text| !text.is_empty())
        .unwrap_or("0")
}

/// Reads (situation code, formatted amount) from one tax block.
///
/// An absent block yields empty strings — not zeros — so that "no tax
/// information" stays distinguishable from "tax of zero". A present block
/// resolves its situation group by name against the known variants, falling
/// back to positional first-child access for groups introduced after this
/// list was written; a present block with a missing amount tag reads as a
/// formatted zero.
fn tax_block(
    imposto: Option<&Element>,
    block_name: &str,
    known_groups: &[&str],
    amount_tag: &str,
) -> (String, String) {
    let Some(block) = imposto.and_then(|i| i.child(block_name)) else {
        return (String::new(), String::new());
    };
    let group = known_groups
        .iter()
        .find_map(|name| block.child(name))
        .or_else(|| block.first_child());
    let Some(group) = group else {
        return (String::new(), reformat("0"));
    };

    let code = SITUATION_TAGS
        .iter()
        .find_map(|tag| group.child(tag))
        .map(|e| e.text().to_string())
        .unwrap_or_default();
    let raw = group
        .child(amount_tag)
        .map(Element::text)
        .filter(|text| !text.is_empty())
        .unwrap_or("0");
    (code, reformat(raw))
}
