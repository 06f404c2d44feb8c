//! Owned XML tree with local-name selector lookup.
//!
//! Fiscal documents arrive with and without namespace prefixes depending on
//! the emitting software, so element names are reduced to their local part
//! at parse time and all lookups match local names only.
//!
//! Selector paths are `/`-separated name chains (`"emit/CNPJ"`): the first
//! segment matches any element in document order, each following segment a
//! direct child. [`Document::first_text`] layers the ordered-fallback rule
//! on top — first candidate path with non-empty text wins.

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::core::NotaError;

/// One element: local name, merged text content, child elements.
#[derive(Debug, Clone, Default)]
pub struct Element {
    name: String,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn new(name: String) -> Self {
        Self {
            name,
            text: String::new(),
            children: Vec::new(),
        }
    }

    /// Local element name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Direct text content, entity-unescaped, surrounding whitespace
    /// trimmed by the parser.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Child elements in document order.
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// First direct child with the given local name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// First direct child, whatever its name. Tax situation blocks are read
    /// this way when the group tag is not one of the known variants.
    pub fn first_child(&self) -> Option<&Element> {
        self.children.first()
    }

    /// First element matching `path` within this element (inclusive), in
    /// document order.
    pub fn select(&self, path: &str) -> Option<&Element> {
        let segments: Vec<&str> = path.split('/').collect();
        find_first(self, &segments)
    }

    /// Every element matching `path` within this element (inclusive), in
    /// document order.
    pub fn select_all(&self, path: &str) -> Vec<&Element> {
        let segments: Vec<&str> = path.split('/').collect();
        let mut out = Vec::new();
        find_all(self, &segments, &mut out);
        out
    }

    /// Text of the first match of `path`, if any.
    pub fn text_at(&self, path: &str) -> Option<&str> {
        self.select(path).map(Element::text)
    }

    /// Ordered-fallback lookup: the first candidate path yielding non-empty
    /// text wins; empty string when none does.
    pub fn first_text(&self, candidates: &[&str]) -> String {
        candidates
            .iter()
            .filter_map(|path| self.text_at(path))
            .find(|text| !text.is_empty())
            .map(str::to_string)
            .unwrap_or_default()
    }
}

/// A parsed document; selector lookups include the root element itself.
#[derive(Debug, Clone)]
pub struct Document {
    root: Element,
}

impl Document {
    /// Parses XML text into an owned tree.
    ///
    /// Mismatched or unclosed tags and inputs without a root element yield
    /// [`NotaError::Xml`]. When stray content follows the root element the
    /// first root is kept, matching lenient browser parsers.
    pub fn parse(xml: &str) -> Result<Self, NotaError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        // stack[0] is a synthetic document node collecting top-level elements.
        let mut stack: Vec<Element> = vec![Element::new(String::new())];
        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => {
                    stack.push(Element::new(local_name(e.local_name().as_ref())));
                }
                Ok(Event::Empty(ref e)) => {
                    let element = Element::new(local_name(e.local_name().as_ref()));
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(element);
                    }
                }
                Ok(Event::Text(ref e)) => {
                    let text = e.unescape().unwrap_or_default();
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(&text);
                    }
                }
                Ok(Event::CData(ref e)) => {
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(std::str::from_utf8(e).unwrap_or(""));
                    }
                }
                Ok(Event::End(_)) => {
                    let done = match stack.pop() {
                        Some(element) => element,
                        None => return Err(NotaError::Xml("unbalanced element nesting".into())),
                    };
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(done),
                        None => return Err(NotaError::Xml("unbalanced element nesting".into())),
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(NotaError::Xml(e.to_string())),
                _ => {}
            }
        }

        if stack.len() != 1 {
            return Err(NotaError::Xml("unclosed element at end of input".into()));
        }
        let mut document_node = stack.pop().unwrap_or_default();
        if document_node.children.is_empty() {
            return Err(NotaError::Xml("no root element".into()));
        }
        Ok(Self {
            root: document_node.children.remove(0),
        })
    }

    /// The root element.
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// See [`Element::select`].
    pub fn select(&self, path: &str) -> Option<&Element> {
        self.root.select(path)
    }

    /// See [`Element::select_all`].
    pub fn select_all(&self, path: &str) -> Vec<&Element> {
        self.root.select_all(path)
    }

    /// See [`Element::text_at`].
    pub fn text_at(&self, path: &str) -> Option<&str> {
        self.root.text_at(path)
    }

    /// See [`Element::first_text`].
    pub fn first_text(&self, candidates: &[&str]) -> String {
        self.root.first_text(candidates)
    }
}

fn local_name(raw: &[u8]) -> String {
    std::str::from_utf8(raw).unwrap_or("").to_string()
}

/// Depth-first search for the first element whose name matches the head
/// segment and whose children complete the remaining chain.
fn find_first<'a>(element: &'a Element, segments: &[&str]) -> Option<&'a Element> {
    if element.name == segments[0] {
        if let Some(hit) = complete_chain(element, segments) {
            return Some(hit);
        }
    }
    for child in &element.children {
        if let Some(hit) = find_first(child, segments) {
            return Some(hit);
        }
    }
    None
}

fn complete_chain<'a>(element: &'a Element, segments: &[&str]) -> Option<&'a Element> {
    if segments.len() == 1 {
        return Some(element);
    }
    for child in &element.children {
        if child.name == segments[1] {
            if let Some(hit) = complete_chain(child, &segments[1..]) {
                return Some(hit);
            }
        }
    }
    None
}

fn find_all<'a>(element: &'a Element, segments: &[&str], out: &mut Vec<&'a Element>) {
    if element.name == segments[0] {
        collect_chain(element, segments, out);
    }
    for child in &element.children {
        find_all(child, segments, out);
    }
}

fn collect_chain<'a>(element: &'a Element, segments: &[&str], out: &mut Vec<&'a Element>) {
    if segments.len() == 1 {
        out.push(element);
        return;
    }
    for child in &element.children {
        if child.name == segments[1] {
            collect_chain(child, &segments[1..], out);
        }
    }
}
