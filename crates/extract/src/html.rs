//! Tolerant HTML tree builder.
//!
//! Real-world corpus pages are rarely well formed, so the builder never fails:
//! unknown constructs degrade to text, stray end tags are ignored and open
//! elements are closed at end of input. It understands just enough of the
//! HTML parsing rules to keep paragraph structure intact:
//!
//! - comments, doctypes and processing instructions are skipped
//! - void elements (`br`, `img`, ...) never take children
//! - `script` and `style` bodies are kept verbatim as raw text
//! - a block start tag implicitly closes an open `p`
//! - `li`, `dd` and `dt` close a sibling item of the same list
//! - named and numeric character references are decoded in text and attributes
//! - nesting stops at `MAX_DEPTH` open elements; deeper start tags are
//!   dropped and their content joins the deepest open element

use std::borrow::Cow;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Elements whose start tag closes an open `p`.
const CLOSES_P: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "details", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hr", "li", "main", "menu", "nav", "ol", "p", "pre", "section", "table", "ul",
];

/// Open elements that stop the search for an implicitly closed element.
const SCOPE_BOUNDARIES: &[&str] = &[
    "applet", "button", "caption", "html", "marquee", "object", "table", "td", "template", "th",
];

const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// Block-level elements. Anything else is treated as inline content.
pub(crate) const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "dd", "details", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hr", "html", "li", "main", "nav", "ol", "p", "pre", "section", "table", "tbody",
    "td", "tfoot", "th", "thead", "tr", "ul",
];

pub(crate) const DOCUMENT: &str = "#document";

/// Deepest element nesting the builder produces, document root included.
pub(crate) const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Element {
    pub(crate) name: String,
    pub(crate) attrs: Vec<(String, String)>,
    pub(crate) children: Vec<Node>,
}

impl Element {
    fn new(name: impl Into<String>, attrs: Vec<(String, String)>) -> Self {
        Self {
            name: name.into(),
            attrs,
            children: Vec::new(),
        }
    }

    pub(crate) fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub(crate) fn is_block(&self) -> bool {
        BLOCK_ELEMENTS.contains(&self.name.as_str())
    }

    /// Concatenated text of every descendant text node, `br` as a newline.
    pub(crate) fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if self.name == "br" {
            out.push('\n');
            return;
        }
        let mut stack: Vec<&Node> = self.children.iter().rev().collect();
        while let Some(node) = stack.pop() {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Element(el) if el.name == "br" => out.push('\n'),
                Node::Element(el) => stack.extend(el.children.iter().rev()),
            }
        }
    }

    /// Number of characters of text that sit inside `a` elements.
    pub(crate) fn link_text_len(&self) -> usize {
        let mut total = 0;
        let mut stack = vec![self];
        while let Some(el) = stack.pop() {
            for child in &el.children {
                match child {
                    Node::Element(a) if a.name == "a" => total += a.text_content().chars().count(),
                    Node::Element(other) => stack.push(other),
                    Node::Text(_) => {}
                }
            }
        }
        total
    }

    /// Serializes this element and its subtree. The document root emits only
    /// its children.
    pub(crate) fn write_html(&self, out: &mut String) {
        if self.name == DOCUMENT {
            write_children(&self.children, out);
            return;
        }
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attrs {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            escape_into(value, true, out);
            out.push('"');
        }
        out.push('>');
        if VOID_ELEMENTS.contains(&self.name.as_str()) {
            return;
        }
        if RAW_TEXT_ELEMENTS.contains(&self.name.as_str()) {
            for child in &self.children {
                if let Node::Text(text) = child {
                    out.push_str(text);
                }
            }
        } else {
            write_children(&self.children, out);
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

pub(crate) fn write_children(children: &[Node], out: &mut String) {
    for child in children {
        match child {
            Node::Text(text) => escape_into(text, false, out),
            Node::Element(el) => el.write_html(out),
        }
    }
}

pub(crate) fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

/// Parses `input` into a tree rooted at a synthetic `#document` element.
pub(crate) fn parse(input: &str) -> Element {
    let mut builder = TreeBuilder::new();
    let mut rest = input;
    while !rest.is_empty() {
        match rest.find('<') {
            None => {
                builder.text(rest);
                break;
            }
            Some(pos) => {
                if pos > 0 {
                    builder.text(&rest[..pos]);
                }
                rest = builder.markup(&rest[pos..]);
            }
        }
    }
    builder.finish()
}

struct TreeBuilder {
    stack: Vec<Element>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            stack: vec![Element::new(DOCUMENT, Vec::new())],
        }
    }

    fn finish(mut self) -> Element {
        self.close_to(1);
        match self.stack.pop() {
            Some(root) => root,
            None => Element::new(DOCUMENT, Vec::new()),
        }
    }

    fn append(&mut self, node: Node) {
        let Some(top) = self.stack.last_mut() else {
            return;
        };
        match (top.children.last_mut(), node) {
            (Some(Node::Text(prev)), Node::Text(text)) => prev.push_str(&text),
            (_, node) => top.children.push(node),
        }
    }

    fn text(&mut self, raw: &str) {
        self.append(Node::Text(decode_entities(raw).into_owned()));
    }

    fn close_top(&mut self) {
        if self.stack.len() > 1 {
            if let Some(el) = self.stack.pop() {
                self.append(Node::Element(el));
            }
        }
    }

    fn close_to(&mut self, depth: usize) {
        while self.stack.len() > depth.max(1) {
            self.close_top();
        }
    }

    /// Index of the nearest open element named in `names`, searching down from
    /// the current node and giving up at a scope boundary or at `stop`.
    fn open_in_scope(&self, names: &[&str], stop: &[&str]) -> Option<usize> {
        for (idx, el) in self.stack.iter().enumerate().skip(1).rev() {
            let name = el.name.as_str();
            if names.contains(&name) {
                return Some(idx);
            }
            if SCOPE_BOUNDARIES.contains(&name) || stop.contains(&name) {
                return None;
            }
        }
        None
    }

    fn start_tag(&mut self, name: String, attrs: Vec<(String, String)>, self_closing: bool) {
        let tag = name.as_str();
        if CLOSES_P.contains(&tag) {
            if let Some(idx) = self.open_in_scope(&["p"], &[]) {
                self.close_to(idx);
            }
        }
        match tag {
            "li" => {
                if let Some(idx) = self.open_in_scope(&["li"], &["ul", "ol"]) {
                    self.close_to(idx);
                }
            }
            "dd" | "dt" => {
                if let Some(idx) = self.open_in_scope(&["dd", "dt"], &["dl"]) {
                    self.close_to(idx);
                }
            }
            _ if HEADINGS.contains(&tag) => {
                if self
                    .stack
                    .last()
                    .is_some_and(|top| HEADINGS.contains(&top.name.as_str()))
                {
                    self.close_top();
                }
            }
            _ => {}
        }

        let element = Element::new(name, attrs);
        if self_closing || VOID_ELEMENTS.contains(&element.name.as_str()) {
            self.append(Node::Element(element));
        } else if self.stack.len() < MAX_DEPTH {
            self.stack.push(element);
        }
    }

    fn end_tag(&mut self, name: &str) {
        let found = self
            .stack
            .iter()
            .enumerate()
            .skip(1)
            .rev()
            .find(|(_, el)| el.name == name)
            .map(|(idx, _)| idx);
        if let Some(idx) = found {
            self.close_to(idx);
        }
    }

    /// Consumes one markup construct at the start of `input` (which begins
    /// with `<`) and returns the remaining input.
    fn markup<'a>(&mut self, input: &'a str) -> &'a str {
        if let Some(body) = input.strip_prefix("<!--") {
            return match body.find("-->") {
                Some(end) => &body[end + 3..],
                None => "",
            };
        }
        if input.starts_with("<!") || input.starts_with("<?") {
            return skip_past(input, '>');
        }
        if let Some(body) = input.strip_prefix("</") {
            if body.starts_with(|c: char| c.is_ascii_alphabetic()) {
                let end = body
                    .find(|c: char| c.is_ascii_whitespace() || c == '>' || c == '/')
                    .unwrap_or(body.len());
                let name = body[..end].to_ascii_lowercase();
                self.end_tag(&name);
                return skip_past(body, '>');
            }
            return skip_past(body, '>');
        }
        if input[1..].starts_with(|c: char| c.is_ascii_alphabetic()) {
            let (name, attrs, self_closing, consumed) = parse_start_tag(input);
            let rest = &input[consumed..];
            if RAW_TEXT_ELEMENTS.contains(&name.as_str()) && !self_closing {
                let (body, rest) = split_raw_text(rest, &name);
                let mut element = Element::new(name, attrs);
                if !body.is_empty() {
                    element.children.push(Node::Text(body.to_string()));
                }
                self.append(Node::Element(element));
                return rest;
            }
            self.start_tag(name, attrs, self_closing);
            return rest;
        }
        self.append(Node::Text("<".to_string()));
        &input[1..]
    }
}

fn skip_past(input: &str, delim: char) -> &str {
    match input.find(delim) {
        Some(pos) => &input[pos + delim.len_utf8()..],
        None => "",
    }
}

/// Splits a raw-text element body from the rest of the input at the matching
/// (case-insensitive) end tag.
fn split_raw_text<'a>(input: &'a str, name: &str) -> (&'a str, &'a str) {
    let needle = format!("</{name}");
    let lowered = input.to_ascii_lowercase();
    match lowered.find(&needle) {
        Some(pos) => (&input[..pos], skip_past(&input[pos..], '>')),
        None => (input, ""),
    }
}

/// Parses `<name attr=value ...>` and returns the lowercase name, attributes,
/// the self-closing flag and the number of bytes consumed.
fn parse_start_tag(input: &str) -> (String, Vec<(String, String)>, bool, usize) {
    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut i = 1;
    while i < len && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' && bytes[i] != b'/' {
        i += 1;
    }
    let name = input[1..i].to_ascii_lowercase();
    let mut attrs = Vec::new();
    let mut self_closing = false;

    loop {
        while i < len && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= len {
            break;
        }
        match bytes[i] {
            b'>' => {
                i += 1;
                break;
            }
            b'/' => {
                self_closing = true;
                i += 1;
                continue;
            }
            b'=' => {
                i += 1;
                continue;
            }
            _ => self_closing = false,
        }

        let start = i;
        while i < len
            && !bytes[i].is_ascii_whitespace()
            && !matches!(bytes[i], b'>' | b'=' | b'/')
        {
            i += 1;
        }
        let key = input[start..i].to_ascii_lowercase();
        while i < len && bytes[i].is_ascii_whitespace() {
            i += 1;
        }

        let mut value = String::new();
        if i < len && bytes[i] == b'=' {
            i += 1;
            while i < len && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            if i < len && (bytes[i] == b'"' || bytes[i] == b'\'') {
                let quote = bytes[i];
                i += 1;
                let value_start = i;
                while i < len && bytes[i] != quote {
                    i += 1;
                }
                value = decode_entities(&input[value_start..i]).into_owned();
                if i < len {
                    i += 1;
                }
            } else {
                let value_start = i;
                while i < len && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                    i += 1;
                }
                value = decode_entities(&input[value_start..i]).into_owned();
            }
        }
        attrs.push((key, value));
    }

    (name, attrs, self_closing, i)
}

/// Decodes character references. Unknown references are kept verbatim.
pub(crate) fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let decoded = after
            .find(';')
            .filter(|&semi| semi > 0 && semi <= 32)
            .and_then(|semi| decode_reference(&after[..semi]).map(|ch| (ch, semi)));
        match decoded {
            Some((ch, semi)) => {
                out.push(ch);
                rest = &after[semi + 1..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn decode_reference(reference: &str) -> Option<char> {
    if let Some(numeric) = reference.strip_prefix('#') {
        let code = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => numeric.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }
    let ch = match reference {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "shy" => '\u{ad}',
        "ndash" => '\u{2013}',
        "mdash" => '\u{2014}',
        "lsquo" => '\u{2018}',
        "rsquo" => '\u{2019}',
        "sbquo" => '\u{201a}',
        "ldquo" => '\u{201c}',
        "rdquo" => '\u{201d}',
        "bdquo" => '\u{201e}',
        "laquo" => '\u{ab}',
        "raquo" => '\u{bb}',
        "hellip" => '\u{2026}',
        "copy" => '\u{a9}',
        "reg" => '\u{ae}',
        "trade" => '\u{2122}',
        "deg" => '\u{b0}',
        "middot" => '\u{b7}',
        "bull" => '\u{2022}',
        "times" => '\u{d7}',
        "euro" => '\u{20ac}',
        _ => return None,
    };
    Some(ch)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn child_names(el: &Element) -> Vec<&str> {
        el.children
            .iter()
            .filter_map(|c| match c {
                Node::Element(e) => Some(e.name.as_str()),
                Node::Text(_) => None,
            })
            .collect()
    }

    fn first_element(el: &Element) -> &Element {
        el.children
            .iter()
            .find_map(|c| match c {
                Node::Element(e) => Some(e),
                Node::Text(_) => None,
            })
            .expect("element child")
    }

    #[test]
    fn nested_structure_is_preserved() {
        let root = parse("<div class=\"a\"><p>One</p><p>Two <b>bold</b></p></div>");
        let div = first_element(&root);
        assert_eq!(div.name, "div");
        assert_eq!(div.attr("class"), Some("a"));
        assert_eq!(child_names(div), vec!["p", "p"]);
        assert_eq!(div.text_content(), "OneTwo bold");
    }

    #[test]
    fn unclosed_paragraphs_close_implicitly() {
        let root = parse("<p>first<p>second<div>third</div>");
        assert_eq!(child_names(&root), vec!["p", "p", "div"]);
    }

    #[test]
    fn list_items_close_siblings_but_not_nested_lists() {
        let root = parse("<ul><li>a<li>b<ul><li>c</ul></ul>");
        let ul = first_element(&root);
        assert_eq!(child_names(ul), vec!["li", "li"]);
        let Node::Element(second) = &ul.children[1] else {
            panic!("expected li");
        };
        assert_eq!(second.text_content(), "bc");
    }

    #[test]
    fn comments_doctype_and_scripts_skipped_from_text() {
        let root = parse(
            "<!DOCTYPE html><!-- note --><body><script>if (a < b) {}</script><p>x</p></body>",
        );
        let body = first_element(&root);
        assert_eq!(child_names(body), vec!["script", "p"]);
        let Node::Element(script) = &body.children[0] else {
            panic!("expected script");
        };
        assert_eq!(script.text_content(), "if (a < b) {}");
    }

    #[test]
    fn entities_decoded_in_text_and_attributes() {
        let root = parse("<p title=\"a &amp; b\">&laquo;Hi&raquo; &#1055;&#x440; &bogus; &</p>");
        let p = first_element(&root);
        assert_eq!(p.attr("title"), Some("a & b"));
        assert_eq!(p.text_content(), "\u{ab}Hi\u{bb} Пр &bogus; &");
    }

    #[test]
    fn void_and_self_closing_elements_take_no_children() {
        let root = parse("<p>a<br>b<img src=x.png/>c</p>");
        let p = first_element(&root);
        assert_eq!(p.text_content(), "a\nbc");
        assert_eq!(child_names(p), vec!["br", "img"]);
    }

    #[test]
    fn stray_markup_degrades_to_text() {
        let root = parse("a < b </nope> c");
        assert_eq!(root.text_content(), "a < b  c");
    }

    #[test]
    fn serialization_escapes_text() {
        let root = parse("<p class=q>1 &lt; 2</p>");
        let mut out = String::new();
        root.write_html(&mut out);
        assert_eq!(out, "<p class=\"q\">1 &lt; 2</p>");
    }

    fn depth(root: &Element) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(root, 1)];
        while let Some((el, level)) = stack.pop() {
            deepest = deepest.max(level);
            for child in &el.children {
                if let Node::Element(child) = child {
                    stack.push((child, level + 1));
                }
            }
        }
        deepest
    }

    #[test]
    fn runaway_nesting_is_flattened() {
        let raw = format!("<body>{}<p>Глубоко.</p>", "<span>".repeat(100_000));
        let root = parse(&raw);
        assert_eq!(depth(&root), MAX_DEPTH);
        assert_eq!(root.text_content(), "Глубоко.");
        assert_eq!(root.link_text_len(), 0);
    }

    #[test]
    fn cyrillic_text_survives_byte_scanning() {
        let root = parse("<h1>Заголовок</h1><p>Он шел домой.</p>");
        assert_eq!(child_names(&root), vec!["h1", "p"]);
        assert_eq!(root.text_content(), "ЗаголовокОн шел домой.");
    }
}
