//! Main-content detection.
//!
//! Boilerplate elements are dropped first, then every text block long enough
//! to matter adds a content score to its parent (and half of it to its
//! grandparent). The best container, minus its link density, wins; siblings
//! that score close to it or read like prose are kept alongside it. When no
//! block qualifies the whole body is the main content.

use std::collections::BTreeMap;
use std::fmt;

use tracing::trace;

use crate::config::ExtractConfig;
use crate::error::ExtractError;
use crate::html::{self, escape_into, Element, Node};
use crate::whitespace::collapse_whitespace;

/// Elements that never carry main content.
const DROP_TAGS: &[&str] = &[
    "aside", "button", "embed", "footer", "form", "head", "iframe", "input", "link", "meta",
    "nav", "noscript", "object", "script", "select", "style", "svg", "textarea", "title",
];

/// class/id fragments that mark an element as boilerplate...
const UNLIKELY_HINTS: &[&str] = &[
    "ad-break", "agegate", "banner", "breadcrumb", "combx", "comment", "community", "cookie",
    "disqus", "extra", "foot", "header", "menu", "nav", "pager", "pagination", "popup",
    "remark", "rss", "share", "shoutbox", "sidebar", "social", "sponsor",
];

/// ...unless one of these fragments is present too.
const MAYBE_HINTS: &[&str] = &["and", "article", "body", "column", "content", "main", "shadow"];

const NEGATIVE_HINTS: &[&str] = &[
    "combx", "comment", "contact", "foot", "footer", "footnote", "masthead", "media", "meta",
    "outbrain", "promo", "related", "scroll", "shoutbox", "sidebar", "sponsor", "shopping",
    "tags", "tool", "widget",
];

const POSITIVE_HINTS: &[&str] = &[
    "article", "blog", "body", "content", "entry", "hentry", "main", "page", "post", "story",
    "text",
];

const SCORABLE: &[&str] = &["li", "p", "pre", "td"];

/// HTML markup reduced to the main-content region of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedHtml(String);

impl CleanedHtml {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CleanedHtml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CleanedHtml {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

pub(crate) fn clean(raw: &str, cfg: &ExtractConfig) -> Result<CleanedHtml, ExtractError> {
    let mut root = html::parse(raw);
    if !has_text(&root) {
        return Err(ExtractError::Unparseable("document contains no text".into()));
    }
    strip_boilerplate(&mut root);
    if !has_text(&root) {
        return Err(ExtractError::Unparseable(
            "no main-content region outside boilerplate".into(),
        ));
    }

    let fallback = find_path(&root, "body")
        .or_else(|| find_path(&root, "html"))
        .unwrap_or_default();
    let scores = score_candidates(&root, cfg);

    let mut best: Option<(&Vec<usize>, f64)> = None;
    for (path, score) in &scores {
        if best.map_or(true, |(_, top)| *score > top) {
            best = Some((path, *score));
        }
    }

    let mut out = String::from("<div>");
    match best {
        Some((path, score)) if !fallback.starts_with(path) => {
            trace!(depth = path.len(), score, candidates = scores.len(), "clean_candidate");
            write_with_siblings(&root, path, score, &scores, cfg, &mut out);
        }
        _ => {
            trace!(candidates = scores.len(), "clean_fallback");
            if let Some(container) = element_at(&root, &fallback) {
                write_wrapped_children(container, &mut out);
            }
        }
    }
    out.push_str("</div>");
    Ok(CleanedHtml(out))
}

fn write_with_siblings(
    root: &Element,
    best: &[usize],
    best_score: f64,
    scores: &BTreeMap<Vec<usize>, f64>,
    cfg: &ExtractConfig,
    out: &mut String,
) {
    let Some((_, parent_path)) = best.split_last() else {
        write_wrapped_children(root, out);
        return;
    };
    let Some(parent) = element_at(root, parent_path) else {
        return;
    };
    let threshold = (best_score * cfg.sibling_threshold).max(10.0);

    for (idx, child) in parent.children.iter().enumerate() {
        let Node::Element(el) = child else {
            continue;
        };
        let mut path = parent_path.to_vec();
        path.push(idx);
        if path == best {
            write_wrapped_children(el, out);
            continue;
        }
        let scored = scores.get(&path).is_some_and(|s| *s >= threshold);
        if scored || (el.name == "p" && reads_like_prose(el)) {
            el.write_html(out);
        }
    }
}

/// Writes the children of `container`, wrapping each run of loose text and
/// inline elements in its own `p` so it survives paragraph extraction.
fn write_wrapped_children(container: &Element, out: &mut String) {
    let mut run = String::new();
    let mut run_has_text = false;
    for child in &container.children {
        match child {
            Node::Element(el) if el.is_block() => {
                flush_run(&mut run, &mut run_has_text, out);
                el.write_html(out);
            }
            Node::Element(el) => {
                run_has_text |= has_text(el);
                el.write_html(&mut run);
            }
            Node::Text(text) => {
                run_has_text |= !text.trim().is_empty();
                escape_into(text, false, &mut run);
            }
        }
    }
    flush_run(&mut run, &mut run_has_text, out);
}

fn flush_run(run: &mut String, has_text: &mut bool, out: &mut String) {
    if *has_text {
        out.push_str("<p>");
        out.push_str(run);
        out.push_str("</p>");
    }
    run.clear();
    *has_text = false;
}

fn score_candidates(root: &Element, cfg: &ExtractConfig) -> BTreeMap<Vec<usize>, f64> {
    let blocks = collect_scorable(root);

    let mut scores: BTreeMap<Vec<usize>, f64> = BTreeMap::new();
    for path in blocks {
        let Some(block) = element_at(root, &path) else {
            continue;
        };
        let text = collapse_whitespace(&block.text_content());
        let len = text.chars().count();
        if len < cfg.min_paragraph_chars {
            continue;
        }
        let commas = text.chars().filter(|c| matches!(c, ',' | '\u{ff0c}' | '\u{3001}')).count();
        let content = 1.0 + commas as f64 + (len as f64 / 100.0).min(3.0);

        for (levels_up, weight) in [(1usize, 1.0f64), (2, 0.5)] {
            if path.len() < levels_up {
                break;
            }
            let ancestor = path[..path.len() - levels_up].to_vec();
            let initial = element_at(root, &ancestor).map_or(0.0, initial_score);
            *scores.entry(ancestor).or_insert(initial) += content * weight;
        }
    }

    for (path, score) in scores.iter_mut() {
        if let Some(el) = element_at(root, path) {
            *score *= 1.0 - link_density(el);
        }
    }
    scores
}

/// Paths of scorable blocks in document order.
fn collect_scorable(root: &Element) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    let mut stack = vec![(root, Vec::new())];
    while let Some((el, path)) = stack.pop() {
        for (idx, child) in el.children.iter().enumerate().rev() {
            if let Node::Element(child) = child {
                let mut child_path = path.clone();
                child_path.push(idx);
                stack.push((child, child_path));
            }
        }
        if !path.is_empty() && SCORABLE.contains(&el.name.as_str()) {
            out.push(path);
        }
    }
    out
}

fn initial_score(el: &Element) -> f64 {
    let tag = match el.name.as_str() {
        "div" | "article" => 5.0,
        "pre" | "td" | "blockquote" => 3.0,
        "address" | "ol" | "ul" | "dl" | "dd" | "dt" | "li" | "form" => -3.0,
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "th" => -5.0,
        _ => 0.0,
    };
    tag + hint_weight(el)
}

fn hint_weight(el: &Element) -> f64 {
    let mut weight = 0.0;
    for attr in ["class", "id"] {
        let Some(value) = el.attr(attr) else {
            continue;
        };
        let value = value.to_lowercase();
        if NEGATIVE_HINTS.iter().any(|h| value.contains(h)) {
            weight -= 25.0;
        }
        if POSITIVE_HINTS.iter().any(|h| value.contains(h)) {
            weight += 25.0;
        }
    }
    weight
}

fn link_density(el: &Element) -> f64 {
    let total = el.text_content().chars().count();
    if total == 0 {
        return 0.0;
    }
    el.link_text_len() as f64 / total as f64
}

fn reads_like_prose(el: &Element) -> bool {
    let text = collapse_whitespace(&el.text_content());
    let len = text.chars().count();
    let density = link_density(el);
    if len > 80 {
        density < 0.25
    } else {
        len > 0 && density == 0.0 && (text.ends_with('.') || text.contains(". "))
    }
}

fn strip_boilerplate(root: &mut Element) {
    let mut stack = vec![root];
    while let Some(el) = stack.pop() {
        el.children.retain(|child| match child {
            Node::Element(child) => !is_boilerplate(child),
            Node::Text(_) => true,
        });
        for child in el.children.iter_mut() {
            if let Node::Element(child) = child {
                stack.push(child);
            }
        }
    }
}

fn is_boilerplate(el: &Element) -> bool {
    let name = el.name.as_str();
    if DROP_TAGS.contains(&name) {
        return true;
    }
    if matches!(name, "html" | "body" | "article" | "main") {
        return false;
    }
    let hints = format!(
        "{} {}",
        el.attr("class").unwrap_or_default(),
        el.attr("id").unwrap_or_default()
    )
    .to_lowercase();
    if hints.trim().is_empty() {
        return false;
    }
    UNLIKELY_HINTS.iter().any(|h| hints.contains(h)) && !MAYBE_HINTS.iter().any(|h| hints.contains(h))
}

fn has_text(root: &Element) -> bool {
    let mut stack = vec![root];
    while let Some(el) = stack.pop() {
        if matches!(el.name.as_str(), "script" | "style") {
            continue;
        }
        for child in &el.children {
            match child {
                Node::Text(text) if !text.trim().is_empty() => return true,
                Node::Text(_) => {}
                Node::Element(child) => stack.push(child),
            }
        }
    }
    false
}

fn element_at<'a>(root: &'a Element, path: &[usize]) -> Option<&'a Element> {
    let mut current = root;
    for &idx in path {
        match current.children.get(idx) {
            Some(Node::Element(el)) => current = el,
            _ => return None,
        }
    }
    Some(current)
}

/// Path of the first element named `name` in document order.
fn find_path(root: &Element, name: &str) -> Option<Vec<usize>> {
    let mut stack = vec![(root, Vec::new())];
    while let Some((el, path)) = stack.pop() {
        if !path.is_empty() && el.name == name {
            return Some(path);
        }
        for (idx, child) in el.children.iter().enumerate().rev() {
            if let Node::Element(child) = child {
                let mut child_path = path.clone();
                child_path.push(idx);
                stack.push((child, child_path));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cleaned(raw: &str) -> String {
        clean(raw, &ExtractConfig::default())
            .expect("document cleans")
            .into_string()
    }

    #[test]
    fn short_fragment_falls_back_to_whole_document() {
        assert_eq!(cleaned("<p>Он шел домой.</p>"), "<div><p>Он шел домой.</p></div>");
    }

    #[test]
    fn plain_text_is_wrapped_in_a_paragraph() {
        assert_eq!(cleaned("just some words"), "<div><p>just some words</p></div>");
    }

    #[test]
    fn blank_document_is_unparseable() {
        let res = clean("  <html><body> </body></html>", &ExtractConfig::default());
        assert!(matches!(res, Err(ExtractError::Unparseable(_))));
    }

    #[test]
    fn script_only_document_is_unparseable() {
        let res = clean("<script>var x = 1;</script>", &ExtractConfig::default());
        assert!(matches!(res, Err(ExtractError::Unparseable(_))));
    }

    #[test]
    fn navigation_only_document_is_unparseable() {
        let res = clean("<nav><a href=/>Home</a></nav>", &ExtractConfig::default());
        assert!(matches!(res, Err(ExtractError::Unparseable(_))));
    }

    #[test]
    fn article_body_beats_sidebar_and_menu() {
        let raw = "<html><body>\
            <div class=\"menu\"><ul><li><a href=/a>Главная страница сайта и новости</a></li></ul></div>\
            <div class=\"sidebar\"><p>Реклама, реклама, реклама, реклама, реклама.</p></div>\
            <div class=\"post-content\">\
              <p>Первый абзац статьи, достаточно длинный, чтобы набрать очки.</p>\
              <p>Второй абзац статьи, тоже длинный, с запятыми, как положено.</p>\
            </div>\
            <div id=\"comments\"><p>Комментарий читателя, очень длинный и бесполезный.</p></div>\
            </body></html>";
        let out = cleaned(raw);
        assert!(out.contains("Первый абзац"));
        assert!(out.contains("Второй абзац"));
        assert!(!out.contains("Реклама"));
        assert!(!out.contains("Главная"));
        assert!(!out.contains("Комментарий"));
    }

    #[test]
    fn runaway_nesting_still_cleans() {
        let raw = format!("<html><body>{}<p>Он шел домой.</p>", "<span>".repeat(100_000));
        assert!(cleaned(&raw).contains("Он шел домой."));
    }

    #[test]
    fn prose_sibling_paragraph_is_kept() {
        let raw = "<body><h1>Title</h1>\
            <div class=\"text\"><p>A long enough paragraph of article text, with commas, to score.</p></div>\
            <p>Short closing line.</p>\
            <p><a href=\"/x\">link only</a></p></body>";
        let out = cleaned(raw);
        assert!(out.contains("A long enough paragraph"));
        assert!(out.contains("Short closing line."));
        assert!(!out.contains("link only"));
    }
}
