use crate::clean::CleanedHtml;
use crate::html::{self, Node};
use crate::whitespace::collapse_whitespace;

/// Lazy, document-ordered iterator over the text of paragraph elements.
///
/// Matching elements are visited in pre-order, so a nested match (a `p`
/// inside an `li`) is yielded after its container and contributes to the
/// container's text as well. Adjacent matches are never merged.
#[derive(Debug)]
pub struct Paragraphs {
    stack: Vec<Node>,
    tags: Vec<String>,
    collapse: bool,
}

impl Paragraphs {
    pub(crate) fn new(cleaned: &CleanedHtml, tags: Vec<String>, collapse: bool) -> Self {
        let root = html::parse(cleaned.as_str());
        Self {
            stack: root.children.into_iter().rev().collect(),
            tags,
            collapse,
        }
    }
}

impl Iterator for Paragraphs {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        while let Some(node) = self.stack.pop() {
            let Node::Element(el) = node else {
                continue;
            };
            let text = self
                .tags
                .iter()
                .any(|t| *t == el.name)
                .then(|| el.text_content());
            self.stack.extend(el.children.into_iter().rev());
            if let Some(text) = text {
                return Some(if self.collapse {
                    collapse_whitespace(&text)
                } else {
                    text
                });
            }
        }
        None
    }
}
