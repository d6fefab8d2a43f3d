//! Navigation helpers over JMA XML documents.
//!
//! Elements are matched by local name, so `jmx_eb:Magnitude` is reached as
//! `Magnitude`. A repeated element and a lone element are both seen as a
//! sequence of children, which keeps the parsers free of single-or-list
//! branching.

use roxmltree::{Document, Node};

use crate::error::{AppError, Result};

/// Parse a document, failing if it is not well-formed XML.
pub fn parse(xml: &str) -> Result<Document<'_>> {
    Ok(Document::parse(xml)?)
}

/// All element children of `node` named `name`, in document order.
pub fn children<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children()
        .filter(move |child| child.is_element() && child.tag_name().name() == name)
}

/// First element child of `node` named `name`.
pub fn child<'a, 'input: 'a>(node: Node<'a, 'input>, name: &'a str) -> Option<Node<'a, 'input>> {
    children(node, name).next()
}

/// Follow a path of element names from `node`, taking the first match at each step.
pub fn find<'a, 'input: 'a>(node: Node<'a, 'input>, path: &[&'a str]) -> Option<Node<'a, 'input>> {
    path.iter().try_fold(node, |current, name| child(current, *name))
}

/// Trimmed text content of an element. Empty elements yield an empty string.
pub fn text(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Text at `path`, or `None` if any element on the path is missing.
pub fn text_at(node: Node<'_, '_>, path: &[&str]) -> Option<String> {
    find(node, path).map(text)
}

/// Text at `path`, failing with a parse error naming the missing path.
pub fn require_text(node: Node<'_, '_>, path: &[&str], context: &str) -> Result<String> {
    text_at(node, path).ok_or_else(|| missing(path, context))
}

/// Element at `path`, failing with a parse error naming the missing path.
pub fn require<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    path: &[&'a str],
    context: &str,
) -> Result<Node<'a, 'input>> {
    find(node, path).ok_or_else(|| missing(path, context))
}

fn missing(path: &[&str], context: &str) -> AppError {
    AppError::parse(context, format!("missing <{}>", path.join("/")))
}
