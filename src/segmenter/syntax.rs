//! String literal collection over tree-sitter syntax trees.
//!
//! Shared by the Java and Python segmenters. A grammar plugs in through
//! [`LiteralSyntax`]; the walk merges literals joined with `+` (and, where the
//! grammar has one, implicit adjacency) into a single span, and recovers
//! literals left open at end-of-file from ERROR and MISSING nodes.

use crate::core::{Span, SpanContext};
use anyhow::{Context, Result};
use tree_sitter::{Language, Node, Parser, Tree};

/// Body of one literal: offsets between its delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Body {
    pub start: usize,
    pub end: usize,
    /// No closing delimiter was found
    pub truncated: bool,
}

/// Grammar-specific knowledge the literal walk needs.
pub(super) trait LiteralSyntax {
    fn language(&self) -> Language;

    /// A node that is one complete (or recovered) literal.
    fn is_literal(&self, kind: &str) -> bool;

    /// A node whose literal children are joined implicitly.
    fn is_adjacent_run(&self, _kind: &str) -> bool {
        false
    }

    /// Opening delimiter token as it appears inside an ERROR node.
    fn is_open_quote(&self, kind: &str) -> bool;

    /// Closing delimiter token as it appears inside an ERROR node.
    fn is_close_quote(&self, kind: &str) -> bool;

    /// Body offsets of a literal node.
    fn literal_body(&self, content: &str, node: &Node) -> Body;

    /// First body offset after an opening delimiter token.
    fn body_start_after(&self, _content: &str, quote: &Node) -> usize {
        quote.end_byte()
    }

    /// Where a literal opened by `quote` and never closed ends: the end of
    /// its line, or end-of-file for multi-line delimiters.
    fn unterminated_end(&self, content: &str, quote: &Node) -> usize;
}

/// Parse `content` with the grammar of `syntax`.
pub(super) fn parse_tree(content: &str, syntax: &impl LiteralSyntax) -> Result<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(&syntax.language())
        .context("Failed to set tree-sitter language")?;
    parser
        .parse(content, None)
        .context("Failed to parse source code")
}

/// Every literal span of `content`, in file order.
pub(super) fn collect_literals(content: &str, syntax: &impl LiteralSyntax) -> Vec<Span> {
    let tree = match parse_tree(content, syntax) {
        Ok(tree) => tree,
        Err(e) => {
            tracing::warn!("Skipping literal scan: {e:#}");
            return Vec::new();
        }
    };
    let mut collector = Collector {
        content,
        syntax,
        spans: Vec::new(),
        run: None,
    };
    collector.visit(&tree.root_node());
    collector.flush();
    collector.spans
}

/// Literals merged so far into the span under construction.
struct Run {
    start: usize,
    end: usize,
    text: String,
    truncated: bool,
}

struct Collector<'a, S> {
    content: &'a str,
    syntax: &'a S,
    spans: Vec<Span>,
    run: Option<Run>,
}

impl<S: LiteralSyntax> Collector<'_, S> {
    fn visit(&mut self, node: &Node) {
        let kind = node.kind();
        if self.syntax.is_literal(kind) {
            self.push_body(self.syntax.literal_body(self.content, node));
            self.flush();
        } else if self.syntax.is_adjacent_run(kind) {
            self.push_adjacent(node);
            self.flush();
        } else if is_concatenation(node) {
            self.visit_concatenation(node);
        } else if node.is_error() {
            self.visit_error(node);
        } else {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                self.visit(&child);
            }
        }
    }

    /// Merges runs of literal operands of a `+` chain; anything else between
    /// them ends the current run and is searched on its own.
    fn visit_concatenation(&mut self, node: &Node) {
        let mut operands = Vec::new();
        flatten_concatenation(node, &mut operands);
        for operand in &operands {
            let kind = operand.kind();
            if self.syntax.is_literal(kind) {
                self.push_body(self.syntax.literal_body(self.content, operand));
            } else if self.syntax.is_adjacent_run(kind) {
                self.push_adjacent(operand);
            } else {
                self.flush();
                self.visit(operand);
            }
        }
        self.flush();
    }

    fn push_adjacent(&mut self, node: &Node) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if self.syntax.is_literal(child.kind()) {
                self.push_body(self.syntax.literal_body(self.content, &child));
            }
        }
    }

    /// Error recovery leaves delimiter tokens as loose children. Pair them
    /// up; an opening quote with no partner is an unterminated literal.
    fn visit_error(&mut self, node: &Node) {
        let mut open: Option<Node> = None;
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            let kind = child.kind();
            match open {
                Some(quote) if self.syntax.is_close_quote(kind) && !child.is_missing() => {
                    let start = self.syntax.body_start_after(self.content, &quote);
                    self.push_body(Body {
                        start,
                        end: child.start_byte().max(start),
                        truncated: false,
                    });
                    self.flush();
                    open = None;
                }
                Some(_) => {}
                None if self.syntax.is_open_quote(kind) => {
                    self.flush();
                    open = Some(child);
                }
                None => self.visit(&child),
            }
        }
        if let Some(quote) = open {
            let start = self.syntax.body_start_after(self.content, &quote);
            self.push_body(Body {
                start,
                end: self.syntax.unterminated_end(self.content, &quote).max(start),
                truncated: true,
            });
            self.flush();
        }
    }

    fn push_body(&mut self, body: Body) {
        let text = self.content.get(body.start..body.end).unwrap_or_default();
        if let Some(run) = self.run.as_mut().filter(|run| !run.truncated) {
            run.text.push_str(text);
            run.end = body.end;
            run.truncated = body.truncated;
            return;
        }
        self.flush();
        self.run = Some(Run {
            start: body.start,
            end: body.end,
            text: text.to_string(),
            truncated: body.truncated,
        });
    }

    fn flush(&mut self) {
        if let Some(run) = self.run.take() {
            self.spans.push(
                Span::new(run.start, run.end, SpanContext::StringLiteral, run.text)
                    .with_truncated(run.truncated),
            );
        }
    }
}

/// A `binary_expression` whose operator is `+`.
fn is_concatenation(node: &Node) -> bool {
    node.kind() == "binary_expression"
        && node
            .child_by_field_name("operator")
            .is_some_and(|op| op.kind() == "+")
}

/// Operands of a left- or right-nested `+` chain, in source order.
fn flatten_concatenation<'t>(node: &Node<'t>, operands: &mut Vec<Node<'t>>) {
    for field in ["left", "right"] {
        if let Some(side) = node.child_by_field_name(field) {
            if is_concatenation(&side) {
                flatten_concatenation(&side, operands);
            } else {
                operands.push(side);
            }
        }
    }
}

/// Whether any direct child of `node` was inserted by error recovery.
pub(super) fn has_missing_child(node: &Node) -> bool {
    let mut cursor = node.walk();
    let missing = node.children(&mut cursor).any(|child| child.is_missing());
    missing
}
