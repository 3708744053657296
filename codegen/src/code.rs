/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! A small structured builder for Rust source.
//!
//! Nested scopes are built through closures, so braces always balance and indentation
//! follows the tree rather than hand-written whitespace.

const INDENT: &str = "    ";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Line(String),
    Doc(String),
    Block {
        header: String,
        body: Block,
        close: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    nodes: Vec<Node>,
}

impl Block {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&mut self, line: impl Into<String>) -> &mut Self {
        self.nodes.push(Node::Line(line.into()));
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.nodes.push(Node::Line(String::new()));
        self
    }

    /// Doc comment; multi-line text becomes one `///` line per input line.
    pub fn doc(&mut self, text: &str) -> &mut Self {
        for line in text.trim_end().split('\n') {
            self.nodes.push(Node::Doc(line.trim_end().to_string()));
        }
        self
    }

    /// `header {` body `}`
    pub fn block(&mut self, header: impl Into<String>, f: impl FnOnce(&mut Block)) -> &mut Self {
        self.block_with(format!("{} {{", header.into()), "}", f)
    }

    /// Indented body between two verbatim lines.
    pub fn block_with(
        &mut self,
        header: impl Into<String>,
        close: impl Into<String>,
        f: impl FnOnce(&mut Block),
    ) -> &mut Self {
        let mut body = Block::new();
        f(&mut body);
        self.nodes.push(Node::Block {
            header: header.into(),
            body,
            close: close.into(),
        });
        self
    }

    pub fn if_let(
        &mut self,
        pattern: &str,
        expr: &str,
        f: impl FnOnce(&mut Block),
    ) -> &mut Self {
        self.block(format!("if let {} = {}", pattern, expr), f)
    }

    pub fn if_(&mut self, cond: &str, f: impl FnOnce(&mut Block)) -> &mut Self {
        self.block(format!("if {}", cond), f)
    }

    pub fn for_each(&mut self, pattern: &str, iter: &str, f: impl FnOnce(&mut Block)) -> &mut Self {
        self.block(format!("for {} in {}", pattern, iter), f)
    }

    /// Splices the nodes of `other` into this block.
    pub fn append(&mut self, other: Block) -> &mut Self {
        self.nodes.extend(other.nodes);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out, 0);
        out
    }

    fn render_into(&self, out: &mut String, depth: usize) {
        for node in &self.nodes {
            match node {
                Node::Line(line) if line.is_empty() => out.push('\n'),
                Node::Line(line) => push_line(out, depth, line),
                Node::Doc(line) if line.is_empty() => push_line(out, depth, "///"),
                Node::Doc(line) => push_line(out, depth, &format!("/// {}", line)),
                Node::Block {
                    header,
                    body,
                    close,
                } => {
                    push_line(out, depth, header);
                    body.render_into(out, depth + 1);
                    push_line(out, depth, close);
                }
            }
        }
    }
}

fn push_line(out: &mut String, depth: usize, line: &str) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
    out.push_str(line);
    out.push('\n');
}

#[cfg(test)]
mod test {
    use super::Block;
    use pretty_assertions::assert_eq;

    #[test]
    fn nested_blocks_indent() {
        let mut code = Block::new();
        code.doc("A thing.\n\nWith details.");
        code.block("impl Thing", |b| {
            b.block("pub fn go(&self)", |b| {
                b.if_let("Some(v)", "&self.v", |b| {
                    b.line("println!(\"{}\", v);");
                });
            });
        });
        assert_eq!(
            code.render(),
            "/// A thing.\n\
             ///\n\
             /// With details.\n\
             impl Thing {\n    \
                 pub fn go(&self) {\n        \
                     if let Some(v) = &self.v {\n            \
                         println!(\"{}\", v);\n        \
                     }\n    \
                 }\n\
             }\n"
        );
    }

    #[test]
    fn custom_close() {
        let mut code = Block::new();
        code.block_with("let x = Foo {", "};", |b| {
            b.line("a: 1,");
        });
        assert_eq!(code.render(), "let x = Foo {\n    a: 1,\n};\n");
    }

    #[test]
    fn append_splices() {
        let mut inner = Block::new();
        inner.line("b();");
        let mut code = Block::new();
        code.line("a();").append(inner).blank();
        assert_eq!(code.render(), "a();\nb();\n\n");
        assert!(Block::new().is_empty());
    }
}
