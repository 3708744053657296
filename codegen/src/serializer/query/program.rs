/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::code::Block;
use crate::naming::TypeName;
use crate::serializer::BodyProgram;
use bytes::Bytes;
use shapegen_query::{fmt_blob, fmt_bool, fmt_integer, fmt_timestamp, QueryPayload};
use shapegen_types::{Dto, InvalidArgument, Value};
use std::fmt;

/// A generated local variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ident(String);

impl Ident {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hands out local variable names for one program.
///
/// A single counter is shared by every kind of variable, so no two names produced by
/// one allocator are equal, whatever the paths they are used for.
#[derive(Debug, Default)]
pub struct Idents {
    next: usize,
}

impl Idents {
    pub fn index(&mut self) -> Ident {
        self.alloc("idx")
    }

    pub fn value(&mut self) -> Ident {
        self.alloc("v")
    }

    pub fn key(&mut self) -> Ident {
        self.alloc("k")
    }

    fn alloc(&mut self, prefix: &str) -> Ident {
        let ident = Ident(format!("{}{}", prefix, self.next));
        self.next += 1;
        ident
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    /// Current value of a 1-based loop counter.
    Index(Ident),
    /// Key the enclosing helper was called with, `prefix` in generated code.
    Prefix,
}

/// Dot separated output key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPath(Vec<Segment>);

impl KeyPath {
    pub fn new(name: impl Into<String>) -> Self {
        KeyPath(vec![Segment::Literal(name.into())])
    }

    /// A path below the key a helper was called with.
    pub fn prefixed() -> Self {
        KeyPath(vec![Segment::Prefix])
    }

    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(Segment::Literal(name.into()));
        KeyPath(segments)
    }

    pub fn index(&self, index: &Ident) -> Self {
        let mut segments = self.0.clone();
        segments.push(Segment::Index(index.clone()));
        KeyPath(segments)
    }

    fn render(&self) -> String {
        let mut template = String::new();
        let mut args = Vec::new();
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                template.push('.');
            }
            match segment {
                Segment::Literal(name) => {
                    template.push_str(&name.replace('{', "{{").replace('}', "}}"))
                }
                Segment::Index(ident) => {
                    template.push_str("{}");
                    args.push(ident.as_str());
                }
                Segment::Prefix => {
                    template.push_str("{}");
                    args.push("prefix");
                }
            }
        }
        if args.is_empty() {
            format!("{:?}", self.0.iter().map(literal).collect::<Vec<_>>().join("."))
        } else {
            format!("format!({:?}, {})", template, args.join(", "))
        }
    }

    /// The key as a `&str` argument.
    fn render_ref(&self) -> String {
        if self.0.iter().all(|segment| matches!(segment, Segment::Literal(_))) {
            self.render()
        } else {
            format!("&{}", self.render())
        }
    }

    fn resolve(&self, env: &Env<'_>) -> String {
        let mut key = String::new();
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                key.push('.');
            }
            match segment {
                Segment::Literal(name) => key.push_str(name),
                Segment::Index(ident) => match env.lookup(ident) {
                    Some(Bound::Index(n)) => key.push_str(&n.to_string()),
                    _ => key.push_str(ident.as_str()),
                },
                Segment::Prefix => key.push_str(&env.prefix),
            }
        }
        key
    }
}

fn literal(segment: &Segment) -> &str {
    match segment {
        Segment::Literal(name) => name,
        Segment::Index(ident) => ident.as_str(),
        Segment::Prefix => "prefix",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Base {
    /// The operation input, `input` in generated code.
    Input,
    /// A bound structure.
    Var(Ident),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// A member of a structure; absent members read as null.
    Field {
        base: Base,
        member: String,
        field: String,
    },
    /// A bound value that is never null.
    Var(Ident),
}

impl Expr {
    /// Member or variable name, for error messages.
    fn describe(&self) -> &str {
        match self {
            Expr::Field { member, .. } => member,
            Expr::Var(ident) => ident.as_str(),
        }
    }

    fn render(&self) -> String {
        match self {
            Expr::Field {
                base: Base::Input,
                field,
                ..
            } => format!("input.{}", field),
            Expr::Field {
                base: Base::Var(base),
                field,
                ..
            } => format!("{}.{}", base, field),
            Expr::Var(ident) => ident.to_string(),
        }
    }

    /// Iteration over the collection this expression yields.
    fn render_iter(&self) -> String {
        match self {
            Expr::Field { .. } => format!("&{}", self.render()),
            Expr::Var(ident) => format!("{}.iter()", ident),
        }
    }
}

/// Encoding of a scalar leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leaf {
    String,
    Integer,
    Boolean,
    Timestamp,
    /// Base64. With `fallback`, an absent value is written as an empty string.
    Blob { fallback: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Assign {
        key: KeyPath,
        value: Expr,
        leaf: Leaf,
    },
    IfPresent {
        binding: Ident,
        value: Expr,
        body: Vec<Stmt>,
    },
    ForEachList {
        index: Ident,
        item: Ident,
        list: Expr,
        body: Vec<Stmt>,
    },
    ForEachMap {
        index: Ident,
        key: Ident,
        value: Ident,
        map: Expr,
        body: Vec<Stmt>,
    },
    /// Serializes a structure through a helper, under `key`.
    Call {
        helper: String,
        key: KeyPath,
        value: Expr,
    },
}

/// Serializer of one recursive structure shape, written as a function of the key
/// prefix and the instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Helper {
    pub name: String,
    pub type_name: TypeName,
    pub param: Ident,
    pub body: Vec<Stmt>,
}

/// Body of a query protocol request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryProgram {
    /// The whole body is one raw member.
    Payload { member: String, field: String },
    Body {
        action: String,
        version: String,
        statements: Vec<Stmt>,
        helpers: Vec<Helper>,
    },
}

impl QueryProgram {
    pub fn statements(&self) -> &[Stmt] {
        match self {
            QueryProgram::Payload { .. } => &[],
            QueryProgram::Body { statements, .. } => statements,
        }
    }

    pub fn helpers(&self) -> &[Helper] {
        match self {
            QueryProgram::Payload { .. } => &[],
            QueryProgram::Body { helpers, .. } => helpers,
        }
    }
}

impl BodyProgram for QueryProgram {
    fn render(&self) -> Block {
        let mut code = Block::new();
        match self {
            QueryProgram::Payload { field, .. } => {
                code.block(format!("match &input.{}", field), |b| {
                    b.line("Some(body) => bytes::Bytes::copy_from_slice(body.as_ref()),");
                    b.line("None => bytes::Bytes::new(),");
                });
            }
            QueryProgram::Body {
                action,
                version,
                statements,
                helpers,
            } => {
                for helper in helpers {
                    render_helper(&mut code, helper);
                    code.blank();
                }
                code.line(format!(
                    "let {}payload = shapegen_query::QueryPayload::new({:?}, {:?});",
                    if statements.is_empty() { "" } else { "mut " },
                    action,
                    version
                ));
                if statements.is_empty() {
                    code.line("let _ = input;");
                }
                render_statements(&mut code, statements, "&mut payload");
                code.line("bytes::Bytes::from(payload.into_body())");
            }
        }
        code
    }

    fn serialize(&self, input: &Dto) -> Result<Bytes, InvalidArgument> {
        match self {
            QueryProgram::Payload { member, .. } => match input.get(member) {
                Value::Null => Ok(Bytes::new()),
                Value::String(s) => Ok(Bytes::copy_from_slice(s.as_bytes())),
                Value::Blob(blob) => Ok(Bytes::copy_from_slice(blob.as_ref())),
                other => Err(InvalidArgument::unexpected(
                    member.as_str(),
                    input.type_name(),
                    "a string or a blob",
                    other.kind(),
                )),
            },
            QueryProgram::Body {
                action,
                version,
                statements,
                helpers,
            } => {
                let mut run = Run {
                    input,
                    helpers,
                    payload: QueryPayload::new(action.as_str(), version.as_str()),
                    env: Env::default(),
                };
                run.exec(statements)?;
                Ok(Bytes::from(run.payload.into_body()))
            }
        }
    }
}

fn render_helper(code: &mut Block, helper: &Helper) {
    code.block(
        format!(
            "fn {}(payload: &mut shapegen_query::QueryPayload, prefix: &str, {}: &{})",
            helper.name,
            helper.param,
            helper.type_name.fqdn()
        ),
        |b| render_statements(b, &helper.body, "payload"),
    );
}

/// `payload` is the expression handing the payload to helper calls.
fn render_statements(code: &mut Block, statements: &[Stmt], payload: &str) {
    for statement in statements {
        match statement {
            Stmt::Assign { key, value, leaf } => {
                let line = match (value, leaf) {
                    (Expr::Field { .. }, Leaf::Blob { .. }) => format!(
                        "payload.insert({}, {}.as_ref().map(shapegen_query::fmt_blob).unwrap_or_default());",
                        key.render(),
                        value.render()
                    ),
                    _ => format!(
                        "payload.insert({}, {});",
                        key.render(),
                        render_leaf(&value.render(), *leaf)
                    ),
                };
                code.line(line);
            }
            Stmt::IfPresent {
                binding,
                value,
                body,
            } => {
                code.if_let(
                    &format!("Some({})", binding),
                    &format!("&{}", value.render()),
                    |b| render_statements(b, body, payload),
                );
            }
            Stmt::ForEachList {
                index,
                item,
                list,
                body,
            } => {
                code.line(format!("let mut {} = 0;", index));
                code.for_each(item.as_str(), &list.render_iter(), |b| {
                    b.line(format!("{} += 1;", index));
                    render_statements(b, body, payload);
                });
            }
            Stmt::ForEachMap {
                index,
                key,
                value,
                map,
                body,
            } => {
                code.line(format!("let mut {} = 0;", index));
                code.for_each(&format!("({}, {})", key, value), &map.render_iter(), |b| {
                    b.line(format!("{} += 1;", index));
                    render_statements(b, body, payload);
                });
            }
            Stmt::Call { helper, key, value } => {
                code.line(format!(
                    "{}({}, {}, {});",
                    helper,
                    payload,
                    key.render_ref(),
                    value.render()
                ));
            }
        }
    }
}

fn render_leaf(value: &str, leaf: Leaf) -> String {
    match leaf {
        Leaf::String => format!("{}.as_str()", value),
        Leaf::Integer => format!("{}.to_string()", value),
        Leaf::Boolean => format!("shapegen_query::fmt_bool(*{})", value),
        Leaf::Timestamp => format!("shapegen_query::fmt_timestamp({})", value),
        Leaf::Blob { .. } => format!("shapegen_query::fmt_blob({})", value),
    }
}

static NULL: Value = Value::Null;

#[derive(Debug, Clone, Copy)]
enum Bound<'a> {
    Value(&'a Value),
    Key(&'a str),
    Index(usize),
}

#[derive(Debug, Default)]
struct Env<'a> {
    bindings: Vec<(&'a Ident, Bound<'a>)>,
    /// Key the running helper was called with.
    prefix: String,
}

impl<'a> Env<'a> {
    fn lookup(&self, ident: &Ident) -> Option<Bound<'a>> {
        self.bindings
            .iter()
            .rev()
            .find(|(name, _)| *name == ident)
            .map(|(_, bound)| *bound)
    }
}

struct Run<'a> {
    input: &'a Dto,
    helpers: &'a [Helper],
    payload: QueryPayload,
    env: Env<'a>,
}

impl<'a> Run<'a> {
    fn exec(&mut self, statements: &'a [Stmt]) -> Result<(), InvalidArgument> {
        for statement in statements {
            match statement {
                Stmt::Assign { key, value, leaf } => {
                    let path = key.resolve(&self.env);
                    match self.eval(value)? {
                        Bound::Value(Value::Null) => {
                            if let (Expr::Field { .. }, Leaf::Blob { fallback: true }) = (value, leaf)
                            {
                                self.payload.insert(path, "");
                            }
                        }
                        bound => {
                            let encoded = self.encode(bound, *leaf, &path)?;
                            self.payload.insert(path, encoded);
                        }
                    }
                }
                Stmt::IfPresent {
                    binding,
                    value,
                    body,
                } => {
                    let bound = self.eval(value)?;
                    if !matches!(bound, Bound::Value(Value::Null)) {
                        self.scoped(vec![(binding, bound)], body)?;
                    }
                }
                Stmt::ForEachList {
                    index,
                    item,
                    list,
                    body,
                } => match self.eval(list)? {
                    Bound::Value(Value::Null) => {}
                    Bound::Value(Value::List(items)) => {
                        for (i, element) in items.iter().enumerate() {
                            self.scoped(
                                vec![(index, Bound::Index(i + 1)), (item, Bound::Value(element))],
                                body,
                            )?;
                        }
                    }
                    other => return Err(self.mismatch(list.describe(), "a list", other)),
                },
                Stmt::ForEachMap {
                    index,
                    key,
                    value,
                    map,
                    body,
                } => match self.eval(map)? {
                    Bound::Value(Value::Null) => {}
                    Bound::Value(Value::Map(entries)) => {
                        for (i, (k, v)) in entries.iter().enumerate() {
                            self.scoped(
                                vec![
                                    (index, Bound::Index(i + 1)),
                                    (key, Bound::Key(k)),
                                    (value, Bound::Value(v)),
                                ],
                                body,
                            )?;
                        }
                    }
                    other => return Err(self.mismatch(map.describe(), "a map", other)),
                },
                Stmt::Call { helper, key, value } => {
                    let bound = self.eval(value)?;
                    if matches!(bound, Bound::Value(Value::Null)) {
                        continue;
                    }
                    let helpers = self.helpers;
                    let helper = helpers
                        .iter()
                        .find(|candidate| candidate.name == *helper)
                        .ok_or_else(|| {
                            InvalidArgument::unexpected(
                                value.describe(),
                                self.input.type_name(),
                                "a serializer helper",
                                "nothing",
                            )
                        })?;
                    let prefix = key.resolve(&self.env);
                    let outer = std::mem::replace(&mut self.env.prefix, prefix);
                    let result = self.scoped(vec![(&helper.param, bound)], &helper.body);
                    self.env.prefix = outer;
                    result?;
                }
            }
        }
        Ok(())
    }

    fn scoped(
        &mut self,
        bindings: Vec<(&'a Ident, Bound<'a>)>,
        body: &'a [Stmt],
    ) -> Result<(), InvalidArgument> {
        let depth = self.env.bindings.len();
        self.env.bindings.extend(bindings);
        let result = self.exec(body);
        self.env.bindings.truncate(depth);
        result
    }

    fn eval(&self, expr: &Expr) -> Result<Bound<'a>, InvalidArgument> {
        match expr {
            Expr::Field {
                base: Base::Input,
                member,
                ..
            } => Ok(Bound::Value(self.input.get(member))),
            Expr::Field {
                base: Base::Var(base),
                member,
                ..
            } => match self.env.lookup(base) {
                Some(Bound::Value(Value::Structure(dto))) => Ok(Bound::Value(dto.get(member))),
                Some(other) => Err(self.mismatch(member, "a structure", other)),
                None => Ok(Bound::Value(&NULL)),
            },
            Expr::Var(ident) => Ok(self.env.lookup(ident).unwrap_or(Bound::Value(&NULL))),
        }
    }

    fn encode(&self, bound: Bound<'a>, leaf: Leaf, path: &str) -> Result<String, InvalidArgument> {
        let value = match bound {
            Bound::Key(key) => return Ok(key.to_string()),
            Bound::Index(n) => return Ok(n.to_string()),
            Bound::Value(value) => value,
        };
        match (leaf, value) {
            (Leaf::String, Value::String(s)) => Ok(s.clone()),
            (Leaf::Integer, Value::Integer(i)) => Ok(fmt_integer(*i)),
            (Leaf::Boolean, Value::Boolean(b)) => Ok(fmt_bool(*b).to_string()),
            (Leaf::Timestamp, Value::Timestamp(t)) => Ok(fmt_timestamp(t)),
            (Leaf::Blob { .. }, Value::Blob(blob)) => Ok(fmt_blob(blob)),
            (leaf, other) => Err(InvalidArgument::unexpected(
                path,
                self.input.type_name(),
                expected(leaf),
                other.kind(),
            )),
        }
    }

    fn mismatch(&self, context: &str, expected: &'static str, found: Bound<'_>) -> InvalidArgument {
        let found = match found {
            Bound::Value(value) => value.kind(),
            Bound::Key(_) => "string",
            Bound::Index(_) => "integer",
        };
        InvalidArgument::unexpected(context, self.input.type_name(), expected, found)
    }
}

fn expected(leaf: Leaf) -> &'static str {
    match leaf {
        Leaf::String => "a string",
        Leaf::Integer => "an integer",
        Leaf::Boolean => "a boolean",
        Leaf::Timestamp => "a timestamp",
        Leaf::Blob { .. } => "a blob",
    }
}

#[cfg(test)]
mod test {
    use super::{Ident, Idents, KeyPath};
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn literal_keys_render_as_strings() {
        assert_eq!(KeyPath::new("Destination").child("ToAddresses").render(), "\"Destination.ToAddresses\"");
    }

    #[test]
    fn indexed_keys_render_as_format() {
        let mut idents = Idents::default();
        let outer = idents.index();
        let inner = idents.index();
        let key = KeyPath::new("Items")
            .child("member")
            .index(&outer)
            .child("Tags{x}")
            .index(&inner);
        assert_eq!(
            key.render(),
            "format!(\"Items.member.{}.Tags{{x}}.{}\", idx0, idx1)"
        );
    }

    #[test]
    fn idents_are_monotonic() {
        let mut idents = Idents::default();
        assert_eq!(idents.index(), Ident("idx0".to_string()));
        assert_eq!(idents.value(), Ident("v1".to_string()));
        assert_eq!(idents.key(), Ident("k2".to_string()));
    }

    proptest! {
        #[test]
        fn idents_never_repeat(kinds in proptest::collection::vec(0u8..3, 0..200)) {
            let mut idents = Idents::default();
            let mut seen = HashSet::new();
            for kind in kinds {
                let ident = match kind {
                    0 => idents.index(),
                    1 => idents.value(),
                    _ => idents.key(),
                };
                prop_assert!(seen.insert(ident));
            }
        }
    }
}
