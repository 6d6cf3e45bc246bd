//! Render a parsed struct as Rust source: a `pub struct` with one field per member, the
//! layout table as a block comment, and a [`BinaryRecord`](crate::record::BinaryRecord)
//! implementation that marshals the fields big-endian at their fixed offsets.
//!
//! Output depends only on the namespace and the member list, so identical input always
//! renders byte-identical text.

use crate::ast::{Member, StructDef};
use crate::layout::LayoutTable;
use std::collections::BTreeSet;

/// Module generated code imports its runtime from.
pub const RUNTIME_MODULE: &str = "structgen::record";

const INDENT: &str = "    ";

/// Primitive names that pass through unmapped and are provided as aliases by the runtime.
const RUNTIME_ALIASES: [&str; 3] = ["UInt16", "UInt32", "UInt64"];

const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "if", "impl", "in", "let",
    "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref", "return",
    "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized", "use",
    "virtual", "where", "while", "yield",
];

/// Keywords that cannot be raw identifiers.
const RESERVED_PATH_KEYWORDS: &[&str] = &["self", "Self", "super", "crate", "_"];

/// How a member is marshalled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    /// Nested record: delegate to its own `read_from` / `write_to`.
    Record,
    /// Single-byte primitive.
    Byte,
    /// Multi-byte primitive, big-endian.
    Scalar,
}

fn strategy(m: &Member) -> Strategy {
    if m.is_class_type {
        Strategy::Record
    } else if m.element_size == 1 {
        Strategy::Byte
    } else {
        Strategy::Scalar
    }
}

/// Whether the member's code goes through `record::read_be` / `record::write_be`.
fn uses_scalar_codec(m: &Member) -> bool {
    match strategy(m) {
        Strategy::Record => false,
        Strategy::Byte => !m.is_array(),
        Strategy::Scalar => true,
    }
}

/// Field name usable in Rust source; keywords become raw identifiers.
pub fn field_ident(identifier: &str) -> String {
    if RESERVED_PATH_KEYWORDS.contains(&identifier) {
        format!("{}_", identifier)
    } else if KEYWORDS.contains(&identifier) {
        format!("r#{}", identifier)
    } else {
        identifier.to_string()
    }
}

/// `offset` or `offset + n`.
fn at(n: usize) -> String {
    if n == 0 {
        "offset".to_string()
    } else {
        format!("offset + {}", n)
    }
}

/// Position of element `i` of an array starting at `base`.
fn element_at(base: usize, stride: usize) -> String {
    format!("{} + i * {}", at(base), stride)
}

fn byte_range(m: &Member) -> String {
    format!("{}..{}", at(m.offset), at(m.offset + m.total_size()))
}

fn field_type(m: &Member) -> String {
    match m.array_length {
        Some(n) => format!("[{}; {}]", m.target_type, n),
        None => m.target_type.clone(),
    }
}

#[derive(Default)]
struct Source {
    text: String,
}

impl Source {
    fn line(&mut self, depth: usize, content: impl AsRef<str>) {
        let content = content.as_ref();
        if !content.is_empty() {
            for _ in 0..depth {
                self.text.push_str(INDENT);
            }
            self.text.push_str(content);
        }
        self.text.push('\n');
    }

    fn blank(&mut self) {
        self.text.push('\n');
    }
}

/// Renders records for one namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordEmitter {
    namespace: String,
}

impl RecordEmitter {
    /// `namespace` is the module path nested record types are imported from; `.` separators
    /// are accepted. Empty means nested types are expected to be in scope already.
    pub fn new(namespace: &str) -> Self {
        RecordEmitter {
            namespace: namespace.trim().replace('.', "::"),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn emit(&self, def: &StructDef) -> String {
        let mut src = Source::default();
        self.emit_preamble(&mut src, def);
        emit_layout_comment(&mut src, def);
        emit_struct(&mut src, def);
        src.blank();
        emit_inherent_impl(&mut src, def);
        src.blank();
        emit_default_impl(&mut src, def);
        src.blank();
        emit_record_impl(&mut src, def);
        src.text
    }

    fn emit_preamble(&self, src: &mut Source, def: &StructDef) {
        src.line(0, format!("// Generated by structgen from `{}`. Do not edit.", def.name));
        if !self.namespace.is_empty() {
            src.line(0, format!("// Namespace: {}", self.namespace));
        }
        src.blank();

        let mut items: Vec<&str> = Vec::new();
        if def.members.iter().any(uses_scalar_codec) {
            items.push("self");
        }
        items.push("BinaryRecord");
        let aliases: BTreeSet<&str> = def
            .members
            .iter()
            .filter(|m| !m.is_class_type)
            .map(|m| m.target_type.as_str())
            .filter(|t| RUNTIME_ALIASES.contains(t))
            .collect();
        items.extend(aliases);
        if items.len() == 1 {
            src.line(0, format!("use {}::{};", RUNTIME_MODULE, items[0]));
        } else {
            src.line(0, format!("use {}::{{{}}};", RUNTIME_MODULE, items.join(", ")));
        }

        if !self.namespace.is_empty() {
            let nested: BTreeSet<&str> = def
                .members
                .iter()
                .filter(|m| m.is_class_type && m.target_type != def.name)
                .map(|m| m.target_type.as_str())
                .collect();
            for ty in nested {
                src.line(0, format!("use {}::{};", self.namespace, ty));
            }
        }
        src.blank();
    }
}

fn emit_layout_comment(src: &mut Source, def: &StructDef) {
    src.line(0, "/*");
    for line in LayoutTable::new(&def.members).lines() {
        let line = line.replace("*/", "* /").replace("/*", "/ *");
        src.line(0, format!(" * {}", line).trim_end());
    }
    src.line(0, " */");
}

fn emit_struct(src: &mut Source, def: &StructDef) {
    src.line(0, "#[allow(non_snake_case, non_camel_case_types)]");
    src.line(0, "#[derive(Debug, Clone, PartialEq, Eq)]");
    src.line(0, format!("pub struct {} {{", def.name));
    for (i, m) in def.members.iter().enumerate() {
        if i > 0 {
            src.blank();
        }
        if !m.description.is_empty() {
            src.line(1, format!("/// {}", m.description));
        }
        src.line(1, format!("pub {}: {},", field_ident(&m.identifier), field_type(m)));
    }
    src.line(0, "}");
}

fn emit_inherent_impl(src: &mut Source, def: &StructDef) {
    src.line(0, format!("impl {} {{", def.name));
    src.line(1, format!("pub const STRUCT_SIZE: usize = {};", def.total_size()));
    src.line(0, "}");
}

fn emit_default_impl(src: &mut Source, def: &StructDef) {
    src.line(0, format!("impl Default for {} {{", def.name));
    src.line(1, "fn default() -> Self {");
    src.line(2, "Self {");
    for m in &def.members {
        let value = if m.is_array() {
            "std::array::from_fn(|_| Default::default())"
        } else {
            "Default::default()"
        };
        src.line(3, format!("{}: {},", field_ident(&m.identifier), value));
    }
    src.line(2, "}");
    src.line(1, "}");
    src.line(0, "}");
}

fn emit_record_impl(src: &mut Source, def: &StructDef) {
    if def.members.is_empty() {
        src.line(0, "#[allow(unused_variables)]");
    }
    src.line(0, format!("impl BinaryRecord for {} {{", def.name));

    src.line(1, "fn read_from(&mut self, buffer: &[u8], offset: usize) -> usize {");
    for m in &def.members {
        emit_read(src, m);
    }
    src.line(2, "Self::STRUCT_SIZE");
    src.line(1, "}");
    src.blank();

    src.line(1, "fn write_to(&self, buffer: &mut [u8], offset: usize) {");
    for m in &def.members {
        emit_write(src, m);
    }
    src.line(1, "}");
    src.blank();

    src.line(1, "fn size(&self) -> usize {");
    src.line(2, "Self::STRUCT_SIZE");
    src.line(1, "}");
    src.line(0, "}");
}

fn emit_read(src: &mut Source, m: &Member) {
    let field = field_ident(&m.identifier);
    match (strategy(m), m.is_array()) {
        (Strategy::Record, false) => {
            src.line(2, format!("self.{}.read_from(buffer, {});", field, at(m.offset)));
        }
        (Strategy::Byte, false) => {
            src.line(2, format!("self.{} = buffer[{}];", field, at(m.offset)));
        }
        (Strategy::Scalar, false) => {
            src.line(2, format!("self.{} = record::read_be(buffer, {});", field, at(m.offset)));
        }
        (Strategy::Byte, true) => {
            src.line(2, format!("self.{}.copy_from_slice(&buffer[{}]);", field, byte_range(m)));
        }
        (Strategy::Record, true) => {
            src.line(2, format!("for (i, item) in self.{}.iter_mut().enumerate() {{", field));
            src.line(3, format!("item.read_from(buffer, {});", element_at(m.offset, m.element_size)));
            src.line(2, "}");
        }
        (Strategy::Scalar, true) => {
            src.line(2, format!("for (i, item) in self.{}.iter_mut().enumerate() {{", field));
            src.line(3, format!("*item = record::read_be(buffer, {});", element_at(m.offset, m.element_size)));
            src.line(2, "}");
        }
    }
}

fn emit_write(src: &mut Source, m: &Member) {
    let field = field_ident(&m.identifier);
    match (strategy(m), m.is_array()) {
        (Strategy::Record, false) => {
            src.line(2, format!("self.{}.write_to(buffer, {});", field, at(m.offset)));
        }
        (Strategy::Byte, false) | (Strategy::Scalar, false) => {
            src.line(2, format!("record::write_be(self.{}, buffer, {});", field, at(m.offset)));
        }
        (Strategy::Byte, true) => {
            src.line(2, format!("buffer[{}].copy_from_slice(&self.{});", byte_range(m), field));
        }
        (Strategy::Record, true) => {
            src.line(2, format!("for (i, item) in self.{}.iter().enumerate() {{", field));
            src.line(3, format!("item.write_to(buffer, {});", element_at(m.offset, m.element_size)));
            src.line(2, "}");
        }
        (Strategy::Scalar, true) => {
            src.line(2, format!("for (i, item) in self.{}.iter().enumerate() {{", field));
            src.line(3, format!("record::write_be(*item, buffer, {});", element_at(m.offset, m.element_size)));
            src.line(2, "}");
        }
    }
}
