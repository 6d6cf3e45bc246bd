//! Errors raised while converting one struct definition.
//!
//! Every variant aborts the struct being converted; nothing is written for it.

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("Malformed header (line {line}): expected `<keyword> <StructName>`, found {text:?}")]
    MalformedHeader { line: usize, text: String },
    #[error("Malformed member (line {line}): expected `<Type> <name>; [description]`, found {text:?}")]
    MalformedMemberLine { line: usize, text: String },
    #[error("Unresolvable type `{type_name}` (line {line}): not a primitive, not cached, and no size was supplied")]
    UnresolvableType { type_name: String, line: usize },
    #[error("Invalid array size in `{declarator}` (line {line})")]
    InvalidArraySize { declarator: String, line: usize },
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),
}
