//! # structgen - fixed-layout struct DSL to Rust record code
//!
//! Reads a compact, line-oriented description of a fixed-layout binary record and
//! generates a Rust struct that reads and writes that record from/to a byte buffer at a
//! given offset: fields in declaration order, big-endian integers, fixed-size arrays, no
//! padding.
//!
//! ## DSL structure
//!
//! - **Header**: `<keyword> <StructName>` (the keyword is not checked)
//! - **Members**: `<Type> <name>; description` or `<Type> <name>[N]; description`
//! - **Terminator**: `};` on its own line (or end of input)
//!
//! ## Types
//!
//! - Primitives: `UInt8`, `SInt8`, `Char` (1), `UInt16`, `SInt16` (2), `UInt32`, `SInt32`,
//!   `be32` (4), `UInt64`, `SInt64`, `be64` (8)
//! - Structs converted earlier in the same run (nested records)
//! - Anything else is sized by a [`TypeResolver`]: an operator prompt, a table or a closure.
//!   A negative answer marks the type as a record type.
//!
//! ## Example DSL
//!
//! ```text
//! struct Sample
//! UInt32 id; an identifier
//! UInt8 flags[4]; four flag bytes
//! };
//! ```
//!
//! ## Usage
//!
//! ```
//! use structgen::ConversionSession;
//!
//! let mut session = ConversionSession::non_interactive("");
//! let code = session
//!     .convert_str("struct Sample\nUInt32 id; an identifier\nUInt8 flags[4]; four flag bytes\n};\n")
//!     .unwrap();
//! assert!(code.contains("pub const STRUCT_SIZE: usize = 8;"));
//! assert_eq!(session.catalog().lookup_size("Sample"), Some(8));
//! ```
//!
//! Generated code depends on this crate's [`record`] module at runtime.

pub mod ast;
pub mod batch;
pub mod catalog;
pub mod emit;
pub mod error;
pub mod layout;
pub mod parser;
pub mod record;
pub mod resolver;
pub mod session;

pub use ast::{Member, StructDef};
pub use catalog::{primitive_size, target_type, CatalogError, TypeCatalog};
pub use emit::RecordEmitter;
pub use error::ConvertError;
pub use layout::LayoutTable;
pub use parser::MemberParser;
pub use record::BinaryRecord;
pub use resolver::{NoResolver, PromptResolver, Resolution, TableResolver, TypeResolver};
pub use session::ConversionSession;
