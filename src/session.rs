//! One conversion run: owns the type catalog and the unknown-type resolver, and turns
//! struct definitions into generated source one at a time.
//!
//! Every converted struct's total size is recorded in the catalog, so a later struct in
//! the same run can use it as a member type without asking the resolver.

use crate::ast::StructDef;
use crate::catalog::TypeCatalog;
use crate::emit::RecordEmitter;
use crate::error::ConvertError;
use crate::parser::{self, MemberParser};
use crate::resolver::{NoResolver, TypeResolver};
use std::io::{BufRead, Write};

pub struct ConversionSession {
    catalog: TypeCatalog,
    resolver: Box<dyn TypeResolver>,
    emitter: RecordEmitter,
}

impl ConversionSession {
    pub fn new(namespace: &str, resolver: Box<dyn TypeResolver>) -> Self {
        ConversionSession {
            catalog: TypeCatalog::new(),
            resolver,
            emitter: RecordEmitter::new(namespace),
        }
    }

    /// Session that fails on any type it cannot size from primitives or the catalog.
    pub fn non_interactive(namespace: &str) -> Self {
        Self::new(namespace, Box::new(NoResolver))
    }

    /// Start from a pre-seeded catalog.
    pub fn with_catalog(mut self, catalog: TypeCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    pub fn into_catalog(self) -> TypeCatalog {
        self.catalog
    }

    pub fn namespace(&self) -> &str {
        self.emitter.namespace()
    }

    /// Read one struct definition (header line, members, terminator) and record its size.
    pub fn read_struct<R: BufRead>(&mut self, reader: R) -> Result<StructDef, ConvertError> {
        let mut lines = reader.lines().enumerate().map(|(i, l)| (i + 1, l));
        let name = match lines.next() {
            Some((line, text)) => parser::parse_header(&text?, line)?,
            None => {
                return Err(ConvertError::MalformedHeader {
                    line: 1,
                    text: String::new(),
                })
            }
        };
        log::info!("converting struct `{}`", name);

        let members =
            MemberParser::new(&mut self.catalog, self.resolver.as_mut()).parse_members(&mut lines)?;
        let def = StructDef { name, members };
        let total = def.total_size();
        self.catalog.record_size(&def.name, total);
        log::info!(
            "struct `{}`: {} member(s), {} byte(s)",
            def.name,
            def.members.len(),
            total
        );
        Ok(def)
    }

    /// Render a parsed definition.
    pub fn render(&self, def: &StructDef) -> String {
        self.emitter.emit(def)
    }

    /// Convert one struct from `reader` into `writer`. Nothing is written unless the whole
    /// definition parses.
    pub fn convert<R: BufRead, W: Write>(
        &mut self,
        reader: R,
        writer: &mut W,
    ) -> Result<StructDef, ConvertError> {
        let def = self.read_struct(reader)?;
        let text = self.render(&def);
        writer.write_all(text.as_bytes())?;
        writer.flush()?;
        Ok(def)
    }

    pub fn convert_str(&mut self, source: &str) -> Result<String, ConvertError> {
        let def = self.read_struct(source.as_bytes())?;
        Ok(self.render(&def))
    }
}
