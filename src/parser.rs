//! Parse struct definitions into members using PEST, resolving every member's size.

use crate::ast::Member;
use crate::catalog::{self, TypeCatalog};
use crate::error::ConvertError;
use crate::resolver::TypeResolver;
use pest::Parser;
use pest_derive::Parser as PestParser;
use std::io;

#[derive(PestParser)]
#[grammar = "grammar.pest"]
struct StructDslParser;

/// Line that closes a member list.
pub const TERMINATOR: &str = "};";

/// A member line split into its three parts. The description is everything after the
/// declarator and is never tokenized further.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberLine<'a> {
    pub type_name: &'a str,
    pub declarator: &'a str,
    pub description: &'a str,
}

/// Split a (trimmed) member line. `None` if it has fewer than two tokens.
pub fn split_member_line(line: &str) -> Option<MemberLine<'_>> {
    let pair = StructDslParser::parse(Rule::member_line, line).ok()?.next()?;
    let mut parts = MemberLine {
        type_name: "",
        declarator: "",
        description: "",
    };
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::type_name => parts.type_name = inner.as_str(),
            Rule::declarator => parts.declarator = inner.as_str(),
            Rule::description => parts.description = inner.as_str().trim(),
            _ => {}
        }
    }
    Some(parts)
}

/// Identifier and array length taken from a declarator token such as `flags[4];`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Declarator<'a> {
    pub identifier: &'a str,
    pub array_length: Option<usize>,
}

/// Parse a declarator token. `name[N];` is an array of `N`; `name;` and `name` are scalars.
/// A bracket suffix without `;` is stripped but leaves the member scalar.
pub fn parse_declarator(token: &str, line: usize) -> Result<Declarator<'_>, ConvertError> {
    let pair = StructDslParser::parse(Rule::declarator_parts, token)
        .ok()
        .and_then(|mut pairs| pairs.next())
        .ok_or_else(|| ConvertError::MalformedMemberLine {
            line,
            text: token.to_string(),
        })?;

    let mut identifier = "";
    let mut length = None;
    let mut terminated = false;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::field_name => identifier = inner.as_str(),
            Rule::array_suffix => {
                let digits = inner
                    .into_inner()
                    .next()
                    .map(|p| p.as_str())
                    .unwrap_or_default();
                let n = digits
                    .parse::<i64>()
                    .ok()
                    .and_then(|n| usize::try_from(n).ok())
                    .ok_or_else(|| ConvertError::InvalidArraySize {
                        declarator: token.to_string(),
                        line,
                    })?;
                length = Some(n);
            }
            Rule::terminator => terminated = true,
            _ => {}
        }
    }

    if length.is_some() && !terminated {
        log::warn!(
            "line {}: `{}` has an array length but no `;`; treating `{}` as a scalar",
            line,
            token,
            identifier
        );
        length = None;
    }
    Ok(Declarator {
        identifier,
        array_length: length,
    })
}

/// Struct name from the header line (`struct Name`). The first token is not checked.
pub fn parse_header(text: &str, line: usize) -> Result<String, ConvertError> {
    let malformed = || ConvertError::MalformedHeader {
        line,
        text: text.to_string(),
    };
    let pair = StructDslParser::parse(Rule::header_line, text.trim())
        .map_err(|_| malformed())?
        .next()
        .ok_or_else(malformed)?;
    pair.into_inner()
        .find(|p| p.as_rule() == Rule::struct_name)
        .map(|p| p.as_str().to_string())
        .ok_or_else(malformed)
}

/// Resolved size of a member's type and where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Sizing {
    size: usize,
    is_class_type: bool,
    id_is_class_name: bool,
}

/// Reads the member list of one struct, consulting and filling the catalog.
pub struct MemberParser<'a> {
    catalog: &'a mut TypeCatalog,
    resolver: &'a mut dyn TypeResolver,
}

impl<'a> MemberParser<'a> {
    pub fn new(catalog: &'a mut TypeCatalog, resolver: &'a mut dyn TypeResolver) -> Self {
        MemberParser { catalog, resolver }
    }

    /// Parse numbered lines until the `};` terminator or the end of input. A blank line
    /// before the first member ends the list; later blank lines are skipped.
    pub fn parse_members<I>(&mut self, lines: I) -> Result<Vec<Member>, ConvertError>
    where
        I: IntoIterator<Item = (usize, io::Result<String>)>,
    {
        let mut members: Vec<Member> = Vec::new();
        let mut offset = 0usize;
        for (line, text) in lines {
            let text = text?;
            let trimmed = text.trim();
            if trimmed == TERMINATOR {
                break;
            }
            if trimmed.is_empty() {
                if members.is_empty() {
                    break;
                }
                continue;
            }
            let member = self.parse_member(trimmed, line, offset)?;
            offset = offset
                .checked_add(member.total_size())
                .ok_or_else(|| ConvertError::InvalidArraySize {
                    declarator: member.identifier.clone(),
                    line,
                })?;
            members.push(member);
        }
        Ok(members)
    }

    /// Parse one member line placed at `offset`.
    pub fn parse_member(
        &mut self,
        text: &str,
        line: usize,
        offset: usize,
    ) -> Result<Member, ConvertError> {
        let parts = split_member_line(text.trim()).ok_or_else(|| {
            ConvertError::MalformedMemberLine {
                line,
                text: text.to_string(),
            }
        })?;
        let sizing = self.resolve_size(parts.type_name, line)?;
        let declarator = parse_declarator(parts.declarator, line)?;
        if let Some(n) = declarator.array_length {
            if sizing.size.checked_mul(n).is_none() {
                return Err(ConvertError::InvalidArraySize {
                    declarator: parts.declarator.to_string(),
                    line,
                });
            }
        }

        let member = Member {
            offset,
            element_size: sizing.size,
            array_length: declarator.array_length,
            type_name: parts.type_name.to_string(),
            target_type: catalog::target_type(parts.type_name).to_string(),
            identifier: declarator.identifier.to_string(),
            description: parts.description.to_string(),
            is_class_type: sizing.is_class_type,
            id_is_class_name: sizing.id_is_class_name,
        };
        log::debug!(
            "member `{}`: {} at offset {} ({} byte(s))",
            member.identifier,
            member.type_cell(),
            member.offset,
            member.total_size()
        );
        Ok(member)
    }

    /// Primitive table, then the catalog, then the resolver.
    fn resolve_size(&mut self, type_name: &str, line: usize) -> Result<Sizing, ConvertError> {
        if let Some(size) = catalog::primitive_size(type_name) {
            return Ok(Sizing {
                size,
                is_class_type: false,
                id_is_class_name: false,
            });
        }
        if let Some(size) = self.catalog.lookup_size(type_name) {
            return Ok(Sizing {
                size,
                is_class_type: true,
                id_is_class_name: false,
            });
        }

        log::info!("line {}: could not determine size for `{}`", line, type_name);
        let resolution = self.resolver.resolve(type_name)?.ok_or_else(|| {
            ConvertError::UnresolvableType {
                type_name: type_name.to_string(),
                line,
            }
        })?;
        self.catalog.record_size(type_name, resolution.size);
        Ok(Sizing {
            size: resolution.size,
            is_class_type: true,
            id_is_class_name: resolution.id_is_class_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{NoResolver, TableResolver};

    fn numbered(src: &str) -> Vec<(usize, io::Result<String>)> {
        src.lines()
            .enumerate()
            .map(|(i, l)| (i + 2, Ok(l.to_string())))
            .collect()
    }

    #[test]
    fn split_keeps_description_verbatim() {
        let parts = split_member_line("UInt16 count;  number of   records (big-endian)").expect("split");
        assert_eq!(parts.type_name, "UInt16");
        assert_eq!(parts.declarator, "count;");
        assert_eq!(parts.description, "number of   records (big-endian)");

        let parts = split_member_line("UInt8\tflag;").expect("split");
        assert_eq!(parts.description, "");

        assert!(split_member_line("UInt8").is_none());
    }

    #[test]
    fn split_on_any_whitespace() {
        let parts = split_member_line("UInt8 a;\u{a0}flag byte").expect("nbsp");
        assert_eq!(parts.declarator, "a;");
        assert_eq!(parts.description, "flag byte");

        let parts = split_member_line("UInt8\u{0b}a;").expect("vertical tab");
        assert_eq!(parts.type_name, "UInt8");
        assert_eq!(parts.declarator, "a;");

        let parts = split_member_line("UInt16\u{2003}\u{3000}count[2];\u{0c}two counts").expect("mixed");
        assert_eq!(parts.type_name, "UInt16");
        assert_eq!(parts.declarator, "count[2];");
        assert_eq!(parts.description, "two counts");

        assert_eq!(parse_header("struct\u{a0}Node", 1).expect("header"), "Node");
    }

    #[test]
    fn member_after_non_space_separator() {
        let mut catalog = TypeCatalog::new();
        let mut resolver = NoResolver;
        let mut parser = MemberParser::new(&mut catalog, &mut resolver);
        let m = parser.parse_member("UInt8\u{0b}a;\u{a0}flag byte", 2, 0).expect("member");
        assert_eq!(m.identifier, "a");
        assert_eq!(m.description, "flag byte");
        assert_eq!(m.element_size, 1);
    }

    #[test]
    fn declarator_array_and_scalar() {
        let d = parse_declarator("field[3];", 1).expect("array");
        assert_eq!(d.identifier, "field");
        assert_eq!(d.array_length, Some(3));

        let d = parse_declarator("field;", 1).expect("scalar");
        assert_eq!(d.identifier, "field");
        assert_eq!(d.array_length, None);

        let d = parse_declarator("field", 1).expect("bare");
        assert_eq!(d.identifier, "field");
        assert_eq!(d.array_length, None);

        let d = parse_declarator("empty[0];", 1).expect("zero length");
        assert_eq!(d.array_length, Some(0));
    }

    #[test]
    fn declarator_bracket_without_terminator_is_scalar() {
        let d = parse_declarator("name[8]", 1).expect("parse");
        assert_eq!(d.identifier, "name");
        assert_eq!(d.array_length, None);
    }

    #[test]
    fn declarator_negative_length_fails() {
        let err = parse_declarator("field[-1];", 7).unwrap_err();
        assert!(
            matches!(err, ConvertError::InvalidArraySize { ref declarator, line: 7 } if declarator == "field[-1];"),
            "{:?}",
            err
        );
        let err = parse_declarator("field[99999999999999999999];", 7).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidArraySize { .. }));
    }

    #[test]
    fn declarator_without_name_is_malformed() {
        assert!(matches!(
            parse_declarator(";", 3),
            Err(ConvertError::MalformedMemberLine { line: 3, .. })
        ));
        assert!(matches!(
            parse_declarator("[4];", 3),
            Err(ConvertError::MalformedMemberLine { .. })
        ));
    }

    #[test]
    fn header_takes_second_token() {
        assert_eq!(parse_header("struct Sample", 1).expect("header"), "Sample");
        assert_eq!(parse_header("  typedef\tNode  extra ", 1).expect("header"), "Node");
        assert!(matches!(
            parse_header("struct", 1),
            Err(ConvertError::MalformedHeader { line: 1, .. })
        ));
        assert!(matches!(parse_header("", 1), Err(ConvertError::MalformedHeader { .. })));
    }

    #[test]
    fn offsets_are_running_sums() {
        let mut catalog = TypeCatalog::new();
        let mut resolver = NoResolver;
        let mut parser = MemberParser::new(&mut catalog, &mut resolver);
        let src = "UInt16 a;\nUInt8 b[3];\nUInt64 c;\nChar d;\n};\nUInt8 ignored;";
        let members = parser.parse_members(numbered(src)).expect("parse");
        let offsets: Vec<_> = members.iter().map(|m| m.offset).collect();
        assert_eq!(offsets, [0, 2, 5, 13]);
        for (i, m) in members.iter().enumerate() {
            let before: usize = members[..i].iter().map(Member::total_size).sum();
            assert_eq!(m.offset, before);
        }
    }

    #[test]
    fn blank_lines() {
        let mut catalog = TypeCatalog::new();
        let mut resolver = NoResolver;
        let mut parser = MemberParser::new(&mut catalog, &mut resolver);
        let members = parser.parse_members(numbered("\nUInt8 a;")).expect("parse");
        assert!(members.is_empty());

        let members = parser
            .parse_members(numbered("UInt8 a;\n   \nUInt8 b;"))
            .expect("parse");
        assert_eq!(members.len(), 2);
        assert_eq!(members[1].offset, 1);
    }

    #[test]
    fn catalog_hit_is_class_type() {
        let mut catalog = TypeCatalog::new();
        catalog.record_size("Inner", 6);
        let mut resolver = TableResolver::new();
        let mut parser = MemberParser::new(&mut catalog, &mut resolver);
        let m = parser.parse_member("Inner child; nested", 2, 0).expect("member");
        assert_eq!(m.element_size, 6);
        assert!(m.is_class_type);
        assert!(!m.id_is_class_name);
        assert_eq!(m.target_type, "Inner");
        assert!(resolver.queries().is_empty());
    }

    #[test]
    fn unresolvable_type_is_an_error() {
        let mut catalog = TypeCatalog::new();
        let mut resolver = NoResolver;
        let mut parser = MemberParser::new(&mut catalog, &mut resolver);
        let err = parser.parse_member("Mystery m;", 4, 0).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::UnresolvableType { ref type_name, line: 4 } if type_name == "Mystery"
        ));
        assert!(catalog.is_empty());
    }
}
