//! Unknown-type resolution: the fallback consulted when a member's type is neither a
//! primitive nor already in the catalog.
//!
//! An answer is a signed byte count. A negative answer marks the type as a record
//! ("the id is a class name"); its magnitude is the size. Zero is never a valid size.

use std::collections::HashMap;
use std::io::{self, BufRead, Write};

/// Resolved size of an unknown type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub size: usize,
    pub id_is_class_name: bool,
}

impl Resolution {
    /// Interpret a signed answer. Returns `None` for zero.
    pub fn from_answer(answer: i64) -> Option<Self> {
        let size = usize::try_from(answer.unsigned_abs()).ok()?;
        if size == 0 {
            return None;
        }
        Some(Resolution {
            size,
            id_is_class_name: answer < 0,
        })
    }
}

/// Supplies sizes for types the parser cannot size by itself.
pub trait TypeResolver {
    /// Size for `type_name`, or `Ok(None)` when the resolver declines.
    fn resolve(&mut self, type_name: &str) -> io::Result<Option<Resolution>>;
}

impl<F> TypeResolver for F
where
    F: FnMut(&str) -> Option<Resolution>,
{
    fn resolve(&mut self, type_name: &str) -> io::Result<Option<Resolution>> {
        Ok(self(type_name))
    }
}

/// Declines every query, so the first unknown type fails the conversion.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoResolver;

impl TypeResolver for NoResolver {
    fn resolve(&mut self, _type_name: &str) -> io::Result<Option<Resolution>> {
        Ok(None)
    }
}

/// Fixed answers by type name, optionally falling back to another resolver.
#[derive(Default)]
pub struct TableResolver {
    answers: HashMap<String, i64>,
    fallback: Option<Box<dyn TypeResolver>>,
    queries: Vec<String>,
}

impl TableResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`TableResolver::insert`].
    pub fn with(mut self, type_name: &str, answer: i64) -> Self {
        self.insert(type_name, answer);
        self
    }

    pub fn insert(&mut self, type_name: &str, answer: i64) {
        self.answers.insert(type_name.to_string(), answer);
    }

    /// Consult `fallback` for names with no fixed answer.
    pub fn or_else(mut self, fallback: Box<dyn TypeResolver>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Names this resolver was asked about, in order.
    pub fn queries(&self) -> &[String] {
        &self.queries
    }
}

impl TypeResolver for TableResolver {
    fn resolve(&mut self, type_name: &str) -> io::Result<Option<Resolution>> {
        self.queries.push(type_name.to_string());
        match self.answers.get(type_name) {
            Some(&answer) => Ok(Resolution::from_answer(answer)),
            None => match self.fallback.as_mut() {
                Some(fallback) => fallback.resolve(type_name),
                None => Ok(None),
            },
        }
    }
}

/// Blocking operator prompt. Malformed answers are re-prompted; end of input declines.
pub struct PromptResolver<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptResolver<R, W> {
    pub fn new(input: R, output: W) -> Self {
        PromptResolver { input, output }
    }
}

impl PromptResolver<io::StdinLock<'static>, io::Stderr> {
    /// Prompt on stderr and read answers from stdin.
    pub fn stdio() -> Self {
        PromptResolver::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> TypeResolver for PromptResolver<R, W> {
    fn resolve(&mut self, type_name: &str) -> io::Result<Option<Resolution>> {
        writeln!(self.output, "Could not determine size for: \"{}\"", type_name)?;
        loop {
            writeln!(self.output, "Input type size (\"-\" first means id is a class): ")?;
            self.output.flush()?;
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                log::warn!("no answer for type `{}` (end of input)", type_name);
                return Ok(None);
            }
            match line.trim().parse::<i64>().ok().and_then(Resolution::from_answer) {
                Some(resolution) => return Ok(Some(resolution)),
                None => writeln!(self.output, "Invalid input!")?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn negative_answer_marks_class_name() {
        let r = Resolution::from_answer(-12).expect("resolution");
        assert_eq!(r.size, 12);
        assert!(r.id_is_class_name);
        let r = Resolution::from_answer(6).expect("resolution");
        assert_eq!(r.size, 6);
        assert!(!r.id_is_class_name);
        assert!(Resolution::from_answer(0).is_none());
    }

    #[test]
    fn prompt_reprompts_on_malformed_input() {
        let input = Cursor::new("abc\n0\n\n-12\n");
        let mut output = Vec::new();
        let answer = PromptResolver::new(input, &mut output)
            .resolve("ExtentRecord")
            .expect("io");
        assert_eq!(
            answer,
            Some(Resolution {
                size: 12,
                id_is_class_name: true
            })
        );
        let text = String::from_utf8(output).expect("utf8");
        assert!(text.starts_with("Could not determine size for: \"ExtentRecord\"\n"));
        assert_eq!(text.matches("Invalid input!").count(), 3);
        assert_eq!(text.matches("Input type size").count(), 4);
    }

    #[test]
    fn prompt_declines_at_end_of_input() {
        let mut output = Vec::new();
        let answer = PromptResolver::new(Cursor::new("nope\n"), &mut output)
            .resolve("Mystery")
            .expect("io");
        assert_eq!(answer, None);
    }

    #[test]
    fn table_records_queries_and_falls_back() {
        let fallback = |name: &str| (name == "Late").then(|| Resolution::from_answer(3)).flatten();
        let mut table = TableResolver::new()
            .with("Known", -8)
            .or_else(Box::new(fallback));
        assert_eq!(table.resolve("Known").expect("io").map(|r| r.size), Some(8));
        assert_eq!(table.resolve("Late").expect("io").map(|r| r.size), Some(3));
        assert_eq!(table.resolve("Other").expect("io"), None);
        assert_eq!(table.queries(), ["Known", "Late", "Other"]);
    }
}
