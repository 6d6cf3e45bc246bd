//! Parsed struct definitions: members with their resolved layout.

/// One field of a struct definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Byte offset from the start of the struct (sum of the preceding members' sizes).
    pub offset: usize,
    /// Size of one element of `type_name`.
    pub element_size: usize,
    /// `None` for a scalar, `Some(n)` for a fixed array of `n` elements.
    pub array_length: Option<usize>,
    /// Type token as written in the definition.
    pub type_name: String,
    /// Rust element type used in generated code.
    pub target_type: String,
    pub identifier: String,
    pub description: String,
    /// The type is another record (catalog hit or resolver answer) rather than a primitive.
    pub is_class_type: bool,
    /// The resolver was answered with a negative size.
    pub id_is_class_name: bool,
}

impl Member {
    pub fn total_size(&self) -> usize {
        self.element_size * self.array_length.unwrap_or(1)
    }

    pub fn is_array(&self) -> bool {
        self.array_length.is_some()
    }

    /// `"4"` for scalars, `"1*4"` for arrays.
    pub fn size_cell(&self) -> String {
        match self.array_length {
            Some(n) => format!("{}*{}", self.element_size, n),
            None => self.element_size.to_string(),
        }
    }

    /// `"u8"` for scalars, `"u8[4]"` for arrays.
    pub fn type_cell(&self) -> String {
        match self.array_length {
            Some(n) => format!("{}[{}]", self.target_type, n),
            None => self.target_type.clone(),
        }
    }
}

/// A struct definition with its members in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDef {
    pub name: String,
    pub members: Vec<Member>,
}

impl StructDef {
    pub fn total_size(&self) -> usize {
        self.members.iter().map(Member::total_size).sum()
    }

    pub fn get_member(&self, identifier: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.identifier == identifier)
    }
}
