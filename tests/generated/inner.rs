// Generated by structgen from `Inner`. Do not edit.
// Namespace: crate::generated

use structgen::record::{self, BinaryRecord, UInt16};

/*
 * Offset Size Type   Identifier Description
 * -----------------------------------------
 *      0    2 UInt16 kind       record kind
 *      2    2 i16    delta
 */
#[allow(non_snake_case, non_camel_case_types)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inner {
    /// record kind
    pub kind: UInt16,

    pub delta: i16,
}

impl Inner {
    pub const STRUCT_SIZE: usize = 4;
}

impl Default for Inner {
    fn default() -> Self {
        Self {
            kind: Default::default(),
            delta: Default::default(),
        }
    }
}

impl BinaryRecord for Inner {
    fn read_from(&mut self, buffer: &[u8], offset: usize) -> usize {
        self.kind = record::read_be(buffer, offset);
        self.delta = record::read_be(buffer, offset + 2);
        Self::STRUCT_SIZE
    }

    fn write_to(&self, buffer: &mut [u8], offset: usize) {
        record::write_be(self.kind, buffer, offset);
        record::write_be(self.delta, buffer, offset + 2);
    }

    fn size(&self) -> usize {
        Self::STRUCT_SIZE
    }
}
