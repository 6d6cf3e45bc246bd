// Generated by structgen from `Sample`. Do not edit.

use structgen::record::{self, BinaryRecord, UInt32};

/*
 * Offset Size Type   Identifier Description
 * ---------------------------------------------
 *      0    4 UInt32 id         an identifier
 *      4  1*4 u8[4]  flags      four flag bytes
 */
#[allow(non_snake_case, non_camel_case_types)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    /// an identifier
    pub id: UInt32,

    /// four flag bytes
    pub flags: [u8; 4],
}

impl Sample {
    pub const STRUCT_SIZE: usize = 8;
}

impl Default for Sample {
    fn default() -> Self {
        Self {
            id: Default::default(),
            flags: std::array::from_fn(|_| Default::default()),
        }
    }
}

impl BinaryRecord for Sample {
    fn read_from(&mut self, buffer: &[u8], offset: usize) -> usize {
        self.id = record::read_be(buffer, offset);
        self.flags.copy_from_slice(&buffer[offset + 4..offset + 8]);
        Self::STRUCT_SIZE
    }

    fn write_to(&self, buffer: &mut [u8], offset: usize) {
        record::write_be(self.id, buffer, offset);
        buffer[offset + 4..offset + 8].copy_from_slice(&self.flags);
    }

    fn size(&self) -> usize {
        Self::STRUCT_SIZE
    }
}
