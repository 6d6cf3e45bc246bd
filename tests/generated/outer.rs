// Generated by structgen from `Outer`. Do not edit.
// Namespace: crate::generated

use structgen::record::{self, BinaryRecord, UInt32};
use crate::generated::Inner;

/*
 * Offset Size Type      Identifier Description
 * -----------------------------------------------------
 *      0    4 i32       magic      magic number
 *      4    4 Inner     first      leading record
 *      8  4*2 Inner[2]  rest       trailing records
 *     16    1 u8        tag
 *     17  4*2 UInt32[2] words      two big-endian words
 */
#[allow(non_snake_case, non_camel_case_types)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outer {
    /// magic number
    pub magic: i32,

    /// leading record
    pub first: Inner,

    /// trailing records
    pub rest: [Inner; 2],

    pub tag: u8,

    /// two big-endian words
    pub words: [UInt32; 2],
}

impl Outer {
    pub const STRUCT_SIZE: usize = 25;
}

impl Default for Outer {
    fn default() -> Self {
        Self {
            magic: Default::default(),
            first: Default::default(),
            rest: std::array::from_fn(|_| Default::default()),
            tag: Default::default(),
            words: std::array::from_fn(|_| Default::default()),
        }
    }
}

impl BinaryRecord for Outer {
    fn read_from(&mut self, buffer: &[u8], offset: usize) -> usize {
        self.magic = record::read_be(buffer, offset);
        self.first.read_from(buffer, offset + 4);
        for (i, item) in self.rest.iter_mut().enumerate() {
            item.read_from(buffer, offset + 8 + i * 4);
        }
        self.tag = buffer[offset + 16];
        for (i, item) in self.words.iter_mut().enumerate() {
            *item = record::read_be(buffer, offset + 17 + i * 4);
        }
        Self::STRUCT_SIZE
    }

    fn write_to(&self, buffer: &mut [u8], offset: usize) {
        record::write_be(self.magic, buffer, offset);
        self.first.write_to(buffer, offset + 4);
        for (i, item) in self.rest.iter().enumerate() {
            item.write_to(buffer, offset + 8 + i * 4);
        }
        record::write_be(self.tag, buffer, offset + 16);
        for (i, item) in self.words.iter().enumerate() {
            record::write_be(*item, buffer, offset + 17 + i * 4);
        }
    }

    fn size(&self) -> usize {
        Self::STRUCT_SIZE
    }
}
