//! Runtime support for generated records.
//!
//! Every generated struct implements [`BinaryRecord`]. Nested records are decoded and
//! encoded by calling the nested type's own implementation; primitive fields go through
//! [`read_be`] / [`write_be`]. All multi-byte values are big-endian.
//!
//! Like plain slice indexing, every routine here panics when the buffer is too short for
//! the record at the requested offset.

use byteorder::{BigEndian, ByteOrder};

/// DSL primitives whose names pass through to generated code unchanged.
pub type UInt16 = u16;
pub type UInt32 = u32;
pub type UInt64 = u64;

/// A fixed-size record that can be read from and written to a byte buffer.
pub trait BinaryRecord {
    /// Populate `self` from `buffer[offset..]`. Returns the number of bytes consumed.
    fn read_from(&mut self, buffer: &[u8], offset: usize) -> usize;

    /// Write `self` into `buffer[offset..]`.
    fn write_to(&self, buffer: &mut [u8], offset: usize);

    /// Encoded size in bytes.
    fn size(&self) -> usize;
}

/// Integer with a fixed big-endian encoding.
pub trait BeScalar: Copy {
    const WIDTH: usize;

    fn from_be_slice(bytes: &[u8]) -> Self;
    fn to_be_slice(self, bytes: &mut [u8]);
}

impl BeScalar for u8 {
    const WIDTH: usize = 1;

    fn from_be_slice(bytes: &[u8]) -> Self {
        bytes[0]
    }
    fn to_be_slice(self, bytes: &mut [u8]) {
        bytes[0] = self;
    }
}

impl BeScalar for i8 {
    const WIDTH: usize = 1;

    fn from_be_slice(bytes: &[u8]) -> Self {
        bytes[0] as i8
    }
    fn to_be_slice(self, bytes: &mut [u8]) {
        bytes[0] = self as u8;
    }
}

macro_rules! be_scalar {
    ($ty:ty, $width:expr, $read:ident, $write:ident) => {
        impl BeScalar for $ty {
            const WIDTH: usize = $width;

            fn from_be_slice(bytes: &[u8]) -> Self {
                BigEndian::$read(bytes)
            }
            fn to_be_slice(self, bytes: &mut [u8]) {
                BigEndian::$write(bytes, self)
            }
        }
    };
}

be_scalar!(u16, 2, read_u16, write_u16);
be_scalar!(i16, 2, read_i16, write_i16);
be_scalar!(u32, 4, read_u32, write_u32);
be_scalar!(i32, 4, read_i32, write_i32);
be_scalar!(u64, 8, read_u64, write_u64);
be_scalar!(i64, 8, read_i64, write_i64);

/// Read a big-endian scalar at `offset`.
pub fn read_be<T: BeScalar>(buffer: &[u8], offset: usize) -> T {
    T::from_be_slice(&buffer[offset..offset + T::WIDTH])
}

/// Write a big-endian scalar at `offset`.
pub fn write_be<T: BeScalar>(value: T, buffer: &mut [u8], offset: usize) {
    value.to_be_slice(&mut buffer[offset..offset + T::WIDTH])
}

/// Decode a fresh record from `buffer` at `offset`.
pub fn decode<T: BinaryRecord + Default>(buffer: &[u8], offset: usize) -> T {
    let mut record = T::default();
    record.read_from(buffer, offset);
    record
}

/// Encode a record into a new buffer of exactly [`BinaryRecord::size`] bytes.
pub fn encode_to_vec<T: BinaryRecord + ?Sized>(record: &T) -> Vec<u8> {
    let mut buffer = vec![0u8; record.size()];
    record.write_to(&mut buffer, 0);
    buffer
}
