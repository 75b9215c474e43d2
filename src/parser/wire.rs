//! Low-level wire-format reader.
//!
//! Reads the tag / wire-type framing used by pprof captures: base-128
//! varints, fixed 32/64-bit little-endian words and length-delimited byte
//! runs. Every read is bounds-checked; running off the end of the buffer
//! yields `None` so callers stop decoding the current message instead of
//! failing the whole capture.

/// Longest legal varint encoding of a u64
const MAX_VARINT_BYTES: usize = 10;

/// Payload of a single field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    /// Wire type 0
    Varint(u64),
    /// Wire type 1
    Fixed64(u64),
    /// Wire type 2
    Bytes(&'a [u8]),
    /// Wire type 5
    Fixed32(u32),
}

impl<'a> FieldValue<'a> {
    /// Integer payload of a varint or fixed64 field
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            FieldValue::Varint(v) | FieldValue::Fixed64(v) => Some(v),
            FieldValue::Fixed32(v) => Some(u64::from(v)),
            FieldValue::Bytes(_) => None,
        }
    }

    /// Two's-complement reinterpretation, as used by `int64` fields
    pub fn as_i64(&self) -> Option<i64> {
        self.as_u64().map(|v| v as i64)
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.as_u64().map(|v| v != 0)
    }

    pub fn as_bytes(&self) -> Option<&'a [u8]> {
        match *self {
            FieldValue::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Append the value(s) of a repeated integer field
    ///
    /// Accepts both the unpacked form (one varint per field) and the packed
    /// form (a length-delimited run of varints).
    pub fn extend_repeated(&self, out: &mut Vec<u64>) {
        match *self {
            FieldValue::Bytes(packed) => out.extend(packed_varints(packed)),
            other => out.extend(other.as_u64()),
        }
    }
}

/// One decoded field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field<'a> {
    pub number: u64,
    pub value: FieldValue<'a>,
}

/// Cursor over one message's bytes
#[derive(Debug, Clone)]
pub struct WireReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Read an unsigned base-128 varint
    pub fn read_varint(&mut self) -> Option<u64> {
        let mut result: u64 = 0;
        for i in 0..MAX_VARINT_BYTES {
            let byte = *self.buf.get(self.pos)?;
            self.pos += 1;
            result |= u64::from(byte & 0x7f) << (7 * i);
            if byte & 0x80 == 0 {
                return Some(result);
            }
        }
        // Continuation bit still set after ten bytes
        None
    }

    pub fn read_fixed64(&mut self) -> Option<u64> {
        let bytes = self.read_bytes(8)?;
        Some(u64::from_le_bytes(bytes.try_into().ok()?))
    }

    pub fn read_fixed32(&mut self) -> Option<u32> {
        let bytes = self.read_bytes(4)?;
        Some(u32::from_le_bytes(bytes.try_into().ok()?))
    }

    /// Borrow the next `len` bytes
    pub fn read_bytes(&mut self, len: u64) -> Option<&'a [u8]> {
        let len = usize::try_from(len).ok()?;
        let end = self.pos.checked_add(len)?;
        let bytes = self.buf.get(self.pos..end)?;
        self.pos = end;
        Some(bytes)
    }

    /// Read the next tag and its payload
    ///
    /// Returns `None` at end of input, on a truncated field, or on a wire
    /// type this format never uses (3, 4, 6, 7). In the last case the rest
    /// of the message is abandoned.
    pub fn next_field(&mut self) -> Option<Field<'a>> {
        if self.is_empty() {
            return None;
        }
        let tag = self.read_varint()?;
        let number = tag >> 3;
        let value = match tag & 7 {
            0 => FieldValue::Varint(self.read_varint()?),
            1 => FieldValue::Fixed64(self.read_fixed64()?),
            2 => {
                let len = self.read_varint()?;
                FieldValue::Bytes(self.read_bytes(len)?)
            }
            5 => FieldValue::Fixed32(self.read_fixed32()?),
            _ => {
                self.pos = self.buf.len();
                return None;
            }
        };
        Some(Field { number, value })
    }
}

impl<'a> Iterator for WireReader<'a> {
    type Item = Field<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_field()
    }
}

/// Decode a packed run of varints, stopping at the first truncated one
pub fn packed_varints(bytes: &[u8]) -> Vec<u64> {
    let mut reader = WireReader::new(bytes);
    let mut out = Vec::new();
    while let Some(v) = reader.read_varint() {
        out.push(v);
    }
    out
}
