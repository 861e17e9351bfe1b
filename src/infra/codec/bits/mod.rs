//! Low-level components dedicated to bit manipulation for CAN buffers.
//!
//! Fields are laid out LSB first inside each byte: the first field read from
//! byte 0 is bit 0, the next one bit 1 and so on. Reading `mains`, `drive`,
//! `dir`... in order therefore walks a flag byte from bit 0 to bit 7, and a
//! 2-bit read followed by a 6-bit read splits a byte into its low and high
//! parts.
use crate::error::{DecodeError, EncodeError};

/// Reader that extracts bit segments from a `&[u8]` without copies.
pub struct BitReader<'a> {
    /// Shared source buffer (typically the received frame payload).
    buffer: &'a [u8],
    /// Current index expressed as number of bits read from the beginning.
    bit_cursor: usize,
}

impl<'a> BitReader<'a> {
    /// Create a reader positioned at the start of the provided buffer.
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            bit_cursor: 0,
        }
    }

    /// Current position in bits.
    pub fn bit_cursor(&self) -> usize {
        self.bit_cursor
    }

    fn ensure(&self, num_bits: usize) -> Result<(), DecodeError> {
        let end = self.bit_cursor + num_bits;
        if end > self.buffer.len() * 8 {
            return Err(DecodeError::TooShort {
                expected: end.div_ceil(8),
                actual: self.buffer.len(),
            });
        }
        Ok(())
    }

    /// Read `num_bits` (1 to 16) bits starting at the current cursor.
    pub fn read_bits(&mut self, num_bits: u8) -> Result<u16, DecodeError> {
        debug_assert!((1..=16).contains(&num_bits));
        self.ensure(num_bits as usize)?;

        let mut result: u16 = 0;
        let mut bits_read = 0usize;
        while bits_read < num_bits as usize {
            let index = (self.bit_cursor + bits_read) / 8;
            let offset = (self.bit_cursor + bits_read) % 8;
            let chunk = (8 - offset).min(num_bits as usize - bits_read);

            let mask = ((1u16 << chunk) - 1) as u8;
            let value = (self.buffer[index] >> offset) & mask;
            result |= (value as u16) << bits_read;

            bits_read += chunk;
        }
        self.bit_cursor += num_bits as usize;
        Ok(result)
    }

    /// Read a single-bit flag.
    pub fn read_flag(&mut self) -> Result<bool, DecodeError> {
        self.read_bits(1).map(|bit| bit == 1)
    }

    /// Read up to 8 bits.
    pub fn read_u8(&mut self, num_bits: u8) -> Result<u8, DecodeError> {
        debug_assert!(num_bits <= 8);
        self.read_bits(num_bits).map(|value| value as u8)
    }

    /// Read two aligned bytes as a big-endian value (MSB first on the wire).
    pub fn read_u16_be(&mut self) -> Result<u16, DecodeError> {
        let bytes = self.read_slice(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    /// Advance the cursor by `num_bits` without reading data.
    pub fn skip(&mut self, num_bits: u8) -> Result<(), DecodeError> {
        self.ensure(num_bits as usize)?;
        self.bit_cursor += num_bits as usize;
        Ok(())
    }

    /// Return `len` bytes from the current position. The cursor must sit on a
    /// byte boundary.
    pub fn read_slice(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        debug_assert!(self.bit_cursor % 8 == 0, "unaligned slice read");
        self.ensure(len * 8)?;
        let start = self.bit_cursor / 8;
        self.bit_cursor += len * 8;
        Ok(&self.buffer[start..start + len])
    }

    /// Every byte left after the cursor (aligned).
    pub fn remaining(&mut self) -> &'a [u8] {
        let start = self.bit_cursor.div_ceil(8).min(self.buffer.len());
        self.bit_cursor = self.buffer.len() * 8;
        &self.buffer[start..]
    }
}

//==================================================================================BITWRITER

/// Writer able to lay bit segments into a `&mut [u8]` using the same bit order
/// as [`BitReader`].
pub struct BitWriter<'a> {
    /// Target buffer (typically the payload of the frame under construction).
    buffer: &'a mut [u8],
    /// Current position expressed in bits written.
    bit_cursor: usize,
}

impl<'a> BitWriter<'a> {
    /// Create a writer positioned at the start of the buffer.
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self {
            buffer,
            bit_cursor: 0,
        }
    }

    /// Number of bytes touched so far (rounded up).
    pub fn bytes_written(&self) -> usize {
        self.bit_cursor.div_ceil(8)
    }

    fn ensure(&self, num_bits: usize) -> Result<(), EncodeError> {
        let end = self.bit_cursor + num_bits;
        if end > self.buffer.len() * 8 {
            return Err(EncodeError::PayloadTooLong {
                max: self.buffer.len(),
                actual: end.div_ceil(8),
            });
        }
        Ok(())
    }

    /// Write the `num_bits` (1 to 16) low bits of `value`.
    pub fn write_bits(&mut self, value: u16, num_bits: u8) -> Result<(), EncodeError> {
        debug_assert!((1..=16).contains(&num_bits));
        self.ensure(num_bits as usize)?;

        let mut remaining = value;
        let mut bits_written = 0usize;
        while bits_written < num_bits as usize {
            let index = (self.bit_cursor + bits_written) / 8;
            let offset = (self.bit_cursor + bits_written) % 8;
            let chunk = (8 - offset).min(num_bits as usize - bits_written);

            let mask = ((1u16 << chunk) - 1) as u8;
            self.buffer[index] &= !(mask << offset);
            self.buffer[index] |= (remaining as u8 & mask) << offset;
            remaining >>= chunk;

            bits_written += chunk;
        }
        self.bit_cursor += num_bits as usize;
        Ok(())
    }

    /// Write a single-bit flag.
    pub fn write_flag(&mut self, flag: bool) -> Result<(), EncodeError> {
        self.write_bits(flag as u16, 1)
    }

    /// Write up to 8 bits.
    pub fn write_u8(&mut self, value: u8, num_bits: u8) -> Result<(), EncodeError> {
        debug_assert!(num_bits <= 8);
        self.write_bits(value as u16, num_bits)
    }

    /// Write a 16-bit value as two aligned bytes, MSB first.
    pub fn write_u16_be(&mut self, value: u16) -> Result<(), EncodeError> {
        self.write_slice(&value.to_be_bytes())
    }

    /// Advance the cursor, leaving the skipped bits cleared.
    pub fn skip(&mut self, num_bits: u8) -> Result<(), EncodeError> {
        self.ensure(num_bits as usize)?;
        let mut left = num_bits;
        while left > 0 {
            let chunk = left.min(16);
            self.write_bits(0, chunk)?;
            left -= chunk;
        }
        Ok(())
    }

    /// Copy an aligned byte slice into the buffer.
    pub fn write_slice(&mut self, slice: &[u8]) -> Result<(), EncodeError> {
        debug_assert!(self.bit_cursor % 8 == 0, "unaligned slice write");
        self.ensure(slice.len() * 8)?;
        let start = self.bit_cursor / 8;
        self.buffer[start..start + slice.len()].copy_from_slice(slice);
        self.bit_cursor += slice.len() * 8;
        Ok(())
    }
}
