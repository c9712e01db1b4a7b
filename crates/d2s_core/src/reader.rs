use crate::error::DecodeError;

/// Offset-addressed little-endian view over an immutable save buffer.
#[derive(Debug, Clone, Copy)]
pub struct ByteReader<'a> {
    bytes: &'a [u8],
}

impl<'a> ByteReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_slice(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn read_bytes(&self, offset: usize, len: usize) -> Result<&'a [u8], DecodeError> {
        offset
            .checked_add(len)
            .and_then(|end| self.bytes.get(offset..end))
            .ok_or_else(|| DecodeError::out_of_bounds(offset * 8, (len * 8) as u32, self.len()))
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, DecodeError> {
        Ok(self.read_bytes(offset, 1)?[0])
    }

    pub fn read_u16(&self, offset: usize) -> Result<u16, DecodeError> {
        let b = self.read_bytes(offset, 2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn read_u32(&self, offset: usize) -> Result<u32, DecodeError> {
        let b = self.read_bytes(offset, 4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Null-padded string of at most `len` bytes. Non-ASCII bytes are replaced.
    pub fn read_fixed_string(&self, offset: usize, len: usize) -> Result<String, DecodeError> {
        let bytes = self.read_bytes(offset, len)?;
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(len);
        Ok(String::from_utf8_lossy(&bytes[..end]).into_owned())
    }

    pub fn has_marker(&self, offset: usize, marker: &[u8]) -> bool {
        self.read_bytes(offset, marker.len())
            .is_ok_and(|bytes| bytes == marker)
    }

    /// First offset in `start..end` where `marker` begins. `end` is clamped so
    /// the marker always fits inside the buffer.
    pub fn find_marker(&self, marker: &[u8], start: usize, end: usize) -> Option<usize> {
        let end = end.min((self.len() + 1).saturating_sub(marker.len()));
        (start..end).find(|&offset| self.has_marker(offset, marker))
    }
}

/// LSB-first bit cursor. Bit `n` of the stream is bit `n % 8` of byte `n / 8`.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    pub fn at_byte(bytes: &'a [u8], offset: usize) -> Self {
        Self {
            bytes,
            position: offset * 8,
        }
    }

    /// Current position in bits from the start of the buffer.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Byte holding the next unread bit, or the byte after a partial one.
    pub fn byte_position(&self) -> usize {
        self.position.div_ceil(8)
    }

    pub fn remaining_bits(&self) -> usize {
        (self.bytes.len() * 8).saturating_sub(self.position)
    }

    pub fn read_bits(&mut self, width: u32) -> Result<u32, DecodeError> {
        if width == 0 {
            return Ok(0);
        }
        if width > 32 || width as usize > self.remaining_bits() {
            return Err(DecodeError::out_of_bounds(
                self.position,
                width,
                self.bytes.len(),
            ));
        }

        let mut value: u32 = 0;
        for i in 0..width {
            let bit = self.position + i as usize;
            let set = (self.bytes[bit / 8] >> (bit % 8)) & 1;
            value |= u32::from(set) << i;
        }
        self.position += width as usize;
        Ok(value)
    }

    pub fn read_bit(&mut self) -> Result<bool, DecodeError> {
        Ok(self.read_bits(1)? == 1)
    }

    pub fn skip(&mut self, width: usize) -> Result<(), DecodeError> {
        if width > self.remaining_bits() {
            return Err(DecodeError::out_of_bounds(
                self.position,
                width as u32,
                self.bytes.len(),
            ));
        }
        self.position += width;
        Ok(())
    }

    pub fn align(&mut self) {
        self.position = self.byte_position() * 8;
    }

    /// Characters of `char_bits` each, stopping at a zero character or after
    /// `max_chars`.
    pub fn read_terminated_string(
        &mut self,
        char_bits: u32,
        max_chars: usize,
    ) -> Result<String, DecodeError> {
        let mut out = String::new();
        for _ in 0..max_chars {
            let c = self.read_bits(char_bits)?;
            if c == 0 {
                break;
            }
            out.push(char::from_u32(c).unwrap_or(char::REPLACEMENT_CHARACTER));
        }
        Ok(out)
    }
}

/// LSB-first bit writer, the inverse of [`BitReader`].
#[derive(Debug, Clone, Default)]
pub struct BitWriter {
    bytes: Vec<u8>,
    position: usize,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn write_bits(&mut self, value: u32, width: u32) {
        for i in 0..width {
            let bit = self.position + i as usize;
            if bit / 8 >= self.bytes.len() {
                self.bytes.push(0);
            }
            if (value >> i) & 1 == 1 {
                self.bytes[bit / 8] |= 1 << (bit % 8);
            }
        }
        self.position += width as usize;
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.write_bits(u32::from(b), 8);
        }
    }

    pub fn align(&mut self) {
        self.position = self.position.div_ceil(8) * 8;
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_lsb_first_across_byte_boundary() {
        let data = [0b1010_1100, 0b0000_0011];
        let mut r = BitReader::new(&data);
        assert_eq!(r.read_bits(2).unwrap(), 0b00);
        assert_eq!(r.read_bits(4).unwrap(), 0b1011);
        assert_eq!(r.read_bits(4).unwrap(), 0b1110);
        assert_eq!(r.position(), 10);
    }

    #[test]
    fn zero_width_read_does_not_advance() {
        let data = [0xFF];
        let mut r = BitReader::new(&data);
        assert_eq!(r.read_bits(0).unwrap(), 0);
        assert_eq!(r.position(), 0);
    }

    #[test]
    fn read_past_end_is_out_of_bounds() {
        let data = [0xFF];
        let mut r = BitReader::new(&data);
        r.read_bits(5).unwrap();
        assert!(matches!(
            r.read_bits(4),
            Err(DecodeError::OutOfBounds { bit: 5, width: 4, len: 1 })
        ));
        assert_eq!(r.position(), 5);
    }

    #[test]
    fn writer_output_reads_back() {
        let mut w = BitWriter::new();
        w.write_bits(0x1FF, 9);
        w.write_bits(30, 10);
        w.write_bits(u32::MAX, 32);
        let bytes = w.into_bytes();

        let mut r = BitReader::new(&bytes);
        assert_eq!(r.read_bits(9).unwrap(), 0x1FF);
        assert_eq!(r.read_bits(10).unwrap(), 30);
        assert_eq!(r.read_bits(32).unwrap(), u32::MAX);
    }

    #[test]
    fn align_moves_to_next_byte() {
        let data = [0u8; 4];
        let mut r = BitReader::new(&data);
        r.read_bits(3).unwrap();
        r.align();
        assert_eq!(r.position(), 8);
        r.align();
        assert_eq!(r.position(), 8);
    }

    #[test]
    fn byte_reader_fixed_string_stops_at_null() {
        let data = *b"Hero\0\0\0\0";
        let r = ByteReader::new(&data);
        assert_eq!(r.read_fixed_string(0, 8).unwrap(), "Hero");
        assert!(r.read_u32(6).is_err());
    }

    #[test]
    fn find_marker_respects_window() {
        let data = *b"..gf..gf";
        let r = ByteReader::new(&data);
        assert_eq!(r.find_marker(b"gf", 0, 8), Some(2));
        assert_eq!(r.find_marker(b"gf", 3, 8), Some(6));
        assert_eq!(r.find_marker(b"gf", 3, 5), None);
    }
}
