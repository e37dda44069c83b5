use crate::error::ProtocolError;

/// Helper for reading little-endian binary data with automatic cursor advancement.
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    #[inline]
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Takes the next `N` bytes or fails without moving the cursor.
    fn take<const N: usize>(&mut self) -> Result<[u8; N], ProtocolError> {
        let bytes = self
            .data
            .get(self.pos..self.pos + N)
            .and_then(|slice| <[u8; N]>::try_from(slice).ok())
            .ok_or(ProtocolError::PacketTooShort {
                expected: self.pos + N,
                got: self.data.len(),
            })?;
        self.pos += N;
        Ok(bytes)
    }

    #[inline]
    pub fn read_u8(&mut self) -> Result<u8, ProtocolError> {
        Ok(u8::from_le_bytes(self.take()?))
    }

    #[inline]
    pub fn read_u16(&mut self) -> Result<u16, ProtocolError> {
        Ok(u16::from_le_bytes(self.take()?))
    }

    #[inline]
    pub fn read_f32(&mut self) -> Result<f32, ProtocolError> {
        Ok(f32::from_le_bytes(self.take()?))
    }

    #[inline]
    #[must_use]
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_little_endian_values() {
        let data = [0x01, 0x34, 0x12, 0x00, 0x00, 0x80, 0x3F];
        let mut r = Reader::new(&data);

        assert_eq!(r.read_u8().unwrap(), 1);
        assert_eq!(r.read_u16().unwrap(), 0x1234);
        assert!((r.read_f32().unwrap() - 1.0).abs() < f32::EPSILON);
        assert!(r.remaining().is_empty());
    }

    #[test]
    fn short_read_keeps_cursor() {
        let data = [0x01, 0x02, 0x03];
        let mut r = Reader::new(&data);
        r.read_u16().unwrap();

        let err = r.read_u16().unwrap_err();
        assert_eq!(err, ProtocolError::PacketTooShort { expected: 4, got: 3 });
        assert_eq!(r.position(), 2);
        assert_eq!(r.read_u8().unwrap(), 0x03);
    }
}
