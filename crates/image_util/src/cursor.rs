/// A read past the end of the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfBounds {
    pub offset: usize,
    pub wanted: usize,
    pub len: usize,
}

/// Bounds-checked big-endian reads over a byte slice.
///
/// Absolute reads (`*_at`) leave the position alone; relative reads advance it.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub fn skip(&mut self, n: usize) {
        self.pos = self.pos.saturating_add(n);
    }

    pub fn has_remaining(&self) -> bool {
        self.pos < self.buf.len()
    }

    fn slice_at(&self, offset: usize, wanted: usize) -> Result<&'a [u8], OutOfBounds> {
        offset
            .checked_add(wanted)
            .and_then(|end| self.buf.get(offset..end))
            .ok_or(OutOfBounds {
                offset,
                wanted,
                len: self.buf.len(),
            })
    }

    pub fn u8_at(&self, offset: usize) -> Result<u8, OutOfBounds> {
        Ok(self.slice_at(offset, 1)?[0])
    }

    pub fn u16_be_at(&self, offset: usize) -> Result<u16, OutOfBounds> {
        let b = self.slice_at(offset, 2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    pub fn u32_be_at(&self, offset: usize) -> Result<u32, OutOfBounds> {
        let b = self.slice_at(offset, 4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn starts_with(&self, prefix: &[u8]) -> bool {
        self.buf.starts_with(prefix)
    }

    pub fn read_u8(&mut self) -> Result<u8, OutOfBounds> {
        let v = self.u8_at(self.pos)?;
        self.pos += 1;
        Ok(v)
    }

    pub fn read_u16_be(&mut self) -> Result<u16, OutOfBounds> {
        let v = self.u16_be_at(self.pos)?;
        self.pos += 2;
        Ok(v)
    }
}
