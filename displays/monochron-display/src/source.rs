//! Byte sources for bitmaps and strings
//!
//! Drawing functions read their input one byte at a time through
//! [`ByteSource`], so data can live in RAM or in a separately addressed
//! program store (e.g. AVR flash, external EEPROM) without duplicating the
//! drawing code.

/// Random-access, read-only byte sequence
pub trait ByteSource {
    /// Number of bytes available
    fn len(&self) -> usize;

    /// Byte at `offset`, or `None` past the end
    fn byte_at(&self, offset: usize) -> Option<u8>;

    /// Whether the source holds no bytes
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ByteSource for [u8] {
    fn len(&self) -> usize {
        <[u8]>::len(self)
    }

    fn byte_at(&self, offset: usize) -> Option<u8> {
        self.get(offset).copied()
    }
}

impl<const N: usize> ByteSource for [u8; N] {
    fn len(&self) -> usize {
        N
    }

    fn byte_at(&self, offset: usize) -> Option<u8> {
        self.get(offset).copied()
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &S {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn byte_at(&self, offset: usize) -> Option<u8> {
        (**self).byte_at(offset)
    }
}

/// Data fetched through a platform read function
///
/// `read` receives an offset relative to the start of the stored object and
/// must return the byte there; it is only called for offsets below `len`.
///
/// ```rust, ignore
/// // AVR-style program memory
/// let logo = ProgramStore::new(LOGO_LEN, |i| pgm_read_byte(LOGO_ADDR + i));
/// oled.draw_bitmap_from(0, 0, 32, 16, &logo, Color::White);
/// ```
pub struct ProgramStore<F> {
    len: usize,
    read: F,
}

impl<F: Fn(usize) -> u8> ProgramStore<F> {
    /// Wrap a read function covering `len` bytes
    pub const fn new(len: usize, read: F) -> Self {
        Self { len, read }
    }
}

impl<F: Fn(usize) -> u8> ByteSource for ProgramStore<F> {
    fn len(&self) -> usize {
        self.len
    }

    fn byte_at(&self, offset: usize) -> Option<u8> {
        if offset < self.len {
            Some((self.read)(offset))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_source() {
        let data: &[u8] = &[1, 2, 3];
        assert_eq!(ByteSource::len(data), 3);
        assert_eq!(data.byte_at(2), Some(3));
        assert_eq!(data.byte_at(3), None);
    }

    #[test]
    fn test_program_store_bounds() {
        let rom = [0xAAu8, 0x55];
        let store = ProgramStore::new(2, |i| rom[i]);
        assert_eq!(store.byte_at(0), Some(0xAA));
        assert_eq!(store.byte_at(1), Some(0x55));
        assert_eq!(store.byte_at(2), None);
        assert!(!store.is_empty());
    }
}
