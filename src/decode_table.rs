use crate::error::HuffmanError;
use crate::huffman::{HuffmanCode, LimitedHuffman};

/// Width of the window a [`FastDecodeTable`] is indexed with.
pub const WINDOW_BITS: u8 = 16;

const TABLE_SIZE: usize = 1 << WINDOW_BITS;

/// What a 16-bit window starts with.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DecodeEntry {
    /// Bits of the window belonging to the code
    pub length: u8,

    /// The code itself
    pub code: u16,

    /// The decoded symbol, or [`DecodeEntry::ESCAPE`]
    pub symbol: u32,
}

impl DecodeEntry {
    /// Symbol of the long-tail escape code.
    pub const ESCAPE: u32 = u32::MAX;

    pub fn is_escape(&self) -> bool {
        self.symbol == Self::ESCAPE
    }
}

/// Reverse lookup of a canonical code table by the next 16 bits of a stream.
///
/// Every code of `length` bits owns the `2^(16 - length)` windows it
/// prefixes, so decoding a symbol is a single lookup regardless of the code
/// length.
#[derive(Clone)]
pub struct FastDecodeTable {
    entries: Box<[DecodeEntry]>,
}

impl FastDecodeTable {
    /// Builds the table for `codes`, where `codes[i]` is the code of symbol `i`.
    ///
    /// Zero-length codes carry no bits and are skipped.
    pub fn new(codes: &[HuffmanCode]) -> Result<Self, HuffmanError> {
        let mut table = Self::empty();
        for (symbol, &code) in codes.iter().enumerate() {
            table.fill(symbol, code, symbol as u32)?;
        }
        Ok(table)
    }

    /// Builds the table for long-tail codes; the escape code decodes to
    /// [`DecodeEntry::ESCAPE`].
    pub fn from_limited(huffman: &LimitedHuffman) -> Result<Self, HuffmanError> {
        let mut table = Self::empty();
        let mut first_escaped = None;

        for (symbol, &code) in huffman.codes.iter().enumerate() {
            if huffman.long_tail == Some(code) {
                first_escaped.get_or_insert(symbol);
                continue;
            }
            table.fill(symbol, code, symbol as u32)?;
        }

        if let Some(tail) = huffman.long_tail {
            let symbol = first_escaped.unwrap_or(huffman.codes.len());
            table.fill(symbol, tail, DecodeEntry::ESCAPE)?;
        }

        Ok(table)
    }

    fn empty() -> Self {
        Self {
            entries: vec![DecodeEntry::default(); TABLE_SIZE].into_boxed_slice(),
        }
    }

    fn fill(&mut self, symbol: usize, code: HuffmanCode, decoded: u32) -> Result<(), HuffmanError> {
        if code.is_empty() {
            return Ok(());
        }
        if code.length > WINDOW_BITS {
            return Err(HuffmanError::CodeTooLong {
                symbol,
                length: code.length,
            });
        }
        if code.code >> code.length != 0 {
            return Err(HuffmanError::InvalidCode {
                symbol,
                length: code.length,
                code: code.code,
            });
        }

        let shift = WINDOW_BITS - code.length;
        let start = (code.code as usize) << shift;
        let end = (code.code as usize + 1) << shift;

        self.entries[start..end].fill(DecodeEntry {
            length: code.length,
            code: code.code as u16,
            symbol: decoded,
        });

        Ok(())
    }

    /// Decodes the code at the top of `window`.
    ///
    /// Returns `None` when no code prefixes the window.
    #[inline]
    pub fn decode(&self, window: u16) -> Option<DecodeEntry> {
        let entry = self.entries[window as usize];
        (entry.length > 0).then_some(entry)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for FastDecodeTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let covered = self.entries.iter().filter(|entry| entry.length > 0).count();
        f.debug_struct("FastDecodeTable")
            .field("covered", &covered)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::huffman::{build_huffman, build_limited_huffman};

    /// MSB-first bit stream, enough to feed the table in tests.
    #[derive(Default)]
    struct BitWriter {
        bits: Vec<bool>,
    }

    impl BitWriter {
        fn push(&mut self, code: HuffmanCode) {
            for bit in (0..code.length).rev() {
                self.bits.push(code.code >> bit & 1 == 1);
            }
        }

        /// The 16 bits starting at `position`, zero-padded past the end.
        fn window(&self, position: usize) -> u16 {
            (0..16).fold(0u16, |window, offset| {
                let bit = self.bits.get(position + offset).copied().unwrap_or(false);
                window << 1 | bit as u16
            })
        }
    }

    fn decode_all(table: &FastDecodeTable, writer: &BitWriter, count: usize) -> Vec<u32> {
        let mut position = 0;
        let mut symbols = Vec::new();
        for _ in 0..count {
            let entry = table.decode(writer.window(position)).unwrap();
            position += entry.length as usize;
            symbols.push(entry.symbol);
        }
        assert_eq!(position, writer.bits.len());
        symbols
    }

    #[test]
    fn test_every_window_of_a_code_decodes_to_it() {
        let codes = build_huffman(&[5, 1, 1, 2], 8).unwrap();
        let table = FastDecodeTable::new(&codes).unwrap();
        assert_eq!(table.len(), 1 << 16);

        // 110 owns 0xC000..0xE000
        for window in [0xC000u16, 0xC001, 0xDFFF] {
            assert_eq!(
                table.decode(window),
                Some(DecodeEntry {
                    length: 3,
                    code: 0b110,
                    symbol: 1
                })
            );
        }
        assert_eq!(table.decode(0x7FFF).unwrap().symbol, 0);
        assert_eq!(table.decode(0x8000).unwrap().symbol, 3);
        assert_eq!(table.decode(0xFFFF).unwrap().symbol, 2);
    }

    #[test]
    fn test_decodes_a_bit_stream() {
        let message = [0u32, 3, 1, 0, 0, 2, 3, 1, 0];
        let codes = build_huffman(&[5, 1, 1, 2], 8).unwrap();
        let table = FastDecodeTable::new(&codes).unwrap();

        let mut writer = BitWriter::default();
        for &symbol in &message {
            writer.push(codes[symbol as usize]);
        }

        assert_eq!(decode_all(&table, &writer, message.len()), message);
    }

    #[test]
    fn test_uncovered_windows() {
        // A lone 1-bit code leaves half of the windows uncovered
        let table = FastDecodeTable::new(&[HuffmanCode::new(1, 0)]).unwrap();
        assert!(table.decode(0x1234).is_some());
        assert_eq!(table.decode(0x8000), None);
    }

    #[test]
    fn test_zero_length_codes_are_skipped() {
        let table = FastDecodeTable::new(&[HuffmanCode::default(); 3]).unwrap();
        assert_eq!(table.decode(0), None);
        assert_eq!(table.decode(u16::MAX), None);
    }

    #[test]
    fn test_sixteen_bit_code_owns_one_window() {
        let codes = [HuffmanCode::new(1, 0), HuffmanCode::new(16, 0xFFFF)];
        let table = FastDecodeTable::new(&codes).unwrap();
        assert_eq!(table.decode(0xFFFF).unwrap().symbol, 1);
        assert_eq!(table.decode(0xFFFE), None);
    }

    #[test]
    fn test_rejects_long_and_malformed_codes() {
        assert_eq!(
            FastDecodeTable::new(&[HuffmanCode::new(1, 0), HuffmanCode::new(17, 1)]).unwrap_err(),
            HuffmanError::CodeTooLong {
                symbol: 1,
                length: 17
            }
        );
        assert_eq!(
            FastDecodeTable::new(&[HuffmanCode::new(2, 0b100)]).unwrap_err(),
            HuffmanError::InvalidCode {
                symbol: 0,
                length: 2,
                code: 0b100
            }
        );
    }

    #[test]
    fn test_long_tail_escape() {
        let values = [0, 0, 0, 0, 1, 1, 2, 3, 4, 4, 4];
        let limited = build_limited_huffman(&values, 3, 8).unwrap();
        let table = FastDecodeTable::from_limited(&limited).unwrap();

        let mut writer = BitWriter::default();
        for &value in &[4u32, 0, 2, 0] {
            writer.push(limited.code_of(value).unwrap());
        }

        let decoded = decode_all(&table, &writer, 4);
        assert_eq!(decoded, vec![4, 0, DecodeEntry::ESCAPE, 0]);
        assert!(table.decode(0xC000).unwrap().is_escape());
    }
}
