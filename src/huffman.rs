use crate::error::HuffmanError;
use std::fmt;

/// Longest code length [`code_lengths`] accepts.
pub const MAX_CODE_LENGTH: u8 = 32;

/// A canonical Huffman code: the low `length` bits of `code`, most
/// significant bit first.
///
/// A zero length means the symbol needs no bits.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HuffmanCode {
    pub length: u8,
    pub code: u32,
}

impl HuffmanCode {
    pub fn new(length: u8, code: u32) -> Self {
        Self { length, code }
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}

impl fmt::Display for HuffmanCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.length == 0 {
            return Ok(());
        }
        write!(f, "{:0width$b}", self.code, width = self.length as usize)
    }
}

/// Codes built with a cap on the number of individually coded symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitedHuffman {
    /// One code per value; values in the long tail share the escape code
    pub codes: Vec<HuffmanCode>,

    /// The escape code, when some values were collapsed into the tail
    pub long_tail: Option<HuffmanCode>,
}

impl LimitedHuffman {
    /// Whether `value` must be written as the escape code followed by a
    /// fallback representation.
    pub fn escapes(&self, value: u32) -> bool {
        match self.long_tail {
            Some(tail) => self
                .codes
                .get(value as usize)
                .map_or(true, |&code| code == tail),
            None => false,
        }
    }

    /// The code written for `value`: its own, or the escape code.
    pub fn code_of(&self, value: u32) -> Option<HuffmanCode> {
        self.codes.get(value as usize).copied().or(self.long_tail)
    }
}

// ============================================================================
// Frequencies
// ============================================================================

/// Counts every value of `values`, indexed by value.
///
/// The table covers `0..=max(values)` and is empty for empty input.
pub fn frequency_table(values: &[u32]) -> Vec<u32> {
    let Some(&max) = values.iter().max() else {
        return Vec::new();
    };

    let mut frequencies = vec![0u32; max as usize + 1];
    for &value in values {
        frequencies[value as usize] += 1;
    }
    frequencies
}

// ============================================================================
// Package-Merge
// ============================================================================

/// Computes optimal code lengths of at most `max_len` bits with the
/// package-merge algorithm.
///
/// Every symbol gets a code, zero-frequency symbols included, unless all
/// frequencies are zero or there is at most one symbol: then all lengths
/// are 0.
pub fn code_lengths(frequencies: &[u32], max_len: u8) -> Result<Vec<u8>, HuffmanError> {
    if !(1..=MAX_CODE_LENGTH).contains(&max_len) {
        return Err(HuffmanError::InvalidMaxLength(max_len));
    }

    let n = frequencies.len();
    if n as u64 > 1u64 << max_len {
        return Err(HuffmanError::TooManySymbols {
            symbols: n,
            max_len,
        });
    }

    if n <= 1 || frequencies.iter().all(|&frequency| frequency == 0) {
        return Ok(vec![0; n]);
    }

    // Symbols by ascending frequency, ties in symbol order
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by_key(|&symbol| frequencies[symbol]);
    let weights: Vec<u64> = order
        .iter()
        .map(|&symbol| u64::from(frequencies[symbol]))
        .collect();

    let capacity = 2 * n - 1;

    // Bit `d` of `packaged[i]` is set when item `i` of depth `d` is a package
    let mut packaged = vec![0u32; capacity];
    let mut list: Vec<u64> = Vec::with_capacity(capacity);
    let mut merged: Vec<u64> = Vec::with_capacity(capacity);

    for depth in 0..max_len {
        merged.clear();
        let mask = 1u32 << depth;
        let pairs = list.len() / 2 * 2;
        let mut pair = 0;
        let mut single = 0;

        while pair < pairs || single < n {
            let take_pair = if pair >= pairs {
                false
            } else if single >= n {
                true
            } else {
                list[pair] + list[pair + 1] <= weights[single]
            };

            if take_pair {
                merged.push(list[pair] + list[pair + 1]);
                packaged[merged.len() - 1] |= mask;
                pair += 2;
            } else {
                merged.push(weights[single]);
                single += 1;
            }
        }

        std::mem::swap(&mut list, &mut merged);
    }

    // Every original item among the selected ones adds a bit to its symbol;
    // each package selects two items of the depth below
    let mut lengths = vec![0u8; n];
    let mut selected = 2 * n - 2;

    for depth in (0..max_len).rev() {
        if selected == 0 {
            break;
        }

        let mask = 1u32 << depth;
        let mut packages = 0;
        for (position, &flags) in packaged.iter().enumerate().take(selected) {
            if flags & mask != 0 {
                packages += 1;
            } else {
                lengths[order[position - packages]] += 1;
            }
        }

        selected = 2 * packages;
    }

    Ok(lengths)
}

// ============================================================================
// Canonical Codes
// ============================================================================

/// Assigns canonical codes to code lengths.
///
/// Within a length class, codes increase with the symbol; the first code of
/// each class follows the last one of the class below, shifted by one bit.
/// Lengths above [`MAX_CODE_LENGTH`] and length sets that violate Kraft's
/// inequality are rejected.
pub fn canonical_codes(lengths: &[u8]) -> Result<Vec<HuffmanCode>, HuffmanError> {
    if let Some(symbol) = lengths.iter().position(|&length| length > MAX_CODE_LENGTH) {
        return Err(HuffmanError::CodeLengthTooLong {
            symbol,
            length: lengths[symbol],
        });
    }

    let longest = lengths.iter().copied().max().unwrap_or(0) as usize;

    let mut counts = vec![0u64; longest + 1];
    for &length in lengths.iter().filter(|&&length| length > 0) {
        counts[length as usize] += 1;
    }

    let mut next = vec![0u64; longest + 1];
    let mut code = 0u64;
    for bits in 1..=longest {
        code = (code + counts[bits - 1]) << 1;
        next[bits] = code;
    }

    // The last code of each class must still fit in its length
    for bits in 1..=longest {
        if next[bits] + counts[bits] > 1u64 << bits {
            return Err(HuffmanError::Oversubscribed);
        }
    }

    Ok(lengths
        .iter()
        .map(|&length| {
            if length == 0 {
                return HuffmanCode::default();
            }
            let code = next[length as usize];
            next[length as usize] += 1;
            HuffmanCode::new(length, code as u32)
        })
        .collect())
}

/// Builds length-limited canonical codes, one per entry of `frequencies`.
pub fn build_huffman(frequencies: &[u32], max_len: u8) -> Result<Vec<HuffmanCode>, HuffmanError> {
    let lengths = code_lengths(frequencies, max_len)?;
    let codes = canonical_codes(&lengths)?;

    log::debug!(
        "built {} huffman codes, longest {} bits",
        codes.len(),
        lengths.iter().max().copied().unwrap_or(0)
    );

    Ok(codes)
}

/// Builds codes for the values of `values`, giving individual codes to at
/// most `max_symbols - 1` of them when the frequency table is longer than
/// `max_symbols`.
///
/// The most frequent values keep their codes (ties favor smaller values);
/// every other value shares a long-tail escape code built with weight 1.
pub fn build_limited_huffman(
    values: &[u32],
    max_symbols: usize,
    max_len: u8,
) -> Result<LimitedHuffman, HuffmanError> {
    if max_symbols == 0 {
        return Err(HuffmanError::ZeroMaxSymbols);
    }

    let frequencies = frequency_table(values);
    if frequencies.len() <= max_symbols {
        return Ok(LimitedHuffman {
            codes: build_huffman(&frequencies, max_len)?,
            long_tail: None,
        });
    }

    let mut ranked: Vec<usize> = (0..frequencies.len()).collect();
    ranked.sort_by(|&a, &b| frequencies[b].cmp(&frequencies[a]).then(a.cmp(&b)));

    let tail_slot = max_symbols - 1;
    let mut slots = vec![tail_slot; frequencies.len()];
    let mut reduced = Vec::with_capacity(max_symbols);
    for (slot, &value) in ranked[..tail_slot].iter().enumerate() {
        slots[value] = slot;
        reduced.push(frequencies[value]);
    }
    reduced.push(1);

    let reduced_codes = build_huffman(&reduced, max_len)?;
    log::debug!(
        "{} of {} values collapsed into the long tail",
        frequencies.len() - tail_slot,
        frequencies.len()
    );

    Ok(LimitedHuffman {
        codes: slots.iter().map(|&slot| reduced_codes[slot]).collect(),
        long_tail: Some(reduced_codes[tail_slot]),
    })
}
