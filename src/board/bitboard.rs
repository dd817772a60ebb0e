//! Bitboard implementation for fast occupancy queries

/// One bit per cell, row-major, sized for the board it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bitboard {
    bits: Vec<u64>,
    cells: usize,
}

impl Bitboard {
    /// Create an empty bitboard able to hold `cells` bits
    pub fn new(cells: usize) -> Self {
        Self {
            bits: vec![0; cells.div_ceil(64)],
            cells,
        }
    }

    /// Set the bit at a cell index
    #[inline]
    pub fn set(&mut self, idx: usize) {
        debug_assert!(idx < self.cells);
        self.bits[idx / 64] |= 1u64 << (idx % 64);
    }

    /// Clear the bit at a cell index
    #[inline]
    pub fn clear(&mut self, idx: usize) {
        debug_assert!(idx < self.cells);
        self.bits[idx / 64] &= !(1u64 << (idx % 64));
    }

    /// Check if the bit at a cell index is set
    #[inline]
    pub fn get(&self, idx: usize) -> bool {
        (self.bits[idx / 64] >> (idx % 64)) & 1 == 1
    }

    /// Count total set bits (popcount)
    #[inline]
    pub fn count(&self) -> u32 {
        self.bits.iter().map(|b| b.count_ones()).sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|&b| b == 0)
    }

    /// Iterate over set cell indices in ascending order
    pub fn iter_ones(&self) -> BitboardIter<'_> {
        BitboardIter {
            bits: &self.bits,
            word_idx: 0,
            current_word: self.bits.first().copied().unwrap_or(0),
        }
    }
}

/// Iterator over set bits in a Bitboard
pub struct BitboardIter<'a> {
    bits: &'a [u64],
    word_idx: usize,
    current_word: u64,
}

impl Iterator for BitboardIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        while self.current_word == 0 {
            self.word_idx += 1;
            if self.word_idx >= self.bits.len() {
                return None;
            }
            self.current_word = self.bits[self.word_idx];
        }

        let bit_pos = self.current_word.trailing_zeros() as usize;
        // Clear the lowest set bit
        self.current_word &= self.current_word - 1;
        Some(self.word_idx * 64 + bit_pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_clear() {
        let mut bb = Bitboard::new(225);
        assert!(bb.is_empty());
        bb.set(0);
        bb.set(64);
        bb.set(224);
        assert!(bb.get(0) && bb.get(64) && bb.get(224));
        assert!(!bb.get(1));
        assert_eq!(bb.count(), 3);

        bb.clear(64);
        assert!(!bb.get(64));
        assert_eq!(bb.count(), 2);
    }

    #[test]
    fn test_iter_ones_ascending() {
        let mut bb = Bitboard::new(361);
        for idx in [360, 5, 130, 64] {
            bb.set(idx);
        }
        let ones: Vec<usize> = bb.iter_ones().collect();
        assert_eq!(ones, vec![5, 64, 130, 360]);
    }

    #[test]
    fn test_word_count_matches_cells() {
        assert_eq!(Bitboard::new(81).bits.len(), 2);
        assert_eq!(Bitboard::new(64).bits.len(), 1);
        assert_eq!(Bitboard::new(1).bits.len(), 1);
    }
}
