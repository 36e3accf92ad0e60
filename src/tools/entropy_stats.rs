use crate::bitstream::BitStream;
use crate::compression::coder::PRECISION_MAX;

/// Zero and one counts of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BitCounts {
    pub zeros: usize,
    pub ones: usize,
}

impl BitCounts {
    pub fn total(&self) -> usize {
        self.zeros + self.ones
    }

    /// Empirical probability of a 0. An empty count gives 0.5.
    pub fn p_zero(&self) -> f64 {
        if self.total() == 0 {
            return 0.5;
        }
        self.zeros as f64 / self.total() as f64
    }

    /// Empirical entropy in bits per symbol.
    pub fn entropy(&self) -> f64 {
        binary_entropy(self.p_zero())
    }

    /// Code length in bits of these symbols under a static split, ignoring the flush.
    pub fn ideal_bits(&self, split: u32) -> f64 {
        let p0 = split as f64 / PRECISION_MAX as f64;
        let mut bits = 0.0;
        if self.zeros > 0 {
            bits -= self.zeros as f64 * p0.log2();
        }
        if self.ones > 0 {
            bits -= self.ones as f64 * (1.0 - p0).log2();
        }
        bits
    }

    /// Static split matching the empirical distribution, kept inside the accepted range.
    pub fn best_split(&self) -> u32 {
        let split = (self.p_zero() * PRECISION_MAX as f64).round() as u32;
        split.min(PRECISION_MAX - 1)
    }
}

/// Count the unread bits of `stream` without consuming them.
pub fn count_bits(stream: &BitStream<'_>) -> BitCounts {
    let data = stream.data();
    let mut counts = BitCounts::default();
    let (start, end) = (stream.read_index(), stream.write_index());

    // Whole bytes in the middle go through count_ones, the ragged ends bit by bit.
    let mut index = start;
    while index < end {
        if index.is_multiple_of(8) && index + 8 <= end {
            let ones = data[index >> 3].count_ones() as usize;
            counts.ones += ones;
            counts.zeros += 8 - ones;
            index += 8;
        } else {
            if (data[index >> 3] >> (index & 7)) & 1 == 1 {
                counts.ones += 1;
            } else {
                counts.zeros += 1;
            }
            index += 1;
        }
    }
    counts
}

/// Entropy in bits of a binary source emitting a 0 with probability `p`.
pub fn binary_entropy(p: f64) -> f64 {
    if p <= 0.0 || p >= 1.0 {
        return 0.0;
    }
    -(p * p.log2() + (1.0 - p) * (1.0 - p).log2())
}
