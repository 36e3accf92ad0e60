use crate::error::{post, CabacError, Result};

/// Bits of significance in the interval registers.
pub const PRECISION: u32 = 16;
pub const PRECISION_MAX: u32 = (1 << PRECISION) - 1;
pub const HALF_RANGE: u32 = PRECISION_MAX >> 1;
pub const QTR_RANGE: u32 = HALF_RANGE >> 1;
pub const THREE_QTR_RANGE: u32 = 3 * QTR_RANGE;
/// Top bit of a register.
pub const MSB_MASK: u32 = 1 << (PRECISION - 1);

/// Adaptive symbol counts stop here. Only guards the ratio arithmetic against overflow.
pub const HISTORY_LIMIT: u32 = 1 << 31;

/// Probability model used to place the split point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Model {
    /// Probability of a 0 is `history[0] / (history[0] + history[1])`.
    Adaptive { history: [u32; 2] },
    /// Probability of a 0 is `split / PRECISION_MAX`.
    Static { split: u32 },
}

/// Binary arithmetic coder state.
///
/// The coder owns no storage; all bits go through [`BitStream`](crate::BitStream)s handed to
/// the encode/decode calls. Invariant: `low <= mid <= high <= PRECISION_MAX`.
///
/// A call that fails part way leaves the state unusable until [`reset`](Self::reset).
#[derive(Debug, Clone)]
pub struct EntropyCoder {
    pub(super) model: Model,
    pub(super) low: u32,
    pub(super) high: u32,
    pub(super) mid: u32,
    /// Decode register: the next `PRECISION` bits of compressed input.
    pub(super) value: u32,
    /// E3 count: complementary bits owed to the output.
    pub(super) pending: usize,
}

impl EntropyCoder {
    /// Adaptive coder with a uniform prior.
    pub fn new() -> Self {
        Self {
            model: Model::Adaptive { history: [1, 1] },
            low: 0,
            high: PRECISION_MAX,
            mid: HALF_RANGE,
            value: 0,
            pending: 0,
        }
    }

    /// Static coder splitting `[0, PRECISION_MAX]` at `split`, so a 0 has probability
    /// `split / PRECISION_MAX`. A split of `PRECISION_MAX` or more would leave no room for a 1
    /// and is refused.
    pub fn with_static_model(split: u32) -> Result<Self> {
        if split >= PRECISION_MAX {
            return Err(post(CabacError::InvalidArgument(
                "static split must be below PRECISION_MAX",
            )));
        }
        Ok(Self {
            model: Model::Static { split },
            low: 0,
            high: PRECISION_MAX,
            mid: split,
            value: 0,
            pending: 0,
        })
    }

    /// Return to the initial state of the current mode. Adaptive counts start over.
    pub fn reset(&mut self) {
        self.low = 0;
        self.high = PRECISION_MAX;
        self.value = 0;
        self.pending = 0;
        match &mut self.model {
            Model::Adaptive { history } => {
                *history = [1, 1];
                self.mid = HALF_RANGE;
            }
            Model::Static { split } => self.mid = *split,
        }
    }

    /// Place `mid` inside `[low, high]` according to the current model. Has to run before
    /// each symbol so both sides see the distribution as it was before that symbol.
    pub fn resolve_model(&mut self) {
        let range = (self.high - self.low) as u64;
        let mid_range = match self.model {
            Model::Adaptive { history } => {
                range * history[0] as u64 / (history[0] as u64 + history[1] as u64)
            }
            Model::Static { split } => range * split as u64 / PRECISION_MAX as u64,
        };
        self.mid = self.low + mid_range as u32;
    }

    /// Keep the half of the interval selected by `bit`: `[low, mid]` for 0, `[mid+1, high]`
    /// for 1.
    pub(super) fn narrow(&mut self, bit: u8) {
        if bit == 1 {
            self.low = self.mid + 1;
        } else {
            self.high = self.mid;
        }
    }

    /// Count an observed symbol, refusing once the adaptive ceiling is reached.
    pub(super) fn observe(&mut self, bit: u8) -> Result<()> {
        if let Model::Adaptive { history } = &mut self.model {
            let count = &mut history[bit as usize];
            if *count >= HISTORY_LIMIT {
                return Err(post(CabacError::InvalidResource(
                    "adaptive symbol count ceiling reached",
                )));
            }
            *count += 1;
        }
        Ok(())
    }

    /// True if another `bit` could not be counted.
    pub(super) fn at_ceiling(&self, bit: u8) -> bool {
        match self.model {
            Model::Adaptive { history } => history[bit as usize] >= HISTORY_LIMIT,
            Model::Static { .. } => false,
        }
    }

    /// Double the interval: a 0 shifts into `low`, a 1 into `high`.
    pub(super) fn scale(&mut self) {
        self.high = ((self.high << 1) & PRECISION_MAX) | 0x1;
        self.low = (self.low << 1) & PRECISION_MAX;
    }

    /// Interval straddles the middle within the two central quarters.
    pub(super) fn straddles_middle(&self) -> bool {
        self.high <= THREE_QTR_RANGE && self.low > QTR_RANGE
    }

    pub fn model(&self) -> Model {
        self.model
    }

    pub fn is_adaptive(&self) -> bool {
        matches!(self.model, Model::Adaptive { .. })
    }

    /// Symbol counts, for an adaptive coder.
    pub fn history(&self) -> Option<[u32; 2]> {
        match self.model {
            Model::Adaptive { history } => Some(history),
            Model::Static { .. } => None,
        }
    }

    pub fn low(&self) -> u32 {
        self.low
    }

    pub fn high(&self) -> u32 {
        self.high
    }

    pub fn mid(&self) -> u32 {
        self.mid
    }

    /// Deferred complementary bits not yet written.
    pub fn pending(&self) -> usize {
        self.pending
    }
}

impl Default for EntropyCoder {
    fn default() -> Self {
        Self::new()
    }
}
