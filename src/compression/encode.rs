use log::{debug, trace};

use super::coder::{EntropyCoder, HALF_RANGE, MSB_MASK, PRECISION, QTR_RANGE};
use crate::bitstream::BitStream;
use crate::error::{post, CabacError, Result};

/// Encoding functions
impl EntropyCoder {
    /// Narrow the interval to the half selected by the low bit of `bit` and count it.
    /// Resolves the model first.
    pub fn encode_symbol(&mut self, bit: u8) -> Result<()> {
        let bit = bit & 0x1;
        if self.at_ceiling(bit) {
            return Err(post(CabacError::InvalidResource(
                "adaptive symbol count ceiling reached",
            )));
        }
        self.resolve_model();
        self.narrow(bit);
        self.observe(bit)
    }

    /// Write the deferred bits, each the complement of `bit`, and clear the count.
    pub fn emit_pending(&mut self, bit: u8, dest: &mut BitStream<'_>) -> Result<()> {
        let inverse = !bit & 0x1;
        for _ in 0..self.pending {
            dest.write_bit(inverse)?;
        }
        self.pending = 0;
        Ok(())
    }

    /// Emit bits while the interval is confined to one half of the coding space, and defer
    /// them while it straddles the middle narrowly.
    pub fn renormalize_encoder(&mut self, dest: &mut BitStream<'_>) -> Result<()> {
        loop {
            if (self.high & MSB_MASK) == (self.low & MSB_MASK) {
                let msb = ((self.high & MSB_MASK) >> (PRECISION - 1)) as u8;
                let offset = (HALF_RANGE + 1) * msb as u32;
                self.low -= offset;
                self.high -= offset;
                dest.write_bit(msb)?;
                self.emit_pending(msb, dest)?;
            } else if self.straddles_middle() {
                self.low -= QTR_RANGE + 1;
                self.high -= QTR_RANGE + 1;
                self.pending += 1;
            } else {
                break;
            }
            self.scale();
        }
        trace!(
            "Encoder interval [{}, {}] with {} pending",
            self.low,
            self.high,
            self.pending
        );
        Ok(())
    }

    /// Encode one symbol and renormalize.
    pub fn encode_bit(&mut self, bit: u8, dest: &mut BitStream<'_>) -> Result<()> {
        self.encode_symbol(bit)?;
        self.renormalize_encoder(dest)
    }

    /// Terminate the run: one bit picks the quarter of the final interval the decoder will
    /// land in, followed by the pending bits plus one. Resets the coder.
    pub fn flush_encoder(&mut self, dest: &mut BitStream<'_>) -> Result<()> {
        self.pending += 1;
        let bit = if self.low < QTR_RANGE { 0 } else { 1 };
        dest.write_bit(bit)?;
        self.emit_pending(bit, dest)?;
        self.reset();
        Ok(())
    }

    /// Encode every unread bit of `source` into `dest` as one complete run, flush included.
    /// The coder is reset afterwards.
    pub fn encode(&mut self, source: &mut BitStream<'_>, dest: &mut BitStream<'_>) -> Result<()> {
        let start = dest.write_index();
        let mut symbols = 0_usize;

        while !source.is_empty() {
            let bit = source.read_bit()?;
            self.encode_bit(bit, dest)?;
            symbols += 1;
        }

        self.flush_encoder(dest)?;
        self.reset();
        debug!(
            "Encoded {} symbols into {} bits",
            symbols,
            dest.write_index() - start
        );
        Ok(())
    }

    /// Close an incremental run built from [`encode_bit`](Self::encode_bit) calls.
    pub fn finish_encode(&mut self, dest: &mut BitStream<'_>) -> Result<()> {
        self.flush_encoder(dest)?;
        self.reset();
        Ok(())
    }
}
