use log::{debug, trace};

use super::coder::{EntropyCoder, HALF_RANGE, PRECISION, PRECISION_MAX, QTR_RANGE};
use crate::bitstream::BitStream;
use crate::error::{post, CabacError, Result};

/// Decoding functions
impl EntropyCoder {
    /// Next compressed bit, or 0 once `source` is exhausted. The encoder's flush only
    /// guarantees enough bits to pin the interval; the rest is implied zeros.
    fn next_bit(source: &mut BitStream<'_>) -> Result<u8> {
        if source.is_empty() {
            return Ok(0);
        }
        source.read_bit()
    }

    /// Decide the next symbol from the decode register, write it to `dest` and narrow the
    /// interval the same way the encoder did.
    pub fn decode_symbol(&mut self, dest: &mut BitStream<'_>) -> Result<u8> {
        self.resolve_model();
        let bit = if (self.low..=self.mid).contains(&self.value) {
            0
        } else if self.value > self.mid && self.value <= self.high {
            1
        } else {
            return Err(post(CabacError::InvalidResource(
                "decode register outside the coding interval",
            )));
        };
        if self.at_ceiling(bit) {
            return Err(post(CabacError::InvalidResource(
                "adaptive symbol count ceiling reached",
            )));
        }

        dest.write_bit(bit)?;
        self.narrow(bit);
        self.observe(bit)?;
        Ok(bit)
    }

    /// Mirror of the encoder renormalization: drop the bits the encoder emitted (or deferred)
    /// and shift the same number of compressed bits into the decode register.
    pub fn renormalize_decoder(&mut self, source: &mut BitStream<'_>) -> Result<()> {
        loop {
            if self.high <= HALF_RANGE {
                // lower half, nothing to subtract
            } else if self.low > HALF_RANGE {
                self.low -= HALF_RANGE + 1;
                self.high -= HALF_RANGE + 1;
                self.value -= HALF_RANGE + 1;
            } else if self.straddles_middle() {
                self.low -= QTR_RANGE + 1;
                self.high -= QTR_RANGE + 1;
                self.value -= QTR_RANGE + 1;
            } else {
                break;
            }
            let bit = Self::next_bit(source)?;
            self.scale();
            self.value = ((self.value << 1) & PRECISION_MAX) | bit as u32;
        }
        trace!(
            "Decoder interval [{}, {}] register {}",
            self.low,
            self.high,
            self.value
        );
        Ok(())
    }

    /// Reset the coder and load the first `PRECISION` bits of `source` into the decode
    /// register, padding with zeros if it is shorter.
    pub fn start_decode(&mut self, source: &mut BitStream<'_>) -> Result<()> {
        self.reset();
        for _ in 0..PRECISION {
            self.value = (self.value << 1) | Self::next_bit(source)? as u32;
        }
        Ok(())
    }

    /// Decode one symbol into `dest` and renormalize.
    pub fn decode_bit(
        &mut self,
        source: &mut BitStream<'_>,
        dest: &mut BitStream<'_>,
    ) -> Result<u8> {
        let bit = self.decode_symbol(dest)?;
        self.renormalize_decoder(source)?;
        Ok(bit)
    }

    /// Decode exactly `symbol_count` symbols from `source` into `dest` as one complete run.
    ///
    /// The symbol count is not recorded in the compressed data, so the caller has to supply
    /// it. `dest` must have room for all of them; otherwise the call fails with
    /// `CapacityLimit` before anything is read. The coder is reset afterwards.
    pub fn decode(
        &mut self,
        symbol_count: usize,
        source: &mut BitStream<'_>,
        dest: &mut BitStream<'_>,
    ) -> Result<()> {
        let available = dest.capacity() - dest.write_index();
        if symbol_count > available {
            trace!(
                "Decode of {} symbols rejected, {} bits available",
                symbol_count,
                available
            );
            return Err(CabacError::CapacityLimit {
                needed: symbol_count,
                available,
            });
        }

        let start = source.read_index();
        self.start_decode(source)?;
        for _ in 0..symbol_count {
            self.decode_bit(source, dest)?;
        }
        self.reset();
        debug!(
            "Decoded {} symbols from {} bits",
            symbol_count,
            source.read_index() - start
        );
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::bitstream::BitStream;
    use crate::compression::coder::EntropyCoder;
    use crate::error::CabacError;

    fn bits_of(stream: &mut BitStream<'_>) -> Vec<u8> {
        let mut bits = Vec::new();
        while !stream.is_empty() {
            bits.push(stream.read_bit().unwrap());
        }
        bits
    }

    fn stream_of(bits: &[u8]) -> BitStream<'static> {
        let mut stream = BitStream::with_capacity(bits.len().max(1)).unwrap();
        for &bit in bits {
            stream.write_bit(bit).unwrap();
        }
        stream
    }

    #[test]
    fn start_decode_test() {
        let mut coder = EntropyCoder::new();
        let mut source = stream_of(&[1, 0, 1]);
        coder.start_decode(&mut source).unwrap();
        assert_eq!(coder.value, 0xa000);
        assert!(source.is_empty());

        let mut source = BitStream::from_bytes(&[0xff, 0x00, 0x01]).unwrap();
        coder.start_decode(&mut source).unwrap();
        // register takes bits in stream order, the first one lands in the top bit
        assert_eq!(coder.value, 0xff00);
        assert_eq!(source.read_index(), 16);
    }

    #[test]
    fn decode_symbol_test() {
        let mut coder = EntropyCoder::new();
        let mut out = BitStream::with_capacity(8).unwrap();
        coder.value = 0xa000;
        assert_eq!(coder.decode_symbol(&mut out), Ok(1));
        assert_eq!((coder.low, coder.high), (32768, 65535));
        assert_eq!(coder.history(), Some([1, 2]));
        assert_eq!(bits_of(&mut out), vec![1]);
    }

    #[test]
    fn desync_test() {
        let mut coder = EntropyCoder::new();
        let mut out = BitStream::with_capacity(8).unwrap();
        coder.low = 100;
        coder.high = 200;
        coder.value = 50;
        assert!(matches!(
            coder.decode_symbol(&mut out),
            Err(CabacError::InvalidResource(_))
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn decode_single_symbol_test() {
        let mut coder = EntropyCoder::new();
        let mut out = BitStream::with_capacity(8).unwrap();
        coder.decode(1, &mut stream_of(&[1, 0, 1]), &mut out).unwrap();
        assert_eq!(bits_of(&mut out), vec![1]);

        let mut out = BitStream::with_capacity(8).unwrap();
        coder.decode(1, &mut stream_of(&[0, 0, 1]), &mut out).unwrap();
        assert_eq!(bits_of(&mut out), vec![0]);
    }

    #[test]
    fn decode_known_sequence_test() {
        let mut coder = EntropyCoder::new();
        let mut source = stream_of(&[1, 0, 0, 1, 1, 1, 1, 0, 1, 1, 1]);
        let mut out = BitStream::with_capacity(8).unwrap();
        coder.decode(8, &mut source, &mut out).unwrap();
        assert_eq!(bits_of(&mut out), vec![1, 0, 1, 1, 0, 0, 1, 0]);
        assert_eq!(coder.history(), Some([1, 1]));
    }

    #[test]
    fn decode_zero_symbols_test() {
        let mut coder = EntropyCoder::new();
        let mut out = BitStream::with_capacity(8).unwrap();
        coder.decode(0, &mut stream_of(&[0, 1]), &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn decode_capacity_limit_test() {
        let mut coder = EntropyCoder::new();
        let mut source = stream_of(&[1, 0, 0, 1, 1, 1, 1, 0, 1, 1, 1]);
        let mut out = BitStream::with_capacity(8).unwrap();
        assert_eq!(
            coder.decode(9, &mut source, &mut out),
            Err(CabacError::CapacityLimit {
                needed: 9,
                available: 8
            })
        );
        assert_eq!(source.read_index(), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn incremental_decode_test() {
        let mut coder = EntropyCoder::new();
        let mut source = stream_of(&[1, 0, 0, 1, 1, 1, 1, 0, 1, 1, 1]);
        let mut out = BitStream::with_capacity(8).unwrap();
        coder.start_decode(&mut source).unwrap();
        let mut decoded = Vec::new();
        for _ in 0..8 {
            decoded.push(coder.decode_bit(&mut source, &mut out).unwrap());
        }
        assert_eq!(decoded, vec![1, 0, 1, 1, 0, 0, 1, 0]);
    }

    #[test]
    fn encode_decode_static_test() {
        let input = [0, 0, 0, 1, 0, 0, 0, 0, 1, 0, 0, 0];
        let mut coder = EntropyCoder::with_static_model(50000).unwrap();
        let mut encoded = BitStream::with_capacity(256).unwrap();
        coder.encode(&mut stream_of(&input), &mut encoded).unwrap();

        let mut out = BitStream::with_capacity(input.len()).unwrap();
        coder.decode(input.len(), &mut encoded, &mut out).unwrap();
        assert_eq!(bits_of(&mut out), input.to_vec());
    }
}
