/*
 * Utility functions used by the tests.
 *
 */

use cabac::BitStream;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Room for the worst case expansion of `symbols` symbols plus the flush.
pub fn encoded_capacity(symbols: usize) -> usize {
    symbols * 17 + 64
}

/// `len` bits, each a 1 with probability `p_one`, from a seeded generator.
pub fn random_bits(seed: u64, len: usize, p_one: f64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen_bool(p_one) as u8).collect()
}

/// Fully written stream holding `bits`.
pub fn stream_of(bits: &[u8]) -> BitStream<'static> {
    let mut stream = BitStream::with_capacity(bits.len().max(1)).unwrap();
    for &bit in bits {
        stream.write_bit(bit).unwrap();
    }
    stream
}

/// Remaining bits of `stream`, consumed.
pub fn bits_of(stream: &mut BitStream<'_>) -> Vec<u8> {
    let mut bits = Vec::with_capacity(stream.occupancy());
    while !stream.is_empty() {
        bits.push(stream.read_bit().unwrap());
    }
    bits
}
