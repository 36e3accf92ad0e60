//! The compression module holds the binary arithmetic coder.
//!
//! Coding happens in the following steps:
//! - Model resolution: split the current interval `[low, high]` at `mid` in proportion to the
//!   probability of a 0, either learned from the symbols seen so far (adaptive) or fixed by the
//!   caller (static).
//! - Symbol coding: keep the half of the interval selected by the bit.
//! - Renormalization: while the interval sits in one half of the coding space, emit (or, when
//!   decoding, consume) its leading bit and double it. An interval straddling the middle too
//!   narrowly is doubled around the middle and its bit deferred until the side is known.
//! - Flush: emit enough bits for the decoder to land inside the final interval.
//!
//! The compressed stream carries no header. The decoder must be told how many symbols to
//! reconstruct.
//!
//! - coder: state, constants, model resolution.
//! - encode: symbol encoding, encoder renormalization, flush and the batch/incremental entry
//!   points.
//! - decode: the mirror image for decoding.

pub mod coder;
pub mod decode;
pub mod encode;

pub use coder::{EntropyCoder, Model};
