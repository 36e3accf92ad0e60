//! The tools module provides the pieces around the coder used by the command line program.
//!
//! The tools are:
//! - cli: Command line interface and program options.
//! - entropy_stats: Bit counts and entropy figures used to judge the compression.
//! - file_codec: Whole file compression, decompression and in-memory round trip testing.
//!
pub mod cli;
pub mod entropy_stats;
pub mod file_codec;
