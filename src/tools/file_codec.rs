use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::Path;

use log::{debug, error, info, warn};

use super::cli::{CabacOpts, Output};
use super::entropy_stats::count_bits;
use crate::bitstream::BitStream;
use crate::compression::EntropyCoder;
use crate::error::{CabacError, Result};

const SUFFIX: &str = ".cabac";

/// Slack added to the first guess at the compressed size, covers the flush bits.
const FLUSH_SLACK: usize = 64;

fn coder_for(model: Option<u32>) -> Result<EntropyCoder> {
    match model {
        Some(split) => EntropyCoder::with_static_model(split),
        None => Ok(EntropyCoder::new()),
    }
}

/// Compress `input` as a run of `input.len() * 8` symbols. Returns the compressed bytes (last
/// byte zero padded) and the number of compressed bits.
///
/// The destination starts at the input size and is doubled each time the coder reports
/// `CapacityLimit`; a poorly matched static model can expand the data.
pub fn compress_bytes(input: &[u8], model: Option<u32>) -> Result<(Vec<u8>, usize)> {
    let mut coder = coder_for(model)?;
    let mut source = BitStream::shared(input);
    let mut capacity = (input.len() << 3) + FLUSH_SLACK;

    loop {
        let mut dest = BitStream::with_capacity(capacity)?;
        source.seek(0);
        match coder.encode(&mut source, &mut dest) {
            Ok(()) => {
                let bits = dest.write_index();
                return Ok((dest.data()[..bits.div_ceil(8)].to_vec(), bits));
            }
            Err(CabacError::CapacityLimit { .. }) => {
                coder.reset();
                capacity <<= 1;
                debug!(
                    "Compressed data outgrew its buffer, retrying with {} bits",
                    capacity
                );
            }
            Err(e) => return Err(e),
        }
    }
}

/// Decode `symbols` bits from `input`. The last byte of the result is zero padded when
/// `symbols` is not a multiple of 8.
pub fn decompress_bytes(input: &[u8], symbols: usize, model: Option<u32>) -> Result<Vec<u8>> {
    let mut coder = coder_for(model)?;
    if symbols == 0 {
        return Ok(Vec::new());
    }
    let mut source = BitStream::shared(input);
    let mut dest = BitStream::with_capacity(symbols)?;
    coder.decode(symbols, &mut source, &mut dest)?;
    Ok(dest.data().to_vec())
}

/// Read the named file, or stdin when there is none.
fn read_input(opts: &CabacOpts) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    match &opts.file {
        Some(name) => {
            File::open(name)?.read_to_end(&mut buf)?;
        }
        None => {
            io::stdin().read_to_end(&mut buf)?;
        }
    }
    Ok(buf)
}

/// Write `data` to stdout or to `fname`, refusing to replace an existing file unless forced.
fn write_output(opts: &CabacOpts, fname: &str, data: &[u8]) -> io::Result<()> {
    if opts.output == Output::Stdout {
        let mut out = io::stdout().lock();
        out.write_all(data)?;
        return out.flush();
    }
    if !opts.force_overwrite && Path::new(fname).exists() {
        error!(
            "Output file {} already exists. Use -f to overwrite it.",
            fname
        );
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            "Output file already exists.",
        ));
    }
    let mut f_out = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(fname)?;
    f_out.write_all(data)?;
    info!("Wrote {} bytes to {}", data.len(), fname);
    Ok(())
}

/// Remove the input file once its output exists, unless asked to keep it.
fn remove_input(opts: &CabacOpts) -> io::Result<()> {
    if opts.keep_input_files || opts.output == Output::Stdout {
        return Ok(());
    }
    if let Some(name) = &opts.file {
        fs::remove_file(name)?;
        info!("Removed input file {}", name);
    }
    Ok(())
}

/// Name of the decompressed file: the input with `.cabac` stripped, or `<input>.out`.
pub fn decompressed_name(fname: &str) -> String {
    match fname.strip_suffix(SUFFIX) {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => format!("{}.out", fname),
    }
}

/// Compress the input defined in opts <CabacOpts>.
pub fn compress_file(opts: &CabacOpts) -> io::Result<()> {
    let input = read_input(opts)?;
    let (compressed, bits) = compress_bytes(&input, opts.model)?;
    let symbols = input.len() << 3;

    info!(
        "Compressed {} symbols into {} bits ({:.3} bits/symbol)",
        symbols,
        bits,
        bits as f64 / symbols.max(1) as f64
    );
    // Nothing in the output records this, the user has to pass it back with -n.
    warn!("Decompress with --symbols {}", symbols);

    let fname = format!("{}{}", opts.file.as_deref().unwrap_or("stdin"), SUFFIX);
    write_output(opts, &fname, &compressed)?;
    remove_input(opts)
}

/// Decompress the input defined in opts <CabacOpts>. Needs the symbol count.
pub fn decompress_file(opts: &CabacOpts) -> io::Result<()> {
    let symbols = match opts.symbols {
        Some(symbols) => symbols,
        None => {
            error!("Decompression needs the symbol count (-n).");
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "Missing symbol count.",
            ));
        }
    };
    if !symbols.is_multiple_of(8) {
        warn!(
            "{} symbols is not a whole number of bytes, the last byte is zero padded",
            symbols
        );
    }

    let input = read_input(opts)?;
    let output = decompress_bytes(&input, symbols, opts.model)?;
    info!(
        "Decompressed {} symbols from {} bytes",
        symbols,
        input.len()
    );

    let fname = decompressed_name(opts.file.as_deref().unwrap_or("stdin"));
    write_output(opts, &fname, &output)?;
    remove_input(opts)
}

/// Compress and decompress the input in memory, check the result and report the compression
/// against the empirical entropy of the input.
pub fn test_file(opts: &CabacOpts) -> io::Result<()> {
    let input = read_input(opts)?;
    let symbols = input.len() << 3;
    let (compressed, bits) = compress_bytes(&input, opts.model)?;
    let output = decompress_bytes(&compressed, symbols, opts.model)?;

    if output != input {
        error!(
            "Round trip failed: decompressed data differs from the input."
        );
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "Round trip mismatch.",
        ));
    }

    let counts = count_bits(&BitStream::shared(&input));
    info!("Round trip of {} symbols OK", symbols);
    info!(
        "{:.4} bits/symbol, empirical entropy {:.4} bits/symbol",
        bits as f64 / symbols.max(1) as f64,
        counts.entropy()
    );
    if opts.model.is_none() {
        info!(
            "A static model would use split {} ({:.0} bits)",
            counts.best_split(),
            counts.ideal_bits(counts.best_split())
        );
    }
    Ok(())
}
