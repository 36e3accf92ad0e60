use clap::Parser;
use log::{info, warn};
use std::{fmt::Display, fmt::Formatter};

/// Zip, Unzip, Test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Zip,
    Unzip,
    Test,
}
impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Define the two output channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    File,
    Stdout,
}
impl Display for Output {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Command Line Interpretation - uses external CLAP crate.
#[derive(Parser, Debug)]
#[clap(
    version,
    about = "A binary arithmetic entropy coder",
    long_about = "
    Compresses a file bit by bit with a 16 bit binary arithmetic coder. Probabilities are
    learned from the data (the default) or fixed with --model.

    The compressed file carries no header. Decompression needs the number of symbols (bits)
    that were compressed, which is reported when compressing, and the same model."
)]
pub struct Args {
    /// Filename of file to process. Standard input is used when it is missing
    #[clap()]
    filename: Option<String>,

    /// Perform compression on the input file
    #[clap(short = 'z', long = "zip")]
    compress: bool,

    /// Perform decompression on the input file
    #[clap(short = 'd', long = "decompress")]
    decompress: bool,

    /// Compress and decompress in memory and report the result
    #[clap(short = 't', long = "test")]
    test: bool,

    /// Force overwriting output file
    #[clap(short = 'f', long = "force")]
    force: bool,

    /// Keep input file
    #[clap(short = 'k', long = "keep")]
    keep: bool,

    /// Send output to the terminal
    #[clap(short = 'c', long = "stdout")]
    stdout: bool,

    /// Static split point 0..65534. A 0 bit gets probability model/65535. Adaptive when absent
    #[clap(short = 'm', long = "model")]
    model: Option<u32>,

    /// Number of symbols (bits) to reconstruct when decompressing
    #[clap(short = 'n', long = "symbols")]
    symbols: Option<usize>,

    /// Sets verbosity. -v1 shows very little, -v5 is chatty
    #[clap(short = 'v', default_value_t = 3)]
    v: u8,
}

/// Define all user settable options to control program behavior
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CabacOpts {
    /// Optional name of file to read for input
    pub file: Option<String>,
    /// Compress/Decompress/Test
    pub op_mode: Mode,
    /// Location where output is sent
    pub output: Output,
    /// Silently overwrite existing files with the same name
    pub force_overwrite: bool,
    /// Don't remove input files after processing
    pub keep_input_files: bool,
    /// Static split point, adaptive coding when None
    pub model: Option<u32>,
    /// Symbols to decode
    pub symbols: Option<usize>,
    /// Verbosity 0 (off) to 5 (trace)
    pub verbosity: u8,
}

impl CabacOpts {
    /// Set default parameters on program start
    pub fn new() -> Self {
        Self {
            file: None,
            op_mode: Mode::Zip,
            output: Output::File,
            force_overwrite: false,
            keep_input_files: false,
            model: None,
            symbols: None,
            verbosity: 3,
        }
    }
}

impl Default for CabacOpts {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Args> for CabacOpts {
    fn from(args: Args) -> Self {
        let mut opts = CabacOpts::new();
        opts.file = args.filename;

        if args.compress {
            opts.op_mode = Mode::Zip
        };
        if args.decompress {
            opts.op_mode = Mode::Unzip
        };
        if args.test {
            opts.op_mode = Mode::Test
        };

        opts.force_overwrite = args.force;
        opts.keep_input_files = args.keep;

        // No file name means stdin in, stdout out
        if args.stdout || opts.file.is_none() {
            opts.output = Output::Stdout
        };

        opts.model = args.model;
        opts.symbols = args.symbols;
        opts.verbosity = args.v;
        opts
    }
}

/// Map the -v setting onto the log level filter.
pub fn level_filter(verbosity: u8) -> log::LevelFilter {
    match verbosity {
        0 => log::LevelFilter::Off,
        1 => log::LevelFilter::Error,
        2 => log::LevelFilter::Warn,
        3 => log::LevelFilter::Info,
        4 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

/// Parse the command line, set the log level and report the configuration.
pub fn cabac_opts_init() -> CabacOpts {
    let opts = CabacOpts::from(Args::parse());

    // Set the log level
    log::set_max_level(level_filter(opts.verbosity));

    // Below we report initialization status to the user
    info!("---- Cabac Initialization Start ----");
    info!("Verbosity set to {}", log::max_level());
    info!("Operational mode set to {}", opts.op_mode);
    match &opts.file {
        Some(s) => info!("Getting input from the file {}", s),
        None => warn!("Reading from stdin, sending output to stdout"),
    }
    info!("Output set to {}", opts.output);
    match opts.model {
        Some(split) => info!("Static model with split {}", split),
        None => info!("Adaptive model"),
    }
    if let Some(symbols) = opts.symbols {
        info!("Decoding {} symbols", symbols)
    };
    if opts.force_overwrite {
        info!("Forcing file overwriting")
    };
    if opts.keep_input_files {
        info!("Keeping input files")
    };
    info!("---- Cabac Initialization End ----\n");
    opts
}
