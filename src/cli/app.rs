use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "sqlt")]
#[command(about = "SQLite file forensic analysis toolkit")]
#[command(version)]
pub struct Cli {
    /// Control colored output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Write output to a file instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<String>,

    /// Memory-map the input file instead of reading it into the heap
    #[arg(long, global = true)]
    pub mmap: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a file and print a top-level diagnostic report
    Info {
        /// Path to the database file
        #[arg(short, long)]
        file: String,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Decode table-leaf cells (row ids and column values) from a page
    Cells {
        /// Path to the database file
        #[arg(short, long)]
        file: String,

        /// Page number to decode (default: 0, the first page)
        #[arg(short, long)]
        page: Option<u64>,

        /// Maximum number of cells to decode (default: 20)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Show the full serial-type decode trace per cell
        #[arg(short, long)]
        verbose: bool,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Classify every page in the file and print a page-type summary
    Scan {
        /// Path to the database file
        #[arg(short, long)]
        file: String,

        /// Skip pages that classify as Unknown
        #[arg(short = 'u', long = "no-unknown")]
        no_unknown: bool,

        /// Override page size (default: from file header, else 4096)
        #[arg(long = "page-size")]
        page_size: Option<u32>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Hex dump of raw file bytes
    Dump {
        /// Path to the database file
        #[arg(short, long)]
        file: String,

        /// Page number to dump (default: 0)
        #[arg(short, long)]
        page: Option<u64>,

        /// Absolute byte offset to start dumping (bypasses page mode)
        #[arg(long)]
        offset: Option<u64>,

        /// Number of bytes to dump (default: page size, or 256 in offset mode)
        #[arg(short, long)]
        length: Option<usize>,

        /// Output raw binary bytes (no formatting)
        #[arg(long)]
        raw: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
