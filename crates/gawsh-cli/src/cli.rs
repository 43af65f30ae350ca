use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "gawsh",
    about = "gawsh generates a static HTML portrait of a git repository",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Be chatty
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML file with generation settings; flags override it
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Turn a blob listing into a make file rendering each blob once
    Generate(GenerateArgs),
    /// Render one blob from stdin to an HTML fragment on stdout
    Render(RenderArgs),
    /// Generate the rule file, then run it with a parallel make
    Build(BuildArgs),
    /// Print the CSS for rendered fragments in a bundled theme
    Stylesheet(StylesheetArgs),
}

/// Settings shared by `generate` and `build`.
#[derive(Args, Debug, Default)]
pub struct RuleArgs {
    /// Listing of `<blob id> <path>` lines; defaults to stdin
    #[arg(long)]
    pub listing: Option<PathBuf>,

    /// Output directory for rendered files [default: .gawsh-output]
    #[arg(short, long)]
    pub output: Option<String>,

    /// Repository the rules fetch blobs from [default: current directory]
    #[arg(short = 'C', long)]
    pub repository: Option<PathBuf>,

    /// Hex digits per blob id (64 for SHA-256 repositories) [default: 40]
    #[arg(long)]
    pub oid_length: Option<usize>,

    /// Name of the rule depending on every blob [default: all]
    #[arg(long)]
    pub umbrella: Option<String>,
}

#[derive(Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub rules: RuleArgs,

    /// Write the rule file here instead of stdout
    #[arg(short = 'f', long)]
    pub rule_file: Option<PathBuf>,
}

#[derive(Args)]
pub struct RenderArgs {
    /// Display name of the blob; its extension picks the syntax. Names
    /// starting with `-` are taken as the value, not as flags.
    #[arg(long, allow_hyphen_values = true)]
    pub filename: String,

    /// Read the blob from this file instead of stdin
    pub input: Option<PathBuf>,

    /// Refuse blobs larger than this many bytes
    #[arg(long)]
    pub max_bytes: Option<usize>,
}

#[derive(Args)]
pub struct BuildArgs {
    #[command(flatten)]
    pub rules: RuleArgs,

    /// Maximum number of parallel jobs, defaults to the number of CPUs
    #[arg(short = 'j', long, default_value_t = num_cpus::get())]
    pub jobs: usize,

    /// Make binary to run the rule file with
    #[arg(long, default_value = "make")]
    pub runner: String,

    /// Print the runner command instead of executing it
    #[arg(long)]
    pub dry_run: bool,

    /// Theme for the stylesheet written next to the rendered blobs
    #[arg(long, default_value = gawsh_render::DEFAULT_THEME)]
    pub theme: String,
}

#[derive(Args)]
pub struct StylesheetArgs {
    /// Bundled syntect theme
    #[arg(long, default_value = gawsh_render::DEFAULT_THEME)]
    pub theme: String,

    /// Write the stylesheet here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// List the bundled themes and exit
    #[arg(long)]
    pub list: bool,
}
