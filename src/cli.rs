use std::path::PathBuf;

use structopt::StructOpt;

/// Decides whether a TSS node may proceed with a key gen, key sign or key reshare request.
#[derive(StructOpt, Clone, Debug)]
pub struct Cli {
    #[structopt(short, long, default_value = "configs/callback-server.toml")]
    pub config: PathBuf,

    /// Request JSON file; read from stdin when absent.
    #[structopt(short, long)]
    pub request: Option<PathBuf>,

    /// Input is a token's package data claim rather than a bare request.
    #[structopt(long)]
    pub claim: bool,

    /// Print prometheus metrics to stderr after handling.
    #[structopt(long)]
    pub metrics: bool,
}
