use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "bookledger",
    about = "Hash-linked ledger of book checkouts",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the ledger HTTP server
    Serve(ServeArgs),
    /// Derive a book identifier from its ISBN and publish date
    BookId(BookIdArgs),
    /// Compute a block hash offline
    Hash(HashArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// Listen address; overrides the config file
    #[arg(long)]
    pub bind: Option<String>,
    /// TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct BookIdArgs {
    #[arg(long)]
    pub isbn: String,
    #[arg(long, default_value = "")]
    pub publish_date: String,
}

#[derive(Args)]
pub struct HashArgs {
    #[arg(long)]
    pub position: u64,
    #[arg(long)]
    pub timestamp: String,
    #[arg(long, default_value = "")]
    pub book_id: String,
    #[arg(long, default_value = "")]
    pub user: String,
    #[arg(long, default_value = "")]
    pub checkout_date: String,
    #[arg(long, default_value = "")]
    pub previous_hash: String,
    /// Hash a genesis payload
    #[arg(long)]
    pub genesis: bool,
}
