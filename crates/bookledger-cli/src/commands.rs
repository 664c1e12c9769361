use anyhow::Context;
use colored::Colorize;
use serde_json::json;

use bookledger_crypto::BlockHasher;
use bookledger_server::{LedgerServer, ServerConfig};
use bookledger_types::{BookId, CheckoutRecord};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args),
        Command::BookId(args) => cmd_book_id(args, &cli.format),
        Command::Hash(args) => cmd_hash(args, &cli.format),
    }
}

fn load_config(args: &ServeArgs) -> anyhow::Result<ServerConfig> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::from_toml_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = &args.bind {
        config.bind_addr = bind
            .parse()
            .with_context(|| format!("invalid bind address: {bind}"))?;
    }
    Ok(config)
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = load_config(&args)?;
    let server = LedgerServer::new(config)?;
    println!(
        "{} bookledger on http://{}",
        "✓".green().bold(),
        server.config().bind_addr.to_string().bold()
    );
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server.serve())?;
    Ok(())
}

fn cmd_book_id(args: BookIdArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let id = BookId::derive(&args.isbn, &args.publish_date);
    match format {
        OutputFormat::Json => println!("{}", json!({ "isbn": args.isbn, "id": id })),
        OutputFormat::Text => println!("{} {}", "Book id:".bold(), id.to_hex().yellow()),
    }
    Ok(())
}

fn hash_record(args: &HashArgs) -> CheckoutRecord {
    if args.genesis {
        CheckoutRecord::genesis()
    } else {
        CheckoutRecord::new(
            args.book_id.clone(),
            args.user.clone(),
            args.checkout_date.clone(),
        )
    }
}

fn cmd_hash(args: HashArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let record = hash_record(&args);
    let hash = BlockHasher::BLOCK
        .digest_record(args.position, &args.timestamp, &record, &args.previous_hash)
        .context("encoding checkout payload")?;
    match format {
        OutputFormat::Json => println!(
            "{}",
            json!({ "position": args.position, "payload": record, "hash": hash })
        ),
        OutputFormat::Text => {
            println!("Block {} ({})", format!("#{}", args.position).yellow().bold(), record);
            println!("  Hash: {}", hash.cyan());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn serve_args(bind: Option<&str>) -> ServeArgs {
        ServeArgs { bind: bind.map(Into::into), config: None }
    }

    #[test]
    fn bind_flag_overrides_default() {
        let config = load_config(&serve_args(Some("0.0.0.0:9000"))).unwrap();
        assert_eq!(config.bind_addr.port(), 9000);
    }

    #[test]
    fn invalid_bind_is_an_error() {
        assert!(load_config(&serve_args(Some("not-an-addr"))).is_err());
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let args = ServeArgs { bind: None, config: Some(PathBuf::from("/nonexistent/bookledger.toml")) };
        assert!(load_config(&args).is_err());
    }

    #[test]
    fn genesis_flag_selects_genesis_payload() {
        let args = HashArgs {
            position: 0,
            timestamp: "t".into(),
            book_id: "ignored".into(),
            user: String::new(),
            checkout_date: String::new(),
            previous_hash: String::new(),
            genesis: true,
        };
        assert_eq!(hash_record(&args), CheckoutRecord::genesis());
    }
}
