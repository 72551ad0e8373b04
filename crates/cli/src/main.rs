//! refbind binary.
//!
//! Runs the bound-value codec and lookup sessions from the command line
//! against JSON record fixtures.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Command};
use serde::Serialize;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	setup_tracing(cli.verbose);

	match cli.command {
		Command::Parse { value } => print_json(&commands::parse_refs(&value)),
		Command::Filter { entity_type, value } => {
			if let Some(xml) = commands::filter_xml(&entity_type, &value) {
				println!("{xml}");
			}
			Ok(())
		}
		Command::Resolve { session } => print_json(&commands::resolve(&session).await?),
		Command::Add { session, picks } => print_json(&commands::add(&session, &picks).await?),
		Command::Remove { session, id } => print_json(&commands::remove(&session, &id).await?),
	}
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
	println!("{}", serde_json::to_string_pretty(value)?);
	Ok(())
}

fn setup_tracing(verbose: bool) {
	tracing_subscriber::fmt()
		.with_writer(std::io::stderr)
		.with_max_level(if verbose {
			tracing::Level::DEBUG
		} else {
			tracing::Level::INFO
		})
		.init();
}
