//! CLI schema for the refbind binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use refbind_primitives::{ParsedRef, TypeTag, parse};

#[derive(Parser, Debug)]
#[command(name = "refbind")]
#[command(about = "Inspect and edit id:type bound record values")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Verbose logging
	#[arg(short, long, global = true)]
	pub verbose: bool,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// Print the refs of a bound value as JSON
	Parse {
		/// Bound value (`id:type;id:type`)
		value: String,
	},
	/// Print the picker exclusion filter for one entity type
	Filter {
		/// Entity type to build the filter for
		#[arg(long = "type", short = 't', value_parser = parse_type_tag)]
		entity_type: TypeTag,
		/// Bound value holding the already-selected records
		value: String,
	},
	/// Resolve a bound value against a record fixture
	Resolve {
		#[command(flatten)]
		session: SessionArgs,
	},
	/// Resolve, then add records as if picked in the lookup dialog
	Add {
		#[command(flatten)]
		session: SessionArgs,
		/// Records to pick (`id:type`)
		#[arg(required = true, value_parser = parse_pick)]
		picks: Vec<ParsedRef>,
	},
	/// Resolve, then remove one record
	Remove {
		#[command(flatten)]
		session: SessionArgs,
		/// Identifier of the record to remove
		id: String,
	},
}

/// Inputs shared by the commands that run a lookup session.
#[derive(Args, Debug)]
pub struct SessionArgs {
	/// JSON record fixture: `{ "<type>": { "<id>": { "<field>": value } } }`
	#[arg(long, short = 'r', value_name = "FILE")]
	pub records: PathBuf,

	/// Lookup configuration (TOML). Defaults to unbounded multi-select over the fixture's types.
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: Option<PathBuf>,

	/// Bound value to start from
	pub value: String,
}

fn parse_type_tag(raw: &str) -> Result<TypeTag, String> {
	TypeTag::parse(raw).map_err(|err| err.to_string())
}

fn parse_pick(raw: &str) -> Result<ParsedRef, String> {
	match parse(raw).as_slice() {
		[single] if !raw.contains(';') => Ok(single.clone()),
		_ => Err(format!("expected one id:type pair, got {raw:?}")),
	}
}

#[cfg(test)]
mod tests;
