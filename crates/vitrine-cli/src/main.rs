//! Vitrine CLI
//!
//! Inspects and builds storefront paths that carry an encoded state segment.
//!
//! ## Usage
//!
//! ```bash
//! vitrine decode 'color=blue_yellow;page=2'
//! vitrine encode page=2 color=yellow,blue
//! vitrine link /products/shoes/page=3 --key color --value blue --remove page
//! vitrine listing /products/shoes/color=blue;sort=priceHigh
//! vitrine --config storefront.toml -vv listing /products/hats
//! ```

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use vitrine_codec::{FieldMap, FieldValue, KEY_VALUE_DELIMITER, decode, encode};
use vitrine_conf::StorefrontSettings;
use vitrine_urls::{Location, ProductListing, next_location};

/// Separates list elements in command-line values.
const LIST_SEPARATOR: char = ',';

#[derive(Parser)]
#[command(name = "vitrine")]
#[command(about = "Storefront path-state utility", long_about = None)]
#[command(version)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	/// Settings file (TOML), layered over the defaults
	#[arg(short, long, global = true, value_name = "FILE")]
	config: Option<PathBuf>,

	/// Verbosity level (can be repeated)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	verbosity: u8,
}

#[derive(Subcommand)]
enum Commands {
	/// Decode a state segment and print it as JSON
	Decode {
		/// Encoded segment, e.g. `color=blue_yellow;page=2`
		#[arg(value_name = "SEGMENT")]
		segment: String,
	},

	/// Encode fields into a canonical state segment
	Encode {
		/// Fields as KEY=VALUE; comma-separated values become lists
		#[arg(value_name = "KEY=VALUE")]
		fields: Vec<String>,
	},

	/// Print the path a state change would navigate to
	Link {
		/// Current path
		#[arg(value_name = "PATH")]
		path: String,

		/// Field to set
		#[arg(short, long)]
		key: String,

		/// New value; comma-separated values become a list, empty removes the key
		#[arg(long, default_value = "", allow_hyphen_values = true)]
		value: String,

		/// Fields to drop in the same change
		#[arg(short, long = "remove", value_name = "KEY")]
		remove: Vec<String>,
	},

	/// Print the listing request a path asks for
	Listing {
		/// Listing path, e.g. `/products/shoes/page=2`
		#[arg(value_name = "PATH")]
		path: String,
	},
}

fn main() {
	let cli = Cli::parse();
	init_tracing(cli.verbosity);

	match run(cli) {
		Ok(output) => println!("{output}"),
		Err(e) => {
			eprintln!("Error: {e:#}");
			process::exit(1);
		}
	}
}

/// Routes log output to stderr; `RUST_LOG` takes precedence over `-v`.
fn init_tracing(verbosity: u8) {
	let level = match verbosity {
		0 => "warn",
		1 => "info",
		2 => "debug",
		_ => "trace",
	};
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();
}

fn run(cli: Cli) -> Result<String> {
	match cli.command {
		Commands::Decode { segment } => run_decode(&segment),
		Commands::Encode { fields } => run_encode(&fields),
		Commands::Link {
			path,
			key,
			value,
			remove,
		} => run_link(&load_settings(cli.config)?, &path, &key, &value, &remove),
		Commands::Listing { path } => run_listing(&load_settings(cli.config)?, &path),
	}
}

fn load_settings(config: Option<PathBuf>) -> Result<StorefrontSettings> {
	let settings = StorefrontSettings::load(config.as_deref()).context("failed to load settings")?;
	debug!(route = %settings.route_template, "using settings");
	Ok(settings)
}

fn run_decode(segment: &str) -> Result<String> {
	let map = decode(Some(segment));
	Ok(serde_json::to_string_pretty(&map)?)
}

fn run_encode(fields: &[String]) -> Result<String> {
	let mut map = FieldMap::new();
	for field in fields {
		let Some((key, value)) = field.split_once(KEY_VALUE_DELIMITER) else {
			bail!("expected KEY=VALUE, got '{field}'");
		};
		map.insert(key, parse_value(value));
	}
	map.validate()?;
	Ok(encode(&map))
}

fn run_link(
	settings: &StorefrontSettings,
	path: &str,
	key: &str,
	value: &str,
	remove: &[String],
) -> Result<String> {
	let location = Location::resolve(settings.route()?, path);
	if location.parts().is_none() {
		bail!("'{path}' does not match {}", settings.route_template);
	}
	let href = next_location(&location, &settings.path_state(), key, parse_value(value), remove)?;
	Ok(href)
}

fn run_listing(settings: &StorefrontSettings, path: &str) -> Result<String> {
	let listing =
		ProductListing::from_path(path, &settings.route()?, &settings.path_state(), &settings.keys)?;
	Ok(serde_json::to_string_pretty(&listing)?)
}

/// `a,b` becomes a list, anything else a single value.
fn parse_value(value: &str) -> FieldValue {
	if value.contains(LIST_SEPARATOR) {
		FieldValue::from(
			value
				.split(LIST_SEPARATOR)
				.map(str::to_string)
				.collect::<Vec<_>>(),
		)
	} else {
		FieldValue::from(value)
	}
}
