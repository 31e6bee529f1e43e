//! A demonstration binary wired up the way the upstream build tool wires its own bin crates
//! (`dukemakemc` in particular): `clap` does the argument parsing, `fern` is the one concrete
//! logging dispatcher, and the actual work is delegated to the library crates in the workspace.

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};

mod demo;

#[derive(Debug, Parser)]
#[command(about = "Reachability analysis and IR rewriting core for JVM/DEX bytecode shrinking.")]
struct Cli {
	/// Be verbose.
	#[arg(short = 'v', long = "verbose")]
	verbose: bool,

	#[command(subcommand)]
	command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
	/// Runs a bundled worked example end to end: builds a tiny in-memory app model, a directly
	/// constructed `KeepConfiguration`, and reports what the enqueuer finds live.
	Demo {
		/// Which worked example to run.
		#[arg(value_enum, default_value_t = demo::Scenario::InterfaceDefault)]
		scenario: demo::Scenario,
	},
}

fn setup_logging(verbose: bool) -> Result<()> {
	let level = if verbose { log::LevelFilter::Trace } else { log::LevelFilter::Info };
	fern::Dispatch::new()
		.format(|out, message, record| {
			out.finish(format_args!("[{} {}] {}", record.level(), record.target(), message))
		})
		.level(level)
		.chain(std::io::stderr())
		.apply()
		.context("failed to install the logger")
}

fn main() -> Result<()> {
	let cli = Cli::parse();
	setup_logging(cli.verbose)?;

	match cli.command {
		Command::Demo { scenario } => demo::run(scenario)?,
	}

	Ok(())
}
