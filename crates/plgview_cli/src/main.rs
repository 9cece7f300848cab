#![allow(missing_docs)]

use std::io::{self, IsTerminal};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod cmd;

#[derive(Parser)]
#[command(name = "plgview", about = "Inspect plg container values in process memory")]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	Inspect(cmd::inspect::Args),
	Capture(cmd::capture::Args),
	Catalog(cmd::catalog::Args),
	Layout(cmd::layout::Args),
	Formatters(cmd::formatters::Args),
}

fn main() {
	init_logging();
	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> plgview::plg::Result<()> {
	let cli = Cli::parse();

	match cli.command {
		Commands::Inspect(args) => cmd::inspect::run(args),
		Commands::Capture(args) => cmd::capture::run(args),
		Commands::Catalog(args) => cmd::catalog::run(args),
		Commands::Layout(args) => cmd::layout::run(args),
		Commands::Formatters(args) => cmd::formatters::run(args),
	}
}

/// `PLGVIEW_LOG` takes an `EnvFilter` directive; default is `warn`.
fn init_logging() {
	let filter = EnvFilter::try_from_env("PLGVIEW_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
	let layer = tracing_subscriber::fmt::layer()
		.with_ansi(io::stderr().is_terminal())
		.with_target(false)
		.without_time()
		.with_writer(io::stderr);
	tracing_subscriber::registry().with(filter).with(layer).init();
}
