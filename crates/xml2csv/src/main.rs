use clap::Parser;
use colored::Colorize;
use env_logger::Env;

mod convert;
mod progress;

#[derive(Parser)]
#[command(name = "xml2csv")]
#[command(about = "Convert a KiCad XML component export to a CSV bill of materials", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short = 'd', long = "debug", hide = true)]
    debug: bool,

    #[command(flatten)]
    convert: convert::ConvertArgs,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {e}", "Error:".red());
        for cause in e.chain().skip(1) {
            eprintln!("  {cause}");
        }
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if std::env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    }

    // Default level depends on --debug, RUST_LOG still wins
    let env = if cli.debug {
        Env::default().default_filter_or("debug")
    } else {
        Env::default().default_filter_or("warn")
    };
    env_logger::Builder::from_env(env).init();

    log::debug!("xml2csv {}", env!("CARGO_PKG_VERSION"));

    convert::execute(cli.convert)
}
