use clap::Parser;
use siftcopy::commands::copy::{run, suggestion_for};
use siftcopy::config::Cli;
use siftcopy::Config;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    siftcopy::logging::init_logging(cli.verbose);

    // Convert CLI args to Config - this validates immediately
    let config = Config::try_from(cli)?;

    if config.verbose && !config.json {
        eprintln!("siftcopy v{}", siftcopy::VERSION);
        eprintln!("{}", config);
    }

    if let Err(err) = run(&config) {
        if let Some(hint) = suggestion_for(&err) {
            eprintln!("hint: {}", hint);
        }
        return Err(err.into());
    }

    Ok(())
}
