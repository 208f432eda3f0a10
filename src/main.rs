//! Reckon command-line entry point.

use std::{io, io::Write, time::Instant};

use anyhow::Result;
use humanize_duration::{Truncate, prelude::DurationExt};
use tracing::debug;

use reckon::{
    config::{Config, OutputFormat},
    logging, report,
};

fn main() -> Result<()> {
    let config = Config::load().unwrap_or_else(|err| err.exit());

    logging::init(&config.logging)?;

    let currency = config.currency()?;
    let request = config.request()?;

    debug!(strategy = ?config.strategy, limit = request.limit.get(), "Searching");

    let start = Instant::now();
    let results = request.run(config.strategy)?;
    let elapsed = start.elapsed();

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match config.output {
        OutputFormat::Table => {
            report::write_table(&mut handle, &results, currency)?;

            writeln!(
                handle,
                "\n {} ({}s)",
                elapsed.human(Truncate::Nano),
                elapsed.as_secs_f32()
            )?;
        }
        OutputFormat::Yaml => report::write_yaml(&mut handle, &results)?,
    }

    Ok(())
}
