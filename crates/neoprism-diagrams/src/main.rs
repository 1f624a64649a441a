//! NeoPRISM deployment diagrams entry point.

use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info};

use neoprism_diagrams::{Args, error_adapter::to_reportables};

fn main() {
    // Install miette's pretty panic hook early for better panic reports
    miette::set_panic_hook();

    let args = Args::parse();

    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level: {}. Using 'warn' instead.",
            args.log_level
        );
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    info!(log_level:?; "Starting NeoPRISM diagrams");
    debug!(args:?; "Parsed arguments");

    match neoprism_diagrams::run(&args) {
        Ok(outputs) => {
            info!(diagrams = outputs.len(); "Deployment diagrams written");
            // One path per line on stdout, for scripts regenerating the docs
            print!("{}", neoprism_diagrams::written_paths(&outputs));
        }
        Err(errors) => {
            let reporter = miette::GraphicalReportHandler::new();

            // Each diagram fails independently, report every failure
            for reportable in to_reportables(&errors) {
                let mut writer = String::new();
                reporter
                    .render_report(&mut writer, &reportable)
                    .expect("Writing to String buffer is infallible");

                error!("{writer}");
            }

            error!(failed = errors.len(); "Some deployment diagrams were not written");
            process::exit(1);
        }
    }
}
