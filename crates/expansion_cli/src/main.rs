//! Batch entry point.
//!
//! # Responsibility
//! - Run the enrichment pipeline with the fixed default configuration.
//! - Map any stage failure to a diagnostic on stderr and exit status 1.

use expansion_core::{default_log_level, init_logging, run, PipelineConfig};
use log::warn;
use std::process;

fn main() {
    if let Err(err) = init_logging(default_log_level()) {
        eprintln!("warning: logging disabled: {err}");
    }

    let config = PipelineConfig::default();
    match run(&config) {
        Ok(summary) => {
            if summary.matched < summary.features {
                warn!(
                    "event=run_complete module=cli status=ok unmatched={}",
                    summary.features - summary.matched
                );
            }
            println!(
                "wrote {} features ({} with acquisition year) to {}",
                summary.features,
                summary.matched,
                summary.output_path.display()
            );
        }
        Err(err) => {
            eprintln!("Error: {err}");
            process::exit(1);
        }
    }
}
