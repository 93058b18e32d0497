//! Info command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{load_config, InfoArgs, OutputFormat};
use crate::eval::PredictionRemap;
use serde::Serialize;

#[derive(Serialize)]
struct ResolvedInfo<'a> {
    task: &'a str,
    input_mode: &'static str,
    chunk_size: usize,
    eval_batch_size: usize,
    metrics: &'a [String],
    datapaths: Vec<String>,
    inverts_predictions: bool,
}

pub fn run_info(args: InfoArgs, level: LogLevel) -> Result<(), String> {
    let spec = load_config(&args.config).map_err(|e| format!("Config error: {e}"))?;
    let info = ResolvedInfo {
        task: &spec.task,
        input_mode: spec.input_mode().name(),
        chunk_size: spec.chunk_size,
        eval_batch_size: spec.eval_batch_size,
        metrics: &spec.metrics,
        datapaths: spec.datapaths(args.test),
        inverts_predictions: PredictionRemap::for_task(&spec.task) != PredictionRemap::Identity,
    };

    match args.format {
        OutputFormat::Text => {
            log(level, LogLevel::Normal, "Evaluation Info:");
            println!();
            println!("Task: {}", info.task);
            println!("Input mode: {}", spec.input_mode());
            println!("Chunk size: {}", info.chunk_size);
            println!("Batch size: {}", info.eval_batch_size);
            println!("Metrics: {}", info.metrics.join(", "));
            println!(
                "{} data: {}",
                if args.test { "Test" } else { "Validation" },
                info.datapaths.join(", ")
            );
            if info.inverts_predictions {
                println!("Binary predictions: inverted");
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&info)
                .map_err(|e| format!("JSON serialization error: {e}"))?;
            println!("{json}");
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(&info)
                .map_err(|e| format!("YAML serialization error: {e}"))?;
            println!("{yaml}");
        }
    }

    Ok(())
}
