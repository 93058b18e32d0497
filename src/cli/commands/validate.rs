//! Validate command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{load_config, EvalSpec, ValidateArgs};

/// Format the evaluation settings as a string
pub fn format_eval_info(spec: &EvalSpec) -> String {
    let mut lines = vec![
        format!("  Task: {}", spec.task),
        format!("  Input mode: {}", spec.input_mode()),
        format!("  Chunk size: {}", spec.chunk_size),
        format!("  Batch size: {}", spec.eval_batch_size),
    ];
    lines.push(format!("  Metrics: {}", spec.metrics.join(", ")));
    lines.join("\n")
}

/// Format data and output settings as a string
pub fn format_data_info(spec: &EvalSpec) -> String {
    let test_line = if spec.eval_valid {
        format!("  Test runs evaluate validation data: {}", spec.datapaths(true).join(", "))
    } else {
        format!("  Test data: {}", spec.datapaths(true).join(", "))
    };
    let mut lines = vec![format!("  Validation data: {}", spec.datapaths(false).join(", ")), test_line];
    if spec.output_predictions {
        lines.push(format!("  Predictions written to: {}", spec.log_dir.display()));
    }
    lines.join("\n")
}

/// Print detailed configuration summary
pub fn print_detailed_summary(spec: &EvalSpec) {
    println!();
    println!("Configuration Summary:");
    println!("{}", format_eval_info(spec));
    println!();
    println!("{}", format_data_info(spec));
}

pub fn run_validate(args: ValidateArgs, level: LogLevel) -> Result<(), String> {
    log(
        level,
        LogLevel::Normal,
        &format!("Validating config: {}", args.config.display()),
    );

    let spec = load_config(&args.config).map_err(|e| format!("Config error: {e}"))?;

    log(level, LogLevel::Normal, "Configuration is valid");

    if args.detailed {
        print_detailed_summary(&spec);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InputModeKind;
    use std::path::PathBuf;

    fn make_test_spec() -> EvalSpec {
        let mut spec = EvalSpec::new("copa");
        spec.input_mode = InputModeKind::FastDecode;
        spec.metrics = vec!["accuracy".into(), "f1".into()];
        spec.output_predictions = true;
        spec.log_dir = PathBuf::from("/runs");
        spec
    }

    #[test]
    fn test_format_eval_info() {
        let info = format_eval_info(&make_test_spec());
        assert!(info.contains("Task: copa"));
        assert!(info.contains("Input mode: fast_decode"));
        assert!(info.contains("Chunk size: 10"));
        assert!(info.contains("Metrics: accuracy, f1"));
    }

    #[test]
    fn test_format_data_info() {
        let info = format_data_info(&make_test_spec());
        assert!(info.contains("Validation data: dev"));
        assert!(info.contains("Test data: test"));
        assert!(info.contains("Predictions written to: /runs"));
    }

    #[test]
    fn test_format_data_info_eval_valid() {
        let mut spec = make_test_spec();
        spec.eval_valid = true;
        spec.test_data = Some(vec!["test_a".into()]);
        let info = format_data_info(&spec);
        assert!(!info.contains("Test data"));
        assert!(!info.contains("test_a"));
        assert!(info.contains("Test runs evaluate validation data: dev"));
    }

    #[test]
    fn test_format_data_info_without_predictions() {
        let spec = EvalSpec::new("copa");
        assert!(!format_data_info(&spec).contains("Predictions"));
    }
}
