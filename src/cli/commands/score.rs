//! Score command implementation
//!
//! Scores offline prediction dumps with the same weighted aggregation the
//! evaluator uses.

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{OutputFormat, ScoreArgs};
use crate::error::{Error, Result};
use crate::eval::{
    classification_report, DatasetSummary, EvalReport, MetricSet, OverallSummary,
    ScoreAccumulator, Uid,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

/// One line of a prediction file
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoredRecord {
    /// Example identifier; strings and integers are accepted
    #[serde(deserialize_with = "deserialize_uid")]
    pub uid: Uid,
    /// Predicted choice
    pub prediction: usize,
    /// Gold choice
    pub label: usize,
}

fn deserialize_uid<'de, D>(deserializer: D) -> std::result::Result<Uid, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StrOrInt {
        Str(String),
        Int(i64),
    }

    Ok(match StrOrInt::deserialize(deserializer)? {
        StrOrInt::Str(s) => Uid::new(s),
        StrOrInt::Int(i) => Uid::from(i),
    })
}

/// Read a JSONL prediction file; a repeated uid replaces the earlier record
fn read_records(path: &Path) -> Result<Vec<ScoredRecord>> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let mut index: HashMap<Uid, usize> = HashMap::new();
    let mut records: Vec<ScoredRecord> = Vec::new();

    for (line_no, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| Error::io(path, e))?;
        if line.trim().is_empty() {
            continue;
        }
        let record: ScoredRecord = serde_json::from_str(&line).map_err(|e| {
            Error::Serialization(format!("{}:{}: {e}", path.display(), line_no + 1))
        })?;
        match index.get(&record.uid) {
            Some(&slot) => {
                log::warn!("uid {} appears more than once in {}; keeping the last record", record.uid, path.display());
                records[slot] = record;
            }
            None => {
                index.insert(record.uid.clone(), records.len());
                records.push(record);
            }
        }
    }
    Ok(records)
}

fn dataset_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Score each file as one dataset and aggregate with sample weighting
pub fn score_files<P: AsRef<Path>>(
    paths: &[P],
    metrics: &MetricSet<ScoredRecord>,
    epoch: i64,
) -> Result<EvalReport> {
    let mut accumulator = ScoreAccumulator::new(metrics.names());
    let mut summaries = Vec::with_capacity(paths.len());

    for path in paths {
        let path = path.as_ref();
        let start = Instant::now();
        let records = read_records(path)?;
        let predictions: Vec<usize> = records.iter().map(|r| r.prediction).collect();
        let labels: Vec<usize> = records.iter().map(|r| r.label).collect();
        let examples: Vec<&ScoredRecord> = records.iter().collect();

        let scores = metrics.compute(&predictions, &labels, &examples)?;
        accumulator.add(&scores, records.len());
        summaries.push(DatasetSummary {
            epoch,
            name: dataset_name(path),
            total: records.len(),
            scores,
            elapsed: start.elapsed(),
        });
    }

    let total = accumulator.total();
    let scores = accumulator.finalize()?;
    Ok(EvalReport {
        datasets: summaries,
        overall: OverallSummary { epoch, total, scores },
    })
}

pub fn run_score(args: ScoreArgs, level: LogLevel) -> std::result::Result<(), String> {
    let metrics = MetricSet::from_names(args.metrics.as_slice()).map_err(|e| e.to_string())?;
    log(
        level,
        LogLevel::Verbose,
        &format!("Scoring {} file(s) with {}", args.files.len(), args.metrics.join(", ")),
    );

    let report = score_files(&args.files, &metrics, args.epoch).map_err(|e| e.to_string())?;

    match args.format {
        OutputFormat::Text => {
            if report.datasets.len() > 1 || level == LogLevel::Verbose {
                for summary in &report.datasets {
                    log(level, LogLevel::Normal, &summary.to_string());
                }
            }
            log(level, LogLevel::Normal, &report.overall.to_string());
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| format!("JSON serialization error: {e}"))?;
            println!("{json}");
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(&report)
                .map_err(|e| format!("YAML serialization error: {e}"))?;
            println!("{yaml}");
        }
    }

    if args.report {
        for path in &args.files {
            let records = read_records(path).map_err(|e| e.to_string())?;
            let predictions: Vec<usize> = records.iter().map(|r| r.prediction).collect();
            let labels: Vec<usize> = records.iter().map(|r| r.label).collect();
            println!();
            println!("{}:", dataset_name(path));
            println!("{}", classification_report(&predictions, &labels));
        }
    }

    Ok(())
}
