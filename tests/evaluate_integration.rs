//! End-to-end evaluation: YAML spec, classifier model, prediction dumps

use evaluar::classifier::{EmbeddingEncoder, Linear, SentenceClassifier};
use evaluar::config::{load_config, EvalSpec};
use evaluar::eval::{Batch, EvalDataset, ExampleMap, JsonlPredictionWriter, MultiChoiceEvaluator, Uid};
use evaluar::Error;
use ndarray::{array, Array1, Array2, ArrayD};
use serde::Serialize;
use std::fs;
use tempfile::TempDir;

#[derive(Debug, Serialize)]
struct Pair {
    premise: String,
}

/// Token 1 encodes to label 0, token 2 to label 1
fn model() -> SentenceClassifier<EmbeddingEncoder> {
    let encoder = EmbeddingEncoder::from_table(array![[0.0, 0.0], [3.0, 0.0], [0.0, 3.0]]);
    let head = Linear::from_parts(array![[1.0, 0.0], [0.0, 1.0]], Array1::zeros(2)).unwrap();
    SentenceClassifier::with_head(encoder, head).unwrap()
}

/// Pretrained-mode batch; `cls[i]` is the first token of example `i`
fn batch(uids: &[&str], cls: &[i64], labels: &[usize]) -> Batch {
    let text = Array2::from_shape_fn((cls.len(), 3), |(b, s)| if s == 0 { cls[b] } else { 1 }).into_dyn();
    let mut batch = Batch::new(uids.iter().map(|&u| Uid::from(u)).collect(), labels.to_vec(), text.clone());
    batch.types = Some(ArrayD::zeros(text.raw_dim()));
    batch.padding_mask = Some(ArrayD::ones(text.raw_dim()));
    batch
}

fn examples(uids: &[&str]) -> ExampleMap<Pair> {
    ExampleMap::from_pairs(uids.iter().map(|&u| (u, Pair { premise: format!("premise {u}") }))).unwrap()
}

fn write_spec(dir: &TempDir, task: &str) -> EvalSpec {
    let path = dir.path().join("eval.yaml");
    fs::write(
        &path,
        format!(
            "task: {task}\ninput_mode: pretrained\nmetrics: [accuracy, f1_macro]\nlog_dir: {}\noutput_predictions: \"true\"\n",
            dir.path().join("runs").display()
        ),
    )
    .unwrap();
    load_config(&path).unwrap()
}

#[test]
fn test_yaml_to_report_with_prediction_files() {
    let dir = TempDir::new().unwrap();
    let spec = write_spec(&dir, "mnli");
    assert!(spec.output_predictions);
    let evaluator: MultiChoiceEvaluator<Pair> = MultiChoiceEvaluator::from_spec(&spec).unwrap();

    // dev: 3/4 correct, test: 1/1 correct
    let dev_uids = ["d0", "d1", "d2", "d3"];
    let dev = vec![
        batch(&dev_uids[..2], &[1, 2], &[0, 1]),
        batch(&dev_uids[2..], &[2, 2], &[1, 0]),
    ];
    let test = vec![batch(&["t0"], &[1], &[0])];
    let datasets = vec![
        EvalDataset::new("dev", dev).with_examples(examples(&dev_uids)),
        EvalDataset::new("test", test).with_examples(examples(&["t0"])),
    ];

    let mut model = model();
    let mut writer = JsonlPredictionWriter;
    let report = evaluator
        .evaluate_with_report(&mut model, &datasets, 3, Some(&mut writer))
        .unwrap();

    assert_eq!(report.datasets.len(), 2);
    assert_eq!(report.overall.total, 5);
    let accuracy = report.scores().get("accuracy").unwrap();
    assert!((accuracy - 80.0).abs() < 1e-9);
    assert!(report.overall.to_string().starts_with("epoch: 3| overall: total = 5 accuracy=80.0000"));

    let dumped = fs::read_to_string(dir.path().join("runs").join("dev.jsonl")).unwrap();
    let lines: Vec<serde_json::Value> = dumped.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[1]["prediction"], 1);
    assert_eq!(lines[1]["example"]["premise"], "premise d1");
    assert!(dir.path().join("runs").join("test.jsonl").exists());
}

#[test]
fn test_wsc_spec_inverts_predictions() {
    let dir = TempDir::new().unwrap();
    let spec = write_spec(&dir, "wsc");
    let evaluator: MultiChoiceEvaluator<Pair> = MultiChoiceEvaluator::from_spec(&spec).unwrap();

    // model picks 0 and 1; inverted they become 1 and 0
    let uids = ["a", "b"];
    let datasets = vec![EvalDataset::new("dev", vec![batch(&uids, &[1, 2], &[1, 0])]).with_examples(examples(&uids))];
    let scores = evaluator.evaluate(&mut model(), &datasets, 0).unwrap();
    assert!((scores.get("accuracy").unwrap() - 100.0).abs() < 1e-9);
}

#[test]
fn test_missing_uid_aborts_evaluation() {
    let dir = TempDir::new().unwrap();
    let spec = write_spec(&dir, "mnli");
    let evaluator: MultiChoiceEvaluator<Pair> = MultiChoiceEvaluator::from_spec(&spec).unwrap();

    let datasets = vec![EvalDataset::new("dev", vec![batch(&["a"], &[1], &[0])]).with_examples(examples(&["a", "ghost"]))];
    let mut model = model();
    let err = evaluator.evaluate(&mut model, &datasets, 0).unwrap_err();
    assert!(matches!(err, Error::MissingUid { ref uid, .. } if uid == "ghost"));
}

#[test]
fn test_unknown_metric_in_spec() {
    let mut spec = EvalSpec::new("copa");
    spec.metrics = vec!["bleu".into()];
    let result: evaluar::Result<MultiChoiceEvaluator<Pair>> = MultiChoiceEvaluator::from_spec(&spec);
    assert!(matches!(result, Err(Error::UnknownMetric(_))));
}
