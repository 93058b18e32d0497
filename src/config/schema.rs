//! YAML schema for declarative evaluation configuration

use crate::eval::InputMode;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

/// Deserialize a bool from either a YAML boolean (`true`) or a quoted string (`"true"`).
fn deserialize_bool_lenient<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        Str(String),
    }

    match BoolOrString::deserialize(deserializer)? {
        BoolOrString::Bool(b) => Ok(b),
        BoolOrString::Str(s) => match s.to_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "expected 'true' or 'false', got '{other}'"
            ))),
        },
    }
}

/// Input assembly mode as written in YAML
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputModeKind {
    /// Pretrained encoder inputs
    Pretrained,
    /// Cloze / mask prediction
    #[default]
    Cloze,
    /// Cloze with decoder-side inputs
    FastDecode,
    /// Plain language model inputs
    Plain,
}

/// Complete evaluation specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalSpec {
    /// Task name (`"wsc"` inverts binary predictions)
    pub task: String,

    /// How batches become model inputs
    #[serde(default)]
    pub input_mode: InputModeKind,

    /// Append continuous-prompt positions (cloze only)
    #[serde(
        default,
        deserialize_with = "deserialize_bool_lenient"
    )]
    pub continuous_prompt: bool,

    /// Maximum choices per model invocation
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Batch size used by data loaders
    #[serde(default = "default_eval_batch_size")]
    pub eval_batch_size: usize,

    /// Metric names, in report order
    #[serde(default = "default_metrics")]
    pub metrics: Vec<String>,

    /// Directory prediction files are written to
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    /// Write per-dataset predictions
    #[serde(
        default,
        deserialize_with = "deserialize_bool_lenient"
    )]
    pub output_predictions: bool,

    /// Evaluate validation data even in test runs
    #[serde(
        default,
        deserialize_with = "deserialize_bool_lenient"
    )]
    pub eval_valid: bool,

    /// Validation dataset names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_data: Option<Vec<String>>,

    /// Test dataset names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_data: Option<Vec<String>>,
}

fn default_chunk_size() -> usize {
    crate::eval::DEFAULT_CHUNK_SIZE
}

fn default_eval_batch_size() -> usize {
    8
}

fn default_metrics() -> Vec<String> {
    vec!["accuracy".to_string()]
}

fn default_log_dir() -> PathBuf {
    PathBuf::from(".")
}

impl EvalSpec {
    /// Spec for `task` with every other field at its default
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            input_mode: InputModeKind::default(),
            continuous_prompt: false,
            chunk_size: default_chunk_size(),
            eval_batch_size: default_eval_batch_size(),
            metrics: default_metrics(),
            log_dir: default_log_dir(),
            output_predictions: false,
            eval_valid: false,
            valid_data: None,
            test_data: None,
        }
    }

    /// Resolved input mode
    pub fn input_mode(&self) -> InputMode {
        match self.input_mode {
            InputModeKind::Pretrained => InputMode::Pretrained,
            InputModeKind::Cloze => InputMode::Cloze {
                continuous_prompt: self.continuous_prompt,
            },
            InputModeKind::FastDecode => InputMode::FastDecode,
            InputModeKind::Plain => InputMode::Plain,
        }
    }

    /// Datasets to evaluate.
    ///
    /// Test runs use the test data unless `eval_valid` is set.
    pub fn datapaths(&self, is_test: bool) -> Vec<String> {
        if is_test && !self.eval_valid {
            self.test_data
                .clone()
                .unwrap_or_else(|| vec!["test".to_string()])
        } else {
            self.valid_data
                .clone()
                .unwrap_or_else(|| vec!["dev".to_string()])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_minimal_yaml() {
        let spec: EvalSpec = serde_yaml::from_str("task: copa").unwrap();
        assert_eq!(spec, EvalSpec::new("copa"));
        assert_eq!(spec.chunk_size, 10);
        assert_eq!(spec.input_mode(), InputMode::Cloze { continuous_prompt: false });
    }

    #[test]
    fn test_snake_case_modes() {
        let spec: EvalSpec =
            serde_yaml::from_str("task: rte\ninput_mode: fast_decode").unwrap();
        assert_eq!(spec.input_mode, InputModeKind::FastDecode);
        assert_eq!(spec.input_mode(), InputMode::FastDecode);
    }

    #[test]
    fn test_lenient_bool() {
        let yaml = "task: copa\ncontinuous_prompt: \"true\"\noutput_predictions: \"FALSE\"";
        let spec: EvalSpec = serde_yaml::from_str(yaml).unwrap();
        assert!(spec.continuous_prompt);
        assert!(!spec.output_predictions);
        assert_eq!(spec.input_mode(), InputMode::Cloze { continuous_prompt: true });
    }

    #[test]
    fn test_lenient_bool_rejects_garbage() {
        let result: Result<EvalSpec, _> = serde_yaml::from_str("task: copa\neval_valid: \"yes\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_datapaths_defaults() {
        let spec = EvalSpec::new("copa");
        assert_eq!(spec.datapaths(false), vec!["dev"]);
        assert_eq!(spec.datapaths(true), vec!["test"]);
    }

    #[test]
    fn test_datapaths_eval_valid_in_test_run() {
        let mut spec = EvalSpec::new("copa");
        spec.eval_valid = true;
        spec.valid_data = Some(vec!["dev1".into(), "dev2".into()]);
        spec.test_data = Some(vec!["hidden".into()]);
        assert_eq!(spec.datapaths(true), vec!["dev1", "dev2"]);
        spec.eval_valid = false;
        assert_eq!(spec.datapaths(true), vec!["hidden"]);
    }

    #[test]
    fn test_roundtrip_yaml() {
        let mut spec = EvalSpec::new("wsc");
        spec.metrics = vec!["accuracy".into(), "f1".into()];
        let yaml = serde_yaml::to_string(&spec).unwrap();
        assert!(!yaml.contains("valid_data"));
        let back: EvalSpec = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, spec);
    }
}
