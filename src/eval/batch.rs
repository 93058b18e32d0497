//! Batch and example-identity types

use crate::error::{Error, Result};
use ndarray::{Array2, ArrayD};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable per-example identifier used to correlate predictions with metadata
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Uid(String);

impl Uid {
    /// Create a uid from anything string-like
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the underlying identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Uid {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for Uid {
    fn from(id: String) -> Self {
        Self(id)
    }
}

macro_rules! uid_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for Uid {
            fn from(id: $t) -> Self {
                Self(id.to_string())
            }
        })*
    };
}

uid_from_int!(u32, u64, usize, i32, i64);

/// Decoder-side tensors used by fast-decode evaluation
#[derive(Clone, Debug)]
pub struct DecoderInputs {
    /// Decoder token ids, choice dimension on axis 1
    pub text: ArrayD<i64>,
    /// Decoder position ids
    pub position: ArrayD<i64>,
    /// Decoder attention mask
    pub mask: ArrayD<i64>,
    /// Decoder target ids
    pub target: ArrayD<i64>,
    /// Decoder logit mask
    pub logit_mask: ArrayD<i64>,
}

/// An ordered batch of examples with their model-input tensors.
///
/// Only `uids`, `labels` and `text` are always present. Which of the optional
/// tensors are required depends on the evaluator's [`InputMode`].
///
/// [`InputMode`]: super::InputMode
#[derive(Clone, Debug)]
pub struct Batch {
    /// One uid per example
    pub uids: Vec<Uid>,
    /// Gold choice index per example
    pub labels: Vec<usize>,
    /// Primary token tensor, `[batch, ...]` (`[batch, choices, seq]` for multi-choice)
    pub text: ArrayD<i64>,
    /// Segment/type ids (pretrained mode)
    pub types: Option<ArrayD<i64>>,
    /// Padding mask (pretrained mode)
    pub padding_mask: Option<ArrayD<i64>>,
    /// Position ids
    pub position: Option<ArrayD<i64>>,
    /// Attention mask
    pub mask: Option<ArrayD<i64>>,
    /// Target ids (cloze mode)
    pub target: Option<ArrayD<i64>>,
    /// Logit mask (cloze mode)
    pub logit_mask: Option<ArrayD<i64>>,
    /// Continuous-prompt positions
    pub prompt_pos: Option<ArrayD<i64>>,
    /// Decoder-side tensors (fast-decode mode)
    pub decoder: Option<DecoderInputs>,
    /// Groups raw choices into logical choices, `[batch, choices]`
    pub segment_id: Option<Array2<usize>>,
    /// 1.0 for valid choices, 0.0 for masked ones, `[batch, choices]`
    pub loss_mask: Option<Array2<f32>>,
}

impl Batch {
    /// Create a batch with only the always-present fields set
    pub fn new(uids: Vec<Uid>, labels: Vec<usize>, text: ArrayD<i64>) -> Self {
        Self {
            uids,
            labels,
            text,
            types: None,
            padding_mask: None,
            position: None,
            mask: None,
            target: None,
            logit_mask: None,
            prompt_pos: None,
            decoder: None,
            segment_id: None,
            loss_mask: None,
        }
    }

    /// Number of examples in the batch
    pub fn size(&self) -> usize {
        self.uids.len()
    }

    /// Check that uids, labels and every tensor agree on the batch size
    pub fn validate(&self) -> Result<()> {
        let n = self.uids.len();
        if self.labels.len() != n {
            return Err(Error::shape("batch labels", &[n], &[self.labels.len()]));
        }

        let mut leading: Vec<(&str, usize)> = vec![("text", leading_dim(self.text.shape()))];
        let optional = [
            ("types", &self.types),
            ("padding_mask", &self.padding_mask),
            ("position", &self.position),
            ("mask", &self.mask),
            ("target", &self.target),
            ("logit_mask", &self.logit_mask),
            ("prompt_pos", &self.prompt_pos),
        ];
        for (name, tensor) in optional {
            if let Some(t) = tensor {
                leading.push((name, leading_dim(t.shape())));
            }
        }
        if let Some(dec) = &self.decoder {
            leading.push(("dec_text", leading_dim(dec.text.shape())));
            leading.push(("dec_position", leading_dim(dec.position.shape())));
            leading.push(("dec_mask", leading_dim(dec.mask.shape())));
            leading.push(("dec_target", leading_dim(dec.target.shape())));
            leading.push(("dec_logit_mask", leading_dim(dec.logit_mask.shape())));
        }
        if let Some(seg) = &self.segment_id {
            leading.push(("segment_id", seg.nrows()));
        }
        if let Some(mask) = &self.loss_mask {
            leading.push(("loss_mask", mask.nrows()));
        }

        for (name, rows) in leading {
            if rows != n {
                return Err(Error::shape(format!("batch field '{name}'"), &[n], &[rows]));
            }
        }
        Ok(())
    }
}

fn leading_dim(shape: &[usize]) -> usize {
    shape.first().copied().unwrap_or(0)
}
