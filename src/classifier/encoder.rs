//! Encoder interface and construction arguments

use crate::error::{Error, Result};
use ndarray::{Array2, Array3, Axis};
use rand::{Rng, SeedableRng};
use serde_json::{Map, Value};
use std::path::Path;

/// Maps token ids to contextual hidden states.
///
/// `tokens` and `mask` are `[batch, seq]`; the result is
/// `[batch, seq, hidden_size]`.
pub trait SentenceEncoder {
    fn encode(&self, tokens: &Array2<i64>, mask: &Array2<i64>) -> Result<Array3<f32>>;

    fn hidden_size(&self) -> usize;
}

/// Keyword arguments an encoder is built from, stored as a JSON object
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EncoderKwargs(Map<String, Value>);

impl EncoderKwargs {
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Load from a JSON file holding one object
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        match serde_json::from_str(&content)? {
            Value::Object(map) => Ok(Self(map)),
            other => Err(Error::Serialization(format!(
                "{}: expected a JSON object of encoder arguments, got {other}",
                path.display()
            ))),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Required unsigned integer argument
    pub fn usize(&self, key: &str) -> Result<usize> {
        self.get(key)
            .and_then(Value::as_u64)
            .map(|v| v as usize)
            .ok_or_else(|| Error::InvalidParameter(format!("encoder argument '{key}' must be a non-negative integer")))
    }
}

/// Token-embedding lookup encoder; padded positions encode to zeros
#[derive(Clone, Debug)]
pub struct EmbeddingEncoder {
    table: Array2<f32>,
}

impl EmbeddingEncoder {
    /// Build from `vocab_size` and `hidden_size` arguments with a seeded
    /// normal init
    pub fn from_kwargs(kwargs: &EncoderKwargs, seed: u64) -> Result<Self> {
        let vocab_size = kwargs.usize("vocab_size")?;
        let hidden_size = kwargs.usize("hidden_size")?;
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        let table = Array2::from_shape_fn((vocab_size, hidden_size), |_| {
            let u1: f64 = rng.random::<f64>().max(1e-10);
            let u2: f64 = rng.random::<f64>();
            ((-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos() * 0.02) as f32
        });
        Ok(Self { table })
    }

    pub fn from_table(table: Array2<f32>) -> Self {
        Self { table }
    }

    pub fn vocab_size(&self) -> usize {
        self.table.nrows()
    }
}

impl SentenceEncoder for EmbeddingEncoder {
    fn encode(&self, tokens: &Array2<i64>, mask: &Array2<i64>) -> Result<Array3<f32>> {
        if tokens.shape() != mask.shape() {
            return Err(Error::shape("encoder mask", tokens.shape(), mask.shape()));
        }
        let (batch, seq) = tokens.dim();
        let mut hidden = Array3::zeros((batch, seq, self.hidden_size()));
        for ((b, s), &token) in tokens.indexed_iter() {
            if mask[[b, s]] == 0 {
                continue;
            }
            let row = usize::try_from(token)
                .ok()
                .filter(|&t| t < self.vocab_size())
                .ok_or_else(|| Error::InvalidParameter(format!("token id {token} outside vocabulary of {}", self.vocab_size())))?;
            hidden
                .index_axis_mut(Axis(0), b)
                .index_axis_mut(Axis(0), s)
                .assign(&self.table.row(row));
        }
        Ok(hidden)
    }

    fn hidden_size(&self) -> usize {
        self.table.ncols()
    }
}
