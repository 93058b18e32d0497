//! Linear + softmax head over the first token's hidden state

use super::encoder::SentenceEncoder;
use super::linear::Linear;
use crate::error::{Error, Result};
use crate::eval::{ChoiceModel, ModelOutput};
use ndarray::{Array2, ArrayD, Axis, Ix2};
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Classification head hyperparameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    pub hidden_size: usize,
    pub num_labels: usize,
    #[serde(default)]
    pub seed: u64,
}

/// Numerically stable softmax over each row
pub fn softmax_rows(logits: &Array2<f32>) -> Array2<f32> {
    let mut probs = logits.clone();
    for mut row in probs.axis_iter_mut(Axis(0)) {
        let max = row.fold(f32::NEG_INFINITY, |m, &v| m.max(v));
        row.mapv_inplace(|v| (v - max).exp());
        let sum = row.sum();
        row.mapv_inplace(|v| v / sum);
    }
    probs
}

/// Encoder followed by a linear classifier on the CLS position
pub struct SentenceClassifier<E> {
    encoder: E,
    classifier: Linear,
    training: bool,
}

impl<E: SentenceEncoder> SentenceClassifier<E> {
    /// Attach a freshly initialized head to `encoder`
    pub fn new(encoder: E, config: &ClassifierConfig) -> Result<Self> {
        let mut rng = rand::rngs::StdRng::seed_from_u64(config.seed);
        let classifier = Linear::new(config.hidden_size, config.num_labels, &mut rng);
        Self::with_head(encoder, classifier)
    }

    /// Attach an existing head; its input width must match the encoder
    pub fn with_head(encoder: E, classifier: Linear) -> Result<Self> {
        if classifier.in_features() != encoder.hidden_size() {
            return Err(Error::shape(
                "classifier head input",
                &[encoder.hidden_size()],
                &[classifier.in_features()],
            ));
        }
        Ok(Self { encoder, classifier, training: false })
    }

    pub fn num_labels(&self) -> usize {
        self.classifier.out_features()
    }

    /// Label probabilities `[batch, num_labels]`; each row sums to 1
    pub fn classify(&self, tokens: &Array2<i64>, mask: &Array2<i64>) -> Result<Array2<f32>> {
        let hidden = self.encoder.encode(tokens, mask)?;
        if hidden.len_of(Axis(1)) == 0 {
            return Err(Error::shape("encoder output", &[tokens.nrows(), 1, self.encoder.hidden_size()], hidden.shape()));
        }
        let cls = hidden.index_axis(Axis(1), 0);
        Ok(softmax_rows(&self.classifier.forward(cls)?))
    }
}

fn as_matrix(input: &ArrayD<i64>, name: &str) -> Result<Array2<i64>> {
    input
        .view()
        .into_dimensionality::<Ix2>()
        .map(|view| view.to_owned())
        .map_err(|_| Error::shape(format!("classifier {name}"), &[0, 0], input.shape()))
}

/// Pretrained-mode inputs: `[text, types, padding_mask]`
impl<E: SentenceEncoder> ChoiceModel for SentenceClassifier<E> {
    fn forward(&mut self, inputs: &[ArrayD<i64>]) -> Result<ModelOutput> {
        let (text, mask) = match inputs {
            [text, _types, mask, ..] => (text, mask),
            _ => return Err(Error::Model(format!("expected 3 pretrained inputs, got {}", inputs.len()))),
        };
        let probs = self.classify(&as_matrix(text, "text")?, &as_matrix(mask, "padding_mask")?)?;
        Ok(ModelOutput::logits(probs))
    }

    fn set_training(&mut self, training: bool) {
        self.training = training;
    }

    fn is_training(&self) -> bool {
        self.training
    }
}
