//! Sentence classification head over a pretrained encoder
//!
//! A [`SentenceClassifier`] takes the encoder's first-token (CLS) state,
//! applies a linear layer and a softmax over labels. It implements
//! [`ChoiceModel`](crate::eval::ChoiceModel) for
//! [`InputMode::Pretrained`](crate::eval::InputMode::Pretrained), treating
//! each label as a choice.

mod encoder;
mod head;
mod linear;

pub use encoder::{EmbeddingEncoder, EncoderKwargs, SentenceEncoder};
pub use head::{softmax_rows, ClassifierConfig, SentenceClassifier};
pub use linear::Linear;
