//! Model input assembly per evaluation mode

use super::batch::Batch;
use crate::error::{Error, Result};
use ndarray::ArrayD;
use std::fmt;

/// How a batch is turned into the model's positional input list.
///
/// Chosen once when the evaluator is configured; never inferred from data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputMode {
    /// Pretrained encoder: `[text, types, padding_mask]`
    Pretrained,
    /// Cloze / mask prediction: `[text, position, mask, target, logit_mask]`,
    /// followed by `prompt_pos` when continuous prompts are enabled
    Cloze {
        /// Append continuous-prompt positions
        continuous_prompt: bool,
    },
    /// Cloze with decoder-side inputs:
    /// `[text, position, mask, dec_text, dec_position, dec_mask, dec_target, dec_logit_mask]`
    FastDecode,
    /// Plain language model: `[text, position, mask]`
    Plain,
}

impl InputMode {
    /// Short name used in diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pretrained => "pretrained",
            Self::Cloze { .. } => "cloze",
            Self::FastDecode => "fast_decode",
            Self::Plain => "plain",
        }
    }

    /// Number of leading encoder-side inputs held fixed when chunking the
    /// decoder choice dimension
    pub(crate) fn encoder_inputs(&self) -> Option<usize> {
        match self {
            Self::FastDecode => Some(3),
            _ => None,
        }
    }

    /// Assemble the positional input list for one batch
    pub fn assemble(&self, batch: &Batch) -> Result<Vec<ArrayD<i64>>> {
        let mode = self.name();
        let need = |field: &'static str, tensor: &Option<ArrayD<i64>>| {
            tensor.clone().ok_or(Error::MissingField { field, mode })
        };

        let inputs = match self {
            Self::Pretrained => vec![
                batch.text.clone(),
                need("types", &batch.types)?,
                need("padding_mask", &batch.padding_mask)?,
            ],
            Self::Cloze { continuous_prompt } => {
                let mut inputs = vec![
                    batch.text.clone(),
                    need("position", &batch.position)?,
                    need("mask", &batch.mask)?,
                    need("target", &batch.target)?,
                    need("logit_mask", &batch.logit_mask)?,
                ];
                if *continuous_prompt {
                    inputs.push(need("prompt_pos", &batch.prompt_pos)?);
                }
                inputs
            }
            Self::FastDecode => {
                let dec = batch
                    .decoder
                    .as_ref()
                    .ok_or(Error::MissingField { field: "decoder", mode })?;
                vec![
                    batch.text.clone(),
                    need("position", &batch.position)?,
                    need("mask", &batch.mask)?,
                    dec.text.clone(),
                    dec.position.clone(),
                    dec.mask.clone(),
                    dec.target.clone(),
                    dec.logit_mask.clone(),
                ]
            }
            Self::Plain => vec![
                batch.text.clone(),
                need("position", &batch.position)?,
                need("mask", &batch.mask)?,
            ],
        };
        Ok(inputs)
    }
}

impl fmt::Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cloze { continuous_prompt: true } => write!(f, "cloze (continuous prompt)"),
            _ => f.write_str(self.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::batch::DecoderInputs;
    use ndarray::IxDyn;

    fn filled(value: i64) -> ArrayD<i64> {
        ArrayD::from_elem(IxDyn(&[1, 2, 3]), value)
    }

    fn cloze_batch() -> Batch {
        let mut batch = Batch::new(vec!["u".into()], vec![0], filled(0));
        batch.position = Some(filled(1));
        batch.mask = Some(filled(2));
        batch.target = Some(filled(3));
        batch.logit_mask = Some(filled(4));
        batch
    }

    #[test]
    fn test_cloze_order() {
        let inputs = InputMode::Cloze { continuous_prompt: false }.assemble(&cloze_batch()).unwrap();
        let firsts: Vec<i64> = inputs.iter().map(|t| t[[0, 0, 0]]).collect();
        assert_eq!(firsts, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_cloze_continuous_prompt_appends_prompt_pos() {
        let mut batch = cloze_batch();
        batch.prompt_pos = Some(filled(5));
        let inputs = InputMode::Cloze { continuous_prompt: true }.assemble(&batch).unwrap();
        assert_eq!(inputs.len(), 6);
        assert_eq!(inputs[5][[0, 0, 0]], 5);
    }

    #[test]
    fn test_pretrained_missing_types() {
        let batch = cloze_batch();
        let err = InputMode::Pretrained.assemble(&batch).unwrap_err();
        assert!(matches!(err, Error::MissingField { field: "types", mode: "pretrained" }));
    }

    #[test]
    fn test_fast_decode_layout() {
        let mut batch = cloze_batch();
        batch.decoder = Some(DecoderInputs {
            text: filled(10),
            position: filled(11),
            mask: filled(12),
            target: filled(13),
            logit_mask: filled(14),
        });
        let inputs = InputMode::FastDecode.assemble(&batch).unwrap();
        let firsts: Vec<i64> = inputs.iter().map(|t| t[[0, 0, 0]]).collect();
        assert_eq!(firsts, vec![0, 1, 2, 10, 11, 12, 13, 14]);
    }

    #[test]
    fn test_fast_decode_requires_decoder() {
        let err = InputMode::FastDecode.assemble(&cloze_batch()).unwrap_err();
        assert!(matches!(err, Error::MissingField { field: "decoder", .. }));
    }
}
