//! Model interface consumed by the evaluator

use crate::error::Result;
use ndarray::{Array2, ArrayD};
use std::ops::{Deref, DerefMut};

/// Output of one forward pass
#[derive(Clone, Debug)]
pub struct ModelOutput {
    /// Per-example logits over choices, `[batch, choices]`
    pub logits: Array2<f32>,
    /// Auxiliary state (e.g. memories); ignored by evaluation
    pub aux: Vec<ArrayD<f32>>,
}

impl ModelOutput {
    /// Output with no auxiliary state
    pub fn logits(logits: Array2<f32>) -> Self {
        Self { logits, aux: Vec::new() }
    }
}

/// A model that scores the choices of each example in a batch.
///
/// `forward` receives the positional input list assembled by the configured
/// [`InputMode`](super::InputMode).
pub trait ChoiceModel {
    /// Run one forward pass
    fn forward(&mut self, inputs: &[ArrayD<i64>]) -> Result<ModelOutput>;

    /// Switch between training (`true`) and evaluation (`false`) behavior
    fn set_training(&mut self, training: bool);

    /// Whether the model is currently in training mode
    fn is_training(&self) -> bool;
}

impl<M: ChoiceModel + ?Sized> ChoiceModel for Box<M> {
    fn forward(&mut self, inputs: &[ArrayD<i64>]) -> Result<ModelOutput> {
        (**self).forward(inputs)
    }

    fn set_training(&mut self, training: bool) {
        (**self).set_training(training);
    }

    fn is_training(&self) -> bool {
        (**self).is_training()
    }
}

/// Holds a model in evaluation mode and restores its previous mode on drop,
/// including when an evaluation pass bails out with an error.
pub struct EvalModeGuard<'m, M: ChoiceModel + ?Sized> {
    model: &'m mut M,
    was_training: bool,
}

impl<'m, M: ChoiceModel + ?Sized> EvalModeGuard<'m, M> {
    /// Put `model` into evaluation mode
    pub fn new(model: &'m mut M) -> Self {
        let was_training = model.is_training();
        model.set_training(false);
        Self { model, was_training }
    }
}

impl<M: ChoiceModel + ?Sized> Deref for EvalModeGuard<'_, M> {
    type Target = M;

    fn deref(&self) -> &M {
        self.model
    }
}

impl<M: ChoiceModel + ?Sized> DerefMut for EvalModeGuard<'_, M> {
    fn deref_mut(&mut self) -> &mut M {
        self.model
    }
}

impl<M: ChoiceModel + ?Sized> Drop for EvalModeGuard<'_, M> {
    fn drop(&mut self) {
        self.model.set_training(self.was_training);
    }
}
