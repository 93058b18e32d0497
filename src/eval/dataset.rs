//! Datasets, example mappings and batch sources

use super::batch::{Batch, Uid};
use crate::error::{Error, Result};
use std::collections::HashSet;

/// Produces batches in a fixed order.
///
/// Every batch fetch is treated as a blocking call; any I/O happens inside
/// the implementation.
pub trait BatchSource {
    /// Iterate over the batches of one evaluation pass
    fn batches(&self) -> Box<dyn Iterator<Item = Result<Batch>> + '_>;
}

impl BatchSource for Vec<Batch> {
    fn batches(&self) -> Box<dyn Iterator<Item = Result<Batch>> + '_> {
        Box::new(self.iter().cloned().map(Ok))
    }
}

/// Insertion-ordered mapping from uid to an opaque example.
///
/// Iteration order is the order examples were inserted, which is the order
/// evaluation results are reported in.
#[derive(Clone, Debug)]
pub struct ExampleMap<E> {
    entries: Vec<(Uid, E)>,
    seen: HashSet<Uid>,
}

impl<E> ExampleMap<E> {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self { entries: Vec::new(), seen: HashSet::new() }
    }

    /// Append an example, rejecting duplicate uids
    pub fn insert(&mut self, uid: impl Into<Uid>, example: E) -> Result<()> {
        let uid = uid.into();
        if !self.seen.insert(uid.clone()) {
            return Err(Error::DuplicateUid { uid: uid.to_string() });
        }
        self.entries.push((uid, example));
        Ok(())
    }

    /// Build a mapping from `(uid, example)` pairs
    pub fn from_pairs<U, I>(pairs: I) -> Result<Self>
    where
        U: Into<Uid>,
        I: IntoIterator<Item = (U, E)>,
    {
        let mut map = Self::new();
        for (uid, example) in pairs {
            map.insert(uid, example)?;
        }
        Ok(map)
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&Uid, &E)> {
        self.entries.iter().map(|(uid, example)| (uid, example))
    }

    /// Number of examples
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the mapping is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a uid is present
    pub fn contains(&self, uid: &Uid) -> bool {
        self.seen.contains(uid)
    }
}

impl<E> Default for ExampleMap<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// A named held-out dataset: its batch source plus optional example metadata
pub struct EvalDataset<'a, E> {
    name: String,
    loader: Box<dyn BatchSource + 'a>,
    examples: Option<ExampleMap<E>>,
}

impl<'a, E> EvalDataset<'a, E> {
    /// Create a dataset without example metadata
    pub fn new(name: impl Into<String>, loader: impl BatchSource + 'a) -> Self {
        Self { name: name.into(), loader: Box::new(loader), examples: None }
    }

    /// Attach the uid → example mapping used to order and annotate results
    pub fn with_examples(mut self, examples: ExampleMap<E>) -> Self {
        self.examples = Some(examples);
        self
    }

    /// Dataset name used in reports and output file names
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The batch source
    pub fn loader(&self) -> &dyn BatchSource {
        self.loader.as_ref()
    }

    /// The example mapping, if any
    pub fn examples(&self) -> Option<&ExampleMap<E>> {
        self.examples.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::ArrayD;
    use ndarray::IxDyn;

    #[test]
    fn test_example_map_preserves_insertion_order() {
        let map = ExampleMap::from_pairs([(3u64, "c"), (1u64, "a"), (2u64, "b")]).unwrap();
        let order: Vec<&str> = map.iter().map(|(uid, _)| uid.as_str()).collect();
        assert_eq!(order, vec!["3", "1", "2"]);
        assert_eq!(map.len(), 3);
        assert!(map.contains(&Uid::from(1u64)));
    }

    #[test]
    fn test_example_map_rejects_duplicates() {
        let result = ExampleMap::from_pairs([(1u64, "a"), (1u64, "b")]);
        assert!(matches!(result, Err(Error::DuplicateUid { .. })));
    }

    #[test]
    fn test_vec_batch_source_yields_in_order() {
        let batches = vec![
            Batch::new(vec!["a".into()], vec![0], ArrayD::zeros(IxDyn(&[1, 2]))),
            Batch::new(vec!["b".into()], vec![1], ArrayD::zeros(IxDyn(&[1, 2]))),
        ];
        let uids: Vec<String> = batches
            .batches()
            .map(|b| b.unwrap().uids[0].to_string())
            .collect();
        assert_eq!(uids, vec!["a", "b"]);
    }

    #[test]
    fn test_dataset_accessors() {
        let dataset: EvalDataset<'_, ()> = EvalDataset::new("dev", Vec::<Batch>::new());
        assert_eq!(dataset.name(), "dev");
        assert!(dataset.examples().is_none());
        assert_eq!(dataset.loader().batches().count(), 0);
    }
}
