//! Category names for the classifier's output positions.

use std::collections::HashSet;

use crate::error::LabelsError;

/// Label used when the top output position has no name.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Ordered category names; position `i` names output `i` of the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels(Vec<String>);

impl Labels {
    pub fn new(names: Vec<String>) -> Result<Self, LabelsError> {
        if names.is_empty() {
            return Err(LabelsError::Empty);
        }
        let mut seen = HashSet::new();
        for (i, name) in names.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(LabelsError::Blank(i));
            }
            if !seen.insert(name.as_str()) {
                return Err(LabelsError::Duplicate(name.clone()));
            }
        }
        Ok(Self(names))
    }

    /// Parse a comma-separated list such as `Education,Entertainment`.
    pub fn parse(list: &str) -> Result<Self, LabelsError> {
        Self::new(list.split(',').map(|s| s.trim().to_string()).collect())
    }

    pub fn label_for(&self, index: usize) -> &str {
        self.0.get(index).map(String::as_str).unwrap_or(UNKNOWN_LABEL)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Default for Labels {
    fn default() -> Self {
        Self(vec!["Education".into(), "Entertainment".into()])
    }
}

/// Index of the largest score. Ties go to the first position; NaN never wins.
pub fn argmax(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &s) in scores.iter().enumerate() {
        if !s.is_nan() && best.is_none_or(|(_, b)| s > b) {
            best = Some((i, s));
        }
    }
    best.map(|(i, _)| i)
}
