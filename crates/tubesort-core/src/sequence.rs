//! Fixed-length token window fed to the classifier.
//!
//! Follows the Keras `pad_sequences` defaults the model was trained with:
//! zeros are added at the front (`padding="pre"`), and over-long inputs lose
//! their leading tokens (`truncating="pre"`). Id 0 is therefore reserved for
//! padding in the vocabulary.

/// Window length the bundled title classifier expects.
pub const SEQUENCE_LEN: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleSequence(Vec<i64>);

impl TitleSequence {
    /// Left-pad or front-truncate `ids` to exactly `len` positions.
    pub fn from_token_ids(ids: &[u32], len: usize) -> Self {
        let kept = &ids[ids.len().saturating_sub(len)..];
        let mut seq = vec![0i64; len - kept.len()];
        seq.extend(kept.iter().map(|&id| i64::from(id)));
        Self(seq)
    }

    /// All-padding window.
    pub fn empty(len: usize) -> Self {
        Self(vec![0; len])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[i64] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<i64> {
        self.0
    }
}
