//! Title tokenization against the vocabulary the classifier was trained on.
//!
//! The vocabulary ships as a `tokenizer.json`, usually a `WordLevel` model
//! exported from a Keras `Tokenizer`. Id 0 must be left free for padding.
//!
//! Words are looked up one at a time. A word the model cannot resolve is
//! dropped, the way Keras `texts_to_sequences` drops words missing from its
//! `word_index`; a vocabulary that declares an unknown token that is present
//! in `vocab` maps such words to it instead.
//!
//! The normalizer and pre-tokenizer must reproduce Keras's text cleanup:
//! lowercasing, and removal of its default filter characters
//! (``!"#$%&()*+,-./:;<=>?@[\]^_`{|}~`` plus tab and newline). A bare
//! `Whitespace` pre-tokenizer keeps punctuation as separate words, which then
//! count as unseen.

use std::path::Path;

use tokenizers::{
    Model, Normalizer, OffsetReferential, OffsetType, PreTokenizedString, PreTokenizer, Tokenizer,
};
use tracing::{debug, info, warn};
use tubesort_core::{Preprocess, TitleSequence};

pub struct TitlePreprocessor {
    tokenizer: Tokenizer,
    seq_len: usize,
}

impl TitlePreprocessor {
    /// Load a vocabulary from a `tokenizer.json` file.
    pub fn load(path: &Path, seq_len: usize) -> anyhow::Result<Self> {
        anyhow::ensure!(path.exists(), "tokenizer not found at {path:?}");
        let tokenizer =
            Tokenizer::from_file(path).map_err(|e| anyhow::anyhow!("load tokenizer: {e}"))?;
        let pre = Self::new(tokenizer, seq_len)?;
        info!(
            vocab = pre.tokenizer.get_vocab_size(false),
            seq_len,
            path = %path.display(),
            "loaded title vocabulary"
        );
        Ok(pre)
    }

    /// Build from an in-memory `tokenizer.json` document.
    pub fn from_bytes(json: &[u8], seq_len: usize) -> anyhow::Result<Self> {
        let tokenizer =
            Tokenizer::from_bytes(json).map_err(|e| anyhow::anyhow!("parse tokenizer: {e}"))?;
        Self::new(tokenizer, seq_len)
    }

    fn new(mut tokenizer: Tokenizer, seq_len: usize) -> anyhow::Result<Self> {
        anyhow::ensure!(seq_len > 0, "sequence length must be positive");
        // Window shaping is done by TitleSequence, not the tokenizer.
        tokenizer
            .with_truncation(None)
            .map_err(|e| anyhow::anyhow!("disable truncation: {e}"))?;
        tokenizer.with_padding(None);
        Ok(Self { tokenizer, seq_len })
    }

    pub fn seq_len(&self) -> usize {
        self.seq_len
    }

    /// Raw vocabulary ids for `title`, before padding. Unresolvable words
    /// are skipped; only normalizer or pre-tokenizer failures are errors.
    pub fn token_ids(&self, title: &str) -> anyhow::Result<Vec<u32>> {
        let mut pretokenized = PreTokenizedString::from(title);
        if let Some(normalizer) = self.tokenizer.get_normalizer() {
            pretokenized
                .normalize(|s| normalizer.normalize(s))
                .map_err(|e| anyhow::anyhow!("normalize: {e}"))?;
        }
        if let Some(pre_tokenizer) = self.tokenizer.get_pre_tokenizer() {
            pre_tokenizer
                .pre_tokenize(&mut pretokenized)
                .map_err(|e| anyhow::anyhow!("pre-tokenize: {e}"))?;
        }

        let model = self.tokenizer.get_model();
        let mut ids = Vec::new();
        for (word, _, _) in pretokenized.get_splits(OffsetReferential::Original, OffsetType::Char) {
            if word.is_empty() {
                continue;
            }
            match model.tokenize(word) {
                Ok(tokens) => ids.extend(tokens.iter().map(|t| t.id)),
                // No usable unknown token: out-of-vocabulary words vanish.
                Err(_) => debug!(word, "dropping out-of-vocabulary word"),
            }
        }
        Ok(ids)
    }
}

impl Preprocess for TitlePreprocessor {
    fn preprocess(&self, title: &str) -> TitleSequence {
        match self.token_ids(title) {
            Ok(ids) => TitleSequence::from_token_ids(&ids, self.seq_len),
            Err(e) => {
                warn!(title, error = %e, "tokenization failed, using empty sequence");
                TitleSequence::empty(self.seq_len)
            }
        }
    }
}
