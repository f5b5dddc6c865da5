/// Crate error type.
///
/// Only the outer layers fail in the systems sense (files, config, the word
/// source).  Game-logic outcomes like typos, timeouts or a boss defeat are
/// ordinary results and never travel through this type.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Config(#[from] ron::error::SpannedError),

    #[error("boss word pool for theme '{theme}' has {available} unique words, {needed} needed")]
    BossWordPool {
        theme: String,
        needed: usize,
        available: usize,
    },

    #[error("frenzy sentence contains no words")]
    EmptySentence,
}
