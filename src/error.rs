use thiserror::Error;

/// Reportable failure conditions.
///
/// Ambiguity failures, decoding failures, and absent-key results are not
/// here: those are ordinary outcomes carried in `bool`/`Option`/`Presence`
/// returns, not errors. The one condition worth a `Result` is a counter
/// that has run out of room — silently wrapping it would corrupt every
/// bucket sharing that counter.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BloomError {
    #[error("bucket counter overflow at directory index {0}")]
    CounterOverflow(usize),
}
