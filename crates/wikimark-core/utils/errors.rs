//! Construction-time error type
//!
//! The lexer has exactly one fatal failure mode: an inconsistent rule table
//! detected while compiling patterns at `build()` time. Scan-time problems
//! (illegal characters) are recovered internally and reported as issues, so
//! no error type exists for them.

use thiserror::Error;

use crate::tokenizer::state::LexState;

/// Fatal error raised while compiling the rule table
///
/// Surfaced immediately from `WikiLexer::build`; scanning never starts and
/// the error is never retried automatically.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// A rule pattern failed to compile under the requested flags
    #[error("invalid pattern `{pattern}` in {state} rule table: {reason}")]
    InvalidPattern {
        /// Lexical state whose table contains the bad pattern
        state: LexState,
        /// Source text of the offending pattern
        pattern: String,
        /// Failure reason reported by the pattern engine
        reason: String,
    },

    /// A lexical state ended up with no rules at all
    #[error("no rules declared for state {0}")]
    EmptyState(LexState),
}
