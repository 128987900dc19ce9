//! # Wikimark Core
//!
//! Stateful, pull-based lexer for wiki markup text. Converts an input buffer
//! into a lazy, finite sequence of typed tokens with 1-based line/column
//! locations, handling escape sequences, nested lexical regions (verbatim
//! blocks and table cells) and illegal characters without ever aborting a
//! scan.
//!
//! ## Features
//!
//! - **Rule table as data**: an ordered list of compiled patterns per
//!   lexical state, built once at construction; first match wins
//! - **Nested lexical states**: a state stack (not a flag), so closing a
//!   region returns to the enclosing state
//! - **Lexical unescaping**: `~x` yields the literal `x` already unescaped
//! - **Skip-and-continue recovery**: illegal characters are reported and
//!   skipped; malformed input degrades to extra reports, not a failure
//! - **Derived columns**: recomputed from the buffer per token, correct for
//!   matches spanning any number of lines
//!
//! ## Quick Start
//!
//! ```rust
//! use wikimark_core::{LexerOptions, TokenKind, WikiLexer};
//!
//! let mut lexer = WikiLexer::build(LexerOptions::default())?;
//! lexer.input("= Overview\nSee ''this'' page: http://example.com\n");
//!
//! let tokens = lexer.tokenize_all();
//! assert_eq!(tokens[0].kind, TokenKind::Heading);
//! assert!(tokens.iter().any(|t| t.kind == TokenKind::HttpUri));
//! assert!(lexer.issues().is_empty());
//! # Ok::<(), wikimark_core::BuildError>(())
//! ```
//!
//! ## Scanning model
//!
//! Strictly single-threaded and synchronous: the caller drives `token()` in
//! a loop, each call advances the cursor by at least one character, and a
//! scan over an in-memory buffer terminates in time linear in its length.
//! Independent lexer instances share no mutable state.

#![deny(clippy::all)]
#![deny(unsafe_code)]

pub mod tokenizer;
pub mod utils;

pub use tokenizer::{
    LexIssue, LexState, LexerOptions, PatternFlags, Token, TokenKind, WikiLexer,
};
pub use utils::BuildError;

/// Crate version for runtime compatibility checks
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type for construction-time operations
///
/// Only `WikiLexer::build` can fail; scanning itself has no error path.
pub type Result<T> = core::result::Result<T, BuildError>;
