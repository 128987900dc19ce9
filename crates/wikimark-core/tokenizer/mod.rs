//! Wiki markup tokenizer module
//!
//! Provides pull-based lexical analysis of wiki markup text with nested
//! lexical states, escape handling and skip-and-continue error recovery.
//! The scanner is driven by an ordered rule table compiled once at
//! construction; scanning itself cannot fail.
//!
//! # Example
//!
//! ```rust
//! use wikimark_core::tokenizer::{LexerOptions, WikiLexer};
//!
//! let mut lexer = WikiLexer::build(LexerOptions::default())?;
//! lexer.input("== Heading\nplain ''bold''\n");
//!
//! while let Some(token) = lexer.token() {
//!     println!("{token}");
//! }
//! # Ok::<(), wikimark_core::BuildError>(())
//! ```

use core::fmt;

pub mod rules;
pub mod scanner;
pub mod state;
pub mod tokens;

// Re-export public API
pub use rules::{PatternFlags, Rule, RuleAction, RuleTable};
pub use scanner::ScannerState;
pub use state::{IssueCollector, LexIssue, LexState};
pub use tokens::{Token, TokenKind};

use crate::utils::BuildError;

/// Callback invoked for every illegal character the scanner skips
///
/// Receives the report message and the 1-based line and column of the
/// offending character. Called synchronously from `token()`, and never for
/// anything but illegal characters.
pub type ErrorFunc = Box<dyn FnMut(&str, usize, usize)>;

/// Construction options for [`WikiLexer::build`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LexerOptions {
    /// Flags forwarded to the pattern engine when compiling the rule table
    pub flags: PatternFlags,
}

impl LexerOptions {
    /// Options with the given pattern flags
    #[must_use]
    pub const fn with_flags(flags: PatternFlags) -> Self {
        Self { flags }
    }
}

/// Pull-based lexer for wiki markup text
///
/// Owns a compiled rule table and the scan cursor for the current buffer.
/// `token()` is the sole stepping primitive: each call consumes exactly one
/// lexeme (or skips exactly one illegal character and retries) and the whole
/// scan restarts from scratch with every `input()` call. One instance is
/// single-threaded by construction; independent instances share no state.
pub struct WikiLexer {
    /// Compiled per-state rule tables, immutable after construction
    rules: RuleTable,
    /// Scan cursor over the current buffer
    cursor: ScannerState,
    /// Illegal-character reports accumulated during the current scan
    issues: IssueCollector,
    /// Optional illegal-character callback
    error_func: Option<ErrorFunc>,
}

impl WikiLexer {
    /// Compile the rule table and create a lexer with an empty buffer
    ///
    /// One-time construction step. All patterns for all three lexical states
    /// are compiled here under `options.flags`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] if the rule table is inconsistent under the
    /// requested flags. Construction errors are fatal and never retried;
    /// scanning can never fail once `build` has succeeded.
    pub fn build(options: LexerOptions) -> Result<Self, BuildError> {
        Ok(Self {
            rules: RuleTable::compile(options.flags)?,
            cursor: ScannerState::empty(),
            issues: IssueCollector::new(),
            error_func: None,
        })
    }

    /// Install an illegal-character callback
    ///
    /// The callback is invoked in addition to the built-in issue collector.
    #[must_use]
    pub fn with_error_func(mut self, error_func: impl FnMut(&str, usize, usize) + 'static) -> Self {
        self.error_func = Some(Box::new(error_func));
        self
    }

    /// Supply a new buffer to scan
    ///
    /// Resets the cursor to position 0, line 1 and a single-element state
    /// stack, and clears accumulated issues. Any unfinished scan of a
    /// previous buffer is discarded.
    pub fn input(&mut self, text: impl Into<String>) {
        self.cursor = ScannerState::new(text.into());
        self.issues.clear();
    }

    /// Reset the line counter to 1 without touching the scan position
    ///
    /// Re-anchors line numbers when scanning concatenated sources.
    pub fn reset_lineno(&mut self) {
        self.cursor.reset_lineno();
    }

    /// Produce the next token, or `None` when the buffer is exhausted
    ///
    /// Rules of the active state are tried in declaration order; the first
    /// match at the cursor wins. When no rule matches, the offending
    /// character is reported and skipped, and scanning continues: a scan
    /// never aborts and this method never panics on any input.
    pub fn token(&mut self) -> Option<Token> {
        loop {
            if self.cursor.is_at_end() {
                return None;
            }

            let state = self.cursor.current_state();
            let at_line_start = self.cursor.at_line_start();

            let matched = self
                .rules
                .rules(state)
                .iter()
                .filter(|rule| at_line_start || !rule.at_line_start())
                .find_map(|rule| {
                    rule.match_len(self.cursor.rest())
                        .map(|len| (len, rule.kind(), rule.action()))
                });

            let Some((len, kind, action)) = matched else {
                self.report_illegal();
                continue;
            };
            if len == 0 {
                // Every rule requires at least one character; treat a
                // zero-length match as unmatched so the scan keeps advancing
                self.report_illegal();
                continue;
            }

            let start = self.cursor.position();
            let line = self.cursor.line();
            let column = self.cursor.column_at(start);
            let lexeme = self.cursor.buffer()[start..start + len].to_string();
            self.cursor.consume(len);

            match action {
                RuleAction::Emit => {}
                RuleAction::Escape => {
                    let mut chars = lexeme.chars();
                    let _marker = chars.next();
                    match chars.next() {
                        // The escape marker is stripped at the lexical level
                        Some(escaped) => {
                            return Some(Token::new(kind, escaped.to_string(), line, column));
                        }
                        // Lone marker at end of buffer: swallowed, no token
                        None => continue,
                    }
                }
                RuleAction::OpenBlock(next) => self.cursor.push_state(next),
                RuleAction::CloseBlock => self.cursor.pop_state(),
                RuleAction::OpenCell => {
                    if state != LexState::Table {
                        self.cursor.push_state(LexState::Table);
                    }
                }
                RuleAction::EndLine => {
                    if state == LexState::Table {
                        self.cursor.pop_state();
                    }
                }
            }

            return Some(Token::new(kind, lexeme, line, column));
        }
    }

    /// Drain all remaining tokens into a vector
    pub fn tokenize_all(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        while let Some(token) = self.token() {
            tokens.push(token);
        }
        tokens
    }

    /// Get accumulated illegal-character reports for the current scan
    #[must_use]
    pub fn issues(&self) -> &[LexIssue] {
        self.issues.issues()
    }

    /// Get current byte position in the buffer
    #[must_use]
    pub const fn position(&self) -> usize {
        self.cursor.position()
    }

    /// Get current line number (1-based)
    #[must_use]
    pub const fn line(&self) -> usize {
        self.cursor.line()
    }

    /// Get current column number (1-based, derived from the buffer)
    #[must_use]
    pub fn column(&self) -> usize {
        self.cursor.column()
    }

    /// Get the active lexical state
    #[must_use]
    pub fn current_state(&self) -> LexState {
        self.cursor.current_state()
    }

    /// Get the lexical state stack depth
    #[must_use]
    pub fn state_depth(&self) -> usize {
        self.cursor.depth()
    }

    fn report_illegal(&mut self) {
        let line = self.cursor.line();
        let column = self.cursor.column();
        if let Some(ch) = self.cursor.skip_char() {
            let message = format!("Illegal character {ch:?}");
            self.issues.record(message.clone(), line, column);
            if let Some(error_func) = self.error_func.as_mut() {
                error_func(&message, line, column);
            }
        }
    }
}

impl fmt::Debug for WikiLexer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WikiLexer")
            .field("cursor", &self.cursor)
            .field("issues", &self.issues)
            .field("error_func", &self.error_func.is_some())
            .finish_non_exhaustive()
    }
}
