//! Lexical state management and issue reporting
//!
//! Provides the lexical state set for the wiki markup scanner and the
//! accumulator for recoverable illegal-character reports.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Lexical state for context-aware scanning
///
/// Determines which rule subset is active. States are pushed and popped by
/// the rules that open and close nested regions, so an exiting region always
/// returns to its enclosing state rather than a fixed default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LexState {
    /// Default text and markup scanning
    ///
    /// Initial state. Recognizes the full rule set: block openers at line
    /// start, inline emphasis, links, macros, URIs and fallback text.
    Normal,

    /// Inside a `{{{` .. `}}}` verbatim block
    ///
    /// Suppresses all markup recognition. Only raw text, newlines, the
    /// closing `}}}` line and the end-of-stream marker are recognized.
    Verbatim,

    /// Inside a table cell opened by `|`
    ///
    /// Recognizes the same inline set as `Normal` plus further cell openers,
    /// but no line-start block markers. A bare newline always terminates the
    /// cell and returns to the enclosing state.
    Table,
}

impl LexState {
    /// Check if line-start block markers are recognized in this state
    #[must_use]
    pub const fn allows_block_markers(self) -> bool {
        matches!(self, Self::Normal)
    }

    /// Check if inline markup is recognized in this state
    #[must_use]
    pub const fn allows_inline_markup(self) -> bool {
        !matches!(self, Self::Verbatim)
    }

    /// Check if a newline terminates this state
    #[must_use]
    pub const fn ends_at_newline(self) -> bool {
        matches!(self, Self::Table)
    }

    /// Get string representation for display
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Verbatim => "verbatim",
            Self::Table => "table",
        }
    }
}

impl Default for LexState {
    fn default() -> Self {
        Self::Normal
    }
}

impl fmt::Display for LexState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Recoverable scanning issue
///
/// Records an illegal character that matched no rule in the active state.
/// The scanner skips the character and continues; the issue is the only
/// trace the problem leaves behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexIssue {
    /// Human-readable message naming the offending character
    pub message: String,

    /// Line number where the character occurred (1-based)
    pub line: usize,

    /// Column number where the character occurred (1-based)
    pub column: usize,
}

impl LexIssue {
    /// Create new issue with location information
    #[must_use]
    pub const fn new(message: String, line: usize, column: usize) -> Self {
        Self {
            message,
            line,
            column,
        }
    }

    /// Get formatted location string
    #[must_use]
    pub fn location_string(&self) -> String {
        format!("{}:{}", self.line, self.column)
    }
}

impl fmt::Display for LexIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}:{}", self.message, self.line, self.column)
    }
}

/// Accumulator for recoverable scanning issues
///
/// Collected on the lexer for every skipped character, independently of any
/// installed error callback. Cleared when a new buffer is supplied.
#[derive(Debug, Clone, Default)]
pub struct IssueCollector {
    /// Issues found during the current scan
    issues: Vec<LexIssue>,
}

impl IssueCollector {
    /// Create new empty issue collector
    #[must_use]
    pub const fn new() -> Self {
        Self { issues: Vec::new() }
    }

    /// Record an issue
    pub fn record(&mut self, message: String, line: usize, column: usize) {
        self.issues.push(LexIssue::new(message, line, column));
    }

    /// Get all collected issues
    #[must_use]
    pub fn issues(&self) -> &[LexIssue] {
        &self.issues
    }

    /// Check if any issues were collected
    #[must_use]
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Get count of issues
    #[must_use]
    pub fn issue_count(&self) -> usize {
        self.issues.len()
    }

    /// Clear all issues
    pub fn clear(&mut self) {
        self.issues.clear();
    }

    /// Take all issues, leaving the collector empty
    pub fn take_issues(&mut self) -> Vec<LexIssue> {
        core::mem::take(&mut self.issues)
    }
}
