//! Token definitions for wiki markup tokenization
//!
//! Provides the token types produced by lexical analysis of wiki markup text.
//! Tokens own their matched text, so they stay valid across `input()` calls on
//! the lexer that produced them.
//!
//! # Token Design
//!
//! - Owned `String` values copied out of the scan buffer
//! - Location tracking for error reporting and editor integration
//! - Semantic token kinds for context-aware parsing
//! - Efficient discriminant matching for hot parsing paths
//!
//! # Example
//!
//! ```rust
//! use wikimark_core::tokenizer::{Token, TokenKind};
//!
//! let token = Token::new(TokenKind::Heading, "== ", 1, 1);
//! assert_eq!(token.kind, TokenKind::Heading);
//! assert_eq!(token.end_column(), 4);
//! ```

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Token produced by the wiki markup lexer
///
/// Represents a lexical unit with location information. The value is the
/// exact substring matched by the winning rule, except for escaped text,
/// where the escape marker is already stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Token {
    /// Token kind discriminant
    pub kind: TokenKind,

    /// Matched text, copied out of the scan buffer
    pub value: String,

    /// Line number where the match began (1-based)
    pub line: usize,

    /// Column number where the match began (1-based)
    pub column: usize,
}

impl Token {
    /// Create new token with full location information
    #[must_use]
    pub fn new(kind: TokenKind, value: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            value: value.into(),
            line,
            column,
        }
    }

    /// Get token length in characters
    #[must_use]
    pub fn len(&self) -> usize {
        self.value.chars().count()
    }

    /// Check if token is empty (should not happen in normal tokenization)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Get end column position
    #[must_use]
    pub fn end_column(&self) -> usize {
        self.column + self.len()
    }

    /// Check if this token opens a block construct at line start
    #[must_use]
    pub const fn is_block_open(&self) -> bool {
        self.kind.is_block_open()
    }

    /// Check if this token carries plain content
    #[must_use]
    pub const fn is_content(&self) -> bool {
        self.kind.is_content()
    }

    /// Check if this token is an inline emphasis marker
    #[must_use]
    pub const fn is_emphasis(&self) -> bool {
        self.kind.is_emphasis()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}@{}:{} '{}'",
            self.kind, self.line, self.column, self.value
        )
    }
}

/// Token kind discriminant for efficient pattern matching
///
/// Closed set of lexical units in wiki markup. Ordered roughly by scanning
/// frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TokenKind {
    /// Plain text run without markup significance
    Text,

    /// Single markup-significant character outside any construct
    SpecialChar,

    /// Character escaped with `~`; the value is the literal character
    EscapedText,

    /// `http://` URI
    HttpUri,

    /// `https://` URI
    HttpsUri,

    /// `www.` URI without scheme
    WwwUri,

    /// Heading opener `=` to `=====` at line start
    Heading,

    /// Horizontal rule `----` at line start
    HorizontalRule,

    /// Ordered list opener `#` to `#####` at line start
    OrderedListStart,

    /// Unordered list opener `*` to `*****` at line start
    UnorderedListStart,

    /// Blockquote opener `>` to `>>>>>` at line start
    BlockquoteStart,

    /// Big-table opener `||` with optional `{..}` style at line start
    BigTableStart,

    /// Table cell opener `|`, optional `=` header marker and `{..}` style
    TableCellStart,

    /// Inline span marker ` `` `
    Span,

    /// Bold marker `''`
    Bold,

    /// Italic marker `//`
    Italic,

    /// Underline marker `__`
    Underline,

    /// Superscript marker `^^`
    Superscript,

    /// Subscript marker `,,`
    Subscript,

    /// Bold-italic marker `'/` or `/'`
    BoldItalic,

    /// Bold-underline marker `'_` or `_'`
    BoldUnderline,

    /// Italic-underline marker `/_` or `_/`
    ItalicUnderline,

    /// Bold-italic-underline marker `'/_` or `_/'`
    BoldItalicUnderline,

    /// Link construct `[[..]]`
    Link,

    /// Macro construct `{{..}}`
    Macro,

    /// Raw HTML block `[<..>]`
    Html,

    /// Line ending (`\n`, `\r\n` or `\r`)
    Newline,

    /// Forced line break `\\`
    LineBreak,

    /// Verbatim block opener line `{{{`
    VerbatimOpen,

    /// Raw text inside a verbatim block
    VerbatimText,

    /// Verbatim block closer line `}}}`
    VerbatimClose,

    /// Reserved end-of-stream marker (U+0004), distinct from exhaustion
    EndMarker,
}

impl TokenKind {
    /// Check if kind opens a block construct recognized at line start
    #[must_use]
    pub const fn is_block_open(self) -> bool {
        matches!(
            self,
            Self::Heading
                | Self::HorizontalRule
                | Self::OrderedListStart
                | Self::UnorderedListStart
                | Self::BlockquoteStart
                | Self::BigTableStart
        )
    }

    /// Check if kind is an inline emphasis marker
    #[must_use]
    pub const fn is_emphasis(self) -> bool {
        matches!(
            self,
            Self::Span
                | Self::Bold
                | Self::Italic
                | Self::Underline
                | Self::Superscript
                | Self::Subscript
                | Self::BoldItalic
                | Self::BoldUnderline
                | Self::ItalicUnderline
                | Self::BoldItalicUnderline
        )
    }

    /// Check if kind carries plain content rather than structure
    #[must_use]
    pub const fn is_content(self) -> bool {
        matches!(
            self,
            Self::Text
                | Self::SpecialChar
                | Self::EscapedText
                | Self::VerbatimText
                | Self::HttpUri
                | Self::HttpsUri
                | Self::WwwUri
        )
    }

    /// Check if kind is one of the URI forms
    #[must_use]
    pub const fn is_uri(self) -> bool {
        matches!(self, Self::HttpUri | Self::HttpsUri | Self::WwwUri)
    }

    /// Get human-readable name for error messages
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::SpecialChar => "special character",
            Self::EscapedText => "escaped text",
            Self::HttpUri => "http uri",
            Self::HttpsUri => "https uri",
            Self::WwwUri => "www uri",
            Self::Heading => "heading",
            Self::HorizontalRule => "horizontal rule",
            Self::OrderedListStart => "ordered list",
            Self::UnorderedListStart => "unordered list",
            Self::BlockquoteStart => "blockquote",
            Self::BigTableStart => "big table",
            Self::TableCellStart => "table cell",
            Self::Span => "span marker",
            Self::Bold => "bold marker",
            Self::Italic => "italic marker",
            Self::Underline => "underline marker",
            Self::Superscript => "superscript marker",
            Self::Subscript => "subscript marker",
            Self::BoldItalic => "bold-italic marker",
            Self::BoldUnderline => "bold-underline marker",
            Self::ItalicUnderline => "italic-underline marker",
            Self::BoldItalicUnderline => "bold-italic-underline marker",
            Self::Link => "link",
            Self::Macro => "macro",
            Self::Html => "html block",
            Self::Newline => "newline",
            Self::LineBreak => "line break",
            Self::VerbatimOpen => "verbatim open",
            Self::VerbatimText => "verbatim text",
            Self::VerbatimClose => "verbatim close",
            Self::EndMarker => "end marker",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
