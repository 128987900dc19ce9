//! Rule tables for the wiki markup lexer
//!
//! The scanner is driven by data: an ordered list of compiled rules per
//! lexical state. Each rule pairs an anchored pattern with the token kind it
//! produces and the state transition it performs. Rules are tried in
//! declaration order and the first match wins, so specific markers are
//! declared before the generic `Text` and `SpecialChar` fallbacks; reordering
//! a table changes scan results.
//!
//! All patterns are compiled once, at lexer construction. Pattern failures
//! surface as `BuildError` before any scanning starts; nothing in this module
//! can fail at scan time.

use bitflags::bitflags;
use regex::{Regex, RegexBuilder};

use super::state::LexState;
use super::tokens::TokenKind;
use crate::utils::BuildError;

bitflags! {
    /// Options forwarded to the pattern engine when rules are compiled
    ///
    /// Explicit configuration rather than process-wide engine defaults. The
    /// default set matches the markup language definition: line-oriented
    /// anchoring and Unicode-aware character classes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PatternFlags: u8 {
        /// `^` and `$` anchor to line boundaries instead of buffer ends
        const MULTI_LINE = 1 << 0;
        /// Character classes and case folding are Unicode-aware
        const UNICODE = 1 << 1;
        /// `.` also matches line terminators
        const DOT_ALL = 1 << 2;
    }
}

impl Default for PatternFlags {
    fn default() -> Self {
        Self::MULTI_LINE | Self::UNICODE
    }
}

/// State transition performed by a matched rule
///
/// Transitions are driven by lexical content: the rule that recognizes a
/// region's opening marker pushes the region's state, and the rule that
/// recognizes its closing marker pops back to the enclosing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleAction {
    /// Emit the matched lexeme as a token, no state change
    Emit,

    /// Escape handling: a two-character match emits the second character as
    /// `EscapedText`; a lone marker at end of buffer is swallowed silently
    Escape,

    /// Emit the token and push the given state
    OpenBlock(LexState),

    /// Emit the token and pop back to the enclosing state
    CloseBlock,

    /// Emit a cell opener; pushes `Table` unless the scanner is already in it
    OpenCell,

    /// Emit a newline; pops `Table` if it is the active state
    EndLine,
}

/// Declarative rule description, compiled into a [`Rule`]
#[derive(Debug, Clone, Copy)]
struct RuleDef {
    kind: TokenKind,
    action: RuleAction,
    pattern: &'static str,
    at_line_start: bool,
}

impl RuleDef {
    const fn new(
        kind: TokenKind,
        action: RuleAction,
        pattern: &'static str,
        at_line_start: bool,
    ) -> Self {
        Self {
            kind,
            action,
            pattern,
            at_line_start,
        }
    }
}

/// One compiled scanning rule
///
/// The pattern is wrapped in `\A(?:..)` so it either matches at the cursor
/// or not at all; the lexer never scans ahead past unmatched input.
#[derive(Debug, Clone)]
pub struct Rule {
    kind: TokenKind,
    action: RuleAction,
    pattern: Regex,
    at_line_start: bool,
}

impl Rule {
    fn compile(state: LexState, def: &RuleDef, flags: PatternFlags) -> Result<Self, BuildError> {
        let anchored = format!(r"\A(?:{})", def.pattern);
        let pattern = RegexBuilder::new(&anchored)
            .multi_line(flags.contains(PatternFlags::MULTI_LINE))
            .unicode(flags.contains(PatternFlags::UNICODE))
            .dot_matches_new_line(flags.contains(PatternFlags::DOT_ALL))
            .build()
            .map_err(|err| BuildError::InvalidPattern {
                state,
                pattern: def.pattern.to_string(),
                reason: err.to_string(),
            })?;

        Ok(Self {
            kind: def.kind,
            action: def.action,
            pattern,
            at_line_start: def.at_line_start,
        })
    }

    /// Token kind this rule produces
    #[must_use]
    pub const fn kind(&self) -> TokenKind {
        self.kind
    }

    /// State transition this rule performs
    #[must_use]
    pub const fn action(&self) -> RuleAction {
        self.action
    }

    /// Whether the rule only applies at the start of a line
    #[must_use]
    pub const fn at_line_start(&self) -> bool {
        self.at_line_start
    }

    /// Try the rule against the unconsumed remainder of the buffer
    ///
    /// Returns the byte length of the lexeme when the rule matches at the
    /// cursor.
    #[must_use]
    pub fn match_len(&self, rest: &str) -> Option<usize> {
        self.pattern.find(rest).map(|m| m.end())
    }
}

// Pattern sources, shared between the state tables below. The escape rule
// also matches a lone marker at end of buffer (the `?`), which the lexer
// swallows without emitting a token.
const END_MARKER: &str = r"\x04";
const ESCAPED: &str = r"~[\s\S]?";
const VERBATIM_OPEN: &str = r"[ \t]*\{\{\{";
const VERBATIM_CLOSE: &str = r"[ \t]*\}\}\}[ \t]*";
const VERBATIM_TEXT: &str = r"[^\r\n\x04]+";
const HTTPS_URI: &str = r"https://[^ \t\r\n]+";
const HTTP_URI: &str = r"http://[^ \t\r\n]+";
const WWW_URI: &str = r"www\.[^ \t\r\n]+";
const HEADING: &str = r"={1,5}[ \t]*";
const HORIZONTAL_RULE: &str = r"-{4,}[ \t]*";
const ORDERED_LIST: &str = r"#{1,5}[ \t]*";
const UNORDERED_LIST: &str = r"\*{1,5}[ \t]*";
const BLOCKQUOTE: &str = r">{1,5}[ \t]*";
const BIG_TABLE: &str = r"\|\|(?:\{[^{}\r\n]*\})?[ \t]*";
const TABLE_CELL: &str = r"\|=?(?:\{[^{}\r\n]*\})?";
const LINK: &str = r"\[\[[^\]]*\]\]";
const HTML: &str = r"\[<[\s\S]*?>\]";
const MACRO: &str = r"\{\{[^}]*\}\}";
const LINE_BREAK: &str = r"\\\\";
const BOLD_ITALIC_UNDERLINE: &str = r"'/_|_/'";
const BOLD_ITALIC: &str = r"'/|/'";
const BOLD_UNDERLINE: &str = r"'_|_'";
const ITALIC_UNDERLINE: &str = r"/_|_/";
const BOLD: &str = r"''";
const ITALIC: &str = r"//";
const UNDERLINE: &str = r"__";
const SUPERSCRIPT: &str = r"\^\^";
const SUBSCRIPT: &str = r",,";
const SPAN: &str = r"``";
const NEWLINE: &str = r"\r\n|\n|\r";
// A text lexeme is either a whitespace run or a word run. Breaking at
// whitespace keeps a token boundary in front of every word so the URI rules
// get their chance mid-prose. Word runs stop at markup-significant
// characters and never absorb control characters (tab excepted), so an
// unmatched control byte falls through to the illegal-character path
// instead of hiding inside a text token.
const TEXT: &str = r"[ \t]+|[^ \t~`'/_^,*#=\-\[\]{}|\\<>\x00-\x08\x0a-\x1f\x7f]+";
const SPECIAL_CHAR: &str = r"[~`'/_^,*#=\-\[\]{}|\\<>]";

/// Inline rules shared by `Normal` and `Table`
///
/// Ternary emphasis markers precede binary ones, and binary precede simple,
/// because the longer markers start with the shorter ones.
const fn inline_defs() -> [RuleDef; 18] {
    use RuleAction::{Emit, EndLine, OpenCell};
    use TokenKind as K;

    [
        RuleDef::new(K::TableCellStart, OpenCell, TABLE_CELL, false),
        RuleDef::new(K::Link, Emit, LINK, false),
        RuleDef::new(K::Html, Emit, HTML, false),
        RuleDef::new(K::Macro, Emit, MACRO, false),
        RuleDef::new(K::LineBreak, Emit, LINE_BREAK, false),
        RuleDef::new(K::BoldItalicUnderline, Emit, BOLD_ITALIC_UNDERLINE, false),
        RuleDef::new(K::BoldItalic, Emit, BOLD_ITALIC, false),
        RuleDef::new(K::BoldUnderline, Emit, BOLD_UNDERLINE, false),
        RuleDef::new(K::ItalicUnderline, Emit, ITALIC_UNDERLINE, false),
        RuleDef::new(K::Bold, Emit, BOLD, false),
        RuleDef::new(K::Italic, Emit, ITALIC, false),
        RuleDef::new(K::Underline, Emit, UNDERLINE, false),
        RuleDef::new(K::Superscript, Emit, SUPERSCRIPT, false),
        RuleDef::new(K::Subscript, Emit, SUBSCRIPT, false),
        RuleDef::new(K::Span, Emit, SPAN, false),
        RuleDef::new(K::Newline, EndLine, NEWLINE, false),
        RuleDef::new(K::Text, Emit, TEXT, false),
        RuleDef::new(K::SpecialChar, Emit, SPECIAL_CHAR, false),
    ]
}

fn normal_defs() -> Vec<RuleDef> {
    use RuleAction::{Emit, Escape, OpenBlock};
    use TokenKind as K;

    let mut defs = vec![
        RuleDef::new(K::EndMarker, Emit, END_MARKER, false),
        RuleDef::new(K::EscapedText, Escape, ESCAPED, false),
        RuleDef::new(
            K::VerbatimOpen,
            OpenBlock(LexState::Verbatim),
            VERBATIM_OPEN,
            true,
        ),
        RuleDef::new(K::HttpsUri, Emit, HTTPS_URI, false),
        RuleDef::new(K::HttpUri, Emit, HTTP_URI, false),
        RuleDef::new(K::WwwUri, Emit, WWW_URI, false),
        RuleDef::new(K::Heading, Emit, HEADING, true),
        RuleDef::new(K::HorizontalRule, Emit, HORIZONTAL_RULE, true),
        RuleDef::new(K::OrderedListStart, Emit, ORDERED_LIST, true),
        RuleDef::new(K::UnorderedListStart, Emit, UNORDERED_LIST, true),
        RuleDef::new(K::BlockquoteStart, Emit, BLOCKQUOTE, true),
        RuleDef::new(K::BigTableStart, Emit, BIG_TABLE, true),
    ];
    defs.extend_from_slice(&inline_defs());
    defs
}

fn table_defs() -> Vec<RuleDef> {
    use RuleAction::{Emit, Escape};
    use TokenKind as K;

    // Same inline set as Normal, but no line-start block markers: a cell
    // holds inline content only, and a newline hands control back to the
    // enclosing state before the next line begins.
    let mut defs = vec![
        RuleDef::new(K::EndMarker, Emit, END_MARKER, false),
        RuleDef::new(K::EscapedText, Escape, ESCAPED, false),
        RuleDef::new(K::HttpsUri, Emit, HTTPS_URI, false),
        RuleDef::new(K::HttpUri, Emit, HTTP_URI, false),
        RuleDef::new(K::WwwUri, Emit, WWW_URI, false),
    ];
    defs.extend_from_slice(&inline_defs());
    defs
}

fn verbatim_defs() -> Vec<RuleDef> {
    use RuleAction::{CloseBlock, Emit, EndLine};
    use TokenKind as K;

    vec![
        RuleDef::new(K::EndMarker, Emit, END_MARKER, false),
        RuleDef::new(K::VerbatimClose, CloseBlock, VERBATIM_CLOSE, true),
        RuleDef::new(K::Newline, EndLine, NEWLINE, false),
        RuleDef::new(K::VerbatimText, Emit, VERBATIM_TEXT, false),
    ]
}

/// Compiled rule tables for all three lexical states
///
/// Immutable after construction; a lexer instance owns exactly one table and
/// independent instances share nothing.
#[derive(Debug, Clone)]
pub struct RuleTable {
    normal: Vec<Rule>,
    verbatim: Vec<Rule>,
    table: Vec<Rule>,
}

impl RuleTable {
    /// Compile the full rule set under the given engine options
    ///
    /// # Errors
    ///
    /// Returns `BuildError` if any pattern fails to compile or a state ends
    /// up with no rules. Construction is the only point of failure; a
    /// compiled table never fails during scanning.
    pub fn compile(flags: PatternFlags) -> Result<Self, BuildError> {
        let table = Self {
            normal: Self::compile_state(LexState::Normal, &normal_defs(), flags)?,
            verbatim: Self::compile_state(LexState::Verbatim, &verbatim_defs(), flags)?,
            table: Self::compile_state(LexState::Table, &table_defs(), flags)?,
        };

        for state in [LexState::Normal, LexState::Verbatim, LexState::Table] {
            if table.rules(state).is_empty() {
                return Err(BuildError::EmptyState(state));
            }
        }

        Ok(table)
    }

    fn compile_state(
        state: LexState,
        defs: &[RuleDef],
        flags: PatternFlags,
    ) -> Result<Vec<Rule>, BuildError> {
        defs.iter()
            .map(|def| Rule::compile(state, def, flags))
            .collect()
    }

    /// Get the ordered rule list for a lexical state
    #[must_use]
    pub fn rules(&self, state: LexState) -> &[Rule] {
        match state {
            LexState::Normal => &self.normal,
            LexState::Verbatim => &self.verbatim,
            LexState::Table => &self.table,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_match(table: &RuleTable, state: LexState, input: &str) -> Option<(TokenKind, usize)> {
        table
            .rules(state)
            .iter()
            .find_map(|rule| rule.match_len(input).map(|len| (rule.kind(), len)))
    }

    #[test]
    fn default_table_compiles() {
        let table = RuleTable::compile(PatternFlags::default()).unwrap();
        assert!(!table.rules(LexState::Normal).is_empty());
        assert!(!table.rules(LexState::Verbatim).is_empty());
        assert!(!table.rules(LexState::Table).is_empty());
    }

    #[test]
    fn dot_all_table_compiles() {
        let flags = PatternFlags::default() | PatternFlags::DOT_ALL;
        assert!(RuleTable::compile(flags).is_ok());
    }

    #[test]
    fn non_unicode_table_fails_at_construction() {
        // Negated classes over `&str` input cannot compile without Unicode
        // mode; the failure must surface here, never during a scan.
        let result = RuleTable::compile(PatternFlags::MULTI_LINE);
        assert!(matches!(
            result,
            Err(BuildError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn matching_is_anchored() {
        let table = RuleTable::compile(PatternFlags::default()).unwrap();
        let bold = table
            .rules(LexState::Normal)
            .iter()
            .find(|rule| rule.kind() == TokenKind::Bold)
            .unwrap();

        assert_eq!(bold.match_len("''x"), Some(2));
        // A later occurrence must not count as a match at the cursor
        assert_eq!(bold.match_len("x''"), None);
    }

    #[test]
    fn ternary_emphasis_wins_over_binary() {
        let table = RuleTable::compile(PatternFlags::default()).unwrap();

        let (kind, len) = first_match(&table, LexState::Normal, "'/_text").unwrap();
        assert_eq!(kind, TokenKind::BoldItalicUnderline);
        assert_eq!(len, 3);

        let (kind, len) = first_match(&table, LexState::Normal, "_/'text").unwrap();
        assert_eq!(kind, TokenKind::BoldItalicUnderline);
        assert_eq!(len, 3);

        let (kind, _) = first_match(&table, LexState::Normal, "'/text").unwrap();
        assert_eq!(kind, TokenKind::BoldItalic);

        let (kind, _) = first_match(&table, LexState::Normal, "''text").unwrap();
        assert_eq!(kind, TokenKind::Bold);
    }

    #[test]
    fn escape_matches_lone_marker() {
        let table = RuleTable::compile(PatternFlags::default()).unwrap();

        let (kind, len) = first_match(&table, LexState::Normal, "~x").unwrap();
        assert_eq!(kind, TokenKind::EscapedText);
        assert_eq!(len, 2);

        let (kind, len) = first_match(&table, LexState::Normal, "~").unwrap();
        assert_eq!(kind, TokenKind::EscapedText);
        assert_eq!(len, 1);
    }

    #[test]
    fn uri_rules_precede_text() {
        let table = RuleTable::compile(PatternFlags::default()).unwrap();

        let (kind, _) = first_match(&table, LexState::Normal, "https://example.com rest").unwrap();
        assert_eq!(kind, TokenKind::HttpsUri);

        let (kind, _) = first_match(&table, LexState::Normal, "http://example.com").unwrap();
        assert_eq!(kind, TokenKind::HttpUri);

        let (kind, _) = first_match(&table, LexState::Table, "www.example.com").unwrap();
        assert_eq!(kind, TokenKind::WwwUri);
    }

    #[test]
    fn verbatim_rules_suppress_markup() {
        let table = RuleTable::compile(PatternFlags::default()).unwrap();

        let (kind, len) = first_match(&table, LexState::Verbatim, "''bold'' and more").unwrap();
        assert_eq!(kind, TokenKind::VerbatimText);
        assert_eq!(len, 17);
    }

    #[test]
    fn table_state_has_no_block_markers() {
        let table = RuleTable::compile(PatternFlags::default()).unwrap();

        let has_heading = table
            .rules(LexState::Table)
            .iter()
            .any(|rule| rule.kind() == TokenKind::Heading);
        assert!(!has_heading);
    }

    #[test]
    fn end_marker_recognized_in_every_state() {
        let table = RuleTable::compile(PatternFlags::default()).unwrap();

        for state in [LexState::Normal, LexState::Verbatim, LexState::Table] {
            let (kind, _) = first_match(&table, state, "\u{4}").unwrap();
            assert_eq!(kind, TokenKind::EndMarker, "state {state}");
        }
    }

    #[test]
    fn cell_marker_variants() {
        let table = RuleTable::compile(PatternFlags::default()).unwrap();

        let (kind, len) = first_match(&table, LexState::Normal, "| cell").unwrap();
        assert_eq!(kind, TokenKind::TableCellStart);
        assert_eq!(len, 1);

        let (_, len) = first_match(&table, LexState::Normal, "|= header").unwrap();
        assert_eq!(len, 2);

        let (_, len) = first_match(&table, LexState::Normal, "|{color:red} cell").unwrap();
        assert_eq!(len, 12);
    }
}
