//! Lexical state machine tests.
//!
//! Verifies the push/pop discipline of the state stack: which markers enter
//! and leave the verbatim and table states, and which rule sets are active
//! in each.

use pretty_assertions::assert_eq;
use wikimark_core::{LexState, LexerOptions, TokenKind, WikiLexer};

fn lexer() -> WikiLexer {
    WikiLexer::build(LexerOptions::default()).expect("default build succeeds")
}

/// Step the lexer and record the state after every token.
fn trace(text: &str) -> Vec<(TokenKind, LexState)> {
    let mut lexer = lexer();
    lexer.input(text);

    let mut steps = Vec::new();
    while let Some(token) = lexer.token() {
        steps.push((token.kind, lexer.current_state()));
    }
    steps
}

#[test]
fn initial_state_is_normal() {
    let lexer = lexer();
    assert_eq!(lexer.current_state(), LexState::Normal);
    assert_eq!(lexer.state_depth(), 1);
}

#[test]
fn verbatim_open_pushes_and_close_pops() {
    let steps = trace("{{{\nraw\n}}}\n");

    assert_eq!(steps[0], (TokenKind::VerbatimOpen, LexState::Verbatim));
    assert_eq!(steps[1], (TokenKind::Newline, LexState::Verbatim));
    assert_eq!(steps[2], (TokenKind::VerbatimText, LexState::Verbatim));
    assert_eq!(steps[3], (TokenKind::Newline, LexState::Verbatim));
    assert_eq!(steps[4], (TokenKind::VerbatimClose, LexState::Normal));
    assert_eq!(steps[5], (TokenKind::Newline, LexState::Normal));
}

#[test]
fn cell_marker_pushes_table_and_newline_pops() {
    let steps = trace("| cell\nafter\n");

    assert_eq!(steps[0], (TokenKind::TableCellStart, LexState::Table));
    let newline_step = steps
        .iter()
        .find(|(kind, _)| *kind == TokenKind::Newline)
        .unwrap();
    assert_eq!(newline_step.1, LexState::Normal);
}

#[test]
fn verbatim_open_not_recognized_mid_line() {
    let steps = trace("text {{{\nmore\n");

    // Without a line-start marker nothing pushes the verbatim state
    assert!(steps.iter().all(|(_, state)| *state != LexState::Verbatim));
}

#[test]
fn table_markers_ignored_inside_verbatim() {
    let steps = trace("{{{\n| not a cell\n}}}\n");

    assert!(steps
        .iter()
        .all(|(kind, _)| *kind != TokenKind::TableCellStart));
    assert!(steps.iter().all(|(_, state)| *state != LexState::Table));
}

#[test]
fn verbatim_markers_ignored_inside_table() {
    let steps = trace("| {{{ x\n");

    // `{{{` after a cell marker is mid-line table content, not a block open
    assert!(steps.iter().all(|(_, state)| *state != LexState::Verbatim));
}

#[test]
fn block_marker_recognition_returns_after_cell_line() {
    let steps = trace("| cell\n= heading\n");

    let heading = steps.iter().find(|(kind, _)| *kind == TokenKind::Heading);
    assert!(heading.is_some(), "heading recognized after table line");
}

#[test]
fn escaped_newline_does_not_end_cell() {
    let mut lexer = lexer();
    lexer.input("| a~\nb\n");

    let mut states_at_b = None;
    while let Some(token) = lexer.token() {
        if token.value == "b" {
            states_at_b = Some(lexer.current_state());
        }
    }

    // The escaped newline was consumed by the escape rule, so the cell is
    // still open when `b` is scanned; the bare newline after it pops.
    assert_eq!(states_at_b, Some(LexState::Table));
    assert_eq!(lexer.current_state(), LexState::Normal);
}

#[test]
fn consecutive_verbatim_blocks() {
    let steps = trace("{{{\na\n}}}\n{{{\nb\n}}}\n");

    let opens = steps
        .iter()
        .filter(|(kind, _)| *kind == TokenKind::VerbatimOpen)
        .count();
    let closes = steps
        .iter()
        .filter(|(kind, _)| *kind == TokenKind::VerbatimClose)
        .count();

    assert_eq!(opens, 2);
    assert_eq!(closes, 2);
    assert_eq!(steps.last().unwrap().1, LexState::Normal);
}

#[test]
fn stack_depth_never_exceeds_nesting() {
    let mut lexer = lexer();
    lexer.input("| a | b | c | d\n| e | f\n");

    while lexer.token().is_some() {
        assert!(lexer.state_depth() <= 2);
    }
    assert_eq!(lexer.state_depth(), 1);
}

#[test]
fn unbalanced_close_marker_is_inert_in_normal_state() {
    let steps = trace("}}}\n");

    // A close marker without an open block matches no verbatim rule; it
    // degrades to special characters in the normal state.
    assert_eq!(steps[0].0, TokenKind::SpecialChar);
    assert!(steps.iter().all(|(_, state)| *state == LexState::Normal));
}

#[test]
fn state_survives_illegal_characters() {
    let mut lexer = lexer();
    lexer.input("{{{\n\u{1}\u{2}\n}}}\n");

    let tokens = lexer.tokenize_all();
    assert!(tokens.iter().any(|t| t.kind == TokenKind::VerbatimClose));
    assert_eq!(lexer.current_state(), LexState::Normal);
}
