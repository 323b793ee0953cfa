//! Solidity lexer built on logos.
//!
//! Only the declaration level of the language matters to the parser, so the
//! token set is small: the keywords that open declarations, brackets,
//! separators, literals and identifiers. Every other operator collapses into
//! [`TokenKind::Punct`]. Comments and whitespace never reach the parser.

use logos::{FilterResult, Logos};
use std::ops::Range;

use crate::error::ParseError;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
pub enum TokenKind {
    // === Keywords ===
    #[token("pragma")]
    Pragma,
    #[token("import")]
    Import,
    #[token("abstract")]
    Abstract,
    #[token("contract")]
    Contract,
    #[token("interface")]
    Interface,
    #[token("library")]
    Library,
    #[token("enum")]
    Enum,
    #[token("struct")]
    Struct,
    #[token("is")]
    Is,

    // === Brackets and separators ===
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,

    // === Literals ===
    #[regex(r#""([^"\\\n]|\\(.|\n|\r\n))*""#)]
    #[regex(r#"'([^'\\\n]|\\(.|\n|\r\n))*'"#)]
    #[regex(r#"unicode"([^"\\\n]|\\(.|\n|\r\n))*""#)]
    #[regex(r#"unicode'([^'\\\n]|\\(.|\n|\r\n))*'"#)]
    #[regex(r#"hex"[0-9a-fA-F_]*""#)]
    #[regex(r#"hex'[0-9a-fA-F_]*'"#)]
    String,

    #[regex(r"[0-9][0-9a-zA-Z_.]*")]
    Number,

    #[regex(r"[a-zA-Z$_][a-zA-Z0-9$_]*")]
    Ident,

    // Skipped by the callback; only surfaces as an error when unterminated.
    #[token("/*", block_comment)]
    BlockComment,

    #[regex(r"[-+*/%=<>!&|^~?:.@]")]
    Punct,
}

impl TokenKind {
    /// Human-readable description used in error messages.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Pragma => "'pragma'",
            TokenKind::Import => "'import'",
            TokenKind::Abstract => "'abstract'",
            TokenKind::Contract => "'contract'",
            TokenKind::Interface => "'interface'",
            TokenKind::Library => "'library'",
            TokenKind::Enum => "'enum'",
            TokenKind::Struct => "'struct'",
            TokenKind::Is => "'is'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::Semicolon => "';'",
            TokenKind::Comma => "','",
            TokenKind::String => "string literal",
            TokenKind::Number => "number",
            TokenKind::Ident => "identifier",
            TokenKind::BlockComment => "block comment",
            TokenKind::Punct => "operator",
        }
    }
}

fn block_comment(lex: &mut logos::Lexer<TokenKind>) -> FilterResult<(), ()> {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            FilterResult::Skip
        }
        None => {
            lex.bump(lex.remainder().len());
            FilterResult::Error(())
        }
    }
}

/// A token with its byte range in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Range<usize>,
}

/// Lex a whole source file.
///
/// Fails on the first character that does not start any token, and on block
/// comments that run to end of file.
pub fn lex(source: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();

    for (result, span) in TokenKind::lexer(source).spanned() {
        match result {
            Ok(kind) => tokens.push(Token { kind, span }),
            Err(()) if source[span.start..].starts_with("/*") => {
                return Err(ParseError::at(
                    source,
                    span.start,
                    "unterminated block comment",
                ));
            }
            Err(()) => {
                let found = source[span.clone()].chars().next().unwrap_or(' ');
                let message = if matches!(found, '"' | '\'') {
                    "unterminated string literal".to_string()
                } else {
                    format!("unexpected character '{}'", found)
                };
                return Err(ParseError::at(source, span.start, message));
            }
        }
    }

    Ok(tokens)
}
