//! Recursive-descent parser for Solidity declarations.
//!
//! Parses pragmas, imports, contracts (with their base list), enums and
//! structs. Everything else (functions, modifiers, state variables, events,
//! errors, user-defined value types, `using` directives) is skipped as an
//! opaque item that ends at a top-level `;` or at the `}` closing its body.

use crate::ast::{
    ContractDefinition, ContractKind, ContractMember, EnumDefinition, ImportDirective,
    OtherItem, PragmaDirective, SourceItem, SourceUnit, Span, StructDefinition,
};
use crate::error::ParseError;
use crate::lexer::{lex, Token, TokenKind};

/// Parse a complete source file.
pub fn parse_source(source: &str) -> Result<SourceUnit, ParseError> {
    let tokens = lex(source)?;
    Parser {
        source,
        tokens,
        pos: 0,
    }
    .parse_unit()
}

struct Parser<'src> {
    source: &'src str,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'src> Parser<'src> {
    // ------------------------------------------------------------------
    // Token cursor
    // ------------------------------------------------------------------

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    fn peek_kind_at(&self, n: usize) -> Option<TokenKind> {
        self.tokens.get(self.pos + n).map(|t| t.kind)
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn text(&self, token: &Token) -> &'src str {
        let source = self.source;
        &source[token.span.clone()]
    }

    fn error_at(&self, offset: usize, message: impl Into<String>) -> ParseError {
        ParseError::at(self.source, offset, message)
    }

    fn error_at_eof(&self, message: impl Into<String>) -> ParseError {
        self.error_at(self.source.len(), message)
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        match self.peek() {
            Some(token) => self.error_at(
                token.span.start,
                format!("expected {}, found {}", expected, token.kind.describe()),
            ),
            None => self.error_at_eof(format!("expected {}, found end of file", expected)),
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token, ParseError> {
        match self.tokens.get(self.pos) {
            Some(token) if token.kind == kind => {
                let token = token.clone();
                self.pos += 1;
                Ok(token)
            }
            _ => Err(self.unexpected(expected)),
        }
    }

    fn expect_ident(&mut self, expected: &str) -> Result<(String, Span), ParseError> {
        let token = self.expect(TokenKind::Ident, expected)?;
        Ok((self.text(&token).to_string(), token.span))
    }

    fn at_punct(&self, n: usize, punct: &str) -> bool {
        self.tokens
            .get(self.pos + n)
            .map(|t| t.kind == TokenKind::Punct && self.text(t) == punct)
            .unwrap_or(false)
    }

    // ------------------------------------------------------------------
    // Source unit
    // ------------------------------------------------------------------

    fn parse_unit(mut self) -> Result<SourceUnit, ParseError> {
        let mut items = Vec::new();

        while let Some(kind) = self.peek_kind() {
            let item = match kind {
                TokenKind::Pragma => SourceItem::Pragma(self.parse_pragma()?),
                TokenKind::Import => SourceItem::Import(self.parse_import()?),
                TokenKind::Abstract
                | TokenKind::Contract
                | TokenKind::Interface
                | TokenKind::Library => SourceItem::Contract(self.parse_contract()?),
                TokenKind::Enum => SourceItem::Enum(self.parse_enum()?),
                TokenKind::Struct => SourceItem::Struct(self.parse_struct()?),
                TokenKind::RBrace => return Err(self.unexpected("a declaration")),
                _ => SourceItem::Other(self.skip_declaration()?),
            };
            items.push(item);
        }

        Ok(SourceUnit { items })
    }

    fn parse_pragma(&mut self) -> Result<PragmaDirective, ParseError> {
        let start = self.expect(TokenKind::Pragma, "'pragma'")?.span.start;
        let (name, name_span) = self.expect_ident("pragma name")?;

        loop {
            match self.peek_kind() {
                Some(TokenKind::Semicolon) => break,
                Some(_) => {
                    self.bump();
                }
                None => return Err(self.error_at_eof("expected ';' to end pragma directive")),
            }
        }
        let semi = self.expect(TokenKind::Semicolon, "';'")?;
        let value = self.source[name_span.end..semi.span.start].trim().to_string();

        Ok(PragmaDirective {
            name,
            value,
            span: start..semi.span.end,
        })
    }

    fn parse_import(&mut self) -> Result<ImportDirective, ParseError> {
        let start = self.expect(TokenKind::Import, "'import'")?.span.start;
        let mut path = None;

        loop {
            match self.bump() {
                Some(token) if token.kind == TokenKind::Semicolon => {
                    let path = path.ok_or_else(|| {
                        self.error_at(token.span.start, "expected import path string")
                    })?;
                    return Ok(ImportDirective {
                        path,
                        span: start..token.span.end,
                    });
                }
                Some(token) if token.kind == TokenKind::String && path.is_none() => {
                    let quoted = self.text(&token);
                    path = Some(quoted[1..quoted.len() - 1].to_string());
                }
                Some(_) => {}
                None => return Err(self.error_at_eof("expected ';' to end import directive")),
            }
        }
    }

    // ------------------------------------------------------------------
    // Contracts
    // ------------------------------------------------------------------

    fn parse_contract(&mut self) -> Result<ContractDefinition, ParseError> {
        let first = self
            .bump()
            .ok_or_else(|| self.error_at_eof("expected contract definition"))?;
        let start = first.span.start;
        let kind = match first.kind {
            TokenKind::Abstract => {
                self.expect(TokenKind::Contract, "'contract' after 'abstract'")?;
                ContractKind::AbstractContract
            }
            TokenKind::Contract => ContractKind::Contract,
            TokenKind::Interface => ContractKind::Interface,
            TokenKind::Library => ContractKind::Library,
            _ => {
                return Err(self.error_at(
                    first.span.start,
                    format!("expected contract definition, found {}", first.kind.describe()),
                ))
            }
        };
        let (name, _) = self.expect_ident(&format!("{} name", kind))?;

        let mut base_contracts = Vec::new();
        if self.peek_kind() == Some(TokenKind::Is) {
            self.bump();
            loop {
                base_contracts.push(self.parse_path("base contract name")?);
                if self.peek_kind() == Some(TokenKind::LParen) {
                    self.skip_parens()?;
                }
                if self.peek_kind() == Some(TokenKind::Comma) {
                    self.bump();
                    continue;
                }
                break;
            }
        }

        // Tolerate trailing specifiers (e.g. storage layout) before the body.
        while !matches!(self.peek_kind(), Some(TokenKind::LBrace)) {
            match self.peek_kind() {
                None | Some(TokenKind::Semicolon) | Some(TokenKind::RBrace) => {
                    return Err(self.unexpected(&format!("'{{' to open {} `{}`", kind, name)))
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
        self.expect(TokenKind::LBrace, "'{'")?;

        let mut members = Vec::new();
        let end = loop {
            match self.peek_kind() {
                None => {
                    return Err(self.error_at_eof(format!(
                        "unexpected end of file: {} `{}` is missing its closing '}}'",
                        kind, name
                    )))
                }
                Some(TokenKind::RBrace) => break self.expect(TokenKind::RBrace, "'}'")?.span.end,
                Some(TokenKind::Enum) => members.push(ContractMember::Enum(self.parse_enum()?)),
                Some(TokenKind::Struct) => {
                    members.push(ContractMember::Struct(self.parse_struct()?))
                }
                Some(_) => members.push(ContractMember::Other(self.skip_declaration()?)),
            }
        };

        Ok(ContractDefinition {
            kind,
            name,
            base_contracts,
            members,
            span: start..end,
        })
    }

    /// `Ident ('.' Ident)*`
    fn parse_path(&mut self, expected: &str) -> Result<String, ParseError> {
        let (mut path, _) = self.expect_ident(expected)?;
        while self.at_punct(0, ".") && self.peek_kind_at(1) == Some(TokenKind::Ident) {
            self.bump();
            let (segment, _) = self.expect_ident(expected)?;
            path.push('.');
            path.push_str(&segment);
        }
        Ok(path)
    }

    fn skip_parens(&mut self) -> Result<(), ParseError> {
        let open = self.expect(TokenKind::LParen, "'('")?;
        let mut depth = 1usize;
        while depth > 0 {
            match self.bump().map(|t| t.kind) {
                Some(TokenKind::LParen) => depth += 1,
                Some(TokenKind::RParen) => depth -= 1,
                Some(_) => {}
                None => {
                    return Err(self.error_at(open.span.start, "unclosed '(': missing ')'"));
                }
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Enums and structs
    // ------------------------------------------------------------------

    fn parse_enum(&mut self) -> Result<EnumDefinition, ParseError> {
        let start = self.expect(TokenKind::Enum, "'enum'")?.span.start;
        let (name, _) = self.expect_ident("enum name")?;
        self.expect(TokenKind::LBrace, &format!("'{{' after enum `{}`", name))?;

        let mut members: Vec<String> = Vec::new();
        if self.peek_kind() == Some(TokenKind::RBrace) {
            let end = self.expect(TokenKind::RBrace, "'}'")?.span.end;
            return Ok(EnumDefinition {
                name,
                members,
                span: start..end,
            });
        }

        let end = loop {
            let (member, member_span) =
                self.expect_ident(&format!("member of enum `{}`", name))?;
            if members.contains(&member) {
                return Err(self.error_at(
                    member_span.start,
                    format!("duplicate member `{}` in enum `{}`", member, name),
                ));
            }
            members.push(member);

            match self.peek_kind() {
                Some(TokenKind::Comma) => {
                    self.bump();
                    if self.peek_kind() == Some(TokenKind::RBrace) {
                        return Err(self.unexpected(&format!(
                            "member of enum `{}` after ','",
                            name
                        )));
                    }
                }
                Some(TokenKind::RBrace) => break self.expect(TokenKind::RBrace, "'}'")?.span.end,
                _ => return Err(self.unexpected(&format!("',' or '}}' in enum `{}`", name))),
            }
        };

        Ok(EnumDefinition {
            name,
            members,
            span: start..end,
        })
    }

    fn parse_struct(&mut self) -> Result<StructDefinition, ParseError> {
        let start = self.expect(TokenKind::Struct, "'struct'")?.span.start;
        let (name, _) = self.expect_ident("struct name")?;
        self.expect(TokenKind::LBrace, &format!("'{{' after struct `{}`", name))?;

        let mut members = Vec::new();
        let end = loop {
            if self.peek_kind() == Some(TokenKind::RBrace) {
                break self.expect(TokenKind::RBrace, "'}'")?.span.end;
            }

            // `<type> <name>;` where the type may nest parens and brackets.
            let field_start = self.peek().map(|t| t.span.start);
            let mut depth = 0usize;
            let mut field_name = None;
            loop {
                let token = match self.bump() {
                    Some(token) => token,
                    None => {
                        return Err(self.error_at_eof(format!(
                            "unexpected end of file in struct `{}`",
                            name
                        )))
                    }
                };
                match token.kind {
                    TokenKind::LParen | TokenKind::LBracket => depth += 1,
                    TokenKind::RParen | TokenKind::RBracket => depth = depth.saturating_sub(1),
                    TokenKind::Ident if depth == 0 => {
                        field_name = Some(self.text(&token).to_string())
                    }
                    TokenKind::Semicolon if depth == 0 => break,
                    TokenKind::LBrace | TokenKind::RBrace => {
                        return Err(self.error_at(
                            token.span.start,
                            format!("expected ';' after field of struct `{}`", name),
                        ))
                    }
                    _ => {}
                }
            }
            match field_name {
                Some(field) => members.push(field),
                None => {
                    return Err(self.error_at(
                        field_start.unwrap_or(self.source.len()),
                        format!("expected field name in struct `{}`", name),
                    ))
                }
            }
        };

        Ok(StructDefinition {
            name,
            members,
            span: start..end,
        })
    }

    // ------------------------------------------------------------------
    // Opaque declarations
    // ------------------------------------------------------------------

    fn skip_declaration(&mut self) -> Result<OtherItem, ParseError> {
        let first = self
            .peek()
            .cloned()
            .ok_or_else(|| self.error_at_eof("expected a declaration"))?;
        let keyword = match first.kind {
            TokenKind::Ident => Some(self.text(&first).to_string()),
            _ => None,
        };

        let mut braces: Vec<usize> = Vec::new();
        let mut parens = 0usize;
        let end = loop {
            let token = match self.bump() {
                Some(token) => token,
                None => {
                    return Err(match braces.last() {
                        Some(&open) => self.error_at(open, "unclosed '{': missing '}'"),
                        None => self.error_at_eof("unexpected end of file: expected ';'"),
                    })
                }
            };
            match token.kind {
                TokenKind::LParen | TokenKind::LBracket => parens += 1,
                TokenKind::RParen | TokenKind::RBracket => {
                    if parens == 0 {
                        return Err(self.error_at(
                            token.span.start,
                            format!("unbalanced {}", token.kind.describe()),
                        ));
                    }
                    parens -= 1;
                }
                TokenKind::LBrace => braces.push(token.span.start),
                TokenKind::RBrace => {
                    if braces.pop().is_none() {
                        return Err(self.error_at(token.span.start, "unexpected '}'"));
                    }
                    if braces.is_empty() && parens == 0 {
                        break token.span.end;
                    }
                }
                TokenKind::Semicolon if braces.is_empty() && parens == 0 => break token.span.end,
                _ => {}
            }
        };

        Ok(OtherItem {
            keyword,
            span: first.span.start..end,
        })
    }
}
