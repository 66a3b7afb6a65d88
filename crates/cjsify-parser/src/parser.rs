//! Core Parser struct and main parsing methods

use super::*;

/// Recursive descent parser for JavaScript modules
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) current: usize,
    /// Set while parsing a `for` head, where `in` ends the initializer.
    pub(crate) no_in: bool,
}

impl Parser {
    /// Creates a new parser from a token stream
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut tokens = tokens;
        if tokens.last().map_or(true, |t| t.kind != TokenKind::Eof) {
            let end = tokens.last().map_or(0, |t| t.span.end);
            let file_id = tokens.last().map_or(0, |t| t.span.file_id);
            tokens.push(Token {
                kind: TokenKind::Eof,
                span: Span::new(end, end, file_id),
                value: String::new(),
                newline_before: false,
            });
        }
        Self {
            tokens,
            current: 0,
            no_in: false,
        }
    }

    /// Parses a complete program
    pub fn parse_program(&mut self) -> Result<Program, Vec<ParseError>> {
        let start_span = self.current_token().span;
        let mut items = Vec::new();
        let mut errors = Vec::new();

        while !self.is_at_end() {
            match self.parse_module_item() {
                Ok(item) => items.push(item),
                Err(err) => {
                    errors.push(err);
                    self.synchronize();
                }
            }
        }

        if errors.is_empty() {
            let end_span = self.current_token().span;
            Ok(Program {
                items,
                span: start_span.merge(&end_span),
            })
        } else {
            Err(errors)
        }
    }

    // =========================================================================
    // Module Items
    // =========================================================================

    pub(crate) fn parse_module_item(&mut self) -> ParseResult<Node<ModuleItem>> {
        let start = self.current_token().span;

        let item = match self.current_token().kind {
            TokenKind::Import if !matches!(self.peek_kind(1), Some(TokenKind::LParen) | Some(TokenKind::Dot)) => {
                ModuleItem::Import(self.parse_import_decl()?)
            }
            TokenKind::Export => ModuleItem::Export(self.parse_export_decl()?),
            _ => ModuleItem::Stmt(self.parse_statement()?),
        };

        Ok(Node::new(item, self.span_from(start)))
    }

    // =========================================================================
    // Import/Export
    // =========================================================================

    pub(crate) fn parse_import_decl(&mut self) -> ParseResult<ImportDecl> {
        self.consume(TokenKind::Import)?;

        let mut specifiers = Vec::new();

        // import "module"
        if self.check(&TokenKind::StringLiteral) {
            let source = self.advance().value.clone();
            self.consume_semicolon()?;
            return Ok(ImportDecl { specifiers, source });
        }

        // import defaultName [, ...] from "module"
        if self.check(&TokenKind::Identifier) {
            let name = self.parse_identifier()?;
            let span = name.span;
            specifiers.push(Node::new(ImportSpecifier::Default(name), span));

            if self.check(&TokenKind::Comma) {
                self.advance();
            }
        }

        // import * as name from "module"
        if self.check(&TokenKind::Star) {
            let start = self.advance().span;
            self.consume_word("as")?;
            let name = self.parse_identifier()?;
            specifiers.push(Node::new(ImportSpecifier::Namespace(name), self.span_from(start)));
        }
        // import { a, b as c } from "module"
        else if self.check(&TokenKind::LBrace) {
            self.advance();

            while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
                let imported = self.parse_identifier_name()?;
                let start = imported.span;
                let local = if self.check_word("as") {
                    self.advance();
                    Some(self.parse_identifier()?)
                } else if imported.value.name != "default" && TokenKind::keyword(&imported.value.name).is_some() {
                    return Err(ParseError::new(
                        format!("'{}' cannot be imported without a local name", imported.value.name),
                        imported.span,
                    ));
                } else {
                    None
                };

                specifiers.push(Node::new(ImportSpecifier::Named { imported, local }, self.span_from(start)));

                if !self.check(&TokenKind::RBrace) {
                    self.consume(TokenKind::Comma)?;
                }
            }

            self.consume(TokenKind::RBrace)?;
        }

        self.consume_word("from")?;
        let source = self.consume(TokenKind::StringLiteral)?.value.clone();
        self.consume_semicolon()?;

        Ok(ImportDecl { specifiers, source })
    }

    pub(crate) fn parse_export_decl(&mut self) -> ParseResult<ExportDecl> {
        self.consume(TokenKind::Export)?;

        // export default
        if self.check(&TokenKind::Default) {
            let start = self.advance().span;
            let default = self.parse_default_export()?;
            return Ok(ExportDecl::Default(Node::new(default, self.span_from(start))));
        }

        // export * [as ns] from "module"
        if self.check(&TokenKind::Star) {
            let start = self.advance().span;
            let alias = if self.check_word("as") {
                self.advance();
                Some(self.parse_identifier_name()?)
            } else {
                None
            };
            let specifier = Node::new(ExportSpecifier::All { alias }, self.span_from(start));

            self.consume_word("from")?;
            let source = self.consume(TokenKind::StringLiteral)?.value.clone();
            self.consume_semicolon()?;

            return Ok(ExportDecl::Specifiers {
                specifiers: vec![specifier],
                source: Some(source),
            });
        }

        // export { a, b as c } [from "module"]
        if self.check(&TokenKind::LBrace) {
            self.advance();
            let mut specifiers = Vec::new();

            while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
                let local = self.parse_identifier_name()?;
                let start = local.span;
                let exported = if self.check_word("as") {
                    self.advance();
                    Some(self.parse_identifier_name()?)
                } else {
                    None
                };

                specifiers.push(Node::new(ExportSpecifier::Named { local, exported }, self.span_from(start)));

                if !self.check(&TokenKind::RBrace) {
                    self.consume(TokenKind::Comma)?;
                }
            }

            self.consume(TokenKind::RBrace)?;

            let source = if self.check_word("from") {
                self.advance();
                Some(self.consume(TokenKind::StringLiteral)?.value.clone())
            } else {
                // Without a source, names must refer to local bindings.
                for spec in &specifiers {
                    if let ExportSpecifier::Named { local, .. } = &spec.value {
                        if TokenKind::keyword(&local.value.name).is_some() {
                            return Err(ParseError::new(
                                format!("'{}' is a reserved word and cannot be exported locally", local.value.name),
                                local.span,
                            ));
                        }
                    }
                }
                None
            };

            self.consume_semicolon()?;

            return Ok(ExportDecl::Specifiers { specifiers, source });
        }

        // export declaration
        let start = self.current_token().span;
        let decl = match self.current_token().kind {
            TokenKind::Var | TokenKind::Let | TokenKind::Const => {
                let var = self.parse_var_decl()?;
                self.consume_semicolon()?;
                Decl::Var(var)
            }
            TokenKind::Function => Decl::Function(self.parse_function_decl(false)?),
            TokenKind::Class => Decl::Class(self.parse_class_decl()?),
            _ if self.is_async_function_start() => {
                self.advance();
                Decl::Function(self.parse_function_decl(true)?)
            }
            kind => return Err(self.error(format!("Expected declaration after 'export', found {:?}", kind))),
        };

        Ok(ExportDecl::Decl(Node::new(decl, self.span_from(start))))
    }

    /// Named function and class declarations keep their declaration form;
    /// anything else, anonymous functions and classes included, is an
    /// expression.
    fn parse_default_export(&mut self) -> ParseResult<DefaultExport> {
        let is_async = self.is_async_function_start();
        if self.check(&TokenKind::Function) || is_async {
            let offset = if is_async { 1 } else { 0 };
            let named = match self.peek_kind(offset + 1) {
                Some(TokenKind::Star) => self.peek_kind(offset + 2) == Some(&TokenKind::Identifier),
                Some(TokenKind::Identifier) => true,
                _ => false,
            };
            if named {
                if is_async {
                    self.advance();
                }
                return Ok(DefaultExport::Function(self.parse_function_decl(is_async)?));
            }
        }

        if self.check(&TokenKind::Class) && self.peek_kind(1) == Some(&TokenKind::Identifier) {
            return Ok(DefaultExport::Class(self.parse_class_decl()?));
        }

        let expr = self.parse_assignment()?;
        let is_declaration_like = matches!(expr.value, Expr::Function { .. } | Expr::Class { .. });
        if is_declaration_like {
            // `export default function () {}` needs no terminator.
            if self.check(&TokenKind::Semicolon) {
                self.advance();
            }
        } else {
            self.consume_semicolon()?;
        }
        Ok(DefaultExport::Expr(expr))
    }

    /// `async function` with no line break between the two words.
    pub(crate) fn is_async_function_start(&self) -> bool {
        self.check_word("async")
            && self
                .peek(1)
                .map_or(false, |t| t.kind == TokenKind::Function && !t.newline_before)
    }
}
