use cjsify_ast::Span;
use crate::token::{Token, TokenKind};

/// Punctuators, longest first so that the first prefix match wins.
const PUNCTUATORS: &[(&str, TokenKind)] = &[
    (">>>=", TokenKind::GtGtGtEq),
    ("...", TokenKind::DotDotDot),
    ("===", TokenKind::EqEqEq),
    ("!==", TokenKind::BangEqEq),
    ("**=", TokenKind::StarStarEq),
    ("<<=", TokenKind::LtLtEq),
    (">>=", TokenKind::GtGtEq),
    (">>>", TokenKind::GtGtGt),
    ("&&=", TokenKind::AmpAmpEq),
    ("||=", TokenKind::PipePipeEq),
    ("??=", TokenKind::QuestionQuestionEq),
    ("=>", TokenKind::FatArrow),
    ("==", TokenKind::EqEq),
    ("!=", TokenKind::BangEq),
    ("<=", TokenKind::LtEq),
    (">=", TokenKind::GtEq),
    ("&&", TokenKind::AmpAmp),
    ("||", TokenKind::PipePipe),
    ("??", TokenKind::QuestionQuestion),
    ("++", TokenKind::PlusPlus),
    ("--", TokenKind::MinusMinus),
    ("+=", TokenKind::PlusEq),
    ("-=", TokenKind::MinusEq),
    ("*=", TokenKind::StarEq),
    ("/=", TokenKind::SlashEq),
    ("%=", TokenKind::PercentEq),
    ("&=", TokenKind::AmpEq),
    ("|=", TokenKind::PipeEq),
    ("^=", TokenKind::CaretEq),
    ("**", TokenKind::StarStar),
    ("<<", TokenKind::LtLt),
    (">>", TokenKind::GtGt),
    ("+", TokenKind::Plus),
    ("-", TokenKind::Minus),
    ("*", TokenKind::Star),
    ("/", TokenKind::Slash),
    ("%", TokenKind::Percent),
    ("=", TokenKind::Eq),
    ("<", TokenKind::Lt),
    (">", TokenKind::Gt),
    ("!", TokenKind::Bang),
    ("&", TokenKind::Amp),
    ("|", TokenKind::Pipe),
    ("^", TokenKind::Caret),
    ("~", TokenKind::Tilde),
    ("?", TokenKind::Question),
    ("(", TokenKind::LParen),
    (")", TokenKind::RParen),
    ("{", TokenKind::LBrace),
    ("}", TokenKind::RBrace),
    ("[", TokenKind::LBracket),
    ("]", TokenKind::RBracket),
    (";", TokenKind::Semicolon),
    (",", TokenKind::Comma),
    (".", TokenKind::Dot),
    (":", TokenKind::Colon),
];

/// The lexer/tokenizer for JavaScript module source.
///
/// Regular expression literals are not recognised; `/` always lexes as
/// division.
pub struct Lexer<'a> {
    source: &'a str,
    chars: std::str::CharIndices<'a>,
    current_pos: usize,
    current_char: Option<char>,
    file_id: usize,
    saw_newline: bool,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer from source code.
    pub fn new(source: &'a str) -> Self {
        Self::with_file_id(source, 0)
    }

    /// Creates a new lexer with a specific file ID.
    pub fn with_file_id(source: &'a str, file_id: usize) -> Self {
        let mut chars = source.char_indices();
        let current_char = chars.next().map(|(_, c)| c);
        Self {
            source,
            chars,
            current_pos: 0,
            current_char,
            file_id,
            saw_newline: false,
        }
    }

    /// Tokenizes the entire source code and returns all tokens.
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }

    /// Gets the next token from the source.
    pub fn next_token(&mut self) -> Token {
        self.saw_newline = false;
        let mut token = match self.skip_whitespace_and_comments() {
            Some(error_token) => error_token,
            None => self.read_token(),
        };
        token.newline_before = self.saw_newline;
        token
    }

    fn read_token(&mut self) -> Token {
        let start = self.current_pos;

        match self.current_char {
            None => Token::new(TokenKind::Eof, self.span_from(start), String::new()),
            Some(ch) => match ch {
                '"' | '\'' => self.read_string_literal(ch),
                '`' => self.read_template_literal(),
                '0'..='9' => self.read_number(),
                '.' if self.peek().map_or(false, |c| c.is_ascii_digit()) => self.read_number(),
                _ if is_ident_start(ch) => self.read_identifier_or_keyword(),
                _ => self.read_punctuator(start, ch),
            },
        }
    }

    // Helper methods

    fn advance(&mut self) {
        if let Some((pos, ch)) = self.chars.next() {
            self.current_pos = pos;
            self.current_char = Some(ch);
        } else {
            self.current_pos = self.source.len();
            self.current_char = None;
        }
    }

    fn advance_by(&mut self, bytes: usize) {
        let target = self.current_pos + bytes;
        while self.current_pos < target && self.current_char.is_some() {
            self.advance();
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.clone().next().map(|(_, c)| c)
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.current_pos, self.file_id)
    }

    fn error(&self, start: usize, message: impl Into<String>) -> Token {
        Token::new(TokenKind::Error, self.span_from(start), message.into())
    }

    fn skip_whitespace_and_comments(&mut self) -> Option<Token> {
        loop {
            match self.current_char {
                Some(ch) if ch.is_whitespace() => {
                    if is_line_terminator(ch) {
                        self.saw_newline = true;
                    }
                    self.advance();
                }
                Some('/') if self.peek() == Some('/') => {
                    while let Some(ch) = self.current_char {
                        if is_line_terminator(ch) {
                            break;
                        }
                        self.advance();
                    }
                }
                Some('/') if self.peek() == Some('*') => {
                    let start = self.current_pos;
                    self.advance_by(2);
                    loop {
                        match self.current_char {
                            None => return Some(self.error(start, "Unterminated multi-line comment")),
                            Some('*') if self.peek() == Some('/') => {
                                self.advance_by(2);
                                break;
                            }
                            Some(ch) => {
                                if is_line_terminator(ch) {
                                    self.saw_newline = true;
                                }
                                self.advance();
                            }
                        }
                    }
                }
                _ => break,
            }
        }
        None
    }

    fn read_punctuator(&mut self, start: usize, ch: char) -> Token {
        let rest = &self.source[start..];
        for (text, kind) in PUNCTUATORS {
            if rest.starts_with(text) {
                self.advance_by(text.len());
                return Token::new(*kind, self.span_from(start), (*text).to_string());
            }
        }
        self.advance();
        self.error(start, format!("Unexpected character: {}", ch))
    }

    fn read_string_literal(&mut self, quote: char) -> Token {
        let start = self.current_pos;
        self.advance(); // Skip opening quote

        let mut value = String::new();

        while let Some(ch) = self.current_char {
            if ch == quote {
                self.advance(); // Skip closing quote
                return Token::new(TokenKind::StringLiteral, self.span_from(start), value);
            } else if ch == '\\' {
                self.advance();
                if let Some(unescaped) = self.read_escape() {
                    value.push(unescaped);
                }
            } else if is_line_terminator(ch) {
                return self.error(start, "Unterminated string literal");
            } else {
                value.push(ch);
                self.advance();
            }
        }

        self.error(start, "Unterminated string literal")
    }

    /// Reads the escape after a backslash. Line continuations yield `None`.
    fn read_escape(&mut self) -> Option<char> {
        let escaped = self.current_char?;
        match escaped {
            'u' => {
                self.advance();
                Some(self.read_hex_digits(4))
            }
            'x' => {
                self.advance();
                Some(self.read_hex_digits(2))
            }
            '\n' => {
                self.advance();
                None
            }
            _ => {
                self.advance();
                Some(match escaped {
                    'n' => '\n',
                    'r' => '\r',
                    't' => '\t',
                    'b' => '\u{8}',
                    'f' => '\u{c}',
                    'v' => '\u{b}',
                    '0' => '\0',
                    other => other,
                })
            }
        }
    }

    fn read_hex_digits(&mut self, count: usize) -> char {
        let mut code = 0u32;
        for _ in 0..count {
            match self.current_char.and_then(|ch| ch.to_digit(16)) {
                Some(digit) => {
                    code = code * 16 + digit;
                    self.advance();
                }
                None => break,
            }
        }
        char::from_u32(code).unwrap_or('\u{FFFD}')
    }

    fn read_template_literal(&mut self) -> Token {
        let start = self.current_pos;
        self.advance(); // Skip opening backtick

        while let Some(ch) = self.current_char {
            match ch {
                '`' => {
                    self.advance();
                    // Raw text between the backticks is kept verbatim.
                    let raw = self.source[start + 1..self.current_pos - 1].to_string();
                    return Token::new(TokenKind::TemplateLiteral, self.span_from(start), raw);
                }
                '$' if self.peek() == Some('{') => {
                    self.advance();
                    return self.error(start, "Template substitutions are not supported");
                }
                '\\' => {
                    self.advance();
                    self.advance();
                }
                _ => self.advance(),
            }
        }

        self.error(start, "Unterminated template literal")
    }

    fn read_number(&mut self) -> Token {
        let start = self.current_pos;

        if self.current_char == Some('0') {
            let radix = match self.peek() {
                Some('x') | Some('X') => Some(16),
                Some('o') | Some('O') => Some(8),
                Some('b') | Some('B') => Some(2),
                _ => None,
            };
            if let Some(radix) = radix {
                self.advance_by(2);
                self.skip_digits(|c| c.is_digit(radix));
                return self.number_token(start);
            }
        }

        self.skip_digits(|c| c.is_ascii_digit());
        if self.current_char == Some('.') {
            self.advance();
            self.skip_digits(|c| c.is_ascii_digit());
        }
        if matches!(self.current_char, Some('e') | Some('E')) {
            self.advance();
            if matches!(self.current_char, Some('+') | Some('-')) {
                self.advance();
            }
            self.skip_digits(|c| c.is_ascii_digit());
        }

        self.number_token(start)
    }

    fn skip_digits(&mut self, is_digit: impl Fn(char) -> bool) {
        while let Some(ch) = self.current_char {
            if is_digit(ch) || ch == '_' {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Number tokens carry the lexeme with separators removed.
    fn number_token(&mut self, start: usize) -> Token {
        if self.current_char.map_or(false, is_ident_start) {
            while self.current_char.map_or(false, is_ident_part) {
                self.advance();
            }
            return self.error(start, "Invalid numeric literal");
        }
        let value: String = self.source[start..self.current_pos]
            .chars()
            .filter(|&c| c != '_')
            .collect();
        Token::new(TokenKind::NumberLiteral, self.span_from(start), value)
    }

    fn read_identifier_or_keyword(&mut self) -> Token {
        let start = self.current_pos;
        while self.current_char.map_or(false, is_ident_part) {
            self.advance();
        }

        let value = &self.source[start..self.current_pos];
        let kind = TokenKind::keyword(value).unwrap_or(TokenKind::Identifier);
        Token::new(kind, self.span_from(start), value.to_string())
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_' || ch == '$'
}

fn is_ident_part(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$'
}

fn is_line_terminator(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}
