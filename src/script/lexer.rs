//! Tokenizer for request scripts
//!
//! Newlines are significant only outside brackets. A statement that starts
//! with whitespace is rejected as an unexpected indent; the extractor relies
//! on that to detect snippets whose indentation was not fully normalized.

use crate::script::ScriptError;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Name(String),
    Str { value: String, format: bool },
    Int(i64),
    UInt(u64),
    Float(f64),
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    LParen,
    RParen,
    Colon,
    Comma,
    Assign,
    Minus,
    Newline,
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
}

/// Split script source into tokens
pub fn tokenize(source: &str) -> Result<Vec<Token>, ScriptError> {
    Lexer::new(source).run()
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    depth: usize,
    at_line_start: bool,
    tokens: Vec<Token>,
}

impl Lexer {
    fn new(source: &str) -> Self {
        Lexer {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            depth: 0,
            at_line_start: true,
            tokens: Vec::new(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn push(&mut self, kind: TokenKind, line: usize) {
        self.tokens.push(Token { kind, line });
    }

    fn push_newline(&mut self) {
        let needs_newline = matches!(
            self.tokens.last(),
            Some(token) if token.kind != TokenKind::Newline
        );
        if needs_newline {
            self.push(TokenKind::Newline, self.line);
        }
    }

    fn run(mut self) -> Result<Vec<Token>, ScriptError> {
        loop {
            if self.at_line_start && self.depth == 0 {
                let start = self.pos;
                while matches!(self.peek(), Some(' ') | Some('\t')) {
                    self.pos += 1;
                }
                match self.peek() {
                    None => break,
                    Some('\n') => {
                        self.pos += 1;
                        self.line += 1;
                        continue;
                    }
                    Some('\r') => {
                        self.pos += 1;
                        continue;
                    }
                    Some('#') => {
                        self.skip_comment();
                        continue;
                    }
                    Some(_) if self.pos > start => {
                        return Err(ScriptError::syntax(self.line, "unexpected indent"));
                    }
                    Some(_) => self.at_line_start = false,
                }
            }

            let Some(c) = self.peek() else { break };
            let line = self.line;
            match c {
                '\n' => {
                    self.pos += 1;
                    if self.depth == 0 {
                        self.push_newline();
                        self.at_line_start = true;
                    }
                    self.line += 1;
                }
                ' ' | '\t' | '\r' => self.pos += 1,
                '#' => self.skip_comment(),
                '\\' if self.peek_at(1) == Some('\n') => {
                    self.pos += 2;
                    self.line += 1;
                }
                '{' | '[' | '(' => {
                    self.depth += 1;
                    self.pos += 1;
                    let kind = match c {
                        '{' => TokenKind::LBrace,
                        '[' => TokenKind::LBracket,
                        _ => TokenKind::LParen,
                    };
                    self.push(kind, line);
                }
                '}' | ']' | ')' => {
                    self.depth = self
                        .depth
                        .checked_sub(1)
                        .ok_or_else(|| ScriptError::syntax(line, format!("unmatched '{}'", c)))?;
                    self.pos += 1;
                    let kind = match c {
                        '}' => TokenKind::RBrace,
                        ']' => TokenKind::RBracket,
                        _ => TokenKind::RParen,
                    };
                    self.push(kind, line);
                }
                ':' => {
                    self.pos += 1;
                    self.push(TokenKind::Colon, line);
                }
                ',' => {
                    self.pos += 1;
                    self.push(TokenKind::Comma, line);
                }
                '=' => {
                    self.pos += 1;
                    self.push(TokenKind::Assign, line);
                }
                '-' => {
                    self.pos += 1;
                    self.push(TokenKind::Minus, line);
                }
                '"' | '\'' => self.string("")?,
                c if c.is_ascii_digit()
                    || (c == '.' && self.peek_at(1).map_or(false, |n| n.is_ascii_digit())) =>
                {
                    self.number()?
                }
                c if c.is_alphabetic() || c == '_' => self.identifier()?,
                other => {
                    return Err(ScriptError::syntax(
                        line,
                        format!("invalid character '{}'", other),
                    ))
                }
            }
        }

        if self.depth > 0 {
            return Err(ScriptError::syntax(self.line, "unexpected EOF: bracket was never closed"));
        }
        self.push_newline();
        self.push(TokenKind::Eof, self.line);
        Ok(self.tokens)
    }

    fn skip_comment(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.pos += 1;
        }
    }

    fn identifier(&mut self) -> Result<(), ScriptError> {
        let line = self.line;
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
            self.pos += 1;
        }
        let word: String = self.chars[start..self.pos].iter().collect();

        if matches!(self.peek(), Some('"') | Some('\'')) && is_string_prefix(&word) {
            return self.string(&word);
        }
        self.push(TokenKind::Name(word), line);
        Ok(())
    }

    fn number(&mut self) -> Result<(), ScriptError> {
        let line = self.line;
        let start = self.pos;
        let mut is_float = false;

        while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '_') {
            self.pos += 1;
        }
        if self.peek() == Some('.') {
            is_float = true;
            self.pos += 1;
            while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '_') {
                self.pos += 1;
            }
        }
        if matches!(self.peek(), Some('e') | Some('E')) {
            let sign = matches!(self.peek_at(1), Some('+') | Some('-'));
            let digit_at = if sign { 2 } else { 1 };
            if self.peek_at(digit_at).map_or(false, |c| c.is_ascii_digit()) {
                is_float = true;
                self.pos += digit_at;
                while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                    self.pos += 1;
                }
            }
        }
        if matches!(self.peek(), Some(c) if c.is_alphabetic() || c == '_') {
            return Err(ScriptError::syntax(line, "invalid decimal literal"));
        }

        let text: String = self.chars[start..self.pos]
            .iter()
            .filter(|c| **c != '_')
            .collect();
        let kind = if is_float {
            TokenKind::Float(parse_float(&text, line)?)
        } else {
            match (text.parse::<i64>(), text.parse::<u64>()) {
                (Ok(value), _) => TokenKind::Int(value),
                (_, Ok(value)) => TokenKind::UInt(value),
                _ => TokenKind::Float(parse_float(&text, line)?),
            }
        };
        self.push(kind, line);
        Ok(())
    }

    fn string(&mut self, prefix: &str) -> Result<(), ScriptError> {
        let raw = prefix.contains(['r', 'R']);
        let format = prefix.contains(['f', 'F']);
        let start_line = self.line;

        let Some(quote) = self.peek() else {
            return Err(ScriptError::syntax(start_line, "unterminated string literal"));
        };
        let triple = self.peek_at(1) == Some(quote) && self.peek_at(2) == Some(quote);
        self.pos += if triple { 3 } else { 1 };

        let mut value = String::new();
        loop {
            let Some(c) = self.peek() else {
                let message = if triple {
                    "unterminated triple-quoted string literal"
                } else {
                    "unterminated string literal"
                };
                return Err(ScriptError::syntax(start_line, message));
            };

            if c == quote {
                if !triple {
                    self.pos += 1;
                    break;
                }
                if self.peek_at(1) == Some(quote) && self.peek_at(2) == Some(quote) {
                    self.pos += 3;
                    break;
                }
            }
            if c == '\n' && !triple {
                return Err(ScriptError::syntax(start_line, "unterminated string literal"));
            }

            if c == '\\' {
                self.escape(raw, &mut value)?;
                continue;
            }

            if c == '\n' {
                self.line += 1;
            }
            value.push(c);
            self.pos += 1;
        }

        self.push(TokenKind::Str { value, format }, start_line);
        Ok(())
    }

    /// Consume a backslash sequence at the cursor and append its value
    fn escape(&mut self, raw: bool, value: &mut String) -> Result<(), ScriptError> {
        let line = self.line;
        let Some(next) = self.peek_at(1) else {
            return Err(ScriptError::syntax(line, "unterminated string literal"));
        };

        if raw {
            value.push('\\');
            value.push(next);
            if next == '\n' {
                self.line += 1;
            }
            self.pos += 2;
            return Ok(());
        }

        self.pos += 2;
        match next {
            '\n' => self.line += 1,
            'n' => value.push('\n'),
            't' => value.push('\t'),
            'r' => value.push('\r'),
            '0' => value.push('\0'),
            'a' => value.push('\x07'),
            'b' => value.push('\x08'),
            'f' => value.push('\x0c'),
            'v' => value.push('\x0b'),
            '\\' | '\'' | '"' => value.push(next),
            'x' => value.push(self.hex_escape(2, line)?),
            'u' => value.push(self.hex_escape(4, line)?),
            'U' => value.push(self.hex_escape(8, line)?),
            other => {
                value.push('\\');
                value.push(other);
            }
        }
        Ok(())
    }

    fn hex_escape(&mut self, width: usize, line: usize) -> Result<char, ScriptError> {
        let digits: String = self.chars.iter().skip(self.pos).take(width).collect();
        if digits.len() != width || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ScriptError::syntax(line, "truncated escape sequence"));
        }
        self.pos += width;
        u32::from_str_radix(&digits, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| ScriptError::syntax(line, "invalid escape sequence"))
    }
}

fn is_string_prefix(word: &str) -> bool {
    matches!(
        word.to_ascii_lowercase().as_str(),
        "r" | "f" | "b" | "u" | "rf" | "fr" | "rb" | "br"
    )
}

fn parse_float(text: &str, line: usize) -> Result<f64, ScriptError> {
    text.parse::<f64>()
        .map_err(|_| ScriptError::syntax(line, format!("invalid number '{}'", text)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_newlines_inside_brackets_are_ignored() {
        let tokens = kinds("a = {\n    \"k\": 1,\n}\n");
        assert_eq!(
            tokens,
            vec![
                TokenKind::Name("a".into()),
                TokenKind::Assign,
                TokenKind::LBrace,
                TokenKind::Str { value: "k".into(), format: false },
                TokenKind::Colon,
                TokenKind::Int(1),
                TokenKind::Comma,
                TokenKind::RBrace,
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unexpected_indent() {
        let err = tokenize("a = 1\n  b = 2\n").unwrap_err();
        assert!(err.is_syntax());
        assert_eq!(err, ScriptError::syntax(2, "unexpected indent"));
    }

    #[test]
    fn test_indented_comment_is_allowed() {
        assert!(tokenize("a = 1\n    # note\nb = 2\n").is_ok());
    }

    #[test]
    fn test_triple_quoted_string_keeps_content() {
        let tokens = kinds("x = \"\"\"ISA*00*~\n  GS*HR~\"\"\"");
        assert_eq!(
            tokens[2],
            TokenKind::Str { value: "ISA*00*~\n  GS*HR~".into(), format: false }
        );
    }

    #[test]
    fn test_prefixes_and_escapes() {
        let tokens = kinds(r#"a = f"{BASE_URL}/x\n""#);
        assert_eq!(
            tokens[2],
            TokenKind::Str { value: "{BASE_URL}/x\n".into(), format: true }
        );
        let tokens = kinds(r#"a = r"C:\new""#);
        assert_eq!(
            tokens[2],
            TokenKind::Str { value: "C:\\new".into(), format: false }
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(kinds("a = 1_000")[2], TokenKind::Int(1000));
        assert_eq!(kinds("a = 2.5e1")[2], TokenKind::Float(25.0));
        assert_eq!(
            kinds("a = 12345678901234567890")[2],
            TokenKind::UInt(12_345_678_901_234_567_890)
        );
        assert!(tokenize("a = 12abc").is_err());
    }

    #[test]
    fn test_unclosed_bracket() {
        assert!(tokenize("a = {\"k\": [1, 2}\n").is_err());
        assert!(tokenize("a = {\n").unwrap_err().is_syntax());
    }
}
