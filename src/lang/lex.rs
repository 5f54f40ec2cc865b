use super::{token::*, Column, Error, LineNumber};

type Result<T> = std::result::Result<T, Error>;

/// Splits source text into tokens. The result always ends with exactly
/// one `Kind::End` token.
pub fn lex(s: &str) -> Result<Vec<Token>> {
    let mut lexer = ToyLexer::new(s);
    let mut tokens = vec![];
    while let Some(token) = lexer.next_token()? {
        tokens.push(token);
    }
    tokens.push(Token::new(Kind::End, "", lexer.line, lexer.column()));
    log::debug!("lexed {} tokens", tokens.len());
    Ok(tokens)
}

fn is_toy_whitespace(c: char) -> bool {
    c == ' ' || c == '\t' || c == '\n' || c == '\r'
}

fn is_toy_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn is_toy_alphabetic(c: char) -> bool {
    c.is_ascii_alphabetic()
}

fn is_toy_alphanumeric(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

struct ToyLexer {
    chars: Vec<char>,
    pos: usize,
    line: LineNumber,
    line_start: usize,
}

impl ToyLexer {
    fn new(s: &str) -> ToyLexer {
        ToyLexer {
            chars: s.chars().collect(),
            pos: 0,
            line: 1,
            line_start: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn column(&self) -> Column {
        let col = self.pos - self.line_start;
        col..col
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
            self.line_start = self.pos;
        }
        Some(ch)
    }

    fn token(&self, kind: Kind, start: usize) -> Token {
        let lexeme: String = self.chars[start..self.pos].iter().collect();
        let col = start - self.line_start;
        Token::new(kind, &lexeme, self.line, col..col + (self.pos - start))
    }

    fn next_token(&mut self) -> Result<Option<Token>> {
        loop {
            match self.peek() {
                None => return Ok(None),
                Some(c) if is_toy_whitespace(c) => {
                    self.advance();
                }
                Some('/') if self.peek_at(1) == Some('/') => self.comment(),
                Some(_) => break,
            }
        }
        if let Some(t) = self.operator() {
            return Ok(Some(t));
        }
        if let Some(t) = self.alphabetic() {
            return Ok(Some(t));
        }
        if let Some(t) = self.number() {
            return Ok(Some(t));
        }
        if let Some(t) = self.delimiter() {
            return Ok(Some(t));
        }
        let ch = self.peek().unwrap_or_default();
        let col = self.column();
        Err(error!(IllegalCharacter, self.line, ..&(col.start..col.start + 1);
            format!("UNEXPECTED {:?}", ch)))
    }

    fn comment(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            self.advance();
        }
    }

    /// Two-character operators win over their one-character prefixes.
    fn operator(&mut self) -> Option<Token> {
        let start = self.pos;
        let first = self.peek()?;
        if let Some(second) = self.peek_at(1) {
            let s: String = [first, second].iter().collect();
            if let Some(kind @ (Kind::Operator(_) | Kind::IncDec(_))) = Kind::from_string(&s) {
                self.pos += 2;
                return Some(self.token(kind, start));
            }
        }
        match Kind::from_string(first.encode_utf8(&mut [0; 4])) {
            Some(kind @ Kind::Operator(_)) => {
                self.pos += 1;
                Some(self.token(kind, start))
            }
            _ => None,
        }
    }

    fn alphabetic(&mut self) -> Option<Token> {
        let start = self.pos;
        if !is_toy_alphabetic(self.peek()?) {
            return None;
        }
        while let Some(ch) = self.peek() {
            if !is_toy_alphanumeric(ch) {
                break;
            }
            self.pos += 1;
        }
        let s: String = self.chars[start..self.pos].iter().collect();
        let kind = match Kind::from_string(&s) {
            Some(kind @ (Kind::Word(_) | Kind::Builtin(_) | Kind::Constant(_))) => kind,
            _ => Kind::Ident,
        };
        Some(self.token(kind, start))
    }

    fn number(&mut self) -> Option<Token> {
        let start = self.pos;
        let first = self.peek()?;
        let leading_point = first == '.' && self.peek_at(1).map_or(false, is_toy_digit);
        if !is_toy_digit(first) && !leading_point {
            return None;
        }
        let mut decimal = false;
        while let Some(ch) = self.peek() {
            if is_toy_digit(ch) {
                self.pos += 1;
                continue;
            }
            if ch == '.' && !decimal && self.peek_at(1).map_or(false, is_toy_digit) {
                decimal = true;
                self.pos += 1;
                continue;
            }
            break;
        }
        Some(self.token(Kind::Number, start))
    }

    fn delimiter(&mut self) -> Option<Token> {
        let start = self.pos;
        let ch = self.peek()?;
        match Kind::from_string(ch.encode_utf8(&mut [0; 4])) {
            Some(kind) if kind.is_delimiter() => {
                self.pos += 1;
                Some(self.token(kind, start))
            }
            _ => None,
        }
    }
}
