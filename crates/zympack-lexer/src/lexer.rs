use zympack_ast::Span;
use crate::token::{Token, TokenKind};

/// Punctuators, longest first so the first prefix match wins.
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
    ("?.", TokenKind::QuestionDot),
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
    (".", TokenKind::Dot),
    ("(", TokenKind::LParen),
    (")", TokenKind::RParen),
    ("{", TokenKind::LBrace),
    ("}", TokenKind::RBrace),
    ("[", TokenKind::LBracket),
    ("]", TokenKind::RBracket),
    (";", TokenKind::Semicolon),
    (",", TokenKind::Comma),
    (":", TokenKind::Colon),
];

/// Pieces of a template literal. There is always one more quasi than
/// substitutions; each substitution carries its byte offset in the token text.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct TemplateParts<'a> {
    pub quasis: Vec<&'a str>,
    pub substitutions: Vec<(usize, &'a str)>,
}

/// Deepest nesting of template literals inside substitutions.
const MAX_TEMPLATE_DEPTH: usize = 256;

/// An open bracket, as far as regex detection cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Nesting {
    /// `statement_head` for the parenthesised heads of `if`, `for`, `while`,
    /// `with`, `switch` and `catch`.
    Paren { statement_head: bool },
    /// `block` unless the brace opens an object literal or the body of a
    /// function or class expression.
    Brace { block: bool },
}

/// A `function` or `class` keyword whose body brace is still to come.
#[derive(Debug, Clone, Copy)]
struct PendingBody {
    depth: usize,
    expression: bool,
}

/// The lexer/tokenizer for JavaScript module sources.
pub struct Lexer<'a> {
    source: &'a str,
    chars: std::str::CharIndices<'a>,
    current_pos: usize,
    current_char: Option<char>,
    file_id: usize,
    /// Kind of the last token produced; decides whether `/` starts a regex.
    /// Reserved words after `.` are recorded as identifiers.
    prev_kind: Option<TokenKind>,
    prev2_kind: Option<TokenKind>,
    /// A statement may begin right after the last token.
    prev_starts_statement: bool,
    /// The last token was an `async` that itself began a statement.
    prev_async_statement: bool,
    nesting: Vec<Nesting>,
    pending_bodies: Vec<PendingBody>,
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
            prev_kind: None,
            prev2_kind: None,
            prev_starts_statement: true,
            prev_async_statement: false,
            nesting: Vec::new(),
            pending_bodies: Vec::new(),
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

    /// Splits the text of a `TemplateLiteral` token into its raw quasis and
    /// the source of each substitution.
    pub fn split_template(raw: &'a str) -> TemplateParts<'a> {
        let mut lexer = Lexer::new(raw);
        let mut parts = TemplateParts::default();

        lexer.advance(); // Skip opening backtick
        let mut quasi_start = lexer.current_pos;
        while let Some(ch) = lexer.current_char {
            match ch {
                '`' => break,
                '\\' => {
                    lexer.advance();
                    lexer.advance();
                }
                '$' if lexer.peek() == Some('{') => {
                    parts.quasis.push(&raw[quasi_start..lexer.current_pos]);
                    lexer.advance();
                    lexer.advance();
                    let expr_start = lexer.current_pos;
                    if lexer.scan_substitution(1).is_err() {
                        break;
                    }
                    // The closing brace is one byte behind the cursor
                    let expr_end = lexer.current_pos - 1;
                    parts.substitutions.push((expr_start, &raw[expr_start..expr_end]));
                    quasi_start = lexer.current_pos;
                }
                _ => lexer.advance(),
            }
        }
        parts.quasis.push(&raw[quasi_start..lexer.current_pos]);
        parts
    }

    /// Gets the next token from the source.
    pub fn next_token(&mut self) -> Token {
        let newline_before = match self.skip_whitespace_and_comments() {
            Ok(newline) => newline,
            Err(error_token) => return error_token,
        };

        let start = self.current_pos;
        let mut token = match self.current_char {
            None => self.make(TokenKind::Eof, start),
            Some('#') if start == 0 && self.peek() == Some('!') => self.read_hashbang(),
            Some(quote @ ('"' | '\'')) => self.read_string_literal(quote),
            Some('`') => self.read_template_literal(),
            Some(ch) if ch.is_ascii_digit() => self.read_number(),
            Some('.') if self.peek().is_some_and(|c| c.is_ascii_digit()) => self.read_number(),
            Some('#') => self.read_private_name(),
            Some(ch) if is_id_start(ch) => self.read_identifier_or_keyword(),
            Some('/') if self.regex_allowed() => self.read_regex_literal(),
            Some(ch) => self.read_punctuator(ch),
        };

        token.newline_before = newline_before;
        if token.kind != TokenKind::Error {
            self.track(&token);
        }
        token
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

    fn peek(&self) -> Option<char> {
        self.chars.clone().next().map(|(_, c)| c)
    }

    fn skip_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.current_char.is_some_and(&pred) {
            self.advance();
        }
    }

    fn make(&self, kind: TokenKind, start: usize) -> Token {
        Token::new(
            kind,
            Span::new(start, self.current_pos, self.file_id),
            self.source[start..self.current_pos].to_string(),
        )
    }

    fn error(&self, start: usize, message: impl Into<String>) -> Token {
        Token::new(
            TokenKind::Error,
            Span::new(start, self.current_pos, self.file_id),
            message.into(),
        )
    }

    /// Returns whether a line terminator was skipped.
    fn skip_whitespace_and_comments(&mut self) -> Result<bool, Token> {
        let mut newline = false;
        loop {
            match self.current_char {
                Some(ch) if is_line_terminator(ch) => {
                    newline = true;
                    self.advance();
                }
                Some(ch) if ch.is_whitespace() || ch == '\u{feff}' => {
                    self.advance();
                }
                Some('/') if self.peek() == Some('/') => {
                    self.skip_single_line_comment();
                }
                Some('/') if self.peek() == Some('*') => {
                    let start = self.current_pos;
                    match self.skip_multi_line_comment() {
                        Some(had_newline) => newline |= had_newline,
                        None => return Err(self.error(start, "Unterminated multi-line comment")),
                    }
                }
                _ => break,
            }
        }
        Ok(newline)
    }

    /// Stops before the line terminator so it still counts for ASI.
    fn skip_single_line_comment(&mut self) {
        self.skip_while(|ch| !is_line_terminator(ch));
    }

    /// Returns `None` when the comment is unterminated.
    fn skip_multi_line_comment(&mut self) -> Option<bool> {
        // Skip /*
        self.advance();
        self.advance();

        let mut newline = false;
        while let Some(ch) = self.current_char {
            if ch == '*' && self.peek() == Some('/') {
                self.advance();
                self.advance();
                return Some(newline);
            }
            newline |= is_line_terminator(ch);
            self.advance();
        }
        None
    }

    fn read_hashbang(&mut self) -> Token {
        let start = self.current_pos;
        self.skip_single_line_comment();
        self.make(TokenKind::Hashbang, start)
    }

    /// Strings keep their quotes and escapes; see [`cook_string`].
    fn read_string_literal(&mut self, quote: char) -> Token {
        let start = self.current_pos;
        self.advance(); // Skip opening quote

        while let Some(ch) = self.current_char {
            if ch == quote {
                self.advance();
                return self.make(TokenKind::StringLiteral, start);
            } else if ch == '\\' {
                self.advance();
                if self.current_char == Some('\r') && self.peek() == Some('\n') {
                    self.advance();
                }
                self.advance();
            } else if ch == '\n' || ch == '\r' {
                break;
            } else {
                self.advance();
            }
        }

        self.error(start, "Unterminated string literal")
    }

    /// The whole template, substitutions included, becomes one token; the
    /// parser splits it.
    fn read_template_literal(&mut self) -> Token {
        let start = self.current_pos;
        match self.scan_template(0) {
            Ok(()) => self.make(TokenKind::TemplateLiteral, start),
            Err(message) => self.error(start, message),
        }
    }

    fn scan_template(&mut self, depth: usize) -> Result<(), &'static str> {
        if depth >= MAX_TEMPLATE_DEPTH {
            return Err("Template literals nested too deeply");
        }
        self.advance(); // Skip opening backtick

        while let Some(ch) = self.current_char {
            match ch {
                '`' => {
                    self.advance();
                    return Ok(());
                }
                '\\' => {
                    self.advance();
                    self.advance();
                }
                '$' if self.peek() == Some('{') => {
                    self.advance();
                    self.advance();
                    self.scan_substitution(depth + 1)?;
                }
                _ => self.advance(),
            }
        }
        Err("Unterminated template literal")
    }

    /// Consumes a `${ ... }` body up to and including its closing brace.
    fn scan_substitution(&mut self, depth: usize) -> Result<(), &'static str> {
        let mut braces = 0usize;
        while let Some(ch) = self.current_char {
            match ch {
                '{' => {
                    braces += 1;
                    self.advance();
                }
                '}' => {
                    self.advance();
                    if braces == 0 {
                        return Ok(());
                    }
                    braces -= 1;
                }
                '"' | '\'' => {
                    if self.read_string_literal(ch).kind == TokenKind::Error {
                        return Err("Unterminated string literal");
                    }
                }
                '`' => self.scan_template(depth)?,
                '/' if self.peek() == Some('/') => self.skip_single_line_comment(),
                '/' if self.peek() == Some('*') => {
                    if self.skip_multi_line_comment().is_none() {
                        return Err("Unterminated multi-line comment");
                    }
                }
                _ => self.advance(),
            }
        }
        Err("Unterminated template literal")
    }

    /// Numbers keep their source spelling, separators included.
    fn read_number(&mut self) -> Token {
        let start = self.current_pos;

        if self.current_char == Some('0')
            && matches!(self.peek(), Some('x' | 'X' | 'o' | 'O' | 'b' | 'B'))
        {
            self.advance();
            self.advance();
            self.skip_while(|c| c.is_ascii_hexdigit() || c == '_');
        } else {
            self.skip_while(|c| c.is_ascii_digit() || c == '_');
            if self.current_char == Some('.') {
                self.advance();
                self.skip_while(|c| c.is_ascii_digit() || c == '_');
            }
            if matches!(self.current_char, Some('e' | 'E')) {
                self.advance();
                if matches!(self.current_char, Some('+' | '-')) {
                    self.advance();
                }
                self.skip_while(|c| c.is_ascii_digit() || c == '_');
            }
        }

        if self.current_char == Some('n') {
            let digits_end = self.current_pos;
            self.advance();
            return Token::new(
                TokenKind::BigIntLiteral,
                Span::new(start, self.current_pos, self.file_id),
                self.source[start..digits_end].to_string(),
            );
        }

        self.make(TokenKind::NumberLiteral, start)
    }

    fn read_identifier_or_keyword(&mut self) -> Token {
        let start = self.current_pos;
        self.skip_while(is_id_continue);

        let kind = TokenKind::keyword(&self.source[start..self.current_pos])
            .unwrap_or(TokenKind::Identifier);
        self.make(kind, start)
    }

    fn read_private_name(&mut self) -> Token {
        let start = self.current_pos;
        self.advance(); // #
        if !self.current_char.is_some_and(is_id_start) {
            return self.error(start, "Unexpected character: #");
        }
        self.skip_while(is_id_continue);
        self.make(TokenKind::Identifier, start)
    }

    /// A `/` starts a regex unless the previous token ends an operand. A
    /// closing `)` or `}` ends one unless it closes a statement head or a block.
    fn regex_allowed(&self) -> bool {
        match self.prev_kind {
            Some(TokenKind::RParen | TokenKind::RBrace) => self.prev_starts_statement,
            Some(
                TokenKind::Identifier
                | TokenKind::NumberLiteral
                | TokenKind::BigIntLiteral
                | TokenKind::StringLiteral
                | TokenKind::TemplateLiteral
                | TokenKind::RegexLiteral
                | TokenKind::RBracket
                | TokenKind::This
                | TokenKind::Super
                | TokenKind::Null
                | TokenKind::True
                | TokenKind::False
                | TokenKind::PlusPlus
                | TokenKind::MinusMinus,
            ) => false,
            _ => true,
        }
    }

    /// Updates the bracket context after `token`.
    fn track(&mut self, token: &Token) {
        let kind = match self.prev_kind {
            Some(TokenKind::Dot | TokenKind::QuestionDot) if token.kind.is_keyword() => {
                TokenKind::Identifier
            }
            _ => token.kind,
        };

        let starts_statement = match kind {
            TokenKind::Hashbang | TokenKind::Semicolon => true,
            TokenKind::LParen => {
                let statement_head = matches!(
                    self.prev_kind,
                    Some(
                        TokenKind::If
                            | TokenKind::While
                            | TokenKind::For
                            | TokenKind::With
                            | TokenKind::Switch
                            | TokenKind::Catch
                    )
                ) || (self.prev_kind == Some(TokenKind::Await)
                    && self.prev2_kind == Some(TokenKind::For));
                self.nesting.push(Nesting::Paren { statement_head });
                false
            }
            TokenKind::RParen => {
                let closed = self.close();
                closed == Some(Nesting::Paren { statement_head: true })
            }
            TokenKind::LBrace => {
                let block = self.brace_is_block();
                self.nesting.push(Nesting::Brace { block });
                block
            }
            TokenKind::RBrace => {
                let closed = self.close();
                closed == Some(Nesting::Brace { block: true })
            }
            // A label or `case` inside a block, as opposed to an object key
            // or the middle of a conditional
            TokenKind::Colon => matches!(self.nesting.last(), None | Some(Nesting::Brace { block: true })),
            TokenKind::Else | TokenKind::Do | TokenKind::Try | TokenKind::Finally => true,
            TokenKind::Function | TokenKind::Class => {
                let declaration = self.prev_starts_statement
                    || (self.prev_kind == Some(TokenKind::Identifier) && self.prev_async_statement);
                self.pending_bodies.push(PendingBody {
                    depth: self.nesting.len(),
                    expression: !declaration,
                });
                false
            }
            _ => false,
        };

        self.prev_async_statement =
            kind == TokenKind::Identifier && token.value == "async" && self.prev_starts_statement;
        self.prev2_kind = self.prev_kind;
        self.prev_kind = Some(kind);
        self.prev_starts_statement = starts_statement;
    }

    fn close(&mut self) -> Option<Nesting> {
        let closed = self.nesting.pop();
        let depth = self.nesting.len();
        self.pending_bodies.retain(|pending| pending.depth <= depth);
        closed
    }

    fn brace_is_block(&mut self) -> bool {
        if let Some(pending) = self.pending_bodies.last().copied() {
            if pending.depth == self.nesting.len() {
                self.pending_bodies.pop();
                return !pending.expression;
            }
        }
        // Arrow bodies and method bodies after a parameter list are blocks
        self.prev_starts_statement
            || matches!(self.prev_kind, Some(TokenKind::FatArrow | TokenKind::RParen))
    }

    fn read_regex_literal(&mut self) -> Token {
        let start = self.current_pos;
        self.advance(); // Skip opening slash

        let mut in_class = false;
        loop {
            match self.current_char {
                None => return self.error(start, "Unterminated regular expression"),
                Some(ch) if is_line_terminator(ch) => {
                    return self.error(start, "Unterminated regular expression")
                }
                Some('\\') => {
                    self.advance();
                    if self.current_char.is_some_and(|c| !is_line_terminator(c)) {
                        self.advance();
                    }
                }
                Some('[') => {
                    in_class = true;
                    self.advance();
                }
                Some(']') => {
                    in_class = false;
                    self.advance();
                }
                Some('/') if !in_class => {
                    self.advance();
                    break;
                }
                Some(_) => self.advance(),
            }
        }

        // Flags
        self.skip_while(is_id_continue);
        self.make(TokenKind::RegexLiteral, start)
    }

    fn read_punctuator(&mut self, ch: char) -> Token {
        let start = self.current_pos;
        let source = self.source;
        let rest = &source[start..];

        // `a?.5:b` is a conditional, not optional chaining
        let matched = PUNCTUATORS.iter().find(|(text, kind)| {
            rest.starts_with(text)
                && !(*kind == TokenKind::QuestionDot
                    && rest[2..].starts_with(|c: char| c.is_ascii_digit()))
        });

        match matched {
            Some((text, kind)) => {
                for _ in 0..text.len() {
                    self.advance();
                }
                self.make(*kind, start)
            }
            None => {
                self.advance();
                self.error(start, format!("Unexpected character: {}", ch))
            }
        }
    }
}

fn is_line_terminator(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

fn is_id_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_' || ch == '$'
}

fn is_id_continue(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$' || ch == '\u{200c}' || ch == '\u{200d}'
}

/// Decodes the escapes in the body of a string literal (quotes excluded).
pub fn cook_string(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        let Some(escaped) = chars.next() else {
            break;
        };
        match escaped {
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' if !chars.peek().is_some_and(|c| c.is_ascii_digit()) => out.push('\0'),
            'x' => {
                let code = read_hex(&mut chars, 2).unwrap_or(0xFFFD);
                out.push(char::from_u32(code).unwrap_or('\u{FFFD}'));
            }
            'u' => {
                let mut code = if chars.peek() == Some(&'{') {
                    chars.next();
                    let code = read_hex(&mut chars, 6);
                    if chars.peek() == Some(&'}') {
                        chars.next();
                    }
                    code
                } else {
                    read_hex(&mut chars, 4)
                }
                .unwrap_or(0xFFFD);

                // Surrogate pair spelled as two escapes
                if (0xD800..0xDC00).contains(&code) {
                    let mut ahead = chars.clone();
                    if ahead.next() == Some('\\') && ahead.next() == Some('u') {
                        if let Some(low) = read_hex(&mut ahead, 4) {
                            if (0xDC00..0xE000).contains(&low) {
                                code = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                                chars = ahead;
                            }
                        }
                    }
                }
                out.push(char::from_u32(code).unwrap_or('\u{FFFD}'));
            }
            // Line continuation
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            '\n' | '\u{2028}' | '\u{2029}' => {}
            other => out.push(other),
        }
    }
    out
}

fn read_hex(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, max: usize) -> Option<u32> {
    let mut code = 0u32;
    let mut digits = 0;
    while digits < max {
        match chars.peek().and_then(|c| c.to_digit(16)) {
            Some(digit) => {
                code = code * 16 + digit;
                digits += 1;
                chars.next();
            }
            None => break,
        }
    }
    (digits > 0).then_some(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source).tokenize().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_keywords() {
        let source = "var let const function return if else typeof delete";
        let tokens = Lexer::new(source).tokenize();

        assert_eq!(tokens[0].kind, TokenKind::Var);
        assert_eq!(tokens[1].kind, TokenKind::Let);
        assert_eq!(tokens[2].kind, TokenKind::Const);
        assert_eq!(tokens[3].kind, TokenKind::Function);
        assert_eq!(tokens[4].kind, TokenKind::Return);
        assert_eq!(tokens[5].kind, TokenKind::If);
        assert_eq!(tokens[6].kind, TokenKind::Else);
        assert_eq!(tokens[7].kind, TokenKind::Typeof);
        assert_eq!(tokens[8].kind, TokenKind::Delete);
    }

    #[test]
    fn test_contextual_words_are_identifiers() {
        let tokens = Lexer::new("of get set async static require").tokenize();
        for token in &tokens[..6] {
            assert_eq!(token.kind, TokenKind::Identifier, "{}", token.value);
        }
        assert!(tokens[0].is_identifier_name());
    }

    #[test]
    fn test_numbers_keep_spelling() {
        let tokens = Lexer::new("123 45.67 0x1A 0o77 0b1010 1_000 .5 1e-3 42n").tokenize();

        let values: Vec<_> = tokens[..8].iter().map(|t| t.value.as_str()).collect();
        assert_eq!(
            values,
            ["123", "45.67", "0x1A", "0o77", "0b1010", "1_000", ".5", "1e-3"]
        );
        assert!(tokens[..8].iter().all(|t| t.kind == TokenKind::NumberLiteral));
        assert_eq!(tokens[8].kind, TokenKind::BigIntLiteral);
        assert_eq!(tokens[8].value, "42");
        assert_eq!(tokens[8].span.end, 44);
    }

    #[test]
    fn test_strings_are_raw() {
        let tokens = Lexer::new(r#""he said \"hi\"" 'it\'s'"#).tokenize();

        assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
        assert_eq!(tokens[0].value, r#""he said \"hi\"""#);
        assert_eq!(tokens[1].value, r"'it\'s'");
    }

    #[test]
    fn test_cook_string() {
        assert_eq!(cook_string(r"a\nb\tc"), "a\nb\tc");
        assert_eq!(cook_string(r"\x41B\u{43}"), "ABC");
        assert_eq!(cook_string(r"\uD83D\uDE00"), "\u{1F600}");
        assert_eq!(cook_string("line\\\ncontinued"), "linecontinued");
        assert_eq!(cook_string(r"\'\q"), "'q");
        assert_eq!(cook_string(r"\0"), "\0");
    }

    #[test]
    fn test_unterminated_string() {
        let tokens = Lexer::new("'abc\n'").tokenize();
        assert_eq!(tokens[0].kind, TokenKind::Error);
        assert_eq!(tokens[0].value, "Unterminated string literal");
    }

    #[test]
    fn test_operators() {
        let source = "a + - * b / % ** += -= === !== <= >= && || ?? ?. >>>= ??= ...";
        assert_eq!(
            kinds(source),
            vec![
                TokenKind::Identifier,
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Identifier,
                TokenKind::Slash,
                TokenKind::Percent,
                TokenKind::StarStar,
                TokenKind::PlusEq,
                TokenKind::MinusEq,
                TokenKind::EqEqEq,
                TokenKind::BangEqEq,
                TokenKind::LtEq,
                TokenKind::GtEq,
                TokenKind::AmpAmp,
                TokenKind::PipePipe,
                TokenKind::QuestionQuestion,
                TokenKind::QuestionDot,
                TokenKind::GtGtGtEq,
                TokenKind::QuestionQuestionEq,
                TokenKind::DotDotDot,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_question_dot_before_digit() {
        assert_eq!(
            kinds("a?.5:1"),
            vec![
                TokenKind::Identifier,
                TokenKind::Question,
                TokenKind::NumberLiteral,
                TokenKind::Colon,
                TokenKind::NumberLiteral,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_regex_versus_division() {
        let tokens = Lexer::new("x = a / b; y = /[/]+\\//gi.test(s)").tokenize();

        assert_eq!(tokens[3].kind, TokenKind::Slash);
        assert_eq!(tokens[8].kind, TokenKind::RegexLiteral);
        assert_eq!(tokens[8].value, "/[/]+\\//gi");
        assert_eq!(tokens[9].kind, TokenKind::Dot);

        // `)` of a statement head and `}` of a block are followed by a regex
        let tokens = Lexer::new("if (x) /foo/.test(s);").tokenize();
        assert_eq!(tokens[4].kind, TokenKind::RegexLiteral);
        let tokens = Lexer::new("function f(){}\n/re/.test(s);").tokenize();
        assert_eq!(tokens[6].kind, TokenKind::RegexLiteral);
        let tokens = Lexer::new("for await (x of y) /z/.exec(x)").tokenize();
        assert_eq!(tokens[7].kind, TokenKind::RegexLiteral);
        let tokens = Lexer::new("{}\n/a/g.test(s)").tokenize();
        assert_eq!(tokens[2].kind, TokenKind::RegexLiteral);

        // ...while operands ending in `)` or `}` are divided
        assert_eq!(kinds("f(x) / 2 / 1")[4], TokenKind::Slash);
        assert_eq!(kinds("x = function(){} / 2 / 1")[7], TokenKind::Slash);
        assert_eq!(kinds("x = {} / 2 / 1")[4], TokenKind::Slash);
        assert_eq!(kinds("x = class {} / 2 / 1")[5], TokenKind::Slash);

        // Reserved words after `.` are property names
        let tokens = Lexer::new("a.return / 2 / 1").tokenize();
        assert_eq!(tokens[1].kind, TokenKind::Dot);
        assert_eq!(tokens[2].kind, TokenKind::Return);
        assert_eq!(tokens[3].kind, TokenKind::Slash);
        assert_eq!(tokens[5].kind, TokenKind::Slash);
        assert_eq!(kinds("a?.if / b")[3], TokenKind::Slash);
    }

    #[test]
    fn test_template_with_nested_substitutions() {
        let source = "`a ${ {b: `c${d}`}.b } e` + 1";
        let tokens = Lexer::new(source).tokenize();

        assert_eq!(tokens[0].kind, TokenKind::TemplateLiteral);
        assert_eq!(tokens[0].value, "`a ${ {b: `c${d}`}.b } e`");
        assert_eq!(tokens[1].kind, TokenKind::Plus);
    }

    #[test]
    fn test_template_nesting_limit() {
        let deep = format!("{}1{}", "`${".repeat(1000), "}`".repeat(1000));
        let tokens = Lexer::new(&deep).tokenize();
        assert_eq!(tokens[0].kind, TokenKind::Error);
        assert_eq!(tokens[0].value, "Template literals nested too deeply");

        let tokens = Lexer::new("`a ${ 'b } c`").tokenize();
        assert_eq!(tokens[0].kind, TokenKind::Error);
        assert_eq!(tokens[0].value, "Unterminated string literal");
    }

    #[test]
    fn test_split_template() {
        let raw = "`a${b}c${ {d: 1}.d }`";
        let parts = Lexer::split_template(raw);

        assert_eq!(parts.quasis, vec!["a", "c", ""]);
        assert_eq!(parts.substitutions, vec![(4, "b"), (9, " {d: 1}.d ")]);

        let plain = Lexer::split_template("`no \\${subs}`");
        assert_eq!(plain.quasis, vec!["no \\${subs}"]);
        assert!(plain.substitutions.is_empty());
    }

    #[test]
    fn test_comments_and_newlines() {
        let source = r#"
            // Single line comment
            let x = 5; /* inline */ x
            /* Multi-line
               comment */ const y = 10;
        "#;
        let tokens = Lexer::new(source).tokenize();

        assert_eq!(tokens[0].kind, TokenKind::Let);
        assert!(tokens[0].newline_before);
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert!(!tokens[1].newline_before);
        assert_eq!(tokens[5].kind, TokenKind::Identifier);
        assert!(!tokens[5].newline_before);
        assert_eq!(tokens[6].kind, TokenKind::Const);
        assert!(tokens[6].newline_before);
    }

    #[test]
    fn test_hashbang_and_private_names() {
        let tokens = Lexer::new("#!/usr/bin/env node\nthis.#count").tokenize();

        assert_eq!(tokens[0].kind, TokenKind::Hashbang);
        assert_eq!(tokens[0].value, "#!/usr/bin/env node");
        assert_eq!(tokens[1].kind, TokenKind::This);
        assert!(tokens[1].newline_before);
        assert_eq!(tokens[3].kind, TokenKind::Identifier);
        assert_eq!(tokens[3].value, "#count");
    }

    #[test]
    fn test_unexpected_character() {
        let tokens = Lexer::new("a @ b").tokenize();
        assert_eq!(tokens[1].kind, TokenKind::Error);
        assert_eq!(tokens[1].value, "Unexpected character: @");
        assert_eq!(tokens[1].span, Span::new(2, 3, 0));
    }
}
