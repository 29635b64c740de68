use crate::error::{log_sink, Diagnostic, DiagnosticKind, Origin, ParseError, Recovery};
use crate::utf8;
use crate::value::{Array, Object, Value};

/// A lexed token: either a complete value or a structural delimiter.
///
/// Delimiters travel through the same channel as values so the container
/// parsers can report them with a rendered form in the `<expected>@<actual>`
/// message convention.
enum Token {
    Node(Value),
    Delim(char),
    End,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Self::Node(v) => v.to_string(),
            Self::Delim(c) => c.to_string(),
            Self::End => "<eof>".to_owned(),
        }
    }
}

/// One-shot recursive-descent parser over a pull-based character source.
///
/// The parser owns its source and sink and is bound to a single input; it is
/// not reentrant. Malformed input never panics or returns an error — every
/// violation goes through the sink, which answers [`Recovery::Continue`]
/// (substitute/skip and keep going) or [`Recovery::Abort`] (force the source
/// to the end sentinel so all recursive frames unwind into a partial tree).
///
/// ```
/// use lenient_json::{Parser, Recovery, Value};
///
/// let mut parser = Parser::new("[1, 2] // trailing comment".chars(), |_d| Recovery::Continue);
/// assert_eq!(parser.parse(), Value::array([1, 2]));
/// ```
pub struct Parser<I, F>
where
    I: Iterator<Item = char>,
    F: FnMut(&Diagnostic) -> Recovery,
{
    source: I,
    cur: Option<char>,
    next: Option<char>,
    line: u32,
    col: u32,
    start_line: u32,
    start_col: u32,
    aborted: bool,
    sink: F,
}

impl<I, F> Parser<I, F>
where
    I: Iterator<Item = char>,
    F: FnMut(&Diagnostic) -> Recovery,
{
    pub fn new(source: I, sink: F) -> Self {
        let mut parser = Self {
            source,
            cur: None,
            next: None,
            line: 0,
            col: 0,
            start_line: 0,
            start_col: 0,
            aborted: false,
            sink,
        };
        parser.next = parser.source.next();
        parser.advance();
        parser
    }

    /// Whether a sink answered [`Recovery::Abort`] during parsing.
    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    /// Parses one document and stops without consuming trailing siblings.
    pub fn parse_one(&mut self) -> Value {
        match self.next_token() {
            Token::Node(v) => v,
            Token::Delim(c) => {
                self.report(
                    Origin::Delimiter,
                    DiagnosticKind::UnexpectedItem,
                    format!("<value>@{c}"),
                );
                Value::Null
            }
            Token::End => Value::Null,
        }
    }

    /// Parses the whole input. A single document comes back as-is; when more
    /// top-level values follow, the result is the sequence wrapped in an
    /// Array (stream-of-documents mode).
    pub fn parse(&mut self) -> Value {
        let first = match self.next_token() {
            Token::Node(v) => v,
            Token::Delim(c) => {
                self.report(
                    Origin::Delimiter,
                    DiagnosticKind::UnexpectedItem,
                    format!("<value>@{c}"),
                );
                Value::Null
            }
            Token::End => return Value::Null,
        };

        let mut tok = self.next_token();
        if matches!(tok, Token::End) {
            return first;
        }

        let mut docs = vec![first];
        loop {
            match tok {
                Token::End => break,
                Token::Node(v) => docs.push(v),
                Token::Delim(c) => self.report(
                    Origin::Delimiter,
                    DiagnosticKind::UnexpectedItem,
                    format!("<value>@{c}"),
                ),
            }
            tok = self.next_token();
        }
        Value::Array(docs)
    }

    /// Shifts the lookahead window by one character, tracking position.
    fn advance(&mut self) {
        if self.aborted {
            return;
        }
        self.cur = self.next.take();
        self.next = self.source.next();
        match self.cur {
            Some('\n') => {
                self.line += 1;
                self.col = 0;
            }
            Some(_) => self.col += 1,
            None => {}
        }
    }

    /// Records the position of the node about to be parsed; diagnostics
    /// carry the most recent mark.
    fn mark(&mut self) {
        self.start_line = self.line;
        self.start_col = self.col;
    }

    fn report(&mut self, origin: Origin, kind: DiagnosticKind, message: impl Into<String>) {
        if self.aborted {
            return;
        }
        let diagnostic = Diagnostic {
            line: self.start_line,
            column: self.start_col,
            origin,
            kind,
            message: message.into(),
        };
        if (self.sink)(&diagnostic) == Recovery::Abort {
            self.aborted = true;
            self.cur = None;
            self.next = None;
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.cur, Some(' ' | '\t' | '\r' | '\n')) {
            self.advance();
        }
    }

    /// Consumes a `//` or `/* */` comment. `cur` is the leading `/`.
    fn skip_comment(&mut self) {
        if self.next == Some('*') {
            self.advance();
            self.advance();
            loop {
                match self.cur {
                    None => {
                        self.report(Origin::Comment, DiagnosticKind::ItemNotClosed, "");
                        return;
                    }
                    Some('*') if self.next == Some('/') => {
                        self.advance();
                        self.advance();
                        return;
                    }
                    _ => self.advance(),
                }
            }
        } else {
            while let Some(c) = self.cur {
                self.advance();
                if c == '\n' {
                    break;
                }
            }
        }
    }

    /// Reads the next non-container token, skipping whitespace, comments and
    /// junk characters (each junk character is reported once).
    fn next_simple_token(&mut self) -> Token {
        loop {
            self.skip_whitespace();
            self.mark();
            let Some(c) = self.cur else {
                return Token::End;
            };
            match c {
                '/' => {
                    if matches!(self.next, Some('/' | '*')) {
                        self.skip_comment();
                    } else {
                        self.report(
                            Origin::Comment,
                            DiagnosticKind::UnexpectedItem,
                            "<comment>@/",
                        );
                        self.advance();
                    }
                }
                '"' => {
                    self.advance();
                    return Token::Node(self.parse_string());
                }
                ',' | ':' | '[' | ']' | '{' | '}' => {
                    self.advance();
                    return Token::Delim(c);
                }
                '0'..='9' | '-' | '+' => return Token::Node(self.parse_number()),
                c if c.is_ascii_alphabetic() => return Token::Node(self.parse_keyword()),
                other => {
                    self.report(
                        Origin::Delimiter,
                        DiagnosticKind::UnexpectedItem,
                        format!("<token>@{other}"),
                    );
                    self.advance();
                }
            }
            if self.aborted {
                return Token::End;
            }
        }
    }

    /// Like `next_simple_token`, but descends into `[` and `{`.
    fn next_token(&mut self) -> Token {
        let token = self.next_simple_token();
        self.promote(token)
    }

    /// Turns a container-opening delimiter into the parsed container.
    fn promote(&mut self, token: Token) -> Token {
        match token {
            Token::Delim('[') => Token::Node(self.parse_array()),
            Token::Delim('{') => Token::Node(self.parse_object()),
            t => t,
        }
    }

    fn parse_number(&mut self) -> Value {
        let mut buf = String::new();
        let mut is_float = false;

        if let Some(c @ ('-' | '+')) = self.cur {
            buf.push(c);
            self.advance();
        }
        while let Some(c @ '0'..='9') = self.cur {
            buf.push(c);
            self.advance();
        }
        if self.cur == Some('.') {
            is_float = true;
            buf.push('.');
            self.advance();
            while let Some(c @ '0'..='9') = self.cur {
                buf.push(c);
                self.advance();
            }
        }
        if let Some(c @ ('e' | 'E')) = self.cur {
            is_float = true;
            buf.push(c);
            self.advance();
            if let Some(s @ ('-' | '+')) = self.cur {
                buf.push(s);
                self.advance();
            }
            while let Some(c @ '0'..='9') = self.cur {
                buf.push(c);
                self.advance();
            }
        }

        if !is_float {
            if let Ok(n) = buf.parse::<i32>() {
                return Value::from(n);
            }
            if let Ok(n) = buf.parse::<i64>() {
                return Value::from(n);
            }
            // Integer overflow falls back to double.
        }
        match buf.parse::<f64>() {
            Ok(f) => Value::from(f),
            Err(_) => {
                self.report(
                    Origin::Delimiter,
                    DiagnosticKind::UnexpectedItem,
                    format!("<number>@{buf}"),
                );
                Value::Null
            }
        }
    }

    fn parse_keyword(&mut self) -> Value {
        let mut buf = String::new();
        while let Some(c) = self.cur {
            if c.is_ascii_alphanumeric() || c == '_' {
                buf.push(c);
                self.advance();
            } else {
                break;
            }
        }
        match buf.as_str() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            "null" => Value::Null,
            _ => {
                self.report(Origin::Keyword, DiagnosticKind::UnknownKeyword, buf);
                Value::Null
            }
        }
    }

    /// Parses string content; the opening quote is already consumed.
    fn parse_string(&mut self) -> Value {
        let mut buf = String::new();
        loop {
            self.mark();
            match self.cur {
                None => {
                    self.report(Origin::String, DiagnosticKind::ItemNotClosed, "");
                    break;
                }
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    match self.cur {
                        None => {
                            self.report(Origin::String, DiagnosticKind::ItemNotClosed, "");
                            break;
                        }
                        Some('u') => self.parse_unicode_escape(&mut buf),
                        Some(c) => {
                            match c {
                                'b' => buf.push('\u{8}'),
                                't' => buf.push('\t'),
                                'n' => buf.push('\n'),
                                'f' => buf.push('\u{c}'),
                                'r' => buf.push('\r'),
                                '"' => buf.push('"'),
                                '\\' => buf.push('\\'),
                                other => {
                                    self.report(
                                        Origin::String,
                                        DiagnosticKind::IllegalEscape,
                                        format!("\\{other}"),
                                    );
                                    buf.push(other);
                                }
                            }
                            self.advance();
                        }
                    }
                }
                Some(c) => {
                    buf.push(c);
                    self.advance();
                }
            }
        }
        Value::String(buf)
    }

    /// Reads the 4 hex digits after `\u`; `cur` ends on the last digit.
    fn read_hex4(&mut self) -> Option<u32> {
        let mut val = 0u32;
        let mut seen = String::from("\\u");
        for _ in 0..4 {
            self.advance();
            match self.cur {
                None => {
                    self.report(Origin::String, DiagnosticKind::ItemNotClosed, seen);
                    return None;
                }
                Some(c) => {
                    seen.push(c);
                    match c.to_digit(16) {
                        Some(d) => val = val * 16 | d,
                        None => {
                            self.report(Origin::Unicode, DiagnosticKind::IllegalEscape, seen);
                            return None;
                        }
                    }
                }
            }
        }
        Some(val)
    }

    /// Decodes a `\uXXXX` escape (`cur` is the `u`), combining a surrogate
    /// pair with an immediately following `\uXXXX` when present.
    fn parse_unicode_escape(&mut self, buf: &mut String) {
        let Some(hi) = self.read_hex4() else {
            self.advance();
            return;
        };
        self.advance();

        if (0xd800..0xdc00).contains(&hi) && self.cur == Some('\\') && self.next == Some('u') {
            self.advance();
            match self.read_hex4() {
                None => {
                    self.advance();
                    self.push_code_point(buf, hi);
                }
                Some(lo) if (0xdc00..0xe000).contains(&lo) => {
                    self.advance();
                    let cp = 0x1_0000 + ((hi - 0xd800) << 10) + (lo - 0xdc00);
                    self.push_code_point(buf, cp);
                }
                Some(lo) => {
                    self.advance();
                    self.push_code_point(buf, hi);
                    self.push_code_point(buf, lo);
                }
            }
        } else {
            self.push_code_point(buf, hi);
        }
    }

    /// Re-encodes `cp` through the UTF-8 codec into the string buffer.
    /// Unencodable code points and lone surrogates report
    /// `invalid_unicode_code`; the latter substitute U+FFFD since a Rust
    /// string cannot carry surrogate bytes.
    fn push_code_point(&mut self, buf: &mut String, cp: u32) {
        let mut bytes = [0u8; 4];
        let n = utf8::encode(&mut bytes, cp);
        if n == 0 {
            self.report(
                Origin::Unicode,
                DiagnosticKind::InvalidUnicodeCode,
                format!("\\u{cp:04x}"),
            );
            return;
        }
        match std::str::from_utf8(&bytes[..n]) {
            Ok(s) => buf.push_str(s),
            Err(_) => {
                self.report(
                    Origin::Unicode,
                    DiagnosticKind::InvalidUnicodeCode,
                    format!("\\u{cp:04x}"),
                );
                buf.push('\u{fffd}');
            }
        }
    }

    /// Parses array elements; the `[` is already consumed.
    fn parse_array(&mut self) -> Value {
        let mut arr = Array::new();
        let mut tok = self.next_token();
        loop {
            match tok {
                Token::End => {
                    if !self.aborted {
                        self.report(Origin::Array, DiagnosticKind::ItemNotClosed, "");
                    }
                    break;
                }
                Token::Delim(']') => break,
                Token::Delim(',') => {
                    self.report(Origin::Array, DiagnosticKind::UnexpectedItem, "<!delimiter>@,");
                    if self.aborted {
                        break;
                    }
                    arr.push(Value::Null);
                    tok = self.next_token();
                    continue;
                }
                Token::Delim(c) => {
                    self.report(
                        Origin::Array,
                        DiagnosticKind::UnexpectedItem,
                        format!("<!delimiter>@{c}"),
                    );
                    if self.aborted {
                        break;
                    }
                    arr.push(Value::Null);
                }
                Token::Node(v) => arr.push(v),
            }

            match self.next_simple_token() {
                Token::Delim(']') => break,
                Token::Delim(',') => tok = self.next_token(),
                Token::End => {
                    if !self.aborted {
                        self.report(Origin::Array, DiagnosticKind::ItemNotClosed, "");
                    }
                    break;
                }
                other => {
                    // Missing comma: report once and resume with the token
                    // as the next element.
                    self.report(
                        Origin::Array,
                        DiagnosticKind::UnexpectedItem,
                        format!("{{,}}@{}", other.describe()),
                    );
                    if self.aborted {
                        break;
                    }
                    tok = self.promote(other);
                }
            }
        }
        Value::Array(arr)
    }

    /// Parses object entries; the `{` is already consumed.
    fn parse_object(&mut self) -> Value {
        let mut obj = Object::new();
        let mut tok = self.next_simple_token();
        loop {
            let key = match tok {
                Token::End => {
                    if !self.aborted {
                        self.report(Origin::Object, DiagnosticKind::ItemNotClosed, "");
                    }
                    break;
                }
                Token::Delim('}') => break,
                Token::Node(Value::String(s)) => s,
                other => {
                    self.report(
                        Origin::Object,
                        DiagnosticKind::UnexpectedItem,
                        format!("<string>@{}", other.describe()),
                    );
                    if self.aborted {
                        break;
                    }
                    tok = self.next_simple_token();
                    continue;
                }
            };

            let val_tok = match self.next_simple_token() {
                Token::Delim(':') => self.next_token(),
                Token::End => {
                    if !self.aborted {
                        self.report(Origin::Object, DiagnosticKind::ItemNotClosed, "");
                    }
                    break;
                }
                other => {
                    // Missing colon: report once and treat the token as the
                    // value.
                    self.report(
                        Origin::Object,
                        DiagnosticKind::UnexpectedItem,
                        format!("{{:}}@{}", other.describe()),
                    );
                    if self.aborted {
                        break;
                    }
                    self.promote(other)
                }
            };

            match val_tok {
                Token::Node(v) => {
                    obj.insert(key, v);
                }
                Token::Delim('}') => {
                    self.report(Origin::Object, DiagnosticKind::UnexpectedItem, "<!delimiter>@}");
                    if self.aborted {
                        break;
                    }
                    obj.insert(key, Value::Null);
                    break;
                }
                Token::Delim(',') => {
                    self.report(Origin::Object, DiagnosticKind::UnexpectedItem, "<!delimiter>@,");
                    if self.aborted {
                        break;
                    }
                    obj.insert(key, Value::Null);
                    tok = self.next_simple_token();
                    continue;
                }
                Token::Delim(c) => {
                    self.report(
                        Origin::Object,
                        DiagnosticKind::UnexpectedItem,
                        format!("<!delimiter>@{c}"),
                    );
                    if self.aborted {
                        break;
                    }
                    obj.insert(key, Value::Null);
                }
                Token::End => {
                    if !self.aborted {
                        self.report(Origin::Object, DiagnosticKind::ItemNotClosed, "");
                        obj.insert(key, Value::Null);
                    }
                    break;
                }
            }

            match self.next_simple_token() {
                Token::Delim('}') => break,
                Token::Delim(',') => tok = self.next_simple_token(),
                Token::End => {
                    if !self.aborted {
                        self.report(Origin::Object, DiagnosticKind::ItemNotClosed, "");
                    }
                    break;
                }
                other => {
                    // Missing comma: report once and resume with the token
                    // as the next key.
                    self.report(
                        Origin::Object,
                        DiagnosticKind::UnexpectedItem,
                        format!("{{,}}@{}", other.describe()),
                    );
                    if self.aborted {
                        break;
                    }
                    tok = other;
                }
            }
        }
        Value::Object(obj)
    }
}

/// Parses `input` in stream-of-documents mode with the default stderr sink.
pub fn parse(input: &str) -> Value {
    Parser::new(input.chars(), log_sink).parse()
}

/// Parses a single document from `input` with the default stderr sink.
pub fn parse_one(input: &str) -> Value {
    Parser::new(input.chars(), log_sink).parse_one()
}

/// Parses `input` in stream-of-documents mode with a caller-supplied sink.
pub fn parse_with<F>(input: &str, sink: F) -> Value
where
    F: FnMut(&Diagnostic) -> Recovery,
{
    Parser::new(input.chars(), sink).parse()
}

/// Parses a single document with a caller-supplied sink.
pub fn parse_one_with<F>(input: &str, sink: F) -> Value
where
    F: FnMut(&Diagnostic) -> Recovery,
{
    Parser::new(input.chars(), sink).parse_one()
}

/// Parses a single document, turning the first diagnostic into an error.
pub fn try_parse(input: &str) -> Result<Value, ParseError> {
    let mut first: Option<Diagnostic> = None;
    let value = {
        let sink = |d: &Diagnostic| {
            if first.is_none() {
                first = Some(d.clone());
            }
            Recovery::Abort
        };
        Parser::new(input.chars(), sink).parse_one()
    };
    match first {
        Some(d) => Err(ParseError(d)),
        None => Ok(value),
    }
}

impl std::str::FromStr for Value {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        try_parse(s)
    }
}
