use crate::value::Kind;
use std::fmt;

/// Where in the grammar a diagnostic was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Comment,
    String,
    Unicode,
    Keyword,
    Delimiter,
    Array,
    Object,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Comment => "parse_comment",
            Self::String => "parse_string",
            Self::Unicode => "parse_unicode",
            Self::Keyword => "parse_keyword",
            Self::Delimiter => "parse_delimiter",
            Self::Array => "parse_array",
            Self::Object => "parse_object",
        })
    }
}

/// What went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A comment, string, array or object ran into the end of input.
    ItemNotClosed,
    /// A `\x` or `\u` escape that does not follow the escape grammar.
    IllegalEscape,
    /// A code point that cannot be encoded, or an unpairable surrogate.
    InvalidUnicodeCode,
    /// An identifier run that is not `true`, `false` or `null`.
    UnknownKeyword,
    /// Any other unexpected token. The message reads `<expected>@<actual>`.
    UnexpectedItem,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ItemNotClosed => "item_not_closed",
            Self::IllegalEscape => "illegal_escape",
            Self::InvalidUnicodeCode => "invalid_unicode_code",
            Self::UnknownKeyword => "unknown_keyword",
            Self::UnexpectedItem => "unexpected_item",
        })
    }
}

/// A single parse report, handed to the diagnostic sink.
///
/// `line` and `column` are zero-based and point at the start of the node that
/// was being parsed when the violation was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: u32,
    pub column: u32,
    pub origin: Origin,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}: {}",
            self.line, self.column, self.origin, self.kind
        )?;
        if !self.message.is_empty() {
            write!(f, " {}", self.message)?;
        }
        Ok(())
    }
}

/// Sink decision: keep going with a best-effort substitute, or stop.
///
/// `Abort` forces the parser's input to the end sentinel so every recursive
/// frame unwinds as if the document had ended, producing a partial tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    Continue,
    Abort,
}

/// Default sink: renders the diagnostic to stderr and keeps parsing.
pub fn log_sink(diagnostic: &Diagnostic) -> Recovery {
    eprintln!("lenient_json: {diagnostic}");
    Recovery::Continue
}

/// Returned by [`crate::try_parse`] when the input produced a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ParseError(pub Diagnostic);

/// A strict-access contract violation on the [`crate::Value`] API.
///
/// These are programmer-visible errors, never produced by lenient access.
/// `context` chains errors across operation boundaries; the causal trail is
/// preserved in the message with a `> ` prefix per level.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AccessError {
    #[error("{op}: expected {expected}, found {found}")]
    TypeMismatch {
        op: &'static str,
        expected: Kind,
        found: Kind,
    },
    #[error("{op}: index {index} out of bounds (len {len})")]
    OutOfBounds {
        op: &'static str,
        index: usize,
        len: usize,
    },
    #[error("{op}: key {key:?} not found")]
    KeyNotFound { op: &'static str, key: String },
    #[error("{op} failed\n  > {source}")]
    Context {
        op: &'static str,
        #[source]
        source: Box<AccessError>,
    },
}

impl AccessError {
    /// Wraps `self` with the name of the operation that observed it.
    #[must_use]
    pub fn context(self, op: &'static str) -> Self {
        Self::Context {
            op,
            source: Box::new(self),
        }
    }
}

/// Pointer resolution failure.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PointerError {
    #[error("invalid array index {0:?}")]
    InvalidIndex(String),
    #[error(transparent)]
    Access(#[from] AccessError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_display() {
        let d = Diagnostic {
            line: 2,
            column: 7,
            origin: Origin::Object,
            kind: DiagnosticKind::UnexpectedItem,
            message: "<string>@1".into(),
        };
        assert_eq!(
            d.to_string(),
            "2:7: parse_object: unexpected_item <string>@1"
        );
    }

    #[test]
    fn access_error_chain_keeps_cause() {
        let inner = AccessError::TypeMismatch {
            op: "try_array",
            expected: Kind::Array,
            found: Kind::I32,
        };
        let wrapped = inner.context("resolve");
        assert_eq!(
            wrapped.to_string(),
            "resolve failed\n  > try_array: expected array, found number.int32"
        );
    }
}
