use std::fmt;

use crate::error::PointerError;
use crate::value::Value;

/// A JSON pointer (RFC 6901): a path of reference tokens addressing one
/// node inside a [`Value`] tree.
///
/// Tokens are stored unescaped; `~0`/`~1` escaping only exists in the text
/// form. Parsing is total: text that does not start with `/` addresses the
/// root.
///
/// ```
/// use lenient_json::{Pointer, Value};
///
/// let doc = Value::object([("a/b", Value::array([10, 20]))]);
/// let p = Pointer::parse("/a~1b/1");
/// assert_eq!(p.resolve(&doc), Ok(&Value::from(20)));
/// assert_eq!(p.to_string(), "/a~1b/1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Pointer {
    tokens: Vec<String>,
}

impl Pointer {
    /// The empty pointer, addressing the whole document.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn parse(text: &str) -> Self {
        match text.strip_prefix('/') {
            None => Self::root(),
            Some(rest) => Self {
                tokens: rest.split('/').map(unescape).collect(),
            },
        }
    }

    pub fn is_root(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The unescaped reference tokens, root first.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Appends a token in place.
    pub fn push(&mut self, token: impl Into<String>) {
        self.tokens.push(token.into());
    }

    /// Removes and returns the last token.
    pub fn pop(&mut self) -> Option<String> {
        self.tokens.pop()
    }

    pub fn last(&self) -> Option<&str> {
        self.tokens.last().map(String::as_str)
    }

    /// The pointer with the last token removed; the root's parent is the
    /// root itself.
    pub fn parent(&self) -> Self {
        let mut tokens = self.tokens.clone();
        tokens.pop();
        Self { tokens }
    }

    /// Returns a new pointer extended by one token.
    pub fn join(&self, token: impl Into<String>) -> Self {
        let mut child = self.clone();
        child.push(token);
        child
    }

    /// Strict lookup. Every token must address an existing node: keys must
    /// be present, indices must be in bounds, and `-` (one past the end)
    /// is out of bounds by definition.
    pub fn resolve<'a>(&self, root: &'a Value) -> Result<&'a Value, PointerError> {
        let mut cur = root;
        for token in &self.tokens {
            if cur.is_array() {
                let idx = array_index(token, cur.len())?;
                cur = cur.at(idx).map_err(PointerError::from)?;
            } else {
                cur = cur.at_key(token).map_err(PointerError::from)?;
            }
        }
        Ok(cur)
    }

    /// Lenient lookup for writing. Missing nodes are created on the way
    /// down: a numeric or `-` token turns a non-container into an array
    /// (padding with nulls up to the index, `-` appending one slot), any
    /// other token turns it into an object. An existing object is always
    /// addressed by key, digits included. The only failure is a
    /// non-numeric token landing on an array.
    pub fn resolve_mut<'a>(&self, root: &'a mut Value) -> Result<&'a mut Value, PointerError> {
        let mut cur = root;
        for token in &self.tokens {
            let numeric =
                token == "-" || (!token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()));
            if cur.is_array() || (numeric && !cur.is_object()) {
                if !numeric {
                    return Err(PointerError::InvalidIndex(token.clone()));
                }
                let arr = cur.array_mut();
                let idx = if token == "-" {
                    arr.len()
                } else {
                    token
                        .parse()
                        .map_err(|_| PointerError::InvalidIndex(token.clone()))?
                };
                if idx >= arr.len() {
                    arr.resize(idx + 1, Value::Null);
                }
                cur = &mut arr[idx];
            } else {
                cur = cur
                    .object_mut()
                    .entry(token.clone())
                    .or_insert(Value::Null);
            }
        }
        Ok(cur)
    }
}

fn array_index(token: &str, len: usize) -> Result<usize, PointerError> {
    if token == "-" {
        return Ok(len);
    }
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PointerError::InvalidIndex(token.to_owned()));
    }
    token
        .parse()
        .map_err(|_| PointerError::InvalidIndex(token.to_owned()))
}

/// Single left-to-right pass, so `~01` comes out as `~1` and not `/`.
fn unescape(token: &str) -> String {
    let mut out = String::with_capacity(token.len());
    let mut chars = token.chars();
    while let Some(c) = chars.next() {
        if c != '~' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('0') => out.push('~'),
            Some('1') => out.push('/'),
            Some(other) => {
                out.push('~');
                out.push(other);
            }
            None => out.push('~'),
        }
    }
    out
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            f.write_str("/")?;
            for c in token.chars() {
                match c {
                    '~' => f.write_str("~0")?,
                    '/' => f.write_str("~1")?,
                    c => write!(f, "{c}")?,
                }
            }
        }
        Ok(())
    }
}

impl From<&str> for Pointer {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}

impl<T: Into<String>> FromIterator<T> for Pointer {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AccessError;
    use pretty_assertions::assert_eq;

    fn sample() -> Value {
        Value::object([
            ("a/b", Value::from(1)),
            ("m~n", Value::from(2)),
            (
                "servers",
                Value::array([
                    Value::object([("port", 80)]),
                    Value::object([("port", 443)]),
                ]),
            ),
        ])
    }

    #[test]
    fn parse_unescapes_tokens() {
        assert_eq!(Pointer::parse("/a~1b").tokens(), ["a/b"]);
        assert_eq!(Pointer::parse("/m~0n").tokens(), ["m~n"]);
        assert_eq!(Pointer::parse("/~01").tokens(), ["~1"]);
        assert_eq!(Pointer::parse("/").tokens(), [""]);
        assert!(Pointer::parse("").is_root());
        assert!(Pointer::parse("no-slash").is_root());
    }

    #[test]
    fn display_round_trips() {
        for text in ["", "/", "/a~1b/m~0n", "/servers/0/port", "/~01"] {
            assert_eq!(Pointer::parse(text).to_string(), text);
        }
        // A root-addressing odd string normalizes to the empty form.
        assert_eq!(Pointer::parse("odd").to_string(), "");
    }

    #[test]
    fn navigation_ops() {
        let p: Pointer = ["servers", "0", "port"].into_iter().collect();
        assert_eq!(p.to_string(), "/servers/0/port");
        assert_eq!(p.last(), Some("port"));
        assert_eq!(p.parent().to_string(), "/servers/0");
        assert_eq!(p.parent().join("host").to_string(), "/servers/0/host");
        assert_eq!(Pointer::root().parent(), Pointer::root());
    }

    #[test]
    fn resolve_walks_the_tree() {
        let doc = sample();
        assert_eq!(Pointer::root().resolve(&doc), Ok(&doc));
        assert_eq!(
            Pointer::parse("/servers/1/port").resolve(&doc),
            Ok(&Value::from(443))
        );
        assert_eq!(Pointer::parse("/a~1b").resolve(&doc), Ok(&Value::from(1)));
    }

    #[test]
    fn resolve_is_strict() {
        let doc = sample();
        assert!(matches!(
            Pointer::parse("/missing").resolve(&doc),
            Err(PointerError::Access(AccessError::KeyNotFound { .. }))
        ));
        assert!(matches!(
            Pointer::parse("/servers/9").resolve(&doc),
            Err(PointerError::Access(AccessError::OutOfBounds { .. }))
        ));
        // "-" addresses one past the end, which never exists when reading.
        assert!(matches!(
            Pointer::parse("/servers/-").resolve(&doc),
            Err(PointerError::Access(AccessError::OutOfBounds { .. }))
        ));
        assert!(matches!(
            Pointer::parse("/servers/x").resolve(&doc),
            Err(PointerError::InvalidIndex(_))
        ));
        assert!(matches!(
            Pointer::parse("/a~1b/deeper").resolve(&doc),
            Err(PointerError::Access(AccessError::Context { .. }))
        ));
    }

    #[test]
    fn resolve_mut_builds_the_path() {
        let mut doc = Value::Null;
        *Pointer::parse("/servers/1/port").resolve_mut(&mut doc).unwrap() = 8080.into();
        let expected = Value::object([(
            "servers",
            Value::array([Value::Null, Value::object([("port", 8080)])]),
        )]);
        assert_eq!(doc, expected);
    }

    #[test]
    fn resolve_mut_appends_with_dash() {
        let mut doc = Value::array([1, 2]);
        *Pointer::parse("/-").resolve_mut(&mut doc).unwrap() = 3.into();
        assert_eq!(doc, Value::array([1, 2, 3]));
    }

    #[test]
    fn digit_tokens_key_into_existing_objects() {
        let mut doc = Value::object([("0", Value::from("zero"))]);
        assert_eq!(
            Pointer::parse("/0").resolve_mut(&mut doc).unwrap(),
            &Value::from("zero")
        );
    }

    #[test]
    fn resolve_mut_rejects_non_numeric_array_tokens() {
        let mut doc = Value::array([1]);
        assert!(matches!(
            Pointer::parse("/first").resolve_mut(&mut doc),
            Err(PointerError::InvalidIndex(_))
        ));
    }
}
