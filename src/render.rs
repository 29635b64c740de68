use std::fmt::{self, Write};

use crate::utf8;
use crate::value::{Number, Value};

/// Controls how [`Value::render`] lays out its output.
///
/// The default renders with 4-space indentation and escapes everything
/// outside ASCII. An `indent` of 0 selects the fully compact single-line
/// form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Pad characters per nesting level; 0 means compact output.
    pub indent: usize,
    /// The pad character, usually `' '` or `'\t'`.
    pub pad: char,
    /// Escape every non-ASCII character as `\uXXXX` (surrogate pairs above
    /// the basic plane) so the output survives legacy transports.
    pub ascii_only: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            indent: 4,
            pad: ' ',
            ascii_only: true,
        }
    }
}

impl RenderOptions {
    /// Single-line output with no padding.
    pub fn compact() -> Self {
        Self {
            indent: 0,
            ..Self::default()
        }
    }
}

impl Value {
    /// Renders the value as JSON text, without a trailing newline.
    pub fn render(&self, options: &RenderOptions) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = write_value(&mut out, self, options, 0);
        out
    }
}

/// The compact rendering. Parser diagnostics lean on this to describe
/// offending nodes.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(f, self, &RenderOptions::compact(), 0)
    }
}

fn write_value<W: Write>(
    out: &mut W,
    value: &Value,
    options: &RenderOptions,
    depth: usize,
) -> fmt::Result {
    match value {
        Value::Null => out.write_str("null"),
        Value::Bool(b) => out.write_str(if *b { "true" } else { "false" }),
        Value::Number(n) => write_number(out, *n),
        Value::String(s) => write_quoted(out, s, options),
        Value::Array(arr) => write_array(out, arr, options, depth),
        Value::Object(obj) => write_object(out, obj, options, depth),
    }
}

fn write_number<W: Write>(out: &mut W, number: Number) -> fmt::Result {
    match number {
        Number::I32(n) => write!(out, "{n}"),
        Number::U32(n) => write!(out, "{n}"),
        Number::I64(n) => write!(out, "{n}"),
        Number::U64(n) => write!(out, "{n}"),
        Number::F64(f) => {
            if !f.is_finite() {
                return out.write_str("null");
            }
            let repr = f.to_string();
            out.write_str(&repr)?;
            // Keep whole doubles re-parsable as doubles.
            if !repr.contains(['.', 'e', 'E']) {
                out.write_str(".0")?;
            }
            Ok(())
        }
    }
}

fn write_quoted<W: Write>(out: &mut W, s: &str, options: &RenderOptions) -> fmt::Result {
    out.write_char('"')?;
    for c in s.chars() {
        match c {
            '"' => out.write_str("\\\"")?,
            '\\' => out.write_str("\\\\")?,
            '\u{8}' => out.write_str("\\b")?,
            '\t' => out.write_str("\\t")?,
            '\n' => out.write_str("\\n")?,
            '\u{c}' => out.write_str("\\f")?,
            '\r' => out.write_str("\\r")?,
            c if (c as u32) < 0x20 => write!(out, "\\u{:04x}", c as u32)?,
            c if options.ascii_only && !c.is_ascii() => {
                let u = c as u32;
                if utf8::encoded_len(u) == 4 {
                    // Above the basic plane: emit a surrogate pair.
                    let high = 0xd7c0 + (u >> 10);
                    let low = 0xdc00 + (u & 0x3ff);
                    write!(out, "\\u{high:04x}\\u{low:04x}")?;
                } else {
                    write!(out, "\\u{u:04x}")?;
                }
            }
            c => out.write_char(c)?,
        }
    }
    out.write_char('"')
}

fn write_pad<W: Write>(out: &mut W, options: &RenderOptions, depth: usize) -> fmt::Result {
    for _ in 0..depth * options.indent {
        out.write_char(options.pad)?;
    }
    Ok(())
}

fn write_array<W: Write>(
    out: &mut W,
    arr: &[Value],
    options: &RenderOptions,
    depth: usize,
) -> fmt::Result {
    if arr.is_empty() {
        return out.write_str("[]");
    }
    // A lone scalar stays inline even in formatted mode.
    let inline = options.indent == 0 || (arr.len() == 1 && arr[0].is_scalar());
    if inline {
        out.write_char('[')?;
        for (i, item) in arr.iter().enumerate() {
            if i > 0 {
                out.write_char(',')?;
            }
            write_value(out, item, options, depth)?;
        }
        return out.write_char(']');
    }

    out.write_str("[\n")?;
    for (i, item) in arr.iter().enumerate() {
        if i > 0 {
            out.write_str(",\n")?;
        }
        write_pad(out, options, depth + 1)?;
        write_value(out, item, options, depth + 1)?;
    }
    out.write_char('\n')?;
    write_pad(out, options, depth)?;
    out.write_char(']')
}

fn write_object<W: Write>(
    out: &mut W,
    obj: &std::collections::BTreeMap<String, Value>,
    options: &RenderOptions,
    depth: usize,
) -> fmt::Result {
    if obj.is_empty() {
        return out.write_str("{}");
    }
    let colon = if options.indent == 0 { ":" } else { ": " };
    // A single scalar entry stays inline even in formatted mode.
    let inline = options.indent == 0 || (obj.len() == 1 && obj.values().all(Value::is_scalar));
    if inline {
        out.write_char('{')?;
        for (i, (key, item)) in obj.iter().enumerate() {
            if i > 0 {
                out.write_char(',')?;
            }
            write_quoted(out, key, options)?;
            out.write_str(colon)?;
            write_value(out, item, options, depth)?;
        }
        return out.write_char('}');
    }

    out.write_str("{\n")?;
    for (i, (key, item)) in obj.iter().enumerate() {
        if i > 0 {
            out.write_str(",\n")?;
        }
        write_pad(out, options, depth + 1)?;
        write_quoted(out, key, options)?;
        out.write_str(colon)?;
        write_value(out, item, options, depth + 1)?;
    }
    out.write_char('\n')?;
    write_pad(out, options, depth)?;
    out.write_char('}')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn compact_scalars() {
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::from(-12).to_string(), "-12");
        assert_eq!(Value::from("hi").to_string(), "\"hi\"");
    }

    #[test]
    fn doubles_stay_doubles() {
        assert_eq!(Value::from(2.0).to_string(), "2.0");
        assert_eq!(Value::from(2.5).to_string(), "2.5");
        assert_eq!(
            Value::from(1e30).to_string(),
            "1000000000000000000000000000000.0"
        );
        assert_eq!(Value::from(f64::NAN).to_string(), "null");
        assert_eq!(Value::from(f64::INFINITY).to_string(), "null");
    }

    #[test]
    fn compact_containers() {
        let v = Value::object([
            ("a", Value::array([1, 2])),
            ("b", Value::from("x")),
        ]);
        assert_eq!(v.to_string(), r#"{"a":[1,2],"b":"x"}"#);
        assert_eq!(Value::Array(Vec::new()).to_string(), "[]");
        assert_eq!(Value::object([] as [(&str, Value); 0]).to_string(), "{}");
    }

    #[test]
    fn formatted_output() {
        let v = Value::object([
            ("list", Value::array([1, 2])),
            ("name", Value::from("box")),
        ]);
        let expected = "{\n    \"list\": [\n        1,\n        2\n    ],\n    \"name\": \"box\"\n}";
        assert_eq!(v.render(&RenderOptions::default()), expected);
    }

    #[test]
    fn singletons_stay_inline() {
        let v = Value::array([Value::object([("port", 80)])]);
        let expected = "[\n    {\"port\": 80}\n]";
        assert_eq!(v.render(&RenderOptions::default()), expected);
        assert_eq!(Value::array([5]).render(&RenderOptions::default()), "[5]");
    }

    #[test]
    fn control_and_quote_escapes() {
        let v = Value::from("a\"b\\c\n\t\u{1}");
        assert_eq!(v.to_string(), r#""a\"b\\c\n\t\u0001""#);
    }

    #[test]
    fn ascii_only_escapes_non_ascii() {
        let v = Value::from("héllo \u{1f600}");
        // The default escapes everything outside ASCII, pairing above U+FFFF.
        assert_eq!(v.to_string(), r#""h\u00e9llo \ud83d\ude00""#);
        assert_eq!(
            Value::object([("k", "日本語")]).to_string(),
            r#"{"k":"\u65e5\u672c\u8a9e"}"#
        );
        let opts = RenderOptions {
            ascii_only: false,
            ..RenderOptions::compact()
        };
        assert_eq!(v.render(&opts), "\"héllo \u{1f600}\"");
    }

    #[test]
    fn tab_padding() {
        let opts = RenderOptions {
            indent: 1,
            pad: '\t',
            ..RenderOptions::default()
        };
        let v = Value::array([Value::array([1, 2])]);
        assert_eq!(v.render(&opts), "[\n\t[\n\t\t1,\n\t\t2\n\t]\n]");
    }
}
