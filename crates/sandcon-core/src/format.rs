//! Text rendering of console entries.
//!
//! Formatted spans render as their text with one leading `[[` and one
//! trailing `]]` removed. Every other value renders as pretty JSON with
//! two-space indentation.

use std::io;

use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter};

use crate::types::LogEntry;
use crate::value::LogValue;

/// Render one data element.
pub fn format_value(value: &LogValue) -> String {
    if let Some(text) = value.as_span() {
        return strip_span_brackets(text).to_string();
    }
    let mut out = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut out, ConsoleFormatter::new());
    // writing into a Vec cannot fail and every key is a string
    if value.serialize(&mut ser).is_err() {
        return String::new();
    }
    String::from_utf8(out).unwrap_or_default()
}

/// Render an entry's data elements joined by a single space.
pub fn format_entry(entry: &LogEntry) -> String {
    entry
        .data
        .iter()
        .map(format_value)
        .collect::<Vec<_>>()
        .join(" ")
}

fn strip_span_brackets(text: &str) -> &str {
    let text = text.strip_prefix("[[").unwrap_or(text);
    text.strip_suffix("]]").unwrap_or(text)
}

/// Two-space pretty printing with numbers written the way a browser
/// console's `JSON.stringify` writes them.
struct ConsoleFormatter<'a>(PrettyFormatter<'a>);

impl ConsoleFormatter<'_> {
    fn new() -> Self {
        Self(PrettyFormatter::with_indent(b"  "))
    }
}

impl Formatter for ConsoleFormatter<'_> {
    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_array(writer)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.0.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_object(writer)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.0.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object_value(writer)
    }

    fn write_f64<W: ?Sized + io::Write>(&mut self, writer: &mut W, value: f64) -> io::Result<()> {
        writer.write_all(js_number(value).as_bytes())
    }
}

/// Plain decimal inside `[1e-6, 1e21)`, exponent form outside it, integral
/// values without a fraction, `-0` as `0`.
fn js_number(n: f64) -> String {
    if !n.is_finite() {
        return "null".to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    if (1e-6..1e21).contains(&n.abs()) {
        return n.to_string();
    }
    let exp = format!("{n:e}");
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
        _ => exp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LogMethod;
    use serde_json::json;

    fn v(value: serde_json::Value) -> LogValue {
        LogValue::from(value)
    }

    #[test]
    fn strings_render_quoted() {
        assert_eq!(format_value(&v(json!("hello"))), "\"hello\"");
        assert_eq!(format_value(&v(json!("a\"b\n"))), r#""a\"b\n""#);
    }

    #[test]
    fn numbers_render_like_json() {
        assert_eq!(format_value(&v(json!(1))), "1");
        assert_eq!(format_value(&v(json!(1.5))), "1.5");
        assert_eq!(format_value(&LogValue::Number(-0.0)), "0");
        assert_eq!(format_value(&LogValue::Number(f64::NAN)), "null");
        assert_eq!(format_value(&v(json!(-42))), "-42");
    }

    #[test]
    fn extreme_magnitudes_use_exponent_form() {
        assert_eq!(format_value(&LogValue::Number(1e21)), "1e+21");
        assert_eq!(format_value(&LogValue::Number(-2.5e22)), "-2.5e+22");
        assert_eq!(format_value(&LogValue::Number(1e-7)), "1e-7");
        assert_eq!(format_value(&LogValue::Number(1.5e-7)), "1.5e-7");
        assert_eq!(format_value(&LogValue::Number(1e20)), "100000000000000000000");
        assert_eq!(format_value(&LogValue::Number(0.000001)), "0.000001");
    }

    #[test]
    fn numbers_inside_structures_use_the_same_rules() {
        let value = LogValue::Array(vec![LogValue::Number(1e21), LogValue::Number(2.0)]);
        assert_eq!(format_value(&value), "[\n  1e+21,\n  2\n]");
    }

    #[test]
    fn primitives_render_inline() {
        assert_eq!(format_value(&LogValue::Null), "null");
        assert_eq!(format_value(&v(json!(true))), "true");
        assert_eq!(format_value(&v(json!([]))), "[]");
        assert_eq!(format_value(&v(json!({}))), "{}");
    }

    #[test]
    fn nested_values_render_multiline() {
        let value = v(json!({"name": "x", "tags": [1, 2], "empty": {}}));
        let expected = "{\n  \"name\": \"x\",\n  \"tags\": [\n    1,\n    2\n  ],\n  \"empty\": {}\n}";
        assert_eq!(format_value(&value), expected);
    }

    #[test]
    fn spans_strip_outer_brackets() {
        assert_eq!(format_value(&LogValue::span("[[undefined]]")), "undefined");
        assert_eq!(format_value(&LogValue::span("[[[nested]]]")), "[nested]");
        assert_eq!(format_value(&LogValue::span("plain")), "plain");
        assert_eq!(format_value(&LogValue::span("[[open")), "open");
    }

    #[test]
    fn spans_inside_structures_render_as_objects() {
        let value = LogValue::Array(vec![LogValue::span("[[undefined]]")]);
        assert_eq!(
            format_value(&value),
            "[\n  {\n    \"@t\": \"[[undefined]]\"\n  }\n]"
        );
    }

    #[test]
    fn entry_elements_join_with_single_space() {
        let entry = LogEntry::new(
            "1",
            LogMethod::Log,
            vec![v(json!("count")), v(json!(3)), LogValue::span("[[Function foo]]")],
        );
        assert_eq!(format_entry(&entry), "\"count\" 3 Function foo");
    }
}
