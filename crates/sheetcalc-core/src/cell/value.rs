//! Cell value types

use super::error::ErrorKind;
use std::fmt;

/// A computed cell value
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    /// No value
    #[default]
    Null,
    /// Numeric value
    Number(f64),
    /// Text value
    Text(String),
    /// Boolean value (TRUE/FALSE)
    Boolean(bool),
    /// Serial date number (days since 1899-12-30)
    Date(f64),
    /// Flat list of values, as produced by a range reference (column-major)
    Array(Vec<Value>),
}

impl Value {
    /// Create a text value
    pub fn text<S: Into<String>>(s: S) -> Self {
        Value::Text(s.into())
    }

    /// Interpret raw cell input that is not a formula.
    ///
    /// Empty input is `Null`, numeric text becomes a number, anything else
    /// is kept as text.
    pub fn from_input(input: &str) -> Self {
        if input.trim().is_empty() {
            return Value::Null;
        }
        match parse_numeric(input) {
            Some(n) => Value::Number(n),
            None => Value::Text(input.to_string()),
        }
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if the value is a number or a date
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_) | Value::Date(_))
    }

    /// Best-effort coercion: numeric text becomes a number, everything
    /// else is returned unchanged.
    pub fn coerce(self) -> Value {
        match self {
            Value::Text(ref s) => match parse_numeric(s) {
                Some(n) => Value::Number(n),
                None => self,
            },
            other => other,
        }
    }

    /// Mandatory numeric coercion, as used by arithmetic.
    ///
    /// Booleans become 1/0 and null becomes 0. Text must parse as a number,
    /// otherwise the result is [`ErrorKind::Value`].
    pub fn to_number(&self) -> Result<f64, ErrorKind> {
        match self {
            Value::Null => Ok(0.0),
            Value::Number(n) | Value::Date(n) => Ok(*n),
            Value::Boolean(b) => Ok(if *b { 1.0 } else { 0.0 }),
            Value::Text(s) => parse_numeric(s).ok_or(ErrorKind::Value),
            Value::Array(_) => Err(ErrorKind::Value),
        }
    }

    /// Convert to a boolean for logical functions
    pub fn to_bool(&self) -> Result<bool, ErrorKind> {
        match self {
            Value::Null => Ok(false),
            Value::Boolean(b) => Ok(*b),
            Value::Number(n) | Value::Date(n) => Ok(*n != 0.0),
            Value::Text(s) if s.eq_ignore_ascii_case("TRUE") => Ok(true),
            Value::Text(s) if s.eq_ignore_ascii_case("FALSE") => Ok(false),
            Value::Text(_) | Value::Array(_) => Err(ErrorKind::Value),
        }
    }

    /// Render the value as text for concatenation
    pub fn to_text(&self) -> Result<String, ErrorKind> {
        match self {
            Value::Null => Ok(String::new()),
            Value::Number(n) | Value::Date(n) => Ok(format_number(*n)),
            Value::Text(s) => Ok(s.clone()),
            Value::Boolean(b) => Ok(if *b { "TRUE" } else { "FALSE" }.to_string()),
            Value::Array(_) => Err(ErrorKind::Value),
        }
    }

    /// Get the type name for log messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Number(_) => "number",
            Value::Text(_) => "text",
            Value::Boolean(_) => "boolean",
            Value::Date(_) => "date",
            Value::Array(_) => "array",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Array(items) => {
                write!(f, "{{")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "}}")
            }
            Value::Null => Ok(()),
            Value::Number(n) | Value::Date(n) => write!(f, "{}", format_number(*n)),
            Value::Text(s) => write!(f, "{}", s),
            Value::Boolean(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::text(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// Parse numeric text.
///
/// Text containing a `.` is read as a float, anything else as an integer
/// (with a float fallback so exponent forms such as `1e3` still parse).
/// Spellings like `inf` or `NaN` are not numbers here, and neither is
/// anything that overflows to infinity.
pub fn parse_numeric(s: &str) -> Option<f64> {
    let s = s.trim();
    if !s.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    if !s
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'+' | b'-' | b'e' | b'E'))
    {
        return None;
    }

    let n = if s.contains('.') {
        s.parse::<f64>().ok()
    } else {
        match s.parse::<i64>() {
            Ok(n) => Some(n as f64),
            Err(_) => s.parse::<f64>().ok(),
        }
    };
    n.filter(|n| n.is_finite())
}

fn format_number(n: f64) -> String {
    if n == 0.0 {
        // Avoid printing negative zero
        "0".to_string()
    } else {
        n.to_string()
    }
}
