//! Text functions

use super::number_arg;
use sheetcalc_core::{ErrorKind, Value};

fn text_arg(args: &[Value], index: usize) -> Result<String, ErrorKind> {
    args.get(index).ok_or(ErrorKind::NotAvailable)?.to_text()
}

/// CONCATENATE(text1, [text2], ...)
///
/// Range arguments contribute every element in column-major order.
pub fn fn_concatenate(args: &[Value]) -> Result<Value, ErrorKind> {
    let mut out = String::new();
    for arg in args {
        match arg {
            Value::Array(items) => {
                for item in items {
                    out.push_str(&item.to_text()?);
                }
            }
            scalar => out.push_str(&scalar.to_text()?),
        }
    }
    Ok(Value::Text(out))
}

/// EXACT(text1, text2) - Case-sensitive comparison
pub fn fn_exact(args: &[Value]) -> Result<Value, ErrorKind> {
    Ok(Value::Boolean(text_arg(args, 0)? == text_arg(args, 1)?))
}

/// CHAR(number) - The character with the given code point
///
/// Accepts the full Unicode range rather than a single code page.
pub fn fn_char(args: &[Value]) -> Result<Value, ErrorKind> {
    let number = number_arg(args, 0)?.trunc();
    if !(1.0..=u32::MAX as f64).contains(&number) {
        return Err(ErrorKind::Value);
    }

    char::from_u32(number as u32)
        .map(|c| Value::Text(c.to_string()))
        .ok_or(ErrorKind::Value)
}

/// CODE(text) - Code point of the first character
pub fn fn_code(args: &[Value]) -> Result<Value, ErrorKind> {
    let text = text_arg(args, 0)?;
    let first = text.chars().next().ok_or(ErrorKind::Value)?;
    Ok(Value::Number(u32::from(first) as f64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn t(s: &str) -> Value {
        Value::text(s)
    }

    #[test]
    fn test_concatenate() {
        assert_eq!(
            fn_concatenate(&[t("a"), Value::Number(1.0), Value::Boolean(true)]),
            Ok(t("a1TRUE"))
        );
        let range = Value::Array(vec![t("x"), Value::Null, t("y")]);
        assert_eq!(fn_concatenate(&[range, t("!")]), Ok(t("xy!")));
    }

    #[test]
    fn test_exact_is_case_sensitive() {
        assert_eq!(fn_exact(&[t("Word"), t("Word")]), Ok(Value::Boolean(true)));
        assert_eq!(fn_exact(&[t("Word"), t("word")]), Ok(Value::Boolean(false)));
        assert_eq!(
            fn_exact(&[Value::Number(1.5), t("1.5")]),
            Ok(Value::Boolean(true))
        );
    }

    #[test]
    fn test_char_and_code() {
        assert_eq!(fn_char(&[Value::Number(65.0)]), Ok(t("A")));
        assert_eq!(fn_char(&[Value::Number(0.0)]), Err(ErrorKind::Value));
        assert_eq!(fn_char(&[Value::Number(-5.0)]), Err(ErrorKind::Value));
        assert_eq!(fn_code(&[t("abc")]), Ok(Value::Number(97.0)));
        assert_eq!(fn_code(&[t("")]), Err(ErrorKind::Value));
    }
}
