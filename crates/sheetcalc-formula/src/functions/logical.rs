//! Logical functions

use super::number_arg;
use sheetcalc_core::{ErrorKind, Value};

/// IF(condition, value_if_true, [value_if_false])
///
/// Both branches are already evaluated; a missing else branch is FALSE.
pub fn fn_if(args: &[Value]) -> Result<Value, ErrorKind> {
    let condition = args.first().ok_or(ErrorKind::NotAvailable)?.to_bool()?;
    let if_true = args.get(1).ok_or(ErrorKind::NotAvailable)?;

    if condition {
        Ok(if_true.clone())
    } else {
        Ok(args.get(2).cloned().unwrap_or(Value::Boolean(false)))
    }
}

/// Truth values of the arguments.
///
/// Scalars must convert to a boolean. Inside arrays, text and nulls are
/// skipped. No truth values at all is `#VALUE!`.
fn truth_values(args: &[Value]) -> Result<Vec<bool>, ErrorKind> {
    let mut values = Vec::with_capacity(args.len());

    for arg in args {
        match arg {
            Value::Array(items) => {
                for item in items {
                    match item {
                        Value::Text(_) | Value::Null => {}
                        other => values.push(other.to_bool()?),
                    }
                }
            }
            Value::Null => {}
            scalar => values.push(scalar.to_bool()?),
        }
    }

    if values.is_empty() {
        return Err(ErrorKind::Value);
    }
    Ok(values)
}

/// AND(logical1, ...)
pub fn fn_and(args: &[Value]) -> Result<Value, ErrorKind> {
    Ok(Value::Boolean(truth_values(args)?.into_iter().all(|b| b)))
}

/// OR(logical1, ...)
pub fn fn_or(args: &[Value]) -> Result<Value, ErrorKind> {
    Ok(Value::Boolean(truth_values(args)?.into_iter().any(|b| b)))
}

/// XOR(logical1, ...) - TRUE when an odd number of arguments are TRUE
pub fn fn_xor(args: &[Value]) -> Result<Value, ErrorKind> {
    let count = truth_values(args)?.into_iter().filter(|b| *b).count();
    Ok(Value::Boolean(count % 2 == 1))
}

/// NOT(logical)
pub fn fn_not(args: &[Value]) -> Result<Value, ErrorKind> {
    let value = args.first().ok_or(ErrorKind::NotAvailable)?;
    Ok(Value::Boolean(!value.to_bool()?))
}

/// TRUE()
pub fn fn_true(_args: &[Value]) -> Result<Value, ErrorKind> {
    Ok(Value::Boolean(true))
}

/// FALSE()
pub fn fn_false(_args: &[Value]) -> Result<Value, ErrorKind> {
    Ok(Value::Boolean(false))
}

fn is_even(args: &[Value]) -> Result<bool, ErrorKind> {
    Ok(number_arg(args, 0)?.trunc() % 2.0 == 0.0)
}

/// ISEVEN(number) - the fractional part is ignored
pub fn fn_iseven(args: &[Value]) -> Result<Value, ErrorKind> {
    Ok(Value::Boolean(is_even(args)?))
}

/// ISODD(number)
pub fn fn_isodd(args: &[Value]) -> Result<Value, ErrorKind> {
    Ok(Value::Boolean(!is_even(args)?))
}
