//! Math functions

use super::criteria::CriteriaMatcher;
use super::{collect_numbers, finite, items, number_arg, optional_number_arg};
use sheetcalc_core::{ErrorKind, Value};

/// SUM(number1, ...)
pub fn fn_sum(args: &[Value]) -> Result<Value, ErrorKind> {
    finite(collect_numbers(args)?.iter().sum())
}

/// AVERAGE(number1, ...) - #DIV/0! when there is nothing to average
pub fn fn_average(args: &[Value]) -> Result<Value, ErrorKind> {
    let numbers = collect_numbers(args)?;
    if numbers.is_empty() {
        return Err(ErrorKind::DivZero);
    }
    finite(numbers.iter().sum::<f64>() / numbers.len() as f64)
}

/// MIN(number1, ...) - 0 when there are no numbers
pub fn fn_min(args: &[Value]) -> Result<Value, ErrorKind> {
    let min = collect_numbers(args)?.into_iter().reduce(f64::min);
    Ok(Value::Number(min.unwrap_or(0.0)))
}

/// MAX(number1, ...) - 0 when there are no numbers
pub fn fn_max(args: &[Value]) -> Result<Value, ErrorKind> {
    let max = collect_numbers(args)?.into_iter().reduce(f64::max);
    Ok(Value::Number(max.unwrap_or(0.0)))
}

/// COUNT(value1, ...) - counts numbers; never fails on text
pub fn fn_count(args: &[Value]) -> Result<Value, ErrorKind> {
    let count = args
        .iter()
        .map(|arg| match arg {
            Value::Array(items) => items.iter().filter(|v| v.is_number()).count(),
            Value::Number(_) | Value::Date(_) | Value::Boolean(_) => 1,
            Value::Text(s) => usize::from(sheetcalc_core::parse_numeric(s).is_some()),
            Value::Null => 0,
        })
        .sum::<usize>();

    Ok(Value::Number(count as f64))
}

/// MEDIAN(number1, ...) - #NUM! when there are no numbers
pub fn fn_median(args: &[Value]) -> Result<Value, ErrorKind> {
    let mut numbers = collect_numbers(args)?;
    if numbers.is_empty() {
        return Err(ErrorKind::Num);
    }

    numbers.sort_by(f64::total_cmp);
    let mid = numbers.len() / 2;
    let median = if numbers.len() % 2 == 0 {
        (numbers[mid - 1] + numbers[mid]) / 2.0
    } else {
        numbers[mid]
    };

    Ok(Value::Number(median))
}

/// SUMSQ(number1, ...)
pub fn fn_sumsq(args: &[Value]) -> Result<Value, ErrorKind> {
    finite(collect_numbers(args)?.iter().map(|n| n * n).sum())
}

/// SUMPRODUCT(array1, [array2], ...)
///
/// All arrays must have the same number of elements. Non-numeric
/// elements count as 0.
pub fn fn_sumproduct(args: &[Value]) -> Result<Value, ErrorKind> {
    let len = items(args.first().ok_or(ErrorKind::NotAvailable)?).len();
    if args.iter().any(|arg| items(arg).len() != len) {
        return Err(ErrorKind::Value);
    }

    let mut products = vec![1.0; len];
    for arg in args {
        for (product, value) in products.iter_mut().zip(items(arg)) {
            *product *= match value {
                Value::Number(n) | Value::Date(n) => *n,
                _ => 0.0,
            };
        }
    }

    finite(products.iter().sum())
}

/// SUMIF(range, criteria, [sum_range])
///
/// Criteria can be:
/// - A number: exact match (e.g., 5)
/// - A text string: case-insensitive match (e.g., "apple")
/// - A comparison expression: ">5", ">=10", "<100", "<=50", "<>0", "=5"
///
/// `sum_range` is paired with `range` element by element; missing
/// elements are skipped.
pub fn fn_sumif(args: &[Value]) -> Result<Value, ErrorKind> {
    let range = items(args.first().ok_or(ErrorKind::NotAvailable)?);
    let matcher = CriteriaMatcher::new(args.get(1).ok_or(ErrorKind::NotAvailable)?);
    let sum_range = args.get(2).map(items).unwrap_or(range);

    let sum = range
        .iter()
        .zip(sum_range)
        .filter(|(candidate, _)| matcher.matches(candidate))
        .filter_map(|(_, value)| match value {
            Value::Number(n) | Value::Date(n) => Some(*n),
            _ => None,
        })
        .sum();

    finite(sum)
}

/// ABS(number)
pub fn fn_abs(args: &[Value]) -> Result<Value, ErrorKind> {
    Ok(Value::Number(number_arg(args, 0)?.abs()))
}

/// INT(number) - Rounds down toward negative infinity
pub fn fn_int(args: &[Value]) -> Result<Value, ErrorKind> {
    Ok(Value::Number(number_arg(args, 0)?.floor()))
}

/// MOD(number, divisor)
///
/// The result has the same sign as the divisor (unlike Rust's `%`).
pub fn fn_mod(args: &[Value]) -> Result<Value, ErrorKind> {
    let number = number_arg(args, 0)?;
    let divisor = number_arg(args, 1)?;

    if divisor == 0.0 {
        return Err(ErrorKind::DivZero);
    }

    finite(number - divisor * (number / divisor).floor())
}

/// POWER(number, power)
pub fn fn_power(args: &[Value]) -> Result<Value, ErrorKind> {
    let base = number_arg(args, 0)?;
    let exponent = number_arg(args, 1)?;

    if base == 0.0 && exponent < 0.0 {
        return Err(ErrorKind::DivZero);
    }

    finite(base.powf(exponent))
}

/// SQRT(number) - #NUM! for negative numbers
pub fn fn_sqrt(args: &[Value]) -> Result<Value, ErrorKind> {
    let number = number_arg(args, 0)?;
    if number < 0.0 {
        return Err(ErrorKind::Num);
    }
    Ok(Value::Number(number.sqrt()))
}

/// SQRTPI(number) - sqrt(number * pi)
pub fn fn_sqrtpi(args: &[Value]) -> Result<Value, ErrorKind> {
    let number = number_arg(args, 0)?;
    if number < 0.0 {
        return Err(ErrorKind::Num);
    }
    Ok(Value::Number((number * std::f64::consts::PI).sqrt()))
}

/// PI()
pub fn fn_pi(_args: &[Value]) -> Result<Value, ErrorKind> {
    Ok(Value::Number(std::f64::consts::PI))
}

/// E()
pub fn fn_e(_args: &[Value]) -> Result<Value, ErrorKind> {
    Ok(Value::Number(std::f64::consts::E))
}

/// LN(number)
pub fn fn_ln(args: &[Value]) -> Result<Value, ErrorKind> {
    let number = number_arg(args, 0)?;
    if number <= 0.0 {
        return Err(ErrorKind::Num);
    }
    Ok(Value::Number(number.ln()))
}

/// LOG(number, [base])
pub fn fn_log(args: &[Value]) -> Result<Value, ErrorKind> {
    let number = number_arg(args, 0)?;
    let base = optional_number_arg(args, 1, 10.0)?;

    if number <= 0.0 || base <= 0.0 {
        return Err(ErrorKind::Num);
    }
    if base == 1.0 {
        return Err(ErrorKind::DivZero);
    }

    let result = match base {
        b if b == 10.0 => number.log10(),
        b if b == 2.0 => number.log2(),
        b => number.log(b),
    };

    Ok(Value::Number(result))
}

/// LOG10(number)
pub fn fn_log10(args: &[Value]) -> Result<Value, ErrorKind> {
    let number = number_arg(args, 0)?;
    if number <= 0.0 {
        return Err(ErrorKind::Num);
    }
    Ok(Value::Number(number.log10()))
}

fn digits_arg(args: &[Value]) -> Result<i32, ErrorKind> {
    Ok(optional_number_arg(args, 1, 0.0)?.trunc() as i32)
}

/// ROUND(number, [num_digits])
///
/// Rounds half away from zero: round(2.5) = 3, round(-2.5) = -3.
pub fn fn_round(args: &[Value]) -> Result<Value, ErrorKind> {
    let number = number_arg(args, 0)?;
    let multiplier = 10_f64.powi(digits_arg(args)?);

    let result = if number >= 0.0 {
        (number * multiplier + 0.5).floor() / multiplier
    } else {
        (number * multiplier - 0.5).ceil() / multiplier
    };

    finite(result)
}

/// ROUNDUP(number, [num_digits]) - Rounds away from zero
pub fn fn_roundup(args: &[Value]) -> Result<Value, ErrorKind> {
    let number = number_arg(args, 0)?;
    let multiplier = 10_f64.powi(digits_arg(args)?);

    let result = if number >= 0.0 {
        (number * multiplier).ceil() / multiplier
    } else {
        (number * multiplier).floor() / multiplier
    };

    finite(result)
}

/// ROUNDDOWN(number, [num_digits]) - Rounds toward zero
pub fn fn_rounddown(args: &[Value]) -> Result<Value, ErrorKind> {
    let number = number_arg(args, 0)?;
    let multiplier = 10_f64.powi(digits_arg(args)?);
    finite((number * multiplier).trunc() / multiplier)
}

/// TRUNC(number, [num_digits])
pub fn fn_trunc(args: &[Value]) -> Result<Value, ErrorKind> {
    fn_rounddown(args)
}

/// EVEN(number) - Rounds away from zero to the nearest even integer
pub fn fn_even(args: &[Value]) -> Result<Value, ErrorKind> {
    let number = number_arg(args, 0)?;
    let ceiling = number.abs().ceil();
    let result = if ceiling % 2.0 == 0.0 {
        ceiling
    } else {
        ceiling + 1.0
    };
    Ok(Value::Number(result.copysign(number)))
}

/// ODD(number) - Rounds away from zero to the nearest odd integer
pub fn fn_odd(args: &[Value]) -> Result<Value, ErrorKind> {
    let number = number_arg(args, 0)?;
    let ceiling = number.abs().ceil();
    let result = if ceiling % 2.0 == 1.0 {
        ceiling
    } else {
        ceiling + 1.0
    };
    Ok(Value::Number(if number < 0.0 { -result } else { result }))
}

/// DEGREES(angle)
pub fn fn_degrees(args: &[Value]) -> Result<Value, ErrorKind> {
    Ok(Value::Number(number_arg(args, 0)?.to_degrees()))
}

/// SIN(number)
pub fn fn_sin(args: &[Value]) -> Result<Value, ErrorKind> {
    Ok(Value::Number(number_arg(args, 0)?.sin()))
}

/// COS(number)
pub fn fn_cos(args: &[Value]) -> Result<Value, ErrorKind> {
    Ok(Value::Number(number_arg(args, 0)?.cos()))
}

/// TAN(number)
pub fn fn_tan(args: &[Value]) -> Result<Value, ErrorKind> {
    finite(number_arg(args, 0)?.tan())
}

/// ATAN2(x_num, y_num) - angle of the point (x, y); note the argument order
pub fn fn_atan2(args: &[Value]) -> Result<Value, ErrorKind> {
    let x = number_arg(args, 0)?;
    let y = number_arg(args, 1)?;

    if x == 0.0 && y == 0.0 {
        return Err(ErrorKind::DivZero);
    }

    Ok(Value::Number(y.atan2(x)))
}
