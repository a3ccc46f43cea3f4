//! Date functions
//!
//! Dates are serial numbers counting days since 1899-12-30, so serial 1
//! is 1899-12-31 and 1900-03-01 is serial 61. Serials before the epoch
//! are `#NUM!`. The fictitious 1900-02-29 does not exist here.

use chrono::{Datelike, Days, Months, NaiveDate};
use sheetcalc_core::{parse_numeric, ErrorKind, Value};

fn epoch() -> Result<NaiveDate, ErrorKind> {
    NaiveDate::from_ymd_opt(1899, 12, 30).ok_or(ErrorKind::Num)
}

fn date_to_serial(date: NaiveDate) -> Result<f64, ErrorKind> {
    let days = date.signed_duration_since(epoch()?).num_days();
    if days < 0 {
        return Err(ErrorKind::Num);
    }
    Ok(days as f64)
}

fn serial_to_date(serial: f64) -> Result<NaiveDate, ErrorKind> {
    if !serial.is_finite() || serial < 0.0 {
        return Err(ErrorKind::Num);
    }
    epoch()?
        .checked_add_days(Days::new(serial.trunc() as u64))
        .ok_or(ErrorKind::Num)
}

/// A date argument: a serial number, numeric text, or ISO `YYYY-MM-DD`
fn date_arg(args: &[Value], index: usize) -> Result<NaiveDate, ErrorKind> {
    match args.get(index).ok_or(ErrorKind::NotAvailable)? {
        Value::Text(s) => match parse_numeric(s) {
            Some(serial) => serial_to_date(serial),
            None => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| ErrorKind::Value),
        },
        other => serial_to_date(other.to_number()?),
    }
}

fn int_arg(args: &[Value], index: usize) -> Result<i64, ErrorKind> {
    let n = args.get(index).ok_or(ErrorKind::NotAvailable)?.to_number()?;
    if !n.is_finite() || n.abs() > 1e9 {
        return Err(ErrorKind::Num);
    }
    Ok(n.trunc() as i64)
}

fn shift_months(date: NaiveDate, months: i64) -> Result<NaiveDate, ErrorKind> {
    let magnitude = u32::try_from(months.unsigned_abs()).map_err(|_| ErrorKind::Num)?;
    let shifted = if months >= 0 {
        date.checked_add_months(Months::new(magnitude))
    } else {
        date.checked_sub_months(Months::new(magnitude))
    };
    shifted.ok_or(ErrorKind::Num)
}

fn serial(date: NaiveDate) -> Result<Value, ErrorKind> {
    Ok(Value::Date(date_to_serial(date)?))
}

/// DATE(year, month, day)
///
/// Years 0 through 1899 are offset by 1900. Months and days outside
/// their usual range roll over into neighbouring months and years.
pub fn fn_date(args: &[Value]) -> Result<Value, ErrorKind> {
    let mut year = int_arg(args, 0)?;
    let month = int_arg(args, 1)?;
    let day = int_arg(args, 2)?;

    if (0..1900).contains(&year) {
        year += 1900;
    }
    if !(0..10_000).contains(&year) {
        return Err(ErrorKind::Num);
    }

    let total_months = year * 12 + (month - 1);
    let year = i32::try_from(total_months.div_euclid(12)).map_err(|_| ErrorKind::Num)?;
    let month = total_months.rem_euclid(12) as u32 + 1;

    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or(ErrorKind::Num)?;
    let offset = day - 1;
    let date = if offset >= 0 {
        first.checked_add_days(Days::new(offset as u64))
    } else {
        first.checked_sub_days(Days::new(offset.unsigned_abs()))
    }
    .ok_or(ErrorKind::Num)?;

    serial(date)
}

/// DAY(serial_number) - Day of the month, 1 through 31
pub fn fn_day(args: &[Value]) -> Result<Value, ErrorKind> {
    Ok(Value::Number(date_arg(args, 0)?.day() as f64))
}

/// DAYS(end_date, start_date)
pub fn fn_days(args: &[Value]) -> Result<Value, ErrorKind> {
    let end = date_arg(args, 0)?;
    let start = date_arg(args, 1)?;
    Ok(Value::Number(end.signed_duration_since(start).num_days() as f64))
}

/// EDATE(start_date, months)
///
/// Day-of-month is clamped to the length of the target month.
pub fn fn_edate(args: &[Value]) -> Result<Value, ErrorKind> {
    let start = date_arg(args, 0)?;
    let months = int_arg(args, 1)?;
    serial(shift_months(start, months)?)
}

/// EOMONTH(start_date, months) - Last day of the month `months` away
pub fn fn_eomonth(args: &[Value]) -> Result<Value, ErrorKind> {
    let start = date_arg(args, 0)?;
    let months = int_arg(args, 1)?;

    let first = start.with_day(1).ok_or(ErrorKind::Num)?;
    let next_month = shift_months(first, months + 1)?;
    let last = next_month.pred_opt().ok_or(ErrorKind::Num)?;

    serial(last)
}
