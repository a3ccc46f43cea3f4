//! Canonical spreadsheet error kinds

use std::fmt;

/// Spreadsheet error values
///
/// Every failure raised while evaluating a formula ends up as one of these.
/// Each kind has a display token (`#DIV/0!`) and a name (`DIV_ZERO`), and
/// either spelling can be used to raise it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorKind {
    /// #NULL - Incorrect range operator
    Null,
    /// #DIV/0! - Division by zero
    DivZero,
    /// #VALUE! - Wrong type of argument or operand
    Value,
    /// #REF! - Invalid or circular cell reference
    Ref,
    /// #NAME? - Unrecognized function name
    Name,
    /// #NUM! - Invalid numeric value
    Num,
    /// #N/A! - Value not available
    NotAvailable,
    /// #ERROR - Anything that does not map to another kind
    Error,
}

impl ErrorKind {
    /// All kinds, in declaration order
    pub const ALL: [ErrorKind; 8] = [
        ErrorKind::Null,
        ErrorKind::DivZero,
        ErrorKind::Value,
        ErrorKind::Ref,
        ErrorKind::Name,
        ErrorKind::Num,
        ErrorKind::NotAvailable,
        ErrorKind::Error,
    ];

    /// Get the display token for this error
    pub fn token(&self) -> &'static str {
        match self {
            ErrorKind::Null => "#NULL",
            ErrorKind::DivZero => "#DIV/0!",
            ErrorKind::Value => "#VALUE!",
            ErrorKind::Ref => "#REF!",
            ErrorKind::Name => "#NAME?",
            ErrorKind::Num => "#NUM!",
            ErrorKind::NotAvailable => "#N/A!",
            ErrorKind::Error => "#ERROR",
        }
    }

    /// Get the kind name (`DIV_ZERO`, `NOT_AVAILABLE`, ...)
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::Null => "NULL",
            ErrorKind::DivZero => "DIV_ZERO",
            ErrorKind::Value => "VALUE",
            ErrorKind::Ref => "REF",
            ErrorKind::Name => "NAME",
            ErrorKind::Num => "NUM",
            ErrorKind::NotAvailable => "NOT_AVAILABLE",
            ErrorKind::Error => "ERROR",
        }
    }

    /// Look up a kind by name or token, ignoring case
    ///
    /// ```
    /// use sheetcalc_core::ErrorKind;
    ///
    /// assert_eq!(ErrorKind::from_signal("DIV_ZERO"), Some(ErrorKind::DivZero));
    /// assert_eq!(ErrorKind::from_signal("#div/0!"), Some(ErrorKind::DivZero));
    /// assert_eq!(ErrorKind::from_signal("oops"), None);
    /// ```
    pub fn from_signal(signal: &str) -> Option<Self> {
        let signal = signal.trim();
        Self::ALL.into_iter().find(|kind| {
            kind.name().eq_ignore_ascii_case(signal) || kind.token().eq_ignore_ascii_case(signal)
        })
    }

    /// Like [`ErrorKind::from_signal`], but unknown signals become [`ErrorKind::Error`]
    pub fn resolve(signal: &str) -> Self {
        Self::from_signal(signal).unwrap_or(ErrorKind::Error)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}
