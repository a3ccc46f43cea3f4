//! Builtin spreadsheet functions and the registry that resolves them

pub mod criteria;
pub mod date;
pub mod logical;
pub mod math;
pub mod text;

use ahash::{AHashMap, AHashSet};
use once_cell::sync::Lazy;
use sheetcalc_core::{ErrorKind, Value};
use std::fmt;
use std::sync::Arc;

/// Function implementation signature
///
/// Arguments arrive fully evaluated; a range argument is a
/// [`Value::Array`] in column-major order. Failures must be one of the
/// canonical error kinds.
pub type FunctionImpl = fn(&[Value]) -> Result<Value, ErrorKind>;

/// Function definition
#[derive(Clone, Copy)]
pub struct FunctionDef {
    /// Function name (uppercase)
    pub name: &'static str,
    /// Minimum arguments
    pub min_args: usize,
    /// Maximum arguments (None = unlimited)
    pub max_args: Option<usize>,
    /// Implementation
    pub implementation: FunctionImpl,
}

impl FunctionDef {
    /// Create a function definition
    pub const fn new(
        name: &'static str,
        min_args: usize,
        max_args: Option<usize>,
        implementation: FunctionImpl,
    ) -> Self {
        Self {
            name,
            min_args,
            max_args,
            implementation,
        }
    }

    /// Check an argument count against the declared arity
    pub fn accepts(&self, count: usize) -> bool {
        count >= self.min_args && self.max_args.map_or(true, |max| count <= max)
    }
}

impl fmt::Debug for FunctionDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionDef")
            .field("name", &self.name)
            .field("min_args", &self.min_args)
            .field("max_args", &self.max_args)
            .finish()
    }
}

/// Names a formula may call. A registered function that is not listed
/// here still resolves to `#NAME?`.
pub const SUPPORTED_FUNCTIONS: &[&str] = &[
    "ABS", "ACCRINT", "ACOS", "ACOSH", "ACOTH", "AND", "ARABIC", "ASIN", "ASINH", "ATAN", "ATAN2",
    "ATANH", "AVEDEV", "AVERAGE", "AVERAGEA", "AVERAGEIF", "BASE", "BESSELI", "BESSELJ", "BESSELK",
    "BESSELY", "BETADIST", "BETAINV", "BIN2DEC", "BIN2HEX", "BIN2OCT", "BINOMDIST",
    "BINOMDISTRANGE", "BINOMINV", "BITAND", "BITLSHIFT", "BITOR", "BITRSHIFT", "BITXOR", "CEILING",
    "CEILINGMATH", "CEILINGPRECISE", "CHAR", "CHISQDIST", "CHISQINV", "CODE", "COMBIN", "COMBINA",
    "COMPLEX", "CONCATENATE", "CONFIDENCENORM", "CONFIDENCET", "CONVERT", "CORREL", "COS", "COSH",
    "COT", "COTH", "COUNT", "COUNTA", "COUNTBLANK", "COUNTIF", "COUNTIFS", "COUNTIN",
    "COUNTUNIQUE", "COVARIANCEP", "COVARIANCES", "CSC", "CSCH", "CUMIPMT", "CUMPRINC", "DATE",
    "DATEVALUE", "DAY", "DAYS", "DAYS360", "DB", "DDB", "DEC2BIN", "DEC2HEX", "DEC2OCT", "DECIMAL",
    "DEGREES", "DELTA", "DEVSQ", "DOLLAR", "DOLLARDE", "DOLLARFR", "E", "EDATE", "EFFECT",
    "EOMONTH", "ERF", "ERFC", "EVEN", "EXACT", "EXPONDIST", "FALSE", "FDIST", "FINV", "FISHER",
    "FISHERINV", "IF", "INT", "ISEVEN", "ISODD", "LN", "LOG", "LOG10", "MAX", "MAXA", "MEDIAN",
    "MIN", "MINA", "MOD", "NOT", "ODD", "OR", "PI", "POWER", "ROUND", "ROUNDDOWN", "ROUNDUP", "SIN",
    "SINH", "SPLIT", "SQRT", "SQRTPI", "SUM", "SUMIF", "SUMIFS", "SUMPRODUCT", "SUMSQ", "SUMX2MY2",
    "SUMX2PY2", "SUMXMY2", "TAN", "TANH", "TRUE", "TRUNC", "XOR",
];

static BUILTINS: Lazy<Arc<FunctionRegistry>> = Lazy::new(|| Arc::new(FunctionRegistry::new()));

/// Function registry
///
/// Holds implementations and the allow-list consulted before any lookup.
#[derive(Debug, Clone)]
pub struct FunctionRegistry {
    functions: AHashMap<String, FunctionDef>,
    allowed: AHashSet<String>,
}

impl FunctionRegistry {
    /// Create a new registry with all builtin functions and the standard
    /// allow-list
    pub fn new() -> Self {
        let mut registry = Self::empty();

        registry.register_math_functions();
        registry.register_logical_functions();
        registry.register_text_functions();
        registry.register_date_functions();

        for name in SUPPORTED_FUNCTIONS {
            registry.allow(name);
        }

        registry
    }

    /// Create a registry with no functions and an empty allow-list
    pub fn empty() -> Self {
        Self {
            functions: AHashMap::new(),
            allowed: AHashSet::new(),
        }
    }

    /// The builtin registry, built once and shared read-only
    pub fn shared() -> Arc<FunctionRegistry> {
        Arc::clone(&*BUILTINS)
    }

    /// Register a function. It is callable only once its name is allowed.
    pub fn register(&mut self, def: FunctionDef) {
        self.functions.insert(def.name.to_uppercase(), def);
    }

    /// Add a name to the allow-list
    pub fn allow(&mut self, name: &str) {
        self.allowed.insert(name.to_uppercase());
    }

    /// Check the allow-list
    pub fn is_supported(&self, name: &str) -> bool {
        self.allowed.contains(&name.to_uppercase())
    }

    /// Look up a registered function, ignoring the allow-list
    pub fn get(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(&name.to_uppercase())
    }

    /// Resolve a name the way a formula call does: it must be allowed
    /// and registered
    pub fn lookup(&self, name: &str) -> Option<&FunctionDef> {
        if self.is_supported(name) {
            self.get(name)
        } else {
            None
        }
    }

    /// Number of registered functions
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Check if no functions are registered
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    fn register_math_functions(&mut self) {
        self.register(FunctionDef::new("SUM", 1, None, math::fn_sum));
        self.register(FunctionDef::new("AVERAGE", 1, None, math::fn_average));
        self.register(FunctionDef::new("MIN", 1, None, math::fn_min));
        self.register(FunctionDef::new("MAX", 1, None, math::fn_max));
        self.register(FunctionDef::new("COUNT", 1, None, math::fn_count));
        self.register(FunctionDef::new("MEDIAN", 1, None, math::fn_median));
        self.register(FunctionDef::new("SUMSQ", 1, None, math::fn_sumsq));
        self.register(FunctionDef::new("SUMPRODUCT", 1, None, math::fn_sumproduct));
        self.register(FunctionDef::new("SUMIF", 2, Some(3), math::fn_sumif));
        self.register(FunctionDef::new("ABS", 1, Some(1), math::fn_abs));
        self.register(FunctionDef::new("INT", 1, Some(1), math::fn_int));
        self.register(FunctionDef::new("MOD", 2, Some(2), math::fn_mod));
        self.register(FunctionDef::new("POWER", 2, Some(2), math::fn_power));
        self.register(FunctionDef::new("SQRT", 1, Some(1), math::fn_sqrt));
        self.register(FunctionDef::new("SQRTPI", 1, Some(1), math::fn_sqrtpi));
        self.register(FunctionDef::new("PI", 0, Some(0), math::fn_pi));
        self.register(FunctionDef::new("E", 0, Some(0), math::fn_e));
        self.register(FunctionDef::new("LN", 1, Some(1), math::fn_ln));
        self.register(FunctionDef::new("LOG", 1, Some(2), math::fn_log));
        self.register(FunctionDef::new("LOG10", 1, Some(1), math::fn_log10));
        self.register(FunctionDef::new("ROUND", 1, Some(2), math::fn_round));
        self.register(FunctionDef::new("ROUNDUP", 1, Some(2), math::fn_roundup));
        self.register(FunctionDef::new("ROUNDDOWN", 1, Some(2), math::fn_rounddown));
        self.register(FunctionDef::new("TRUNC", 1, Some(2), math::fn_trunc));
        self.register(FunctionDef::new("EVEN", 1, Some(1), math::fn_even));
        self.register(FunctionDef::new("ODD", 1, Some(1), math::fn_odd));
        self.register(FunctionDef::new("DEGREES", 1, Some(1), math::fn_degrees));
        self.register(FunctionDef::new("SIN", 1, Some(1), math::fn_sin));
        self.register(FunctionDef::new("COS", 1, Some(1), math::fn_cos));
        self.register(FunctionDef::new("TAN", 1, Some(1), math::fn_tan));
        self.register(FunctionDef::new("ATAN2", 2, Some(2), math::fn_atan2));
    }

    fn register_logical_functions(&mut self) {
        self.register(FunctionDef::new("IF", 2, Some(3), logical::fn_if));
        self.register(FunctionDef::new("AND", 1, None, logical::fn_and));
        self.register(FunctionDef::new("OR", 1, None, logical::fn_or));
        self.register(FunctionDef::new("XOR", 1, None, logical::fn_xor));
        self.register(FunctionDef::new("NOT", 1, Some(1), logical::fn_not));
        self.register(FunctionDef::new("TRUE", 0, Some(0), logical::fn_true));
        self.register(FunctionDef::new("FALSE", 0, Some(0), logical::fn_false));
        self.register(FunctionDef::new("ISEVEN", 1, Some(1), logical::fn_iseven));
        self.register(FunctionDef::new("ISODD", 1, Some(1), logical::fn_isodd));
    }

    fn register_text_functions(&mut self) {
        self.register(FunctionDef::new("CONCATENATE", 1, None, text::fn_concatenate));
        self.register(FunctionDef::new("EXACT", 2, Some(2), text::fn_exact));
        self.register(FunctionDef::new("CHAR", 1, Some(1), text::fn_char));
        self.register(FunctionDef::new("CODE", 1, Some(1), text::fn_code));
    }

    fn register_date_functions(&mut self) {
        self.register(FunctionDef::new("DATE", 3, Some(3), date::fn_date));
        self.register(FunctionDef::new("DAY", 1, Some(1), date::fn_day));
        self.register(FunctionDef::new("DAYS", 2, Some(2), date::fn_days));
        self.register(FunctionDef::new("EDATE", 2, Some(2), date::fn_edate));
        self.register(FunctionDef::new("EOMONTH", 2, Some(2), date::fn_eomonth));
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// === Argument helpers shared by the function modules ===

/// The elements of an argument: an array's items, or the value itself
pub(crate) fn items(value: &Value) -> &[Value] {
    match value {
        Value::Array(items) => items,
        other => std::slice::from_ref(other),
    }
}

/// Required numeric argument
pub(crate) fn number_arg(args: &[Value], index: usize) -> Result<f64, ErrorKind> {
    args.get(index)
        .ok_or(ErrorKind::NotAvailable)?
        .to_number()
}

/// Optional numeric argument
pub(crate) fn optional_number_arg(
    args: &[Value],
    index: usize,
    default: f64,
) -> Result<f64, ErrorKind> {
    match args.get(index) {
        Some(value) => value.to_number(),
        None => Ok(default),
    }
}

/// Numbers from aggregate arguments.
///
/// Scalar arguments must be numeric (booleans count, text must parse).
/// Array elements that are not numbers are skipped, as are nulls.
pub(crate) fn collect_numbers(args: &[Value]) -> Result<Vec<f64>, ErrorKind> {
    let mut numbers = Vec::new();

    for arg in args {
        match arg {
            Value::Array(items) => numbers.extend(items.iter().filter_map(|v| match v {
                Value::Number(n) | Value::Date(n) => Some(*n),
                _ => None,
            })),
            Value::Null => {}
            scalar => numbers.push(scalar.to_number()?),
        }
    }

    Ok(numbers)
}

/// Reject non-finite results
pub(crate) fn finite(n: f64) -> Result<Value, ErrorKind> {
    if n.is_finite() {
        Ok(Value::Number(n))
    } else {
        Err(ErrorKind::Num)
    }
}
