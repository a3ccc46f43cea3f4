//! Criteria matching for SUMIF
//!
//! Criteria can be:
//! - A number: exact match (e.g., 5)
//! - A text string: case-insensitive match (e.g., "apple")
//! - A comparison expression: ">5", ">=10", "<100", "<=50", "<>0", "=5"
//! - Wildcards: "*" matches any characters, "?" matches single character
//! - Empty string: matches empty cells

use lazy_regex::regex_captures;
use sheetcalc_core::{parse_numeric, Value};

const EPSILON: f64 = 1e-10;

/// Criteria matcher for SUMIF
#[derive(Debug)]
pub struct CriteriaMatcher {
    criteria_type: CriteriaType,
}

#[derive(Debug)]
enum CriteriaType {
    /// Exact number match
    Number(f64),
    /// Comparison with number (operator, value)
    Comparison(ComparisonOp, f64),
    /// Text match (case-insensitive, with wildcards)
    Text(String),
    /// Anything that does not match the text pattern
    NotText(String),
    /// Match empty values
    Empty,
}

#[derive(Debug, Clone, Copy)]
enum ComparisonOp {
    Equal,
    NotEqual,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,
}

impl ComparisonOp {
    fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "=" => ComparisonOp::Equal,
            "<>" => ComparisonOp::NotEqual,
            "<" => ComparisonOp::LessThan,
            "<=" => ComparisonOp::LessEqual,
            ">" => ComparisonOp::GreaterThan,
            ">=" => ComparisonOp::GreaterEqual,
            _ => return None,
        })
    }

    fn test(self, n: f64, target: f64) -> bool {
        match self {
            ComparisonOp::Equal => (n - target).abs() < EPSILON,
            ComparisonOp::NotEqual => (n - target).abs() >= EPSILON,
            ComparisonOp::LessThan => n < target,
            ComparisonOp::LessEqual => n <= target,
            ComparisonOp::GreaterThan => n > target,
            ComparisonOp::GreaterEqual => n >= target,
        }
    }
}

impl CriteriaMatcher {
    /// Create a new criteria matcher from an evaluated argument
    pub fn new(criteria: &Value) -> Self {
        let criteria_type = match criteria {
            Value::Number(n) | Value::Date(n) => CriteriaType::Number(*n),
            Value::Boolean(b) => CriteriaType::Number(if *b { 1.0 } else { 0.0 }),
            Value::Text(s) => Self::parse_text_criteria(s),
            Value::Null | Value::Array(_) => CriteriaType::Empty,
        };

        Self { criteria_type }
    }

    fn parse_text_criteria(s: &str) -> CriteriaType {
        let s = s.trim();

        if s.is_empty() {
            return CriteriaType::Empty;
        }

        if let Some((_, symbol, rest)) = regex_captures!(r"^(>=|<=|<>|>|<|=)\s*(.*)$", s) {
            if let Some(op) = ComparisonOp::from_symbol(symbol) {
                if let Some(n) = parse_numeric(rest) {
                    return CriteriaType::Comparison(op, n);
                }
                // "=apple" and "<>apple" compare text; other operators on
                // text match nothing numeric and fall through to a literal
                match op {
                    ComparisonOp::Equal if rest.is_empty() => return CriteriaType::Empty,
                    ComparisonOp::Equal => return CriteriaType::Text(rest.to_lowercase()),
                    ComparisonOp::NotEqual => return CriteriaType::NotText(rest.to_lowercase()),
                    _ => {}
                }
            }
        }

        if let Some(n) = parse_numeric(s) {
            return CriteriaType::Number(n);
        }

        CriteriaType::Text(s.to_lowercase())
    }

    /// Check if a value matches the criteria
    pub fn matches(&self, value: &Value) -> bool {
        match &self.criteria_type {
            // Text that merely looks like a number does not match
            CriteriaType::Number(target) => match numeric(value) {
                Some(n) => (n - target).abs() < EPSILON,
                None => false,
            },

            CriteriaType::Comparison(op, target) => match numeric(value) {
                Some(n) => op.test(n, *target),
                None => false,
            },

            CriteriaType::Text(pattern) => match value {
                Value::Text(text) => wildcard_match(pattern, &text.to_lowercase()),
                _ => false,
            },

            CriteriaType::NotText(pattern) => match value {
                Value::Text(text) => !wildcard_match(pattern, &text.to_lowercase()),
                _ => true,
            },

            CriteriaType::Empty => {
                matches!(value, Value::Null) || matches!(value, Value::Text(s) if s.is_empty())
            }
        }
    }
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) | Value::Date(n) => Some(*n),
        Value::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Match with wildcards: * = any characters, ? = single character
fn wildcard_match(pattern: &str, text: &str) -> bool {
    if !pattern.contains(['*', '?']) {
        return pattern == text;
    }

    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();

    let mut pi = 0;
    let mut ti = 0;
    // Last `*` seen and the text position it was tried at
    let mut backtrack: Option<(usize, usize)> = None;

    while ti < text.len() {
        if pi < pattern.len() && (pattern[pi] == '?' || pattern[pi] == text[ti]) {
            pi += 1;
            ti += 1;
        } else if pi < pattern.len() && pattern[pi] == '*' {
            backtrack = Some((pi, ti));
            pi += 1;
        } else if let Some((star, from)) = backtrack {
            backtrack = Some((star, from + 1));
            pi = star + 1;
            ti = from + 1;
        } else {
            return false;
        }
    }

    pattern[pi..].iter().all(|&c| c == '*')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Value {
        Value::text(s)
    }

    #[test]
    fn test_number_criteria() {
        let matcher = CriteriaMatcher::new(&Value::Number(5.0));
        assert!(matcher.matches(&Value::Number(5.0)));
        assert!(!matcher.matches(&Value::Number(4.0)));
        assert!(!matcher.matches(&text("5")));
    }

    #[test]
    fn test_comparison_criteria() {
        let cases = [
            (">5", [true, false, false]),
            (">=5", [true, true, false]),
            ("<5", [false, false, true]),
            ("<=5", [false, true, true]),
            ("<>5", [true, false, true]),
            ("=5", [false, true, false]),
            ("> 5", [true, false, false]),
        ];

        for (criteria, expected) in cases {
            let matcher = CriteriaMatcher::new(&text(criteria));
            let actual = [6.0, 5.0, 4.0].map(|n| matcher.matches(&Value::Number(n)));
            assert_eq!(actual, expected, "criteria {criteria}");
        }
    }

    #[test]
    fn test_numeric_text_criteria_matches_numbers() {
        let matcher = CriteriaMatcher::new(&text("5"));
        assert!(matcher.matches(&Value::Number(5.0)));
        assert!(!matcher.matches(&text("five")));
    }

    #[test]
    fn test_text_criteria() {
        let matcher = CriteriaMatcher::new(&text("apple"));
        assert!(matcher.matches(&text("apple")));
        assert!(matcher.matches(&text("APPLE")));
        assert!(matcher.matches(&text("Apple")));
        assert!(!matcher.matches(&text("banana")));
        assert!(!matcher.matches(&Value::Number(1.0)));
    }

    #[test]
    fn test_text_comparison_criteria() {
        let matcher = CriteriaMatcher::new(&text("<>apple"));
        assert!(!matcher.matches(&text("Apple")));
        assert!(matcher.matches(&text("pear")));
        assert!(matcher.matches(&Value::Number(3.0)));

        let matcher = CriteriaMatcher::new(&text("=pear"));
        assert!(matcher.matches(&text("PEAR")));
    }

    #[test]
    fn test_wildcard_criteria() {
        let matcher = CriteriaMatcher::new(&text("a*"));
        assert!(matcher.matches(&text("apple")));
        assert!(matcher.matches(&text("a")));
        assert!(!matcher.matches(&text("banana")));

        let matcher = CriteriaMatcher::new(&text("a*e"));
        assert!(matcher.matches(&text("apple")));
        assert!(matcher.matches(&text("ae")));
        assert!(!matcher.matches(&text("apples")));

        let matcher = CriteriaMatcher::new(&text("a?ple"));
        assert!(matcher.matches(&text("apple")));
        assert!(!matcher.matches(&text("aple")));
        assert!(!matcher.matches(&text("axxple")));

        let matcher = CriteriaMatcher::new(&text("a?p*"));
        assert!(matcher.matches(&text("apple")));
        assert!(matcher.matches(&text("app")));
        assert!(!matcher.matches(&text("ap")));
    }

    #[test]
    fn test_empty_criteria() {
        let matcher = CriteriaMatcher::new(&text(""));
        assert!(matcher.matches(&Value::Null));
        assert!(matcher.matches(&text("")));
        assert!(!matcher.matches(&text("text")));
        assert!(!matcher.matches(&Value::Number(0.0)));
    }
}
