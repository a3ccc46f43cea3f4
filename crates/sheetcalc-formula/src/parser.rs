//! Formula parser
//!
//! A recursive descent parser for spreadsheet formulas with proper operator
//! precedence. It is generic over a [`FormulaHandler`]: instead of building
//! nodes it calls the handler as each construct is recognized, so with the
//! evaluator plugged in a formula is computed while it is parsed.

use crate::ast::{BinaryOperator, FormulaExpr, UnaryOperator};
use crate::error::{FormulaError, FormulaResult};
use crate::handler::{AstBuilder, FormulaHandler};
use sheetcalc_core::{CellAddress, CellRange, ErrorKind};

/// Parse a formula string into an AST
///
/// The leading `=` is optional.
///
/// # Example
/// ```rust
/// use sheetcalc_formula::parse_formula;
///
/// let ast = parse_formula("=1+2").unwrap();
/// let ast = parse_formula("=SUM(A1:A10)").unwrap();
/// let ast = parse_formula("=IF(A1>0,\"Yes\",'No')").unwrap();
/// ```
pub fn parse_formula(formula: &str) -> FormulaResult<FormulaExpr> {
    parse_with(formula, &mut AstBuilder)
}

/// Parse a formula, driving `handler` with one call per grammar action.
///
/// Handler output is threaded through unchanged; only grammar failures
/// produce [`FormulaError::Parse`].
pub fn parse_with<H: FormulaHandler>(formula: &str, handler: &mut H) -> FormulaResult<H::Output> {
    let trimmed = formula.trim_start();
    let mut offset = formula.len() - trimmed.len();
    let body = match trimmed.strip_prefix('=') {
        Some(rest) => {
            offset += 1;
            rest
        }
        None => trimmed,
    };

    let mut parser = FormulaParser::new(body, offset, handler)?;
    if parser.token == Token::Eof {
        return Err(parser.error_at(parser.token_start, "Empty formula"));
    }

    let output = parser.parse_expression()?;

    // Make sure we consumed all input
    if parser.token != Token::Eof {
        return Err(parser.error_at(
            parser.token_start,
            format!(
                "Unexpected characters after expression: '{}'",
                &parser.input[parser.token_start..]
            ),
        ));
    }

    Ok(output)
}

/// Token types
#[derive(Debug, Clone, PartialEq)]
enum Token {
    // Literals
    Number(f64),
    Text(String),
    Boolean(bool),
    Error(ErrorKind),

    // Identifiers and references
    Identifier(String),
    CellRef(CellAddress),

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    Percent,
    Ampersand,
    Equal,
    NotEqual,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,
    Colon,
    Comma,

    // Delimiters
    LeftParen,
    RightParen,

    // End of input
    Eof,
}

/// Formula parser
struct FormulaParser<'a, 'h, H> {
    input: &'a str,
    /// Offset of `input` within the text the caller passed in
    offset: usize,
    pos: usize,
    token: Token,
    token_start: usize,
    handler: &'h mut H,
}

impl<'a, 'h, H: FormulaHandler> FormulaParser<'a, 'h, H> {
    fn new(input: &'a str, offset: usize, handler: &'h mut H) -> FormulaResult<Self> {
        let mut parser = Self {
            input,
            offset,
            pos: 0,
            token: Token::Eof,
            token_start: 0,
            handler,
        };
        parser.advance_token()?;
        Ok(parser)
    }

    fn error_at(&self, pos: usize, message: impl Into<String>) -> FormulaError {
        FormulaError::Parse {
            position: self.offset + pos,
            message: message.into(),
        }
    }

    // === Token scanning ===

    fn advance_token(&mut self) -> FormulaResult<()> {
        self.skip_whitespace();
        self.token_start = self.pos;
        self.token = self.scan_token()?;
        Ok(())
    }

    fn scan_token(&mut self) -> FormulaResult<Token> {
        let c = match self.peek_char() {
            Some(c) => c,
            None => return Ok(Token::Eof),
        };

        // Single-character tokens
        let single = match c {
            '+' => Some(Token::Plus),
            '-' => Some(Token::Minus),
            '*' => Some(Token::Star),
            '/' => Some(Token::Slash),
            '^' => Some(Token::Caret),
            '%' => Some(Token::Percent),
            '&' => Some(Token::Ampersand),
            ':' => Some(Token::Colon),
            ',' => Some(Token::Comma),
            '(' => Some(Token::LeftParen),
            ')' => Some(Token::RightParen),
            '=' => Some(Token::Equal),
            _ => None,
        };
        if let Some(token) = single {
            self.advance();
            return Ok(token);
        }

        // Two-character operators
        if c == '<' {
            self.advance();
            if self.peek_char() == Some('=') {
                self.advance();
                return Ok(Token::LessEqual);
            } else if self.peek_char() == Some('>') {
                self.advance();
                return Ok(Token::NotEqual);
            }
            return Ok(Token::LessThan);
        }

        if c == '>' {
            self.advance();
            if self.peek_char() == Some('=') {
                self.advance();
                return Ok(Token::GreaterEqual);
            }
            return Ok(Token::GreaterThan);
        }

        // String literal
        if c == '"' || c == '\'' {
            return self.scan_string(c);
        }

        // Number
        if c.is_ascii_digit()
            || (c == '.' && self.peek_char_at(1).map_or(false, |c| c.is_ascii_digit()))
        {
            return self.scan_number();
        }

        // Identifier, cell reference, or boolean/error
        if c.is_ascii_alphabetic() || c == '_' || c == '$' || c == '#' {
            return self.scan_identifier_or_ref();
        }

        Err(self.error_at(self.pos, format!("Unexpected character '{}'", c)))
    }

    fn scan_string(&mut self, quote: char) -> FormulaResult<Token> {
        let start = self.pos;
        self.advance(); // Skip opening quote

        let mut s = String::new();
        loop {
            match self.peek_char() {
                Some(c) if c == quote => {
                    // A doubled quote is an escaped quote
                    if self.peek_char_at(1) == Some(quote) {
                        s.push(quote);
                        self.advance();
                        self.advance();
                    } else {
                        self.advance();
                        return Ok(Token::Text(s));
                    }
                }
                Some(c) => {
                    s.push(c);
                    self.advance();
                }
                None => return Err(self.error_at(start, "Unterminated string literal")),
            }
        }
    }

    fn scan_number(&mut self) -> FormulaResult<Token> {
        let start = self.pos;

        // Integer part
        while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
            self.advance();
        }

        // Decimal part
        if self.peek_char() == Some('.') {
            self.advance();
            while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        // Exponent part
        if self.peek_char().map_or(false, |c| c == 'e' || c == 'E') {
            self.advance();
            if self.peek_char().map_or(false, |c| c == '+' || c == '-') {
                self.advance();
            }
            while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        let num_str = &self.input[start..self.pos];
        match num_str.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(Token::Number(n)),
            Ok(_) => Err(self.error_at(start, format!("Number '{}' is out of range", num_str))),
            Err(_) => Err(self.error_at(start, format!("Invalid number '{}'", num_str))),
        }
    }

    fn scan_identifier_or_ref(&mut self) -> FormulaResult<Token> {
        let start = self.pos;

        // Error literals (#VALUE!, #REF!, #DIV/0!, ...)
        if self.peek_char() == Some('#') {
            self.advance();
            while self.peek_char().map_or(false, |c| {
                c.is_ascii_alphanumeric() || matches!(c, '!' | '/' | '?' | '_')
            }) {
                self.advance();
            }
            return Ok(Token::Error(ErrorKind::resolve(&self.input[start..self.pos])));
        }

        while self.peek_char().map_or(false, |c| {
            c.is_ascii_alphanumeric() || c == '_' || c == '$' || c == '.'
        }) {
            self.advance();
        }

        let text = &self.input[start..self.pos];
        let is_call = self.peek_char() == Some('(');

        // TRUE( and FALSE( are function calls
        if !is_call {
            if text.eq_ignore_ascii_case("TRUE") {
                return Ok(Token::Boolean(true));
            }
            if text.eq_ignore_ascii_case("FALSE") {
                return Ok(Token::Boolean(false));
            }
        }

        // Letters followed by digits is a reference unless it is a call
        // (LOG10(100) is a function, not a cell)
        if !is_call && Self::is_cell_reference(text) {
            return CellAddress::parse(text)
                .map(Token::CellRef)
                .map_err(|e| self.error_at(start, format!("Invalid cell reference '{}': {}", text, e)));
        }

        if text.contains('$') {
            return Err(self.error_at(start, format!("Invalid reference '{}'", text)));
        }

        Ok(Token::Identifier(text.to_string()))
    }

    /// `[$]letters[$]digits`, consuming the whole text
    fn is_cell_reference(text: &str) -> bool {
        let bytes = text.as_bytes();
        let mut i = 0;

        if bytes.get(i) == Some(&b'$') {
            i += 1;
        }

        let letter_start = i;
        while i < bytes.len() && bytes[i].is_ascii_alphabetic() {
            i += 1;
        }
        if i == letter_start {
            return false;
        }

        if bytes.get(i) == Some(&b'$') {
            i += 1;
        }

        let digit_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }

        i > digit_start && i == bytes.len()
    }

    // === Helper methods ===

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_char_at(&self, offset: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().map_or(false, |c| c.is_whitespace()) {
            self.advance();
        }
    }

    fn consume(&mut self) -> FormulaResult<Token> {
        let token = std::mem::replace(&mut self.token, Token::Eof);
        self.advance_token()?;
        Ok(token)
    }

    fn expect(&mut self, expected: Token) -> FormulaResult<()> {
        if self.token == expected {
            self.consume()?;
            Ok(())
        } else {
            Err(self.error_at(
                self.token_start,
                format!("Expected {:?}, got {:?}", expected, self.token),
            ))
        }
    }

    // === Expression parsing with precedence ===
    // Precedence (lowest to highest):
    // 1. Comparison: =, <>, <, <=, >, >=
    // 2. Concatenation: &
    // 3. Addition/Subtraction: +, -
    // 4. Multiplication/Division: *, /
    // 5. Exponentiation: ^ (right associative)
    // 6. Unary: prefix -, +, postfix %
    // 7. Range: :
    // 8. Primary: literals, references, function calls, parentheses

    fn parse_expression(&mut self) -> FormulaResult<H::Output> {
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> FormulaResult<H::Output> {
        let mut left = self.parse_concatenation()?;

        loop {
            let op = match self.token {
                Token::Equal => BinaryOperator::Equal,
                Token::NotEqual => BinaryOperator::NotEqual,
                Token::LessThan => BinaryOperator::LessThan,
                Token::LessEqual => BinaryOperator::LessEqual,
                Token::GreaterThan => BinaryOperator::GreaterThan,
                Token::GreaterEqual => BinaryOperator::GreaterEqual,
                _ => break,
            };

            self.consume()?;
            let right = self.parse_concatenation()?;
            left = self.handler.binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_concatenation(&mut self) -> FormulaResult<H::Output> {
        let mut left = self.parse_additive()?;

        while self.token == Token::Ampersand {
            self.consume()?;
            let right = self.parse_additive()?;
            left = self.handler.binary(BinaryOperator::Concat, left, right);
        }

        Ok(left)
    }

    fn parse_additive(&mut self) -> FormulaResult<H::Output> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match self.token {
                Token::Plus => BinaryOperator::Add,
                Token::Minus => BinaryOperator::Subtract,
                _ => break,
            };

            self.consume()?;
            let right = self.parse_multiplicative()?;
            left = self.handler.binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> FormulaResult<H::Output> {
        let mut left = self.parse_exponent()?;

        loop {
            let op = match self.token {
                Token::Star => BinaryOperator::Multiply,
                Token::Slash => BinaryOperator::Divide,
                _ => break,
            };

            self.consume()?;
            let right = self.parse_exponent()?;
            left = self.handler.binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_exponent(&mut self) -> FormulaResult<H::Output> {
        let left = self.parse_unary()?;

        if self.token == Token::Caret {
            self.consume()?;
            let right = self.parse_exponent()?; // Right associative
            return Ok(self.handler.binary(BinaryOperator::Power, left, right));
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> FormulaResult<H::Output> {
        let prefix = match self.token {
            Token::Minus => Some(UnaryOperator::Negate),
            Token::Plus => Some(UnaryOperator::Plus),
            _ => None,
        };
        if let Some(op) = prefix {
            self.consume()?;
            let operand = self.parse_unary()?;
            return Ok(self.handler.unary(op, operand));
        }

        let mut expr = self.parse_primary()?;

        while self.token == Token::Percent {
            self.consume()?;
            expr = self.handler.unary(UnaryOperator::Percent, expr);
        }

        Ok(expr)
    }

    fn parse_primary(&mut self) -> FormulaResult<H::Output> {
        let start = self.token_start;

        match self.consume()? {
            Token::Number(n) => Ok(self.handler.number(n)),
            Token::Text(s) => Ok(self.handler.text(s)),
            Token::Boolean(b) => Ok(self.handler.boolean(b)),
            Token::Error(kind) => Ok(self.handler.error(kind)),

            Token::LeftParen => {
                let expr = self.parse_expression()?;
                self.expect(Token::RightParen)?;
                Ok(expr)
            }

            Token::CellRef(address) => self.parse_reference(address),

            Token::Identifier(name) => {
                let name = name.to_uppercase();
                if self.token == Token::LeftParen {
                    self.parse_function_call(&name)
                } else {
                    // Bare names are looked up like zero-argument functions (PI, TRUE)
                    Ok(self.handler.call(&name, Vec::new()))
                }
            }

            Token::Eof => Err(self.error_at(start, "Unexpected end of formula")),
            other => Err(self.error_at(start, format!("Unexpected token: {:?}", other))),
        }
    }

    fn parse_reference(&mut self, start: CellAddress) -> FormulaResult<H::Output> {
        if self.token != Token::Colon {
            return Ok(self.handler.cell(start));
        }

        self.consume()?;
        let end_pos = self.token_start;
        match self.consume()? {
            Token::CellRef(end) => Ok(self.handler.range(CellRange::new(start, end))),
            other => Err(self.error_at(
                end_pos,
                format!("Expected cell reference after ':', got {:?}", other),
            )),
        }
    }

    fn parse_function_call(&mut self, name: &str) -> FormulaResult<H::Output> {
        self.expect(Token::LeftParen)?;

        let mut args = Vec::new();

        if self.token != Token::RightParen {
            args.push(self.parse_expression()?);

            while self.token == Token::Comma {
                self.consume()?;
                args.push(self.parse_expression()?);
            }
        }

        self.expect(Token::RightParen)?;

        Ok(self.handler.call(name, args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cell(id: &str) -> FormulaExpr {
        FormulaExpr::Cell(CellAddress::parse(id).unwrap())
    }

    fn num(n: f64) -> FormulaExpr {
        FormulaExpr::Number(n)
    }

    fn binary(op: BinaryOperator, left: FormulaExpr, right: FormulaExpr) -> FormulaExpr {
        FormulaExpr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_formula("=42").unwrap(), num(42.0));
        assert_eq!(parse_formula("=3.14").unwrap(), num(3.14));
        assert_eq!(parse_formula("=1e10").unwrap(), num(1e10));
        assert_eq!(parse_formula("=.5").unwrap(), num(0.5));
    }

    #[test]
    fn test_leading_equals_is_optional() {
        assert_eq!(parse_formula("1+2").unwrap(), parse_formula("  =1+2").unwrap());
    }

    #[test]
    fn test_parse_string() {
        assert_eq!(
            parse_formula("=\"Hello\"").unwrap(),
            FormulaExpr::Text("Hello".into())
        );
        assert_eq!(
            parse_formula("=\"Hello \"\"World\"\"\"").unwrap(),
            FormulaExpr::Text("Hello \"World\"".into())
        );
        assert_eq!(
            parse_formula("='it''s'").unwrap(),
            FormulaExpr::Text("it's".into())
        );
    }

    #[test]
    fn test_parse_boolean() {
        assert_eq!(parse_formula("=TRUE").unwrap(), FormulaExpr::Boolean(true));
        assert_eq!(parse_formula("=false").unwrap(), FormulaExpr::Boolean(false));
        assert_eq!(
            parse_formula("=TRUE()").unwrap(),
            FormulaExpr::Function {
                name: "TRUE".into(),
                args: vec![]
            }
        );
    }

    #[test]
    fn test_parse_error_literal() {
        assert_eq!(parse_formula("=#VALUE!").unwrap(), FormulaExpr::Error(ErrorKind::Value));
        assert_eq!(parse_formula("=#DIV/0!").unwrap(), FormulaExpr::Error(ErrorKind::DivZero));
        assert_eq!(parse_formula("=#N/A!").unwrap(), FormulaExpr::Error(ErrorKind::NotAvailable));
        assert_eq!(parse_formula("=#WHAT").unwrap(), FormulaExpr::Error(ErrorKind::Error));
    }

    #[test]
    fn test_parse_precedence() {
        // 1+(2*3)
        assert_eq!(
            parse_formula("=1+2*3").unwrap(),
            binary(
                BinaryOperator::Add,
                num(1.0),
                binary(BinaryOperator::Multiply, num(2.0), num(3.0))
            )
        );

        // (1+2)*3
        assert_eq!(
            parse_formula("=(1+2)*3").unwrap(),
            binary(
                BinaryOperator::Multiply,
                binary(BinaryOperator::Add, num(1.0), num(2.0)),
                num(3.0)
            )
        );

        // 2^(3^2)
        assert_eq!(
            parse_formula("=2^3^2").unwrap(),
            binary(
                BinaryOperator::Power,
                num(2.0),
                binary(BinaryOperator::Power, num(3.0), num(2.0))
            )
        );

        // "a"&(1+2) = "a3"
        assert_eq!(
            parse_formula("=\"a\"&1+2=\"a3\"").unwrap(),
            binary(
                BinaryOperator::Equal,
                binary(
                    BinaryOperator::Concat,
                    FormulaExpr::Text("a".into()),
                    binary(BinaryOperator::Add, num(1.0), num(2.0))
                ),
                FormulaExpr::Text("a3".into())
            )
        );
    }

    #[test]
    fn test_parse_comparison() {
        for (src, op) in [
            ("=A1>5", BinaryOperator::GreaterThan),
            ("=A1>=5", BinaryOperator::GreaterEqual),
            ("=A1<5", BinaryOperator::LessThan),
            ("=A1<=5", BinaryOperator::LessEqual),
            ("=A1<>5", BinaryOperator::NotEqual),
            ("=A1=5", BinaryOperator::Equal),
        ] {
            assert_eq!(parse_formula(src).unwrap(), binary(op, cell("A1"), num(5.0)));
        }
    }

    #[test]
    fn test_parse_unary() {
        assert_eq!(
            parse_formula("=-5").unwrap(),
            FormulaExpr::Unary {
                op: UnaryOperator::Negate,
                operand: Box::new(num(5.0))
            }
        );

        assert_eq!(
            parse_formula("=50%").unwrap(),
            FormulaExpr::Unary {
                op: UnaryOperator::Percent,
                operand: Box::new(num(50.0))
            }
        );

        // Negation binds tighter than ^
        assert_eq!(
            parse_formula("=-2^2").unwrap(),
            binary(
                BinaryOperator::Power,
                FormulaExpr::Unary {
                    op: UnaryOperator::Negate,
                    operand: Box::new(num(2.0))
                },
                num(2.0)
            )
        );
    }

    #[test]
    fn test_parse_cell_reference() {
        assert_eq!(parse_formula("=A1").unwrap(), cell("A1"));
        assert_eq!(parse_formula("=$B$2").unwrap(), cell("B2"));
        assert_eq!(parse_formula("=b$2").unwrap(), cell("B2"));
    }

    #[test]
    fn test_parse_range_reference() {
        let expected = FormulaExpr::Range(CellRange::parse("A1:B10").unwrap());
        assert_eq!(parse_formula("=A1:B10").unwrap(), expected);
        assert_eq!(parse_formula("=B10:A1").unwrap(), expected);
        assert_eq!(parse_formula("=$A$1:B$10").unwrap(), expected);
    }

    #[test]
    fn test_parse_function() {
        assert_eq!(
            parse_formula("=sum(1,A2,B1:B3)").unwrap(),
            FormulaExpr::Function {
                name: "SUM".into(),
                args: vec![
                    num(1.0),
                    cell("A2"),
                    FormulaExpr::Range(CellRange::parse("B1:B3").unwrap())
                ]
            }
        );

        // LOG10 looks like a reference but is called
        assert!(matches!(
            parse_formula("=LOG10(100)").unwrap(),
            FormulaExpr::Function { ref name, .. } if name == "LOG10"
        ));

        assert!(matches!(
            parse_formula("=FLOOR.MATH(1.5)").unwrap(),
            FormulaExpr::Function { ref name, .. } if name == "FLOOR.MATH"
        ));

        assert_eq!(
            parse_formula("=pi").unwrap(),
            FormulaExpr::Function {
                name: "PI".into(),
                args: vec![]
            }
        );
    }

    #[test]
    fn test_parse_nested_function() {
        let ast = parse_formula("=IF(AND(A1>0,B1<100),SUM(B1:B10)*2,0)").unwrap();
        if let FormulaExpr::Function { name, args } = &ast {
            assert_eq!(name, "IF");
            assert_eq!(args.len(), 3);
        } else {
            panic!("Expected Function");
        }
        assert_eq!(ast.references().len(), 12);
    }

    #[test]
    fn test_parse_errors() {
        let cases = [
            ("=", 1),
            ("=1+", 3),
            ("=(1+2", 5),
            ("=\"abc", 1),
            ("=1 ~ 2", 3),
            ("=A1:5", 4),
            ("=SUM(1,)", 7),
            ("=1 2", 3),
            ("=A1048577", 1),
            ("=$FOO", 1),
            ("=1e400", 1),
            ("=2*1.8E309", 3),
        ];

        for (src, position) in cases {
            match parse_formula(src) {
                Err(FormulaError::Parse { position: p, .. }) => {
                    assert_eq!(p, position, "position for {:?}", src)
                }
                other => panic!("expected parse error for {:?}, got {:?}", src, other),
            }
        }
    }

    /// Records the order in which grammar actions fire
    #[derive(Default)]
    struct Trace(Vec<String>);

    impl FormulaHandler for Trace {
        type Output = ();

        fn number(&mut self, value: f64) {
            self.0.push(format!("num {}", value));
        }
        fn text(&mut self, value: String) {
            self.0.push(format!("text {}", value));
        }
        fn boolean(&mut self, value: bool) {
            self.0.push(format!("bool {}", value));
        }
        fn error(&mut self, kind: ErrorKind) {
            self.0.push(format!("error {}", kind));
        }
        fn cell(&mut self, address: CellAddress) {
            self.0.push(format!("cell {}", address));
        }
        fn range(&mut self, range: CellRange) {
            self.0.push(format!("range {}", range));
        }
        fn call(&mut self, name: &str, args: Vec<()>) {
            self.0.push(format!("call {}/{}", name, args.len()));
        }
        fn unary(&mut self, op: UnaryOperator, _: ()) {
            self.0.push(format!("unary {:?}", op));
        }
        fn binary(&mut self, op: BinaryOperator, _: (), _: ()) {
            self.0.push(format!("binary {}", op.symbol()));
        }
    }

    #[test]
    fn test_actions_fire_in_evaluation_order() {
        let mut trace = Trace::default();
        parse_with("=A1*2+SUM(B2:A1,-3%)", &mut trace).unwrap();

        assert_eq!(
            trace.0,
            [
                "cell A1",
                "num 2",
                "binary *",
                "range A1:B2",
                "num 3",
                "unary Percent",
                "unary Negate",
                "call SUM/2",
                "binary +",
            ]
        );
    }
}
