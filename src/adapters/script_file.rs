// SPDX-License-Identifier: MIT OR Apache-2.0

//! Python-style settings module parser.
//!
//! Settings modules are files of top-level assignments such as
//!
//! ```text
//! DEBUG = False
//! ALLOWED_HOSTS: list = [
//!     "localhost",
//!     "127.0.0.1",
//! ]
//! ```
//!
//! [`ScriptParser`] reads the assignments whose right-hand side is a literal. The file
//! is never executed: statements that are not top-level assignments are skipped, and
//! assignments of anything but a literal are skipped with a warning.

use crate::domain::{Result, SettingsError, Value};
use crate::ports::ConfigParser;
use std::collections::BTreeMap;

/// Parser for Python-style settings modules.
///
/// Supported literals: `None`, `True`, `False`, integers (including hex, octal and
/// binary), floats, imaginary numbers, strings and bytes (with prefixes, escapes,
/// triple quotes and implicit concatenation), lists, tuples, dicts with string keys,
/// sets, and the calls `range(..)`, `set(..)` and `frozenset(..)` with literal
/// arguments. Unary minus and `+`/`-` between literals are evaluated.
///
/// Annotated assignments (`NAME: T = value`) and chained assignments
/// (`A = B = value`) are supported. Indented statements belong to a block and are
/// skipped.
///
/// # Examples
///
/// ```rust
/// use hexsettings::adapters::ScriptParser;
/// use hexsettings::domain::Value;
/// use hexsettings::ports::ConfigParser;
///
/// let parsed = ScriptParser::new()
///     .parse("import os\nPORT: int = 8080\nHOSTS = ['a', 'b']\n")
///     .unwrap();
/// let map = parsed.as_map().unwrap();
/// assert_eq!(map["PORT"], Value::Int(8080));
/// assert_eq!(map["HOSTS"], Value::from(vec!["a", "b"]));
/// assert!(!map.contains_key("os"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptParser;

impl ScriptParser {
    /// Creates a new script parser.
    pub fn new() -> Self {
        ScriptParser
    }
}

impl ConfigParser for ScriptParser {
    fn parse(&self, content: &str) -> Result<Value> {
        let tokens = Lexer::new(content).tokenize()?;

        let mut values = BTreeMap::new();
        let mut skipped = 0usize;
        for (line, statement) in split_statements(&tokens) {
            match assignment(statement) {
                Statement::Empty => {}
                Statement::Assign(targets, value) => {
                    for target in targets {
                        values.insert(target, value.clone());
                    }
                }
                Statement::Other(reason) => {
                    skipped += 1;
                    tracing::debug!(line, "Skipping statement: {}", reason);
                }
                Statement::Unsupported(target, reason) => {
                    skipped += 1;
                    tracing::warn!(
                        line,
                        "Skipping `{}`: the assigned value is not a literal ({})",
                        target,
                        reason
                    );
                }
            }
        }

        tracing::debug!(
            "Parsed {} assignments, skipped {} statements",
            values.len(),
            skipped
        );
        Ok(Value::Map(values))
    }

    fn supported_extensions(&self) -> &[&str] {
        &["py"]
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Name(String),
    Int(i64),
    Float(f64),
    Imaginary(f64),
    Str(String),
    Bytes(Vec<u8>),
    /// A token that is valid but cannot be evaluated as a literal.
    Unsupported(String),
    Op(String),
    /// Leading whitespace of a logical line.
    Indent,
    Newline,
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    depth: usize,
    at_line_start: bool,
    tokens: Vec<(Token, usize)>,
}

const TWO_CHAR_OPS: &[&str] = &[
    "==", "!=", "<=", ">=", "**", "//", "->", ":=", "+=", "-=", "*=", "/=", "%=", "&=", "|=",
    "^=", "<<", ">>", "@=",
];

impl Lexer {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            depth: 0,
            at_line_start: true,
            tokens: Vec::new(),
        }
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn push(&mut self, token: Token) {
        self.at_line_start = false;
        self.tokens.push((token, self.line));
    }

    fn error(&self, message: &str) -> SettingsError {
        SettingsError::ParseError {
            message: format!("line {}: {}", self.line, message),
            source: None,
        }
    }

    fn tokenize(mut self) -> Result<Vec<(Token, usize)>> {
        while let Some(c) = self.peek(0) {
            if self.at_line_start && self.depth == 0 && (c == ' ' || c == '\t') {
                self.push(Token::Indent);
                continue;
            }
            match c {
                ' ' | '\t' | '\r' | '\x0c' => self.pos += 1,
                '\n' => {
                    if self.depth == 0 {
                        self.push(Token::Newline);
                        self.at_line_start = true;
                    }
                    self.pos += 1;
                    self.line += 1;
                }
                ';' if self.depth == 0 => {
                    self.push(Token::Newline);
                    self.pos += 1;
                }
                '#' => {
                    while self.peek(0).is_some_and(|c| c != '\n') {
                        self.pos += 1;
                    }
                }
                '\\' if self.peek(1) == Some('\n') => {
                    self.pos += 2;
                    self.line += 1;
                }
                '\'' | '"' => {
                    let token = self.string("")?;
                    self.push(token);
                }
                c if c.is_ascii_digit() => {
                    let token = self.number();
                    self.push(token);
                }
                '.' if self.peek(1).is_some_and(|c| c.is_ascii_digit()) => {
                    let token = self.number();
                    self.push(token);
                }
                c if c.is_alphabetic() || c == '_' => {
                    let start = self.pos;
                    while self.peek(0).is_some_and(|c| c.is_alphanumeric() || c == '_') {
                        self.pos += 1;
                    }
                    let name: String = self.chars[start..self.pos].iter().collect();
                    if is_string_prefix(&name) && matches!(self.peek(0), Some('\'' | '"')) {
                        let token = self.string(&name)?;
                        self.push(token);
                    } else {
                        self.push(Token::Name(name));
                    }
                }
                _ => {
                    match c {
                        '(' | '[' | '{' => self.depth += 1,
                        ')' | ']' | '}' => self.depth = self.depth.saturating_sub(1),
                        _ => {}
                    }
                    let pair: String = self.chars[self.pos..(self.pos + 2).min(self.chars.len())]
                        .iter()
                        .collect();
                    if TWO_CHAR_OPS.contains(&pair.as_str()) {
                        self.pos += 2;
                        self.push(Token::Op(pair));
                    } else {
                        self.pos += 1;
                        self.push(Token::Op(c.to_string()));
                    }
                }
            }
        }
        self.push(Token::Newline);
        Ok(self.tokens)
    }

    fn number(&mut self) -> Token {
        let start = self.pos;
        let radix = match (self.peek(0), self.peek(1).map(|c| c.to_ascii_lowercase())) {
            (Some('0'), Some('x')) => Some(16),
            (Some('0'), Some('o')) => Some(8),
            (Some('0'), Some('b')) => Some(2),
            _ => None,
        };

        if let Some(radix) = radix {
            self.pos += 2;
            let digits_start = self.pos;
            while self.peek(0).is_some_and(|c| c.is_ascii_alphanumeric() || c == '_') {
                self.pos += 1;
            }
            let digits: String = self.chars[digits_start..self.pos]
                .iter()
                .filter(|c| **c != '_')
                .collect();
            return match i64::from_str_radix(&digits, radix) {
                Ok(n) => Token::Int(n),
                Err(e) => Token::Unsupported(format!("integer literal: {}", e)),
            };
        }

        let mut is_float = false;
        self.digits();
        if self.peek(0) == Some('.') {
            is_float = true;
            self.pos += 1;
            self.digits();
        }
        if matches!(self.peek(0), Some('e' | 'E')) {
            let sign = usize::from(matches!(self.peek(1), Some('+' | '-')));
            if self.peek(1 + sign).is_some_and(|c| c.is_ascii_digit()) {
                is_float = true;
                self.pos += 1 + sign;
                self.digits();
            }
        }
        let text: String = self.chars[start..self.pos]
            .iter()
            .filter(|c| **c != '_')
            .collect();

        if matches!(self.peek(0), Some('j' | 'J')) {
            self.pos += 1;
            return match text.parse::<f64>() {
                Ok(im) => Token::Imaginary(im),
                Err(e) => Token::Unsupported(format!("imaginary literal: {}", e)),
            };
        }
        if is_float {
            match text.parse::<f64>() {
                Ok(f) => Token::Float(f),
                Err(e) => Token::Unsupported(format!("float literal: {}", e)),
            }
        } else {
            match text.parse::<i64>() {
                Ok(n) => Token::Int(n),
                Err(e) => Token::Unsupported(format!("integer literal: {}", e)),
            }
        }
    }

    fn digits(&mut self) {
        while self.peek(0).is_some_and(|c| c.is_ascii_digit() || c == '_') {
            self.pos += 1;
        }
    }

    fn string(&mut self, prefix: &str) -> Result<Token> {
        let prefix = prefix.to_ascii_lowercase();
        let raw = prefix.contains('r');
        let bytes = prefix.contains('b');
        let formatted = prefix.contains('f');

        let quote = self.peek(0).ok_or_else(|| self.error("unexpected end of input"))?;
        let triple = self.peek(1) == Some(quote) && self.peek(2) == Some(quote);
        self.pos += if triple { 3 } else { 1 };

        let mut text = String::new();
        loop {
            let c = self
                .peek(0)
                .ok_or_else(|| self.error("unterminated string literal"))?;
            if c == quote
                && (!triple || (self.peek(1) == Some(quote) && self.peek(2) == Some(quote)))
            {
                self.pos += if triple { 3 } else { 1 };
                break;
            }
            if c == '\n' {
                if !triple {
                    return Err(self.error("unterminated string literal"));
                }
                self.line += 1;
            }
            if c == '\\' {
                let escaped = self
                    .peek(1)
                    .ok_or_else(|| self.error("unterminated string literal"))?;
                self.pos += 2;
                if escaped == '\n' {
                    self.line += 1;
                }
                if raw {
                    text.push('\\');
                    text.push(escaped);
                } else {
                    self.escape(escaped, bytes, &mut text)?;
                }
                continue;
            }
            text.push(c);
            self.pos += 1;
        }

        if formatted {
            return Ok(Token::Unsupported("formatted string".to_string()));
        }
        if bytes {
            let data = text
                .chars()
                .map(|c| u8::try_from(u32::from(c)))
                .collect::<std::result::Result<Vec<u8>, _>>()
                .map_err(|_| self.error("bytes can only contain ASCII literal characters"))?;
            return Ok(Token::Bytes(data));
        }
        Ok(Token::Str(text))
    }

    fn escape(&mut self, escaped: char, bytes: bool, text: &mut String) -> Result<()> {
        let simple = match escaped {
            '\n' => return Ok(()),
            'n' => Some('\n'),
            't' => Some('\t'),
            'r' => Some('\r'),
            '0' => Some('\0'),
            'a' => Some('\x07'),
            'b' => Some('\x08'),
            'f' => Some('\x0c'),
            'v' => Some('\x0b'),
            '\\' | '\'' | '"' => Some(escaped),
            _ => None,
        };
        if let Some(c) = simple {
            text.push(c);
            return Ok(());
        }

        let width = match escaped {
            'x' => 2,
            'u' if !bytes => 4,
            'U' if !bytes => 8,
            _ => {
                text.push('\\');
                text.push(escaped);
                return Ok(());
            }
        };
        let end = self.pos + width;
        let hex: String = self
            .chars
            .get(self.pos..end)
            .ok_or_else(|| self.error("truncated escape sequence"))?
            .iter()
            .collect();
        let c = u32::from_str_radix(&hex, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| self.error("invalid escape sequence"))?;
        self.pos = end;
        text.push(c);
        Ok(())
    }
}

fn is_string_prefix(name: &str) -> bool {
    matches!(
        name.to_ascii_lowercase().as_str(),
        "r" | "b" | "u" | "f" | "br" | "rb" | "fr" | "rf"
    )
}

fn split_statements(tokens: &[(Token, usize)]) -> Vec<(usize, Vec<Token>)> {
    let mut statements = Vec::new();
    let mut current = Vec::new();
    let mut line = 1;
    for (token, token_line) in tokens {
        if *token == Token::Newline {
            if !current.is_empty() {
                statements.push((line, std::mem::take(&mut current)));
            }
            continue;
        }
        if current.is_empty() {
            line = *token_line;
        }
        current.push(token.clone());
    }
    statements
}

enum Statement {
    Empty,
    Assign(Vec<String>, Value),
    Other(String),
    Unsupported(String, String),
}

fn is_op(token: &Token, op: &str) -> bool {
    matches!(token, Token::Op(o) if o == op)
}

fn assignment(tokens: Vec<Token>) -> Statement {
    match tokens.first() {
        None => return Statement::Empty,
        Some(Token::Indent) if tokens.len() == 1 => return Statement::Empty,
        Some(Token::Indent) => return Statement::Other("not at the top level".to_string()),
        _ => {}
    }

    // Split on `=` at bracket depth zero
    let mut parts: Vec<&[Token]> = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::Op(o) if matches!(o.as_str(), "(" | "[" | "{") => depth += 1,
            Token::Op(o) if matches!(o.as_str(), ")" | "]" | "}") => {
                depth = depth.saturating_sub(1)
            }
            Token::Op(o) if o == "=" && depth == 0 => {
                parts.push(&tokens[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if parts.is_empty() {
        return match tokens.as_slice() {
            [Token::Name(_), Token::Op(colon), ..] if colon == ":" => {
                Statement::Other("annotation without a value".to_string())
            }
            _ => Statement::Other("not an assignment".to_string()),
        };
    }
    let expression = &tokens[start..];

    let mut names = Vec::new();
    for (i, target) in parts.into_iter().enumerate() {
        match target {
            [Token::Name(name)] => names.push(name.clone()),
            // Only the first target may carry an annotation
            [Token::Name(name), Token::Op(colon), ..] if colon == ":" && i == 0 => {
                names.push(name.clone())
            }
            _ => return Statement::Other("assignment to something other than a name".to_string()),
        }
    }

    let mut parser = ExprParser {
        tokens: expression,
        pos: 0,
    };
    match parser.expression_list() {
        Ok(value) => Statement::Assign(names, value),
        Err(reason) => Statement::Unsupported(names.join(" = "), reason),
    }
}

type ExprResult = std::result::Result<Value, String>;

struct ExprParser<'t> {
    tokens: &'t [Token],
    pos: usize,
}

impl ExprParser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_op(&self, op: &str) -> bool {
        self.peek().is_some_and(|t| is_op(t, op))
    }

    fn expect_op(&mut self, op: &str) -> std::result::Result<(), String> {
        if self.peek_op(op) {
            self.pos += 1;
            Ok(())
        } else {
            Err(format!("expected `{}`", op))
        }
    }

    fn unexpected(&self) -> String {
        match self.peek() {
            Some(Token::Name(name)) => format!("name `{}`", name),
            Some(Token::Op(op)) => format!("unexpected `{}`", op),
            Some(Token::Unsupported(what)) => what.clone(),
            Some(_) => "unexpected token".to_string(),
            None => "unexpected end of statement".to_string(),
        }
    }

    /// `a, b` at the top of an assignment is a tuple.
    fn expression_list(&mut self) -> ExprResult {
        let first = self.expression()?;
        if !self.peek_op(",") {
            return self.finish(first);
        }
        let mut items = vec![first];
        while self.peek_op(",") {
            self.pos += 1;
            if self.peek().is_none() {
                break;
            }
            items.push(self.expression()?);
        }
        self.finish(Value::Tuple(items))
    }

    fn finish(&self, value: Value) -> ExprResult {
        if self.pos == self.tokens.len() {
            Ok(value)
        } else {
            Err(self.unexpected())
        }
    }

    fn expression(&mut self) -> ExprResult {
        let mut value = self.unary()?;
        loop {
            if self.peek_op("+") {
                self.pos += 1;
                let rhs = self.unary()?;
                value = add(value, rhs)?;
            } else if self.peek_op("-") {
                self.pos += 1;
                let rhs = negate(self.unary()?)?;
                value = add(value, rhs)?;
            } else {
                return Ok(value);
            }
        }
    }

    fn unary(&mut self) -> ExprResult {
        if self.peek_op("-") {
            self.pos += 1;
            return negate(self.unary()?);
        }
        if self.peek_op("+") {
            self.pos += 1;
            let value = self.unary()?;
            return match value {
                Value::Int(_) | Value::Float(_) | Value::Complex { .. } => Ok(value),
                other => Err(format!("unary `+` on `{}`", other.kind())),
            };
        }
        self.atom()
    }

    fn atom(&mut self) -> ExprResult {
        let token = self.peek().cloned().ok_or_else(|| self.unexpected())?;
        match token {
            Token::Int(n) => {
                self.pos += 1;
                Ok(Value::Int(n))
            }
            Token::Float(f) => {
                self.pos += 1;
                Ok(Value::Float(f))
            }
            Token::Imaginary(im) => {
                self.pos += 1;
                Ok(Value::Complex { re: 0.0, im })
            }
            Token::Str(s) => {
                self.pos += 1;
                let mut text = s;
                while let Some(Token::Str(next)) = self.peek() {
                    text.push_str(next);
                    self.pos += 1;
                }
                Ok(Value::Str(text))
            }
            Token::Bytes(b) => {
                self.pos += 1;
                let mut data = b;
                while let Some(Token::Bytes(next)) = self.peek() {
                    data.extend_from_slice(next);
                    self.pos += 1;
                }
                Ok(Value::Bytes(data))
            }
            Token::Name(name) => {
                self.pos += 1;
                match name.as_str() {
                    "None" => Ok(Value::None),
                    "True" => Ok(Value::Bool(true)),
                    "False" => Ok(Value::Bool(false)),
                    "range" | "set" | "frozenset" if self.peek_op("(") => self.call(&name),
                    _ => {
                        self.pos -= 1;
                        Err(self.unexpected())
                    }
                }
            }
            Token::Op(op) => match op.as_str() {
                "(" => self.parenthesized(),
                "[" => {
                    self.pos += 1;
                    Ok(Value::List(self.items("]")?))
                }
                "{" => self.braced(),
                _ => Err(self.unexpected()),
            },
            _ => Err(self.unexpected()),
        }
    }

    /// Comma separated expressions up to `close`, trailing comma allowed.
    fn items(&mut self, close: &str) -> std::result::Result<Vec<Value>, String> {
        let mut items = Vec::new();
        loop {
            if self.peek_op(close) {
                self.pos += 1;
                return Ok(items);
            }
            items.push(self.expression()?);
            if !self.peek_op(close) {
                self.expect_op(",")?;
            }
        }
    }

    fn parenthesized(&mut self) -> ExprResult {
        self.pos += 1;
        if self.peek_op(")") {
            self.pos += 1;
            return Ok(Value::Tuple(Vec::new()));
        }
        let first = self.expression()?;
        if self.peek_op(")") {
            self.pos += 1;
            return Ok(first);
        }
        self.expect_op(",")?;
        let mut items = vec![first];
        items.extend(self.items(")")?);
        Ok(Value::Tuple(items))
    }

    fn braced(&mut self) -> ExprResult {
        self.pos += 1;
        if self.peek_op("}") {
            self.pos += 1;
            return Ok(Value::Map(BTreeMap::new()));
        }
        let first = self.expression()?;
        if !self.peek_op(":") {
            let mut items = vec![first];
            if !self.peek_op("}") {
                self.expect_op(",")?;
                items.extend(self.items("}")?);
            } else {
                self.pos += 1;
            }
            return Ok(Value::Set(unique(items)));
        }

        let mut map = BTreeMap::new();
        let mut key = first;
        loop {
            self.expect_op(":")?;
            let Value::Str(name) = key else {
                return Err(format!("dict key of type `{}`", key.kind()));
            };
            map.insert(name, self.expression()?);
            if !self.peek_op("}") {
                self.expect_op(",")?;
            }
            if self.peek_op("}") {
                self.pos += 1;
                return Ok(Value::Map(map));
            }
            key = self.expression()?;
        }
    }

    fn call(&mut self, name: &str) -> ExprResult {
        self.pos += 1;
        let args = self.items(")")?;
        match (name, args.as_slice()) {
            ("range", [Value::Int(stop)]) => Ok(Value::Range {
                start: 0,
                stop: *stop,
                step: 1,
            }),
            ("range", [Value::Int(start), Value::Int(stop)]) => Ok(Value::Range {
                start: *start,
                stop: *stop,
                step: 1,
            }),
            ("range", [Value::Int(start), Value::Int(stop), Value::Int(step)]) if *step != 0 => {
                Ok(Value::Range {
                    start: *start,
                    stop: *stop,
                    step: *step,
                })
            }
            ("set", []) => Ok(Value::Set(Vec::new())),
            ("frozenset", []) => Ok(Value::FrozenSet(Vec::new())),
            ("set" | "frozenset", [iterable]) => {
                let items = match iterable {
                    Value::List(items)
                    | Value::Tuple(items)
                    | Value::Set(items)
                    | Value::FrozenSet(items) => items.clone(),
                    Value::Str(s) => s.chars().map(|c| Value::Str(c.to_string())).collect(),
                    other => return Err(format!("`{}` of `{}`", name, other.kind())),
                };
                let items = unique(items);
                Ok(if name == "set" {
                    Value::Set(items)
                } else {
                    Value::FrozenSet(items)
                })
            }
            _ => Err(format!("unsupported arguments to `{}`", name)),
        }
    }
}

fn unique(items: Vec<Value>) -> Vec<Value> {
    let mut result: Vec<Value> = Vec::with_capacity(items.len());
    for item in items {
        if !result.contains(&item) {
            result.push(item);
        }
    }
    result
}

fn negate(value: Value) -> ExprResult {
    match value {
        Value::Int(n) => n
            .checked_neg()
            .map(Value::Int)
            .ok_or_else(|| "integer overflow".to_string()),
        Value::Float(f) => Ok(Value::Float(-f)),
        Value::Complex { re, im } => Ok(Value::Complex { re: -re, im: -im }),
        other => Err(format!("unary `-` on `{}`", other.kind())),
    }
}

fn as_complex(value: &Value) -> Option<(f64, f64)> {
    match value {
        Value::Int(n) => Some((*n as f64, 0.0)),
        Value::Float(f) => Some((*f, 0.0)),
        Value::Complex { re, im } => Some((*re, *im)),
        _ => None,
    }
}

fn add(left: Value, right: Value) -> ExprResult {
    let complex = matches!(left, Value::Complex { .. }) || matches!(right, Value::Complex { .. });
    if complex {
        if let (Some((r1, i1)), Some((r2, i2))) = (as_complex(&left), as_complex(&right)) {
            return Ok(Value::Complex {
                re: r1 + r2,
                im: i1 + i2,
            });
        }
    }
    left.concat(right).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> BTreeMap<String, Value> {
        match ScriptParser::new().parse(content).unwrap() {
            Value::Map(map) => map,
            other => panic!("expected a mapping, got {:?}", other),
        }
    }

    #[test]
    fn test_script_parser_scalars() {
        let map = parse(
            "A = None\nB = True\nC = False\nD = 42\nE = -1.5e3\nF = 0x1F\nG = 1_000\nH = 2j\nI = 'x'\n",
        );
        assert_eq!(map["A"], Value::None);
        assert_eq!(map["B"], Value::Bool(true));
        assert_eq!(map["C"], Value::Bool(false));
        assert_eq!(map["D"], Value::Int(42));
        assert_eq!(map["E"], Value::Float(-1500.0));
        assert_eq!(map["F"], Value::Int(31));
        assert_eq!(map["G"], Value::Int(1000));
        assert_eq!(map["H"], Value::Complex { re: 0.0, im: 2.0 });
        assert_eq!(map["I"], Value::from("x"));
    }

    #[test]
    fn test_script_parser_strings() {
        let map = parse(concat!(
            "A = \"tab\\there\"\n",
            "B = r'\\d+'\n",
            "C = b'\\x00ab'\n",
            "D = 'con' \"cat\"\n",
            "E = '''multi\nline'''\n",
            "F = '\\u00e9'\n",
        ));
        assert_eq!(map["A"], Value::from("tab\there"));
        assert_eq!(map["B"], Value::from("\\d+"));
        assert_eq!(map["C"], Value::Bytes(vec![0, b'a', b'b']));
        assert_eq!(map["D"], Value::from("concat"));
        assert_eq!(map["E"], Value::from("multi\nline"));
        assert_eq!(map["F"], Value::from("é"));
    }

    #[test]
    fn test_script_parser_containers() {
        let map = parse(concat!(
            "HOSTS = [\n",
            "    'localhost',  # primary\n",
            "    '127.0.0.1',\n",
            "]\n",
            "PAIR = (1, 'a')\n",
            "SINGLE = (1,)\n",
            "BARE = 1, 2\n",
            "DB = {'HOST': 'db', 'PORT': 5432}\n",
            "TAGS = {'a', 'b', 'a'}\n",
            "EMPTY = {}\n",
        ));
        assert_eq!(map["HOSTS"], Value::from(vec!["localhost", "127.0.0.1"]));
        assert_eq!(
            map["PAIR"],
            Value::Tuple(vec![Value::Int(1), Value::from("a")])
        );
        assert_eq!(map["SINGLE"], Value::Tuple(vec![Value::Int(1)]));
        assert_eq!(map["BARE"], Value::Tuple(vec![Value::Int(1), Value::Int(2)]));
        let db = map["DB"].as_map().unwrap();
        assert_eq!(db["PORT"], Value::Int(5432));
        assert_eq!(
            map["TAGS"],
            Value::Set(vec![Value::from("a"), Value::from("b")])
        );
        assert_eq!(map["EMPTY"], Value::Map(BTreeMap::new()));
    }

    #[test]
    fn test_script_parser_calls_and_arithmetic() {
        let map = parse("R = range(1, 10, 2)\nS = frozenset([1, 1])\nC = 1 + 2j\nN = 60 * 60\nT = 'a' + 'b'\n");
        assert_eq!(
            map["R"],
            Value::Range {
                start: 1,
                stop: 10,
                step: 2
            }
        );
        assert_eq!(map["S"], Value::FrozenSet(vec![Value::Int(1)]));
        assert_eq!(map["C"], Value::Complex { re: 1.0, im: 2.0 });
        assert_eq!(map["T"], Value::from("ab"));
        // Multiplication is not evaluated
        assert!(!map.contains_key("N"));
    }

    #[test]
    fn test_script_parser_annotations_and_chains() {
        let map = parse("PORT: int = 8080\nHOSTS: List[str] = []\nONLY: int\nA = B = 'same'\n");
        assert_eq!(map["PORT"], Value::Int(8080));
        assert_eq!(map["HOSTS"], Value::List(Vec::new()));
        assert!(!map.contains_key("ONLY"));
        assert_eq!(map["A"], Value::from("same"));
        assert_eq!(map["B"], Value::from("same"));
    }

    #[test]
    fn test_script_parser_skips_code() {
        let map = parse(concat!(
            "import os\n",
            "from pathlib import Path\n",
            "BASE = Path(__file__)\n",
            "HOME = os.environ['HOME']\n",
            "NAME = f'{BASE}'\n",
            "def helper():\n",
            "    INNER = 1\n",
            "    return INNER\n",
            "\n",
            "class Nested:\n",
            "    VALUE = 2\n",
            "X = 1; Y = 2\n",
            "X += 1\n",
            "LAST = 'kept'\n",
        ));
        assert_eq!(
            map.keys().cloned().collect::<Vec<_>>(),
            vec!["LAST".to_string(), "X".to_string(), "Y".to_string()]
        );
        assert_eq!(map["X"], Value::Int(1));
    }

    #[test]
    fn test_script_parser_later_assignment_wins() {
        let map = parse("DEBUG = True\nDEBUG = False\n");
        assert_eq!(map["DEBUG"], Value::Bool(false));
    }

    #[test]
    fn test_script_parser_syntax_errors() {
        let parser = ScriptParser::new();
        let err = parser.parse("A = 'unterminated\n").unwrap_err();
        assert!(matches!(err, SettingsError::ParseError { .. }));
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_script_parser_supported_extensions() {
        assert!(ScriptParser::new().supports_extension("py"));
        assert!(!ScriptParser::new().supports_extension("pyc"));
    }
}
