//! Evaluation of `securethis.config.ts` modules.
//!
//! Config files look like TypeScript so editors can type-check them, but they
//! are never executed. Only a restricted grammar is accepted:
//!
//! - `import ...;` statements (skipped)
//! - `export const config[: Type] = <literal> [as const | satisfies Type][;]`
//! - `export default <literal> [as const | satisfies Type][;]`
//!
//! Literals are objects, arrays, strings, numbers, booleans and `null`. Object
//! keys may be bare identifiers and trailing commas are allowed. Identifiers
//! in value position, spreads, calls and template interpolation are rejected.
//!
//! A named `config` export takes precedence over `export default`.

use serde_json::{Map, Number, Value};

/// Name of the export the loader looks for.
pub const CONFIG_EXPORT_NAME: &str = "config";

/// Deepest object/array nesting accepted, matching serde_json's recursion limit.
const MAX_NESTING_DEPTH: usize = 128;

/// An evaluation failure, located in the module source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleError {
    /// 1-based line
    pub line: usize,
    /// 1-based column, in characters
    pub column: usize,
    pub message: String,
}

impl std::fmt::Display for ModuleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}: {}", self.line, self.column, self.message)
    }
}

impl std::error::Error for ModuleError {}

/// Evaluate a config module and return the value it exports.
pub fn evaluate_module(source: &str) -> Result<Value, ModuleError> {
    ModuleParser::new(source).parse_module()
}

struct ModuleParser {
    chars: Vec<char>,
    pos: usize,
    depth: usize,
}

impl ModuleParser {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            depth: 0,
        }
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn parse_module(&mut self) -> Result<Value, ModuleError> {
        let mut named: Option<Value> = None;
        let mut default: Option<Value> = None;

        loop {
            self.skip_trivia()?;
            let Some(c) = self.peek() else { break };

            if c == ';' {
                self.bump();
            } else if self.eat_keyword("import") {
                self.skip_import()?;
            } else if self.eat_keyword("export") {
                self.skip_trivia()?;
                if self.eat_keyword("default") {
                    let start = self.pos;
                    let value = self.parse_initializer()?;
                    if default.replace(value).is_some() {
                        return Err(self.error_at(start, "duplicate default export"));
                    }
                } else if self.eat_keyword("const") {
                    self.skip_trivia()?;
                    let start = self.pos;
                    let name = self
                        .ident()
                        .ok_or_else(|| self.error("expected a binding name after `const`"))?;
                    self.skip_trivia()?;
                    if self.peek() == Some(':') {
                        self.bump();
                        self.skip_type()?;
                        self.skip_trivia()?;
                    }
                    self.expect('=')?;
                    let value = self.parse_initializer()?;
                    if name == CONFIG_EXPORT_NAME && named.replace(value).is_some() {
                        return Err(self.error_at(start, "duplicate `config` export"));
                    }
                } else {
                    return Err(self.error(
                        "only `export const` and `export default` are supported",
                    ));
                }
            } else {
                return Err(self.error(
                    "unsupported statement: config modules may only contain imports and exported literals",
                ));
            }
        }

        named.or(default).ok_or_else(|| {
            self.error("module does not export `config` or a default value")
        })
    }

    /// Skip an import statement, ending at `;` or at the line break that
    /// follows the module specifier.
    fn skip_import(&mut self) -> Result<(), ModuleError> {
        let mut depth = 0usize;
        let mut seen_specifier = false;
        while let Some(c) = self.peek() {
            if self.at_comment() {
                self.skip_comment()?;
                continue;
            }
            match c {
                ';' => {
                    self.bump();
                    return Ok(());
                }
                '\n' if depth == 0 && seen_specifier => return Ok(()),
                '\'' | '"' => {
                    self.parse_string()?;
                    seen_specifier = true;
                }
                '{' => {
                    depth += 1;
                    self.bump();
                }
                '}' => {
                    depth = depth.saturating_sub(1);
                    self.bump();
                }
                _ => {
                    self.bump();
                }
            }
        }
        Ok(())
    }

    /// `<literal> [as const | as Type | satisfies Type] [;]`
    fn parse_initializer(&mut self) -> Result<Value, ModuleError> {
        let value = self.parse_value()?;
        self.skip_trivia()?;
        if self.eat_keyword("as") {
            self.skip_trivia()?;
            if !self.eat_keyword("const") {
                self.skip_type()?;
            }
        } else if self.eat_keyword("satisfies") {
            self.skip_type()?;
        }
        self.skip_trivia()?;
        if self.peek() == Some(';') {
            self.bump();
        }
        Ok(value)
    }

    /// Skip a type reference such as `SecureThisConfig`, `ns.Config` or
    /// `Readonly<SecureThisConfig>`.
    fn skip_type(&mut self) -> Result<(), ModuleError> {
        self.skip_trivia()?;
        self.ident()
            .ok_or_else(|| self.error("expected a type name"))?;
        while self.peek() == Some('.') {
            self.bump();
            self.ident()
                .ok_or_else(|| self.error("expected a type name after `.`"))?;
        }
        if self.peek() == Some('<') {
            let mut depth = 0usize;
            while let Some(c) = self.bump() {
                match c {
                    '<' => depth += 1,
                    '>' => {
                        depth -= 1;
                        if depth == 0 {
                            return Ok(());
                        }
                    }
                    _ => {}
                }
            }
            return Err(self.error("unterminated type arguments"));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Literals
    // ------------------------------------------------------------------

    fn parse_value(&mut self) -> Result<Value, ModuleError> {
        self.skip_trivia()?;
        match self.peek() {
            None => Err(self.error("unexpected end of file, expected a value")),
            Some('{') => self.nested(Self::parse_object),
            Some('[') => self.nested(Self::parse_array),
            Some('"' | '\'' | '`') => self.parse_string().map(Value::String),
            Some(c) if c == '-' || c == '.' || c.is_ascii_digit() => self.parse_number(),
            Some(c) if is_ident_start(c) => {
                let start = self.pos;
                let word = self.ident().unwrap_or_default();
                match word.as_str() {
                    "true" => Ok(Value::Bool(true)),
                    "false" => Ok(Value::Bool(false)),
                    "null" => Ok(Value::Null),
                    _ => Err(self.error_at(
                        start,
                        format!("`{word}` is not a literal; config values cannot reference identifiers"),
                    )),
                }
            }
            Some(c) => Err(self.error(format!("unexpected character `{c}`"))),
        }
    }

    fn nested(
        &mut self,
        parse: fn(&mut Self) -> Result<Value, ModuleError>,
    ) -> Result<Value, ModuleError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(self.error("nesting too deep"));
        }
        self.depth += 1;
        let value = parse(self);
        self.depth -= 1;
        value
    }

    fn parse_object(&mut self) -> Result<Value, ModuleError> {
        self.expect('{')?;
        let mut map = Map::new();
        loop {
            self.skip_trivia()?;
            let key = match self.peek() {
                Some('}') => {
                    self.bump();
                    break;
                }
                Some('"' | '\'') => self.parse_string()?,
                Some('.') => return Err(self.error("spread syntax is not supported")),
                Some(c) if is_ident_start(c) => self.ident().unwrap_or_default(),
                Some(c) if c.is_ascii_digit() => self.take_while(|c| c.is_ascii_digit()),
                _ => return Err(self.error("expected a property name or `}`")),
            };
            self.skip_trivia()?;
            self.expect(':')?;
            let value = self.parse_value()?;
            map.insert(key, value);

            self.skip_trivia()?;
            match self.bump() {
                Some(',') => {}
                Some('}') => break,
                _ => return Err(self.error_at(self.pos.saturating_sub(1), "expected `,` or `}`")),
            }
        }
        Ok(Value::Object(map))
    }

    fn parse_array(&mut self) -> Result<Value, ModuleError> {
        self.expect('[')?;
        let mut items = Vec::new();
        loop {
            self.skip_trivia()?;
            match self.peek() {
                Some(']') => {
                    self.bump();
                    break;
                }
                Some('.') if self.peek_at(1) == Some('.') => {
                    return Err(self.error("spread syntax is not supported"));
                }
                _ => {}
            }
            items.push(self.parse_value()?);

            self.skip_trivia()?;
            match self.bump() {
                Some(',') => {}
                Some(']') => break,
                _ => return Err(self.error_at(self.pos.saturating_sub(1), "expected `,` or `]`")),
            }
        }
        Ok(Value::Array(items))
    }

    fn parse_string(&mut self) -> Result<String, ModuleError> {
        let start = self.pos;
        let quote = self
            .bump()
            .ok_or_else(|| self.error("expected a string"))?;
        let mut out = String::new();
        loop {
            let c = self
                .bump()
                .ok_or_else(|| self.error_at(start, "unterminated string"))?;
            match c {
                c if c == quote => break,
                '\\' => {
                    let escaped = self
                        .bump()
                        .ok_or_else(|| self.error_at(start, "unterminated string"))?;
                    match escaped {
                        'n' => out.push('\n'),
                        't' => out.push('\t'),
                        'r' => out.push('\r'),
                        'b' => out.push('\u{8}'),
                        'f' => out.push('\u{c}'),
                        'v' => out.push('\u{b}'),
                        '0' if !self.peek().is_some_and(|c| c.is_ascii_digit()) => {
                            out.push('\0');
                        }
                        '0'..='9' => {
                            return Err(self.error_at(
                                self.pos - 2,
                                "octal and numeric escapes are not supported",
                            ));
                        }
                        'x' => {
                            let decoded = self
                                .read_hex(2)
                                .and_then(char::from_u32)
                                .ok_or_else(|| self.error("invalid hexadecimal escape"))?;
                            out.push(decoded);
                        }
                        'u' => out.push(self.parse_unicode_escape()?),
                        // line continuation
                        '\n' | '\u{2028}' | '\u{2029}' => {}
                        '\r' => {
                            if self.peek() == Some('\n') {
                                self.bump();
                            }
                        }
                        // Any other escaped character stands for itself.
                        other => out.push(other),
                    }
                }
                '\n' if quote != '`' => {
                    return Err(self.error_at(start, "unterminated string"));
                }
                '$' if quote == '`' && self.peek() == Some('{') => {
                    return Err(self.error("template interpolation is not supported"));
                }
                other => out.push(other),
            }
        }
        Ok(out)
    }

    fn parse_unicode_escape(&mut self) -> Result<char, ModuleError> {
        let code = if self.peek() == Some('{') {
            self.bump();
            let hex = self.take_while(|c| c.is_ascii_hexdigit());
            self.expect('}')?;
            u32::from_str_radix(&hex, 16).map_err(|_| self.error("invalid unicode escape"))?
        } else {
            self.read_hex4()?
        };

        if (0xD800..0xDC00).contains(&code)
            && self.peek() == Some('\\')
            && self.peek_at(1) == Some('u')
        {
            self.bump();
            self.bump();
            let low = self.read_hex4()?;
            if (0xDC00..0xE000).contains(&low) {
                let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                return char::from_u32(combined)
                    .ok_or_else(|| self.error("invalid surrogate pair"));
            }
            return Err(self.error("invalid surrogate pair"));
        }

        char::from_u32(code).ok_or_else(|| self.error("invalid unicode escape"))
    }

    fn read_hex4(&mut self) -> Result<u32, ModuleError> {
        self.read_hex(4)
            .ok_or_else(|| self.error("invalid unicode escape"))
    }

    /// Read exactly `digits` hex digits.
    fn read_hex(&mut self, digits: usize) -> Option<u32> {
        let mut code = 0;
        for _ in 0..digits {
            code = code * 16 + self.bump()?.to_digit(16)?;
        }
        Some(code)
    }

    fn parse_number(&mut self) -> Result<Value, ModuleError> {
        let start = self.pos;
        let negative = self.peek() == Some('-');
        if negative {
            self.bump();
        }

        if self.peek() == Some('0') && matches!(self.peek_at(1), Some('x' | 'X')) {
            self.bump();
            self.bump();
            let digits: String = self
                .take_while(|c| c.is_ascii_hexdigit() || c == '_')
                .replace('_', "");
            let parsed = i64::from_str_radix(&digits, 16)
                .map_err(|_| self.error_at(start, "invalid hexadecimal number"))?;
            return Ok(Value::Number(Number::from(if negative { -parsed } else { parsed })));
        }

        let mut text = String::new();
        if negative {
            text.push('-');
        }
        let mut prev = '\0';
        while let Some(c) = self.peek() {
            let accepted = c.is_ascii_digit()
                || c == '.'
                || c == '_'
                || c == 'e'
                || c == 'E'
                || ((c == '+' || c == '-') && (prev == 'e' || prev == 'E'));
            if !accepted {
                break;
            }
            self.bump();
            if c != '_' {
                text.push(c);
            }
            prev = c;
        }

        let invalid = || self.error_at(start, format!("invalid number `{text}`"));
        if text.contains(['.', 'e', 'E']) {
            let parsed: f64 = text.parse().map_err(|_| invalid())?;
            Number::from_f64(parsed).map(Value::Number).ok_or_else(invalid)
        } else if let Ok(int) = text.parse::<i64>() {
            Ok(Value::Number(Number::from(int)))
        } else if let Ok(uint) = text.parse::<u64>() {
            Ok(Value::Number(Number::from(uint)))
        } else {
            let parsed: f64 = text.parse().map_err(|_| invalid())?;
            Number::from_f64(parsed).map(Value::Number).ok_or_else(invalid)
        }
    }

    // ------------------------------------------------------------------
    // Cursor helpers
    // ------------------------------------------------------------------

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn expect(&mut self, expected: char) -> Result<(), ModuleError> {
        self.skip_trivia()?;
        if self.peek() == Some(expected) {
            self.bump();
            Ok(())
        } else {
            Err(self.error(format!("expected `{expected}`")))
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            out.push(c);
            self.pos += 1;
        }
        out
    }

    fn ident(&mut self) -> Option<String> {
        match self.peek() {
            Some(c) if is_ident_start(c) => Some(self.take_while(is_ident_continue)),
            _ => None,
        }
    }

    /// Consume `keyword` only when it is a whole word.
    fn eat_keyword(&mut self, keyword: &str) -> bool {
        let len = keyword.chars().count();
        let matches = keyword
            .chars()
            .enumerate()
            .all(|(i, k)| self.peek_at(i) == Some(k));
        if matches && !self.peek_at(len).is_some_and(is_ident_continue) {
            self.pos += len;
            true
        } else {
            false
        }
    }

    fn skip_trivia(&mut self) -> Result<(), ModuleError> {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('/') if self.at_comment() => self.skip_comment()?,
                _ => return Ok(()),
            }
        }
    }

    fn at_comment(&self) -> bool {
        self.peek() == Some('/') && matches!(self.peek_at(1), Some('/' | '*'))
    }

    /// Skip one comment. A line comment stops before its line break.
    fn skip_comment(&mut self) -> Result<(), ModuleError> {
        let start = self.pos;
        if self.peek_at(1) == Some('/') {
            while let Some(c) = self.peek() {
                if c == '\n' {
                    break;
                }
                self.bump();
            }
            return Ok(());
        }

        self.pos += 2;
        loop {
            match (self.peek(), self.peek_at(1)) {
                (Some('*'), Some('/')) => {
                    self.pos += 2;
                    return Ok(());
                }
                (Some(_), _) => {
                    self.bump();
                }
                (None, _) => return Err(self.error_at(start, "unterminated block comment")),
            }
        }
    }

    fn error(&self, message: impl Into<String>) -> ModuleError {
        self.error_at(self.pos, message)
    }

    fn error_at(&self, pos: usize, message: impl Into<String>) -> ModuleError {
        let mut line = 1;
        let mut column = 1;
        for &c in self.chars.iter().take(pos) {
            if c == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        ModuleError {
            line,
            column,
            message: message.into(),
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}
