//! Recursive-descent evaluator producing JSON values directly from tokens

use serde_json::{Map, Number, Value};

use crate::script::lexer::{Token, TokenKind};
use crate::script::{Bindings, EvalContext, ScriptError};

const CREDENTIAL_FN: &str = "get_api_key";
const BASE_URL_NAME: &str = "BASE_URL";

pub struct Evaluator<'t, 'c> {
    tokens: &'t [Token],
    pos: usize,
    ctx: &'c EvalContext<'c>,
    bindings: Bindings,
}

impl<'t, 'c> Evaluator<'t, 'c> {
    pub fn new(tokens: &'t [Token], ctx: &'c EvalContext<'c>) -> Self {
        Evaluator {
            tokens,
            pos: 0,
            ctx,
            bindings: Bindings::new(),
        }
    }

    /// Evaluate every statement in order
    pub fn run(mut self) -> Result<Bindings, ScriptError> {
        loop {
            match self.peek() {
                TokenKind::Eof => break,
                TokenKind::Newline => self.pos += 1,
                _ => self.statement()?,
            }
        }
        Ok(self.bindings)
    }

    fn peek(&self) -> &TokenKind {
        self.tokens
            .get(self.pos)
            .map(|t| &t.kind)
            .unwrap_or(&TokenKind::Eof)
    }

    fn line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|t| t.line)
            .unwrap_or(1)
    }

    fn next(&mut self) -> Token {
        let token = self.tokens.get(self.pos).cloned().unwrap_or(Token {
            kind: TokenKind::Eof,
            line: self.line(),
        });
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, kind: TokenKind, message: &str) -> Result<(), ScriptError> {
        if *self.peek() == kind {
            self.pos += 1;
            Ok(())
        } else {
            Err(ScriptError::syntax(self.line(), message))
        }
    }

    fn statement(&mut self) -> Result<(), ScriptError> {
        let token = self.next();
        let name = match token.kind {
            TokenKind::Name(name) => name,
            _ => return Err(ScriptError::syntax(token.line, "invalid syntax")),
        };
        if matches!(name.as_str(), "None" | "True" | "False") {
            return Err(ScriptError::syntax(
                token.line,
                format!("cannot assign to {}", name),
            ));
        }
        self.expect(TokenKind::Assign, "invalid syntax")?;

        let value = self.expression()?;
        match self.peek() {
            TokenKind::Newline | TokenKind::Eof => {}
            _ => return Err(ScriptError::syntax(self.line(), "invalid syntax")),
        }

        tracing::trace!(name = %name, "script binding");
        self.bindings.insert(name, value);
        Ok(())
    }

    fn expression(&mut self) -> Result<Value, ScriptError> {
        if *self.peek() == TokenKind::Minus {
            let line = self.line();
            self.pos += 1;
            let operand = self.expression()?;
            return negate(operand, line);
        }
        self.atom()
    }

    fn atom(&mut self) -> Result<Value, ScriptError> {
        let token = self.next();
        let line = token.line;
        match token.kind {
            TokenKind::Str { value, format } => {
                let mut text = self.string_piece(&value, format, line)?;
                while let TokenKind::Str { .. } = self.peek() {
                    if let TokenKind::Str { value, format } = self.next().kind {
                        text.push_str(&self.string_piece(&value, format, line)?);
                    }
                }
                Ok(Value::String(text))
            }
            TokenKind::Int(value) => Ok(Value::from(value)),
            TokenKind::UInt(value) => Ok(Value::from(value)),
            TokenKind::Float(value) => Number::from_f64(value)
                .map(Value::Number)
                .ok_or_else(|| ScriptError::type_error(line, "non-finite float")),
            TokenKind::Name(name) => {
                if *self.peek() == TokenKind::LParen {
                    self.pos += 1;
                    self.expect(TokenKind::RParen, "call arguments are not supported")?;
                    self.call(&name)
                } else {
                    self.lookup(&name)
                }
            }
            TokenKind::LBrace => self.dict(),
            TokenKind::LBracket => self.list(),
            TokenKind::LParen => self.group(),
            _ => Err(ScriptError::syntax(line, "invalid syntax")),
        }
    }

    fn dict(&mut self) -> Result<Value, ScriptError> {
        let mut map = Map::new();
        loop {
            if *self.peek() == TokenKind::RBrace {
                self.pos += 1;
                break;
            }
            let line = self.line();
            let key = self.expression()?;
            self.expect(TokenKind::Colon, "':' expected after dictionary key")?;
            let value = self.expression()?;
            map.insert(key_string(key, line)?, value);

            match self.peek() {
                TokenKind::Comma => self.pos += 1,
                TokenKind::RBrace => {
                    self.pos += 1;
                    break;
                }
                _ => return Err(ScriptError::syntax(self.line(), "'{' was never closed")),
            }
        }
        Ok(Value::Object(map))
    }

    fn list(&mut self) -> Result<Value, ScriptError> {
        let items = self.sequence(TokenKind::RBracket, "'[' was never closed")?;
        Ok(Value::Array(items))
    }

    /// Parenthesised expression, or a tuple (evaluated as an array)
    fn group(&mut self) -> Result<Value, ScriptError> {
        if *self.peek() == TokenKind::RParen {
            self.pos += 1;
            return Ok(Value::Array(Vec::new()));
        }
        let first = self.expression()?;
        match self.peek() {
            TokenKind::RParen => {
                self.pos += 1;
                Ok(first)
            }
            TokenKind::Comma => {
                self.pos += 1;
                let mut items = vec![first];
                items.extend(self.sequence(TokenKind::RParen, "'(' was never closed")?);
                Ok(Value::Array(items))
            }
            _ => Err(ScriptError::syntax(self.line(), "'(' was never closed")),
        }
    }

    fn sequence(&mut self, close: TokenKind, unclosed: &str) -> Result<Vec<Value>, ScriptError> {
        let mut items = Vec::new();
        loop {
            if *self.peek() == close {
                self.pos += 1;
                break;
            }
            items.push(self.expression()?);
            match self.peek() {
                TokenKind::Comma => self.pos += 1,
                kind if *kind == close => {
                    self.pos += 1;
                    break;
                }
                _ => return Err(ScriptError::syntax(self.line(), unclosed)),
            }
        }
        Ok(items)
    }

    fn lookup(&self, name: &str) -> Result<Value, ScriptError> {
        match name {
            "None" => Ok(Value::Null),
            "True" => Ok(Value::Bool(true)),
            "False" => Ok(Value::Bool(false)),
            _ => {
                if let Some(value) = self.bindings.get(name) {
                    Ok(value.clone())
                } else if name == BASE_URL_NAME {
                    Ok(Value::String(self.ctx.base_url.to_string()))
                } else {
                    Err(ScriptError::UnknownName(name.to_string()))
                }
            }
        }
    }

    fn call(&self, name: &str) -> Result<Value, ScriptError> {
        if name == CREDENTIAL_FN {
            self.ctx
                .credentials
                .api_key()
                .map(Value::String)
                .map_err(ScriptError::Credential)
        } else {
            Err(ScriptError::UnknownName(name.to_string()))
        }
    }

    fn string_piece(&self, value: &str, format: bool, line: usize) -> Result<String, ScriptError> {
        if format {
            self.interpolate(value, line)
        } else {
            Ok(value.to_string())
        }
    }

    /// Expand `{name}` / `{name()}` fields of a format string
    fn interpolate(&self, template: &str, line: usize) -> Result<String, ScriptError> {
        let mut out = String::with_capacity(template.len());
        let mut chars = template.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    out.push('{');
                }
                '{' => {
                    let mut field = String::new();
                    let mut closed = false;
                    for f in chars.by_ref() {
                        if f == '}' {
                            closed = true;
                            break;
                        }
                        field.push(f);
                    }
                    if !closed {
                        return Err(ScriptError::syntax(line, "f-string: expecting '}'"));
                    }
                    let field = field.trim();
                    if field.is_empty() {
                        return Err(ScriptError::syntax(
                            line,
                            "f-string: empty expression not allowed",
                        ));
                    }
                    let value = if let Some(callee) = field.strip_suffix("()") {
                        self.call(callee.trim())?
                    } else if is_identifier(field) {
                        self.lookup(field)?
                    } else {
                        return Err(ScriptError::syntax(
                            line,
                            format!("f-string: unsupported expression '{}'", field),
                        ));
                    };
                    out.push_str(&display(&value));
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    out.push('}');
                }
                '}' => {
                    return Err(ScriptError::syntax(
                        line,
                        "f-string: single '}' is not allowed",
                    ))
                }
                other => out.push(other),
            }
        }
        Ok(out)
    }
}

fn negate(value: Value, line: usize) -> Result<Value, ScriptError> {
    if let Value::Number(n) = &value {
        if let Some(i) = n.as_i64().and_then(i64::checked_neg) {
            return Ok(Value::from(i));
        }
        if n.as_u64() == Some(i64::MIN.unsigned_abs()) {
            return Ok(Value::from(i64::MIN));
        }
        if let Some(f) = n.as_f64() {
            if let Some(neg) = Number::from_f64(-f) {
                return Ok(Value::Number(neg));
            }
        }
    }
    Err(ScriptError::type_error(line, "bad operand type for unary -"))
}

/// Dict keys become JSON object keys the way a JSON encoder stringifies scalars
fn key_string(key: Value, line: usize) -> Result<String, ScriptError> {
    match key {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok("null".to_string()),
        Value::Array(_) => Err(ScriptError::type_error(line, "unhashable type: 'list'")),
        Value::Object(_) => Err(ScriptError::type_error(line, "unhashable type: 'dict'")),
    }
}

/// String form used inside format strings
fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::CredentialSource;
    use crate::error::RunnerError;
    use crate::script::evaluate;
    use serde_json::json;

    struct FixedKey(Option<&'static str>);

    impl CredentialSource for FixedKey {
        fn api_key(&self) -> Result<String, RunnerError> {
            self.0
                .map(str::to_string)
                .ok_or(RunnerError::CredentialMissing)
        }
    }

    fn eval(source: &str) -> Result<Bindings, ScriptError> {
        let key = FixedKey(Some("test-key"));
        let ctx = EvalContext::new("https://api.test", &key);
        evaluate(source, &ctx)
    }

    #[test]
    fn test_literals() {
        let bindings = eval("a = {\"n\": None, \"t\": True, \"f\": False, \"i\": -3, \"x\": 1.5}").unwrap();
        assert_eq!(
            bindings["a"],
            json!({"n": null, "t": true, "f": false, "i": -3, "x": 1.5})
        );
    }

    #[test]
    fn test_large_integers_stay_exact() {
        let bindings = eval("a = {\"n\": 12345678901234567890, \"m\": -9223372036854775808}").unwrap();
        assert_eq!(bindings["a"]["n"].as_u64(), Some(12_345_678_901_234_567_890));
        assert_eq!(bindings["a"]["m"].as_i64(), Some(i64::MIN));
    }

    #[test]
    fn test_names_and_builtins() {
        let source = "id = \"019a\"\nurl = f\"{BASE_URL}/reports/{id}/277\"\nheaders = {\"Authorization\": get_api_key()}\n";
        let bindings = eval(source).unwrap();
        assert_eq!(bindings["url"], json!("https://api.test/reports/019a/277"));
        assert_eq!(bindings["headers"], json!({"Authorization": "test-key"}));
    }

    #[test]
    fn test_key_order_is_preserved() {
        let bindings = eval("p = {\"zeta\": 1, \"alpha\": 2}").unwrap();
        let keys: Vec<&String> = bindings["p"].as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_tuples_lists_and_trailing_commas() {
        let bindings = eval("a = [1, (2, 3), (4),]\nb = {1: \"one\", True: 2,}").unwrap();
        assert_eq!(bindings["a"], json!([1, [2, 3], 4]));
        assert_eq!(bindings["b"], json!({"1": "one", "true": 2}));
    }

    #[test]
    fn test_adjacent_strings_concatenate() {
        let bindings = eval("a = (\"ab\"\n     \"cd\" f\"{BASE_URL}\")").unwrap();
        assert_eq!(bindings["a"], json!("abcdhttps://api.test"));
    }

    #[test]
    fn test_format_braces_escape() {
        let bindings = eval("a = f\"{{literal}}\"").unwrap();
        assert_eq!(bindings["a"], json!("{literal}"));
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!(
            eval("a = requests").unwrap_err(),
            ScriptError::UnknownName("requests".to_string())
        );
        assert_eq!(
            eval("a = open()").unwrap_err(),
            ScriptError::UnknownName("open".to_string())
        );
    }

    #[test]
    fn test_credential_failure_propagates() {
        let key = FixedKey(None);
        let ctx = EvalContext::new("https://api.test", &key);
        let err = evaluate("h = {\"Authorization\": get_api_key()}", &ctx).unwrap_err();
        assert_eq!(err, ScriptError::Credential(RunnerError::CredentialMissing));
        assert!(!err.is_syntax());
    }

    #[test]
    fn test_syntax_errors() {
        assert!(eval("a = {\"k\" 1}").unwrap_err().is_syntax());
        assert!(eval("a = 1 2").unwrap_err().is_syntax());
        assert!(eval("None = 1").unwrap_err().is_syntax());
        assert!(eval("a = f\"{1 + 2}\"").unwrap_err().is_syntax());
        assert!(!eval("a = {[1]: 2}").unwrap_err().is_syntax());
    }
}
