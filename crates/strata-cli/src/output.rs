//! Output formatting

use serde_json::{Map, Value};
use strata_primitives::Address;
use strata_sdk::abi::{Decoded, Token};

/// Output builder: a JSON object in `--json` mode, otherwise a message
pub struct Output {
    json_mode: bool,
    fields: Map<String, Value>,
    lines: Vec<String>,
}

impl Output {
    /// Create a new output builder
    pub fn new(json_mode: bool) -> Self {
        Self {
            json_mode,
            fields: Map::new(),
            lines: Vec::new(),
        }
    }

    /// Add a string field
    pub fn field(mut self, key: &str, value: &str) -> Self {
        self.fields.insert(key.to_string(), Value::String(value.to_string()));
        self
    }

    /// Add a u64 field
    pub fn field_u64(mut self, key: &str, value: u64) -> Self {
        self.fields.insert(key.to_string(), Value::Number(value.into()));
        self
    }

    /// Add a JSON value field
    pub fn field_value(mut self, key: &str, value: Value) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    /// Append a line to the human-readable message
    pub fn line(mut self, text: impl Into<String>) -> Self {
        self.lines.push(text.into());
        self
    }

    /// Render without printing
    pub fn render(&self) -> String {
        if self.json_mode {
            serde_json::to_string_pretty(&self.fields).unwrap_or_default()
        } else {
            self.lines.join("\n")
        }
    }

    /// Print the output
    pub fn print(self) {
        let rendered = self.render();
        if !rendered.is_empty() {
            println!("{}", rendered);
        }
    }
}

/// JSON form of a decoded constant result
pub fn decoded_to_json(decoded: &Decoded) -> Value {
    match decoded {
        Decoded::Tokens(tokens) => Value::Array(tokens.iter().map(token_to_json).collect()),
        Decoded::Raw(text) => Value::String(text.clone()),
    }
}

fn token_to_json(token: &Token) -> Value {
    match token {
        Token::Address(id) => Value::String(Address::from_account_id(*id).to_base58()),
        Token::Uint(v) => Value::String(v.to_string()),
        Token::Int(v) => Value::String(v.to_string()),
        Token::Bool(b) => Value::Bool(*b),
        Token::Bytes(b) | Token::FixedBytes(b) => Value::String(hex::encode(b)),
        Token::String(s) => Value::String(s.clone()),
        Token::Array(items) | Token::FixedArray(items) => {
            Value::Array(items.iter().map(token_to_json).collect())
        }
    }
}
