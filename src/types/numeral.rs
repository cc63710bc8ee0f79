use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A numeric wire field. The indexer sends decimals as JSON strings, but a
/// plain JSON number is accepted too; either way the literal text is kept
/// verbatim so nothing goes through `f64` before decimal parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Numeral(pub String);

impl Numeral {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Numeral {
    fn from(value: &str) -> Self {
        Numeral(value.to_owned())
    }
}

impl fmt::Display for Numeral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Numeral {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // serde_json is built with `arbitrary_precision`, so a number
        // literal reaches us with its original digits.
        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(Numeral(s)),
            Value::Number(n) => Ok(Numeral(n.to_string())),
            other => Err(de::Error::custom(format!(
                "expected a numeral, found {}",
                other
            ))),
        }
    }
}
