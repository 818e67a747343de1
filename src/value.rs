//! The tagged value type held by a [`Word`]

use std::fmt;

/// A word's value: either a numeric literal or a quoted string.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Float(f64),
    String(Vec<u8>),
}

impl Value {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::String(_) => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Float(_) => None,
            Value::String(s) => Some(s),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Float(v) => write!(f, "{v}"),
            Value::String(s) => write!(f, "\"{}\"", String::from_utf8_lossy(s)),
        }
    }
}

/// An address letter paired with its value, e.g. `X1.0` or `P"hello"`.
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    pub letter: u8,
    pub value: Value,
}

impl Word {
    pub fn new(letter: u8, value: Value) -> Self {
        Self { letter, value }
    }

    pub fn float(letter: u8, value: f64) -> Self {
        Self::new(letter, Value::Float(value))
    }

    pub fn string(letter: u8, value: Vec<u8>) -> Self {
        Self::new(letter, Value::String(value))
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.letter as char, self.value)
    }
}
