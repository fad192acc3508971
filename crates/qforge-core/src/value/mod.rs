
use crate::types::Date;
use serde::{Deserialize, Serialize};
use std::fmt;

///
/// Value
///
/// Dynamic value carried by filter inputs and bound into predicates.
/// Request layers hand values over already decoded; no further
/// interpretation happens until a control type asks for one.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
    Date(Date),
    List(Vec<Self>),
}

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Integer coercion used by boolean and number controls.
    ///
    /// Text yields its leading signed decimal integer (`"12abc"` is 12,
    /// `"abc"` is 0). Lists yield 0 when empty and 1 otherwise.
    #[must_use]
    pub fn to_int(&self) -> i64 {
        match self {
            Self::Null | Self::Date(_) => 0,
            Self::Bool(b) => i64::from(*b),
            Self::Int(n) => *n,
            Self::Text(s) => leading_int(s),
            Self::List(items) => i64::from(!items.is_empty()),
        }
    }

    /// Normalize to a list: scalars become a singleton, lists pass through.
    #[must_use]
    pub fn into_list(self) -> Vec<Self> {
        match self {
            Self::List(items) => items,
            other => vec![other],
        }
    }

    /// Text rendering used for substring matching and date parsing.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(true) => "1".to_string(),
            Self::Bool(false) => String::new(),
            Self::Int(n) => n.to_string(),
            Self::Text(s) => s.clone(),
            Self::Date(d) => d.to_string(),
            Self::List(items) => items
                .iter()
                .map(Self::to_text)
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    /// Interpret as a calendar date, truncating any time component.
    #[must_use]
    pub fn to_date(&self) -> Option<Date> {
        match self {
            Self::Date(d) => Some(*d),
            Self::Text(s) => Date::parse(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "'{s}'"),
            Self::Date(d) => write!(f, "'{d}'"),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

// Leading-integer parse: optional whitespace, optional sign, then digits.
// Overflow saturates toward the sign rather than wrapping.
fn leading_int(s: &str) -> i64 {
    let trimmed = s.trim_start();
    let sign = usize::from(matches!(trimmed.as_bytes().first(), Some(b'-' | b'+')));
    let digits = trimmed[sign..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits == 0 {
        return 0;
    }

    let literal = &trimmed[..sign + digits];
    literal.parse::<i64>().unwrap_or_else(|_| {
        if literal.starts_with('-') {
            i64::MIN
        } else {
            i64::MAX
        }
    })
}

///
/// Conversions
///

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Int(n.into())
    }
}

impl From<Date> for Value {
    fn from(d: Date) -> Self {
        Self::Date(d)
    }
}

impl<T: Into<Self>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
