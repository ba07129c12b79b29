use crate::value::{Value, compare_eq};

///
/// Function
///
/// Builtin function registry. Names resolve case-insensitively.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(u8)]
pub enum Function {
    Abs = 0x01,
    Contains = 0x02,
    Length = 0x03,
    Lower = 0x04,
    Rank = 0x05,
    Trim = 0x06,
    Upper = 0x07,
}

impl Function {
    pub const ALL: [Self; 7] = [
        Self::Abs,
        Self::Contains,
        Self::Length,
        Self::Lower,
        Self::Rank,
        Self::Trim,
        Self::Upper,
    ];

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|function| function.name().eq_ignore_ascii_case(name))
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Abs => "abs",
            Self::Contains => "contains",
            Self::Length => "length",
            Self::Lower => "lower",
            Self::Rank => "rank",
            Self::Trim => "trim",
            Self::Upper => "upper",
        }
    }

    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Self::Contains => 2,
            Self::Abs | Self::Length | Self::Lower | Self::Rank | Self::Trim | Self::Upper => 1,
        }
    }

    #[must_use]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Apply a scalar builtin to already-evaluated arguments.
    ///
    /// Inapplicable argument types yield `Null`. `Rank` is never applied here;
    /// its score is supplied by the full-text probe.
    pub(crate) fn apply(self, args: &[Value]) -> Value {
        match (self, args) {
            (Self::Abs, [Value::Int(v)]) => v.checked_abs().map_or(Value::Null, Value::Int),
            (Self::Abs, [Value::Uint(v)]) => Value::Uint(*v),
            (Self::Abs, [Value::Float(v)]) => Value::Float(v.abs()),
            (Self::Contains, [Value::Text(haystack), Value::Text(needle)]) => {
                Value::Bool(haystack.contains(needle.as_str()))
            }
            (Self::Contains, [Value::List(items), needle]) => Value::Bool(
                items
                    .iter()
                    .any(|item| compare_eq(item, needle).unwrap_or(false)),
            ),
            (Self::Length, [Value::Text(text)]) => Value::Uint(text.chars().count() as u64),
            (Self::Length, [Value::List(items)]) => Value::Uint(items.len() as u64),
            (Self::Lower, [Value::Text(text)]) => Value::Text(text.to_lowercase()),
            (Self::Upper, [Value::Text(text)]) => Value::Text(text.to_uppercase()),
            (Self::Trim, [Value::Text(text)]) => Value::Text(text.trim().to_string()),
            _ => Value::Null,
        }
    }
}
