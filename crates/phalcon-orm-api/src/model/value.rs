use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::DataTypeKind;

/// A generic wrapper enum to hold any column value.
///
/// [`Value::Integer`] and [`Value::Decimal`] compare numerically with each other, so
/// `Integer(2) == Decimal(2.00)`. Across kinds the order is
/// `Null < Boolean < numbers < Text`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    Integer(i64),
    Decimal(Decimal),
    Text(String),
}

impl FromStr for Value {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::Text(s.to_string()))
    }
}

macro_rules! value_from_primitive {
    ($variant:ident, $primitive:ty, $test_name:ident) => {
        impl From<$primitive> for Value {
            fn from(value: $primitive) -> Self {
                Value::$variant(value.into())
            }
        }

        #[cfg(test)]
        mod $test_name {
            use super::*;

            #[test]
            fn test_value_from_primitive() {
                let primitive_value: $primitive = Default::default();
                assert!(matches!(
                    Value::from(primitive_value),
                    Value::$variant(_)
                ));
            }
        }
    };
}

value_from_primitive!(Boolean, bool, tests_boolean_primitive);
value_from_primitive!(Integer, i8, tests_i8_primitive);
value_from_primitive!(Integer, i16, tests_i16_primitive);
value_from_primitive!(Integer, i32, tests_i32_primitive);
value_from_primitive!(Integer, i64, tests_i64_primitive);
value_from_primitive!(Integer, u8, tests_u8_primitive);
value_from_primitive!(Integer, u16, tests_u16_primitive);
value_from_primitive!(Integer, u32, tests_u32_primitive);
value_from_primitive!(Decimal, Decimal, tests_decimal_primitive);
value_from_primitive!(Text, String, tests_text_primitive_string);
value_from_primitive!(Text, &str, tests_text_primitive_str);

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

impl Value {
    /// Checks if the value is [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Checks if the value is an [`Value::Integer`] or a [`Value::Decimal`].
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Decimal(_))
    }

    /// Returns the type name of the value as a string.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Boolean(_) => "Boolean",
            Value::Integer(_) => "Integer",
            Value::Decimal(_) => "Decimal",
            Value::Text(_) => "Text",
        }
    }

    /// Returns whether the value can be stored in a column of the given kind.
    ///
    /// [`Value::Null`] matches every kind; nullability is checked separately.
    /// Integers are accepted by decimal columns.
    pub fn matches_kind(&self, kind: DataTypeKind) -> bool {
        matches!(
            (self, kind),
            (Value::Null, _)
                | (Value::Boolean(_), DataTypeKind::Boolean)
                | (Value::Integer(_), DataTypeKind::Integer)
                | (Value::Integer(_), DataTypeKind::Decimal)
                | (Value::Decimal(_), DataTypeKind::Decimal)
                | (Value::Text(_), DataTypeKind::Text)
        )
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as a [`Decimal`], widening integers.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Value::Integer(i) => Some(Decimal::from(*i)),
            Value::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Boolean(_) => 1,
            Value::Integer(_) | Value::Decimal(_) => 2,
            Value::Text(_) => 3,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Boolean(a), Value::Boolean(b)) => a.cmp(b),
            (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
            (Value::Decimal(a), Value::Decimal(b)) => a.cmp(b),
            (Value::Integer(a), Value::Decimal(b)) => Decimal::from(*a).cmp(b),
            (Value::Decimal(a), Value::Integer(b)) => a.cmp(&Decimal::from(*b)),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind_rank().hash(state);
        match self {
            Value::Null => {}
            Value::Boolean(b) => b.hash(state),
            // numbers hash through their normalized decimal form to agree with `Eq`
            Value::Integer(i) => Decimal::from(*i).normalize().hash(state),
            Value::Decimal(d) => d.normalize().hash(state),
            Value::Text(s) => s.hash(state),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Decimal(d) => write!(f, "{d}"),
            Value::Text(s) => write!(f, "{s}"),
        }
    }
}
