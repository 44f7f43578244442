//! Configuration values as they travel between holder fields and the persisted store.

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;

/// The representation class of a [`PropertyValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Bool,
    Int,
    Double,
    Text,
    BoolList,
    IntList,
    DoubleList,
    TextList,
}

/// A stored configuration value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Double(f64),
    Text(String),
    BoolList(Vec<bool>),
    IntList(Vec<i64>),
    DoubleList(Vec<f64>),
    TextList(Vec<String>),
}

impl PropertyValue {
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Double(_) => ValueKind::Double,
            Self::Text(_) => ValueKind::Text,
            Self::BoolList(_) => ValueKind::BoolList,
            Self::IntList(_) => ValueKind::IntList,
            Self::DoubleList(_) => ValueKind::DoubleList,
            Self::TextList(_) => ValueKind::TextList,
        }
    }
}

impl ValueKind {
    #[must_use]
    pub const fn is_list(self) -> bool {
        matches!(self, Self::BoolList | Self::IntList | Self::DoubleList | Self::TextList)
    }

    /// Parses textual input into a value of this kind.
    ///
    /// Scalar kinds take exactly one element; list kinds take one element per item.
    /// Returns `None` when the input does not match the kind.
    #[must_use]
    pub fn parse(self, raw: &[&str]) -> Option<PropertyValue> {
        if !self.is_list() && raw.len() != 1 {
            return None;
        }

        let value = match self {
            Self::Bool => PropertyValue::Bool(parse_bool(raw[0])?),
            Self::Int => PropertyValue::Int(raw[0].trim().parse().ok()?),
            Self::Double => PropertyValue::Double(raw[0].trim().parse().ok()?),
            Self::Text => PropertyValue::Text(raw[0].to_owned()),
            Self::BoolList => {
                PropertyValue::BoolList(raw.iter().map(|s| parse_bool(s)).collect::<Option<_>>()?)
            },
            Self::IntList => PropertyValue::IntList(
                raw.iter().map(|s| s.trim().parse().ok()).collect::<Option<_>>()?,
            ),
            Self::DoubleList => PropertyValue::DoubleList(
                raw.iter().map(|s| s.trim().parse().ok()).collect::<Option<_>>()?,
            ),
            Self::TextList => {
                PropertyValue::TextList(raw.iter().map(|s| (*s).to_owned()).collect())
            },
        };

        Some(value)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
            f.write_str("[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{item}")?;
            }
            f.write_str("]")
        }

        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
            Self::BoolList(v) => join(f, v),
            Self::IntList(v) => join(f, v),
            Self::DoubleList(v) => join(f, v),
            Self::TextList(v) => join(f, v),
        }
    }
}

/// A Rust type that can live in a configuration field.
pub trait ConfigValue: Any + Clone + Send + Sync {
    const KIND: ValueKind;

    fn to_value(&self) -> PropertyValue;

    /// Converts a stored value back; `None` if the kind or range does not fit.
    fn from_value(value: &PropertyValue) -> Option<Self>;
}

impl ConfigValue for bool {
    const KIND: ValueKind = ValueKind::Bool;

    fn to_value(&self) -> PropertyValue {
        PropertyValue::Bool(*self)
    }

    fn from_value(value: &PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

macro_rules! integer_value {
    ($($ty:ty),*) => {$(
        impl ConfigValue for $ty {
            const KIND: ValueKind = ValueKind::Int;

            fn to_value(&self) -> PropertyValue {
                PropertyValue::Int(i64::from(*self))
            }

            fn from_value(value: &PropertyValue) -> Option<Self> {
                match value {
                    PropertyValue::Int(v) => <$ty>::try_from(*v).ok(),
                    _ => None,
                }
            }
        }
    )*};
}

integer_value!(i32, i64, u32);

impl ConfigValue for f64 {
    const KIND: ValueKind = ValueKind::Double;

    fn to_value(&self) -> PropertyValue {
        PropertyValue::Double(*self)
    }

    #[allow(clippy::cast_precision_loss)]
    fn from_value(value: &PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::Double(v) => Some(*v),
            PropertyValue::Int(v) => Some(*v as Self),
            _ => None,
        }
    }
}

impl ConfigValue for String {
    const KIND: ValueKind = ValueKind::Text;

    fn to_value(&self) -> PropertyValue {
        PropertyValue::Text(self.clone())
    }

    fn from_value(value: &PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::Text(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl ConfigValue for Vec<bool> {
    const KIND: ValueKind = ValueKind::BoolList;

    fn to_value(&self) -> PropertyValue {
        PropertyValue::BoolList(self.clone())
    }

    fn from_value(value: &PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::BoolList(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl ConfigValue for Vec<i32> {
    const KIND: ValueKind = ValueKind::IntList;

    fn to_value(&self) -> PropertyValue {
        PropertyValue::IntList(self.iter().map(|v| i64::from(*v)).collect())
    }

    fn from_value(value: &PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::IntList(v) => v.iter().map(|item| i32::try_from(*item).ok()).collect(),
            _ => None,
        }
    }
}

impl ConfigValue for Vec<f64> {
    const KIND: ValueKind = ValueKind::DoubleList;

    fn to_value(&self) -> PropertyValue {
        PropertyValue::DoubleList(self.clone())
    }

    #[allow(clippy::cast_precision_loss)]
    fn from_value(value: &PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::DoubleList(v) => Some(v.clone()),
            PropertyValue::IntList(v) => Some(v.iter().map(|item| *item as f64).collect()),
            _ => None,
        }
    }
}

impl ConfigValue for Vec<String> {
    const KIND: ValueKind = ValueKind::TextList;

    fn to_value(&self) -> PropertyValue {
        PropertyValue::TextList(self.clone())
    }

    fn from_value(value: &PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::TextList(v) => Some(v.clone()),
            _ => None,
        }
    }
}
