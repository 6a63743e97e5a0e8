//! JavaScript-style truthiness.
//!
//! Falsy values are: null, `false`, the empty string, numeric zero, an
//! object with no members and an empty list. Everything else is truthy.
//!
//! The string `"0"` is truthy even though the number `0` is not. Emptiness of
//! the text decides, not its numeric reading, and callers rely on that.

use crate::object::{DynamicList, DynamicObject};
use crate::value::Value;

/// Values that can be classified as truthy or falsy.
pub trait Truthy {
    /// Returns whether the value counts as true in a boolean context.
    fn is_truthy(&self) -> bool;
}

impl Truthy for Value {
    fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::String(s) => !s.is_empty(),
            Value::Int(n) => *n != 0,
            Value::UInt(n) => *n != 0,
            Value::Float(n) => *n != 0.0,
            Value::Object(obj) => !obj.is_empty(),
            Value::List(list) => !list.is_empty(),
            Value::Typed(_) => true,
        }
    }
}

impl Value {
    /// Returns whether this value is truthy.
    ///
    /// # Examples
    ///
    /// ```
    /// use dynamic_value::Value;
    ///
    /// assert!(!Value::Null.is_truthy());
    /// assert!(!Value::from("").is_truthy());
    /// assert!(Value::from("0").is_truthy());
    /// assert!(!Value::from(0).is_truthy());
    /// assert!(!Value::Float(-0.0).is_truthy());
    /// ```
    pub fn is_truthy(&self) -> bool {
        Truthy::is_truthy(self)
    }
}

impl Truthy for DynamicObject {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl Truthy for DynamicList {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl Truthy for bool {
    fn is_truthy(&self) -> bool {
        *self
    }
}

impl Truthy for str {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl Truthy for String {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

macro_rules! numeric_truthy {
    ($($t:ty),*) => {
        $(
            impl Truthy for $t {
                fn is_truthy(&self) -> bool {
                    *self != (0 as $t)
                }
            }
        )*
    };
}

numeric_truthy!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl<T: Truthy> Truthy for Option<T> {
    fn is_truthy(&self) -> bool {
        self.as_ref().is_some_and(Truthy::is_truthy)
    }
}

impl<T: Truthy + ?Sized> Truthy for &T {
    fn is_truthy(&self) -> bool {
        (**self).is_truthy()
    }
}

impl<T> Truthy for [T] {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl<T> Truthy for Vec<T> {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

/// Truthiness of an optional value; `None` is falsy.
pub fn is_truthy<T: Truthy + ?Sized>(value: Option<&T>) -> bool {
    value.is_some_and(Truthy::is_truthy)
}
