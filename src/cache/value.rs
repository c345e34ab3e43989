//! Runtime Type Module
//!
//! Type tags used to reject overwrites that change a key's value type.

use serde_json::Value;

// == Runtime Type ==
/// Reports the runtime type of a stored value.
///
/// Statically typed values default to their Rust type name. Dynamic values
/// such as `serde_json::Value` override it to tag each variant separately.
pub trait RuntimeType {
    fn runtime_type(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl RuntimeType for () {}
impl RuntimeType for bool {}
impl RuntimeType for i32 {}
impl RuntimeType for i64 {}
impl RuntimeType for u32 {}
impl RuntimeType for u64 {}
impl RuntimeType for usize {}
impl RuntimeType for f64 {}
impl RuntimeType for char {}
impl RuntimeType for String {}
impl RuntimeType for &'static str {}
impl<T> RuntimeType for Vec<T> {}
impl<T> RuntimeType for Option<T> {}

impl RuntimeType for Value {
    fn runtime_type(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(n) if n.is_f64() => "float",
            Value::Number(_) => "integer",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}
