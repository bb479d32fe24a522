use crate::common::{EnumValue, Object, TypeRef, Value};
use crate::errors::{ErrorKind, MappingError, MappingResult};

fn unsupported<T>(value: &Value, target: &TypeRef) -> MappingResult<T> {
    log::error!("Cannot convert {} to {}", value, target);
    Err(MappingError::new(
        &format!("Cannot convert {} to {}", value, target),
        ErrorKind::ConversionError,
    )
    .with_target_type(target)
    .with_value_type(value.store_type()))
}

fn out_of_range<T>(value: impl std::fmt::Display, target: &TypeRef) -> MappingResult<T> {
    log::error!("Value {} is out of range for {}", value, target);
    Err(MappingError::new(
        &format!("Value {} is out of range for {}", value, target),
        ErrorKind::ConversionError,
    )
    .with_target_type(target))
}

/// Writes a simple domain value as a store scalar.
///
/// Integers widen to `i64`, floats to `f64`, chars and enum variants become
/// strings. Non scalar objects are rejected.
pub fn write_scalar(object: &Object) -> MappingResult<Value> {
    match object {
        Object::Null => Ok(Value::Null),
        Object::Bool(v) => Ok(Value::Bool(*v)),
        Object::I32(v) => Ok(Value::I64(*v as i64)),
        Object::I64(v) => Ok(Value::I64(*v)),
        Object::F32(v) => Ok(Value::F64(*v as f64)),
        Object::F64(v) => Ok(Value::F64(*v)),
        Object::Char(v) => Ok(Value::String(v.to_string())),
        Object::String(v) => Ok(Value::String(v.clone())),
        Object::Bytes(v) => Ok(Value::Bytes(v.clone())),
        Object::Enum(v) => Ok(Value::String(v.name().to_string())),
        Object::Document(doc) => Ok(Value::Document(doc.clone())),
        other => {
            log::error!("{} is not a simple value", other.type_name());
            Err(MappingError::new(
                &format!("{} is not a simple value", other.type_name()),
                ErrorKind::ConversionError,
            )
            .with_value_type(other.type_name()))
        }
    }
}

/// Reads a store scalar as the requested simple type.
///
/// Numbers are narrowed with a range check, strings are parsed into numbers,
/// booleans, single chars and enum variants, and scalars are rendered into
/// strings when a string is requested.
pub fn read_scalar(value: &Value, target: &TypeRef) -> MappingResult<Object> {
    if value.is_null() {
        return Ok(Object::Null);
    }

    match target {
        TypeRef::Bool => match value {
            Value::Bool(v) => Ok(Object::Bool(*v)),
            Value::String(s) => Ok(Object::Bool(s.trim().parse::<bool>()?)),
            _ => unsupported(value, target),
        },
        TypeRef::I32 => {
            let v = read_integer(value, target)?;
            match i32::try_from(v) {
                Ok(v) => Ok(Object::I32(v)),
                Err(_) => out_of_range(v, target),
            }
        }
        TypeRef::I64 => read_integer(value, target).map(Object::I64),
        TypeRef::F32 => {
            let v = read_float(value, target)?;
            if v.is_finite() && v.abs() > f32::MAX as f64 {
                return out_of_range(v, target);
            }
            Ok(Object::F32(v as f32))
        }
        TypeRef::F64 => read_float(value, target).map(Object::F64),
        TypeRef::Char => match value {
            Value::String(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Object::Char(c)),
                    _ => unsupported(value, target),
                }
            }
            _ => unsupported(value, target),
        },
        TypeRef::String => match value {
            Value::String(s) => Ok(Object::String(s.clone())),
            Value::Bool(_) | Value::I64(_) | Value::F64(_) => Ok(Object::String(value.to_json())),
            _ => unsupported(value, target),
        },
        TypeRef::Bytes => match value {
            Value::Bytes(b) => Ok(Object::Bytes(b.clone())),
            _ => unsupported(value, target),
        },
        TypeRef::Enum(enum_type) => match value {
            Value::String(name) => EnumValue::new(*enum_type, name).map(Object::Enum),
            _ => unsupported(value, target),
        },
        TypeRef::Document => match value {
            Value::Document(doc) => Ok(Object::Document(doc.clone())),
            _ => unsupported(value, target),
        },
        _ => unsupported(value, target),
    }
}

fn read_integer(value: &Value, target: &TypeRef) -> MappingResult<i64> {
    match value {
        Value::I64(v) => Ok(*v),
        Value::F64(v) if v.fract() == 0.0 && v.is_finite() => {
            if *v >= i64::MIN as f64 && *v <= i64::MAX as f64 {
                Ok(*v as i64)
            } else {
                out_of_range(v, target)
            }
        }
        Value::String(s) => Ok(s.trim().parse::<i64>()?),
        _ => unsupported(value, target),
    }
}

fn read_float(value: &Value, target: &TypeRef) -> MappingResult<f64> {
    match value {
        Value::F64(v) => Ok(*v),
        Value::I64(v) => Ok(*v as f64),
        Value::String(s) => Ok(s.trim().parse::<f64>()?),
        _ => unsupported(value, target),
    }
}

/// Renders a simple map key as a document key.
pub fn key_to_string(key: &Object) -> MappingResult<String> {
    scalar_to_key(write_scalar(key)?).map_err(|e| e.with_value_type(key.type_name()))
}

/// Renders an already written scalar as a document key.
pub fn scalar_to_key(scalar: Value) -> MappingResult<String> {
    match scalar {
        Value::String(s) => Ok(s),
        scalar @ (Value::Bool(_) | Value::I64(_) | Value::F64(_)) => Ok(scalar.to_json()),
        other => {
            log::error!("Map key {} cannot be used as a document key", other);
            Err(MappingError::new(
                &format!("Map key {} cannot be used as a document key", other),
                ErrorKind::ConversionError,
            ))
        }
    }
}
