use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use indexmap::IndexMap;
use std::any::Any;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

use crate::common::{Object, Range, Temporal, TemporalKind, TypeRef};
use crate::document::Document;
use crate::errors::{ErrorKind, MappingError, MappingResult};
use crate::metadata::Entity;

/// Conversion between a Rust type and the domain-side [Object] tree.
///
/// `type_ref` describes the static type so the reader knows what to build
/// from a stored value, `to_object`/`from_object` move a value in and out of
/// the tree. Entity structs and unit enums get an implementation from the
/// `MappedEntity` and `MappedEnum` derives.
pub trait Convertible: Sized {
    fn type_ref() -> TypeRef;
    fn to_object(&self) -> MappingResult<Object>;
    fn from_object(object: Object) -> MappingResult<Self>;
}

fn mismatch<T>(expected: &str, object: &Object) -> MappingResult<T> {
    log::error!("Object {} is not {}", object, expected);
    Err(MappingError::new(
        &format!("Object {} is not {}", object, expected),
        ErrorKind::InvalidDataType,
    )
    .with_target_type(expected)
    .with_value_type(object.type_name()))
}

fn narrow<T: TryFrom<i64>>(value: i64, expected: &str) -> MappingResult<T> {
    T::try_from(value).map_err(|_| {
        log::error!("Value {} is out of range for {}", value, expected);
        MappingError::new(
            &format!("Value {} is out of range for {}", value, expected),
            ErrorKind::ConversionError,
        )
        .with_target_type(expected)
    })
}

macro_rules! impl_integer_convertible {
    ($t:ty, $type_ref:expr, $variant:ident, $name:expr) => {
        impl Convertible for $t {
            fn type_ref() -> TypeRef {
                $type_ref
            }

            fn to_object(&self) -> MappingResult<Object> {
                Ok(Object::$variant((*self).into()))
            }

            fn from_object(object: Object) -> MappingResult<Self> {
                match object {
                    Object::I32(v) => narrow(v as i64, $name),
                    Object::I64(v) => narrow(v, $name),
                    other => mismatch($name, &other),
                }
            }
        }
    };
}

impl_integer_convertible!(i16, TypeRef::I32, I32, "i16");
impl_integer_convertible!(u16, TypeRef::I32, I32, "u16");
impl_integer_convertible!(i32, TypeRef::I32, I32, "i32");
impl_integer_convertible!(u32, TypeRef::I64, I64, "u32");
impl_integer_convertible!(i64, TypeRef::I64, I64, "i64");

impl Convertible for f32 {
    fn type_ref() -> TypeRef {
        TypeRef::F32
    }

    fn to_object(&self) -> MappingResult<Object> {
        Ok(Object::F32(*self))
    }

    fn from_object(object: Object) -> MappingResult<Self> {
        match object {
            Object::F32(v) => Ok(v),
            Object::F64(v) => Ok(v as f32),
            other => mismatch("f32", &other),
        }
    }
}

impl Convertible for f64 {
    fn type_ref() -> TypeRef {
        TypeRef::F64
    }

    fn to_object(&self) -> MappingResult<Object> {
        Ok(Object::F64(*self))
    }

    fn from_object(object: Object) -> MappingResult<Self> {
        match object {
            Object::F64(v) => Ok(v),
            Object::F32(v) => Ok(v as f64),
            other => mismatch("f64", &other),
        }
    }
}

impl Convertible for bool {
    fn type_ref() -> TypeRef {
        TypeRef::Bool
    }

    fn to_object(&self) -> MappingResult<Object> {
        Ok(Object::Bool(*self))
    }

    fn from_object(object: Object) -> MappingResult<Self> {
        match object {
            Object::Bool(v) => Ok(v),
            other => mismatch("bool", &other),
        }
    }
}

impl Convertible for char {
    fn type_ref() -> TypeRef {
        TypeRef::Char
    }

    fn to_object(&self) -> MappingResult<Object> {
        Ok(Object::Char(*self))
    }

    fn from_object(object: Object) -> MappingResult<Self> {
        match object {
            Object::Char(v) => Ok(v),
            other => mismatch("char", &other),
        }
    }
}

impl Convertible for String {
    fn type_ref() -> TypeRef {
        TypeRef::String
    }

    fn to_object(&self) -> MappingResult<Object> {
        Ok(Object::String(self.clone()))
    }

    fn from_object(object: Object) -> MappingResult<Self> {
        match object {
            Object::String(v) => Ok(v),
            other => mismatch("String", &other),
        }
    }
}

impl<T: Convertible> Convertible for Option<T> {
    fn type_ref() -> TypeRef {
        T::type_ref()
    }

    fn to_object(&self) -> MappingResult<Object> {
        match self {
            Some(v) => v.to_object(),
            None => Ok(Object::Null),
        }
    }

    fn from_object(object: Object) -> MappingResult<Self> {
        match object {
            Object::Null => Ok(None),
            other => T::from_object(other).map(Some),
        }
    }
}

impl<T: Convertible> Convertible for Vec<T> {
    fn type_ref() -> TypeRef {
        TypeRef::list(T::type_ref())
    }

    fn to_object(&self) -> MappingResult<Object> {
        let items = self.iter().map(|v| v.to_object()).collect::<MappingResult<Vec<_>>>()?;
        Ok(Object::List(items))
    }

    fn from_object(object: Object) -> MappingResult<Self> {
        match object {
            Object::List(items) | Object::Set(items) => {
                items.into_iter().map(T::from_object).collect()
            }
            other => mismatch("Vec", &other),
        }
    }
}

impl<T: Convertible + Eq + Hash> Convertible for HashSet<T> {
    fn type_ref() -> TypeRef {
        TypeRef::set(T::type_ref())
    }

    fn to_object(&self) -> MappingResult<Object> {
        let items = self.iter().map(|v| v.to_object()).collect::<MappingResult<Vec<_>>>()?;
        Ok(Object::Set(items))
    }

    fn from_object(object: Object) -> MappingResult<Self> {
        match object {
            Object::List(items) | Object::Set(items) => {
                items.into_iter().map(T::from_object).collect()
            }
            other => mismatch("HashSet", &other),
        }
    }
}

impl<T: Convertible + Ord> Convertible for BTreeSet<T> {
    fn type_ref() -> TypeRef {
        TypeRef::set(T::type_ref())
    }

    fn to_object(&self) -> MappingResult<Object> {
        let items = self.iter().map(|v| v.to_object()).collect::<MappingResult<Vec<_>>>()?;
        Ok(Object::Set(items))
    }

    fn from_object(object: Object) -> MappingResult<Self> {
        match object {
            Object::List(items) | Object::Set(items) => {
                items.into_iter().map(T::from_object).collect()
            }
            other => mismatch("BTreeSet", &other),
        }
    }
}

fn map_entries<'a, K, V, I>(entries: I) -> MappingResult<Object>
where
    K: Convertible + 'a,
    V: Convertible + 'a,
    I: Iterator<Item = (&'a K, &'a V)>,
{
    let entries = entries
        .map(|(k, v)| Ok((k.to_object()?, v.to_object()?)))
        .collect::<MappingResult<Vec<_>>>()?;
    Ok(Object::Map(entries))
}

fn collect_entries<K, V, M>(object: Object, expected: &str) -> MappingResult<M>
where
    K: Convertible,
    V: Convertible,
    M: FromIterator<(K, V)>,
{
    match object {
        Object::Map(entries) => entries
            .into_iter()
            .map(|(k, v)| Ok((K::from_object(k)?, V::from_object(v)?)))
            .collect(),
        other => mismatch(expected, &other),
    }
}

impl<K: Convertible + Eq + Hash, V: Convertible> Convertible for HashMap<K, V> {
    fn type_ref() -> TypeRef {
        TypeRef::map(K::type_ref(), V::type_ref())
    }

    fn to_object(&self) -> MappingResult<Object> {
        map_entries(self.iter())
    }

    fn from_object(object: Object) -> MappingResult<Self> {
        collect_entries(object, "HashMap")
    }
}

impl<K: Convertible + Ord, V: Convertible> Convertible for BTreeMap<K, V> {
    fn type_ref() -> TypeRef {
        TypeRef::map(K::type_ref(), V::type_ref())
    }

    fn to_object(&self) -> MappingResult<Object> {
        map_entries(self.iter())
    }

    fn from_object(object: Object) -> MappingResult<Self> {
        collect_entries(object, "BTreeMap")
    }
}

impl<K: Convertible + Eq + Hash, V: Convertible> Convertible for IndexMap<K, V> {
    fn type_ref() -> TypeRef {
        TypeRef::map(K::type_ref(), V::type_ref())
    }

    fn to_object(&self) -> MappingResult<Object> {
        map_entries(self.iter())
    }

    fn from_object(object: Object) -> MappingResult<Self> {
        collect_entries(object, "IndexMap")
    }
}

impl<T: Convertible> Convertible for Range<T> {
    fn type_ref() -> TypeRef {
        TypeRef::range(T::type_ref())
    }

    fn to_object(&self) -> MappingResult<Object> {
        let range = self.clone_with(|v| v.to_object())?;
        Ok(Object::Range(Box::new(range)))
    }

    fn from_object(object: Object) -> MappingResult<Self> {
        match object {
            Object::Range(range) => range.try_map(T::from_object),
            other => mismatch("Range", &other),
        }
    }
}

impl<T> Range<T> {
    fn clone_with<U, F>(&self, mut f: F) -> MappingResult<Range<U>>
    where
        F: FnMut(&T) -> MappingResult<U>,
    {
        use crate::common::Bound;
        let map = |bound: &Bound<T>, f: &mut F| -> MappingResult<Bound<U>> {
            Ok(match bound {
                Bound::Inclusive(v) => Bound::Inclusive(f(v)?),
                Bound::Exclusive(v) => Bound::Exclusive(f(v)?),
                Bound::Unbounded => Bound::Unbounded,
            })
        };
        let lower = map(self.lower(), &mut f)?;
        let upper = map(self.upper(), &mut f)?;
        Ok(Range::new(lower, upper))
    }
}

impl Convertible for Object {
    fn type_ref() -> TypeRef {
        TypeRef::Any
    }

    fn to_object(&self) -> MappingResult<Object> {
        Ok(self.clone())
    }

    fn from_object(object: Object) -> MappingResult<Self> {
        Ok(object)
    }
}

impl Convertible for Document {
    fn type_ref() -> TypeRef {
        TypeRef::Document
    }

    fn to_object(&self) -> MappingResult<Object> {
        Ok(Object::Document(self.clone()))
    }

    fn from_object(object: Object) -> MappingResult<Self> {
        match object {
            Object::Document(doc) => Ok(doc),
            other => mismatch("Document", &other),
        }
    }
}

impl Convertible for Box<dyn Entity> {
    fn type_ref() -> TypeRef {
        TypeRef::Any
    }

    fn to_object(&self) -> MappingResult<Object> {
        Ok(Object::Entity(self.clone()))
    }

    fn from_object(object: Object) -> MappingResult<Self> {
        match object {
            Object::Entity(entity) => Ok(entity),
            other => mismatch("entity", &other),
        }
    }
}

macro_rules! impl_temporal_convertible {
    ($t:ty, $kind:ident) => {
        impl Convertible for $t {
            fn type_ref() -> TypeRef {
                TypeRef::Temporal(TemporalKind::$kind)
            }

            fn to_object(&self) -> MappingResult<Object> {
                Ok(Object::Temporal(Temporal::$kind(*self)))
            }

            fn from_object(object: Object) -> MappingResult<Self> {
                match object {
                    Object::Temporal(Temporal::$kind(v)) => Ok(v),
                    other => mismatch(stringify!($t), &other),
                }
            }
        }
    };
}

impl_temporal_convertible!(NaiveDate, Date);
impl_temporal_convertible!(NaiveDateTime, DateTime);
impl_temporal_convertible!(DateTime<Utc>, Instant);
impl_temporal_convertible!(NaiveTime, Time);

/// Like [Convertible::from_object], but a null becomes `T::default()`.
pub fn from_object_or_default<T: Convertible + Default>(object: Object) -> MappingResult<T> {
    match object {
        Object::Null => Ok(T::default()),
        other => T::from_object(other),
    }
}

/// Extracts a concrete entity from [Object::Entity].
pub fn entity_from_object<T: Entity>(object: Object) -> MappingResult<T> {
    match object {
        Object::Entity(entity) => {
            let type_name = entity.type_name().to_string();
            match entity.into_any().downcast::<T>() {
                Ok(entity) => Ok(*entity),
                Err(_) => {
                    log::error!(
                        "Entity {} is not a {}",
                        type_name,
                        std::any::type_name::<T>()
                    );
                    Err(MappingError::new(
                        &format!("Entity {} is not a {}", type_name, std::any::type_name::<T>()),
                        ErrorKind::InvalidDataType,
                    )
                    .with_value_type(type_name))
                }
            }
        }
        other => mismatch(std::any::type_name::<T>(), &other),
    }
}

/// Extracts a custom value of type `T` from [Object::Custom].
pub fn custom_from_object<T>(object: Object) -> MappingResult<T>
where
    T: Any + Debug + Clone + PartialEq + Send + Sync,
{
    match object {
        Object::Custom(custom) => match custom.downcast_ref::<T>() {
            Some(value) => Ok(value.clone()),
            None => mismatch(std::any::type_name::<T>(), &Object::Custom(custom)),
        },
        other => mismatch(std::any::type_name::<T>(), &other),
    }
}

/// Implements [Convertible] for a type carried as [Object::Custom].
#[macro_export]
macro_rules! custom_convertible {
    ($t:ty) => {
        impl $crate::common::Convertible for $t {
            fn type_ref() -> $crate::common::TypeRef {
                $crate::common::TypeRef::custom::<$t>()
            }

            fn to_object(&self) -> $crate::errors::MappingResult<$crate::common::Object> {
                Ok($crate::common::Object::custom(self.clone()))
            }

            fn from_object(object: $crate::common::Object) -> $crate::errors::MappingResult<Self> {
                $crate::common::custom_from_object::<$t>(object)
            }
        }
    };
}
