use std::any::{Any, TypeId};
use std::fmt::{Debug, Display, Formatter};

use crate::common::{CustomType, EnumType, Range, Temporal, TypeRef};
use crate::document::Document;
use crate::errors::{ErrorKind, MappingError, MappingResult};
use crate::metadata::Entity;

/// A value of an enum type, identified by its variant name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnumValue {
    enum_type: EnumType,
    variant: &'static str,
}

impl EnumValue {
    /// Creates the value for the named variant, failing when the enum has no
    /// such variant.
    pub fn new(enum_type: EnumType, name: &str) -> MappingResult<Self> {
        match enum_type.variant(name) {
            Some(variant) => Ok(EnumValue { enum_type, variant }),
            None => {
                log::error!("'{}' is not a variant of {}", name, enum_type.name);
                Err(MappingError::new(
                    &format!("'{}' is not a variant of {}", name, enum_type.name),
                    ErrorKind::ConversionError,
                )
                .with_target_type(enum_type.name))
            }
        }
    }

    pub fn enum_type(&self) -> EnumType {
        self.enum_type
    }

    pub fn name(&self) -> &'static str {
        self.variant
    }
}

/// Object-safe view of an arbitrary domain value carried in [Object::Custom].
///
/// Implemented for every `'static` type which is `Clone + PartialEq + Debug`,
/// so any such type can travel through the mapper as long as a converter is
/// registered for it.
pub trait DomainValue: Any + Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn clone_boxed(&self) -> Box<dyn DomainValue>;
    fn eq_dyn(&self, other: &dyn DomainValue) -> bool;
}

impl<T> DomainValue for T
where
    T: Any + Debug + Clone + PartialEq + Send + Sync,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn clone_boxed(&self) -> Box<dyn DomainValue> {
        Box::new(self.clone())
    }

    fn eq_dyn(&self, other: &dyn DomainValue) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }
}

/// A domain value of a type the mapper only knows through registered
/// converters, such as a geo point or a UUID.
pub struct CustomValue {
    custom_type: CustomType,
    inner: Box<dyn DomainValue>,
}

impl CustomValue {
    pub fn new<T>(value: T) -> Self
    where
        T: Any + Debug + Clone + PartialEq + Send + Sync,
    {
        CustomValue {
            custom_type: CustomType::from_parts(TypeId::of::<T>(), std::any::type_name::<T>()),
            inner: Box::new(value),
        }
    }

    pub fn custom_type(&self) -> CustomType {
        self.custom_type
    }

    pub fn is<T: 'static>(&self) -> bool {
        self.custom_type.id() == TypeId::of::<T>()
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.inner.as_any().downcast_ref::<T>()
    }
}

impl Clone for CustomValue {
    fn clone(&self) -> Self {
        CustomValue {
            custom_type: self.custom_type,
            inner: self.inner.clone_boxed(),
        }
    }
}

impl PartialEq for CustomValue {
    fn eq(&self, other: &Self) -> bool {
        self.custom_type == other.custom_type && self.inner.eq_dyn(other.inner.as_ref())
    }
}

impl Debug for CustomValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.inner)
    }
}

/// The domain-side value tree handled by the reader and writer.
///
/// Where [Value](crate::common::Value) is what the store sees, `Object` is
/// what the application sees: typed scalars, enums, temporals, ranges,
/// collections, maps with arbitrary keys, entities and custom values.
/// Conversions from and to Rust types go through
/// [Convertible](crate::common::Convertible).
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Object {
    #[default]
    Null,
    Bool(bool),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Char(char),
    String(String),
    Bytes(Vec<u8>),
    Enum(EnumValue),
    Temporal(Temporal),
    Range(Box<Range<Object>>),
    List(Vec<Object>),
    Set(Vec<Object>),
    Map(Vec<(Object, Object)>),
    Document(Document),
    Entity(Box<dyn Entity>),
    Custom(CustomValue),
}

impl Object {
    pub fn entity<T: Entity>(entity: T) -> Object {
        Object::Entity(Box::new(entity))
    }

    pub fn custom<T>(value: T) -> Object
    where
        T: Any + Debug + Clone + PartialEq + Send + Sync,
    {
        Object::Custom(CustomValue::new(value))
    }

    /// The runtime type of this value. Element types of collections and maps
    /// are not tracked and reported as [TypeRef::Any].
    pub fn runtime_type(&self) -> TypeRef {
        match self {
            Object::Null => TypeRef::Any,
            Object::Bool(_) => TypeRef::Bool,
            Object::I32(_) => TypeRef::I32,
            Object::I64(_) => TypeRef::I64,
            Object::F32(_) => TypeRef::F32,
            Object::F64(_) => TypeRef::F64,
            Object::Char(_) => TypeRef::Char,
            Object::String(_) => TypeRef::String,
            Object::Bytes(_) => TypeRef::Bytes,
            Object::Enum(e) => TypeRef::Enum(e.enum_type()),
            Object::Temporal(t) => TypeRef::Temporal(t.kind()),
            Object::Range(r) => {
                let element = r
                    .lower()
                    .value()
                    .or(r.upper().value())
                    .map(|v| v.runtime_type())
                    .unwrap_or(TypeRef::Any);
                TypeRef::range(element)
            }
            Object::List(_) => TypeRef::list(TypeRef::Any),
            Object::Set(_) => TypeRef::set(TypeRef::Any),
            Object::Map(_) => TypeRef::map(TypeRef::Any, TypeRef::Any),
            Object::Document(_) => TypeRef::Document,
            Object::Entity(e) => TypeRef::Entity(e.type_name().to_string()),
            Object::Custom(c) => TypeRef::Custom(c.custom_type()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Object::Null)
    }

    /// Returns `true` for empty strings, collections, maps and documents.
    pub fn is_empty(&self) -> bool {
        match self {
            Object::String(s) => s.is_empty(),
            Object::List(items) | Object::Set(items) => items.is_empty(),
            Object::Map(entries) => entries.is_empty(),
            Object::Document(doc) => doc.is_empty(),
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Object::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_entity(&self) -> Option<&dyn Entity> {
        match self {
            Object::Entity(e) => Some(e.as_ref()),
            _ => None,
        }
    }

    /// A short name of the variant, used in diagnostics.
    pub fn type_name(&self) -> String {
        self.runtime_type().to_string()
    }
}

impl Display for Object {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Object::Null => write!(f, "null"),
            Object::Bool(v) => write!(f, "{}", v),
            Object::I32(v) => write!(f, "{}", v),
            Object::I64(v) => write!(f, "{}", v),
            Object::F32(v) => write!(f, "{}", v),
            Object::F64(v) => write!(f, "{}", v),
            Object::Char(v) => write!(f, "{}", v),
            Object::String(v) => write!(f, "{}", v),
            Object::Bytes(v) => write!(f, "{:?}", v),
            Object::Enum(v) => write!(f, "{}", v.name()),
            Object::Temporal(v) => write!(f, "{}", v),
            Object::Range(v) => write!(f, "{}", v),
            Object::List(items) | Object::Set(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Object::Map(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
            Object::Document(doc) => write!(f, "{}", doc),
            Object::Entity(e) => write!(f, "{:?}", e),
            Object::Custom(c) => write!(f, "{:?}", c),
        }
    }
}
