use std::any::TypeId;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

use crate::common::TemporalKind;

/// Static description of an enum type: its name and the names of its unit
/// variants in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnumType {
    pub name: &'static str,
    pub variants: &'static [&'static str],
}

impl EnumType {
    pub const fn new(name: &'static str, variants: &'static [&'static str]) -> Self {
        EnumType { name, variants }
    }

    /// Looks up a variant by name, returning the static name.
    pub fn variant(&self, name: &str) -> Option<&'static str> {
        self.variants.iter().copied().find(|v| *v == name)
    }
}

/// Identity of a Rust type which is neither an entity nor one of the built-in
/// shapes. Two custom types are equal when their [TypeId]s are.
#[derive(Debug, Clone, Copy)]
pub struct CustomType {
    id: TypeId,
    name: &'static str,
}

impl CustomType {
    pub fn of<T: 'static>() -> Self {
        CustomType {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub(crate) fn from_parts(id: TypeId, name: &'static str) -> Self {
        CustomType { id, name }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The type name without its module path.
    pub fn simple_name(&self) -> &'static str {
        let base = self.name.split('<').next().unwrap_or(self.name);
        match base.rfind("::") {
            Some(pos) => &self.name[pos + 2..],
            None => self.name,
        }
    }
}

impl PartialEq for CustomType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for CustomType {}

impl Hash for CustomType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// The declared (static) type of a property, a collection element or a
/// top-level read target.
///
/// Rust has no runtime reflection, so every mapped type describes itself with
/// a `TypeRef` through [Convertible::type_ref](crate::common::Convertible::type_ref).
/// Entities are referenced by their registered type name and resolved through
/// the metadata provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// Unknown static type. Reads fall back to whatever the type hint says, or
    /// to a generic document.
    Any,
    Bool,
    I32,
    I64,
    F32,
    F64,
    Char,
    String,
    Bytes,
    Enum(EnumType),
    Temporal(TemporalKind),
    Range(Box<TypeRef>),
    List(Box<TypeRef>),
    Set(Box<TypeRef>),
    Map(Box<TypeRef>, Box<TypeRef>),
    /// The generic document marker.
    Document,
    Entity(String),
    Custom(CustomType),
}

impl TypeRef {
    pub fn list(element: TypeRef) -> Self {
        TypeRef::List(Box::new(element))
    }

    pub fn set(element: TypeRef) -> Self {
        TypeRef::Set(Box::new(element))
    }

    pub fn map(key: TypeRef, value: TypeRef) -> Self {
        TypeRef::Map(Box::new(key), Box::new(value))
    }

    pub fn range(element: TypeRef) -> Self {
        TypeRef::Range(Box::new(element))
    }

    pub fn entity(name: &str) -> Self {
        TypeRef::Entity(name.to_string())
    }

    pub fn custom<T: 'static>() -> Self {
        TypeRef::Custom(CustomType::of::<T>())
    }

    /// Types stored as a single scalar without any conversion.
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            TypeRef::Bool
                | TypeRef::I32
                | TypeRef::I64
                | TypeRef::F32
                | TypeRef::F64
                | TypeRef::Char
                | TypeRef::String
                | TypeRef::Bytes
        )
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, TypeRef::I32 | TypeRef::I64 | TypeRef::F32 | TypeRef::F64)
    }

    pub fn is_collection_like(&self) -> bool {
        matches!(self, TypeRef::List(_) | TypeRef::Set(_))
    }

    pub fn is_map(&self) -> bool {
        matches!(self, TypeRef::Map(_, _))
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self, TypeRef::Temporal(_))
    }

    pub fn is_range(&self) -> bool {
        matches!(self, TypeRef::Range(_))
    }

    pub fn is_enum(&self) -> bool {
        matches!(self, TypeRef::Enum(_))
    }

    pub fn is_entity(&self) -> bool {
        matches!(self, TypeRef::Entity(_))
    }

    pub fn entity_name(&self) -> Option<&str> {
        match self {
            TypeRef::Entity(name) => Some(name),
            _ => None,
        }
    }

    /// The element type of a collection or range, or the value type of a map.
    pub fn component_type(&self) -> Option<&TypeRef> {
        match self {
            TypeRef::List(element) | TypeRef::Set(element) | TypeRef::Range(element) => {
                Some(element)
            }
            TypeRef::Map(_, value) => Some(value),
            _ => None,
        }
    }

    pub fn map_key_type(&self) -> Option<&TypeRef> {
        match self {
            TypeRef::Map(key, _) => Some(key),
            _ => None,
        }
    }

    /// Replaces the untyped leaves of this type with `leaf`, turning e.g.
    /// `Vec<Any>` into `Vec<Animal>`. Map keys are left alone.
    pub fn specialize(self, leaf: &TypeRef) -> TypeRef {
        match self {
            TypeRef::Any => leaf.clone(),
            TypeRef::List(element) => TypeRef::List(Box::new(element.specialize(leaf))),
            TypeRef::Set(element) => TypeRef::Set(Box::new(element.specialize(leaf))),
            TypeRef::Range(element) => TypeRef::Range(Box::new(element.specialize(leaf))),
            TypeRef::Map(key, value) => TypeRef::Map(key, Box::new(value.specialize(leaf))),
            other => other,
        }
    }

    /// The type a temporal property ultimately holds, looking through
    /// collections.
    pub fn temporal_kind(&self) -> Option<TemporalKind> {
        match self {
            TypeRef::Temporal(kind) => Some(*kind),
            TypeRef::List(element) | TypeRef::Set(element) => element.temporal_kind(),
            _ => None,
        }
    }
}

impl Display for TypeRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeRef::Any => write!(f, "Any"),
            TypeRef::Bool => write!(f, "bool"),
            TypeRef::I32 => write!(f, "i32"),
            TypeRef::I64 => write!(f, "i64"),
            TypeRef::F32 => write!(f, "f32"),
            TypeRef::F64 => write!(f, "f64"),
            TypeRef::Char => write!(f, "char"),
            TypeRef::String => write!(f, "String"),
            TypeRef::Bytes => write!(f, "Vec<u8>"),
            TypeRef::Enum(e) => write!(f, "{}", e.name),
            TypeRef::Temporal(kind) => write!(f, "{}", kind),
            TypeRef::Range(element) => write!(f, "Range<{}>", element),
            TypeRef::List(element) => write!(f, "Vec<{}>", element),
            TypeRef::Set(element) => write!(f, "Set<{}>", element),
            TypeRef::Map(key, value) => write!(f, "Map<{}, {}>", key, value),
            TypeRef::Document => write!(f, "Document"),
            TypeRef::Entity(name) => write!(f, "{}", name),
            TypeRef::Custom(custom) => write!(f, "{}", custom.name()),
        }
    }
}
