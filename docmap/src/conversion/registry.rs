use std::collections::HashSet;
use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;
use std::sync::Arc;

use crate::common::{Convertible, Object, StoreType, TypeRef, Value};
use crate::conversion::register_defaults;
use crate::errors::{ErrorKind, MappingError, MappingResult};

/// Converts a domain value of one type into a store value.
pub trait WritingConverter: Send + Sync {
    fn source_type(&self) -> TypeRef;
    fn target_type(&self) -> StoreType;
    fn convert(&self, value: &Object) -> MappingResult<Value>;
}

/// Converts a store value into a domain value of one type.
pub trait ReadingConverter: Send + Sync {
    fn source_type(&self) -> StoreType;
    fn target_type(&self) -> TypeRef;
    fn convert(&self, value: &Value) -> MappingResult<Object>;
}

/// A type which brings its own store representation.
///
/// Registering the type with
/// [ConversionRegistryBuilder::register] adds both directions, and the whole
/// type is then stored through `to_store`/`from_store` instead of being
/// traversed.
///
/// # Examples
///
/// ```rust,ignore
/// #[derive(Debug, Clone, PartialEq)]
/// struct Celsius(f64);
///
/// custom_convertible!(Celsius);
///
/// impl CustomConversion for Celsius {
///     const STORE_TYPE: StoreType = StoreType::Float;
///
///     fn to_store(&self) -> MappingResult<Value> {
///         Ok(Value::F64(self.0))
///     }
///
///     fn from_store(value: &Value) -> MappingResult<Self> {
///         value.as_f64().map(Celsius).ok_or_else(|| MappingError::conversion("not a number"))
///     }
/// }
/// ```
pub trait CustomConversion: Convertible + Send + Sync + 'static {
    const STORE_TYPE: StoreType;

    fn to_store(&self) -> MappingResult<Value>;
    fn from_store(value: &Value) -> MappingResult<Self>;
}

struct CustomWriter<T>(PhantomData<fn() -> T>);

impl<T: CustomConversion> WritingConverter for CustomWriter<T> {
    fn source_type(&self) -> TypeRef {
        T::type_ref()
    }

    fn target_type(&self) -> StoreType {
        T::STORE_TYPE
    }

    fn convert(&self, value: &Object) -> MappingResult<Value> {
        T::from_object(value.clone())?.to_store()
    }
}

struct CustomReader<T>(PhantomData<fn() -> T>);

impl<T: CustomConversion> ReadingConverter for CustomReader<T> {
    fn source_type(&self) -> StoreType {
        T::STORE_TYPE
    }

    fn target_type(&self) -> TypeRef {
        T::type_ref()
    }

    fn convert(&self, value: &Value) -> MappingResult<Object> {
        T::from_store(value)?.to_object()
    }
}

type WriteFn = dyn Fn(&Object) -> MappingResult<Value> + Send + Sync;
type ReadFn = dyn Fn(&Value) -> MappingResult<Object> + Send + Sync;

/// A [WritingConverter] backed by a closure.
pub struct FnWritingConverter {
    source: TypeRef,
    target: StoreType,
    f: Box<WriteFn>,
}

impl FnWritingConverter {
    pub fn new<F>(source: TypeRef, target: StoreType, f: F) -> Self
    where
        F: Fn(&Object) -> MappingResult<Value> + Send + Sync + 'static,
    {
        FnWritingConverter {
            source,
            target,
            f: Box::new(f),
        }
    }
}

impl WritingConverter for FnWritingConverter {
    fn source_type(&self) -> TypeRef {
        self.source.clone()
    }

    fn target_type(&self) -> StoreType {
        self.target
    }

    fn convert(&self, value: &Object) -> MappingResult<Value> {
        (self.f)(value)
    }
}

/// A [ReadingConverter] backed by a closure.
pub struct FnReadingConverter {
    source: StoreType,
    target: TypeRef,
    f: Box<ReadFn>,
}

impl FnReadingConverter {
    pub fn new<F>(source: StoreType, target: TypeRef, f: F) -> Self
    where
        F: Fn(&Value) -> MappingResult<Object> + Send + Sync + 'static,
    {
        FnReadingConverter {
            source,
            target,
            f: Box::new(f),
        }
    }
}

impl ReadingConverter for FnReadingConverter {
    fn source_type(&self) -> StoreType {
        self.source
    }

    fn target_type(&self) -> TypeRef {
        self.target.clone()
    }

    fn convert(&self, value: &Value) -> MappingResult<Object> {
        (self.f)(value)
    }
}

struct WriterEntry {
    source: TypeRef,
    target: StoreType,
    converter: Arc<dyn WritingConverter>,
}

struct ReaderEntry {
    source: StoreType,
    target: TypeRef,
    converter: Arc<dyn ReadingConverter>,
}

fn source_accepts(source: StoreType, actual: StoreType) -> bool {
    source == actual || (source == StoreType::Float && actual == StoreType::Integer)
}

/// The catalog of custom conversions and the authority on which types are
/// stored as simple values.
///
/// Built once through [ConversionRegistryBuilder] and read-only afterwards.
/// Converters registered by the user are consulted before the bundled
/// defaults, so a user registration for a default type replaces it.
pub struct ConversionRegistry {
    writers: Vec<WriterEntry>,
    readers: Vec<ReaderEntry>,
    simple_types: HashSet<TypeRef>,
}

impl ConversionRegistry {
    pub fn builder() -> ConversionRegistryBuilder {
        ConversionRegistryBuilder::new()
    }

    /// `true` if values of the type are stored as they are, without
    /// recursion: scalars, enums, generic documents, explicitly registered
    /// simple types and custom types written to a scalar.
    pub fn is_simple_type(&self, type_ref: &TypeRef) -> bool {
        match type_ref {
            TypeRef::Bool
            | TypeRef::I32
            | TypeRef::I64
            | TypeRef::F32
            | TypeRef::F64
            | TypeRef::Char
            | TypeRef::String
            | TypeRef::Bytes
            | TypeRef::Enum(_)
            | TypeRef::Document => true,
            TypeRef::Temporal(_)
            | TypeRef::Range(_)
            | TypeRef::List(_)
            | TypeRef::Set(_)
            | TypeRef::Map(_, _)
            | TypeRef::Entity(_)
            | TypeRef::Any => false,
            TypeRef::Custom(_) => {
                self.simple_types.contains(type_ref)
                    || self
                        .custom_write_target(type_ref)
                        .is_some_and(|target| target.is_scalar())
            }
        }
    }

    /// The store type a registered writing converter produces for the type.
    pub fn custom_write_target(&self, type_ref: &TypeRef) -> Option<StoreType> {
        self.writer_for(type_ref).map(|entry| entry.target)
    }

    pub fn has_custom_write_target(&self, type_ref: &TypeRef) -> bool {
        self.writer_for(type_ref).is_some()
    }

    /// `true` if a registered reading converter turns values of the store
    /// type into the target type.
    pub fn has_custom_read_target(&self, source: StoreType, target: &TypeRef) -> bool {
        self.reader_for(source, target).is_some()
    }

    pub fn convert_write(&self, value: &Object) -> MappingResult<Value> {
        let type_ref = value.runtime_type();
        match self.writer_for(&type_ref) {
            Some(entry) => entry
                .converter
                .convert(value)
                .map_err(|e| e.with_value_type(&type_ref)),
            None => {
                log::error!("No writing converter registered for {}", type_ref);
                Err(MappingError::new(
                    &format!("No writing converter registered for {}", type_ref),
                    ErrorKind::ConversionError,
                )
                .with_value_type(type_ref))
            }
        }
    }

    pub fn convert_read(&self, value: &Value, target: &TypeRef) -> MappingResult<Object> {
        match self.reader_for(value.store_type(), target) {
            Some(entry) => entry
                .converter
                .convert(value)
                .map_err(|e| e.with_target_type(target).with_value_type(value.store_type())),
            None => {
                log::error!(
                    "No reading converter registered from {} to {}",
                    value.store_type(),
                    target
                );
                Err(MappingError::new(
                    &format!(
                        "No reading converter registered from {} to {}",
                        value.store_type(),
                        target
                    ),
                    ErrorKind::ConversionError,
                )
                .with_target_type(target)
                .with_value_type(value.store_type()))
            }
        }
    }

    fn writer_for(&self, type_ref: &TypeRef) -> Option<&WriterEntry> {
        self.writers.iter().find(|entry| &entry.source == type_ref)
    }

    fn reader_for(&self, source: StoreType, target: &TypeRef) -> Option<&ReaderEntry> {
        self.readers
            .iter()
            .find(|entry| &entry.target == target && entry.source == source)
            .or_else(|| {
                self.readers
                    .iter()
                    .find(|entry| &entry.target == target && source_accepts(entry.source, source))
            })
    }
}

impl Debug for ConversionRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let writers = self
            .writers
            .iter()
            .map(|e| format!("{} -> {}", e.source, e.target))
            .collect::<Vec<_>>();
        let readers = self
            .readers
            .iter()
            .map(|e| format!("{} -> {}", e.source, e.target))
            .collect::<Vec<_>>();
        f.debug_struct("ConversionRegistry")
            .field("writers", &writers)
            .field("readers", &readers)
            .field("simple_types", &self.simple_types)
            .finish()
    }
}

impl Default for ConversionRegistry {
    fn default() -> Self {
        let mut builder = ConversionRegistryBuilder::new();
        builder.push_defaults();
        ConversionRegistry {
            writers: builder.writers,
            readers: builder.readers,
            simple_types: builder.simple_types,
        }
    }
}

/// Builder for [ConversionRegistry].
///
/// Registering two converters for the same source and target type is an
/// error, reported by [build](ConversionRegistryBuilder::build) together with
/// any other registration error. The first error wins.
pub struct ConversionRegistryBuilder {
    writers: Vec<WriterEntry>,
    readers: Vec<ReaderEntry>,
    simple_types: HashSet<TypeRef>,
    with_defaults: bool,
    error: Option<MappingError>,
}

impl ConversionRegistryBuilder {
    pub fn new() -> Self {
        ConversionRegistryBuilder {
            writers: Vec::new(),
            readers: Vec::new(),
            simple_types: HashSet::new(),
            with_defaults: true,
            error: None,
        }
    }

    /// Registers both directions of a [CustomConversion] type.
    pub fn register<T: CustomConversion>(self) -> Self {
        self.add_writing_converter(Arc::new(CustomWriter::<T>(PhantomData)))
            .add_reading_converter(Arc::new(CustomReader::<T>(PhantomData)))
    }

    pub fn add_writing_converter(mut self, converter: Arc<dyn WritingConverter>) -> Self {
        let source = converter.source_type();
        let target = converter.target_type();
        if self
            .writers
            .iter()
            .any(|e| e.source == source && e.target == target)
        {
            self.duplicate(format!("Duplicate writing converter {} -> {}", source, target));
            return self;
        }

        log::debug!("Registered writing converter {} -> {}", source, target);
        self.writers.push(WriterEntry {
            source,
            target,
            converter,
        });
        self
    }

    pub fn add_reading_converter(mut self, converter: Arc<dyn ReadingConverter>) -> Self {
        let source = converter.source_type();
        let target = converter.target_type();
        if self
            .readers
            .iter()
            .any(|e| e.source == source && e.target == target)
        {
            self.duplicate(format!("Duplicate reading converter {} -> {}", source, target));
            return self;
        }

        log::debug!("Registered reading converter {} -> {}", source, target);
        self.readers.push(ReaderEntry {
            source,
            target,
            converter,
        });
        self
    }

    /// Marks a custom type as simple, so it is passed through the simple
    /// write and read paths.
    pub fn add_simple_type(mut self, type_ref: TypeRef) -> Self {
        self.simple_types.insert(type_ref);
        self
    }

    /// Leaves the bundled geo, UUID, decimal and sequence number converters
    /// out.
    pub fn without_defaults(mut self) -> Self {
        self.with_defaults = false;
        self
    }

    pub fn build(mut self) -> MappingResult<ConversionRegistry> {
        if self.with_defaults {
            self.push_defaults();
        }

        if let Some(err) = self.error.take() {
            return Err(err);
        }

        Ok(ConversionRegistry {
            writers: self.writers,
            readers: self.readers,
            simple_types: self.simple_types,
        })
    }

    fn push_defaults(&mut self) {
        let defaults = register_defaults(ConversionRegistryBuilder::new().without_defaults());
        self.merge(defaults);
    }

    /// Appends the registrations of `other` behind the ones already present.
    /// Earlier registrations keep precedence, a pending error of `other` is
    /// kept unless this builder already failed.
    fn merge(&mut self, mut other: ConversionRegistryBuilder) {
        // user registrations come first and shadow the defaults
        self.writers.append(&mut other.writers);
        self.readers.append(&mut other.readers);
        self.simple_types.extend(other.simple_types);
        if self.error.is_none() {
            self.error = other.error;
        }
    }

    fn duplicate(&mut self, message: String) {
        log::error!("{}", message);
        if self.error.is_none() {
            self.error = Some(MappingError::new(&message, ErrorKind::DuplicateConverter));
        }
    }
}

impl Default for ConversionRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
