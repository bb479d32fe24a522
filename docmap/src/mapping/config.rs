use crate::common::{DEFAULT_MAX_DEPTH, DEFAULT_TYPE_KEY};
use crate::errors::{ErrorKind, MappingError, MappingResult};

/// Settings of a [MappingConverter](crate::mapping::MappingConverter).
///
/// Assembled through
/// [MappingConverterBuilder](crate::mapping::MappingConverterBuilder); the
/// converter keeps its own copy, so a config never changes under an active
/// conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingConfig {
    type_key: Option<String>,
    write_type_hints: bool,
    max_depth: usize,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl MappingConfig {
    /// Creates a config with the `_class` type key, type hints enabled and a
    /// nesting limit of 64.
    pub fn new() -> Self {
        MappingConfig {
            type_key: Some(DEFAULT_TYPE_KEY.to_string()),
            write_type_hints: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// The reserved type hint key, `None` when type hints are disabled.
    pub fn type_key(&self) -> Option<&str> {
        self.type_key.as_deref()
    }

    /// Sets the type hint key. `None` disables reading and writing of type
    /// hints altogether.
    ///
    /// # Errors
    ///
    /// Returns error if the key is empty or contains the field separator.
    pub fn set_type_key(&mut self, type_key: Option<&str>) -> MappingResult<()> {
        if let Some(key) = type_key {
            if key.trim().is_empty() {
                log::error!("Type key cannot be empty");
                return Err(MappingError::new(
                    "Type key cannot be empty",
                    ErrorKind::InvalidOperation,
                ));
            }
            if key.contains(crate::common::FIELD_SEPARATOR) {
                log::error!("Type key {} cannot contain the field separator", key);
                return Err(MappingError::new(
                    &format!("Type key {} cannot contain the field separator", key),
                    ErrorKind::InvalidOperation,
                ));
            }
        }
        self.type_key = type_key.map(str::to_string);
        Ok(())
    }

    pub fn write_type_hints(&self) -> bool {
        self.write_type_hints
    }

    /// Globally allows or suppresses writing type hints. Hints in the source
    /// are still read as long as a type key is set.
    pub fn set_write_type_hints(&mut self, write_type_hints: bool) {
        self.write_type_hints = write_type_hints;
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Sets how deep entities, collections and maps may nest before a
    /// conversion fails with [ErrorKind::DepthLimitExceeded].
    ///
    /// # Errors
    ///
    /// Returns error if the depth is zero.
    pub fn set_max_depth(&mut self, max_depth: usize) -> MappingResult<()> {
        if max_depth == 0 {
            log::error!("Maximum depth must be positive");
            return Err(MappingError::new(
                "Maximum depth must be positive",
                ErrorKind::InvalidOperation,
            ));
        }
        self.max_depth = max_depth;
        Ok(())
    }
}
