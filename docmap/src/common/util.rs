use std::sync::Arc;

use parking_lot::RwLock;

pub type Atomic<T> = Arc<RwLock<T>>;

#[inline]
pub fn atomic<T>(t: T) -> Atomic<T> {
    Arc::new(RwLock::new(t))
}

pub trait ReadExecutor<T: ?Sized> {
    fn read_with<R>(&self, f: impl FnOnce(&T) -> R) -> R;
}

impl<T> ReadExecutor<T> for Atomic<T> {
    #[inline]
    fn read_with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let read_guard = self.read();
        f(&*read_guard)
    }
}

/// Splits a dotted store field name into its path segments.
#[inline]
pub(crate) fn split_path(path: &str) -> Vec<&str> {
    path.split(crate::common::FIELD_SEPARATOR).collect()
}

#[inline]
pub(crate) fn is_embedded(key: &str) -> bool {
    key.contains(crate::common::FIELD_SEPARATOR)
}
