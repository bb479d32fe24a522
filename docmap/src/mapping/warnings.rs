use std::fmt::{self, Display};
use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;

use crate::common::WARNING_LIMIT;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Direction {
    Read,
    Write,
}

impl Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Read => write!(f, "read"),
            Direction::Write => write!(f, "write"),
        }
    }
}

type WarningKey = (String, String, Direction);

/// Counts warnings about temporal properties which have neither date formats
/// nor a registered converter, and lets only the first few of them through
/// per entity, property and direction.
///
/// Counters are shared by all conversions of a converter. A lost increment
/// under contention only lets one more warning through.
#[derive(Debug, Default)]
pub(crate) struct TemporalWarnings {
    counters: DashMap<WarningKey, AtomicUsize>,
}

impl TemporalWarnings {
    pub(crate) fn new() -> Self {
        TemporalWarnings {
            counters: DashMap::new(),
        }
    }

    /// Logs the warning unless the limit for the key is exhausted. Returns
    /// whether it was logged.
    pub(crate) fn warn(&self, entity: &str, property: &str, direction: Direction) -> bool {
        let key = (entity.to_string(), property.to_string(), direction);
        let count = self
            .counters
            .entry(key)
            .or_insert_with(|| AtomicUsize::new(0))
            .fetch_add(1, Ordering::Relaxed);

        if count >= WARNING_LIMIT {
            return false;
        }

        log::warn!(
            "Property {}.{} has a temporal type but neither date formats nor a registered converter; \
            it is {} as a nested document of its components ({} of {} warnings)",
            entity,
            property,
            match direction {
                Direction::Read => "read",
                Direction::Write => "written",
            },
            count + 1,
            WARNING_LIMIT
        );
        true
    }

    pub(crate) fn count(&self, entity: &str, property: &str, direction: Direction) -> usize {
        self.counters
            .get(&(entity.to_string(), property.to_string(), direction))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }
}
