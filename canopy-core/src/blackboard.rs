use std::any::{type_name, Any};
use std::collections::BTreeMap;
use std::marker::PhantomData;

use thiserror::Error;

/// Failure modes of name-based blackboard access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlackboardError {
    #[error("blackboard key `{key}` is not set")]
    Missing { key: String },

    #[error("blackboard key `{key}` does not hold a value of type `{expected}`")]
    TypeMismatch { key: String, expected: &'static str },
}

/// Statically typed handle to a named blackboard entry.
///
/// Keys are plain names, so a `BbKey` and a runtime string (e.g. a node parameter) refer to the
/// same slot when the names match.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BbKey<T: 'static> {
    name: &'static str,
    _phantom: PhantomData<fn() -> T>,
}

impl<T: 'static> Copy for BbKey<T> {}

impl<T: 'static> Clone for BbKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> BbKey<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _phantom: PhantomData,
        }
    }

    pub fn name(self) -> &'static str {
        self.name
    }
}

/// Per-agent key/value store shared by every tree of that agent.
///
/// Typed access through [`BbKey`] treats a type mismatch as a programming error and panics.
/// Name-based access (`value`, `value_mut`) reports it as [`BlackboardError`] instead, since
/// names usually come from data-driven tree descriptions.
#[derive(Default)]
pub struct Blackboard {
    values: BTreeMap<String, Box<dyn Any>>,
}

impl Blackboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Names of all entries, in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn contains<T: 'static>(&self, key: BbKey<T>) -> bool {
        self.values.contains_key(key.name)
    }

    pub fn set<T: 'static>(&mut self, key: BbKey<T>, value: T) {
        self.set_value(key.name, value);
    }

    pub fn get<T: 'static>(&self, key: BbKey<T>) -> Option<&T> {
        let value = self.values.get(key.name)?;
        Some(value.downcast_ref::<T>().unwrap_or_else(|| mismatch::<T>(key.name)))
    }

    pub fn get_mut<T: 'static>(&mut self, key: BbKey<T>) -> Option<&mut T> {
        let value = self.values.get_mut(key.name)?;
        Some(value.downcast_mut::<T>().unwrap_or_else(|| mismatch::<T>(key.name)))
    }

    pub fn remove<T: 'static>(&mut self, key: BbKey<T>) -> Option<T> {
        let value = self.values.remove(key.name)?;
        Some(
            value
                .downcast::<T>()
                .map(|b| *b)
                .unwrap_or_else(|_| mismatch::<T>(key.name)),
        )
    }

    pub fn has_key(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Insert or overwrite the entry `name`, regardless of the type previously stored there.
    pub fn set_value<T: 'static>(&mut self, name: impl Into<String>, value: T) {
        self.values.insert(name.into(), Box::new(value));
    }

    pub fn value<T: 'static>(&self, name: &str) -> Result<&T, BlackboardError> {
        let value = self.values.get(name).ok_or_else(|| BlackboardError::Missing {
            key: name.to_owned(),
        })?;
        value
            .downcast_ref::<T>()
            .ok_or_else(|| BlackboardError::TypeMismatch {
                key: name.to_owned(),
                expected: type_name::<T>(),
            })
    }

    pub fn value_mut<T: 'static>(&mut self, name: &str) -> Result<&mut T, BlackboardError> {
        let value = self
            .values
            .get_mut(name)
            .ok_or_else(|| BlackboardError::Missing {
                key: name.to_owned(),
            })?;
        value
            .downcast_mut::<T>()
            .ok_or_else(|| BlackboardError::TypeMismatch {
                key: name.to_owned(),
                expected: type_name::<T>(),
            })
    }

    pub fn remove_key(&mut self, name: &str) -> bool {
        self.values.remove(name).is_some()
    }
}

fn mismatch<T: 'static>(name: &str) -> ! {
    panic!(
        "blackboard type mismatch for key `{name}` (stored type differs from requested {})",
        type_name::<T>()
    )
}
