//! The mount point a controller renders into.
//!
//! Writers always replace the whole contents; there is no diffing. A card's own
//! delete action is the only partial mutation and goes through
//! [`Container::remove_where`].

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mounted<T> {
    Item(T),
    /// Informational element shown instead of items, e.g. an empty result.
    Placeholder(String),
}

/// Shared handle; clones see the same contents.
#[derive(Debug)]
pub struct Container<T> {
    inner: Arc<Mutex<Vec<Mounted<T>>>>,
}

impl<T> Clone for Container<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for Container<T> {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl<T: Clone> Container<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Mounted<T>>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Clears the container and mounts `contents`, but only if `is_current`
    /// still holds once the lock is taken. Returns whether the write happened.
    pub fn replace_if(
        &self,
        is_current: impl FnOnce() -> bool,
        contents: Vec<Mounted<T>>,
    ) -> bool {
        let mut mounted = self.lock();
        if !is_current() {
            return false;
        }
        mounted.clear();
        mounted.extend(contents);
        true
    }

    pub fn replace(&self, contents: Vec<Mounted<T>>) {
        self.replace_if(|| true, contents);
    }

    /// Unmounts every item matching `predicate`; placeholders are kept.
    pub fn remove_where(&self, mut predicate: impl FnMut(&T) -> bool) -> usize {
        let mut mounted = self.lock();
        let before = mounted.len();
        mounted.retain(|entry| match entry {
            Mounted::Item(item) => !predicate(item),
            Mounted::Placeholder(_) => true,
        });
        before - mounted.len()
    }

    pub fn snapshot(&self) -> Vec<Mounted<T>> {
        self.lock().clone()
    }

    pub fn items(&self) -> Vec<T> {
        self.lock()
            .iter()
            .filter_map(|entry| match entry {
                Mounted::Item(item) => Some(item.clone()),
                Mounted::Placeholder(_) => None,
            })
            .collect()
    }

    pub fn placeholders(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|entry| match entry {
                Mounted::Placeholder(text) => Some(text.clone()),
                Mounted::Item(_) => None,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_if_skips_write_when_no_longer_current() {
        let container = Container::new();
        container.replace(vec![Mounted::Item(1), Mounted::Item(2)]);

        assert!(!container.replace_if(|| false, vec![Mounted::Item(9)]));
        assert_eq!(container.items(), vec![1, 2]);

        assert!(container.replace_if(|| true, vec![Mounted::Placeholder("none".into())]));
        assert_eq!(container.items(), Vec::<i32>::new());
        assert_eq!(container.placeholders(), vec!["none".to_string()]);
    }

    #[test]
    fn remove_where_only_touches_matching_items() {
        let container = Container::new();
        container.replace(vec![Mounted::Item(1), Mounted::Item(2), Mounted::Item(3)]);
        let handle = container.clone();

        assert_eq!(handle.remove_where(|item| *item == 2), 1);
        assert_eq!(container.items(), vec![1, 3]);
        assert_eq!(container.remove_where(|item| *item == 42), 0);
    }
}
