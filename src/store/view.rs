//! Filtered projections over the store's canonical collections.
//!
//! A [`FilteredView`] borrows the store and is computed on read, so it always
//! reflects the current collections and can never be observed half-updated.

use std::sync::Arc;

/// A shareable filter over `T`.
pub type Predicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// The default filter: accepts everything.
pub fn show_all<T>() -> Predicate<T> {
    Arc::new(|_| true)
}

/// An ordered, read-only selection of items from the store.
#[derive(Debug)]
pub struct FilteredView<'a, T> {
    items: Vec<&'a T>,
}

impl<'a, T> FilteredView<'a, T> {
    pub(crate) fn new(items: Vec<&'a T>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Zero-based lookup, as the command layer resolves displayed indices.
    pub fn get(&self, index: usize) -> Option<&'a T> {
        self.items.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a T> + '_ {
        self.items.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.items.iter().map(|item| (*item).clone()).collect()
    }
}

impl<'a, T> IntoIterator for FilteredView<'a, T> {
    type Item = &'a T;
    type IntoIter = std::vec::IntoIter<&'a T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_preserves_selection_order() {
        let data = [3, 1, 2];
        let view = FilteredView::new(data.iter().filter(|n| **n != 1).collect());
        assert_eq!(view.len(), 2);
        assert_eq!(view.get(0), Some(&3));
        assert_eq!(view.get(2), None);
        assert_eq!(view.to_vec(), vec![3, 2]);
    }

    #[test]
    fn show_all_accepts_anything() {
        let all = show_all::<u8>();
        assert!(all(&0) && all(&255));
    }
}
