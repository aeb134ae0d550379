//! Ordered, growable storage with an explicit doubling policy.
//!
//! A roster starts with a fixed number of slots and doubles its slot count
//! whenever a push would overflow it. Growth never reorders entries.

use std::ops::{Index, IndexMut};
use std::slice;

#[derive(Clone, Debug)]
pub struct Roster<T> {
    items: Vec<T>,
    slots: usize,
}

impl<T> Roster<T> {
    /// Create an empty roster with `initial` slots (at least one).
    pub fn with_slots(initial: usize) -> Self {
        let slots = initial.max(1);
        Self {
            items: Vec::with_capacity(slots),
            slots,
        }
    }

    /// Append at the end, doubling the slot count when full.
    pub fn push(&mut self, item: T) {
        if self.items.len() == self.slots {
            self.slots *= 2;
            self.items.reserve_exact(self.slots - self.items.len());
        }
        self.items.push(item);
    }

    /// Remove the entry at `index`, shifting later entries forward.
    pub fn remove(&mut self, index: usize) -> T {
        self.items.remove(index)
    }

    /// Replace every entry. The slot count never drops below its current
    /// value and always covers the new contents.
    pub fn replace(&mut self, items: Vec<T>) {
        while self.slots < items.len() {
            self.slots *= 2;
        }
        self.items = items;
        let missing = self.slots - self.items.len();
        self.items.reserve_exact(missing);
    }

    pub fn position(&self, predicate: impl FnMut(&T) -> bool) -> Option<usize> {
        self.items.iter().position(predicate)
    }

    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub(crate) fn retain(&mut self, keep: impl FnMut(&T) -> bool) {
        self.items.retain(keep);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Current slot count.
    pub fn slots(&self) -> usize {
        self.slots
    }
}

impl<T> Index<usize> for Roster<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<T> IndexMut<usize> for Roster<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.items[index]
    }
}

impl<'a, T> IntoIterator for &'a Roster<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doubles_when_full() {
        let mut roster = Roster::with_slots(2);
        roster.push(1);
        roster.push(2);
        assert_eq!(roster.slots(), 2);
        roster.push(3);
        assert_eq!(roster.slots(), 4);
        roster.push(4);
        roster.push(5);
        assert_eq!(roster.slots(), 8);
        assert_eq!(roster.iter().copied().collect::<Vec<_>>(), [1, 2, 3, 4, 5]);
    }

    #[test]
    fn remove_preserves_order() {
        let mut roster = Roster::with_slots(4);
        for n in 1..=4 {
            roster.push(n);
        }
        assert_eq!(roster.remove(1), 2);
        assert_eq!(roster.iter().copied().collect::<Vec<_>>(), [1, 3, 4]);
        assert_eq!(roster.slots(), 4);
    }

    #[test]
    fn replace_grows_to_cover_contents() {
        let mut roster: Roster<u32> = Roster::with_slots(10);
        roster.replace((0..25).collect());
        assert_eq!(roster.len(), 25);
        assert_eq!(roster.slots(), 40);

        roster.replace(vec![7]);
        assert_eq!(roster.slots(), 40);
    }

    #[test]
    fn zero_slots_still_grows() {
        let mut roster = Roster::with_slots(0);
        roster.push('a');
        roster.push('b');
        assert_eq!(roster.slots(), 2);
    }
}
