//! The ordered set of selected chips.
//!
//! [`ChipSet`] is an insertion-ordered map from [`ChipId`] to [`Chip`]. Ids
//! come from a per-set counter that only ever grows, so removing a chip can
//! never make a later chip collide with a live one.

use crate::catalog::CatalogEntry;
use indexmap::IndexMap;
use std::fmt;

/// Identity of one chip, unique for the lifetime of its [`ChipSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChipId(u64);

impl ChipId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ChipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A selected person, rendered as a removable token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chip {
    pub id: ChipId,
    pub label: String,
    pub avatar_url: String,
}

/// Insertion-ordered chips keyed by [`ChipId`].
#[derive(Debug, Clone, Default)]
pub struct ChipSet {
    chips: IndexMap<ChipId, Chip>,
    next_id: u64,
}

impl ChipSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chip for `entry` and return its id.
    ///
    /// Selecting a name that is already chipped is tolerated: the new chip
    /// gets its own id and both stay.
    pub fn select(&mut self, entry: &CatalogEntry) -> ChipId {
        if self.contains_label(&entry.name) {
            tracing::debug!(label = %entry.name, "selecting an already chipped name");
        }
        self.next_id += 1;
        let id = ChipId(self.next_id);
        self.chips.insert(
            id,
            Chip {
                id,
                label: entry.name.clone(),
                avatar_url: entry.avatar_url.clone(),
            },
        );
        id
    }

    /// Remove the chip with `id`, keeping the order of the rest.
    /// Unknown ids are a no-op.
    pub fn remove(&mut self, id: ChipId) -> Option<Chip> {
        self.chips.shift_remove(&id)
    }

    pub fn get(&self, id: ChipId) -> Option<&Chip> {
        self.chips.get(&id)
    }

    pub fn contains(&self, id: ChipId) -> bool {
        self.chips.contains_key(&id)
    }

    /// Whether any live chip carries `label`.
    pub fn contains_label(&self, label: &str) -> bool {
        self.chips.values().any(|chip| chip.label == label)
    }

    /// The most recently selected chip.
    pub fn last(&self) -> Option<&Chip> {
        self.chips.last().map(|(_, chip)| chip)
    }

    /// Chips in selection order.
    pub fn iter(&self) -> impl Iterator<Item = &Chip> {
        self.chips.values()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.chips.values().map(|chip| chip.label.as_str())
    }

    pub fn len(&self) -> usize {
        self.chips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chips.is_empty()
    }

    /// Drop every chip. Ids keep counting from where they were.
    pub fn clear(&mut self) {
        self.chips.clear();
    }
}

impl<'a> IntoIterator for &'a ChipSet {
    type Item = &'a Chip;
    type IntoIter = indexmap::map::Values<'a, ChipId, Chip>;

    fn into_iter(self) -> Self::IntoIter {
        self.chips.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(name: &str) -> CatalogEntry {
        CatalogEntry::new(name, format!("{}@abc.com", name.to_lowercase()))
    }

    #[test]
    fn select_appends_in_order() {
        let mut chips = ChipSet::new();
        chips.select(&person("Miles"));
        chips.select(&person("Oleta"));
        assert_eq!(chips.labels().collect::<Vec<_>>(), vec!["Miles", "Oleta"]);
        assert_eq!(chips.last().unwrap().label, "Oleta");
    }

    #[test]
    fn chip_copies_avatar() {
        let mut chips = ChipSet::new();
        let id = chips.select(&person("Enoch"));
        assert_eq!(
            chips.get(id).unwrap().avatar_url,
            "https://robohash.org/Enoch.png?set=set4"
        );
    }

    #[test]
    fn remove_keeps_order_of_rest() {
        let mut chips = ChipSet::new();
        let a = chips.select(&person("A"));
        let b = chips.select(&person("B"));
        let c = chips.select(&person("C"));

        let removed = chips.remove(b).unwrap();
        assert_eq!(removed.label, "B");
        assert_eq!(chips.iter().map(|c| c.id).collect::<Vec<_>>(), vec![a, c]);
    }

    #[test]
    fn remove_unknown_is_noop() {
        let mut chips = ChipSet::new();
        let id = chips.select(&person("A"));
        chips.remove(id);
        assert!(chips.remove(id).is_none());
        assert!(chips.is_empty());
    }

    #[test]
    fn ids_are_not_reused_after_removal() {
        // A counter derived from the chip count would hand out #2 twice here.
        let mut chips = ChipSet::new();
        let first = chips.select(&person("A"));
        let second = chips.select(&person("B"));
        chips.remove(first);
        let third = chips.select(&person("C"));

        assert_ne!(third, second);
        assert_eq!(chips.len(), 2);
        assert!(chips.contains(second) && chips.contains(third));
    }

    #[test]
    fn duplicate_label_gets_distinct_id() {
        let mut chips = ChipSet::new();
        let one = chips.select(&person("Miles"));
        let two = chips.select(&person("Miles"));
        assert_ne!(one, two);
        assert_eq!(chips.len(), 2);
        assert!(chips.contains_label("Miles"));
    }

    #[test]
    fn clear_keeps_counting() {
        let mut chips = ChipSet::new();
        let before = chips.select(&person("A"));
        chips.clear();
        let after = chips.select(&person("A"));
        assert!(after > before);
    }
}
