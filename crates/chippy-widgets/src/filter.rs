//! The search filter: which catalog entries the dropdown offers.

use crate::catalog::{Catalog, CatalogEntry};
use crate::chips::ChipSet;

/// Entries whose name contains `text` case-insensitively and is not already
/// a chip label, in catalog order.
///
/// An empty `text` matches every remaining entry, so focusing an empty
/// field shows the whole rest of the catalog.
pub fn filter<'a>(catalog: &'a Catalog, text: &str, selected: &ChipSet) -> Vec<&'a CatalogEntry> {
    let needle = text.to_lowercase();
    catalog
        .entries()
        .iter()
        .filter(|entry| !selected.contains_label(&entry.name))
        .filter(|entry| entry.name.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn names(entries: &[&CatalogEntry]) -> Vec<String> {
        entries.iter().map(|entry| entry.name.clone()).collect()
    }

    fn select(catalog: &Catalog, chips: &mut ChipSet, name: &str) {
        chips.select(catalog.get(name).unwrap());
    }

    #[test]
    fn empty_text_returns_everything_unselected() {
        let catalog = Catalog::builtin();
        let mut chips = ChipSet::new();
        select(&catalog, &mut chips, "Miles");

        let all = filter(&catalog, "", &chips);
        assert_eq!(all.len(), catalog.len() - 1);
        assert!(!names(&all).contains(&"Miles".to_string()));
        assert_eq!(all[0].name, "Terry Doe");
    }

    #[test]
    fn terr_matches_both_then_one() {
        let catalog = Catalog::builtin();
        let mut chips = ChipSet::new();

        assert_eq!(names(&filter(&catalog, "Terr", &chips)), vec!["Terry Doe", "Terrill"]);

        select(&catalog, &mut chips, "Terry Doe");
        assert_eq!(names(&filter(&catalog, "Terr", &chips)), vec!["Terrill"]);
    }

    #[test]
    fn matches_inside_the_name() {
        let catalog = Catalog::builtin();
        let chips = ChipSet::new();
        assert_eq!(names(&filter(&catalog, "sim", &chips)), vec!["Arely Sim"]);
        assert!(filter(&catalog, "zzz", &chips).is_empty());
    }

    #[test]
    fn email_is_not_searched() {
        let catalog = Catalog::builtin();
        let chips = ChipSet::new();
        assert!(filter(&catalog, "gmail", &chips).is_empty());
    }

    #[test]
    fn removing_a_chip_restores_it() {
        let catalog = Catalog::builtin();
        let mut chips = ChipSet::new();
        let before = names(&filter(&catalog, "o", &chips));

        let id = chips.select(catalog.get("Sheldon Smith").unwrap());
        assert_ne!(names(&filter(&catalog, "o", &chips)), before);

        chips.remove(id);
        assert_eq!(names(&filter(&catalog, "o", &chips)), before);
    }

    fn chip_subset() -> impl Strategy<Value = Vec<bool>> {
        prop::collection::vec(any::<bool>(), Catalog::builtin().len())
    }

    proptest! {
        #[test]
        fn never_offers_a_selected_name(text in "[a-zA-Z ]{0,4}", picks in chip_subset()) {
            let catalog = Catalog::builtin();
            let mut chips = ChipSet::new();
            for (entry, pick) in catalog.entries().iter().zip(picks) {
                if pick {
                    chips.select(entry);
                }
            }
            for entry in filter(&catalog, &text, &chips) {
                prop_assert!(!chips.contains_label(&entry.name));
            }
        }

        #[test]
        fn empty_text_is_catalog_minus_labels(picks in chip_subset()) {
            let catalog = Catalog::builtin();
            let mut chips = ChipSet::new();
            for (entry, pick) in catalog.entries().iter().zip(picks) {
                if pick {
                    chips.select(entry);
                }
            }
            let expected: Vec<String> = catalog
                .entries()
                .iter()
                .filter(|entry| !chips.contains_label(&entry.name))
                .map(|entry| entry.name.clone())
                .collect();
            prop_assert_eq!(names(&filter(&catalog, "", &chips)), expected);
        }

        #[test]
        fn case_does_not_matter(text in "[a-zA-Z]{0,5}") {
            let catalog = Catalog::builtin();
            let chips = ChipSet::new();
            prop_assert_eq!(
                names(&filter(&catalog, &text.to_lowercase(), &chips)),
                names(&filter(&catalog, &text.to_uppercase(), &chips))
            );
        }
    }
}
