//! Sign picker catalog

use lazy_static::lazy_static;

use crate::types::{SignCategory, Tier};

lazy_static! {
    static ref CATEGORIES: Vec<SignCategory> =
        serde_json::from_str(include_str!("../../data/sign_categories.json"))
            .expect("data/sign_categories.json is valid");
}

/// Categories offered at `tier`; deep includes every quick category
pub fn categories(tier: Tier) -> Vec<SignCategory> {
    CATEGORIES
        .iter()
        .filter(|c| tier == Tier::Deep || c.tier == Tier::Quick)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sign_table::SignTable;

    fn find_category(id: &str) -> Option<&'static SignCategory> {
        CATEGORIES.iter().find(|c| c.id == id)
    }

    #[test]
    fn test_tiers() {
        let quick = categories(Tier::Quick);
        let deep = categories(Tier::Deep);
        assert_eq!(quick.len(), 9);
        assert_eq!(deep.len(), 17);
        assert!(quick.iter().all(|c| c.tier == Tier::Quick));
        assert!(quick.iter().all(|c| deep.contains(c)));
    }

    #[test]
    fn test_find_category() {
        assert_eq!(find_category("angel-numbers").map(|c| c.tier), Some(Tier::Deep));
        assert!(find_category("missing").is_none());
    }

    #[test]
    fn test_every_category_has_signs() {
        let table = SignTable::builtin();
        for category in categories(Tier::Deep) {
            assert!(!category.signs.is_empty(), "{} is empty", category.id);
        }
        // the quick picker's number category uses labels the table knows exactly
        let numbers = find_category("numbers").unwrap();
        assert!(numbers.signs.iter().any(|s| table.get_exact(s).is_some()));
    }
}
