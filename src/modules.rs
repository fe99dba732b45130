//! The set of modules that need rebuilding.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::descriptor::ModuleId;

/// Deduplicated module identifiers, iterated in lexicographic order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ModuleSet(BTreeSet<ModuleId>);

impl ModuleSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Union of two sets. Merging with an empty set returns the other one
    /// untouched.
    #[must_use]
    pub fn merge(a: Self, b: Self) -> Self {
        if a.is_empty() {
            return b;
        }
        if b.is_empty() {
            return a;
        }
        let (mut big, small) = if a.len() >= b.len() { (a, b) } else { (b, a) };
        big.0.extend(small.0);
        big
    }

    /// Add a module; returns `false` if it was already present.
    pub fn insert(&mut self, id: ModuleId) -> bool {
        self.0.insert(id)
    }

    #[must_use]
    pub fn contains(&self, id: &ModuleId) -> bool {
        self.0.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModuleId> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<ModuleId> for ModuleSet {
    fn from_iter<I: IntoIterator<Item = ModuleId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ModuleSet {
    type Item = &'a ModuleId;
    type IntoIter = std::collections::btree_set::Iter<'a, ModuleId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Comma-separated, in order: `alpha,beta`.
impl fmt::Display for ModuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, id) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{id}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn set(names: &[&str]) -> ModuleSet {
        names.iter().map(|n| ModuleId::new(n).unwrap()).collect()
    }

    #[test]
    fn merge_collapses_duplicates_in_order() {
        let merged = ModuleSet::merge(set(&["beta", "alpha"]), set(&["gamma", "alpha"]));
        assert_eq!(merged.to_string(), "alpha,beta,gamma");
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn merge_with_empty_is_identity() {
        let a = set(&["alpha"]);
        assert_eq!(ModuleSet::merge(a.clone(), ModuleSet::new()), a);
        assert_eq!(ModuleSet::merge(ModuleSet::new(), a.clone()), a);
        assert!(ModuleSet::merge(ModuleSet::new(), ModuleSet::new()).is_empty());
    }

    #[test]
    fn serializes_as_sorted_list() {
        let json = serde_json::to_string(&set(&["b", "a"])).unwrap();
        assert_eq!(json, r#"["a","b"]"#);
    }

    fn module_set() -> impl Strategy<Value = ModuleSet> {
        prop::collection::vec("[a-e]{1,3}", 0..8)
            .prop_map(|names| names.iter().map(|n| ModuleId::new(n).unwrap()).collect())
    }

    proptest! {
        #[test]
        fn merge_is_commutative(a in module_set(), b in module_set()) {
            prop_assert_eq!(
                ModuleSet::merge(a.clone(), b.clone()),
                ModuleSet::merge(b, a)
            );
        }

        #[test]
        fn merge_is_idempotent(a in module_set()) {
            prop_assert_eq!(ModuleSet::merge(a.clone(), a.clone()), a);
        }

        #[test]
        fn merge_contains_both_inputs(a in module_set(), b in module_set()) {
            let merged = ModuleSet::merge(a.clone(), b.clone());
            prop_assert!(a.iter().chain(b.iter()).all(|id| merged.contains(id)));
            prop_assert!(merged.len() <= a.len() + b.len());
        }
    }
}
