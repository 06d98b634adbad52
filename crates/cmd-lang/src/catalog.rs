//! Action catalog: which actions each object kind supports, split into
//! type-level and instance-level sets.
//!
//! The catalog is the parser's single source of vocabulary truth. It is
//! built by the application from its handler registry, so the grammar
//! can never accept a command nothing is able to execute. Action names
//! are stored lowercased; ordering is preserved as defined, which is
//! also the order completion and help listings use.

use std::collections::BTreeMap;

use crate::ast::TypeName;

/// Per-kind action vocabulary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionSet {
    /// Actions addressed at the kind itself (`disk.count`).
    pub class: Vec<String>,
    /// Actions addressed at one instance (`disk(3).delete`).
    pub instance: Vec<String>,
}

impl ActionSet {
    /// Class and instance names in listing order, class first.
    pub fn all(&self) -> impl Iterator<Item = &str> {
        self.class
            .iter()
            .chain(self.instance.iter())
            .map(String::as_str)
    }
}

/// The full vocabulary, one [`ActionSet`] per registered kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: BTreeMap<TypeName, ActionSet>,
}

impl Catalog {
    pub fn new() -> Catalog {
        Catalog::default()
    }

    /// Register (or replace) the action sets of a kind. Names are
    /// lowercased on the way in.
    pub fn define(&mut self, kind: TypeName, class: &[&str], instance: &[&str]) {
        let lower = |names: &[&str]| names.iter().map(|n| n.to_ascii_lowercase()).collect();
        self.entries.insert(
            kind,
            ActionSet {
                class: lower(class),
                instance: lower(instance),
            },
        );
    }

    pub fn contains(&self, kind: TypeName) -> bool {
        self.entries.contains_key(&kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = TypeName> + '_ {
        self.entries.keys().copied()
    }

    pub fn class_actions(&self, kind: TypeName) -> &[String] {
        self.entries.get(&kind).map_or(&[], |set| set.class.as_slice())
    }

    pub fn instance_actions(&self, kind: TypeName) -> &[String] {
        self.entries
            .get(&kind)
            .map_or(&[], |set| set.instance.as_slice())
    }

    pub fn has_class_action(&self, kind: TypeName, action: &str) -> bool {
        self.class_actions(kind).iter().any(|a| a == action)
    }

    pub fn has_instance_action(&self, kind: TypeName, action: &str) -> bool {
        self.instance_actions(kind).iter().any(|a| a == action)
    }

    /// Every action the kind supports, for suggestions and completion.
    pub fn actions(&self, kind: TypeName) -> Vec<&str> {
        self.entries.get(&kind).map_or_else(Vec::new, |set| set.all().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.define(TypeName::Disk, &["count", "list"], &["delete", "info"]);
        catalog.define(TypeName::Datacenter, &["list"], &[]);
        catalog
    }

    #[test]
    fn test_lookup_is_scoped_per_kind_and_level() {
        let catalog = sample();
        assert!(catalog.has_class_action(TypeName::Disk, "count"));
        assert!(!catalog.has_instance_action(TypeName::Disk, "count"));
        assert!(catalog.has_instance_action(TypeName::Disk, "delete"));
        assert!(!catalog.has_class_action(TypeName::Disk, "delete"));
        // Not bleeding across kinds.
        assert!(!catalog.has_class_action(TypeName::Datacenter, "count"));
    }

    #[test]
    fn test_names_are_lowercased_on_define() {
        let mut catalog = Catalog::new();
        catalog.define(TypeName::Vm, &["List"], &["Disk_Attach"]);
        assert!(catalog.has_class_action(TypeName::Vm, "list"));
        assert!(catalog.has_instance_action(TypeName::Vm, "disk_attach"));
    }

    #[test]
    fn test_actions_union_preserves_order() {
        let catalog = sample();
        assert_eq!(
            catalog.actions(TypeName::Disk),
            vec!["count", "list", "delete", "info"]
        );
        assert!(catalog.actions(TypeName::Vm).is_empty());
    }

    #[test]
    fn test_unregistered_kind_is_empty() {
        let catalog = sample();
        assert!(!catalog.contains(TypeName::Ip));
        assert!(catalog.class_actions(TypeName::Ip).is_empty());
        assert!(catalog.instance_actions(TypeName::Ip).is_empty());
    }
}
