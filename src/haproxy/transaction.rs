//! In-memory configuration and transactions over it.
//!
//! # Responsibilities
//! - Hold committed directives per section
//! - Apply get/set/insert/delete against a working copy
//! - Track whether any mutation was performed
//!
//! # Design Decisions
//! - A transaction owns its working copy; commit hands it back as the new state
//! - Every mutating call marks the transaction dirty, even when it was a no-op
//! - Ordered multi-entry directives (`log`) keep insertion order

use std::collections::BTreeMap;

use serde::Serialize;

use crate::haproxy::directive::{Directive, Section};

type Directives = BTreeMap<String, Vec<Directive>>;

/// Committed proxy configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Configuration {
    sections: BTreeMap<Section, Directives>,
}

impl Configuration {
    /// Empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Baseline configuration the proxy is first started with: daemon mode on.
    pub fn baseline() -> Self {
        let mut config = Self::new();
        config
            .section_mut(Section::Global)
            .insert("daemon".to_string(), vec![Directive::Enabled]);
        config.section_mut(Section::Defaults);
        config
    }

    /// Open a transaction over a copy of this configuration.
    pub fn begin(&self) -> Transaction {
        Transaction {
            working: self.clone(),
            dirty: false,
        }
    }

    /// First entry of a directive.
    pub fn get(&self, section: Section, key: &str) -> Option<&Directive> {
        self.get_all(section, key).first()
    }

    /// All entries of a directive, in order.
    pub fn get_all(&self, section: Section, key: &str) -> &[Directive] {
        self.sections
            .get(&section)
            .and_then(|d| d.get(key))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn section_mut(&mut self, section: Section) -> &mut Directives {
        self.sections.entry(section).or_default()
    }

    /// Render as haproxy.cfg text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (section, directives) in &self.sections {
            out.push_str(&section.to_string());
            out.push('\n');
            for (key, entries) in directives {
                for entry in entries {
                    out.push_str("  ");
                    out.push_str(&entry.render(key));
                    out.push('\n');
                }
            }
            out.push('\n');
        }
        out
    }
}

/// Mutable view of a configuration for the duration of one pass.
#[derive(Debug)]
pub struct Transaction {
    working: Configuration,
    dirty: bool,
}

impl Transaction {
    pub fn get(&self, section: Section, key: &str) -> Option<&Directive> {
        self.working.get(section, key)
    }

    pub fn get_all(&self, section: Section, key: &str) -> &[Directive] {
        self.working.get_all(section, key)
    }

    /// Replace every entry of a directive with `value`, or remove it when `None`.
    pub fn set(&mut self, section: Section, key: &str, value: Option<Directive>) {
        let directives = self.working.section_mut(section);
        match value {
            Some(v) => {
                directives.insert(key.to_string(), vec![v]);
            }
            None => {
                directives.remove(key);
            }
        }
        self.mark_dirty();
    }

    /// Insert an entry of an ordered directive at `index`.
    ///
    /// Indexes past the end append.
    pub fn insert(&mut self, section: Section, key: &str, value: Directive, index: usize) {
        let entries = self.working.section_mut(section).entry(key.to_string()).or_default();
        let index = index.min(entries.len());
        entries.insert(index, value);
        self.mark_dirty();
    }

    /// Remove a directive. Returns whether it was present.
    pub fn delete(&mut self, section: Section, key: &str) -> bool {
        let existed = self.working.section_mut(section).remove(key).is_some();
        self.mark_dirty();
        existed
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn has_changes(&self) -> bool {
        self.dirty
    }

    /// Working state, including uncommitted changes.
    pub fn configuration(&self) -> &Configuration {
        &self.working
    }

    /// Finish the transaction and return the resulting configuration.
    pub fn commit(self) -> Configuration {
        self.working
    }

    /// Drop all pending changes.
    pub fn discard(self) {
        tracing::debug!(pending = self.dirty, "Transaction discarded");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_delete() {
        let base = Configuration::new();
        let mut txn = base.begin();
        assert!(!txn.has_changes());

        txn.set(Section::Defaults, "maxconn", Some(Directive::Int(100)));
        assert_eq!(txn.get(Section::Defaults, "maxconn"), Some(&Directive::Int(100)));
        assert!(txn.has_changes());

        assert!(txn.delete(Section::Defaults, "maxconn"));
        assert!(!txn.delete(Section::Defaults, "maxconn"));
        assert!(txn.get(Section::Defaults, "maxconn").is_none());

        // Base is untouched until commit.
        assert_eq!(base, Configuration::new());
    }

    #[test]
    fn test_insert_keeps_order_and_clamps() {
        let mut txn = Configuration::new().begin();
        txn.insert(Section::Global, "log", Directive::Text("a".into()), 0);
        txn.insert(Section::Global, "log", Directive::Text("c".into()), 5);
        txn.insert(Section::Global, "log", Directive::Text("b".into()), 1);

        let entries = txn.get_all(Section::Global, "log");
        assert_eq!(
            entries,
            &[
                Directive::Text("a".into()),
                Directive::Text("b".into()),
                Directive::Text("c".into()),
            ]
        );
    }

    #[test]
    fn test_commit_and_render() {
        let mut txn = Configuration::baseline().begin();
        txn.set(Section::Defaults, "timeout connect", Some(Directive::Timeout("5s".into())));
        let config = txn.commit();

        let rendered = config.render();
        assert!(rendered.contains("global\n  daemon\n"));
        assert!(rendered.contains("defaults\n  timeout connect 5s\n"));
    }
}
