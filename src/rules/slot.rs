//! Fixed-capacity rule slot.

use serde::Serialize;
use thiserror::Error;

/// Errors raised by rule slot access.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("rule index {index} out of range for slot of capacity {capacity}")]
    IndexOutOfRange { index: usize, capacity: usize },
}

/// Ordered table of rules addressed by index. Writing an index overwrites it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleSlot<R> {
    entries: Vec<Option<R>>,
}

impl<R> RuleSlot<R> {
    pub fn with_capacity(capacity: usize) -> Self {
        let mut entries = Vec::with_capacity(capacity);
        entries.resize_with(capacity, || None);
        Self { entries }
    }

    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    fn check(&self, index: usize) -> Result<(), RuleError> {
        if index >= self.entries.len() {
            return Err(RuleError::IndexOutOfRange {
                index,
                capacity: self.entries.len(),
            });
        }
        Ok(())
    }

    /// Overwrite the rule at `index`.
    pub fn set(&mut self, index: usize, rule: R) -> Result<(), RuleError> {
        self.check(index)?;
        self.entries[index] = Some(rule);
        Ok(())
    }

    /// Remove the rule at `index`, returning it.
    pub fn clear(&mut self, index: usize) -> Result<Option<R>, RuleError> {
        self.check(index)?;
        Ok(self.entries[index].take())
    }

    pub fn get(&self, index: usize) -> Option<&R> {
        self.entries.get(index).and_then(Option::as_ref)
    }

    /// Occupied rules in index order.
    pub fn rules(&self) -> impl Iterator<Item = &R> {
        self.entries.iter().flatten()
    }
}
