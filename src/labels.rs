//! The label table: label name → resolved instruction-pointer value.
//!
//! One flat table per assembler instance — no scoping, no namespaces.
//! Redeclaring a name silently overwrites its address; references are
//! checked only at resolution time, which is what makes forward references
//! legal.

use alloc::collections::BTreeMap;
use alloc::string::String;

use crate::error::AsmError;

/// Mapping from label name to the instruction pointer observed at its
/// declaration.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LabelTable {
    entries: BTreeMap<String, u16>,
}

impl LabelTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a label's address.
    pub fn declare(&mut self, name: &str, address: u16) {
        self.entries.insert(String::from(name), address);
    }

    /// Look up a label's address.
    ///
    /// # Errors
    ///
    /// [`AsmError::UnresolvedLabel`] if the name was never declared.
    pub fn resolve(&self, name: &str) -> Result<u16, AsmError> {
        self.entries
            .get(name)
            .copied()
            .ok_or_else(|| AsmError::UnresolvedLabel {
                label: String::from(name),
            })
    }

    /// Whether a label has been declared.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Iterate over `(name, address)` entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u16)> {
        self.entries.iter().map(|(name, addr)| (name.as_str(), *addr))
    }

    /// The number of declared labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declare_then_resolve() {
        let mut table = LabelTable::new();
        table.declare("START", 0x100);
        assert_eq!(table.resolve("START").unwrap(), 0x100);
        assert!(table.contains("START"));
    }

    #[test]
    fn resolve_unknown_fails() {
        let table = LabelTable::new();
        let err = table.resolve("MISSING").unwrap_err();
        assert_eq!(
            err,
            AsmError::UnresolvedLabel {
                label: "MISSING".into()
            }
        );
    }

    #[test]
    fn redeclaration_overwrites_silently() {
        let mut table = LabelTable::new();
        table.declare("L", 0x100);
        table.declare("L", 0x140);
        assert_eq!(table.resolve("L").unwrap(), 0x140);
        assert_eq!(table.len(), 1);
    }
}
