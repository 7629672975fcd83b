//! String interner for identifiers and literal text.
//!
//! Strings are leaked into `'static` storage so lookups hand out plain
//! `&'static str` without holding the lock.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::Name;

#[derive(Default)]
struct InternTable {
    map: FxHashMap<&'static str, Name>,
    strings: Vec<&'static str>,
}

/// Interner mapping text to [`Name`] handles.
pub struct StringInterner {
    table: RwLock<InternTable>,
}

/// Interner handle shared between pipeline stages.
pub type SharedInterner = Arc<StringInterner>;

impl StringInterner {
    pub fn new() -> Self {
        let mut table = InternTable::default();
        table.map.insert("", Name::EMPTY);
        table.strings.push("");
        StringInterner {
            table: RwLock::new(table),
        }
    }

    /// Intern `text`, returning the existing handle when already present.
    pub fn intern(&self, text: &str) -> Name {
        if let Some(&name) = self.table.read().map.get(text) {
            return name;
        }

        let mut table = self.table.write();
        // Another writer may have inserted between the two locks.
        if let Some(&name) = table.map.get(text) {
            return name;
        }
        let leaked: &'static str = Box::leak(text.to_owned().into_boxed_str());
        let name = Name::from_raw(u32::try_from(table.strings.len()).unwrap_or(u32::MAX));
        table.strings.push(leaked);
        table.map.insert(leaked, name);
        name
    }

    /// Text for `name`. Unknown handles resolve to `""`.
    pub fn lookup(&self, name: Name) -> &'static str {
        self.table
            .read()
            .strings
            .get(name.index())
            .copied()
            .unwrap_or("")
    }

    /// Number of distinct strings, including the pre-interned empty string.
    pub fn len(&self) -> usize {
        self.table.read().strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_shared(self) -> SharedInterner {
        Arc::new(self)
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_is_idempotent() {
        let interner = StringInterner::new();
        let a = interner.intern("point");
        let b = interner.intern("point");
        let c = interner.intern("vector");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(interner.lookup(a), "point");
        assert_eq!(interner.lookup(c), "vector");
    }

    #[test]
    fn empty_string_is_pre_interned() {
        let interner = StringInterner::new();
        assert_eq!(interner.intern(""), Name::EMPTY);
        assert_eq!(interner.len(), 1);
    }

    #[test]
    fn unknown_name_looks_up_empty() {
        let interner = StringInterner::new();
        assert_eq!(interner.lookup(Name::from_raw(99)), "");
    }
}
