//! Short-name generation and the rename map.

use std::collections::BTreeSet;

use luamod_lexer::NameTables;
use rustc_hash::{FxHashMap, FxHashSet};

const LEADING: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const TRAILING: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_";

/// Candidate short names ordered by length, then by position in the
/// alphabet `a..z A..Z` (digits and `_` follow letters in later positions).
///
/// Covers every one- to three-character name; keywords are skipped.
pub struct NameGenerator<'t> {
    tables: &'t NameTables,
    index: usize,
}

const ONE: usize = LEADING.len();
const TWO: usize = LEADING.len() * TRAILING.len();
const THREE: usize = LEADING.len() * TRAILING.len() * TRAILING.len();

impl<'t> NameGenerator<'t> {
    pub fn new(tables: &'t NameTables) -> Self {
        Self { tables, index: 0 }
    }

    /// Total number of names before keyword filtering.
    pub const CAPACITY: usize = ONE + TWO + THREE;

    fn nth(index: usize) -> Option<String> {
        let bytes = if index < ONE {
            vec![LEADING[index]]
        } else if index < ONE + TWO {
            let i = index - ONE;
            vec![LEADING[i / TRAILING.len()], TRAILING[i % TRAILING.len()]]
        } else if index < Self::CAPACITY {
            let i = index - ONE - TWO;
            let per_lead = TRAILING.len() * TRAILING.len();
            let rest = i % per_lead;
            vec![
                LEADING[i / per_lead],
                TRAILING[rest / TRAILING.len()],
                TRAILING[rest % TRAILING.len()],
            ]
        } else {
            return None;
        };
        String::from_utf8(bytes).ok()
    }
}

impl Iterator for NameGenerator<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            let name = Self::nth(self.index)?;
            self.index += 1;
            if !self.tables.is_keyword(&name) {
                return Some(name);
            }
        }
    }
}

/// Injective `old name -> new name` map.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenameMap {
    map: FxHashMap<String, String>,
}

impl RenameMap {
    /// Assign short names to `locals` in sorted order.
    ///
    /// `in_use` holds identifiers that stay as they are; no local is mapped
    /// onto one of them, nor onto a keyword or allow-listed global. When
    /// the generator runs dry the remaining locals get `vN`, with `N` the
    /// local's position in sorted order (bumped past collisions).
    pub fn build(locals: &BTreeSet<String>, in_use: &FxHashSet<&str>, tables: &NameTables) -> Self {
        let usable = |name: &str| !in_use.contains(name) && !tables.is_reserved(name);
        let mut generator = NameGenerator::new(tables).filter(|n| usable(n));
        let mut taken: FxHashSet<String> = FxHashSet::default();
        let mut map = FxHashMap::default();
        for (position, local) in locals.iter().enumerate() {
            let short = match generator.next() {
                Some(name) => name,
                None => {
                    let mut n = position;
                    loop {
                        let candidate = format!("v{n}");
                        if usable(&candidate) && !taken.contains(&candidate) {
                            break candidate;
                        }
                        n += 1;
                    }
                }
            };
            taken.insert(short.clone());
            map.insert(local.clone(), short);
        }
        Self { map }
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.map.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests;
