use std::collections::BTreeMap;

use crate::env::AbilityOracle;

use super::{AbilityDef, AbilityId};

/// In-memory ability catalog keyed by [`AbilityId`].
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityBook {
    definitions: BTreeMap<AbilityId, AbilityDef>,
}

impl AbilityBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a definition, returning the one it replaced.
    pub fn insert(&mut self, def: AbilityDef) -> Option<AbilityDef> {
        self.definitions.insert(def.id, def)
    }

    pub fn with(mut self, def: AbilityDef) -> Self {
        self.insert(def);
        self
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AbilityDef> {
        self.definitions.values()
    }

    /// Abilities from `ids` that have no definition here.
    pub fn missing<'a>(&self, ids: impl IntoIterator<Item = &'a AbilityId>) -> Vec<AbilityId> {
        ids.into_iter()
            .filter(|id| !self.definitions.contains_key(id))
            .copied()
            .collect()
    }
}

impl FromIterator<AbilityDef> for AbilityBook {
    fn from_iter<I: IntoIterator<Item = AbilityDef>>(iter: I) -> Self {
        let mut book = Self::new();
        for def in iter {
            book.insert(def);
        }
        book
    }
}

impl AbilityOracle for AbilityBook {
    fn definition(&self, id: AbilityId) -> Option<&AbilityDef> {
        self.definitions.get(&id)
    }
}
