//! Rupture-rate maps keyed by MFD branch.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::types::Rupture;
use crate::mfd::BranchKey;

/// Ruptures of one branch, the serialized form of a [`RuptureSet`] entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchRuptures {
    pub key: BranchKey,
    pub label: String,
    pub ruptures: Vec<Rupture>,
}

/// Ruptures grouped by the MFD branch that produced them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(into = "Vec<BranchRuptures>", from = "Vec<BranchRuptures>")]
pub struct RuptureSet {
    branches: BTreeMap<BranchKey, Vec<Rupture>>,
}

impl RuptureSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends ruptures to a branch, creating it if needed.
    pub fn insert(&mut self, key: BranchKey, ruptures: Vec<Rupture>) {
        self.branches.entry(key).or_default().extend(ruptures);
    }

    pub fn get(&self, key: &BranchKey) -> Option<&[Rupture]> {
        self.branches.get(key).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&BranchKey, &[Rupture])> {
        self.branches.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Every rupture across all branches.
    pub fn ruptures(&self) -> impl Iterator<Item = &Rupture> {
        self.branches.values().flatten()
    }

    pub(crate) fn branch_mut(&mut self, key: BranchKey) -> &mut Vec<Rupture> {
        self.branches.entry(key).or_default()
    }

    pub(crate) fn into_branches(self) -> impl Iterator<Item = (BranchKey, Vec<Rupture>)> {
        self.branches.into_iter()
    }

    pub(crate) fn ruptures_mut(&mut self) -> impl Iterator<Item = &mut Rupture> {
        self.branches.values_mut().flatten()
    }

    pub fn branch_count(&self) -> usize {
        self.branches.len()
    }

    /// Number of ruptures across all branches.
    pub fn len(&self) -> usize {
        self.branches.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn total_rate(&self) -> f64 {
        self.ruptures().map(|r| r.rate).sum()
    }

    pub fn total_moment_rate(&self) -> f64 {
        self.ruptures().map(Rupture::moment_rate).sum()
    }
}

impl From<RuptureSet> for Vec<BranchRuptures> {
    fn from(set: RuptureSet) -> Self {
        set.branches
            .into_iter()
            .map(|(key, ruptures)| BranchRuptures {
                key,
                label: key.to_string(),
                ruptures,
            })
            .collect()
    }
}

impl From<Vec<BranchRuptures>> for RuptureSet {
    fn from(entries: Vec<BranchRuptures>) -> Self {
        let mut set = RuptureSet::new();
        for entry in entries {
            set.insert(entry.key, entry.ruptures);
        }
        set
    }
}
