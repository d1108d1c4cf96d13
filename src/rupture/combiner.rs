//! Merging of independently synthesized rupture sets.

use std::collections::HashMap;

use tracing::debug;

use super::set::RuptureSet;
use super::types::Rupture;

/// Result of merging two rupture sets.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedRuptures {
    pub ruptures: RuptureSet,
    /// Ruptures from the second set absorbed into a matching first-set rupture.
    pub matched: usize,
}

/// Merges `b` into `a` branch by branch.
///
/// Within a branch, a rupture of `b` whose section signature matches one in
/// `a` adds its rate to that rupture and disappears; everything else is
/// kept as is. Branches present on one side only pass through unchanged.
pub fn combine(a: &RuptureSet, b: &RuptureSet) -> CombinedRuptures {
    let mut ruptures = RuptureSet::new();
    let mut matched = 0;

    for (key, left) in a.iter() {
        let right = b.get(key).unwrap_or(&[]);
        let (merged, n) = combine_ruptures(left, right);
        matched += n;
        ruptures.insert(*key, merged);
    }
    for (key, right) in b.iter() {
        if a.get(key).is_none() {
            ruptures.insert(*key, right.to_vec());
        }
    }

    debug!(
        left = a.len(),
        right = b.len(),
        matched,
        combined = ruptures.len(),
        "Combined rupture sets"
    );
    CombinedRuptures { ruptures, matched }
}

/// Merges two rupture lists by section signature.
///
/// # Returns
/// `(merged, matched)` where `merged.len() == a.len() + b.len() - matched`.
pub fn combine_ruptures(a: &[Rupture], b: &[Rupture]) -> (Vec<Rupture>, usize) {
    let mut merged = a.to_vec();
    let matched = absorb_ruptures(&mut merged, b.iter().cloned());
    (merged, matched)
}

/// Merges `other` into `target` in place, without copying `target`.
///
/// Returns the number of ruptures of `other` absorbed into a matching one.
pub fn combine_into(target: &mut RuptureSet, other: RuptureSet) -> usize {
    let mut matched = 0;
    for (key, ruptures) in other.into_branches() {
        let existing = target.branch_mut(key);
        if existing.is_empty() {
            *existing = ruptures;
        } else {
            matched += absorb_ruptures(existing, ruptures);
        }
    }
    matched
}

fn absorb_ruptures(merged: &mut Vec<Rupture>, incoming: impl IntoIterator<Item = Rupture>) -> usize {
    let mut index: HashMap<Vec<usize>, usize> = HashMap::with_capacity(merged.len());
    for (slot, rupture) in merged.iter().enumerate() {
        index.entry(rupture.signature()).or_insert(slot);
    }

    let mut matched = 0;
    for rupture in incoming {
        match index.get(&rupture.signature()) {
            Some(&slot) => {
                merged[slot].rate += rupture.rate;
                matched += 1;
            }
            None => merged.push(rupture),
        }
    }
    matched
}
