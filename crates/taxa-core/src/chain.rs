//! The per-rank selection chain
//!
//! A [`Chain`] holds at most one selected node per rank. Selecting or
//! clearing a rank always clears every deeper rank, because a descendant
//! selection may not be a valid child of the new ancestor.

use crate::node::{Classification, TaxonomicNode};
use crate::rank::{RankMap, TaxonomicRank};

/// Working selection, one optional node per rank
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chain {
    slots: RankMap<Option<TaxonomicNode>>,
}

/// Empty every slot from `from` to the terminal rank
///
/// Slots above `from` are returned untouched.
#[must_use]
pub fn cascade_clear(mut chain: Chain, from: TaxonomicRank) -> Chain {
    for rank in from.iter_from() {
        chain.slots.set(rank, None);
    }
    chain
}

impl Chain {
    /// Chain with no selection
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Rebuild a chain from a previously saved ancestry
    ///
    /// Each rank takes the node in `ancestry` bearing that rank; input
    /// order is irrelevant and the first node seen wins on duplicate ranks.
    /// Ranks without a match stay empty, so the result may start below the
    /// root.
    #[must_use]
    pub fn from_ancestry<'a>(ancestry: impl IntoIterator<Item = &'a TaxonomicNode>) -> Self {
        let mut slots: RankMap<Option<TaxonomicNode>> = RankMap::default();
        for node in ancestry {
            let slot = slots.get_mut(node.rank);
            if slot.is_none() {
                *slot = Some(node.clone());
            }
        }
        Self { slots }
    }

    /// Selected node at a rank
    #[inline]
    #[must_use]
    pub fn get(&self, rank: TaxonomicRank) -> Option<&TaxonomicNode> {
        self.slots.get(rank).as_ref()
    }

    /// Whether a rank has a selection
    #[inline]
    #[must_use]
    pub fn is_selected(&self, rank: TaxonomicRank) -> bool {
        self.slots.get(rank).is_some()
    }

    /// Select (or clear with `None`) a rank and clear every deeper rank
    pub fn select(&mut self, rank: TaxonomicRank, node: Option<TaxonomicNode>) {
        self.slots.set(rank, node);
        self.clear_after(rank);
    }

    /// Empty every slot strictly deeper than `rank`
    pub fn clear_after(&mut self, rank: TaxonomicRank) {
        if let Some(child) = rank.child() {
            self.clear_from(child);
        }
    }

    /// Empty every slot from `rank` down
    pub fn clear_from(&mut self, rank: TaxonomicRank) {
        *self = cascade_clear(std::mem::take(self), rank);
    }

    /// Replace the node held at its rank when the id matches
    ///
    /// Used after a rename: identity and position are unchanged, only the
    /// display data is refreshed. Returns whether a slot was updated.
    pub fn refresh(&mut self, node: &TaxonomicNode) -> bool {
        match self.slots.get_mut(node.rank) {
            Some(held) if held.id == node.id => {
                *held = node.clone();
                true
            }
            _ => false,
        }
    }

    /// Deepest selected node, scanning from the terminal rank upward
    #[must_use]
    pub fn terminal(&self) -> Option<&TaxonomicNode> {
        self.slots.iter().rev().find_map(|(_, slot)| slot.as_ref())
    }

    /// Classification to persist against a plant
    #[must_use]
    pub fn classification(&self) -> Classification {
        Classification {
            taxon_id: self.terminal().map(|node| node.id.clone()),
        }
    }

    /// First selected rank
    #[must_use]
    pub fn first_selected(&self) -> Option<TaxonomicRank> {
        self.slots
            .iter()
            .find_map(|(rank, slot)| slot.as_ref().map(|_| rank))
    }

    /// Ranks with a selection, root first
    pub fn populated(&self) -> impl Iterator<Item = TaxonomicRank> + '_ {
        self.slots
            .iter()
            .filter_map(|(rank, slot)| slot.as_ref().map(|_| rank))
    }

    /// `(rank, selection)` pairs, root first
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (TaxonomicRank, Option<&TaxonomicNode>)> {
        self.slots.iter().map(|(rank, slot)| (rank, slot.as_ref()))
    }

    /// Number of selected ranks
    #[must_use]
    pub fn len(&self) -> usize {
        self.populated().count()
    }

    /// Whether nothing is selected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.first_selected().is_none()
    }

    /// Ancestor-before-descendant: once a slot is empty, every deeper slot is empty
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let mut gap = false;
        for (_, slot) in self.slots.iter() {
            match (slot.is_some(), gap) {
                (true, true) => return false,
                (false, _) => gap = true,
                (true, false) => {}
            }
        }
        true
    }

    /// Selected slots form one unbroken run, possibly starting below the root
    ///
    /// An ancestry covering Family and Subfamily is contiguous but not
    /// consistent. One covering Family and Genus is neither, since Subfamily,
    /// Tribe and Subtribe sit between them.
    #[must_use]
    pub fn is_contiguous(&self) -> bool {
        match self.first_selected() {
            None => true,
            Some(first) => {
                let mut ended = false;
                for rank in first.iter_from() {
                    match (self.is_selected(rank), ended) {
                        (true, true) => return false,
                        (false, _) => ended = true,
                        (true, false) => {}
                    }
                }
                true
            }
        }
    }

    /// Display path of the selected names, e.g. `"Rosaceae > Rosa"`
    #[must_use]
    pub fn lineage_names(&self) -> String {
        self.slots
            .iter()
            .filter_map(|(_, slot)| slot.as_ref().map(|node| node.name.as_str()))
            .collect::<Vec<_>>()
            .join(" > ")
    }
}
