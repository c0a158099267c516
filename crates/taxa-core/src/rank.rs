//! Taxonomic ranks
//!
//! The rank list is closed and totally ordered. Adjacency in [`TaxonomicRank::ALL`]
//! defines the parent level of every rank: rank `i` is the parent level of rank `i + 1`.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::ops::{Index, IndexMut};
use std::str::FromStr;

/// One fixed level of the taxonomic hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaxonomicRank {
    /// Domain (root level)
    Domain,
    /// Kingdom
    Kingdom,
    /// Subkingdom
    Subkingdom,
    /// Division (phylum)
    Division,
    /// Subdivision
    Subdivision,
    /// Superclass
    Superclass,
    /// Class
    Class,
    /// Subclass
    Subclass,
    /// Order
    Order,
    /// Suborder
    Suborder,
    /// Family
    Family,
    /// Subfamily
    Subfamily,
    /// Tribe
    Tribe,
    /// Subtribe
    Subtribe,
    /// Genus
    Genus,
    /// Subgenus
    Subgenus,
    /// Section
    Section,
    /// Species (terminal level)
    Species,
}

impl TaxonomicRank {
    /// Number of ranks
    pub const COUNT: usize = 18;

    /// Every rank, root first
    pub const ALL: [TaxonomicRank; Self::COUNT] = [
        Self::Domain,
        Self::Kingdom,
        Self::Subkingdom,
        Self::Division,
        Self::Subdivision,
        Self::Superclass,
        Self::Class,
        Self::Subclass,
        Self::Order,
        Self::Suborder,
        Self::Family,
        Self::Subfamily,
        Self::Tribe,
        Self::Subtribe,
        Self::Genus,
        Self::Subgenus,
        Self::Section,
        Self::Species,
    ];

    /// The root rank
    pub const ROOT: TaxonomicRank = Self::Domain;

    /// The deepest rank
    pub const TERMINAL: TaxonomicRank = Self::Species;

    /// Position in the fixed rank order
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Rank at a position in the fixed rank order
    ///
    /// # Errors
    /// - `CoreError::RankOutOfRange` if `index >= COUNT`
    #[inline]
    pub fn from_index(index: usize) -> Result<Self, CoreError> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(CoreError::RankOutOfRange(index))
    }

    /// Parent level, `None` for the root
    #[inline]
    #[must_use]
    pub fn parent(self) -> Option<Self> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }

    /// Child level, `None` for the terminal rank
    #[inline]
    #[must_use]
    pub fn child(self) -> Option<Self> {
        Self::ALL.get(self.index() + 1).copied()
    }

    /// Whether this is the root rank
    #[inline]
    #[must_use]
    pub fn is_root(self) -> bool {
        self == Self::ROOT
    }

    /// Whether this is the deepest rank
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        self == Self::TERMINAL
    }

    /// This rank and every deeper rank, in order
    pub fn iter_from(self) -> impl DoubleEndedIterator<Item = Self> {
        Self::ALL[self.index()..].iter().copied()
    }

    /// Every rank strictly deeper than this one, in order
    pub fn descendants(self) -> impl DoubleEndedIterator<Item = Self> {
        Self::ALL[self.index() + 1..].iter().copied()
    }

    /// Wire name (`"DOMAIN"`, `"KINGDOM"`, ...)
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Domain => "DOMAIN",
            Self::Kingdom => "KINGDOM",
            Self::Subkingdom => "SUBKINGDOM",
            Self::Division => "DIVISION",
            Self::Subdivision => "SUBDIVISION",
            Self::Superclass => "SUPERCLASS",
            Self::Class => "CLASS",
            Self::Subclass => "SUBCLASS",
            Self::Order => "ORDER",
            Self::Suborder => "SUBORDER",
            Self::Family => "FAMILY",
            Self::Subfamily => "SUBFAMILY",
            Self::Tribe => "TRIBE",
            Self::Subtribe => "SUBTRIBE",
            Self::Genus => "GENUS",
            Self::Subgenus => "SUBGENUS",
            Self::Section => "SECTION",
            Self::Species => "SPECIES",
        }
    }

    /// Human-readable label (`"Domain"`, `"Kingdom"`, ...)
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Domain => "Domain",
            Self::Kingdom => "Kingdom",
            Self::Subkingdom => "Subkingdom",
            Self::Division => "Division",
            Self::Subdivision => "Subdivision",
            Self::Superclass => "Superclass",
            Self::Class => "Class",
            Self::Subclass => "Subclass",
            Self::Order => "Order",
            Self::Suborder => "Suborder",
            Self::Family => "Family",
            Self::Subfamily => "Subfamily",
            Self::Tribe => "Tribe",
            Self::Subtribe => "Subtribe",
            Self::Genus => "Genus",
            Self::Subgenus => "Subgenus",
            Self::Section => "Section",
            Self::Species => "Species",
        }
    }
}

impl Display for TaxonomicRank {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TaxonomicRank {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|rank| rank.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CoreError::UnknownRank(s.to_string()))
    }
}

/// Total mapping from every rank to a value
///
/// Indexed by [`TaxonomicRank`] only, so a rank can never be confused with
/// an unrelated integer position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RankMap<T> {
    slots: [T; TaxonomicRank::COUNT],
}

impl<T> RankMap<T> {
    /// Build a map by evaluating `f` for every rank in order
    pub fn from_fn(mut f: impl FnMut(TaxonomicRank) -> T) -> Self {
        Self {
            slots: std::array::from_fn(|i| f(TaxonomicRank::ALL[i])),
        }
    }

    /// Value for a rank
    #[inline]
    #[must_use]
    pub fn get(&self, rank: TaxonomicRank) -> &T {
        &self.slots[rank.index()]
    }

    /// Mutable value for a rank
    #[inline]
    pub fn get_mut(&mut self, rank: TaxonomicRank) -> &mut T {
        &mut self.slots[rank.index()]
    }

    /// Replace the value for a rank, returning the previous one
    #[inline]
    pub fn set(&mut self, rank: TaxonomicRank, value: T) -> T {
        std::mem::replace(&mut self.slots[rank.index()], value)
    }

    /// `(rank, value)` pairs, root first
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (TaxonomicRank, &T)> {
        TaxonomicRank::ALL.iter().copied().zip(self.slots.iter())
    }

    /// Mutable `(rank, value)` pairs, root first
    pub fn iter_mut(&mut self) -> impl DoubleEndedIterator<Item = (TaxonomicRank, &mut T)> {
        TaxonomicRank::ALL.iter().copied().zip(self.slots.iter_mut())
    }

    /// Map every value
    pub fn map<U>(&self, mut f: impl FnMut(TaxonomicRank, &T) -> U) -> RankMap<U> {
        RankMap::from_fn(|rank| f(rank, self.get(rank)))
    }
}

impl<T: Default> Default for RankMap<T> {
    fn default() -> Self {
        Self::from_fn(|_| T::default())
    }
}

impl<T> Index<TaxonomicRank> for RankMap<T> {
    type Output = T;

    fn index(&self, rank: TaxonomicRank) -> &T {
        self.get(rank)
    }
}

impl<T> IndexMut<TaxonomicRank> for RankMap<T> {
    fn index_mut(&mut self, rank: TaxonomicRank) -> &mut T {
        self.get_mut(rank)
    }
}
