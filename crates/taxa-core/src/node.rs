//! Taxonomic nodes
//!
//! Nodes are owned by the remote taxonomy store. The client only holds
//! copies, and `parent_id` is a weak reference into that store.

use crate::rank::TaxonomicRank;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Opaque node identifier assigned by the taxonomy store
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Wrap a store-assigned identifier
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Raw identifier
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A node of the taxonomy tree
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxonomicNode {
    /// Store-assigned identity
    pub id: NodeId,
    /// Display name
    pub name: String,
    /// Rank this node sits at
    pub rank: TaxonomicRank,
    /// Parent node, absent for root-level nodes
    #[serde(default)]
    pub parent_id: Option<NodeId>,
}

impl TaxonomicNode {
    /// Create a root-level node
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>, rank: TaxonomicRank) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            rank,
            parent_id: None,
        }
    }

    /// With parent reference
    #[inline]
    #[must_use]
    pub fn with_parent(mut self, parent_id: impl Into<NodeId>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Whether `other` names this node as its parent
    #[inline]
    #[must_use]
    pub fn is_parent_of(&self, other: &TaxonomicNode) -> bool {
        other.parent_id.as_ref() == Some(&self.id)
    }
}

impl Display for TaxonomicNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.rank)
    }
}

/// Request body for creating a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTaxon {
    /// Display name
    pub name: String,
    /// Rank of the new node
    pub rank: TaxonomicRank,
    /// Parent node, required for every rank below the root
    pub parent_id: Option<NodeId>,
}

impl NewTaxon {
    /// Create request
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, rank: TaxonomicRank, parent_id: Option<NodeId>) -> Self {
        Self {
            name: name.into(),
            rank,
            parent_id,
        }
    }
}

/// Terminal classification submitted with a plant record
///
/// A plant stores only its most specific taxon; the ancestry is rebuilt
/// from parent pointers when it is displayed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    /// Deepest selected node, if any
    pub taxon_id: Option<NodeId>,
}

impl Classification {
    /// Whether nothing is selected
    #[inline]
    #[must_use]
    pub fn is_unclassified(&self) -> bool {
        self.taxon_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn node_wire_format() {
        let node = TaxonomicNode::new("n-2", "Rosa", TaxonomicRank::Genus).with_parent("n-1");
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "n-2",
                "name": "Rosa",
                "rank": "GENUS",
                "parentId": "n-1"
            })
        );
    }

    #[test]
    fn missing_parent_defaults_to_none() {
        let node: TaxonomicNode =
            serde_json::from_str(r#"{"id":"d","name":"Eukaryota","rank":"DOMAIN"}"#).unwrap();
        assert_eq!(node.parent_id, None);
        assert_eq!(node.to_string(), "Eukaryota (Domain)");
    }

    #[test]
    fn parent_relation() {
        let family = TaxonomicNode::new("f", "Rosaceae", TaxonomicRank::Family);
        let genus = TaxonomicNode::new("g", "Rosa", TaxonomicRank::Genus).with_parent("f");
        assert!(family.is_parent_of(&genus));
        assert!(!genus.is_parent_of(&family));
    }
}
