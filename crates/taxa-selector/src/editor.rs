//! Taxonomy node editor
//!
//! Create, rename and delete nodes at a rank through the taxonomy service,
//! then bring the selector's local state back in line. The service owns the
//! tree: descendants of a deleted node are never touched here beyond clearing
//! the local chain and option lists.

use crate::error::SelectorError;
use crate::selector::ChainSelector;
use taxa_client::TaxonomyService;
use taxa_core::{NewTaxon, NodeId, TaxonomicNode, TaxonomicRank};

/// Chain selector with node editing
#[derive(Debug)]
pub struct TaxonomyEditor<S> {
    selector: ChainSelector<S>,
}

impl<S: TaxonomyService> TaxonomyEditor<S> {
    /// Wrap an existing selector
    #[inline]
    #[must_use]
    pub fn new(selector: ChainSelector<S>) -> Self {
        Self { selector }
    }

    /// Mount a selector (see [`ChainSelector::mount`]) and wrap it
    pub async fn open(service: S, ancestry: Option<&[TaxonomicNode]>) -> Self {
        Self::new(ChainSelector::mount(service, ancestry).await)
    }

    /// The wrapped selector
    #[inline]
    #[must_use]
    pub fn selector(&self) -> &ChainSelector<S> {
        &self.selector
    }

    /// Unwrap the selector
    #[inline]
    #[must_use]
    pub fn into_selector(self) -> ChainSelector<S> {
        self.selector
    }

    /// Create a node at `rank` under the currently selected parent
    ///
    /// The rank's options are reloaded afterwards. A failed reload does not
    /// undo the creation: it is logged and left visible as the rank's load
    /// state.
    ///
    /// # Errors
    /// - `SelectorError::InvalidName` for a blank name
    /// - `SelectorError::MissingAncestor` below the root when the parent rank has no selection
    /// - `SelectorError::Service` if the service rejected the creation
    pub async fn create_node(&self, rank: TaxonomicRank, name: &str) -> Result<TaxonomicNode, SelectorError> {
        let name = checked_name(name)?;
        let parent_id = self.require_parent(rank)?;

        let created = self
            .selector
            .service()
            .create(NewTaxon::new(name, rank, parent_id.clone()))
            .await?;
        tracing::info!(rank = %rank, node = %created.id, "created taxonomy node");

        self.reload_quietly(rank, parent_id.as_ref()).await;
        Ok(created)
    }

    /// Rename a node shown at `rank`
    ///
    /// Identity and position are unchanged, so a selected node stays selected
    /// with its new name and deeper selections remain valid.
    ///
    /// # Errors
    /// - `SelectorError::InvalidName` for a blank name
    /// - `SelectorError::Service` if the service rejected the rename
    pub async fn rename_node(&self, rank: TaxonomicRank, id: &NodeId, name: &str) -> Result<TaxonomicNode, SelectorError> {
        let name = checked_name(name)?;

        let renamed = self.selector.service().rename(id, name).await?;
        tracing::info!(rank = %rank, node = %id, "renamed taxonomy node");

        self.selector.refresh(&renamed);
        let parent_id = self.displayed_parent(rank);
        self.reload_quietly(rank, parent_id.as_ref()).await;
        Ok(renamed)
    }

    /// Delete a node shown at `rank`
    ///
    /// If it was the selection at `rank`, that rank and every deeper one are
    /// cleared before the rank's options are reloaded. On a closed selector
    /// only the remote delete takes effect.
    ///
    /// # Errors
    /// - `SelectorError::Service` if the service rejected the deletion; local state is untouched
    pub async fn delete_node(&self, rank: TaxonomicRank, id: &NodeId) -> Result<(), SelectorError> {
        self.selector.service().delete(id).await?;
        tracing::info!(rank = %rank, node = %id, "deleted taxonomy node");

        let was_selected = self
            .selector
            .selected(rank)
            .is_some_and(|selected| &selected.id == id);
        if was_selected {
            if let Err(err) = self.selector.select(rank, None).await {
                tracing::warn!(rank = %rank, error = %err, "could not clear deleted selection");
            }
        }

        let parent_id = self.displayed_parent(rank);
        self.reload_quietly(rank, parent_id.as_ref()).await;
        Ok(())
    }

    fn require_parent(&self, rank: TaxonomicRank) -> Result<Option<NodeId>, SelectorError> {
        match rank.parent() {
            None => Ok(None),
            Some(parent) => self
                .selector
                .selected(parent)
                .map(|node| Some(node.id))
                .ok_or(SelectorError::MissingAncestor { rank, parent }),
        }
    }

    fn displayed_parent(&self, rank: TaxonomicRank) -> Option<NodeId> {
        self.selector.parent_of(rank).map(|node| node.id)
    }

    async fn reload_quietly(&self, rank: TaxonomicRank, parent_id: Option<&NodeId>) {
        if let Err(err) = self.selector.reload_options(rank, parent_id).await {
            tracing::warn!(rank = %rank, error = %err, "option reload after edit failed");
        }
    }
}

fn checked_name(name: &str) -> Result<&str, SelectorError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(SelectorError::InvalidName(name.to_string()));
    }
    Ok(trimmed)
}
