//! Text and JSON rendering for command results

use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt::Write as _;
use taxa_core::{TaxonomicNode, TaxonomicRank};
use taxa_selector::SelectorSnapshot;

/// Output format selected by `--json`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Format {
    Text,
    Json,
}

impl Format {
    pub(crate) fn render<T>(self, value: &T, text: impl FnOnce(&T) -> String) -> Result<String>
    where
        T: Serialize + ?Sized,
    {
        match self {
            Self::Json => serde_json::to_string_pretty(value).context("failed to encode JSON output"),
            Self::Text => Ok(text(value)),
        }
    }
}

pub(crate) fn ranks(ranks: &[TaxonomicRank]) -> String {
    let mut out = String::new();
    for rank in ranks {
        let _ = writeln!(out, "{:>2}  {:<12} {}", rank.index(), rank.label(), rank.as_str());
    }
    out.trim_end().to_string()
}

pub(crate) fn node(node: &TaxonomicNode) -> String {
    let parent = node.parent_id.as_ref().map_or("-", |id| id.as_str());
    format!(
        "id:     {}\nname:   {}\nrank:   {}\nparent: {parent}",
        node.id,
        node.name,
        node.rank.label()
    )
}

pub(crate) fn nodes(nodes: &[TaxonomicNode]) -> String {
    if nodes.is_empty() {
        return "(none)".to_string();
    }
    let width = nodes.iter().map(|n| n.id.as_str().len()).max().unwrap_or(0);
    nodes
        .iter()
        .map(|n| format!("{:<width$}  {}", n.id.as_str(), n.name))
        .collect::<Vec<_>>()
        .join("\n")
}

pub(crate) fn snapshot(snapshot: &SelectorSnapshot) -> String {
    let mut out = String::new();
    for view in &snapshot.ranks {
        let selected = view.selected.as_ref().map_or("-", |n| n.name.as_str());
        let detail = match view.state.error() {
            Some(message) => format!("failed: {message}"),
            None => match view.options.len() {
                1 => "1 option".to_string(),
                n => format!("{n} options"),
            },
        };
        let _ = writeln!(out, "{:<12} {selected:<24} {detail}", view.rank.label());
    }

    let lineage = snapshot
        .ranks
        .iter()
        .filter_map(|view| view.selected.as_ref().map(|n| n.name.as_str()))
        .collect::<Vec<_>>()
        .join(" > ");
    let taxon = snapshot
        .classification
        .taxon_id
        .as_ref()
        .map_or("unclassified", |id| id.as_str());
    let _ = writeln!(out, "\nlineage:        {lineage}");
    let _ = write!(out, "classification: {taxon}");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use taxa_core::{Classification, LoadState, NodeId};
    use taxa_selector::RankView;

    fn genus() -> TaxonomicNode {
        TaxonomicNode::new("rosa", "Rosa", TaxonomicRank::Genus).with_parent("rosinae")
    }

    #[test]
    fn test_ranks_table() {
        let text = ranks(&TaxonomicRank::ALL[..2]);
        assert_eq!(text, " 0  Domain       DOMAIN\n 1  Kingdom      KINGDOM");
    }

    #[test]
    fn test_node_without_parent() {
        let text = node(&TaxonomicNode::new("bacteria", "Bacteria", TaxonomicRank::Domain));
        assert!(text.ends_with("parent: -"));
    }

    #[test]
    fn test_nodes_are_aligned() {
        let list = vec![
            genus(),
            TaxonomicNode::new("hulthemia", "Hulthemia", TaxonomicRank::Genus),
        ];
        assert_eq!(nodes(&list), "rosa       Rosa\nhulthemia  Hulthemia");
        assert_eq!(nodes(&[]), "(none)");
    }

    #[test]
    fn test_json_format() {
        let json = Format::Json.render(&genus(), node).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["parentId"], "rosinae");
        assert_eq!(value["rank"], "GENUS");
    }

    #[test]
    fn test_snapshot_text() {
        let view = SelectorSnapshot {
            ranks: vec![
                RankView {
                    rank: TaxonomicRank::Genus,
                    selected: Some(genus()),
                    state: LoadState::Loaded,
                    options: vec![genus()],
                },
                RankView {
                    rank: TaxonomicRank::Subgenus,
                    selected: None,
                    state: LoadState::Failed("timeout".into()),
                    options: Vec::new(),
                },
            ],
            classification: Classification {
                taxon_id: Some(NodeId::new("rosa")),
            },
            closed: true,
        };

        let text = snapshot(&view);
        assert!(text.contains("Genus        Rosa                     1 option\n"));
        assert!(text.contains("failed: timeout"));
        assert!(text.ends_with("lineage:        Rosa\nclassification: rosa"));
    }
}
