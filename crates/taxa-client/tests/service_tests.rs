use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use taxa_client::{resolve_ancestry, CachedTaxonomyService, ClientConfig, ServiceError, TaxonomyService};
use taxa_core::{NewTaxon, NodeId, TaxonomicNode, TaxonomicRank};
use taxa_test_utils::{rose_lineage, seeded_service, Call, InMemoryTaxonomyService};

#[tokio::test]
async fn ancestry_is_root_first() {
    let service = seeded_service();
    let ancestry = resolve_ancestry(&service, &NodeId::new("rosa")).await.unwrap();

    let expected: Vec<_> = rose_lineage()
        .into_iter()
        .take(TaxonomicRank::Genus.index() + 1)
        .collect();
    assert_eq!(ancestry, expected);
}

#[tokio::test]
async fn ancestry_of_root_is_itself() {
    let service = seeded_service();
    let ancestry = resolve_ancestry(&service, &NodeId::new("bacteria")).await.unwrap();
    assert_eq!(ancestry.len(), 1);
}

#[tokio::test]
async fn ancestry_cycle_is_corrupt() {
    let service = InMemoryTaxonomyService::with_nodes([
        TaxonomicNode::new("a", "A", TaxonomicRank::Genus).with_parent("b"),
        TaxonomicNode::new("b", "B", TaxonomicRank::Family).with_parent("a"),
    ]);
    let err = resolve_ancestry(&service, &NodeId::new("a")).await.unwrap_err();
    assert!(matches!(err, ServiceError::CorruptHierarchy(_)));
}

#[tokio::test]
async fn ancestry_rank_inversion_is_corrupt() {
    let service = InMemoryTaxonomyService::with_nodes([
        TaxonomicNode::new("g", "G", TaxonomicRank::Genus).with_parent("s"),
        TaxonomicNode::new("s", "S", TaxonomicRank::Species),
    ]);
    let err = resolve_ancestry(&service, &NodeId::new("g")).await.unwrap_err();
    assert!(matches!(err, ServiceError::CorruptHierarchy(id) if id.as_str() == "s"));
}

#[tokio::test]
async fn ancestry_dangling_parent_is_not_found() {
    let service = InMemoryTaxonomyService::with_nodes([
        TaxonomicNode::new("g", "G", TaxonomicRank::Genus).with_parent("gone"),
    ]);
    let err = resolve_ancestry(&service, &NodeId::new("g")).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn cache_serves_repeat_lists() {
    let inner = seeded_service();
    let cached = CachedTaxonomyService::new(inner.clone(), 100, Duration::from_secs(60));

    let first = cached.list_by_rank(TaxonomicRank::Domain).await.unwrap();
    let second = cached.list_by_rank(TaxonomicRank::Domain).await.unwrap();
    cached.list_by_parent(&NodeId::new("rosa")).await.unwrap();
    cached.list_by_parent(&NodeId::new("rosa")).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(
        inner.calls(),
        vec![
            Call::ListByRank(TaxonomicRank::Domain),
            Call::ListByParent(NodeId::new("rosa")),
        ]
    );
}

#[tokio::test]
async fn cache_drops_lists_on_mutation() {
    let inner = seeded_service();
    let cached = CachedTaxonomyService::new(inner.clone(), 100, Duration::from_secs(60));

    cached.list_by_rank(TaxonomicRank::Domain).await.unwrap();
    cached
        .create(NewTaxon::new("Archaea", TaxonomicRank::Domain, None))
        .await
        .unwrap();
    let after = cached.list_by_rank(TaxonomicRank::Domain).await.unwrap();

    assert_eq!(after.len(), 3);
    assert_eq!(
        inner.count_calls(|c| matches!(c, Call::ListByRank(_))),
        2
    );
}

#[tokio::test]
async fn fetch_overlapping_mutation_is_not_cached() {
    let inner = seeded_service();
    let cached = Arc::new(CachedTaxonomyService::new(inner.clone(), 100, Duration::from_secs(60)));
    let hold = inner.hold_rank_after_read(TaxonomicRank::Domain);

    let slow = {
        let cached = Arc::clone(&cached);
        tokio::spawn(async move { cached.list_by_rank(TaxonomicRank::Domain).await })
    };
    while inner.count_calls(|c| matches!(c, Call::ListByRank(_))) == 0 {
        tokio::task::yield_now().await;
    }

    cached
        .create(NewTaxon::new("Archaea", TaxonomicRank::Domain, None))
        .await
        .unwrap();
    hold.notify_one();
    let stale = slow.await.unwrap().unwrap();
    assert_eq!(stale.len(), 2);

    let fresh = cached.list_by_rank(TaxonomicRank::Domain).await.unwrap();
    let names: Vec<_> = fresh.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["Archaea", "Bacteria", "Eukaryota"]);
    assert_eq!(
        inner.count_calls(|c| matches!(c, Call::ListByRank(_))),
        2
    );
}

#[tokio::test]
async fn cache_does_not_store_failures() {
    let inner = seeded_service();
    let cached = CachedTaxonomyService::new(inner.clone(), 100, Duration::from_secs(60));

    inner.fail_rank(TaxonomicRank::Domain);
    assert!(cached.list_by_rank(TaxonomicRank::Domain).await.is_err());
    inner.heal();
    assert_eq!(cached.list_by_rank(TaxonomicRank::Domain).await.unwrap().len(), 2);
}

#[tokio::test]
async fn cache_disabled_by_zero_ttl() {
    let config = ClientConfig::new().with_cache_ttl_secs(0);
    assert!(CachedTaxonomyService::from_config(seeded_service(), &config).is_none());
    assert!(CachedTaxonomyService::from_config(seeded_service(), &ClientConfig::new()).is_some());
}
