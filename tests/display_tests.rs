use planetvote::kernel::catalog;
use planetvote::kernel::display::{BackendStats, RemoteExtension, Roster};

fn remote(id: &str, rockets: Option<u64>, votes: Option<u64>) -> RemoteExtension {
    RemoteExtension {
        id: id.to_string(),
        rockets,
        votes,
    }
}

#[test]
fn test_roster_starts_from_catalog() {
    let roster = Roster::from_catalog();
    let ids: Vec<&str> = roster.standings().iter().map(|s| s.id.as_str()).collect();
    let expected: Vec<String> = catalog::distinct_extensions().iter().map(|e| e.id()).collect();

    assert_eq!(ids, expected);
    assert_eq!(ids[0], "vscode-pets");
    assert!(roster.standings().iter().all(|s| s.votes == 0));
    assert_eq!(roster.total_votes(), 0);
}

#[test]
fn test_vote_count_prefers_nonzero_rockets() {
    assert_eq!(remote("x", Some(7), Some(3)).vote_count(), 7);
    assert_eq!(remote("x", Some(0), Some(3)).vote_count(), 3);
    assert_eq!(remote("x", None, Some(3)).vote_count(), 3);
    assert_eq!(remote("x", Some(0), None).vote_count(), 0);
    assert_eq!(remote("x", None, None).vote_count(), 0);
}

#[test]
fn test_merge_by_id() {
    let mut roster = Roster::from_catalog();

    let changed = roster.merge(&[
        remote("gitlens", Some(12), None),
        remote("wakatime", Some(0), Some(5)),
        remote("not-in-catalog", Some(99), None),
        remote("prettier", Some(4), None),
    ]);

    assert_eq!(changed, 2);
    assert_eq!(roster.get("gitlens").unwrap().votes, 12);
    assert_eq!(roster.get("wakatime").unwrap().votes, 5);
    assert!(roster.get("not-in-catalog").is_none());
    assert_eq!(roster.get("power-mode").unwrap().votes, 0);
    assert_eq!(roster.total_votes(), 17);

    // Same numbers again change nothing; omitted ids keep their count.
    assert_eq!(roster.merge(&[remote("gitlens", Some(12), None)]), 0);
    assert_eq!(roster.get("wakatime").unwrap().votes, 5);
}

#[test]
fn test_ranking_orders_by_votes_then_catalog() {
    let mut roster = Roster::from_catalog();
    roster.merge(&[
        remote("azure-ml", Some(3), None),
        remote("gitlens", Some(9), None),
        remote("live-preview", Some(3), None),
    ]);

    let ranking: Vec<(&str, u64)> = roster.ranking().iter().map(|s| (s.id.as_str(), s.votes)).collect();

    assert_eq!(ranking[0], ("gitlens", 9));
    // Ties keep catalog order: live-preview comes before azure-ml.
    assert_eq!(ranking[1], ("live-preview", 3));
    assert_eq!(ranking[2], ("azure-ml", 3));
    assert_eq!(ranking[3], ("vscode-pets", 0));
    assert_eq!(ranking.len(), roster.standings().len());
}

#[test]
fn test_live_launches_bump_tally() {
    let mut roster = Roster::from_catalog();
    roster.merge(&[remote("power-mode", Some(2), None)]);

    assert_eq!(roster.record_launch("power-mode"), Some(3));
    assert_eq!(roster.record_launch("code-runner"), Some(1));
    assert_eq!(roster.record_launch("unknown"), None);
    assert_eq!(roster.total_votes(), 4);
    assert_eq!(roster.ranking()[0].id, "power-mode");

    // A refresh re-syncs to the backend's count.
    roster.merge(&[remote("power-mode", Some(10), None)]);
    assert_eq!(roster.get("power-mode").unwrap().votes, 10);
}

#[test]
fn test_remote_shapes_deserialize() {
    let list: Vec<RemoteExtension> = serde_json::from_str(
        r#"[{"id":"gitlens","name":"GitLens","rockets":4,"category":"git"},{"id":"wakatime"}]"#,
    )
    .unwrap();
    assert_eq!(list[0].vote_count(), 4);
    assert_eq!(list[1], remote("wakatime", None, None));

    let stats: BackendStats = serde_json::from_str(r#"{"totalVotes":3,"uptime":120}"#).unwrap();
    assert_eq!(stats.total_votes, Some(3));
    assert_eq!(stats.total_extensions, None);
    assert_eq!(stats.extra["uptime"], 120);
}
