use relink::LinkedServiceRegistry;

fn registry(endpoints: &[&str]) -> LinkedServiceRegistry {
    LinkedServiceRegistry::new(endpoints.iter().map(|s| s.to_string()).collect())
}

#[test]
fn diff_reports_added_and_removed_sorted() {
    let current = registry(&["web-1", "web-0"]);
    let diff = current.diff(&["web-1".to_string(), "api-0".to_string(), "db-0".to_string()]);
    assert_eq!(diff.added, vec!["api-0".to_string(), "db-0".to_string()]);
    assert_eq!(diff.removed, vec!["web-0".to_string()]);
    assert_eq!(
        diff.describe(),
        "linked added: api-0, db-0; linked removed: web-0"
    );
}

#[test]
fn diff_is_membership_based_not_order_based() {
    let current = registry(&["a", "b"]);
    let diff = current.diff(&["b".to_string(), "a".to_string()]);
    assert!(diff.is_empty());
    assert_eq!(diff.describe(), "");
}

#[test]
fn replace_is_idempotent() {
    let mut current = registry(&["a"]);
    let next = vec!["a".to_string(), "b".to_string()];
    current.replace(next.clone());
    let first = current.clone();
    // Applying the same replacement again changes nothing and diffs empty.
    assert!(current.diff(&next).is_empty());
    current.replace(next);
    assert_eq!(current, first);
}

#[test]
fn contains_any_matches_set_intersection() {
    let current = registry(&["a", "b"]);
    assert!(current.contains_any(&["z".to_string(), "b".to_string()]));
    assert!(!current.contains_any(&["z".to_string()]));
    assert!(!current.contains_any(&[]));
}

#[test]
fn empty_registry_matches_nothing() {
    let current = LinkedServiceRegistry::default();
    assert!(current.is_empty());
    assert!(!current.contains_any(&["a".to_string()]));
    let diff = current.diff(&["a".to_string()]);
    assert_eq!(diff.added, vec!["a".to_string()]);
}
