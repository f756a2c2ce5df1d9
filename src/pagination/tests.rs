//! Tests for pagination module

use super::*;
use serde_json::json;
use test_case::test_case;

// ============================================================================
// PageOffset Tests
// ============================================================================

#[test]
fn test_page_offset_default() {
    let offset = PageOffset::default();
    assert_eq!(offset, PageOffset::Available(0));
    assert!(offset.is_available());
    assert_eq!(offset.value(), Some(0));
}

#[test_case(PageOffset::Available(4), 3 => PageOffset::Available(7) ; "increment available")]
#[test_case(PageOffset::Completed, 3 => PageOffset::Completed ; "increment completed is no-op")]
fn test_page_offset_increment(mut offset: PageOffset, by: u64) -> PageOffset {
    offset.increment(by);
    offset
}

#[test_case(PageOffset::Available(4), 1 => PageOffset::Available(3) ; "decrement available")]
#[test_case(PageOffset::Available(1), 5 => PageOffset::Available(0) ; "decrement saturates at zero")]
#[test_case(PageOffset::Completed, 1 => PageOffset::Completed ; "decrement completed is no-op")]
fn test_page_offset_decrement(mut offset: PageOffset, by: u64) -> PageOffset {
    offset.decrement(by);
    offset
}

#[test]
fn test_page_offset_update() {
    let mut offset = PageOffset::Available(2);
    offset.update(10);
    assert_eq!(offset, PageOffset::Available(10));

    let mut completed = PageOffset::Completed;
    completed.update(10);
    assert!(completed.is_completed());
    assert_eq!(completed.value(), None);
}

#[test]
fn test_page_offset_display_and_serde() {
    assert_eq!(PageOffset::Available(3).to_string(), "available(3)");
    assert_eq!(PageOffset::Completed.to_string(), "completed");

    let json = serde_json::to_value(PageOffset::Available(3)).unwrap();
    assert_eq!(json, json!({"available": 3}));
    let back: PageOffset = serde_json::from_value(json!("completed")).unwrap();
    assert_eq!(back, PageOffset::Completed);
}

// ============================================================================
// Pagination Cell Tests
// ============================================================================

#[test]
fn test_pagination_clones_share_offset() {
    let pagination = Pagination::new(0);
    let other = pagination.clone();

    other.increment(5);
    assert_eq!(pagination.get(), PageOffset::Available(5));

    pagination.decrement(2);
    assert_eq!(other.get(), PageOffset::Available(3));
}

#[test]
fn test_pagination_completed_only_leaves_via_reset() {
    let pagination = Pagination::new(10);
    pagination.complete();

    pagination.increment(1);
    pagination.decrement(1);
    pagination.update(4);
    assert_eq!(pagination.get(), PageOffset::Completed);

    pagination.reset();
    assert_eq!(pagination.get(), PageOffset::Available(10));
    assert_eq!(pagination.initial(), 10);
}

#[test_case(4, 3, PageOffset::Available(8) => PageOffset::Available(7) ; "removal during fetch")]
#[test_case(4, 6, PageOffset::Available(8) => PageOffset::Available(10) ; "inserts during fetch")]
#[test_case(4, 4, PageOffset::Available(8) => PageOffset::Available(8) ; "no local edits")]
#[test_case(4, 3, PageOffset::Completed => PageOffset::Completed ; "completed page stays completed")]
fn test_pagination_advance_from(started: u64, current: u64, next: PageOffset) -> PageOffset {
    let pagination = Pagination::new(0);
    pagination.set(PageOffset::Available(current));
    let stored = pagination.advance_from(started, next);
    assert_eq!(stored, pagination.get());
    stored
}

// ============================================================================
// Offset Paginator Tests
// ============================================================================

#[test]
fn test_offset_paginator_params() {
    let paginator = OffsetPaginator::new("skip", "take", 25);
    let params = paginator.query_params(50);
    assert_eq!(params.get("skip"), Some(&"50".to_string()));
    assert_eq!(params.get("take"), Some(&"25".to_string()));
    assert_eq!(paginator.initial_offset(), 0);
}

#[test_case(0, 4 => PageOffset::Available(4) ; "full page advances by count")]
#[test_case(8, 4 => PageOffset::Available(12) ; "advances from current offset")]
#[test_case(8, 3 => PageOffset::Completed ; "short page completes")]
#[test_case(8, 0 => PageOffset::Completed ; "empty page completes")]
fn test_offset_paginator_next(offset: u64, count: usize) -> PageOffset {
    OffsetPaginator::new("offset", "limit", 4).next_offset(offset, count)
}

// ============================================================================
// Page Number Paginator Tests
// ============================================================================

#[test]
fn test_page_number_paginator_params() {
    let paginator = PageNumberPaginator::new("page", 1).with_page_size("per_page", 10);
    assert_eq!(paginator.initial_offset(), 1);

    let params = paginator.query_params(3);
    assert_eq!(params.get("page"), Some(&"3".to_string()));
    assert_eq!(params.get("per_page"), Some(&"10".to_string()));
    assert_eq!(paginator.records_before(3), 20);
}

#[test]
fn test_page_number_paginator_next() {
    let unsized_pages = PageNumberPaginator::new("page", 1);
    assert_eq!(unsized_pages.next_offset(1, 3), PageOffset::Available(2));
    assert_eq!(unsized_pages.next_offset(2, 0), PageOffset::Completed);

    let sized = PageNumberPaginator::new("page", 1).with_page_size("per_page", 10);
    assert_eq!(sized.next_offset(1, 10), PageOffset::Available(2));
    assert_eq!(sized.next_offset(2, 9), PageOffset::Completed);
}

// ============================================================================
// PaginationConfig Tests
// ============================================================================

#[test]
fn test_pagination_config_yaml() {
    let config: PaginationConfig = serde_yaml::from_str(
        "type: page_number\nstart_page: 1\npage_size_param: per_page\npage_size: 50\n",
    )
    .unwrap();
    let paginator = config.build();
    assert_eq!(paginator.initial_offset(), 1);
    assert_eq!(
        paginator.query_params(1).get("per_page"),
        Some(&"50".to_string())
    );

    let config: PaginationConfig = serde_yaml::from_str("type: offset\nlimit: 5\n").unwrap();
    assert_eq!(config, PaginationConfig::offset(5));
}

// ============================================================================
// StopCondition Tests
// ============================================================================

#[test]
fn test_stop_condition_field() {
    let condition = StopCondition::field("meta.has_more", false);

    let body = json!({"meta": {"has_more": false}});
    assert_eq!(check_stop_condition(&condition, &body, 0), StopResult::Stop);

    let body = json!({"meta": {"has_more": true}});
    assert_eq!(
        check_stop_condition(&condition, &body, 0),
        StopResult::Continue
    );
}

#[test]
fn test_stop_condition_total_count() {
    let condition = StopCondition::total_count("$.total");
    let body = json!({"total": "10"});

    assert_eq!(
        check_stop_condition(&condition, &body, 9),
        StopResult::Continue
    );
    assert_eq!(check_stop_condition(&condition, &body, 10), StopResult::Stop);
}

#[test]
fn test_next_offset_applies_stop_condition_first() {
    let paginator = OffsetPaginator::new("offset", "limit", 2);
    let condition = StopCondition::total_count("total");
    let body = json!({"total": 4});

    assert_eq!(
        next_offset(&paginator, &condition, &body, 0, 2),
        PageOffset::Available(2)
    );
    assert_eq!(
        next_offset(&paginator, &condition, &body, 2, 2),
        PageOffset::Completed
    );
    assert_eq!(
        next_offset(&paginator, &StopCondition::None, &body, 2, 2),
        PageOffset::Available(4)
    );
}
