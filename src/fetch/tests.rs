//! Tests for fetch module

use super::*;
use crate::error::Error;
use crate::pagination::PageOffset;

#[test]
fn test_page_constructors() {
    let page = Page::more(vec![1, 2], 2);
    assert_eq!(page.next_offset, PageOffset::Available(2));
    assert_eq!(page.len(), 2);

    let last: Page<u32> = Page::last(vec![]);
    assert!(last.is_empty());
    assert!(last.next_offset.is_completed());
}

#[tokio::test]
async fn test_fn_fetcher_passes_query_and_offset() {
    let fetcher = fetcher_fn(|query: String, offset: u64| async move {
        Ok(Page::more(vec![format!("{query}@{offset}")], offset + 1))
    });

    let page = fetcher.fetch_page(&"users".to_string(), 7).await.unwrap();
    assert_eq!(page.items, vec!["users@7".to_string()]);
    assert_eq!(page.next_offset, PageOffset::Available(8));
}

#[tokio::test]
async fn test_fn_fetcher_propagates_errors() {
    let fetcher = fetcher_fn(|_query: (), _offset: u64| async move {
        Err::<Page<u8>, _>(Error::fetch("unreachable backend"))
    });

    let err = fetcher.fetch_page(&(), 0).await.unwrap_err();
    assert!(err.to_string().contains("unreachable backend"));
}
