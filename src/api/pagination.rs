//! Multi-page fetch aggregation

use std::future::Future;

use futures::future::try_join_all;
use tracing::info;

use crate::api::types::{Filters, Page};
use crate::error::{CliError, Result};

/// Page size used for every list walk
pub const PER_PAGE: u32 = 50;

/// Query string selecting one page
pub fn page_query(page: u32) -> Filters {
    Filters::from([
        ("page".to_string(), page.to_string()),
        ("per_page".to_string(), PER_PAGE.to_string()),
    ])
}

/// Fetch page 1, then every remaining page concurrently, and concatenate them
/// in page order. Any failed page fails the whole walk.
pub async fn collect_all_pages<T, F, Fut>(fetch_page: F) -> Result<Vec<T>>
where
    F: Fn(u32) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let first = fetch_page(1).await?;
    let total_pages = first.total_pages.unwrap_or(1);
    info!("page 1 of {} fetched ({} rows)", total_pages, first.result.len());

    let mut rows = first.result;
    if total_pages > 1 {
        let rest = try_join_all((2..=total_pages).map(|n| {
            let fetch = fetch_page(n);
            async move {
                let page = fetch.await?;
                info!("page {} of {} fetched ({} rows)", n, total_pages, page.result.len());
                Ok::<_, CliError>(page)
            }
        }))
        .await?;
        for page in rest {
            rows.extend(page.result);
        }
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::capture_logs;
    use std::time::Duration;

    fn page(rows: &[&str], total: Option<u32>) -> Page<String> {
        Page {
            result: rows.iter().map(|r| r.to_string()).collect(),
            total_pages: total,
        }
    }

    #[tokio::test]
    async fn concatenates_pages_in_order() {
        let rows = collect_all_pages(|n| async move {
            // Later pages finish first; order must still follow page numbers.
            tokio::time::sleep(Duration::from_millis(u64::from(10 * (4 - n)))).await;
            Ok(match n {
                1 => page(&["a", "b"], Some(3)),
                2 => page(&["c", "d", "e"], Some(3)),
                _ => page(&["f"], Some(3)),
            })
        })
        .await
        .unwrap();

        assert_eq!(rows, vec!["a", "b", "c", "d", "e", "f"]);
    }

    #[tokio::test]
    async fn single_page_when_total_absent() {
        let calls = std::sync::atomic::AtomicU32::new(0);
        let rows = collect_all_pages(|_| {
            calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            async { Ok(page(&["only"], None)) }
        })
        .await
        .unwrap();

        assert_eq!(rows, vec!["only"]);
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_page_fails_everything() {
        let result = collect_all_pages(|n| async move {
            match n {
                2 => Err(CliError::Http {
                    status: 500,
                    body: "boom".into(),
                }),
                _ => Ok(page(&["row"], Some(3))),
            }
        })
        .await;

        assert!(matches!(result, Err(CliError::Http { status: 500, .. })));
    }

    #[tokio::test]
    async fn every_page_fetch_is_logged() {
        let logs = capture_logs();
        collect_all_pages(|n| async move {
            Ok(match n {
                1 => page(&["a", "b"], Some(3)),
                2 => page(&["c"], Some(3)),
                _ => page(&["d", "e", "f"], Some(3)),
            })
        })
        .await
        .unwrap();

        let out = logs.contents();
        assert!(out.contains("page 1 of 3 fetched (2 rows)"), "{}", out);
        assert!(out.contains("page 2 of 3 fetched (1 rows)"), "{}", out);
        assert!(out.contains("page 3 of 3 fetched (3 rows)"), "{}", out);
    }
}
