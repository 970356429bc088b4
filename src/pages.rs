//! Paginated listing traversal
//!
//! Listing endpoints return a page of `{name, url}` entries and a `next`
//! cursor. `walk_pages` follows the cursor until it runs out, handing each page
//! to a callback before fetching the next one.

use std::future::Future;

use serde::Deserialize;
use tracing::debug;

use crate::cache::CacheStorage;
use crate::fetch::{FetchClient, FetchError, Transport};

/// A named link to another API resource
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NamedResource {
    /// Resource name, e.g. "pikachu"
    pub name: String,
    /// Absolute URL of the resource
    pub url: String,
}

/// One page of a paginated listing
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    /// Entries on this page, in API order
    pub results: Vec<NamedResource>,
    /// URL of the following page, `None` on the last page
    #[serde(default)]
    pub next: Option<String>,
}

/// Visits every page of the listing starting at `start_url`
///
/// Pages are fetched one at a time; `on_page` must finish before the next page
/// is requested. The walk stops at the first page without a `next` cursor.
/// Cursors are followed blindly, so a listing that links back to an earlier
/// page is never escaped.
///
/// # Arguments
/// * `client` - Cached client used for every page request
/// * `start_url` - URL of the first page
/// * `on_page` - Called once per page, in listing order
///
/// # Returns
/// * `Ok(())` after the last page has been handled
/// * `Err(FetchError)` from the first failed page fetch or handler
pub async fn walk_pages<T, S, F, Fut>(
    client: &FetchClient<T, S>,
    start_url: &str,
    mut on_page: F,
) -> Result<(), FetchError>
where
    T: Transport,
    S: CacheStorage,
    F: FnMut(Page) -> Fut,
    Fut: Future<Output = Result<(), FetchError>>,
{
    let mut url = Some(start_url.to_string());
    let mut page_num = 0;

    while let Some(current) = url {
        page_num += 1;
        let page: Page = client.fetch_as(&current).await?;
        debug!(page = page_num, url = %current, entries = page.results.len(), "Fetched page");

        url = page.next.clone();
        on_page(page).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{MemoryStorage, PersistentCache};
    use crate::fetch::testing::StubTransport;
    use serde_json::json;
    use std::sync::Mutex;

    const START: &str = "https://pokeapi.co/api/v2/pokemon?limit=2&offset=0";
    const PAGE_A: &str = "https://pokeapi.co/api/v2/pokemon?limit=2&offset=2";
    const PAGE_B: &str = "https://pokeapi.co/api/v2/pokemon?limit=2&offset=4";

    fn entry(name: &str) -> serde_json::Value {
        json!({"name": name, "url": format!("https://pokeapi.co/api/v2/pokemon/{name}/")})
    }

    fn three_page_client() -> FetchClient<StubTransport, MemoryStorage> {
        let transport = StubTransport::new()
            .with(START, json!({"results": [entry("a"), entry("b")], "next": PAGE_A}))
            .with(PAGE_A, json!({"results": [entry("c"), entry("d")], "next": PAGE_B}))
            .with(PAGE_B, json!({"results": [entry("e")], "next": null}));
        FetchClient::new(transport, PersistentCache::load(MemoryStorage::new(), 50))
    }

    #[tokio::test]
    async fn test_walk_follows_cursor_until_null() {
        let client = three_page_client();
        let names = Mutex::new(Vec::new());
        let names_ref = &names;

        walk_pages(&client, START, |page| async move {
            names_ref
                .lock()
                .unwrap()
                .extend(page.results.into_iter().map(|r| r.name));
            Ok(())
        })
        .await
        .unwrap();

        assert_eq!(
            client_requests(&client),
            vec![START.to_string(), PAGE_A.to_string(), PAGE_B.to_string()]
        );
        assert_eq!(names.into_inner().unwrap(), vec!["a", "b", "c", "d", "e"]);
    }

    #[tokio::test]
    async fn test_walk_treats_missing_next_as_end() {
        let transport = StubTransport::new().with(START, json!({"results": [entry("solo")]}));
        let client = FetchClient::new(transport, PersistentCache::load(MemoryStorage::new(), 50));
        let mut pages = 0;

        walk_pages(&client, START, |_| {
            pages += 1;
            async { Ok(()) }
        })
        .await
        .unwrap();

        assert_eq!(pages, 1);
    }

    #[tokio::test]
    async fn test_handler_error_stops_walk() {
        let client = three_page_client();

        let result = walk_pages(&client, START, |page| async move {
            match page.next {
                Some(_) => Err(FetchError::Shape {
                    url: START.to_string(),
                    source: serde_json::from_str::<u8>("x").unwrap_err(),
                }),
                None => Ok(()),
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(client_requests(&client), vec![START.to_string()]);
    }

    #[tokio::test]
    async fn test_second_walk_is_served_from_cache() {
        let client = three_page_client();

        walk_pages(&client, START, |_| async { Ok(()) }).await.unwrap();
        walk_pages(&client, START, |_| async { Ok(()) }).await.unwrap();

        assert_eq!(client_requests(&client).len(), 3);
    }

    fn client_requests(client: &FetchClient<StubTransport, MemoryStorage>) -> Vec<String> {
        client.transport().requests()
    }
}
