//! Draining token-paginated list endpoints

use std::future::Future;

/// One page of results from a paginated endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,

    /// Token for the next page; `None` when this is the last page
    pub next_page_token: Option<String>,
}

impl<T> Page<T> {
    /// Build a page from a wire token, where an empty string means "no more pages"
    pub fn new(items: Vec<T>, next_page_token: impl Into<String>) -> Self {
        let token = next_page_token.into();
        Self {
            items,
            next_page_token: if token.is_empty() { None } else { Some(token) },
        }
    }
}

/// Fetch every page and concatenate the items in order
///
/// `fetch` is called with `None` for the first page and with the previous
/// page's token afterwards. The first error stops pagination and is returned.
pub async fn all_pages<T, E, F, Fut>(mut fetch: F) -> Result<Vec<T>, E>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>, E>>,
{
    let mut items = Vec::new();
    let mut token: Option<String> = None;

    loop {
        let page = fetch(token.take()).await?;
        items.extend(page.items);

        match page.next_page_token {
            Some(next) => token = Some(next),
            None => return Ok(items),
        }
    }
}
