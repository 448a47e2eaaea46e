//! Pagination draining
//!
//! Repositories expose paginated SDK calls as a lazy sequence of pages and
//! drain it into one materialized list before caching.

/// One page of a listing call.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Continuation token, `None` on the last page
    pub next_token: Option<String>,
}

impl<T> Page<T> {
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_token: None,
        }
    }

    pub fn with_next(items: Vec<T>, next_token: impl Into<String>) -> Self {
        Self {
            items,
            next_token: Some(next_token.into()),
        }
    }
}

/// Iterator over the pages of a token-paginated call.
///
/// Stops after the last page or the first error. A page handing back the
/// token it was requested with is an error built by `on_repeat`, since the
/// listing would otherwise never end. Finite and not restartable.
pub struct TokenPager<F, R> {
    fetch: F,
    on_repeat: R,
    next_token: Option<String>,
    done: bool,
}

impl<T, E, F, R> TokenPager<F, R>
where
    F: FnMut(Option<&str>) -> Result<Page<T>, E>,
    R: FnMut(&str) -> E,
{
    pub fn new(fetch: F, on_repeat: R) -> Self {
        Self {
            fetch,
            on_repeat,
            next_token: None,
            done: false,
        }
    }
}

impl<T, E, F, R> Iterator for TokenPager<F, R>
where
    F: FnMut(Option<&str>) -> Result<Page<T>, E>,
    R: FnMut(&str) -> E,
{
    type Item = Result<Vec<T>, E>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match (self.fetch)(self.next_token.as_deref()) {
            Ok(page) => match page.next_token {
                Some(token) if self.next_token.as_deref() == Some(token.as_str()) => {
                    log::warn!("pagination token {token} repeated");
                    self.done = true;
                    Some(Err((self.on_repeat)(&token)))
                }
                next_token => {
                    self.done = next_token.is_none();
                    self.next_token = next_token;
                    Some(Ok(page.items))
                }
            },
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Collect every page into one list, failing on the first page error.
pub fn drain<T, E>(pages: impl IntoIterator<Item = Result<Vec<T>, E>>) -> Result<Vec<T>, E> {
    let mut items = Vec::new();
    for page in pages {
        items.extend(page?);
    }
    Ok(items)
}

/// Drain a token-paginated call.
pub fn drain_pages<T, E, F, R>(fetch: F, on_repeat: R) -> Result<Vec<T>, E>
where
    F: FnMut(Option<&str>) -> Result<Page<T>, E>,
    R: FnMut(&str) -> E,
{
    drain(TokenPager::new(fetch, on_repeat))
}
