//! Paged result retrieval
//!
//! Turns a 1-indexed `(page, page_size)` request into one offset/count fetch
//! against any counted source. Bounds on `page` and `page_size` are checked
//! at the HTTP boundary; this module only does the offset arithmetic.

use crate::record::schema::Paged;
use crate::utils::AppResult;
use async_trait::async_trait;
use std::future::Future;
use std::marker::PhantomData;

/// Smallest valid page number
pub const MIN_PAGE: usize = 1;
/// Default number of items per page
pub const DEFAULT_PAGE_SIZE: usize = 10;
/// Largest page size a client may request
pub const MAX_PAGE_SIZE: usize = 9999;

/// A source that can return a window of its items plus their total count
#[async_trait]
pub trait PagedSource<T>: Send + Sync {
    async fn fetch(&self, start: usize, count: usize) -> AppResult<Paged<T>>;
}

#[async_trait]
impl<T, F, Fut> PagedSource<T> for F
where
    T: Send + 'static,
    F: Fn(usize, usize) -> Fut + Send + Sync,
    Fut: Future<Output = AppResult<Paged<T>>> + Send + 'static,
{
    async fn fetch(&self, start: usize, count: usize) -> AppResult<Paged<T>> {
        (self)(start, count).await
    }
}

/// A validated page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub page_size: usize,
}

impl PageRequest {
    pub fn new(page: usize, page_size: usize) -> Self {
        Self { page, page_size }
    }

    /// Offset of the first item on this page
    pub fn start_index(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: MIN_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Fetches pages from a `PagedSource`, one source call per page
pub struct PagedResultGetter<T, S> {
    source: S,
    _item: PhantomData<fn() -> T>,
}

impl<T, S> PagedResultGetter<T, S>
where
    S: PagedSource<T>,
{
    pub fn new(source: S) -> Self {
        Self {
            source,
            _item: PhantomData,
        }
    }

    /// Fetch one page. Errors from the source are returned unchanged.
    pub async fn get(&self, page: usize, page_size: usize) -> AppResult<Paged<T>> {
        let request = PageRequest::new(page, page_size);
        self.get_request(request).await
    }

    pub async fn get_request(&self, request: PageRequest) -> AppResult<Paged<T>> {
        self.source
            .fetch(request.start_index(), request.page_size)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::AppError;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Numbers 0..total served as a counted source, recording every call
    fn numbers(total: usize, calls: Arc<Mutex<Vec<(usize, usize)>>>) -> impl PagedSource<usize> {
        move |start: usize, count: usize| {
            calls.lock().push((start, count));
            async move {
                let items = (0..total).skip(start).take(count).collect();
                Ok::<Paged<usize>, AppError>(Paged { items, total })
            }
        }
    }

    #[test]
    fn test_start_index() {
        assert_eq!(PageRequest::new(1, 10).start_index(), 0);
        assert_eq!(PageRequest::new(2, 10).start_index(), 10);
        assert_eq!(PageRequest::new(3, 7).start_index(), 14);
        assert_eq!(PageRequest::default(), PageRequest::new(1, 10));
    }

    #[tokio::test]
    async fn test_second_page_fetches_once_with_offset() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let getter = PagedResultGetter::new(numbers(25, calls.clone()));

        let page = getter.get(2, 10).await.unwrap();

        assert_eq!(*calls.lock(), vec![(10, 10)]);
        assert_eq!(page.items, (10..20).collect::<Vec<_>>());
        assert_eq!(page.total, 25);
    }

    #[tokio::test]
    async fn test_last_page_is_short() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let getter = PagedResultGetter::new(numbers(25, calls.clone()));

        let page = getter.get(3, 10).await.unwrap();

        assert_eq!(page.items, vec![20, 21, 22, 23, 24]);
        assert_eq!(page.total, 25);
        assert_eq!(calls.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_page_size_equal_to_total_returns_everything_in_order() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let getter = PagedResultGetter::new(numbers(12, calls));

        let page = getter.get(1, 12).await.unwrap();
        assert_eq!(page.items, (0..12).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_items_never_exceed_page_size() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let getter = PagedResultGetter::new(numbers(100, calls.clone()));

        for page_size in [1, 3, 10, 99, 100, MAX_PAGE_SIZE] {
            for page in 1..=4 {
                let result = getter.get(page, page_size).await.unwrap();
                assert!(result.items.len() <= page_size);
                assert_eq!(result.total, 100);
            }
        }
        assert_eq!(calls.lock().len(), 6 * 4);
    }

    #[tokio::test]
    async fn test_source_errors_propagate() {
        let getter = PagedResultGetter::<usize, _>::new(|_start: usize, _count: usize| async {
            Err::<Paged<usize>, _>(AppError::Store("connection lost".to_string()))
        });

        let result = getter.get(1, 10).await;
        assert!(matches!(result, Err(AppError::Store(msg)) if msg == "connection lost"));
    }
}
