//! Cursor pagination for both clients.

use std::collections::VecDeque;

use async_stream::try_stream;
use futures::Stream;

use super::blocking::BlockingClient;
use super::nonblocking::AsyncClient;
use crate::api::Execute;
use crate::api::Page;
use crate::api::Request;
use crate::error::Error;
use crate::model::Model;

/// Async iterator that yields pages of a paginated endpoint.
///
/// Automatically follows the `after` cursor. A failed page ends the sequence.
///
/// # Example
///
/// ```ignore
/// let mut pages = client.paginate(official::top_players(LocationId::Global, &Paging::new().limit(100)));
///
/// while let Some(page) = pages.next().await {
///     let page = page?;
///     for player in page.items() {
///         println!("{:?} {}", player.rank, player.name);
///     }
/// }
/// ```
pub struct Pages<T> {
    client: AsyncClient,
    next: Option<Request<Page<T>>>,
}

impl<T: Model> Pages<T> {
    pub(crate) fn new(client: AsyncClient, request: Request<Page<T>>) -> Self {
        Self {
            client,
            next: Some(request),
        }
    }

    /// Fetches the next page of results.
    ///
    /// Returns `None` when all pages have been consumed.
    pub async fn next(&mut self) -> Option<Result<Page<T>, Error>> {
        let request = self.next.take()?;
        match self.client.execute(request.clone()).await {
            Ok(response) => {
                let page = response.into_inner();
                self.next = page.after().map(|cursor| request.after(cursor));
                Some(Ok(page))
            }
            Err(e) => Some(Err(e)),
        }
    }

    /// Flattens the remaining pages into a stream of items.
    pub fn items(self) -> impl Stream<Item = Result<T, Error>> + Send {
        let mut pages = self;
        try_stream! {
            while let Some(page) = pages.next().await {
                for item in page? {
                    yield item;
                }
            }
        }
    }
}

/// Iterator over the items of a paginated endpoint for the blocking client.
///
/// Pages are fetched lazily when the buffered items run out. An error is yielded once
/// and ends the iteration.
pub struct BlockingPages<'a, T> {
    client: &'a BlockingClient,
    next: Option<Request<Page<T>>>,
    buffer: VecDeque<T>,
}

impl<'a, T: Model> BlockingPages<'a, T> {
    pub(crate) fn new(client: &'a BlockingClient, request: Request<Page<T>>) -> Self {
        Self {
            client,
            next: Some(request),
            buffer: VecDeque::new(),
        }
    }
}

impl<T: Model> Iterator for BlockingPages<'_, T> {
    type Item = Result<T, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                return Some(Ok(item));
            }

            let request = self.next.take()?;
            match self.client.execute(request.clone()) {
                Ok(response) => {
                    let page = response.into_inner();
                    self.next = page.after().map(|cursor| request.after(cursor));
                    self.buffer.extend(page);
                }
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
