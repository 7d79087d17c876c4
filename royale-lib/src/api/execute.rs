//! The operation set shared by both client modes.

use crate::api::Request;
use crate::error::Error;
use crate::model::Model;
use crate::response::Response;

/// Runs requests against the API.
///
/// Both clients implement this trait, differing only in what a call returns: the
/// blocking client returns `Result<Response<T>, Error>` directly, and the non-blocking
/// client returns a `Send + 'static` future of the same. Every endpoint in
/// [`OfficialApi`](crate::api::OfficialApi) and [`RoyaleApi`](crate::api::RoyaleApi)
/// is written once on top of this trait.
///
/// # Example
///
/// ```ignore
/// use royale_lib::api::{official, Execute};
///
/// // Blocking
/// let player = blocking.execute(official::player("#2P0LYQ")?)?;
///
/// // Non-blocking
/// let player = client.execute(official::player("#2P0LYQ")?).await?;
/// ```
pub trait Execute {
    /// What a call returns.
    type Output<T: Model>;

    /// Runs a request, serving it from the cache unless `bypass_cache` is set.
    fn fetch<T: Model>(&self, request: Request<T>, bypass_cache: bool) -> Self::Output<T>;

    /// Wraps an error raised while building a request.
    fn fail<T: Model>(&self, error: Error) -> Self::Output<T>;

    /// Runs a request, serving it from the cache when a fresh entry exists.
    fn execute<T: Model>(&self, request: Request<T>) -> Self::Output<T> {
        self.fetch(request, false)
    }

    /// Re-issues the request that produced `response`, bypassing the cache.
    ///
    /// The fresh response replaces the cached one.
    fn refresh<T: Model>(&self, response: &Response<T>) -> Self::Output<T> {
        self.fetch(response.request(), true)
    }

    /// Runs a request that may have failed to build.
    fn run<T: Model>(&self, request: Result<Request<T>, Error>) -> Self::Output<T> {
        match request {
            Ok(request) => self.execute(request),
            Err(error) => self.fail(error),
        }
    }
}
