//! API operations
//!
//! [`official`] and [`mirror`] build typed [`Request`]s; the [`OfficialApi`] and
//! [`RoyaleApi`] traits run them on any client. Both traits share method names such
//! as `get_player`, so import only the one matching the client's [`ApiVariant`].

mod execute;
pub mod mirror;
pub mod official;
mod page;
mod params;
mod request;

pub use execute::*;
pub use mirror::RoyaleApi;
pub use official::OfficialApi;
pub use page::*;
pub use params::*;
pub use request::*;
