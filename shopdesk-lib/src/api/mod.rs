//! REST backend contracts and client.
//!
//! Every resource is served under `<base>/<path>` with the same shapes:
//! list endpoints take a [`ListQuery`] and answer with a [`ListEnvelope`]
//! around a [`Paginated`] page, single-record endpoints answer with a
//! [`BackendResponse`].

mod client;
mod query;
mod resource;
mod response;

pub use client::{ApiClient, ApiClientBuilder, Missing, Set};
pub use query::{ListQuery, SortOrder};
pub use resource::Resource;
pub use response::{BackendResponse, ListEnvelope, Paginated, ResponseEnvelope};
