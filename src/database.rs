//! Document store connectivity and result rendering.

mod connection;
#[cfg(test)]
pub(crate) mod mock;
mod render;
mod store;

pub use connection::connect;
pub use render::{normalize_id, render_document};
pub use store::{DocumentStore, FindRequest, MongoStore};
