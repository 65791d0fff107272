//! Browser adapters
//!
//! The only place that touches `web_sys` directly: fetch transport,
//! localStorage and the History API.

mod http;
pub mod route;
pub mod router;
mod storage;

pub use http::{FETCH, FetchHttpClient};
pub use storage::BrowserStorage;
