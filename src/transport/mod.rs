//! Transport layer: opening a tile URL and exposing the response.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              TileFetcher                │
//! └────────────────────┬────────────────────┘
//!                      │ open(url, config)
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │            SchemeTransport              │
//! └──────────┬───────────────────┬──────────┘
//!            ▼                   ▼
//! ┌────────────────────┐ ┌────────────────────┐
//! │   HttpTransport    │ │   FileTransport    │
//! │ (reqwest, rustls)  │ │   (file:// URLs)   │
//! └────────────────────┘ └────────────────────┘
//! ```
//!
//! A [`TransportResponse`] exposes the status code (when the transport has
//! one), the declared content encoding, the expiration derived from cache
//! headers, and the body.

mod expiration;
mod file;
mod http;
mod response;
mod scheme;

pub use expiration::{expiration_from_headers, parse_http_date, parse_max_age};
pub use file::FileTransport;
pub use http::HttpTransport;
pub use response::{Transport, TransportResponse};
pub use scheme::SchemeTransport;
