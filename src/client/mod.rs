//! Saved query service clients and authentication.
//!
//! [`QueryService`] is the narrow interface the export/import code talks to.
//! [`AssetClient`] implements it over the platform's REST API and
//! [`MemoryQueryService`] keeps everything in process for tests.

mod auth;
mod memory;
mod rest;
mod service;

pub use auth::Credentials;
pub use memory::MemoryQueryService;
pub use rest::AssetClient;
pub use service::QueryService;
