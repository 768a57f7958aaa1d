//! Shared types for the Freightdesk vendor platform
//!
//! Domain models and wire types used by the vendor server and its clients:
//! the zone catalog, the zone-to-zone rate matrix, vendor details and the
//! submission payload, draft documents, and the API response envelope.

pub mod models;
pub mod response;

// Re-exports
pub use response::{ApiResponse, API_CODE_SUCCESS};
