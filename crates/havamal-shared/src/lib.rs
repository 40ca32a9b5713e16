//! # Havamal Shared
//!
//! Wire types used by the HTTP API: the success envelope, RFC 7807 problem
//! bodies and the request/response DTOs that are not domain entities.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse};
