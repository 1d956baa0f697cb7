//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, transaction)
//! 2. `TraceLayer` (request span with an empty `request_id` field)
//! 3. Request ID (fills the span field, echoes `x-request-id`)

pub mod request_id;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
