//! nscdn-axum: HTTP gateway for nscdn.
//!
//! One catch-all route receives every request. The body is stored before
//! anything else happens, then the exchange is classified as an upload, a
//! read or a CORS preflight and answered accordingly.

pub mod app;
pub mod gateway;
pub mod legacy;
pub mod params;
pub mod respond;
pub mod state;
mod error;

pub use app::{router, GatewayApp};
pub use error::GatewayError;
pub use legacy::{HttpLegacyOrigin, LegacyOrigin, NoLegacyOrigin};
pub use params::GatewayParams;
pub use state::GatewayState;
