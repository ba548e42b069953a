pub mod gate;
pub mod middleware;

pub use gate::{AccessGate, GateSurface};
pub use middleware::{request_tracing, REQUEST_ID_HEADER};
