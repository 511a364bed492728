//! HTTP clients for the services the IDE talks to.
//!
//! - [`PistonClient`]: the remote code execution sandbox
//! - [`ReqwestTransport`]: the backend serving auth and snippet endpoints

pub mod backend_transport;
pub mod piston_client;

pub use backend_transport::ReqwestTransport;
pub use piston_client::PistonClient;
