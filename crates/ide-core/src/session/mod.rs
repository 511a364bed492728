//! Session domain module.
//!
//! - `model`: signed-in user and auth request/response bodies
//! - `transport`: the HTTP seam used for every backend call

mod model;
mod transport;

pub use model::{AuthResponse, Credentials, Session, SignupProfile, User};
pub use transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
