mod jwks;
mod session;
mod validator;

pub mod dto;
pub mod guards;
pub mod handler;
pub mod model;
pub mod routes;

pub use jwks::JwksClient;
pub use session::SessionResolver;
pub use validator::{JwtValidator, KeySource};
