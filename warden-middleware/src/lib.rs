#![forbid(unsafe_code)]
#![forbid(clippy::unwrap_used)]
#![deny(clippy::pedantic)]
#![deny(clippy::get_unwrap)]
#![allow(clippy::module_name_repetitions)]

pub mod authenticate;
pub mod authorize;
pub mod extract;

pub use authenticate::{AuthenticateLayer, AuthenticateService, Identity};
pub use authorize::{AuthorizeLayer, AuthorizeService, RouteAuthz};
pub use extract::FromRequest;
