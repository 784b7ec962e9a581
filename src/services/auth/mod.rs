pub mod authenticator;
pub mod error;
pub mod factory;

pub use authenticator::TokenAuthenticator;
pub use error::AuthError;
pub use factory::build_authenticator;
