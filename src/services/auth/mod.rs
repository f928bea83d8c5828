pub mod admin_auth;
pub mod admin_token;
pub mod factory;

pub use admin_auth::{AcceptedCredentials, AdminAuth, CredentialSource, PresentedCredentials};
pub use admin_token::{AdminTokenError, AdminTokens};
pub use factory::build_admin_auth;
