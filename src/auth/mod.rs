//! Authentication: password hashing, bearer tokens, password reset
//!
//! - [`password`]: argon2 hashing
//! - [`token`]: JWT issue/verify
//! - [`reset`]: reset-code lifecycle
//! - [`mailer`]: outbound reset mail
//! - [`service`]: register / login / reset flows
//! - [`middleware`]: bearer-token guard for protected routes

pub mod mailer;
pub mod middleware;
pub mod password;
pub mod reset;
pub mod service;
pub mod token;

pub use mailer::{LogMailer, Mailer};
pub use middleware::{AuthUser, jwt_auth_middleware};
pub use service::{AuthService, AuthSession, Registration};
pub use token::{Claims, TokenService};
