// Authentication module
// JWT-based authentication with registration, login, refresh rotation and profile management

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod rate_limit;
pub mod repository;
pub mod service;
pub mod token;

// Re-export commonly used types
pub use error::AuthError;
pub use middleware::AuthenticatedUser;
pub use rate_limit::{InMemoryRateLimiter, RateLimiter};
pub use service::AuthService;
pub use token::TokenService;
