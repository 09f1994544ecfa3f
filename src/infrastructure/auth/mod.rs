//! Authentication infrastructure: JWT issuance and Argon2 password hashing.

pub mod jwt;
pub mod password;

pub use jwt::{Claims, JwtService};
pub use password::PasswordHasher;
