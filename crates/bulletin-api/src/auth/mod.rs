//! Authentication: JWT issuing/verification, password hashing, and the
//! middleware that turns a bearer token into a [`models::CurrentUser`].

pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;

pub use jwt::{Claims, JwtService};
pub use models::CurrentUser;
