mod error;
mod handler;
mod middleware;
mod router;

pub use error::recover_error;
pub use middleware::{authenticate, with_auth};
pub use router::routes;
