mod account_service_impl;
mod auth_service_impl;
mod session_store_fake;
mod token_maker_encrypted;
mod token_maker_jwt;

pub use account_service_impl::*;
pub use auth_service_impl::*;
pub use session_store_fake::*;
pub use token_maker_encrypted::*;
pub use token_maker_jwt::*;
