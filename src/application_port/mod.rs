mod account_service;
mod auth_service;
mod token_maker;

pub use account_service::*;
pub use auth_service::*;
pub use token_maker::*;
