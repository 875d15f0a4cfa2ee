pub mod auth;
pub mod system;
pub mod user;
