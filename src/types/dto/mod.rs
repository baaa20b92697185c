pub mod auth;
pub mod common;
pub mod department;
pub mod supplier;
pub mod user;
