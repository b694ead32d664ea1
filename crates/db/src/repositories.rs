pub mod event;
pub mod swap;
pub mod user;
