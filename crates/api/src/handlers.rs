pub mod events;
pub mod swap;
pub mod users;
