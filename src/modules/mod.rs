pub mod assignments;
pub mod auth;
pub mod health;
pub mod submissions;
pub mod users;
