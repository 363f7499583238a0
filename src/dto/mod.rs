pub mod auth;
pub mod cart;
pub mod menu;
pub mod payments;
pub mod users;
