pub mod prelude;

pub mod account;
pub mod admin;
pub mod contact_message;
pub mod player;
pub mod session;
