#[macro_use]
extern crate rocket;

pub mod dto;
pub mod error;
pub mod feed;
pub mod mutation;
pub mod notify;
pub mod query;

pub use mutation::*;
pub use query::*;

pub use sea_orm;
