pub use super::account::Entity as Account;
pub use super::admin::Entity as Admin;
pub use super::contact_message::Entity as ContactMessage;
pub use super::player::Entity as Player;
pub use super::session::Entity as Session;
