pub mod chats;
pub mod chunks;
pub mod documents;
pub(crate) mod health;
pub mod questions;

pub use health::health_check;
