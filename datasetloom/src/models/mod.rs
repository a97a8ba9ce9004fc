mod chat;
mod chunk;
mod common;
mod document;
mod question;

pub use chat::*;
pub use chunk::*;
pub use common::*;
pub use document::*;
pub use question::*;
