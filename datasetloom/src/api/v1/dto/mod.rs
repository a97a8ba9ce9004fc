//! v1 API Data Transfer Objects.
//!
//! Wire types for the v1 REST API, kept separate from the domain models in
//! `src/models/` and converted with `From` impls.

pub mod chats;
pub mod chunks;
pub mod common;
pub mod documents;
pub mod questions;

pub use chats::*;
pub use chunks::*;
pub use common::*;
pub use documents::*;
pub use questions::*;
