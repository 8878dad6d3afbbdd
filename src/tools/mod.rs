//! healthlog tools
//!
//! The actions behind each command: they read and write the store and return
//! serializable responses.

pub mod entries;
pub mod exchange;
