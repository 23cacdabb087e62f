//! Database schema and the persistence collaborator

pub mod init;
pub mod store;

pub use init::*;
pub use store::*;
