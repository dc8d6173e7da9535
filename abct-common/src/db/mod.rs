//! Database access for the tune table

pub mod init;
pub mod tunes;

pub use init::*;
pub use tunes::*;
