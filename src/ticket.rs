//! Short-lived signed authorization tickets crossing the process boundary.

pub mod claims;
pub mod codec;

pub use claims::*;
pub use codec::*;
