//! Optional extensions layered on top of the core handoff flows.

pub mod replay;
pub use replay::*;
