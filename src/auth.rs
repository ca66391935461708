//! Auth-domain identifiers, redacted secrets, and session records.

pub mod id;
pub mod secret;
pub mod session;

pub use id::*;
pub use secret::*;
pub use session::*;
