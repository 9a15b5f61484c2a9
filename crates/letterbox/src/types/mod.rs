//! Domain types for the Letterbox services
//!
//! Entities as returned by the backend, plus the parameter and change structs
//! callers pass into the services.

// Re-export commonly used types from submodules
pub use newsletter::*;
pub use queue::*;
pub use source::*;
pub use tag::*;
pub use user::*;

// Submodules
pub mod newsletter;
pub mod queue;
pub mod source;
pub mod tag;
pub mod user;
