//! Domain layer.
//!
//! Pure business logic with no infrastructure concerns. Split into a shared
//! kernel and two bounded contexts: the share class directory and the
//! epoch-based investment flow.

pub mod investment;
pub mod share_class;
pub mod shared;
