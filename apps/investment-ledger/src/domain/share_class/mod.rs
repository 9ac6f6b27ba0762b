//! Share class directory bounded context.
//!
//! Creation and metadata of fund share classes plus global issuance
//! metrics. Epoch-based order flow lives in the `investment` context.

pub mod aggregate;
pub mod errors;
pub mod events;
pub mod repository;
pub mod value_objects;

pub use aggregate::ShareClass;
pub use errors::ShareClassError;
pub use events::ShareClassEvent;
pub use repository::ShareClassRepository;
