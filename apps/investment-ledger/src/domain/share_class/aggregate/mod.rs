//! Share class aggregate.

mod share_class;

pub use share_class::ShareClass;
