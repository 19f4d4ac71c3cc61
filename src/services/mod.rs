pub mod availability;
pub mod modification;
pub mod projector;

pub use availability::ConflictScope;
pub use modification::ModificationEngine;
