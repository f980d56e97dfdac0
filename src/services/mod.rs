//! Service layer for Trainstore.
//!
//! Contains the business logic over the db query layer:
//! - TrainingStore (CRUD and limit enforcement for projects, labels,
//!   and training examples)

mod store;

pub use store::TrainingStore;
