//! Domain Layer - Entities, value objects, validation rules, and repository contracts

pub mod entities;
pub mod errors;
pub mod repositories;
pub mod validation;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use repositories::*;
pub use value_objects::*;
