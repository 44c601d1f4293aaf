//! Service layer providing business-oriented operations on top of models.
//! - Separates business logic from data access.
//! - Reuses validation and entity definitions in the `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod pagination;
pub mod auth;
pub mod invitation;
pub mod hierarchy;
pub mod indiciados;
pub mod vehiculos;
pub mod documentos;
pub mod users;
#[cfg(test)]
pub mod test_support;
