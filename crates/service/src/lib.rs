//! Service layer providing the business operations of the account and track services.
//! - Separates business logic from data access (repository traits per aggregate).
//! - Reuses validation and entity definitions in `models` crate.
//! - Framework independent: no HTTP types cross this boundary.

pub mod errors;
pub mod validation;
pub mod account;
pub mod track;
#[cfg(test)]
pub mod test_support;
