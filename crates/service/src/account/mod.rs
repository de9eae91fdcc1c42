//! Account module: three-layer architecture (domain, repository, service).
//!
//! Registration, credential checks and session tokens live here; the HTTP
//! crate only translates forms and cookies.

pub mod domain;
pub mod repository;
pub mod repo;
pub mod service;
pub mod session;

pub use service::AccountService;
