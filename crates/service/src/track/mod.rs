//! Track (media) module: upload validation, repository abstraction and the
//! service used by the tracks HTTP routes.

pub mod domain;
pub mod repository;
pub mod repo;
pub mod service;

pub use service::TrackService;
