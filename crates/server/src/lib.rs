pub mod routes;
pub mod startup;
pub mod state;
pub mod errors;
pub mod negotiate;
pub mod extract;
pub mod session;
pub mod csrf;
pub mod flash;
pub mod dto;
pub mod views;
pub mod openapi;

pub use startup::{launch, run};
