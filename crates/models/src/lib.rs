pub mod errors;
pub mod db;
pub mod user;
pub mod track;

#[cfg(test)]
mod tests;
