pub mod schema;
pub mod models;
pub mod store;
pub mod pg_store;
pub mod console;
pub mod prompt;
pub mod booking;
pub mod report;
pub mod handlers;
#[cfg(test)]
mod memory_store;
