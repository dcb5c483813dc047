pub mod app;
pub mod cli;
pub mod client;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod protect;

#[cfg(test)]
pub mod testing;
