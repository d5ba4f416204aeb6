pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod menu;
pub mod server;

#[cfg(test)]
pub mod testing;
