pub mod menu;
pub mod server;
