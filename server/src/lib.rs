pub mod config;
pub mod delivery;
pub mod handlers;
pub mod mocks;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
pub mod utils;
