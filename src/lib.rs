pub mod config;
pub mod db;
pub mod logging;
pub mod models;
pub mod processor;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;
