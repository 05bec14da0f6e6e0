pub mod config;
pub mod dataset;
pub mod db;
pub mod server;
pub mod telemetry;
