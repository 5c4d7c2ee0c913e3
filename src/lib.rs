pub mod config;
pub mod db;
pub mod error;
pub mod hh;
pub mod ingest;
pub mod models;
