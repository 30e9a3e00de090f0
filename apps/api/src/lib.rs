pub mod cache;
pub mod config;
pub mod context;
pub mod db;
pub mod errors;
pub mod llm_client;
pub mod models;
pub mod resume;
pub mod routes;
pub mod state;
pub mod tailoring;
