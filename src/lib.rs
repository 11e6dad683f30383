pub mod api;
pub mod clock;
pub mod config;
pub mod db;
pub mod docs;
pub mod error;
pub mod export;
pub mod jobs;
pub mod model;
pub mod models;
pub mod recognition;
pub mod routes;
pub mod scheduler;
pub mod service;
pub mod store;
