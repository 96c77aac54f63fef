pub mod api;
pub mod clones;
pub mod command;
pub mod config;
pub mod dashboard;
pub mod models;
pub mod provider;
pub mod render;
pub mod store;
