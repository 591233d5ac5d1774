pub mod config;
pub mod dtos;
pub mod forms;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
