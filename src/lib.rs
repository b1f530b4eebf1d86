pub mod api;
pub mod app_state;
pub mod auth;
pub mod config;
pub mod http_error;
pub mod model;
pub mod openapi;
pub mod upload;
