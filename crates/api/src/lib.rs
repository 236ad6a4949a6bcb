//! HTTP API: configuration, request pipeline, routing and response mapping.

pub mod app;
pub mod config;
pub mod context;
pub mod handler;
pub mod middleware;
