//! HRMS Lite: employee directory and daily attendance for a single admin.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod docs;
pub mod model;
pub mod models;
pub mod routes;
pub mod service;
pub mod store;
