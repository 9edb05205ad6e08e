//! Clientes API Library
//!
//! Registry of customers identified by a Brazilian tax document (CPF for
//! individuals, CNPJ for businesses), exposed as a small REST service.
//!
//! # Modules
//!
//! - `api`: API-layer components (handlers, routes, OpenAPI document).
//! - `domain`: Document validation, models and the registry service.
//! - `config`: Configuration management.
//! - `db`: Database connection and table bootstrap.
//! - `db_storage`: PostgreSQL customer storage.
//! - `document`: CPF/CNPJ check-digit validation.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.
//! - `memory_storage`: In-memory customer storage.
//! - `models`: Data models and DTOs.
//! - `openapi`: OpenAPI/Swagger definitions.
//! - `repository`: Storage capability trait.
//! - `request_counter`: Request counting middleware.
//! - `routes`: Router assembly.
//! - `services`: Customer registry service.

pub mod api;
pub mod domain;

pub mod config;
pub mod db;
pub mod db_storage;
pub mod document;
pub mod errors;
pub mod handlers;
pub mod memory_storage;
pub mod models;
pub mod openapi;
pub mod repository;
pub mod request_counter;
pub mod routes;
pub mod services;
