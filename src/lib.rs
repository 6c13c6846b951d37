//! Companies House Lookup Library
//!
//! This library provides the core functionality for the Companies House
//! lookup service: the registry API client, the company and director
//! lookups, the HTTP endpoints the form front end calls, and the state
//! machine of the front-end widget itself.
//!
//! # Modules
//!
//! - `api`: API-layer namespace.
//! - `core`: Domain-layer namespace.
//! - `frontend`: Form widget namespace.
//! - `integrations`: External service integrations.
//! - `app`: Router assembly and OpenAPI document.
//! - `config`: Configuration management.
//! - `debounce`: Keystroke debouncing.
//! - `display`: Masked rendering of the API key.
//! - `errors`: Error handling types.
//! - `form_controller`: Drives the form widget against the endpoints.
//! - `form_state`: Form widget state and dropdown rendering.
//! - `handlers`: HTTP request handlers.
//! - `lookup_client`: Typed client for the lookup endpoints.
//! - `models`: Core data models.
//! - `registry_client`: Companies House API client.
//! - `sanitize`: Inbound text cleanup.
//! - `security`: Feature-scoped security tokens.
//! - `services`: Company and director lookups.

pub mod api;
pub mod core;
pub mod frontend;
pub mod integrations;

pub mod app;
pub mod config;
pub mod debounce;
pub mod display;
pub mod errors;
pub mod form_controller;
pub mod form_state;
pub mod handlers;
pub mod lookup_client;
pub mod models;
pub mod registry_client;
pub mod sanitize;
pub mod security;
pub mod services;
