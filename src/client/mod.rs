//! HTTP client for the service desk REST API.

pub mod http;
