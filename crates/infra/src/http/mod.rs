//! HTTP transport for the backend service

pub mod client;

pub use client::{HttpClient, HttpClientBuilder};
