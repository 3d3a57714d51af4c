//! gemini-relay-service: forwards prompts and uploaded media to Gemini.

pub mod config;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
