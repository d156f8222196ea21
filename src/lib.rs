// This file exposes the modules as public modules in the crate

pub mod admin_handlers;
pub mod app_config;
pub mod errors;
pub mod exercise_catalog;
pub mod firestore;
pub mod flowise_client;
pub mod models;
pub mod profile_resolver;
pub mod user_handlers;
pub mod workout_handlers;
pub mod workout_parser;
pub mod workout_prompts;
