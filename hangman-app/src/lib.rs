pub mod config;
pub mod console;
pub mod error;
pub mod export;
pub mod game_service;
