pub mod advisor;
pub mod config;
pub mod draft;
pub mod events;
pub mod formation;
pub mod knowledge;
pub mod library;
pub mod matches;
pub mod settings;
pub mod state;
pub mod tactics;
