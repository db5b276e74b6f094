pub mod advisor;
pub mod badges;
pub mod capability;
pub mod catalog;
pub mod config;
pub mod draft;
pub mod error;
pub mod formation;
pub mod instructions;
pub mod io;
pub mod knowledge;
pub mod library;
pub mod matches;
pub mod paths;
pub mod roles;
pub mod settings;
pub mod state;
pub mod storage;
pub mod tactic;
pub mod versioning;

pub use error::{Result, TacticianError};
