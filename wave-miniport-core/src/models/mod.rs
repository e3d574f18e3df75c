pub mod capability;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod format;
pub mod guids;
pub mod power;
pub mod property;
pub mod resources;
pub mod state;
