// Modules
pub mod cli;
pub mod logic;
pub mod models;
pub mod utils;
