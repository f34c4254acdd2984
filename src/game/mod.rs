pub mod config;
pub mod ingredients;
pub mod orders;
pub mod world;
