pub mod agent;
pub mod algorithm;
pub mod common;
pub mod config;
pub mod engine;
pub mod map;
pub mod render;
pub mod stat;
pub mod world;
