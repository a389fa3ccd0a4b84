#![recursion_limit = "256"]

pub mod anchors;
pub mod boxes;
pub mod config;
pub mod debug;
pub mod error;
pub mod layout;
pub mod loss;
pub mod targets;
