//! Command handlers

pub mod category;
pub mod config;
pub mod data;
pub mod post;
pub mod status;
