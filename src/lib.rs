pub mod cli;
pub mod config;
pub mod service;
pub mod vfs;
pub mod web;
