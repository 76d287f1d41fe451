pub mod config;
pub mod error;
pub mod pacman;
pub mod repository;
