//! Core types and shared functionality for postboard.
//!
//! This crate provides:
//! - SQLite-backed post and admin storage
//! - Edit tokens and the in-memory capability registry
//! - The read-through post cache and retention window
//! - Edit authorization, admin passwords and session signing
//! - Unified error types and layered configuration

pub mod auth;
pub mod board;
pub mod cache;
pub mod config;
pub mod error;
pub mod registry;
pub mod retention;
pub mod store;
pub mod token;

pub use auth::{AdminIdentity, SessionKeys};
pub use board::Board;
pub use config::AppConfig;
pub use error::Error;
pub use store::{BoardDb, Post, PostId, PostStore, PostType};
pub use token::EditToken;
