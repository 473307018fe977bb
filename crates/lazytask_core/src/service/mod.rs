//! Use-case services over the repositories.
//!
//! # Responsibility
//! - Give protocol adapters one entry point per user-facing operation.
//! - Keep adapters unaware of the key layout and the store backend.

pub mod board_service;
