//! MindHaven - Mental Wellness Assessment Backend
//!
//! This crate implements the assessment record lifecycle (soft deletion with a
//! grace period, restore, permanent purge) and the wellness snapshot derived
//! from a user's active assessments.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
