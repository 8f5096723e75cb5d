//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate distribution and repository calls into use-case APIs.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod plan_service;
