//! Core domain types
//!
//! This module contains the core domain structures used across Brig.
//! Events and projects are read-only inputs; jobs are built by handlers
//! and handed to an executor; conclusions drive what a check run renders.

pub mod check;
pub mod event;
pub mod job;
pub mod project;
