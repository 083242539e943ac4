//! Service layer for business logic
//!
//! This module provides the orchestration layer between callers and the
//! HTTP-backed service clients. Services take their collaborators as
//! injected capability traits, keeping the pipeline testable without real
//! network calls.

pub mod addon_service;
pub mod harness;

pub use addon_service::AddonService;
pub use harness::CloudHarness;
