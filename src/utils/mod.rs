//! Shared helpers that sit outside the evaluation core.

pub mod validation;
