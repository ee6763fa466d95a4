//! Core data types for aligner evaluation.
//!
//! - [`cigar`]: Tokenizing CIGAR-style operation strings into typed [`Operation`]s
//! - [`intervals`]: Laying operations out on the reference as [`MappingIntervals`]
//! - [`record`]: Truth and called records, and read-id extraction
//!
//! ## Reference layout
//!
//! Operations are applied from the alignment start with a running cursor:
//!
//! | Kind | Code | Stored as | Cursor |
//! |------|------|-----------|--------|
//! | Match | M | `[start, end)` | advances |
//! | Deletion | D | `[start, end)` | advances |
//! | Skip | N | `[start, end)` | advances |
//! | Insertion | I | `(position, length)` | unchanged |
//! | Clip | S, H | `(position, length)` | unchanged |
//!
//! [`Operation`]: cigar::Operation
//! [`MappingIntervals`]: intervals::MappingIntervals

pub mod cigar;
pub mod intervals;
pub mod record;
