//! Provides persistence for region descriptors.
//!
//! This module implements the versioned on-disk format for
//! [`QuantumRegion`](crate::core::models::region::QuantumRegion)
//! descriptors, so that a host application can store a region alongside the
//! rest of its simulation setup and reconstruct it identically, including
//! the order of the particle-index and atomic-number lists.

pub mod region_file;
