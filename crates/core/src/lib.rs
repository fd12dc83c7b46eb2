//! Coaching site core - shared CMS types.
//!
//! This crate provides the types shared by every coaching-site component:
//! - `content` - read path (delivery API, entry mapping, domain queries)
//! - `provisioning` - write path (content-type migrations and seeders)
//! - `cli` - operator tooling
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. Entries are
//! owned by the CMS; everything here is a read-only projection of its JSON.
//!
//! # Modules
//!
//! - [`types`] - entry envelope, collections, assets, links and type-safe ids

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
