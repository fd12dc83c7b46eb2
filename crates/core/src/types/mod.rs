//! Core CMS types.
//!
//! This module provides typed projections of the CMS delivery JSON.

pub mod asset;
pub mod content_type;
pub mod entry;
pub mod id;

pub use asset::{Asset, AssetFields, AssetFile, AssetSys, Link, LinkType, absolute_asset_url};
pub use content_type::*;
pub use entry::{
    ContentEntry, ContentTypeRef, ContentTypeRefSys, EntryCollection, Includes, SystemMetadata,
};
pub use id::*;
