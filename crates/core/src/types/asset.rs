//! Assets and links.
//!
//! Entries reference binary files through links. The delivery API returns
//! unresolved links in entry fields and the linked assets in the collection's
//! `includes` block.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::id::AssetId;

/// System metadata for an asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetSys {
    pub id: AssetId,
}

/// A binary file managed by the CMS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub sys: AssetSys,
    #[serde(default)]
    pub fields: AssetFields,
}

/// Descriptive fields of an asset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetFields {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub file: Option<AssetFile>,
}

/// The file behind an asset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetFile {
    /// Usually protocol-relative (`//images.ctfassets.net/...`).
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
}

impl Asset {
    /// Fully-qualified URL of the asset's file, if it has one.
    #[must_use]
    pub fn url(&self) -> Option<String> {
        self.fields
            .file
            .as_ref()?
            .url
            .as_deref()
            .filter(|url| !url.is_empty())
            .map(absolute_asset_url)
    }
}

/// Turn a CMS file URL into an absolute `https` URL.
///
/// The CMS serves protocol-relative URLs; those get `https:` prepended.
/// Already-absolute URLs are returned unchanged.
///
/// ```rust
/// # use coachsite_core::absolute_asset_url;
/// assert_eq!(
///     absolute_asset_url("//x.ctfassets.net/path.png"),
///     "https://x.ctfassets.net/path.png"
/// );
/// ```
#[must_use]
pub fn absolute_asset_url(raw: &str) -> String {
    if raw.starts_with("https://") || raw.starts_with("http://") {
        raw.to_owned()
    } else {
        format!("https:{raw}")
    }
}

/// Kind of resource a link points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkType {
    Asset,
    Entry,
}

/// An unresolved reference from an entry field to another resource.
///
/// Wire shape: `{"sys": {"type": "Link", "linkType": "Asset", "id": "..."}}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub link_type: LinkType,
    pub id: String,
}

impl Link {
    /// Parse a raw field value as a link. Returns `None` for anything else.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        let sys = value.get("sys")?;
        if sys.get("type")?.as_str()? != "Link" {
            return None;
        }
        let link_type = match sys.get("linkType")?.as_str()? {
            "Asset" => LinkType::Asset,
            "Entry" => LinkType::Entry,
            _ => return None,
        };
        let id = sys.get("id")?.as_str()?.to_owned();
        Some(Self { link_type, id })
    }
}
