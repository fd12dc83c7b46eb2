//! Newtype IDs for type-safe CMS references.
//!
//! The CMS assigns opaque string identifiers to entries and assets. Use the
//! `define_id!` macro to create wrappers that prevent accidentally mixing an
//! entry id with an asset id.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>` and `AsRef<str>` implementations
///
/// # Example
///
/// ```rust
/// # use coachsite_core::define_id;
/// define_id!(PageId);
/// define_id!(ImageId);
///
/// let page = PageId::new("5KsDBWseXY6QegucYAoacS");
/// let image = ImageId::new("5KsDBWseXY6QegucYAoacS");
///
/// // These are different types, so this won't compile:
/// // let _: PageId = image;
/// # assert_eq!(page.as_str(), image.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the underlying string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the underlying string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(EntryId);
define_id!(AssetId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display_and_conversions() {
        let id = EntryId::from("abc");
        assert_eq!(id.to_string(), "abc");
        assert_eq!(id.as_str(), "abc");
        assert_eq!(String::from(id.clone()), "abc");
        assert_eq!(id, EntryId::new(String::from("abc")));
    }

    #[test]
    fn test_id_serde_is_transparent() {
        let id: AssetId = serde_json::from_str("\"img-1\"").unwrap();
        assert_eq!(id.as_str(), "img-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"img-1\"");
    }
}
