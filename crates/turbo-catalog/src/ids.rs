//! Identifiers handed out by the commerce API.
//!
//! The API uses opaque strings for everything; wrapping each kind keeps a
//! facet value id from being passed where a facet group id is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_ids {
    ($($(#[$doc:meta])* $name:ident;)+) => {
        $(
            $(#[$doc])*
            #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
            #[serde(transparent)]
            pub struct $name(String);

            impl $name {
                pub fn new(id: impl Into<String>) -> Self {
                    Self(id.into())
                }

                pub fn as_str(&self) -> &str {
                    &self.0
                }

                pub fn into_inner(self) -> String {
                    self.0
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
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
        )+
    };
}

string_ids! {
    /// A product, shared by all of its variants.
    ProductId;
    /// A purchasable variant of a product.
    VariantId;
    /// An image or other media asset.
    AssetId;
    /// A facet group such as "Brand" or "Color".
    FacetId;
    /// One value of a facet group, e.g. "Acme" in "Brand".
    FacetValueId;
    /// URL slug of a collection.
    CollectionSlug;
}
