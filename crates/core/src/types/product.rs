//! Product catalog types.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Error returned when parsing a [`Category`] from a string.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown product category: {0}")]
pub struct ParseCategoryError(pub String);

/// Product category.
///
/// Categories are a closed set; the remote store and the bundled catalog
/// both serialize them in kebab case (e.g. `home-goods`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Apparel,
    Electronics,
    HomeGoods,
    Beauty,
    Shoes,
}

impl Category {
    /// Canonical kebab-case name, as stored and displayed.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Apparel => "apparel",
            Self::Electronics => "electronics",
            Self::HomeGoods => "home-goods",
            Self::Beauty => "beauty",
            Self::Shoes => "shoes",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ParseCategoryError;

    /// Case-insensitive parse. `home goods` is accepted as a spelling of
    /// `home-goods` since user-facing filters write it with a space.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "apparel" => Ok(Self::Apparel),
            "electronics" => Ok(Self::Electronics),
            "home-goods" | "home goods" => Ok(Self::HomeGoods),
            "beauty" => Ok(Self::Beauty),
            "shoes" => Ok(Self::Shoes),
            other => Err(ParseCategoryError(other.to_string())),
        }
    }
}

/// A product available for display and purchase.
///
/// Identity is the `id` once a product has been persisted to the remote
/// store. During catalog reconciliation, where local and remote copies of
/// the same product may carry different ids, identity is approximated by
/// the `(name, category)` pair instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Document id, or a synthetic `product-{n}` id for bundled entries.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: Decimal,
    /// Plain text description.
    pub description: String,
    /// Product category.
    pub category: Category,
    /// Image URL.
    pub image: String,
    /// Feature bullet points.
    #[serde(default)]
    pub features: Vec<String>,
    /// Average review rating, 0.0 to 5.0.
    #[serde(default)]
    pub rating: f64,
    /// Number of reviews behind the rating.
    #[serde(default)]
    pub reviews: i64,
    /// Whether the virtual try-on flow may be invoked for this product.
    #[serde(default)]
    pub try_on_available: bool,
    /// Seller account that listed this product, if seller-listed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller_id: Option<String>,
}

impl Product {
    /// Reconciliation identity: whether `other` is the same product by
    /// `(name, category)`.
    #[must_use]
    pub fn same_listing(&self, other: &Self) -> bool {
        self.name == other.name && self.category == other.category
    }
}
