//! Credit packs and the product catalog.
//!
//! Three products are sold. Each maps to a fixed number of credits through
//! [`CreditPack::credits`]; product ids that are not configured resolve to
//! [`CreditPack::Unknown`], which grants nothing.

use serde::{Deserialize, Serialize};

use crate::ProductId;

// ============================================================================
// Constants
// ============================================================================

/// Credits granted by the small pack.
pub const SMALL_PACK_CREDITS: u32 = 50;

/// Credits granted by the medium pack.
pub const MEDIUM_PACK_CREDITS: u32 = 200;

/// Credits granted by the large pack.
pub const LARGE_PACK_CREDITS: u32 = 400;

/// A purchasable credit pack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditPack {
    /// Small pack: 50 credits.
    Small,

    /// Medium pack: 200 credits.
    Medium,

    /// Large pack: 400 credits.
    Large,

    /// A product id this service does not sell. Grants 0 credits.
    Unknown,
}

impl CreditPack {
    /// All packs that can be bought through checkout.
    pub const PURCHASABLE: [Self; 3] = [Self::Small, Self::Medium, Self::Large];

    /// Number of credits this pack grants.
    #[must_use]
    pub const fn credits(&self) -> u32 {
        match self {
            Self::Small => SMALL_PACK_CREDITS,
            Self::Medium => MEDIUM_PACK_CREDITS,
            Self::Large => LARGE_PACK_CREDITS,
            Self::Unknown => 0,
        }
    }

    /// Checkout slug for this pack.
    #[must_use]
    pub const fn slug(&self) -> Option<&'static str> {
        match self {
            Self::Small => Some("small"),
            Self::Medium => Some("medium"),
            Self::Large => Some("large"),
            Self::Unknown => None,
        }
    }

    /// Look up a pack by its checkout slug.
    #[must_use]
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::PURCHASABLE
            .into_iter()
            .find(|pack| pack.slug() == Some(slug))
    }

    /// Whether this is a pack the catalog knows about.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

/// Maps configured Polar product ids to credit packs.
///
/// A pack whose product id is not configured can neither be bought nor matched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductCatalog {
    small: Option<ProductId>,
    medium: Option<ProductId>,
    large: Option<ProductId>,
}

impl ProductCatalog {
    /// Create a catalog from the three product ids.
    #[must_use]
    pub fn new(
        small: Option<ProductId>,
        medium: Option<ProductId>,
        large: Option<ProductId>,
    ) -> Self {
        Self {
            small,
            medium,
            large,
        }
    }

    /// The product id configured for a pack.
    #[must_use]
    pub fn product_id(&self, pack: CreditPack) -> Option<&ProductId> {
        match pack {
            CreditPack::Small => self.small.as_ref(),
            CreditPack::Medium => self.medium.as_ref(),
            CreditPack::Large => self.large.as_ref(),
            CreditPack::Unknown => None,
        }
    }

    /// Resolve a product id to its pack. Never fails.
    #[must_use]
    pub fn resolve(&self, product_id: &str) -> CreditPack {
        CreditPack::PURCHASABLE
            .into_iter()
            .find(|pack| {
                self.product_id(*pack)
                    .is_some_and(|id| id.as_str() == product_id)
            })
            .unwrap_or(CreditPack::Unknown)
    }

    /// Iterate over the configured `(pack, product id)` pairs.
    pub fn products(&self) -> impl Iterator<Item = (CreditPack, &ProductId)> + '_ {
        CreditPack::PURCHASABLE
            .into_iter()
            .filter_map(|pack| self.product_id(pack).map(|id| (pack, id)))
    }

    /// Whether no product ids are configured at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products().next().is_none()
    }
}
