// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Product repository

use serde::Serialize;
use tracing::debug;

use crate::store::{or_fallback, ReleaseStore};
use crate::types::ProductSlug;

/// A product resolved against the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    /// Display name
    pub name: &'static str,
    /// Canonical slug
    pub slug: ProductSlug,
    /// Products.id; absent when the store has no row for this product
    pub id: Option<i64>,
    /// Products.product_text
    pub text: Option<String>,
    /// Sibling product family slug
    pub alt_product: &'static str,
}

impl Product {
    /// Resolve a product by slug.
    ///
    /// A missing row (or a failed lookup) leaves `id` and `text` absent.
    pub fn resolve<S: ReleaseStore + ?Sized>(store: &S, slug: ProductSlug) -> Self {
        let name = slug.display_name();
        let row = or_fallback(store.product_by_name(name), "Product lookup", None);
        if row.is_none() {
            debug!("No Products row for {:?}", name);
        }

        let (id, text) = row.map_or((None, None), |r| (Some(r.id), r.text));
        Self {
            name,
            slug,
            id,
            text,
            alt_product: slug.alt_product(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_resolve_known_product() {
        let store = MemoryStore::new().with_product(3, "Firefox for mobile", Some("Android"));
        let product = Product::resolve(&store, ProductSlug::Mobile);

        assert_eq!(product.name, "Firefox for mobile");
        assert_eq!(product.id, Some(3));
        assert_eq!(product.text.as_deref(), Some("Android"));
        assert_eq!(product.alt_product, "firefox");
    }

    #[test]
    fn test_resolve_missing_product_is_idless() {
        let product = Product::resolve(&MemoryStore::new(), ProductSlug::Esr);

        assert_eq!(product.name, "Firefox ESR");
        assert_eq!(product.id, None);
        assert_eq!(product.text, None);
        assert_eq!(product.alt_product, "");
    }

    #[test]
    fn test_resolve_survives_store_fault() {
        let product = Product::resolve(&MemoryStore::unreachable(), ProductSlug::Firefox);
        assert_eq!(product.id, None);
        assert_eq!(product.slug, ProductSlug::Firefox);
    }
}
