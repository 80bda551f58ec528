//! Product domain model.
//!
//! The remote API serves two representations of the same entity: the detail
//! endpoint returns tags as a sequence (`Product`), the list endpoint as a
//! single comma-separated string (`ProductListing`). Conversions between the
//! two go through [`super::tags`].

use serde::{Deserialize, Serialize};

use super::tags;
use crate::error::{Result, ShelfError};

/// Maximum accepted length of a product name.
pub const NAME_MAX_LEN: usize = 255;
/// Maximum accepted length of a product description.
pub const DESCRIPTION_MAX_LEN: usize = 2000;

/// A product as returned by the detail endpoint.
///
/// `id`, `created_at` and `updated_at` are server-assigned and immutable on
/// the client; timestamps are kept as the RFC 3339 strings the server sends.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Product {
    /// Unique identifier (opaque, server-assigned)
    pub id: String,
    /// Display name
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Ordered tags, duplicates suppressed on insert
    #[serde(default)]
    pub tags: Vec<String>,
    /// Unit price, positive
    pub price: f64,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

/// A product as returned by the list endpoint.
///
/// Identical to [`Product`] except that `tags` is the server's serialized
/// comma-separated form.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ProductListing {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Comma-separated tag string
    #[serde(default)]
    pub tags: String,
    pub price: f64,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

/// Client-constructed payload for creating a product.
///
/// The server assigns `id` and the timestamps.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct CreateProductData {
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub price: f64,
}

/// Payload for updating a product. Same shape as [`CreateProductData`].
pub type UpdateProductData = CreateProductData;

impl Product {
    /// Builds the write payload for this product.
    ///
    /// Tags pass through unchanged as a sequence; name and description are
    /// trimmed the way the edit form submits them.
    pub fn to_payload(&self) -> CreateProductData {
        CreateProductData {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            tags: self.tags.clone(),
            price: self.price,
        }
    }

    /// Adds a tag, suppressing duplicates.
    ///
    /// Returns `true` if the tag was inserted, `false` if it was empty after
    /// trimming or already present.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.tags.iter().any(|existing| existing == tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    /// Removes a tag by value.
    pub fn remove_tag(&mut self, tag: &str) {
        self.tags.retain(|existing| existing != tag);
    }
}

impl ProductListing {
    /// Converts the listing into the editable detail representation.
    ///
    /// The serialized tag string is split, trimmed and deduplicated by the
    /// normalizer; every other field carries over unchanged.
    pub fn into_editable(self) -> Product {
        Product {
            id: self.id,
            name: self.name,
            description: self.description,
            tags: tags::split_tags(&self.tags),
            price: self.price,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Case-insensitive search over name, description and the tag string.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term)
            || self.description.to_lowercase().contains(&term)
            || self.tags.to_lowercase().contains(&term)
    }
}

impl CreateProductData {
    /// Validates the payload before it reaches the network layer.
    ///
    /// Checks the same rules the product form enforces: non-empty name up to
    /// 255 characters, non-empty description up to 2000 characters, and a
    /// positive finite price. Returns a single [`ShelfError::Validation`] for
    /// one failing field or [`ShelfError::Multiple`] for several.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push(ShelfError::validation("name", "Product name is required"));
        } else if self.name.chars().count() > NAME_MAX_LEN {
            errors.push(ShelfError::validation(
                "name",
                format!("Product name must be less than {NAME_MAX_LEN} characters"),
            ));
        }

        if self.description.trim().is_empty() {
            errors.push(ShelfError::validation(
                "description",
                "Product description is required",
            ));
        } else if self.description.chars().count() > DESCRIPTION_MAX_LEN {
            errors.push(ShelfError::validation(
                "description",
                format!("Product description must be less than {DESCRIPTION_MAX_LEN} characters"),
            ));
        }

        if !self.price.is_finite() || self.price <= 0.0 {
            errors.push(ShelfError::validation(
                "price",
                "Product price must be a positive number",
            ));
        }

        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(ShelfError::Multiple(errors)),
        }
    }
}
