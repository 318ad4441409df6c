//! Catalog DTOs.
//!
//! # Design
//! These mirror the remote API's JSON. Product fields are snake_case while
//! the paging envelope is camelCase, matching the live service. The
//! mock-server crate defines its own copies; the end-to-end test catches
//! drift between the two.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Currency {
    #[serde(rename = "KRW")]
    Krw,
    #[serde(rename = "USD")]
    Usd,
}

/// A product as it appears in list pages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: u64,
    pub vendor_id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub thumbnail: String,
    pub currency: Currency,
    pub price: f64,
    pub bargain_price: f64,
    pub discounted_price: f64,
    pub stock: u64,
    pub created_at: String,
    pub issued_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductImage {
    pub id: u64,
    pub url: String,
    pub thumbnail_url: String,
    pub issued_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Vendor {
    pub id: u64,
    pub name: String,
}

/// A single product with its images and vendor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    #[serde(default)]
    pub vendors: Option<Vendor>,
}

/// One page of the product list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub page_no: u32,
    pub items_per_page: u32,
    pub total_count: u64,
    pub offset: u64,
    pub limit: u64,
    pub last_page: u32,
    pub has_next: bool,
    pub has_prev: bool,
    pub pages: Vec<Product>,
}

/// `params` part of a product registration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub currency: Currency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discounted_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u64>,
    /// Vendor password.
    pub secret: String,
}

/// Partial update. Omitted fields are left unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discounted_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u64>,
    pub secret: String,
}

/// Body of the product-secret lookup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SecretRequest {
    pub secret: String,
}

/// An image attached to a registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}
