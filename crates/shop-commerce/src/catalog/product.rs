//! Product types.

use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::{self, Money};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// A product in the catalog.
///
/// Owned by the catalog service; the storefront only reads it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Unit price, sent as a decimal number.
    #[serde(with = "money::decimal")]
    pub price: Money,
    /// Units in stock. Never negative on the wire.
    #[serde(default, deserialize_with = "non_negative_stock")]
    pub stock: i64,
}

fn non_negative_stock<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let stock = i64::deserialize(deserializer)?;
    if stock < 0 {
        return Err(D::Error::custom("stock must be a non-negative integer"));
    }
    Ok(stock)
}

impl Product {
    /// Create a product record.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Money, stock: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            price,
            stock,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Whether the catalog reports any stock at all.
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// Partial update for a product, sent as `PATCH /api/products/:id`.
///
/// Only the fields that are set are serialized.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
}

impl ProductPatch {
    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.stock.is_none()
    }

    /// Reject patches the catalog service would store as nonsense.
    pub fn validate(&self) -> Result<(), CommerceError> {
        if self.is_empty() {
            return Err(CommerceError::ValidationError(
                "patch must change at least one field".to_string(),
            ));
        }
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(CommerceError::ValidationError("name must not be blank".to_string()));
            }
        }
        if let Some(price) = self.price {
            if !price.is_finite() || price < 0.0 {
                return Err(CommerceError::ValidationError(format!(
                    "price must be a non-negative number, got {}",
                    price
                )));
            }
        }
        if let Some(stock) = self.stock {
            if stock < 0 {
                return Err(CommerceError::ValidationError(format!(
                    "stock must not be negative, got {}",
                    stock
                )));
            }
        }
        Ok(())
    }

    /// Apply the patch to a local copy of the product.
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(description) = &self.description {
            product.description = description.clone();
        }
        if let Some(price) = self.price {
            product.price = Money::from_decimal(price);
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
    }
}

/// The product list fetched for one page view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Wrap a product list.
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Look up a product by ID.
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Look up a product by ID, failing with `ProductNotFound`.
    pub fn require(&self, id: &ProductId) -> Result<&Product, CommerceError> {
        self.get(id)
            .ok_or_else(|| CommerceError::ProductNotFound(id.to_string()))
    }

    /// Iterate in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Consume into the product list.
    pub fn into_products(self) -> Vec<Product> {
        self.products
    }
}

impl From<Vec<Product>> for Catalog {
    fn from(products: Vec<Product>) -> Self {
        Self::new(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_wire_format() {
        let json = r#"{"id":"p1","name":"Mug","description":"Ceramic","price":12.99,"stock":3}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new("p1"));
        assert_eq!(product.price, Money::new(1299));
        assert_eq!(product.stock, 3);

        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["price"], 12.99);
    }

    #[test]
    fn test_product_missing_optional_fields() {
        let product: Product = serde_json::from_str(r#"{"id":"p2","name":"Pen","price":1}"#).unwrap();
        assert_eq!(product.stock, 0);
        assert!(product.description.is_empty());
        assert!(!product.in_stock());
    }

    #[test]
    fn test_product_rejects_negative_stock() {
        let json = r#"{"id":"p3","name":"Cup","price":2,"stock":-9223372036854775808}"#;
        assert!(serde_json::from_str::<Product>(json).is_err());
        let json = r#"{"id":"p3","name":"Cup","price":2,"stock":-1}"#;
        assert!(serde_json::from_str::<Product>(json).is_err());
    }

    #[test]
    fn test_patch_serializes_only_set_fields() {
        let patch = ProductPatch {
            stock: Some(7),
            ..Default::default()
        };
        assert_eq!(serde_json::to_string(&patch).unwrap(), r#"{"stock":7}"#);
    }

    #[test]
    fn test_patch_validation() {
        assert!(ProductPatch::default().validate().is_err());
        assert!(ProductPatch {
            price: Some(-1.0),
            ..Default::default()
        }
        .validate()
        .is_err());
        assert!(ProductPatch {
            name: Some("  ".into()),
            ..Default::default()
        }
        .validate()
        .is_err());
        assert!(ProductPatch {
            price: Some(4.5),
            stock: Some(0),
            ..Default::default()
        }
        .validate()
        .is_ok());
    }

    #[test]
    fn test_patch_apply() {
        let mut product = Product::new("p1", "Mug", Money::new(1000), 2);
        ProductPatch {
            name: Some("Big Mug".into()),
            price: Some(12.5),
            ..Default::default()
        }
        .apply_to(&mut product);
        assert_eq!(product.name, "Big Mug");
        assert_eq!(product.price.amount_cents, 1250);
        assert_eq!(product.stock, 2);
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = Catalog::new(vec![
            Product::new("p1", "Mug", Money::new(1000), 2),
            Product::new("p2", "Pen", Money::new(150), 0),
        ]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(&ProductId::new("p2")).unwrap().name, "Pen");
        assert!(matches!(
            catalog.require(&ProductId::new("p9")),
            Err(CommerceError::ProductNotFound(_))
        ));
    }
}
