use serde::{Deserialize, Serialize};
use super::{validate_price, Money, ProductId};

/// A sellable item in the pharmacy catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub stock: u32,
    pub unit: String,
    pub purchase_price: Money,
    pub selling_price: Money,
}

/// Payload for adding a product to the catalog.
#[derive(Debug, Clone)]
pub struct ProductCreate {
    pub name: String,
    pub stock: u32,
    pub unit: String,
    pub purchase_price: Money,
    pub selling_price: Money,
}

/// Editable product fields. Stock is absent: only sales move it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub unit: Option<String>,
    pub purchase_price: Option<Money>,
    pub selling_price: Option<Money>,
}

impl Product {
    pub fn from_create(id: ProductId, params: ProductCreate) -> Result<Self, String> {
        let product = Self {
            id,
            name: params.name,
            stock: params.stock,
            unit: params.unit,
            purchase_price: params.purchase_price,
            selling_price: params.selling_price,
        };
        product.validate()?;
        Ok(product)
    }

    /// Applies `update` to a copy and returns it if the result is valid.
    pub fn updated(&self, update: ProductUpdate) -> Result<Self, String> {
        let mut next = self.clone();
        if let Some(name) = update.name {
            next.name = name;
        }
        if let Some(unit) = update.unit {
            next.unit = unit;
        }
        if let Some(price) = update.purchase_price {
            next.purchase_price = price;
        }
        if let Some(price) = update.selling_price {
            next.selling_price = price;
        }
        next.validate()?;
        Ok(next)
    }

    pub fn validate(&self) -> Result<(), String> {
        super::require_text("Product name", &self.name, Some(255))?;
        super::require_text("Unit type", &self.unit, Some(50))?;
        validate_price("Purchase price", self.purchase_price)?;
        validate_price("Selling price", self.selling_price)?;
        Ok(())
    }

    pub fn is_available(&self) -> bool {
        self.stock > 0
    }

    pub fn has_low_stock(&self, threshold: u32) -> bool {
        self.stock < threshold
    }
}
