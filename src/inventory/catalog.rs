//! Live product inventory and the narrow read/write contracts over it.

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use crate::actor_framework::id_order;
use crate::domain::{Product, ProductCreate, ProductId};
use super::CatalogError;

/// Read side of the catalog.
pub trait CatalogView {
    /// Current snapshot of a product. Never mutates.
    fn product(&self, id: &str) -> Result<Product, CatalogError>;
}

/// Stock mutation. Implementors must never let stock go below zero.
pub trait StockWriter: CatalogView {
    /// Reduces stock by `amount` if at least that much remains, otherwise changes nothing.
    fn decrement_stock(&mut self, id: &str, amount: u32) -> Result<(), CatalogError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    products: BTreeMap<ProductId, Product>,
    next_seq: u64,
}

impl Default for Catalog {
    fn default() -> Self {
        Self { products: BTreeMap::new(), next_seq: 1 }
    }
}

impl Catalog {
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.get(id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Validates `params` and stores a product under the next `product_N` id.
    pub(crate) fn insert_new(&mut self, params: ProductCreate) -> Result<Product, CatalogError> {
        let id = format!("product_{}", self.next_seq);
        let product = Product::from_create(id.clone(), params).map_err(CatalogError::ValidationError)?;
        self.next_seq += 1;
        self.products.insert(id, product.clone());
        Ok(product)
    }

    pub(crate) fn replace(&mut self, product: Product) {
        self.products.insert(product.id.clone(), product);
    }

    pub(crate) fn remove(&mut self, id: &str) -> Option<Product> {
        self.products.remove(id)
    }

    pub(crate) fn set_stock(&mut self, id: &str, stock: u32) {
        if let Some(product) = self.products.get_mut(id) {
            product.stock = stock;
        }
    }

    /// All products ordered by name.
    pub fn list_all(&self) -> Vec<Product> {
        self.sorted_by_name(|_| true)
    }

    /// Products with stock left, ordered by name.
    pub fn list_available(&self) -> Vec<Product> {
        self.sorted_by_name(Product::is_available)
    }

    /// Products whose stock is below `threshold`, ordered by name.
    pub fn list_low_stock(&self, threshold: u32) -> Vec<Product> {
        self.sorted_by_name(|product| product.has_low_stock(threshold))
    }

    fn sorted_by_name(&self, keep: impl Fn(&Product) -> bool) -> Vec<Product> {
        let mut products: Vec<Product> = self.products.values().filter(|p| keep(*p)).cloned().collect();
        products.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| id_order(&a.id, &b.id)));
        products
    }
}

impl CatalogView for Catalog {
    fn product(&self, id: &str) -> Result<Product, CatalogError> {
        self.products
            .get(id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }
}

impl StockWriter for Catalog {
    fn decrement_stock(&mut self, id: &str, amount: u32) -> Result<(), CatalogError> {
        let product = self
            .products
            .get_mut(id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;
        if product.stock < amount {
            return Err(CatalogError::InsufficientStock {
                product_id: id.to_string(),
                requested: amount,
                available: product.stock,
            });
        }
        product.stock -= amount;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rust_decimal::Decimal;

    pub(crate) fn product_params(name: &str, stock: u32, price: i64) -> ProductCreate {
        ProductCreate {
            name: name.to_string(),
            stock,
            unit: "tablet".to_string(),
            purchase_price: Decimal::new(price / 2, 0),
            selling_price: Decimal::new(price, 0),
        }
    }

    fn catalog() -> Catalog {
        let mut catalog = Catalog::default();
        catalog.insert_new(product_params("Paracetamol", 100, 1000)).unwrap();
        catalog.insert_new(product_params("Vitamin C", 5, 3500)).unwrap();
        catalog.insert_new(product_params("Antiseptic", 0, 15000)).unwrap();
        catalog
    }

    #[test]
    fn ids_are_sequential() {
        let catalog = catalog();
        assert_eq!(catalog.get("product_1").unwrap().name, "Paracetamol");
        assert_eq!(catalog.get("product_3").unwrap().name, "Antiseptic");
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn repeated_reads_are_identical() {
        let catalog = catalog();
        let first = catalog.product("product_1").unwrap();
        let second = catalog.product("product_1").unwrap();
        assert_eq!(first, second);
        assert_eq!(catalog.product("product_9"), Err(CatalogError::NotFound("product_9".into())));
    }

    #[test]
    fn decrement_stock_refuses_to_go_negative() {
        let mut catalog = catalog();
        catalog.decrement_stock("product_2", 3).unwrap();
        assert_eq!(catalog.get("product_2").unwrap().stock, 2);

        let err = catalog.decrement_stock("product_2", 3).unwrap_err();
        assert_eq!(
            err,
            CatalogError::InsufficientStock { product_id: "product_2".into(), requested: 3, available: 2 }
        );
        assert_eq!(catalog.get("product_2").unwrap().stock, 2);
    }

    #[test]
    fn listings_filter_and_sort_by_name() {
        let catalog = catalog();
        let available: Vec<String> = catalog.list_available().into_iter().map(|p| p.name).collect();
        assert_eq!(available, vec!["Paracetamol", "Vitamin C"]);

        let low: Vec<String> = catalog.list_low_stock(10).into_iter().map(|p| p.name).collect();
        assert_eq!(low, vec!["Antiseptic", "Vitamin C"]);
    }

    #[test]
    fn same_name_products_list_in_creation_order() {
        let mut catalog = Catalog::default();
        for _ in 0..8 {
            catalog.insert_new(product_params("Bandage", 10, 100)).unwrap();
        }
        catalog.insert_new(product_params("Saline", 10, 100)).unwrap();
        catalog.insert_new(product_params("Saline", 10, 100)).unwrap();

        let saline: Vec<String> = catalog
            .list_all()
            .into_iter()
            .filter(|p| p.name == "Saline")
            .map(|p| p.id)
            .collect();
        assert_eq!(saline, vec!["product_9", "product_10"]);
    }

    #[test]
    fn invalid_product_does_not_consume_an_id() {
        let mut catalog = Catalog::default();
        let mut bad = product_params("", 1, 100);
        bad.name.clear();
        assert!(matches!(catalog.insert_new(bad), Err(CatalogError::ValidationError(_))));
        let ok = catalog.insert_new(product_params("Bandage", 1, 100)).unwrap();
        assert_eq!(ok.id, "product_1");
    }
}
