//! # Catalog
//!
//! The catalog owns product records and is the sole authority on stock.
//! The ledger and the review queue only ever reference products by id;
//! nothing else in the system writes a stock level.
//!
//! ## Stock Discipline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Every stock movement goes through two functions:                   │
//! │                                                                     │
//! │    credit_stock(id, units)  - restock, approved returns             │
//! │    debit_stock(id, units)   - confirmed sales, approved swaps       │
//! │                                                                     │
//! │  debit_stock validates before mutating, so current_stock can        │
//! │  never go negative. Unit conversion happens before either call      │
//! │  via Product::units_for - quantities arrive here as base units.     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Product, ProductId, UnitKind};
use crate::validation;

// =============================================================================
// New Product Input
// =============================================================================

/// Fields required to register a product.
///
/// Initial stock is given the way it arrives at the shop: loose units plus
/// full boxes. The catalog converts to base units on creation.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub single_barcode: String,
    pub single_price: Money,
    pub bulk_barcode: String,
    pub bulk_price: Money,
    pub bulk_quantity: u32,
    pub initial_units: u32,
    pub initial_boxes: u32,
}

// =============================================================================
// Catalog
// =============================================================================

/// Product records plus the monotonic id counter.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    next_id: u64,
}

/// An empty catalog still starts its id counter at 1.
impl Default for Catalog {
    fn default() -> Self {
        Catalog::new()
    }
}

impl Catalog {
    /// Creates an empty catalog. Ids start at 1.
    pub fn new() -> Self {
        Catalog {
            products: Vec::new(),
            next_id: 1,
        }
    }

    /// Rebuilds a catalog from persisted parts.
    pub fn from_parts(products: Vec<Product>, next_id: u64) -> Self {
        Catalog { products, next_id }
    }

    /// The id the next product will receive.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// All products, in insertion order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Looks a product up by id.
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Looks a product up by id, failing with `ProductNotFound`.
    pub fn product(&self, id: ProductId) -> CoreResult<&Product> {
        self.get(id)
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))
    }

    /// Returns the product whose single or bulk barcode equals `code`.
    pub fn find_by_barcode(&self, code: &str) -> Option<&Product> {
        self.products
            .iter()
            .find(|p| p.single_barcode == code || p.bulk_barcode == code)
    }

    /// Like [`find_by_barcode`](Self::find_by_barcode), but also reports
    /// which barcode matched, deciding the unit kind of the scan.
    pub fn resolve_barcode(&self, code: &str) -> Option<(&Product, UnitKind)> {
        self.find_by_barcode(code).map(|p| {
            let unit = if p.bulk_barcode == code {
                UnitKind::Bulk
            } else {
                UnitKind::Single
            };
            (p, unit)
        })
    }

    fn product_mut(&mut self, id: ProductId) -> CoreResult<&mut Product> {
        self.products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Registers a new product.
    ///
    /// ## Errors
    /// - `Validation` for empty names/barcodes, negative prices, zero
    ///   units-per-pack
    /// - `DuplicateBarcode` if either barcode collides with any existing
    ///   single or bulk barcode, or the two new barcodes are equal
    pub fn add_product(&mut self, new: NewProduct) -> CoreResult<&Product> {
        validation::validate_product_name(&new.name)?;
        validation::validate_barcode(&new.single_barcode)?;
        validation::validate_barcode(&new.bulk_barcode)?;
        validation::validate_price(new.single_price)?;
        validation::validate_price(new.bulk_price)?;
        validation::validate_bulk_quantity(new.bulk_quantity)?;

        if new.single_barcode == new.bulk_barcode {
            return Err(CoreError::DuplicateBarcode {
                barcode: new.bulk_barcode,
            });
        }

        // All four cross combinations: own single/bulk against every
        // existing single/bulk.
        for existing in &self.products {
            for candidate in [&new.single_barcode, &new.bulk_barcode] {
                if existing.single_barcode == *candidate || existing.bulk_barcode == *candidate {
                    return Err(CoreError::DuplicateBarcode {
                        barcode: candidate.clone(),
                    });
                }
            }
        }

        let now = Utc::now();
        let product = Product {
            id: ProductId::new(self.next_id),
            name: new.name.trim().to_string(),
            single_barcode: new.single_barcode,
            bulk_barcode: new.bulk_barcode,
            single_price: new.single_price,
            bulk_price: new.bulk_price,
            bulk_quantity: new.bulk_quantity,
            current_stock: new.initial_units + new.initial_boxes * new.bulk_quantity,
            date_added: now,
            last_updated: now,
        };

        self.next_id += 1;
        self.products.push(product);
        Ok(self.products.last().expect("just pushed"))
    }

    /// Edits a product's display name and prices in place.
    ///
    /// Barcodes and units-per-pack are deliberately not editable; changing
    /// bulk packaging retroactively would corrupt recorded stock semantics.
    pub fn edit_product(
        &mut self,
        id: ProductId,
        name: &str,
        single_price: Money,
        bulk_price: Money,
    ) -> CoreResult<&Product> {
        validation::validate_product_name(name)?;
        validation::validate_price(single_price)?;
        validation::validate_price(bulk_price)?;

        let product = self.product_mut(id)?;
        product.name = name.trim().to_string();
        product.single_price = single_price;
        product.bulk_price = bulk_price;
        product.last_updated = Utc::now();
        Ok(product)
    }

    /// Removes a product and returns it.
    ///
    /// Historical sales are unaffected: they carry denormalized name and
    /// price snapshots. The caller (the Store) refuses deletion while
    /// pending review items still reference the product.
    pub fn delete_product(&mut self, id: ProductId) -> CoreResult<Product> {
        let index = self
            .products
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))?;
        Ok(self.products.remove(index))
    }

    /// Adds received stock: loose units plus full boxes.
    ///
    /// Returns the number of base units added.
    pub fn add_stock(&mut self, id: ProductId, units: u32, boxes: u32) -> CoreResult<u32> {
        let product = self.product_mut(id)?;
        let additional = units + boxes * product.bulk_quantity;
        product.current_stock += additional;
        product.last_updated = Utc::now();
        Ok(additional)
    }

    /// Credits base units back into stock (approved returns and swaps).
    pub fn credit_stock(&mut self, id: ProductId, units: u32) -> CoreResult<()> {
        let product = self.product_mut(id)?;
        product.current_stock += units;
        product.last_updated = Utc::now();
        Ok(())
    }

    /// Debits base units from stock, validating first.
    ///
    /// ## Errors
    /// `InsufficientStock` if the debit would drive the level negative;
    /// the stock level is left unchanged in that case.
    pub fn debit_stock(&mut self, id: ProductId, units: u32) -> CoreResult<()> {
        let product = self.product_mut(id)?;
        if units > product.current_stock {
            return Err(CoreError::short_stock(
                product.id,
                &product.name,
                product.current_stock,
                units,
            ));
        }
        product.current_stock -= units;
        product.last_updated = Utc::now();
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
