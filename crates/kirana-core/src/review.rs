//! # Review Queue
//!
//! Pending returns and replacements awaiting approval.
//!
//! A return or replacement is a *proposal*, not an immediate reversal:
//! initiating one touches neither stock nor cash, so a fraudulent or
//! mistaken request can be rejected without the books ever having moved.
//! Only approval (in [`crate::store::Store`]) mutates the catalog and the
//! ledger.
//!
//! ## Item Lifecycle
//! ```text
//!              ┌──────────► Approved { by, at }   (terminal)
//!   Pending ───┤
//!              └──────────► Rejected { by, at }   (terminal)
//! ```
//! Resolution is one-way; there is no re-opening.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{ProductId, UnitKind};

// =============================================================================
// Review Status
// =============================================================================

/// Where a review item stands. Resolution metadata lives inside the
/// terminal variants, so an approved item without an approver cannot be
/// represented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReviewStatus {
    Pending,
    Approved {
        by: String,
        #[ts(as = "String")]
        at: DateTime<Utc>,
    },
    Rejected {
        by: String,
        #[ts(as = "String")]
        at: DateTime<Utc>,
    },
}

impl ReviewStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, ReviewStatus::Pending)
    }

    /// Short status name for error messages.
    pub fn name(&self) -> &'static str {
        match self {
            ReviewStatus::Pending => "pending",
            ReviewStatus::Approved { .. } => "approved",
            ReviewStatus::Rejected { .. } => "rejected",
        }
    }
}

// =============================================================================
// Review Kind
// =============================================================================

/// What the request proposes. Each variant carries exactly the fields that
/// kind of request needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReviewKind {
    /// Give goods back, take money out of the drawer.
    Return {
        product: ProductId,
        /// Name snapshot for display if the product is later deleted.
        product_name: String,
        barcode: String,
        unit: UnitKind,
        quantity: u32,
        /// Frozen at initiation from the then-current price.
        refund: Money,
        reason: String,
    },

    /// Swap one product for another, settling the price difference.
    Replacement {
        old_product: ProductId,
        old_name: String,
        old_barcode: String,
        old_unit: UnitKind,
        new_product: ProductId,
        new_name: String,
        new_barcode: String,
        new_unit: UnitKind,
        quantity: u32,
        /// `new line total - old line total`, frozen at initiation.
        price_difference: Money,
    },
}

impl ReviewKind {
    /// Product ids this request references (one for returns, two for
    /// replacements). Used to gate product deletion.
    pub fn referenced_products(&self) -> Vec<ProductId> {
        match self {
            ReviewKind::Return { product, .. } => vec![*product],
            ReviewKind::Replacement {
                old_product,
                new_product,
                ..
            } => vec![*old_product, *new_product],
        }
    }

    pub fn is_return(&self) -> bool {
        matches!(self, ReviewKind::Return { .. })
    }
}

// =============================================================================
// Review Item
// =============================================================================

/// A pending (or resolved) return/replacement request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReviewItem {
    pub id: String,
    pub kind: ReviewKind,
    pub status: ReviewStatus,
    /// Who initiated the request.
    pub cashier: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Review Queue
// =============================================================================

/// The pending-review queue. Pure bookkeeping; approval side effects live
/// in the Store, which owns the catalog and ledger this queue must touch.
#[derive(Debug, Clone, Default)]
pub struct ReviewQueue {
    items: Vec<ReviewItem>,
}

impl ReviewQueue {
    pub fn new() -> Self {
        ReviewQueue { items: Vec::new() }
    }

    /// Rebuilds a queue from persisted parts.
    pub fn from_parts(items: Vec<ReviewItem>) -> Self {
        ReviewQueue { items }
    }

    /// All items, oldest first.
    pub fn items(&self) -> &[ReviewItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ReviewItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Count of pending items (the review badge).
    pub fn pending_count(&self) -> usize {
        self.items.iter().filter(|i| i.status.is_pending()).count()
    }

    /// Count of pending returns only (the returns badge).
    pub fn pending_return_count(&self) -> usize {
        self.items
            .iter()
            .filter(|i| i.status.is_pending() && i.kind.is_return())
            .count()
    }

    /// Whether any pending item references the given product.
    pub fn has_pending_for(&self, product: ProductId) -> bool {
        self.items.iter().any(|item| {
            item.status.is_pending() && item.kind.referenced_products().contains(&product)
        })
    }

    /// Enqueues a new pending item.
    pub fn push(&mut self, item: ReviewItem) -> &ReviewItem {
        self.items.push(item);
        self.items.last().expect("just pushed")
    }

    /// Looks up a pending item, failing if it is missing or already
    /// resolved. Used by approve/reject before they commit anything.
    pub fn pending(&self, id: &str) -> CoreResult<&ReviewItem> {
        let item = self
            .get(id)
            .ok_or_else(|| CoreError::ReviewNotFound(id.to_string()))?;
        if !item.status.is_pending() {
            return Err(CoreError::AlreadyResolved {
                id: id.to_string(),
                status: item.status.name(),
            });
        }
        Ok(item)
    }

    /// Moves a pending item to a terminal status.
    ///
    /// The same missing/resolved checks as [`pending`](Self::pending)
    /// apply, so a double approval cannot slip through between lookup and
    /// resolution.
    pub fn resolve(&mut self, id: &str, status: ReviewStatus) -> CoreResult<&ReviewItem> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| CoreError::ReviewNotFound(id.to_string()))?;
        if !item.status.is_pending() {
            return Err(CoreError::AlreadyResolved {
                id: id.to_string(),
                status: item.status.name(),
            });
        }
        item.status = status;
        Ok(item)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn return_item(id: &str, product: u64) -> ReviewItem {
        ReviewItem {
            id: id.to_string(),
            kind: ReviewKind::Return {
                product: ProductId::new(product),
                product_name: "Blue Pen".to_string(),
                barcode: "1001".to_string(),
                unit: UnitKind::Single,
                quantity: 2,
                refund: Money::from_paise(1000),
                reason: "defective".to_string(),
            },
            status: ReviewStatus::Pending,
            cashier: "Shopkeeper".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_pending_counts() {
        let mut queue = ReviewQueue::new();
        queue.push(return_item("r1", 1));
        queue.push(return_item("r2", 2));

        assert_eq!(queue.pending_count(), 2);
        assert_eq!(queue.pending_return_count(), 2);

        queue
            .resolve(
                "r1",
                ReviewStatus::Rejected {
                    by: "Owner".to_string(),
                    at: Utc::now(),
                },
            )
            .unwrap();
        assert_eq!(queue.pending_count(), 1);
    }

    #[test]
    fn test_resolution_is_terminal() {
        let mut queue = ReviewQueue::new();
        queue.push(return_item("r1", 1));

        queue
            .resolve(
                "r1",
                ReviewStatus::Approved {
                    by: "Owner".to_string(),
                    at: Utc::now(),
                },
            )
            .unwrap();

        let err = queue
            .resolve(
                "r1",
                ReviewStatus::Rejected {
                    by: "Owner".to_string(),
                    at: Utc::now(),
                },
            )
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::AlreadyResolved {
                status: "approved",
                ..
            }
        ));
    }

    #[test]
    fn test_missing_item() {
        let mut queue = ReviewQueue::new();
        assert!(matches!(
            queue.pending("nope"),
            Err(CoreError::ReviewNotFound(_))
        ));
        assert!(matches!(
            queue.resolve("nope", ReviewStatus::Pending),
            Err(CoreError::ReviewNotFound(_))
        ));
    }

    #[test]
    fn test_has_pending_for_covers_both_replacement_products() {
        let mut queue = ReviewQueue::new();
        queue.push(ReviewItem {
            id: "rep1".to_string(),
            kind: ReviewKind::Replacement {
                old_product: ProductId::new(1),
                old_name: "Blue Pen".to_string(),
                old_barcode: "1001".to_string(),
                old_unit: UnitKind::Single,
                new_product: ProductId::new(2),
                new_name: "Black Pen".to_string(),
                new_barcode: "1002".to_string(),
                new_unit: UnitKind::Single,
                quantity: 1,
                price_difference: Money::zero(),
            },
            status: ReviewStatus::Pending,
            cashier: "Shopkeeper".to_string(),
            created_at: Utc::now(),
        });

        assert!(queue.has_pending_for(ProductId::new(1)));
        assert!(queue.has_pending_for(ProductId::new(2)));
        assert!(!queue.has_pending_for(ProductId::new(3)));
    }
}
