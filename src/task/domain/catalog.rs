//! Static catalog mapping reference types to their applicable task kinds.
//!
//! Each task kind belongs to exactly one reference type. The catalog is
//! the single source of that knowledge; call sites query it instead of
//! hard-coding kind lists.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type of business object a task can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceType {
    /// A customer order.
    Order,
    /// A business entity, such as a customer account.
    Entity,
}

impl ReferenceType {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Order => "order",
            Self::Entity => "entity",
        }
    }

    /// Returns every task kind a reference of this type must have.
    #[must_use]
    pub const fn applicable_kinds(self) -> &'static [TaskKind] {
        match self {
            Self::Order => &[
                TaskKind::CreateInvoice,
                TaskKind::ArrangePickup,
                TaskKind::CollectPayment,
            ],
            Self::Entity => &[TaskKind::AssignCustomerToSalesPerson],
        }
    }
}

impl fmt::Display for ReferenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Semantic category of work a task represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Issue the invoice for an order.
    CreateInvoice,
    /// Arrange pickup of the goods for an order.
    ArrangePickup,
    /// Collect payment for an order.
    CollectPayment,
    /// Assign a customer entity to a sales person.
    AssignCustomerToSalesPerson,
}

impl TaskKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreateInvoice => "create_invoice",
            Self::ArrangePickup => "arrange_pickup",
            Self::CollectPayment => "collect_payment",
            Self::AssignCustomerToSalesPerson => "assign_customer_to_sales_person",
        }
    }

    /// Returns the single reference type this kind belongs to.
    #[must_use]
    pub const fn reference_type(self) -> ReferenceType {
        match self {
            Self::CreateInvoice | Self::ArrangePickup | Self::CollectPayment => {
                ReferenceType::Order
            }
            Self::AssignCustomerToSalesPerson => ReferenceType::Entity,
        }
    }

    /// Returns whether this kind is valid for the given reference type.
    #[must_use]
    pub const fn is_applicable_to(self, reference_type: ReferenceType) -> bool {
        matches!(
            (self.reference_type(), reference_type),
            (ReferenceType::Order, ReferenceType::Order)
                | (ReferenceType::Entity, ReferenceType::Entity)
        )
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
