//! Fulfillment state machine
//!
//! One guard table keyed by (from, to, role, order type), a single source
//! of truth for who may move an order where and what side effects the move
//! carries (claim acquisition, claimant check, bulk item advance). The
//! aggregate status itself is a derived roll-up of line-item statuses;
//! explicit actor-driven states are sticky so item statuses can diverge
//! (a table orders dessert after mains were delivered).

use crate::error::FulfillmentError;
use shared::models::{PaymentMethod, Role};
use shared::order::{ClaimField, ItemStatus, LineItem, OrderSnapshot, OrderStatus, OrderType};

/// Side effects a granted transition carries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionEffects {
    /// Claim to acquire (first actor wins)
    pub claim: Option<ClaimField>,
    /// Claim that must already be held by the actor
    pub must_hold: Option<ClaimField>,
    /// Bulk-advance items lagging behind this status
    pub item_advance: Option<ItemStatus>,
}

fn graph_allows(from: OrderStatus, to: OrderStatus, order_type: OrderType) -> bool {
    match (from, to) {
        (OrderStatus::Pending, OrderStatus::InPreparation) => true,
        (OrderStatus::InPreparation, OrderStatus::Ready) => true,
        (OrderStatus::Ready, OrderStatus::OnTheWay) => order_type == OrderType::Delivery,
        (OrderStatus::Ready, OrderStatus::Delivered) => order_type != OrderType::Delivery,
        (OrderStatus::OnTheWay, OrderStatus::Delivered) => order_type == OrderType::Delivery,
        (OrderStatus::Delivered, OrderStatus::Paid) => true,
        (OrderStatus::Pending, OrderStatus::Cancelled) => true,
        _ => false,
    }
}

/// Authorize an order-level transition for the acting role
///
/// `InvalidTransition` when the pair is not in the state graph at all;
/// `NotPermitted` when the pair is valid but not for this role.
pub fn authorize_transition(
    from: OrderStatus,
    to: OrderStatus,
    role: Role,
    order_type: OrderType,
) -> Result<TransitionEffects, FulfillmentError> {
    if !graph_allows(from, to, order_type) {
        return Err(FulfillmentError::InvalidTransition { from, to });
    }
    let supervisor = role.is_supervisor();

    match (from, to) {
        (OrderStatus::Pending, OrderStatus::InPreparation) => {
            if role == Role::Chef || supervisor {
                Ok(TransitionEffects {
                    claim: Some(ClaimField::PreparedBy),
                    must_hold: None,
                    item_advance: Some(ItemStatus::InPreparation),
                })
            } else {
                Err(FulfillmentError::NotPermitted {
                    role,
                    action: "start preparing orders".to_string(),
                })
            }
        }
        (OrderStatus::InPreparation, OrderStatus::Ready) => {
            if role == Role::Chef {
                Ok(TransitionEffects {
                    claim: None,
                    must_hold: Some(ClaimField::PreparedBy),
                    item_advance: Some(ItemStatus::Ready),
                })
            } else if supervisor {
                Ok(TransitionEffects {
                    claim: None,
                    must_hold: None,
                    item_advance: Some(ItemStatus::Ready),
                })
            } else {
                Err(FulfillmentError::NotPermitted {
                    role,
                    action: "mark orders ready".to_string(),
                })
            }
        }
        (OrderStatus::Ready, OrderStatus::Delivered) => {
            if matches!(role, Role::Waiter | Role::Cashier) || supervisor {
                Ok(TransitionEffects {
                    claim: Some(ClaimField::DeliveredBy),
                    must_hold: None,
                    item_advance: Some(ItemStatus::Delivered),
                })
            } else {
                Err(FulfillmentError::NotPermitted {
                    role,
                    action: "hand over orders".to_string(),
                })
            }
        }
        (OrderStatus::Ready, OrderStatus::OnTheWay) => {
            if role == Role::Courier || supervisor {
                Ok(TransitionEffects {
                    claim: Some(ClaimField::DeliveredBy),
                    must_hold: None,
                    item_advance: None,
                })
            } else {
                Err(FulfillmentError::NotPermitted {
                    role,
                    action: "take orders out for delivery".to_string(),
                })
            }
        }
        (OrderStatus::OnTheWay, OrderStatus::Delivered) => {
            if role == Role::Courier {
                Ok(TransitionEffects {
                    claim: None,
                    must_hold: Some(ClaimField::DeliveredBy),
                    item_advance: Some(ItemStatus::Delivered),
                })
            } else if supervisor {
                Ok(TransitionEffects {
                    claim: None,
                    must_hold: None,
                    item_advance: Some(ItemStatus::Delivered),
                })
            } else {
                Err(FulfillmentError::NotPermitted {
                    role,
                    action: "complete deliveries".to_string(),
                })
            }
        }
        // Carry extra inputs and side effects, so they have dedicated ops
        (OrderStatus::Delivered, OrderStatus::Paid) => Err(FulfillmentError::Validation(
            "payment collection must go through collect_payment".to_string(),
        )),
        (OrderStatus::Pending, OrderStatus::Cancelled) => Err(FulfillmentError::Validation(
            "cancellation must go through cancel_order".to_string(),
        )),
        _ => Err(FulfillmentError::InvalidTransition { from, to }),
    }
}

/// Authorize payment collection (DELIVERED -> PAID)
///
/// Cashiers take any method. Waiters never handle cash (a business
/// control, enforced here rather than in any UI). Couriers take cash only, and
/// only on DELIVERY orders they delivered themselves.
pub fn authorize_payment(
    role: Role,
    order_type: OrderType,
    method: PaymentMethod,
    is_self_delivered: bool,
) -> Result<(), FulfillmentError> {
    if role.is_supervisor() || role == Role::Cashier {
        return Ok(());
    }
    match role {
        Role::Waiter => {
            if method == PaymentMethod::Cash {
                Err(FulfillmentError::NotPermitted {
                    role,
                    action: "collect cash payments".to_string(),
                })
            } else {
                Ok(())
            }
        }
        Role::Courier => {
            if order_type != OrderType::Delivery {
                Err(FulfillmentError::NotPermitted {
                    role,
                    action: "collect payment for non-delivery orders".to_string(),
                })
            } else if method != PaymentMethod::Cash {
                Err(FulfillmentError::NotPermitted {
                    role,
                    action: "collect non-cash payments".to_string(),
                })
            } else if !is_self_delivered {
                Err(FulfillmentError::NotPermitted {
                    role,
                    action: "collect payment for orders delivered by someone else".to_string(),
                })
            } else {
                Ok(())
            }
        }
        _ => Err(FulfillmentError::NotPermitted {
            role,
            action: "collect payments".to_string(),
        }),
    }
}

/// Authorize an item-level transition for the acting role
pub fn authorize_item_transition(
    from: ItemStatus,
    to: ItemStatus,
    role: Role,
) -> Result<TransitionEffects, FulfillmentError> {
    let supervisor = role.is_supervisor();
    match (from, to) {
        (ItemStatus::Pending, ItemStatus::InPreparation) => {
            if role == Role::Chef || supervisor {
                Ok(TransitionEffects {
                    claim: Some(ClaimField::PreparedBy),
                    must_hold: None,
                    item_advance: None,
                })
            } else {
                Err(FulfillmentError::NotPermitted {
                    role,
                    action: "start preparing items".to_string(),
                })
            }
        }
        (ItemStatus::InPreparation, ItemStatus::Ready) => {
            if role == Role::Chef {
                Ok(TransitionEffects {
                    claim: None,
                    must_hold: Some(ClaimField::PreparedBy),
                    item_advance: None,
                })
            } else if supervisor {
                Ok(TransitionEffects::default())
            } else {
                Err(FulfillmentError::NotPermitted {
                    role,
                    action: "mark items ready".to_string(),
                })
            }
        }
        (ItemStatus::Ready, ItemStatus::Delivered) => {
            if matches!(role, Role::Waiter | Role::Cashier | Role::Courier) || supervisor {
                Ok(TransitionEffects {
                    claim: Some(ClaimField::DeliveredBy),
                    must_hold: None,
                    item_advance: None,
                })
            } else {
                Err(FulfillmentError::NotPermitted {
                    role,
                    action: "deliver items".to_string(),
                })
            }
        }
        _ => Err(FulfillmentError::InvalidItemTransition { from, to }),
    }
}

/// Item status a bulk order-level advance maps to, if any
pub fn item_target_for(order_target: OrderStatus) -> Option<ItemStatus> {
    match order_target {
        OrderStatus::InPreparation => Some(ItemStatus::InPreparation),
        OrderStatus::Ready => Some(ItemStatus::Ready),
        OrderStatus::Delivered => Some(ItemStatus::Delivered),
        _ => None,
    }
}

/// Advance every item lagging behind `target`
pub fn advance_items(items: &mut [LineItem], target: ItemStatus) {
    for item in items {
        if item.status.rank() < target.rank() {
            item.status = target;
        }
    }
}

/// Derive the aggregate status from current line items
///
/// Explicit states are sticky. For the derived band:
/// - all items DELIVERED / READY / PENDING map directly;
/// - a claimed order with work in progress stays IN_PREPARATION, so items
///   added mid-flight do not bounce it back to PENDING (same cook keeps it);
/// - unclaimed pending preparation work keeps the order PENDING even when
///   drink items are already READY.
pub fn derive_status(snapshot: &OrderSnapshot) -> OrderStatus {
    if snapshot.status.is_explicit() {
        return snapshot.status;
    }
    let items = &snapshot.items;
    if items.is_empty() {
        return OrderStatus::Pending;
    }

    let total = items.len();
    let pending = items
        .iter()
        .filter(|i| i.status == ItemStatus::Pending)
        .count();
    let in_prep = items
        .iter()
        .filter(|i| i.status == ItemStatus::InPreparation)
        .count();
    let ready = items
        .iter()
        .filter(|i| i.status == ItemStatus::Ready)
        .count();
    let delivered = items
        .iter()
        .filter(|i| i.status == ItemStatus::Delivered)
        .count();

    if delivered == total {
        return OrderStatus::Delivered;
    }
    if ready == total {
        return OrderStatus::Ready;
    }
    if pending == total {
        return OrderStatus::Pending;
    }

    if snapshot.prepared_by.is_some() && in_prep > 0 {
        return OrderStatus::InPreparation;
    }

    let has_pending_preparation = items
        .iter()
        .any(|i| i.status == ItemStatus::Pending && i.requires_preparation);
    if has_pending_preparation {
        return OrderStatus::Pending;
    }

    if in_prep > 0 {
        return OrderStatus::InPreparation;
    }
    if ready > 0 {
        return OrderStatus::Ready;
    }
    OrderStatus::Pending
}
