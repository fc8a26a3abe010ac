//! Facade operation handlers
//!
//! One file per operation. Each handler implements [`OrderAction`] against
//! an open write transaction: load the snapshot, check guards, claim,
//! mutate, recompute totals and the status roll-up, persist.

use crate::error::FulfillmentError;
use crate::money;
use crate::orders::traits::OpContext;
use crate::pricing::validate_promotion;
use shared::models::MenuItem;
use shared::order::{ItemStatus, LineItem, LineItemInput};
use validator::Validate;

mod add_items;
mod cancel_order;
mod change_item_status;
mod change_status;
mod collect_payment;
mod create_order;
mod remove_item;

pub use add_items::AddItemsAction;
pub use cancel_order::CancelOrderAction;
pub use change_item_status::ChangeItemStatusAction;
pub use change_status::ChangeStatusAction;
pub use collect_payment::CollectPaymentAction;
pub use create_order::CreateOrderAction;
pub use remove_item::RemoveItemAction;

/// Build a line item from caller input: price snapshot, server-validated
/// promotion, natural initial status
pub(crate) fn build_line(
    ctx: &OpContext<'_>,
    input: &LineItemInput,
    is_new: bool,
) -> Result<(MenuItem, LineItem), FulfillmentError> {
    input
        .validate()
        .map_err(|e| FulfillmentError::Validation(e.to_string()))?;
    money::validate_line_input(input)?;

    let menu_item = ctx.menu_item(&input.item_id)?;

    let promotion = input
        .claimed_promotion_id
        .as_deref()
        .and_then(|id| ctx.promotions.get(id));
    let validated = validate_promotion(promotion.as_ref(), &menu_item, input.quantity, ctx.today);

    if let (Some(claimed), Some(derived)) = (input.claimed_promotion_price, validated.as_ref()) {
        if claimed != derived.unit_price {
            tracing::warn!(
                item = %menu_item.id,
                %claimed,
                derived = %derived.unit_price,
                "client-claimed promotion price ignored"
            );
        }
    }

    let mut line = LineItem {
        instance_id: uuid::Uuid::new_v4().to_string(),
        item_id: menu_item.id.clone(),
        name: menu_item.name.clone(),
        quantity: input.quantity,
        unit_price: menu_item.price,
        applied_promotion_id: validated.as_ref().map(|v| v.promotion_id.clone()),
        promotion_applied_price: validated.as_ref().map(|v| v.unit_price),
        comments: input.comments.clone(),
        subtotal: rust_decimal::Decimal::ZERO,
        status: ItemStatus::initial(menu_item.requires_preparation),
        requires_preparation: menu_item.requires_preparation,
        is_new,
        added_at: ctx.now_millis,
    };
    line.recompute_subtotal();

    Ok((menu_item, line))
}
