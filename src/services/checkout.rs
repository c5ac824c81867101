//! Bridge between the storefront and the Snap checkout.
//!
//! The client's price is forwarded as given; the gross amount is
//! `price × quantity`, rejected when it does not fit in an `i64`.

use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::utils::midtrans::{
    PaymentGateway, SnapCustomerDetails, SnapItemDetail, SnapRequest, SnapResponse,
    SnapTransactionDetails,
};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutOrder {
    pub id: String,
    pub product_name: String,
    pub price: i64,
    pub quantity: i64,
    pub buyer_name: String,
    pub buyer_email: String,
    pub buyer_phone: String,
}

impl CheckoutOrder {
    pub fn gross_amount(&self) -> ApiResult<i64> {
        if self.quantity < 1 {
            return Err(ApiError::Validation("quantity must be at least 1".into()));
        }
        if self.price < 0 {
            return Err(ApiError::Validation("price must not be negative".into()));
        }
        self.price
            .checked_mul(self.quantity)
            .ok_or_else(|| ApiError::Validation("price × quantity is too large".into()))
    }

    pub fn to_snap_request(&self) -> ApiResult<SnapRequest> {
        Ok(SnapRequest {
            transaction_details: SnapTransactionDetails {
                order_id: self.id.clone(),
                gross_amount: self.gross_amount()?,
            },
            item_details: vec![SnapItemDetail {
                id: self.id.clone(),
                price: self.price,
                quantity: self.quantity,
                name: self.product_name.clone(),
            }],
            customer_details: SnapCustomerDetails {
                first_name: self.buyer_name.clone(),
                email: self.buyer_email.clone(),
                phone: self.buyer_phone.clone(),
            },
        })
    }
}

pub async fn create_checkout(gateway: &dyn PaymentGateway, order: &CheckoutOrder) -> ApiResult<SnapResponse> {
    if order.id.trim().is_empty() {
        return Err(ApiError::Validation("id is required".into()));
    }

    let request = order.to_snap_request()?;
    let response = gateway.create_transaction(&request).await?;
    tracing::info!(
        order_id = %order.id,
        gross_amount = request.transaction_details.gross_amount,
        "snap transaction created"
    );
    Ok(response)
}
