//! Purchase records and their reconciliation with gateway notifications.

use chrono::Utc;
use mongodb::bson::{self, doc, Document};
use serde::Deserialize;

use super::{parse_id, required};
use crate::error::{ApiError, ApiResult};
use crate::models::event::Event;
use crate::models::id_hex;
use crate::models::transaction::{RecordTransactionPayload, Transaction, PENDING, SETTLEMENT};
use crate::store::{collection, DocumentStore, StoreError};

fn timestamp() -> ApiResult<bson::Bson> {
    Ok(bson::to_bson(&Utc::now()).map_err(StoreError::from)?)
}

/// Stores what the checkout widget reported. A second report for the same
/// order (pending, then success) updates the stored status instead of
/// duplicating the purchase. A settled order stays settled: the widget may
/// report after the gateway notification has arrived.
pub async fn record_transaction(
    store: &dyn DocumentStore,
    user_id: &str,
    payload: RecordTransactionPayload,
) -> ApiResult<Transaction> {
    let order_id = required(&payload.order_id, "orderId")?;
    if payload.quantity < 1 {
        return Err(ApiError::Validation("quantity must be at least 1".into()));
    }
    if payload.amount < 0 {
        return Err(ApiError::Validation("amount must not be negative".into()));
    }
    let status = payload.status.unwrap_or_else(|| PENDING.to_string());

    let transactions = collection::<Transaction>(store);
    if let Some(existing) = transactions.find_one(doc! { "orderId": order_id.as_str() }).await? {
        if existing.user_id != user_id {
            return Err(ApiError::Conflict("Order ID already used".into()));
        }
        let Some(id) = existing.id else {
            return Ok(existing);
        };
        let status = if existing.is_settled() { SETTLEMENT } else { status.as_str() };
        let mut set = doc! { "status": status, "updatedAt": timestamp()? };
        if let Some(payment_type) = &payload.payment_type {
            set.insert("paymentType", payment_type.as_str());
        }
        transactions.update_by_id(id, set).await?;
        return transactions.find_by_id(id).await?.ok_or(ApiError::NotFound("Transaction"));
    }

    let event = collection::<Event>(store)
        .find_by_id(parse_id(&payload.event_id, "event")?)
        .await?
        .ok_or(ApiError::NotFound("Event"))?;

    let now = Utc::now();
    let mut transaction = Transaction {
        id: None,
        order_id,
        event_id: id_hex(&event.id),
        event_name: event.title,
        user_id: user_id.to_string(),
        ticket_type: payload.ticket_type,
        quantity: payload.quantity,
        amount: payload.amount,
        status,
        payment_type: payload.payment_type,
        created_at: now,
        updated_at: now,
    };
    transaction.id = Some(transactions.insert_one(&transaction).await?);

    tracing::info!(
        order_id = %transaction.order_id,
        event_id = %transaction.event_id,
        status = %transaction.status,
        "transaction recorded"
    );
    Ok(transaction)
}

fn newest_first(mut transactions: Vec<Transaction>) -> Vec<Transaction> {
    transactions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    transactions
}

pub async fn list_user_transactions(store: &dyn DocumentStore, user_id: &str) -> ApiResult<Vec<Transaction>> {
    let transactions = collection::<Transaction>(store)
        .find(doc! { "userId": user_id })
        .await?;
    Ok(newest_first(transactions))
}

pub async fn list_all_transactions(store: &dyn DocumentStore) -> ApiResult<Vec<Transaction>> {
    let transactions = collection::<Transaction>(store).find(doc! {}).await?;
    Ok(newest_first(transactions))
}

/// HTTP notification the gateway posts when a payment changes state.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayNotification {
    pub order_id: String,
    pub transaction_status: String,
    #[serde(default)]
    pub payment_type: Option<String>,
    #[serde(default)]
    pub fraud_status: Option<String>,
}

impl GatewayNotification {
    /// Card payments report `capture`; once the fraud check accepts it the
    /// money is as good as settled.
    pub fn effective_status(&self) -> &str {
        match (self.transaction_status.as_str(), self.fraud_status.as_deref()) {
            ("capture", Some("accept")) => SETTLEMENT,
            (status, _) => status,
        }
    }
}

/// Applies a notification to the stored transaction. Returns whether a
/// transaction with that order id exists.
pub async fn apply_notification(store: &dyn DocumentStore, notification: &GatewayNotification) -> ApiResult<bool> {
    let transactions = collection::<Transaction>(store);
    let Some(transaction) = transactions
        .find_one(doc! { "orderId": notification.order_id.as_str() })
        .await?
    else {
        tracing::warn!(order_id = %notification.order_id, "notification for unknown order ignored");
        return Ok(false);
    };
    let Some(id) = transaction.id else {
        return Ok(false);
    };

    let status = notification.effective_status();
    let mut set: Document = doc! { "status": status, "updatedAt": timestamp()? };
    if let Some(payment_type) = &notification.payment_type {
        set.insert("paymentType", payment_type.as_str());
    }
    transactions.update_by_id(id, set).await?;

    tracing::info!(
        order_id = %notification.order_id,
        from = %transaction.status,
        to = status,
        "transaction status reconciled"
    );
    Ok(true)
}
