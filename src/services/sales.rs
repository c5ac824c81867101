//! Organizer sales report.
//!
//! Settled transactions are fetched with one query per owned event; the
//! results are concatenated, labelled with the event title and ordered
//! newest first. The report is best effort: a failing query yields an empty
//! report rather than an error.

use mongodb::bson::doc;
use serde::Serialize;

use crate::models::event::Event;
use crate::models::transaction::{Transaction, SETTLEMENT};
use crate::store::{collection, DocumentStore, StoreResult};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    pub transaction_count: usize,
    pub tickets_sold: i64,
    pub total_revenue: i64,
    pub transactions: Vec<Transaction>,
}

impl SalesReport {
    pub fn from_transactions(transactions: Vec<Transaction>) -> Self {
        SalesReport {
            transaction_count: transactions.len(),
            tickets_sold: transactions.iter().map(|t| t.quantity).sum(),
            total_revenue: transactions.iter().map(|t| t.amount).sum(),
            transactions,
        }
    }
}

async fn fetch_settled(store: &dyn DocumentStore, organizer_id: &str) -> StoreResult<Vec<Transaction>> {
    let events = collection::<Event>(store)
        .find(doc! { "organizerId": organizer_id })
        .await?;

    let transactions = collection::<Transaction>(store);
    let mut sales = Vec::new();
    for event in &events {
        let Some(event_id) = event.id else { continue };
        let mut batch = transactions
            .find(doc! { "eventId": event_id.to_hex(), "status": SETTLEMENT })
            .await?;
        for transaction in &mut batch {
            transaction.event_name = event.title.clone();
        }
        sales.append(&mut batch);
    }

    sales.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(sales)
}

/// Every settled transaction across the organizer's events, newest first.
pub async fn settled_sales(store: &dyn DocumentStore, organizer_id: &str) -> Vec<Transaction> {
    match fetch_settled(store, organizer_id).await {
        Ok(sales) => sales,
        Err(e) => {
            tracing::warn!(organizer_id, error = %e, "sales lookup failed, reporting no sales");
            Vec::new()
        }
    }
}

pub async fn sales_report(store: &dyn DocumentStore, organizer_id: &str) -> SalesReport {
    SalesReport::from_transactions(settled_sales(store, organizer_id).await)
}
