use std::str::FromStr;

use async_trait::async_trait;
use chrono::DateTime;
use futures_util::StreamExt;
use mongodb::{
    bson::doc,
    options::{FindOptions, IndexOptions},
    Database, IndexModel,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::models::{Order, OrderSide, Validate};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("stored order {id} is corrupt: {reason}")]
    Corrupt { id: String, reason: String },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Append-only storage for buy and sell orders.
#[async_trait]
pub trait OrdersRepository: Send + Sync {
    /// Inserts `order` into the table for `side` and returns it as stored.
    async fn create_order(&self, side: OrderSide, order: Order) -> Result<Order, RepositoryError>;

    /// All orders for `side`, newest first.
    async fn list_orders(&self, side: OrderSide) -> Result<Vec<Order>, RepositoryError>;

    async fn ping(&self) -> Result<(), RepositoryError>;
}

pub fn collection_name(side: OrderSide) -> &'static str {
    match side {
        OrderSide::Buy => "buy_orders",
        OrderSide::Sell => "sell_orders",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct OrderDocument {
    #[serde(rename = "_id")]
    id: String,
    stock_symbol: String,
    stock_name: String,
    // unix millis
    order_date: i64,
    quantity: i64,
    // decimal kept as text so no precision is lost
    price: String,
}

impl From<&Order> for OrderDocument {
    fn from(o: &Order) -> Self {
        Self {
            id: o.id.to_string(),
            stock_symbol: o.stock_symbol.clone(),
            stock_name: o.stock_name.clone(),
            order_date: o.order_date.timestamp_millis(),
            quantity: i64::from(o.quantity),
            price: o.price.to_string(),
        }
    }
}

impl TryFrom<OrderDocument> for Order {
    type Error = RepositoryError;

    fn try_from(d: OrderDocument) -> Result<Self, Self::Error> {
        let corrupt = |reason: &str| RepositoryError::Corrupt {
            id: d.id.clone(),
            reason: reason.to_string(),
        };

        let id = Uuid::parse_str(&d.id).map_err(|_| corrupt("id is not a uuid"))?;
        let order_date = DateTime::from_timestamp_millis(d.order_date)
            .ok_or_else(|| corrupt("order_date out of range"))?;
        let quantity = u32::try_from(d.quantity).map_err(|_| corrupt("quantity out of range"))?;
        let price = Decimal::from_str(&d.price).map_err(|_| corrupt("price is not a decimal"))?;

        let order = Order {
            id,
            stock_symbol: d.stock_symbol,
            stock_name: d.stock_name,
            order_date,
            quantity,
            price,
        };

        order.validate().map_err(|errs| RepositoryError::Corrupt {
            id: order.id.to_string(),
            reason: errs.to_string(),
        })?;
        Ok(order)
    }
}

#[derive(Clone)]
pub struct MongoOrdersRepository {
    db: Database,
}

impl MongoOrdersRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// History pages sort on `order_date`, so both tables get a descending index.
    pub async fn ensure_indexes(&self) -> Result<(), RepositoryError> {
        for side in [OrderSide::Buy, OrderSide::Sell] {
            let col = self.db.collection::<mongodb::bson::Document>(collection_name(side));
            let model = IndexModel::builder()
                .keys(doc! { "order_date": -1 })
                .options(IndexOptions::builder().name("order_date_desc".to_string()).build())
                .build();

            col.create_index(model, None).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl OrdersRepository for MongoOrdersRepository {
    async fn create_order(&self, side: OrderSide, order: Order) -> Result<Order, RepositoryError> {
        info!(side = side.as_str(), id = %order.id, "orders repository: create order");

        let orders = self.db.collection::<OrderDocument>(collection_name(side));
        let document = OrderDocument::from(&order);

        if let Err(e) = orders.insert_one(&document, None).await {
            error!(side = side.as_str(), error = %e, "orders repository: insert failed");
            return Err(e.into());
        }

        debug!(?order, "orders repository: order stored");
        Ok(order)
    }

    async fn list_orders(&self, side: OrderSide) -> Result<Vec<Order>, RepositoryError> {
        info!(side = side.as_str(), "orders repository: list orders");

        let orders = self.db.collection::<OrderDocument>(collection_name(side));
        let find_opts = FindOptions::builder().sort(doc! { "order_date": -1 }).build();

        let mut cursor = orders.find(doc! {}, find_opts).await?;

        let mut out: Vec<Order> = vec![];
        while let Some(res) = cursor.next().await {
            out.push(Order::try_from(res?)?);
        }

        debug!(side = side.as_str(), count = out.len(), "orders repository: orders loaded");
        Ok(out)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        self.db.run_command(doc! { "ping": 1 }, None).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn document_round_trip_keeps_exact_price() {
        let order = Order {
            id: Uuid::new_v4(),
            stock_symbol: "AAPL".to_string(),
            stock_name: "Apple Inc".to_string(),
            order_date: DateTime::from_timestamp_millis(Utc::now().timestamp_millis()).unwrap(),
            quantity: 3,
            price: Decimal::new(19_123, 2),
        };

        let back = Order::try_from(OrderDocument::from(&order)).unwrap();
        assert_eq!(back, order);
    }

    #[test]
    fn corrupt_document_is_reported() {
        let doc = OrderDocument {
            id: "not-a-uuid".to_string(),
            stock_symbol: "AAPL".to_string(),
            stock_name: "Apple Inc".to_string(),
            order_date: 0,
            quantity: 1,
            price: "1".to_string(),
        };

        assert!(matches!(Order::try_from(doc), Err(RepositoryError::Corrupt { .. })));
    }

    #[test]
    fn stored_order_breaking_field_rules_is_corrupt() {
        let doc = OrderDocument {
            id: Uuid::new_v4().to_string(),
            stock_symbol: "AAPL".to_string(),
            stock_name: "Apple Inc".to_string(),
            order_date: Utc::now().timestamp_millis(),
            quantity: 0,
            price: "99999".to_string(),
        };

        match Order::try_from(doc) {
            Err(RepositoryError::Corrupt { reason, .. }) => {
                assert!(reason.contains("Quantity"));
                assert!(reason.contains("Price"));
            }
            other => panic!("expected corrupt order, got {other:?}"),
        }
    }
}
