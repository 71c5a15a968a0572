use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{
    decimal_range, int_range, min_date, min_order_date, required_text, Validate, ValidationErrors,
};

pub const MAX_SYMBOL_LEN: usize = 50;
pub const MAX_NAME_LEN: usize = 100;
pub const MIN_QUANTITY: i64 = 1;
pub const MAX_QUANTITY: i64 = 100_000;

pub fn min_price() -> Decimal {
    Decimal::ONE
}

pub fn max_price() -> Decimal {
    Decimal::from(10_000)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Buy => "buy",
            OrderSide::Sell => "sell",
        }
    }
}

/// A stored buy or sell order. Which side it is depends on the table it lives in.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: Uuid,
    pub stock_symbol: String,
    pub stock_name: String,
    pub order_date: DateTime<Utc>,
    pub quantity: u32,
    pub price: Decimal,
}

impl Order {
    pub fn trade_amount(&self) -> Decimal {
        Decimal::from(self.quantity) * self.price
    }

    pub fn to_response(&self, side: OrderSide) -> OrderResponse {
        OrderResponse {
            id: self.id,
            side,
            stock_symbol: self.stock_symbol.clone(),
            stock_name: self.stock_name.clone(),
            order_date: self.order_date,
            quantity: self.quantity,
            price: self.price,
            trade_amount: self.trade_amount(),
        }
    }
}

impl Validate for Order {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errs = ValidationErrors::new();
        required_text(&mut errs, "stock_symbol", "Stock symbol", Some(&self.stock_symbol), MAX_SYMBOL_LEN);
        required_text(&mut errs, "stock_name", "Stock name", Some(&self.stock_name), MAX_NAME_LEN);
        min_date(&mut errs, "order_date", "Order date", self.order_date, min_order_date());
        int_range(&mut errs, "quantity", "Quantity", i64::from(self.quantity), MIN_QUANTITY, MAX_QUANTITY);
        decimal_range(&mut errs, "price", "Price", self.price, min_price(), max_price());
        errs.into_result()
    }
}

/// Input for placing an order, as submitted from the trade form.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    pub stock_symbol: Option<String>,
    pub stock_name: Option<String>,
    pub order_date: DateTime<Utc>,
    pub quantity: i64,
    pub price: Decimal,
}

impl Validate for OrderRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errs = ValidationErrors::new();
        required_text(&mut errs, "stock_symbol", "Stock symbol", self.stock_symbol.as_deref(), MAX_SYMBOL_LEN);
        required_text(&mut errs, "stock_name", "Stock name", self.stock_name.as_deref(), MAX_NAME_LEN);
        min_date(&mut errs, "order_date", "Order date", self.order_date, min_order_date());
        int_range(&mut errs, "quantity", "Quantity", self.quantity, MIN_QUANTITY, MAX_QUANTITY);
        decimal_range(&mut errs, "price", "Price", self.price, min_price(), max_price());
        errs.into_result()
    }
}

impl OrderRequest {
    /// Validates the request and builds the order it describes under `id`.
    pub fn into_order(self, id: Uuid) -> Result<Order, ValidationErrors> {
        self.validate()?;

        let quantity = u32::try_from(self.quantity).map_err(|_| {
            let mut errs = ValidationErrors::new();
            errs.add("quantity", "Quantity is out of range");
            errs
        })?;

        Ok(Order {
            id,
            stock_symbol: self.stock_symbol.unwrap_or_default().trim().to_uppercase(),
            stock_name: self.stock_name.unwrap_or_default().trim().to_string(),
            order_date: self.order_date,
            quantity,
            price: self.price,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderResponse {
    pub id: Uuid,
    pub side: OrderSide,
    pub stock_symbol: String,
    pub stock_name: String,
    pub order_date: DateTime<Utc>,
    pub quantity: u32,
    pub price: Decimal,
    pub trade_amount: Decimal,
}
