use rust_decimal::Decimal;
use serde::Serialize;

use super::order::OrderResponse;

/// Prefilled trade form for one symbol.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StockTrade {
    pub stock_symbol: String,
    pub stock_name: String,
    pub price: Decimal,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockListItem {
    pub stock_symbol: String,
    pub stock_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectedStock {
    pub symbol: String,
    pub logo: String,
    pub name: String,
    pub industry: String,
    pub exchange: String,
    pub price: f64,
}

#[derive(Debug, Clone, Default)]
pub struct OrdersView {
    pub buy_orders: Vec<OrderResponse>,
    pub sell_orders: Vec<OrderResponse>,
}
