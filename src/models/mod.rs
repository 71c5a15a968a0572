pub mod order;
pub mod stock;
pub mod validation;

pub use order::{Order, OrderRequest, OrderResponse, OrderSide};
pub use stock::{OrdersView, SelectedStock, StockListItem, StockTrade};
pub use validation::{Validate, ValidationErrors};
