pub mod finnhub;
pub mod market_data_service;

pub mod orders_service;
pub mod stocks_service;
