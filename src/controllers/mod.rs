pub mod home_controller;
pub mod stocks_controller;
pub mod trade_controller;
