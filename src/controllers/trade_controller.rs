use std::str::FromStr;

use axum::{
    extract::{Form, Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, warn};

use crate::{
    flash,
    models::{
        order::{min_price, MIN_QUANTITY},
        OrderRequest, OrderResponse, OrderSide, Validate, ValidationErrors,
    },
    pdf, render,
    services::{
        orders_service::{self, OrderError},
        stocks_service,
    },
    AppState,
};

pub const FETCH_ERROR: &str = "There was an error while fetching stocks data";
pub const CREATE_ERROR: &str = "There was an error with create request please try again";
pub const ORDERS_ERROR: &str = "There were problems with getting orders, please try again";
pub const ORDERS_PDF_ERROR: &str = "Error while getting orders from database, please try again later (PDF)";

fn fmt2(v: Decimal) -> String {
    format!("{:.2}", v)
}

fn index_url(symbol: &str) -> String {
    let sym = symbol.trim();
    let safe = !sym.is_empty()
        && sym.len() <= 50
        && sym.chars().all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
    if safe {
        format!("/trade/index/{}", sym.to_uppercase())
    } else {
        "/trade/index".to_string()
    }
}

async fn render_index(state: AppState, jar: CookieJar, symbol: Option<String>) -> Response {
    let (jar, mut errors) = flash::take_errors(jar);

    let symbol = symbol
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| state.settings.trading.default_stock_symbol.clone());

    let trade = match stocks_service::stock_trade(&state, &symbol).await {
        Ok(t) => json!({
            "stock_symbol": t.stock_symbol,
            "stock_name": t.stock_name,
            "price": fmt2(t.price),
            "quantity": t.quantity,
        }),
        Err(e) => {
            warn!(symbol = %symbol, error = %e, "trade index degraded");
            errors.push(FETCH_ERROR.to_string());
            serde_json::Value::Null
        }
    };

    let ctx = json!({ "trade": trade, "errors": errors });
    let res = render::page_response(&state, StatusCode::OK, "pages/trade_index", "Trade", &ctx);
    (jar, res).into_response()
}

// GET / and GET /trade/index
pub async fn get_index(State(state): State<AppState>, jar: CookieJar) -> Response {
    render_index(state, jar, None).await
}

// GET /trade/index/:symbol
pub async fn get_index_symbol(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    jar: CookieJar,
) -> Response {
    render_index(state, jar, Some(symbol)).await
}

#[derive(Debug, Default, Deserialize)]
pub struct OrderForm {
    #[serde(default)]
    pub stock_symbol: String,
    #[serde(default)]
    pub stock_name: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub price: String,
}

fn non_blank(s: String) -> Option<String> {
    if s.trim().is_empty() { None } else { Some(s) }
}

/// Parses the raw form. Unparsable numbers are reported alongside any other
/// failing fields.
pub fn order_request_from_form(form: OrderForm) -> Result<OrderRequest, ValidationErrors> {
    let mut errs = ValidationErrors::new();

    let quantity = match form.quantity.trim().parse::<i64>() {
        Ok(q) => Some(q),
        Err(_) => {
            errs.add("quantity", "Enter a valid quantity.");
            None
        }
    };

    let price = match Decimal::from_str(form.price.trim()) {
        Ok(p) => Some(p),
        Err(_) => {
            errs.add("price", "Enter a valid price.");
            None
        }
    };

    let parsed = quantity.is_some() && price.is_some();
    let request = OrderRequest {
        stock_symbol: non_blank(form.stock_symbol),
        stock_name: non_blank(form.stock_name),
        order_date: Utc::now(),
        quantity: quantity.unwrap_or(MIN_QUANTITY),
        price: price.unwrap_or_else(min_price),
    };

    if parsed {
        return Ok(request);
    }

    // placeholders above are in range, so only the other fields can fail here
    if let Err(more) = request.validate() {
        errs.merge(more);
    }
    Err(errs)
}

async fn submit_order(
    state: AppState,
    jar: CookieJar,
    side: OrderSide,
    form: OrderForm,
) -> Response {
    let back = index_url(&form.stock_symbol);

    let request = match order_request_from_form(form) {
        Ok(r) => r,
        Err(errs) => {
            let jar = flash::with_errors(jar, &errs.messages());
            return (jar, Redirect::to(&back)).into_response();
        }
    };

    match orders_service::create_order(state.orders.as_ref(), side, Some(request)).await {
        Ok(_) => (jar, Redirect::to("/trade/orders")).into_response(),
        Err(OrderError::Validation(errs)) => {
            let jar = flash::with_errors(jar, &errs.messages());
            (jar, Redirect::to(&back)).into_response()
        }
        Err(e) => {
            error!(side = side.as_str(), error = %e, "order submission failed");
            let jar = flash::with_errors(jar, &[CREATE_ERROR.to_string()]);
            (jar, Redirect::to(&back)).into_response()
        }
    }
}

// POST /trade/buy-order
pub async fn post_buy_order(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<OrderForm>,
) -> Response {
    submit_order(state, jar, OrderSide::Buy, form).await
}

// POST /trade/sell-order
pub async fn post_sell_order(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<OrderForm>,
) -> Response {
    submit_order(state, jar, OrderSide::Sell, form).await
}

fn order_rows(orders: &[OrderResponse]) -> Vec<serde_json::Value> {
    orders
        .iter()
        .map(|o| {
            json!({
                "id": o.id.to_string(),
                "order_date": o.order_date.format("%Y-%m-%d %H:%M:%S").to_string(),
                "stock_symbol": o.stock_symbol,
                "stock_name": o.stock_name,
                "quantity": o.quantity,
                "price": fmt2(o.price),
                "trade_amount": fmt2(o.trade_amount),
            })
        })
        .collect()
}

// GET /trade/orders
pub async fn get_orders(State(state): State<AppState>, jar: CookieJar) -> Response {
    let (jar, mut errors) = flash::take_errors(jar);

    let view = match orders_service::orders_view(state.orders.as_ref()).await {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "orders page degraded");
            errors.push(ORDERS_ERROR.to_string());
            Default::default()
        }
    };

    let ctx = json!({
        "buy_orders": order_rows(&view.buy_orders),
        "sell_orders": order_rows(&view.sell_orders),
        "errors": errors,
    });

    let res = render::page_response(&state, StatusCode::OK, "pages/orders", "Orders", &ctx);
    (jar, res).into_response()
}

// GET /trade/orders/pdf
pub async fn get_orders_pdf(State(state): State<AppState>, jar: CookieJar) -> Response {
    let bytes = match orders_service::orders_view(state.orders.as_ref()).await {
        Ok(view) => pdf::orders_pdf(&view, Utc::now()).map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    };

    match bytes {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
                (
                    header::CONTENT_DISPOSITION,
                    HeaderValue::from_static("inline; filename=\"orders.pdf\""),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "orders pdf failed");
            let jar = flash::with_errors(jar, &[ORDERS_PDF_ERROR.to_string()]);
            (jar, Redirect::to("/trade/orders")).into_response()
        }
    }
}
