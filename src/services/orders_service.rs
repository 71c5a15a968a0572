use thiserror::Error;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::{
    models::{OrderRequest, OrderResponse, OrderSide, OrdersView, ValidationErrors},
    repositories::{OrdersRepository, RepositoryError},
};

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("order request is missing")]
    MissingRequest,

    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("could not save order: {0}")]
    Persistence(#[from] RepositoryError),
}

pub async fn create_buy_order(
    repo: &dyn OrdersRepository,
    request: Option<OrderRequest>,
) -> Result<OrderResponse, OrderError> {
    create_order(repo, OrderSide::Buy, request).await
}

pub async fn create_sell_order(
    repo: &dyn OrdersRepository,
    request: Option<OrderRequest>,
) -> Result<OrderResponse, OrderError> {
    create_order(repo, OrderSide::Sell, request).await
}

/// Validates `request`, stamps a fresh id and stores it on `side`.
///
/// Nothing is written unless every field passes validation.
pub async fn create_order(
    repo: &dyn OrdersRepository,
    side: OrderSide,
    request: Option<OrderRequest>,
) -> Result<OrderResponse, OrderError> {
    info!(side = side.as_str(), "orders service: create order");

    let Some(request) = request else {
        error!(side = side.as_str(), "orders service: request is missing");
        return Err(OrderError::MissingRequest);
    };
    debug!(?request, "orders service: create order request");

    let order = match request.into_order(Uuid::new_v4()) {
        Ok(o) => o,
        Err(errs) => {
            error!(side = side.as_str(), errors = %errs, "orders service: invalid request");
            return Err(errs.into());
        }
    };

    let stored = repo.create_order(side, order).await.map_err(|e| {
        error!(side = side.as_str(), error = %e, "orders service: store failed");
        OrderError::Persistence(e)
    })?;

    let response = stored.to_response(side);
    info!(side = side.as_str(), id = %response.id, "orders service: order created");
    Ok(response)
}

pub async fn list_orders(repo: &dyn OrdersRepository, side: OrderSide) -> Result<Vec<OrderResponse>, RepositoryError> {
    info!(side = side.as_str(), "orders service: list orders");

    let orders = repo.list_orders(side).await.map_err(|e| {
        error!(side = side.as_str(), error = %e, "orders service: list failed");
        e
    })?;

    Ok(orders.iter().map(|o| o.to_response(side)).collect())
}

pub async fn list_buy_orders(repo: &dyn OrdersRepository) -> Result<Vec<OrderResponse>, RepositoryError> {
    list_orders(repo, OrderSide::Buy).await
}

pub async fn list_sell_orders(repo: &dyn OrdersRepository) -> Result<Vec<OrderResponse>, RepositoryError> {
    list_orders(repo, OrderSide::Sell).await
}

/// Both histories, for the orders page and its PDF export.
pub async fn orders_view(repo: &dyn OrdersRepository) -> Result<OrdersView, RepositoryError> {
    Ok(OrdersView {
        buy_orders: list_buy_orders(repo).await?,
        sell_orders: list_sell_orders(repo).await?,
    })
}
