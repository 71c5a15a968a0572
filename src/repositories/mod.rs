pub mod orders_repository;

pub use orders_repository::{MongoOrdersRepository, OrdersRepository, RepositoryError};
