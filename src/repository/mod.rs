//! Storage contract for customer records.
//!
//! The database is the source of truth for email uniqueness: implementations
//! must reject a second record whose email matches an existing one ignoring
//! case, and report it as [`RepositoryError::DuplicateEmail`].

mod postgres;


use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::{Customer, CustomerEmail, CustomerId, NewCustomer};
use crate::utils::error_chain_fmt;

pub use postgres::PostgresCustomerRepository;

#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Whether a customer with this email exists, compared case-insensitively.
    async fn exists_by_email(&self, email: &CustomerEmail) -> Result<bool, RepositoryError>;

    async fn find_by_email(
        &self,
        email: &CustomerEmail,
    ) -> Result<Option<Customer>, RepositoryError>;

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError>;

    /// Store `candidate` and return it with its assigned id.
    async fn save(&self, candidate: &NewCustomer) -> Result<Customer, RepositoryError>;

    /// Fails with [`RepositoryError::NotFound`] when nothing was removed.
    async fn delete_by_id(&self, id: CustomerId) -> Result<(), RepositoryError>;

    /// Every stored customer ordered by id. Not paginated.
    async fn find_all(&self) -> Result<Vec<Customer>, RepositoryError>;
}

#[derive(thiserror::Error)]
pub enum RepositoryError {
    #[error("A customer with this email address already exists")]
    DuplicateEmail,
    #[error("Customer not found")]
    NotFound,
    #[error("Failed to execute a query against the customer store")]
    Database(#[from] sqlx::Error),
}

impl Debug for RepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
