//! Registration workflow and the email uniqueness rule.
//!
//! The existence check in [`RegistrationService::register_customer`] is only a
//! fast path. Two requests for the same address can both pass it; the storage
//! constraint then rejects the second write, and that rejection is reported as
//! [`RegistrationError::DuplicateEmail`] just like a pre-check hit.

use std::fmt::Debug;
use std::sync::Arc;

use anyhow::Context;

use crate::domain::{Customer, CustomerEmail, CustomerId, NewCustomer};
use crate::repository::{CustomerRepository, RepositoryError};
use crate::utils::error_chain_fmt;

#[derive(Clone)]
pub struct RegistrationService {
    repository: Arc<dyn CustomerRepository>,
}

impl RegistrationService {
    pub fn new(repository: Arc<dyn CustomerRepository>) -> Self {
        Self { repository }
    }

    /// Store `candidate` with its email normalised to lowercase.
    ///
    /// Performs exactly one write on success and none when the email is taken.
    #[tracing::instrument(
        name = "Registering a new customer",
        skip(self, candidate),
        fields(customer_email = %candidate.details.email_address, customer_id = tracing::field::Empty)
    )]
    pub async fn register_customer(
        &self,
        mut candidate: NewCustomer,
    ) -> Result<Customer, RegistrationError> {
        let email = CustomerEmail::parse(&candidate.details.email_address)
            .map_err(RegistrationError::InvalidArgument)?;

        let taken = self
            .repository
            .exists_by_email(&email)
            .await
            .context("Failed to check whether the email is already registered")
            .map_err(RegistrationError::PersistenceFailure)?;
        if taken {
            tracing::info!("Rejected registration for an email that is already registered");
            return Err(RegistrationError::DuplicateEmail);
        }

        candidate.details.email_address = email.into();
        let customer = match self.repository.save(&candidate).await {
            Ok(customer) => customer,
            Err(RepositoryError::DuplicateEmail) => {
                tracing::info!("Concurrent registration claimed the email first");
                return Err(RegistrationError::DuplicateEmail);
            }
            Err(e) => {
                return Err(RegistrationError::PersistenceFailure(
                    anyhow::Error::new(e).context("Failed to store the new customer"),
                ))
            }
        };
        tracing::Span::current().record("customer_id", tracing::field::display(customer.id()));

        Ok(customer)
    }

    #[tracing::instrument(name = "Checking email availability", skip(self))]
    pub async fn is_email_registered(&self, email: &str) -> Result<bool, RegistrationError> {
        let email = CustomerEmail::parse(email).map_err(RegistrationError::InvalidArgument)?;

        self.repository
            .exists_by_email(&email)
            .await
            .context("Failed to check whether the email is already registered")
            .map_err(RegistrationError::PersistenceFailure)
    }

    #[tracing::instrument(name = "Finding customer by email", skip(self))]
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, RegistrationError> {
        let email = CustomerEmail::parse(email).map_err(RegistrationError::InvalidArgument)?;

        self.repository
            .find_by_email(&email)
            .await
            .context("Failed to look up a customer by email")
            .map_err(RegistrationError::PersistenceFailure)
    }

    #[tracing::instrument(name = "Finding customer by id", skip(self))]
    pub async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RegistrationError> {
        self.repository
            .find_by_id(id)
            .await
            .context("Failed to look up a customer by id")
            .map_err(RegistrationError::PersistenceFailure)
    }

    /// Loads every customer at once; there is no pagination.
    #[tracing::instrument(name = "Listing all customers", skip(self))]
    pub async fn list_all(&self) -> Result<Vec<Customer>, RegistrationError> {
        self.repository
            .find_all()
            .await
            .context("Failed to list customers")
            .map_err(RegistrationError::PersistenceFailure)
    }

    /// Permanently remove a customer.
    #[tracing::instrument(name = "Deleting customer", skip(self))]
    pub async fn delete_by_id(&self, id: CustomerId) -> Result<(), RegistrationError> {
        match self.repository.delete_by_id(id).await {
            Ok(()) => Ok(()),
            Err(RepositoryError::NotFound) => Err(RegistrationError::NotFound(id)),
            Err(e) => Err(RegistrationError::PersistenceFailure(
                anyhow::Error::new(e).context(format!("Failed to delete customer {}", id)),
            )),
        }
    }
}

#[derive(thiserror::Error)]
pub enum RegistrationError {
    #[error("{0}")]
    InvalidArgument(String),
    #[error("A customer with this email address already exists")]
    DuplicateEmail,
    #[error("No customer with id {0}")]
    NotFound(CustomerId),
    #[error("Failed to access customer storage")]
    PersistenceFailure(#[source] anyhow::Error),
}

impl Debug for RegistrationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
