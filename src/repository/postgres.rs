use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use crate::domain::{Customer, CustomerDetails, CustomerEmail, CustomerId, NewCustomer};
use crate::repository::{CustomerRepository, RepositoryError};

/// Name of the unique index on `LOWER(email_address)`; see `migrations/`.
const EMAIL_UNIQUE_INDEX: &str = "customers_email_address_lower_key";

#[derive(sqlx::FromRow)]
struct CustomerRow {
    id: i64,
    registered_at: DateTime<Utc>,
    email_address: String,
    title: String,
    first_name: String,
    last_name: String,
    address_line_1: String,
    address_line_2: Option<String>,
    city: Option<String>,
    postcode: String,
    phone_number: Option<String>,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Customer::from_parts(
            CustomerId::new(row.id),
            row.registered_at,
            CustomerDetails {
                email_address: row.email_address,
                title: row.title,
                first_name: row.first_name,
                last_name: row.last_name,
                address_line_1: row.address_line_1,
                address_line_2: row.address_line_2,
                city: row.city,
                postcode: row.postcode,
                phone_number: row.phone_number,
            },
        )
    }
}

#[derive(Clone)]
pub struct PostgresCustomerRepository {
    pool: Pool<Postgres>,
}

impl PostgresCustomerRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn log_query_error(error: sqlx::Error) -> RepositoryError {
    tracing::error!("Failed to execute query: {:?}", error);
    RepositoryError::Database(error)
}

fn is_email_conflict(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db_error) => {
            db_error.is_unique_violation() && db_error.constraint() == Some(EMAIL_UNIQUE_INDEX)
        }
        _ => false,
    }
}

#[async_trait]
impl CustomerRepository for PostgresCustomerRepository {
    #[tracing::instrument(name = "Check whether an email is registered", skip(self))]
    async fn exists_by_email(&self, email: &CustomerEmail) -> Result<bool, RepositoryError> {
        sqlx::query_scalar::<_, bool>(
            r#"
                SELECT EXISTS (
                    SELECT 1 FROM customers WHERE LOWER(email_address) = LOWER($1)
                )
            "#,
        )
        .bind(email.as_ref())
        .fetch_one(&self.pool)
        .await
        .map_err(log_query_error)
    }

    #[tracing::instrument(name = "Fetch customer by email", skip(self))]
    async fn find_by_email(
        &self,
        email: &CustomerEmail,
    ) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r#"
                SELECT id, registered_at, email_address, title, first_name, last_name,
                       address_line_1, address_line_2, city, postcode, phone_number
                FROM customers
                WHERE LOWER(email_address) = LOWER($1)
            "#,
        )
        .bind(email.as_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(log_query_error)?;

        Ok(row.map(Customer::from))
    }

    #[tracing::instrument(name = "Fetch customer by id", skip(self))]
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r#"
                SELECT id, registered_at, email_address, title, first_name, last_name,
                       address_line_1, address_line_2, city, postcode, phone_number
                FROM customers
                WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(log_query_error)?;

        Ok(row.map(Customer::from))
    }

    #[tracing::instrument(
        name = "Saving new customer details in the database",
        skip(self, candidate),
        fields(customer_email = %candidate.details.email_address)
    )]
    async fn save(&self, candidate: &NewCustomer) -> Result<Customer, RepositoryError> {
        let details = &candidate.details;
        let row = sqlx::query_as::<_, CustomerRow>(
            r#"
                INSERT INTO customers (
                    registered_at, email_address, title, first_name, last_name,
                    address_line_1, address_line_2, city, postcode, phone_number
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                RETURNING id, registered_at, email_address, title, first_name, last_name,
                          address_line_1, address_line_2, city, postcode, phone_number
            "#,
        )
        .bind(candidate.registered_at())
        .bind(&details.email_address)
        .bind(&details.title)
        .bind(&details.first_name)
        .bind(&details.last_name)
        .bind(&details.address_line_1)
        .bind(&details.address_line_2)
        .bind(&details.city)
        .bind(&details.postcode)
        .bind(&details.phone_number)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            if is_email_conflict(&error) {
                tracing::info!("Insert rejected by the email uniqueness constraint");
                return RepositoryError::DuplicateEmail;
            }
            log_query_error(error)
        })?;

        Ok(row.into())
    }

    #[tracing::instrument(name = "Delete customer by id", skip(self))]
    async fn delete_by_id(&self, id: CustomerId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(log_query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    #[tracing::instrument(name = "Fetch all customers", skip(self))]
    async fn find_all(&self) -> Result<Vec<Customer>, RepositoryError> {
        let rows = sqlx::query_as::<_, CustomerRow>(
            r#"
                SELECT id, registered_at, email_address, title, first_name, last_name,
                       address_line_1, address_line_2, city, postcode, phone_number
                FROM customers
                ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(log_query_error)?;

        Ok(rows.into_iter().map(Customer::from).collect())
    }
}
