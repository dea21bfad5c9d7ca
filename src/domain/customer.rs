use std::fmt::Display;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// Surrogate key assigned by the database when a customer is stored.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct CustomerId(i64);

impl CustomerId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }
}

impl Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The user-supplied attributes of a customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerDetails {
    pub email_address: String,
    pub title: String,
    pub first_name: String,
    pub last_name: String,
    pub address_line_1: String,
    pub address_line_2: Option<String>,
    pub city: Option<String>,
    pub postcode: String,
    pub phone_number: Option<String>,
}

/// A candidate record built from form input and not yet persisted.
///
/// The registration timestamp is captured here, at construction, and travels
/// unchanged into the stored record. It is truncated to microseconds, the
/// precision Postgres keeps, so the stored value equals the constructed one.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    registered_at: DateTime<Utc>,
    pub details: CustomerDetails,
}

impl NewCustomer {
    pub fn new(details: CustomerDetails) -> Self {
        Self {
            registered_at: Utc::now().trunc_subsecs(6),
            details,
        }
    }

    pub fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }
}

/// A stored customer. Only the repository can create one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    id: CustomerId,
    registered_at: DateTime<Utc>,
    pub details: CustomerDetails,
}

impl Customer {
    pub(crate) fn from_parts(
        id: CustomerId,
        registered_at: DateTime<Utc>,
        details: CustomerDetails,
    ) -> Self {
        Self {
            id,
            registered_at,
            details,
        }
    }

    pub fn id(&self) -> CustomerId {
        self.id
    }

    pub fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.details.first_name, self.details.last_name)
    }
}
