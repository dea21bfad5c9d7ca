mod customer;
mod customer_email;
mod validation;

pub use customer::{Customer, CustomerDetails, CustomerId, NewCustomer};
pub use customer_email::CustomerEmail;
pub use validation::{FieldErrors, FieldRule};
