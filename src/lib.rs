pub mod configuration;
pub mod domain;
pub mod flash;
pub mod repository;
pub mod routes;
pub mod service;
pub mod startup;
pub mod telemetry;
pub mod utils;
