use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use once_cell::sync::Lazy;
use reqwest::{redirect, Client, Method, Response};
use secrecy::ExposeSecret;
use serde::Serialize;
use sqlx::{Connection, Executor, PgConnection, Pool, Postgres};
use tokio::net::TcpListener;
use uuid::Uuid;

use registration::{configuration, startup, telemetry};

static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber =
            telemetry::get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        telemetry::initialize_subscriber(subscriber);
    } else {
        let subscriber =
            telemetry::get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        telemetry::initialize_subscriber(subscriber);
    };
});

pub struct App {
    pub address: SocketAddr,
    pub client: Client,
    pub pool: Pool<Postgres>,
}

impl App {
    pub async fn new() -> Self {
        Lazy::force(&TRACING);

        // configure listener
        let listener = TcpListener::bind(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 0))
            .await
            .expect("Failed to start an test application");
        let address = listener.local_addr().unwrap();

        // get configuration and randomise database name
        let mut configuration =
            configuration::get_configuration().expect("Failed to read configuration");
        configuration.database.database = Uuid::new_v4().to_string();

        // initialise randomise database
        App::initialise_database(&configuration).await;

        // get database pool and migrate it
        let pool = startup::get_connection_pool(&configuration.database)
            .expect("Failed to configure the database pool");
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to migrate the database");

        // start a server
        tokio::spawn(startup::run(listener, startup::get_app_state(pool.clone())));

        // redirects are asserted on, not followed
        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .cookie_store(true)
            .build()
            .unwrap();

        App {
            address,
            client,
            pool,
        }
    }

    async fn initialise_database(configuration: &configuration::Settings) {
        // create a connection to postgres database
        // and create randomised database
        let mut connection = PgConnection::connect(
            configuration
                .database
                .connection_string_without_database()
                .expose_secret(),
        )
        .await
        .expect("Failed to connect to Postgres");

        connection
            .execute(format!(r#"CREATE DATABASE "{}";"#, configuration.database.database).as_str())
            .await
            .expect("Failed to create database.");
    }
}

impl App {
    pub fn build_request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("http://{}{}", self.address, path);

        if method == Method::GET {
            self.client.get(url)
        } else if method == Method::POST {
            self.client.post(url)
        } else {
            panic!("No implementation for this request method {}", method)
        }
    }

    pub async fn get(&self, path: &str) -> Response {
        self.build_request(Method::GET, path).send().await.unwrap()
    }

    pub async fn get_health_check(&self) -> Response {
        self.get("/health_check").await
    }

    pub async fn post_registration<T: Serialize + ?Sized>(&self, parameter: &T) -> Response {
        self.build_request(Method::POST, "/registration")
            .form(parameter)
            .send()
            .await
            .unwrap()
    }

    pub async fn get_check_email(&self, email: &str) -> Response {
        self.build_request(Method::GET, "/check-email")
            .query(&[("email", email)])
            .send()
            .await
            .unwrap()
    }

    pub async fn customer_count(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await
            .expect("Failed to count customers")
    }
}

pub fn jane_doe(email: &str) -> Vec<(&'static str, String)> {
    vec![
        ("email_address", email.to_string()),
        ("title", "Ms".to_string()),
        ("first_name", "Jane".to_string()),
        ("last_name", "Doe".to_string()),
        ("address_line_1", "1 Road".to_string()),
        ("postcode", "AB1 2CD".to_string()),
    ]
}

pub fn assert_is_redirect_to(response: &Response, location: &str) {
    assert_eq!(response.status().as_u16(), 303);
    assert_eq!(response.headers()["Location"], location);
}
