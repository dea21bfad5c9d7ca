use tokio::net::TcpListener;

use registration::configuration::get_configuration;
use registration::startup::{get_app_state, get_connection_pool, run};
use registration::telemetry::{get_subscriber, initialize_subscriber};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let subscriber = get_subscriber("registration".into(), "info".into(), std::io::stdout);
    initialize_subscriber(subscriber);

    let configuration = get_configuration().expect("Failed to read configuration");

    let pool = get_connection_pool(&configuration.database)
        .expect("Failed to configure the Postgres connection pool");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate the database");

    let listener = TcpListener::bind(configuration.application.address())
        .await
        .expect("Failed to bind a port for application");
    tracing::info!(
        address = %configuration.application.address(),
        "Listening for registration requests"
    );

    run(listener, get_app_state(pool)).await
}
