use sqlx::{PgPool, postgres::PgPoolOptions};
use std::time::Duration;

use crate::config::Config;

/// Pool sizing from config. The minimum is capped at the maximum so a bad
/// `DB_MIN_CONNECTIONS` cannot stall startup.
pub fn pool_options(config: &Config) -> PgPoolOptions {
    let max = config.db_max_connections.max(1);

    PgPoolOptions::new()
        .max_connections(max)
        .min_connections(config.db_min_connections.min(max))
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
}

pub async fn create_pool(config: &Config) -> Result<PgPool, sqlx::Error> {
    let pool = pool_options(config).connect(&config.database_url).await?;
    tracing::info!(
        max_connections = config.db_max_connections,
        "Database pool ready"
    );

    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(max: u32, min: u32) -> Config {
        Config {
            database_url: "postgres://localhost/forum".to_string(),
            jwt_secret: "secret".to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
            allowed_origins: Vec::new(),
            db_max_connections: max,
            db_min_connections: min,
        }
    }

    #[test]
    fn pool_options_follow_config() {
        let options = pool_options(&config(8, 3));

        assert_eq!(options.get_max_connections(), 8);
        assert_eq!(options.get_min_connections(), 3);
    }

    #[test]
    fn min_connections_never_exceed_max() {
        let options = pool_options(&config(0, 5));

        assert_eq!(options.get_max_connections(), 1);
        assert_eq!(options.get_min_connections(), 1);
    }
}
