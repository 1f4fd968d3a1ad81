//! Schema migrations embedded at compile time from `migrations/`.
//!
//! Applied once at boot (see `app::run`), the same way a framework package
//! registers its migration path and lets the host run it.
use sqlx::PgPool;
use sqlx::migrate::{MigrateError, Migrator};

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub async fn run(db: &PgPool) -> Result<(), MigrateError> {
    MIGRATOR.run(db).await?;
    tracing::info!(count = MIGRATOR.iter().count(), "migrations applied");
    Ok(())
}

#[cfg(test)]
mod tests {
    use sqlx::migrate::MigrationType;

    use super::*;

    const API_TOKEN_VERSION: i64 = 20240430000000;

    #[test]
    fn api_token_migration_adds_a_unique_nullable_column() {
        let up = MIGRATOR
            .iter()
            .find(|m| {
                m.version == API_TOKEN_VERSION
                    && matches!(m.migration_type, MigrationType::ReversibleUp)
            })
            .expect("api_token up migration");

        assert!(up.sql.contains("ADD COLUMN api_token VARCHAR(80) NULL DEFAULT NULL"));
        assert!(up.sql.contains("UNIQUE (api_token)"));
    }

    #[test]
    fn api_token_migration_is_reversible() {
        let down = MIGRATOR
            .iter()
            .find(|m| {
                m.version == API_TOKEN_VERSION
                    && matches!(m.migration_type, MigrationType::ReversibleDown)
            })
            .expect("api_token down migration");

        assert!(down.sql.contains("DROP COLUMN api_token"));
    }

    #[test]
    fn users_table_is_created_first() {
        let mut versions: Vec<i64> = MIGRATOR
            .iter()
            .filter(|m| matches!(m.migration_type, MigrationType::ReversibleUp))
            .map(|m| m.version)
            .collect();
        versions.sort_unstable();

        assert_eq!(versions, vec![20240101000000, API_TOKEN_VERSION]);
    }
}
