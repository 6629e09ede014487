//! Embedded `PostgreSQL` database lifecycle for store integration tests.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use pg_embedded_setup_unpriv::TestCluster;
use uuid::Uuid;

/// Schema applied to the template database.
const CREATE_COMPETITION_SQL: &str =
    include_str!("../../migrations/2026-10-01-000000_create_competition/up.sql");

/// Template database name for the pre-migrated schema.
pub const TEMPLATE_DB: &str = "jamboree_test_template";

/// Ensures the template database exists with the schema applied.
///
/// # Errors
///
/// Returns an error if template creation or migration fails.
pub fn ensure_template(cluster: &TestCluster) -> eyre::Result<()> {
    cluster
        .ensure_template_exists(TEMPLATE_DB, |db_name| {
            let url = cluster.connection().database_url(db_name);
            let mut conn = PgConnection::establish(&url).map_err(|e| eyre::eyre!("{e}"))?;
            conn.batch_execute(CREATE_COMPETITION_SQL)
                .map_err(|e| eyre::eyre!("migration failed: {e}"))?;
            Ok(())
        })
        .map_err(|e| eyre::eyre!("template setup failed: {e}"))
}

/// Database cloned from the template, dropped with the guard.
pub struct TemporaryDatabase {
    cluster: &'static TestCluster,
    name: String,
}

impl TemporaryDatabase {
    /// Clones the template into a uniquely named database.
    ///
    /// # Errors
    ///
    /// Returns an error if the template or the clone cannot be created.
    pub fn create(cluster: &'static TestCluster, prefix: &str) -> eyre::Result<Self> {
        ensure_template(cluster)?;
        let name = format!("{prefix}_{}", Uuid::new_v4().simple());
        cluster
            .create_database_from_template(name.as_str(), TEMPLATE_DB)
            .map_err(|e| eyre::eyre!("failed to create {name}: {e}"))?;
        Ok(Self { cluster, name })
    }

    /// Connection URL for the database.
    #[must_use]
    pub fn url(&self) -> String {
        self.cluster.connection().database_url(&self.name)
    }
}

impl Drop for TemporaryDatabase {
    fn drop(&mut self) {
        if let Err(err) = self.cluster.drop_database(self.name.as_str()) {
            tracing::warn!(database = %self.name, %err, "failed to drop test database");
        }
    }
}
