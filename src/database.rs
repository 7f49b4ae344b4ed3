use serde::Deserialize;
use snafu::{Location, ResultExt as _, Snafu};
use surrealdb::engine::any::Any;
use surrealdb::opt::{auth, IntoQuery};
use surrealdb::Surreal;

/// Helper for executing arbitrary SurrealQL queries.
pub mod query;

/// Typed record ids.
pub mod record;

/// Macros for defining table methods.
pub mod macros;

pub use query::{Bindings, DatabaseQueryError, Violation};
pub use record::Record;
pub use surrealdb::sql::Thing;

const SETUP: &str = include_str!("../schema.surrealql");

const MEMORY_URL: &str = "mem://";

pub type Result<T, E = DatabaseError> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum DatabaseError {
    #[snafu(display("cannot connect to the database `{url}`: {source}"))]
    Connect {
        url: String,
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("cannot sign in to the database as `{username}`: {source}"))]
    SignIn {
        username: String,
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("cannot select namespace `{namespace}` and database `{database}`: {source}"))]
    Select {
        namespace: String,
        database: String,
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("cannot apply the database schema: {source}"))]
    Schema {
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },
}

/// Represents a type that is stored in its own table.
pub trait Table {
    /// Returns the name of the table associated with the record.
    fn table() -> &'static str;
}

/// A cheap, cloneable handle to the SurrealDB connection.
#[derive(Debug, Clone)]
pub struct Database {
    database: Surreal<Any>,
}

impl Database {
    /// Connects to the database described by the configuration and applies the schema.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let database = surrealdb::engine::any::connect(config.url.as_str())
            .await
            .context(ConnectSnafu {
                url: config.url.to_string(),
            })?;

        if let Some(credentials) = &config.credentials {
            database
                .signin(credentials.auth(&config.namespace, &config.database))
                .await
                .context(SignInSnafu {
                    username: credentials.username.clone(),
                })?;
        }

        Self::prepare(database, &config.namespace, &config.database).await
    }

    /// Opens a fresh in-memory database with the schema applied.
    pub async fn memory() -> Result<Self> {
        let database = surrealdb::engine::any::connect(MEMORY_URL)
            .await
            .context(ConnectSnafu { url: MEMORY_URL })?;

        Self::prepare(database, "reels", "reels").await
    }

    async fn prepare(database: Surreal<Any>, namespace: &str, name: &str) -> Result<Self> {
        database
            .use_ns(namespace)
            .use_db(name)
            .await
            .context(SelectSnafu {
                namespace,
                database: name,
            })?;

        database
            .query(SETUP)
            .await
            .and_then(|response| response.check())
            .context(SchemaSnafu)?;

        tracing::debug!(namespace, database = name, "applied database schema");

        Ok(Self { database })
    }

    /// Create a builder to execute arbitrary SQL code on the database.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let likes: Vec<Like> = db
    ///     .sql("SELECT * FROM likes WHERE video = $video")
    ///     .bind(("video", &video))
    ///     .fetch_first()
    ///     .await?;
    /// ```
    pub fn sql(&self, query: impl IntoQuery) -> Bindings<'_> {
        Bindings::new(self.database.query(query))
    }
}

impl std::ops::Deref for Database {
    type Target = Surreal<Any>;

    fn deref(&self) -> &Self::Target {
        &self.database
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    #[serde(rename = "surreal_url")]
    pub url: url::Url,
    #[serde(rename = "surreal_ns", default = "default_namespace")]
    pub namespace: String,
    #[serde(rename = "surreal_db", default = "default_database")]
    pub database: String,
    #[serde(flatten)]
    pub credentials: Option<DatabaseCredentials>,
}

fn default_namespace() -> String {
    "reels".to_string()
}

fn default_database() -> String {
    "reels".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseCredentials {
    #[serde(rename = "surreal_user")]
    username: String,
    #[serde(rename = "surreal_pass")]
    password: String,
}

impl DatabaseCredentials {
    fn auth<'a>(
        &'a self,
        namespace: &'a str,
        database: &'a str,
    ) -> impl auth::Credentials<auth::Signin, auth::Jwt> + 'a {
        auth::Database {
            namespace,
            database,
            username: &self.username,
            password: &self.password,
        }
    }
}
