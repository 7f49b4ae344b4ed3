use serde::de::DeserializeOwned;
use snafu::{Location, OptionExt as _, ResultExt as _, Snafu};
use surrealdb::error::{Api, Db};
use surrealdb::opt::QueryResult;

/// Prefix the remote engines put in front of a `THROW` message.
const THROWN_PREFIX: &str = "An error occurred: ";

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum DatabaseQueryError {
    #[snafu(display("failed to send the query to the database: {source}"))]
    MalformedQuery {
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("statement #{index} failed: {source}"))]
    Statement {
        index: usize,
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("failed to deserialize the database response: {source}"))]
    Deserialize {
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("the query did not produce any result"))]
    NoResults {
        #[snafu(implicit)]
        location: Location,
    },
}

impl DatabaseQueryError {
    /// Returns the constraint the failed statement ran into, if it was one the caller can act on.
    pub fn violation(&self) -> Option<Violation> {
        match self {
            Self::Statement { source, .. } => Violation::classify(source),
            _ => None,
        }
    }
}

/// A statement failure that carries meaning for the caller, as opposed to an infrastructure error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// The query raised an error with `THROW`.
    Thrown(String),
    /// A `UNIQUE` index already contains the value.
    UniqueIndex,
}

impl Violation {
    pub fn classify(error: &surrealdb::Error) -> Option<Self> {
        match error {
            surrealdb::Error::Db(Db::Thrown(message)) => Some(Self::Thrown(message.clone())),
            surrealdb::Error::Db(Db::IndexExists { .. }) => Some(Self::UniqueIndex),
            // remote engines only hand back the rendered message
            surrealdb::Error::Api(Api::Query(message)) => {
                if let Some(thrown) = message.strip_prefix(THROWN_PREFIX) {
                    Some(Self::Thrown(thrown.trim_matches('\'').to_string()))
                } else if message.contains("already contains") {
                    Some(Self::UniqueIndex)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    pub fn is_thrown(&self, expected: &str) -> bool {
        matches!(self, Self::Thrown(message) if message.contains(expected))
    }
}

/// A query waiting for its parameters. Parameters can be bound using [Bindings::bind] which takes any serializable data structure.
///
/// # Example
/// ```ignore
/// let comments: Vec<Comment> = database.sql("SELECT * FROM comments WHERE video = $video")
///     .bind(("video", &video))
///     .fetch_first()
///     .await?;
/// ```
#[derive(Debug)]
pub struct Bindings<'a> {
    query: surrealdb::method::Query<'a, surrealdb::engine::any::Any>,
}

impl<'a> Bindings<'a> {
    pub(super) fn new(query: surrealdb::method::Query<'a, surrealdb::engine::any::Any>) -> Self {
        Self { query }
    }

    pub fn bind(mut self, params: impl serde::Serialize) -> Self {
        let query = self.query;
        self.query = query.bind(params);
        self
    }

    /// Execute the query and return a [surrealdb::Response] which is SurrealDB's way to represent a list of statements returned from the database.
    ///
    /// Fails if any statement failed. Inside a transaction every statement reports an error once one of them fails,
    /// so the error that explains the failure is preferred over the "not executed" ones.
    pub async fn execute(self) -> Result<surrealdb::Response, DatabaseQueryError> {
        let mut response = self.query.await.context(MalformedQuerySnafu)?;

        let mut errors: Vec<(usize, surrealdb::Error)> =
            response.take_errors().into_iter().collect();

        if errors.is_empty() {
            tracing::trace!(statements = response.num_statements(), "executed query");
            return Ok(response);
        }

        errors.sort_by_key(|(index, _)| *index);
        let cause = errors
            .iter()
            .position(|(_, error)| Violation::classify(error).is_some())
            .unwrap_or(0);
        let (index, source) = errors.swap_remove(cause);

        Err(source).context(StatementSnafu { index })
    }

    /// Execute the query and return the first result as a deserialized value.
    pub async fn fetch_first<T: DeserializeOwned>(self) -> Result<T, DatabaseQueryError>
    where
        usize: QueryResult<T>,
    {
        let mut statements = self.execute().await?;
        statements.take::<T>(0).context(DeserializeSnafu)
    }

    /// Execute the queries and return the result of the last statement, which is what a transaction block produces.
    pub async fn fetch_last<T: DeserializeOwned>(self) -> Result<T, DatabaseQueryError>
    where
        usize: QueryResult<T>,
    {
        let mut statements = self.execute().await?;
        let last = statements.num_statements().checked_sub(1).context(NoResultsSnafu)?;
        statements.take::<T>(last).context(DeserializeSnafu)
    }
}
