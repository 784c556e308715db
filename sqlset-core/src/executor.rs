//! Execution boundary: hand rendered statements to a connection pool

use crate::builder::{IntoInsertData, IntoUpdateData};
use crate::{Dataset, Error, Result, Value};
use serde::de::DeserializeOwned;
use std::future::Future;

/// Trait for database connection pools
///
/// Implementations receive finished SQL plus the bound arguments in
/// placeholder order. Rows come back as JSON objects keyed by column name
/// and are decoded with [`decode_row`].
pub trait ConnectionPool: Send + Sync + Clone {
    /// Execute a statement that returns no rows (INSERT, UPDATE, DELETE)
    fn execute(&self, sql: &str, params: &[Value]) -> impl Future<Output = Result<u64>> + Send;

    /// Execute a query that returns multiple rows
    fn fetch_all<T>(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = Result<Vec<T>>> + Send
    where
        T: DeserializeOwned + Send + Unpin;

    /// Execute a query that returns a single row
    fn fetch_one<T>(&self, sql: &str, params: &[Value]) -> impl Future<Output = Result<T>> + Send
    where
        T: DeserializeOwned + Send + Unpin;

    /// Execute a query that returns an optional row
    fn fetch_optional<T>(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = Result<Option<T>>> + Send
    where
        T: DeserializeOwned + Send + Unpin;
}

/// Decode a JSON row into `T`
pub fn decode_row<T: DeserializeOwned>(row: serde_json::Value) -> Result<T> {
    serde_json::from_value(row).map_err(|e| Error::RowDecode(e.to_string()))
}

/// Extension trait running a dataset against a pool
///
/// The statement is rendered before the returned future is first polled, so
/// rendering errors surface without touching the pool. Whether values are
/// inlined or bound follows the dataset's prepared flag.
pub trait ExecutableDataset {
    /// Run the SELECT and return all rows
    fn fetch_all<T, P>(&self, pool: &P) -> impl Future<Output = Result<Vec<T>>> + Send
    where
        P: ConnectionPool,
        T: DeserializeOwned + Send + Unpin;

    /// Run the SELECT and return the first row
    fn fetch_one<T, P>(&self, pool: &P) -> impl Future<Output = Result<T>> + Send
    where
        P: ConnectionPool,
        T: DeserializeOwned + Send + Unpin;

    /// Run the SELECT and return the first row if any
    fn fetch_optional<T, P>(&self, pool: &P) -> impl Future<Output = Result<Option<T>>> + Send
    where
        P: ConnectionPool,
        T: DeserializeOwned + Send + Unpin;

    /// Insert rows into the dataset's source, returning the affected row count
    fn insert<P, D>(&self, pool: &P, data: D) -> impl Future<Output = Result<u64>> + Send
    where
        P: ConnectionPool,
        D: IntoInsertData;

    /// Update the rows matched by the dataset
    fn update<P, D>(&self, pool: &P, data: D) -> impl Future<Output = Result<u64>> + Send
    where
        P: ConnectionPool,
        D: IntoUpdateData;

    /// Delete the rows matched by the dataset
    fn delete<P>(&self, pool: &P) -> impl Future<Output = Result<u64>> + Send
    where
        P: ConnectionPool;
}

impl ExecutableDataset for Dataset {
    fn fetch_all<T, P>(&self, pool: &P) -> impl Future<Output = Result<Vec<T>>> + Send
    where
        P: ConnectionPool,
        T: DeserializeOwned + Send + Unpin,
    {
        let rendered = self.to_sql();
        async move {
            let (sql, args) = rendered?;
            tracing::debug!(sql = %sql, "fetch_all");
            pool.fetch_all(&sql, &args).await
        }
    }

    fn fetch_one<T, P>(&self, pool: &P) -> impl Future<Output = Result<T>> + Send
    where
        P: ConnectionPool,
        T: DeserializeOwned + Send + Unpin,
    {
        let rendered = self.to_sql();
        async move {
            let (sql, args) = rendered?;
            tracing::debug!(sql = %sql, "fetch_one");
            pool.fetch_one(&sql, &args).await
        }
    }

    fn fetch_optional<T, P>(&self, pool: &P) -> impl Future<Output = Result<Option<T>>> + Send
    where
        P: ConnectionPool,
        T: DeserializeOwned + Send + Unpin,
    {
        let rendered = self.to_sql();
        async move {
            let (sql, args) = rendered?;
            tracing::debug!(sql = %sql, "fetch_optional");
            pool.fetch_optional(&sql, &args).await
        }
    }

    fn insert<P, D>(&self, pool: &P, data: D) -> impl Future<Output = Result<u64>> + Send
    where
        P: ConnectionPool,
        D: IntoInsertData,
    {
        let rendered = self.to_insert_sql(data);
        async move {
            let (sql, args) = rendered?;
            tracing::debug!(sql = %sql, "insert");
            pool.execute(&sql, &args).await
        }
    }

    fn update<P, D>(&self, pool: &P, data: D) -> impl Future<Output = Result<u64>> + Send
    where
        P: ConnectionPool,
        D: IntoUpdateData,
    {
        let rendered = self.to_update_sql(data);
        async move {
            let (sql, args) = rendered?;
            tracing::debug!(sql = %sql, "update");
            pool.execute(&sql, &args).await
        }
    }

    fn delete<P>(&self, pool: &P) -> impl Future<Output = Result<u64>> + Send
    where
        P: ConnectionPool,
    {
        let rendered = self.to_delete_sql();
        async move {
            let (sql, args) = rendered?;
            tracing::debug!(sql = %sql, "delete");
            pool.execute(&sql, &args).await
        }
    }
}

/// SQLx PostgreSQL pool
#[cfg(feature = "postgres")]
pub mod postgres {
    use super::*;
    use sqlx::postgres::{PgArguments, PgRow};
    use sqlx::query::Query;
    use sqlx::{Column, PgPool, Postgres, Row, TypeInfo};

    /// PostgreSQL connection pool wrapper
    #[derive(Clone)]
    pub struct PostgresPool {
        inner: PgPool,
    }

    impl PostgresPool {
        /// Create a new PostgreSQL pool from a connection string
        pub async fn new(database_url: &str) -> Result<Self> {
            let pool = PgPool::connect(database_url).await?;
            Ok(Self { inner: pool })
        }

        /// Create from an existing PgPool
        pub fn from_pool(pool: PgPool) -> Self {
            Self { inner: pool }
        }
    }

    impl ConnectionPool for PostgresPool {
        async fn execute(&self, sql: &str, params: &[Value]) -> Result<u64> {
            let query = bind_values(sqlx::query(sql), params)?;
            let result = query.execute(&self.inner).await?;
            Ok(result.rows_affected())
        }

        async fn fetch_all<T>(&self, sql: &str, params: &[Value]) -> Result<Vec<T>>
        where
            T: DeserializeOwned + Send + Unpin,
        {
            let query = bind_values(sqlx::query(sql), params)?;
            let rows = query.fetch_all(&self.inner).await?;
            rows.iter()
                .map(|row| decode_row(row_to_json(row)?))
                .collect()
        }

        async fn fetch_one<T>(&self, sql: &str, params: &[Value]) -> Result<T>
        where
            T: DeserializeOwned + Send + Unpin,
        {
            let query = bind_values(sqlx::query(sql), params)?;
            let row = query.fetch_one(&self.inner).await?;
            decode_row(row_to_json(&row)?)
        }

        async fn fetch_optional<T>(&self, sql: &str, params: &[Value]) -> Result<Option<T>>
        where
            T: DeserializeOwned + Send + Unpin,
        {
            let query = bind_values(sqlx::query(sql), params)?;
            match query.fetch_optional(&self.inner).await? {
                Some(row) => Ok(Some(decode_row(row_to_json(&row)?)?)),
                None => Ok(None),
            }
        }
    }

    /// Bind dataset arguments to a SQLx query
    fn bind_values<'q>(
        mut query: Query<'q, Postgres, PgArguments>,
        params: &'q [Value],
    ) -> Result<Query<'q, Postgres, PgArguments>> {
        for param in params {
            query = match param {
                Value::Null => query.bind(None::<i32>),
                Value::Bool(b) => query.bind(*b),
                Value::I32(i) => query.bind(*i),
                Value::I64(i) => query.bind(*i),
                // postgres has no unsigned integers
                Value::U64(u) => {
                    let i = i64::try_from(*u).map_err(|_| Error::unsupported_value(u.to_string()))?;
                    query.bind(i)
                }
                Value::F32(f) => query.bind(*f),
                Value::F64(f) => query.bind(*f),
                Value::String(s) => query.bind(s.as_str()),
                Value::Bytes(b) => query.bind(b.as_slice()),
                Value::Json(j) => query.bind(j.clone()),
                Value::Timestamp(ts) => query.bind(*ts),
                Value::Array(_) => query.bind(param.to_json()),
                #[cfg(feature = "uuid-support")]
                Value::Uuid(u) => query.bind(*u),
                #[cfg(feature = "decimal-support")]
                Value::Decimal(d) => query.bind(*d),
            };
        }
        Ok(query)
    }

    fn to_json<T: serde::Serialize>(value: Option<T>) -> serde_json::Value {
        serde_json::to_value(value).unwrap_or(serde_json::Value::Null)
    }

    /// Convert a row into a JSON object keyed by column name
    fn row_to_json(row: &PgRow) -> Result<serde_json::Value> {
        let mut object = serde_json::Map::with_capacity(row.columns().len());
        for column in row.columns() {
            let idx = column.ordinal();
            let value = match column.type_info().name() {
                "BOOL" => to_json(row.try_get::<Option<bool>, _>(idx)?),
                "INT2" => to_json(row.try_get::<Option<i16>, _>(idx)?),
                "INT4" => to_json(row.try_get::<Option<i32>, _>(idx)?),
                "INT8" => to_json(row.try_get::<Option<i64>, _>(idx)?),
                "FLOAT4" => to_json(row.try_get::<Option<f32>, _>(idx)?),
                "FLOAT8" => to_json(row.try_get::<Option<f64>, _>(idx)?),
                "JSON" | "JSONB" => row
                    .try_get::<Option<serde_json::Value>, _>(idx)?
                    .unwrap_or(serde_json::Value::Null),
                "TIMESTAMPTZ" => {
                    to_json(row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(idx)?)
                }
                "TIMESTAMP" => to_json(row.try_get::<Option<chrono::NaiveDateTime>, _>(idx)?),
                "DATE" => to_json(row.try_get::<Option<chrono::NaiveDate>, _>(idx)?),
                #[cfg(feature = "uuid-support")]
                "UUID" => to_json(row.try_get::<Option<uuid::Uuid>, _>(idx)?),
                #[cfg(feature = "decimal-support")]
                "NUMERIC" => to_json(row.try_get::<Option<rust_decimal::Decimal>, _>(idx)?),
                other => match row.try_get::<Option<String>, _>(idx) {
                    Ok(text) => to_json(text),
                    Err(_) => {
                        tracing::trace!(column = column.name(), kind = other, "undecodable column");
                        serde_json::Value::Null
                    }
                },
            };
            object.insert(column.name().to_string(), value);
        }
        Ok(serde_json::Value::Object(object))
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_bind_rejects_oversized_unsigned() {
            let params = [Value::U64(u64::MAX)];
            let err = bind_values(sqlx::query("SELECT $1"), &params).err();
            assert!(matches!(err, Some(Error::UnsupportedValueType { .. })));
        }
    }
}
