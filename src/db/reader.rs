use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::{debug, info};

use crate::db::models::{DbOverview, SampleRow, SnapshotRow};
use crate::error::{AppError, Result};
use crate::types::{Snapshot, TokenSnapshotRecord};

/// Rows shown by `inspect`.
const SAMPLE_LIMIT: i64 = 10;

/// Read-only access to the snapshot database.
///
/// Columns that can legitimately be unknown (tvl, impact, spread, top10)
/// come back as `None`; every other numeric NULL is defaulted to zero in SQL
/// before it reaches the scorer.
#[derive(Clone)]
pub struct SnapshotReader {
    pool: sqlx::SqlitePool,
}

impl SnapshotReader {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self { pool }
    }

    /// Open an existing database file read-only. Never creates the file.
    pub async fn open(db_path: &str) -> Result<Self> {
        if !Path::new(db_path).exists() {
            return Err(AppError::DbNotFound(db_path.to_string()));
        }
        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .read_only(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(2)
            .connect_with(options)
            .await?;
        info!("Database opened read-only at {db_path}");
        Ok(Self::new(pool))
    }

    /// Most recent snapshot timestamp, `None` if the table is empty.
    pub async fn latest_ts(&self) -> Result<Option<i64>> {
        let ts: Option<i64> =
            sqlx::query_scalar("SELECT CAST(MAX(ts) AS INTEGER) FROM snapshots")
                .fetch_one(&self.pool)
                .await?;
        Ok(ts)
    }

    /// Every token captured at `ts`, ordered by mint.
    pub async fn fetch_snapshot(&self, ts: i64) -> Result<Vec<TokenSnapshotRecord>> {
        let rows = sqlx::query_as::<_, SnapshotRow>(
            r#"
            SELECT s.mint AS mint,
                   COALESCE(s.symbol, t.symbol) AS symbol,
                   CAST(COALESCE(s.decimals, 0) AS INTEGER) AS decimals,
                   CAST(COALESCE(s.mint_authority_null, 0) AS INTEGER) AS mint_authority_null,
                   CAST(COALESCE(s.freeze_authority_null, 0) AS INTEGER) AS freeze_authority_null,
                   CAST(COALESCE(s.token2022_danger, 0) AS INTEGER) AS token2022_danger,
                   CAST(COALESCE(s.lp_verified, 0) AS INTEGER) AS lp_verified,
                   CAST(s.tvl_usd AS REAL) AS tvl_usd,
                   CAST(s.impact_1k_pct AS REAL) AS impact_1k_pct,
                   CAST(s.spread_pct AS REAL) AS spread_pct,
                   CAST(COALESCE(s.r_1m, 0.0) AS REAL) AS r_1m,
                   CAST(COALESCE(s.r_5m, 0.0) AS REAL) AS r_5m,
                   CAST(COALESCE(s.r_15m, 0.0) AS REAL) AS r_15m,
                   CAST(COALESCE(s.volume_5m, 0.0) AS REAL) AS volume_5m,
                   CAST(COALESCE(s.unique_buyers_5m, 0) AS INTEGER) AS unique_buyers_5m,
                   CAST(COALESCE(s.net_buy_usd_5m, 0.0) AS REAL) AS net_buy_usd_5m,
                   CAST(s.top10_pct AS REAL) AS top10_pct
            FROM snapshots s
            LEFT JOIN tokens t USING(mint)
            WHERE s.ts = ?
            ORDER BY s.mint
            "#,
        )
        .bind(ts)
        .fetch_all(&self.pool)
        .await?;

        debug!(ts, rows = rows.len(), "snapshot rows fetched");
        Ok(rows.into_iter().map(TokenSnapshotRecord::from).collect())
    }

    /// Latest snapshot, or `None` when nothing has been ingested yet.
    pub async fn fetch_latest(&self) -> Result<Option<Snapshot>> {
        let Some(ts) = self.latest_ts().await? else {
            return Ok(None);
        };
        let records = self.fetch_snapshot(ts).await?;
        Ok(Some(Snapshot { ts, records }))
    }

    /// Table list, latest timestamp, its row count, and a few sample rows.
    pub async fn overview(&self) -> Result<DbOverview> {
        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        if !tables.iter().any(|t| t == "snapshots") {
            return Ok(DbOverview {
                tables,
                ..DbOverview::default()
            });
        }

        let last_ts = self.latest_ts().await?;
        let Some(ts) = last_ts else {
            return Ok(DbOverview {
                tables,
                ..DbOverview::default()
            });
        };

        let rows_in_last_snapshot: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM snapshots WHERE ts = ?")
                .bind(ts)
                .fetch_one(&self.pool)
                .await?;

        let has_tokens = tables.iter().any(|t| t == "tokens");
        let sample_sql = if has_tokens {
            r#"
            SELECT s.mint AS mint,
                   COALESCE(s.symbol, t.symbol) AS symbol,
                   CAST(s.decimals AS INTEGER) AS decimals,
                   CAST(s.mint_authority_null AS INTEGER) AS mint_authority_null,
                   CAST(s.freeze_authority_null AS INTEGER) AS freeze_authority_null
            FROM snapshots s
            LEFT JOIN tokens t USING(mint)
            WHERE s.ts = ?
            ORDER BY s.mint
            LIMIT ?
            "#
        } else {
            r#"
            SELECT mint, symbol,
                   CAST(decimals AS INTEGER) AS decimals,
                   CAST(mint_authority_null AS INTEGER) AS mint_authority_null,
                   CAST(freeze_authority_null AS INTEGER) AS freeze_authority_null
            FROM snapshots
            WHERE ts = ?
            ORDER BY mint
            LIMIT ?
            "#
        };
        let sample = sqlx::query_as::<_, SampleRow>(sample_sql)
            .bind(ts)
            .bind(SAMPLE_LIMIT)
            .fetch_all(&self.pool)
            .await?;

        Ok(DbOverview {
            tables,
            last_ts,
            rows_in_last_snapshot,
            sample,
        })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use sqlx::sqlite::SqlitePoolOptions;

    pub const SCHEMA: &str = r#"
        CREATE TABLE tokens (
            mint TEXT PRIMARY KEY,
            symbol TEXT
        );
        CREATE TABLE snapshots (
            ts INTEGER NOT NULL,
            mint TEXT NOT NULL,
            symbol TEXT,
            decimals INTEGER,
            mint_authority_null INTEGER,
            freeze_authority_null INTEGER,
            token2022_danger INTEGER,
            lp_verified INTEGER,
            tvl_usd REAL,
            impact_1k_pct REAL,
            spread_pct REAL,
            r_1m REAL,
            r_5m REAL,
            r_15m REAL,
            volume_5m REAL,
            unique_buyers_5m INTEGER,
            net_buy_usd_5m REAL,
            top10_pct REAL,
            PRIMARY KEY (ts, mint)
        );
    "#;

    /// Single-connection in-memory pool so every query sees the same database.
    pub async fn memory_pool() -> sqlx::SqlitePool {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite")
    }

    pub async fn seeded_pool() -> sqlx::SqlitePool {
        let pool = memory_pool().await;
        sqlx::raw_sql(SCHEMA).execute(&pool).await.expect("schema");
        sqlx::raw_sql(
            r#"
            INSERT INTO tokens (mint, symbol) VALUES
                ('BBBmint', 'BEE'),
                ('CCCmint', 'FROMTOKENS');
            INSERT INTO snapshots VALUES
                (100, 'AAAmint', 'OLD', 6, 1, 1, 0, 1, 5000.0, 1.0, 0.1, 0, 0, 0, 10, 1, 10.0, 0.5);
            INSERT INTO snapshots VALUES
                (200, 'CCCmint', NULL, 9, 1, 0, 0, 1, 250000.0, -0.8, 0.2, 0.001, 0.01, 0.02, 1000, 40, 2500.0, 0.4),
                (200, 'BBBmint', 'SNAP', NULL, NULL, NULL, NULL, NULL, NULL, NULL, NULL, NULL, NULL, NULL, NULL, NULL, NULL, NULL),
                (200, 'DDDmint', NULL, 6, 1, 1, 0, 1, 0.0, 0.0, 0.0, 0, 0, 0, 0, 0, 0, 0.0);
            "#,
        )
        .execute(&pool)
        .await
        .expect("seed");
        pool
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{memory_pool, seeded_pool, SCHEMA};
    use super::*;

    #[tokio::test]
    async fn latest_ts_is_max() {
        let reader = SnapshotReader::new(seeded_pool().await);
        assert_eq!(reader.latest_ts().await.unwrap(), Some(200));
    }

    #[tokio::test]
    async fn empty_table_has_no_snapshot() {
        let pool = memory_pool().await;
        sqlx::raw_sql(SCHEMA).execute(&pool).await.unwrap();
        let reader = SnapshotReader::new(pool);
        assert_eq!(reader.latest_ts().await.unwrap(), None);
        assert!(reader.fetch_latest().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn fetch_latest_returns_only_latest_rows() {
        let reader = SnapshotReader::new(seeded_pool().await);
        let snap = reader.fetch_latest().await.unwrap().unwrap();
        assert_eq!(snap.ts, 200);
        let mints: Vec<_> = snap.records.iter().map(|r| r.mint.as_str()).collect();
        assert_eq!(mints, vec!["BBBmint", "CCCmint", "DDDmint"]);
    }

    #[tokio::test]
    async fn symbol_prefers_snapshot_then_tokens() {
        let reader = SnapshotReader::new(seeded_pool().await);
        let rows = reader.fetch_snapshot(200).await.unwrap();
        assert_eq!(rows[0].symbol.as_deref(), Some("SNAP"));
        assert_eq!(rows[1].symbol.as_deref(), Some("FROMTOKENS"));
        assert_eq!(rows[2].symbol, None);
    }

    #[tokio::test]
    async fn nulls_default_or_stay_missing() {
        let reader = SnapshotReader::new(seeded_pool().await);
        let rows = reader.fetch_snapshot(200).await.unwrap();
        let b = &rows[0];
        assert_eq!(b.decimals, 0);
        assert_eq!(b.lp_verified, 0);
        assert_eq!(b.r_5m, 0.0);
        assert_eq!(b.unique_buyers_5m, 0);
        assert_eq!(b.net_buy_usd_5m, 0.0);
        assert_eq!(b.tvl_usd, None);
        assert_eq!(b.impact_1k_pct, None);
        assert_eq!(b.spread_pct, None);
        assert_eq!(b.top10_pct, None);
    }

    #[tokio::test]
    async fn zero_is_not_confused_with_missing() {
        let reader = SnapshotReader::new(seeded_pool().await);
        let rows = reader.fetch_snapshot(200).await.unwrap();
        let d = &rows[2];
        assert_eq!(d.tvl_usd, Some(0.0));
        assert_eq!(d.impact_1k_pct, Some(0.0));
        assert_eq!(d.spread_pct, Some(0.0));
        assert_eq!(d.top10_pct, Some(0.0));
    }

    #[tokio::test]
    async fn integer_stored_reals_decode_as_floats() {
        let reader = SnapshotReader::new(seeded_pool().await);
        let rows = reader.fetch_snapshot(200).await.unwrap();
        let c = &rows[1];
        assert_eq!(c.volume_5m, 1000.0);
        assert_eq!(c.impact_1k_pct, Some(-0.8));
        assert_eq!(c.unique_buyers_5m, 40);
    }

    #[tokio::test]
    async fn unknown_ts_is_empty() {
        let reader = SnapshotReader::new(seeded_pool().await);
        assert!(reader.fetch_snapshot(999).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn open_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.db");
        let err = SnapshotReader::open(path.to_str().unwrap()).await.err().unwrap();
        assert!(matches!(err, AppError::DbNotFound(_)));
        assert_eq!(err.exit_code(), 2);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn overview_reports_tables_and_sample() {
        let reader = SnapshotReader::new(seeded_pool().await);
        let o = reader.overview().await.unwrap();
        assert_eq!(o.tables, vec!["snapshots".to_string(), "tokens".to_string()]);
        assert_eq!(o.last_ts, Some(200));
        assert_eq!(o.rows_in_last_snapshot, 3);
        assert_eq!(o.sample.len(), 3);
        assert_eq!(o.sample[0].mint, "BBBmint");
        assert_eq!(o.sample[0].decimals, None);
        assert_eq!(o.sample[1].symbol.as_deref(), Some("FROMTOKENS"));
    }

    #[tokio::test]
    async fn overview_without_snapshots_table() {
        let reader = SnapshotReader::new(memory_pool().await);
        let o = reader.overview().await.unwrap();
        assert!(o.tables.is_empty());
        assert_eq!(o.last_ts, None);
        assert_eq!(o.rows_in_last_snapshot, 0);
    }
}
