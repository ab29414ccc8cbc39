//! Append-only store of soil report submissions
//!
//! Ids come from SQLite's `AUTOINCREMENT`, so concurrent inserts never share
//! an id and ids keep growing across restarts.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::SqlitePool;

use crate::error::{AppError, AppResult};
use shared::{NewReport, NutrientLevel, ReportRecord, ReportRow, SoilSample};

/// Report store backed by SQLite
#[derive(Clone)]
pub struct ReportStore {
    db: SqlitePool,
}

/// Database row for a soil report
#[derive(Debug, sqlx::FromRow)]
struct SoilReportRow {
    id: i64,
    farmer_name: String,
    ph_level: String,
    nitrogen: String,
    phosphorus: String,
    potassium: String,
    organic_carbon: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<SoilReportRow> for ReportRecord {
    type Error = AppError;

    fn try_from(row: SoilReportRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let corrupt = |field: &str| AppError::Internal(format!("Corrupt {} in report {}", field, id));

        let ph_level: Decimal = row.ph_level.parse().map_err(|_| corrupt("ph_level"))?;
        let level = |value: &str, field: &str| {
            value.parse::<NutrientLevel>().map_err(|_| corrupt(field))
        };

        Ok(ReportRecord {
            id,
            farmer_name: row.farmer_name,
            sample: SoilSample {
                ph_level,
                nitrogen: level(&row.nitrogen, "nitrogen")?,
                phosphorus: level(&row.phosphorus, "phosphorus")?,
                potassium: level(&row.potassium, "potassium")?,
                organic_carbon: level(&row.organic_carbon, "organic_carbon")?,
            },
            created_at: row.created_at,
        })
    }
}

impl ReportStore {
    /// Create a new ReportStore instance
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Append a report and return its assigned id
    pub async fn insert(&self, report: &NewReport) -> AppResult<i64> {
        let sample = &report.sample;
        let created_at = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO soil_reports (
                farmer_name, ph_level, nitrogen, phosphorus, potassium, organic_carbon, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&report.farmer_name)
        .bind(sample.ph_level.to_string())
        .bind(sample.nitrogen.as_str())
        .bind(sample.phosphorus.as_str())
        .bind(sample.potassium.as_str())
        .bind(sample.organic_carbon.as_str())
        .bind(created_at)
        .execute(&self.db)
        .await?;

        let id = result.last_insert_rowid();
        tracing::info!(report_id = id, "soil report stored");
        Ok(id)
    }

    /// Most recently inserted reports, newest first
    pub async fn recent_reports(&self, limit: u32) -> AppResult<Vec<ReportRecord>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, SoilReportRow>(
            r#"
            SELECT id, farmer_name, ph_level, nitrogen, phosphorus, potassium,
                   organic_carbon, created_at
            FROM soil_reports
            ORDER BY id DESC
            LIMIT ?
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(ReportRecord::try_from).collect()
    }

    /// Total number of stored reports
    pub async fn count(&self) -> AppResult<i64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM soil_reports")
            .fetch_one(&self.db)
            .await?;
        Ok(total)
    }

    /// Render the most recent reports as CSV
    pub async fn export_csv(&self, limit: u32) -> AppResult<String> {
        let records = self.recent_reports(limit).await?;
        let rows: Vec<ReportRow> = records.iter().map(ReportRow::from).collect();
        export_to_csv(&rows)
    }

    /// Close the underlying pool
    pub async fn close(&self) {
        self.db.close().await;
    }
}

/// Serialize rows to CSV text
pub fn export_to_csv<T: serde::Serialize>(data: &[T]) -> AppResult<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for record in data {
        wtr.serialize(record)
            .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))
}
