//! `SQLite` implementation of [`SubmissionWindowRepository`] over `config_envios`.

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use plan_accion_app::ports::SubmissionWindowRepository;
use plan_accion_domain::error::PlanError;
use plan_accion_domain::id::WindowId;
use plan_accion_domain::period::Period;
use plan_accion_domain::submission_window::{NewSubmissionWindow, SubmissionWindow};
use plan_accion_domain::time;

use crate::decode;
use crate::error::db;

struct Wrapper(SubmissionWindow);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(SubmissionWindow {
            id: WindowId::new(row.try_get("id")?),
            period: decode::period(row)?,
            opens_at: decode::timestamp(row, "fecha_inicio")?,
            closes_at: decode::timestamp(row, "fecha_fin")?,
            created_at: decode::timestamp(row, "creado_en")?,
        }))
    }
}

const INSERT: &str = "INSERT INTO config_envios (trimestre, anio, fecha_inicio, fecha_fin, creado_en) VALUES (?, ?, ?, ?, ?) RETURNING *";
const SELECT_ALL: &str = "SELECT * FROM config_envios ORDER BY anio DESC, trimestre DESC";
const SELECT_FOR_PERIOD: &str = "SELECT * FROM config_envios WHERE trimestre = ? AND anio = ?";
const DELETE_BY_ID: &str = "DELETE FROM config_envios WHERE id = ?";

/// `SQLite`-backed submission window repository.
#[derive(Clone)]
pub struct SqliteSubmissionWindowRepository {
    pool: SqlitePool,
}

impl SqliteSubmissionWindowRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl SubmissionWindowRepository for SqliteSubmissionWindowRepository {
    fn create(
        &self,
        window: NewSubmissionWindow,
    ) -> impl Future<Output = Result<SubmissionWindow, PlanError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Wrapper = sqlx::query_as(INSERT)
                .bind(i64::from(window.period.quarter))
                .bind(i64::from(window.period.year))
                .bind(time::to_stored(window.opens_at))
                .bind(time::to_stored(window.closes_at))
                .bind(time::to_stored(time::now()))
                .fetch_one(&pool)
                .await
                .map_err(db)?;

            Ok(row.0)
        }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<SubmissionWindow>, PlanError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
                .fetch_all(&pool)
                .await
                .map_err(db)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn find_for_period(
        &self,
        period: Period,
    ) -> impl Future<Output = Result<Option<SubmissionWindow>, PlanError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_FOR_PERIOD)
                .bind(i64::from(period.quarter))
                .bind(i64::from(period.year))
                .fetch_optional(&pool)
                .await
                .map_err(db)?;

            Ok(row.map(|w| w.0))
        }
    }

    fn delete(&self, id: WindowId) -> impl Future<Output = Result<bool, PlanError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = sqlx::query(DELETE_BY_ID)
                .bind(id.get())
                .execute(&pool)
                .await
                .map_err(db)?;

            Ok(result.rows_affected() > 0)
        }
    }
}
