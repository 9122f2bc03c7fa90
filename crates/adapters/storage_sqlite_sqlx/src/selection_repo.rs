//! `SQLite` implementation of [`SelectionRepository`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use plan_accion_app::ports::SelectionRepository;
use plan_accion_domain::error::PlanError;
use plan_accion_domain::id::UserId;
use plan_accion_domain::period::Year;
use plan_accion_domain::selection::QuarterSelection;
use plan_accion_domain::time;

use crate::decode;
use crate::error::db;

struct Wrapper(QuarterSelection);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(QuarterSelection {
            user_id: UserId::new(row.try_get("usuario_id")?),
            period: decode::period(row)?,
            selected: row.try_get("seleccionado")?,
            updated_at: decode::timestamp(row, "actualizado_en")?,
        }))
    }
}

const UPSERT: &str = "INSERT INTO selecciones_trimestre (usuario_id, trimestre, anio, seleccionado, actualizado_en) VALUES (?, ?, ?, ?, ?) \
     ON CONFLICT (usuario_id, trimestre, anio) DO UPDATE SET seleccionado = excluded.seleccionado, actualizado_en = excluded.actualizado_en";
const SELECT_FOR_USER: &str = "SELECT * FROM selecciones_trimestre WHERE usuario_id = ? AND (? IS NULL OR anio = ?) ORDER BY anio, trimestre";

/// `SQLite`-backed quarter selection repository.
#[derive(Clone)]
pub struct SqliteSelectionRepository {
    pool: SqlitePool,
}

impl SqliteSelectionRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl SelectionRepository for SqliteSelectionRepository {
    fn upsert(
        &self,
        selection: QuarterSelection,
    ) -> impl Future<Output = Result<QuarterSelection, PlanError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(UPSERT)
                .bind(selection.user_id.get())
                .bind(i64::from(selection.period.quarter))
                .bind(i64::from(selection.period.year))
                .bind(selection.selected)
                .bind(time::to_stored(selection.updated_at))
                .execute(&pool)
                .await
                .map_err(db)?;

            Ok(selection)
        }
    }

    fn list_for_user(
        &self,
        user_id: UserId,
        year: Option<Year>,
    ) -> impl Future<Output = Result<Vec<QuarterSelection>, PlanError>> + Send {
        let pool = self.pool.clone();
        async move {
            let year = year.map(i64::from);
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_FOR_USER)
                .bind(user_id.get())
                .bind(year)
                .bind(year)
                .fetch_all(&pool)
                .await
                .map_err(db)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }
}
