//! `SQLite` implementation of [`GradeRepository`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use plan_accion_app::ports::GradeRepository;
use plan_accion_domain::error::PlanError;
use plan_accion_domain::grade::{GradeEntry, GradeFilter, QuarterGrade};
use plan_accion_domain::id::{AreaId, GradeId, UserId};
use plan_accion_domain::score::Score;
use plan_accion_domain::time;

use crate::decode;
use crate::error::db;

struct Wrapper(QuarterGrade);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let graded_by: Option<i64> = row.try_get("calificado_por")?;
        let score = Score::new(row.try_get("calificacion")?)
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        Ok(Self(QuarterGrade {
            id: GradeId::new(row.try_get("id")?),
            user_id: UserId::new(row.try_get("usuario_id")?),
            area_id: AreaId::new(row.try_get("area_id")?),
            period: decode::period(row)?,
            score,
            auto_calculated: row.try_get("auto_calcular")?,
            graded_by: graded_by.map(UserId::new),
            graded_at: decode::timestamp(row, "calificado_en")?,
        }))
    }
}

const UPSERT: &str = "INSERT INTO calificaciones_trimestre (usuario_id, area_id, trimestre, anio, calificacion, auto_calcular, calificado_por, calificado_en) \
     VALUES (?, ?, ?, ?, ?, ?, ?, ?) \
     ON CONFLICT (usuario_id, area_id, trimestre, anio) DO UPDATE SET \
     calificacion = excluded.calificacion, auto_calcular = excluded.auto_calcular, \
     calificado_por = excluded.calificado_por, calificado_en = excluded.calificado_en \
     RETURNING *";

const SELECT_FILTERED: &str = "SELECT * FROM calificaciones_trimestre \
     WHERE (? IS NULL OR usuario_id = ?) AND (? IS NULL OR area_id = ?) \
     AND (? IS NULL OR trimestre = ?) AND (? IS NULL OR anio = ?) \
     ORDER BY anio, trimestre, usuario_id";

/// `SQLite`-backed quarterly grade repository.
#[derive(Clone)]
pub struct SqliteGradeRepository {
    pool: SqlitePool,
}

impl SqliteGradeRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl GradeRepository for SqliteGradeRepository {
    fn upsert(
        &self,
        entry: GradeEntry,
    ) -> impl Future<Output = Result<QuarterGrade, PlanError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Wrapper = sqlx::query_as(UPSERT)
                .bind(entry.user_id.get())
                .bind(entry.area_id.get())
                .bind(i64::from(entry.period.quarter))
                .bind(i64::from(entry.period.year))
                .bind(entry.score.get())
                .bind(entry.auto_calculated)
                .bind(entry.graded_by.get())
                .bind(time::to_stored(entry.graded_at))
                .fetch_one(&pool)
                .await
                .map_err(db)?;

            Ok(row.0)
        }
    }

    fn list(
        &self,
        filter: GradeFilter,
    ) -> impl Future<Output = Result<Vec<QuarterGrade>, PlanError>> + Send {
        let pool = self.pool.clone();
        async move {
            let user_id = filter.user_id.map(UserId::get);
            let area_id = filter.area_id.map(AreaId::get);
            let quarter = filter.quarter.map(i64::from);
            let year = filter.year.map(i64::from);
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_FILTERED)
                .bind(user_id)
                .bind(user_id)
                .bind(area_id)
                .bind(area_id)
                .bind(quarter)
                .bind(quarter)
                .bind(year)
                .bind(year)
                .fetch_all(&pool)
                .await
                .map_err(db)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }
}
