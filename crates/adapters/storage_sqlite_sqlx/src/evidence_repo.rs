//! `SQLite` implementation of [`EvidenceRepository`].
//!
//! Every write that depends on the `(informe_id, usuario_id, trimestre, anio)`
//! key is a single `INSERT … ON CONFLICT` statement, so concurrent requests
//! for the same key can never produce two rows.

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use plan_accion_app::ports::EvidenceRepository;
use plan_accion_domain::error::PlanError;
use plan_accion_domain::evidence::{
    Evidence, EvidenceFile, EvidenceFilter, EvidenceKey, EvidenceReview, EvidenceSubmission,
};
use plan_accion_domain::id::{AreaId, EvidenceId, GoalId, UserId, WindowId};
use plan_accion_domain::period::Period;
use plan_accion_domain::score::Score;
use plan_accion_domain::time::{self, Timestamp};

use crate::decode;
use crate::error::db;

struct Wrapper(Evidence);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let url: Option<String> = row.try_get("archivo_url")?;
        let file = match url {
            Some(url) => Some(EvidenceFile {
                url,
                name: row
                    .try_get::<Option<String>, _>("archivo_nombre")?
                    .unwrap_or_default(),
                mime_type: row
                    .try_get::<Option<String>, _>("archivo_tipo")?
                    .unwrap_or_default(),
                size_bytes: row
                    .try_get::<Option<i64>, _>("archivo_tamano")?
                    .unwrap_or_default(),
            }),
            None => None,
        };
        let window_id: Option<i64> = row.try_get("envio_id")?;

        Ok(Self(Evidence {
            id: EvidenceId::new(row.try_get("id")?),
            key: EvidenceKey {
                goal_id: GoalId::new(row.try_get("informe_id")?),
                user_id: UserId::new(row.try_get("usuario_id")?),
                period: decode::period(row)?,
            },
            file,
            score: decode::score(row, "calificacion")?,
            observation: row.try_get("observacion")?,
            window_id: window_id.map(WindowId::new),
            created_at: decode::timestamp(row, "creado_en")?,
            updated_at: decode::timestamp(row, "actualizado_en")?,
        }))
    }
}

const OPEN_SLOT: &str = "INSERT INTO evidencias (informe_id, usuario_id, trimestre, anio, creado_en, actualizado_en) VALUES (?, ?, ?, ?, ?, ?) \
     ON CONFLICT (informe_id, usuario_id, trimestre, anio) DO NOTHING";

const SUBMIT: &str = "INSERT INTO evidencias (informe_id, usuario_id, trimestre, anio, archivo_url, archivo_nombre, archivo_tipo, archivo_tamano, envio_id, creado_en, actualizado_en) \
     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
     ON CONFLICT (informe_id, usuario_id, trimestre, anio) DO UPDATE SET \
     archivo_url = excluded.archivo_url, archivo_nombre = excluded.archivo_nombre, \
     archivo_tipo = excluded.archivo_tipo, archivo_tamano = excluded.archivo_tamano, \
     calificacion = NULL, observacion = NULL, \
     envio_id = excluded.envio_id, actualizado_en = excluded.actualizado_en \
     RETURNING *";

const SELECT_BY_ID: &str = "SELECT * FROM evidencias WHERE id = ?";

const SELECT_FILTERED: &str = "SELECT e.* FROM evidencias e JOIN informes i ON i.id = e.informe_id \
     WHERE (? IS NULL OR e.usuario_id = ?) AND (? IS NULL OR e.informe_id = ?) \
     AND (? IS NULL OR i.area_id = ?) AND (? IS NULL OR e.trimestre = ?) AND (? IS NULL OR e.anio = ?) \
     ORDER BY e.anio, e.trimestre, e.id";

const REVIEW: &str = "UPDATE evidencias SET calificacion = ?, observacion = ?, actualizado_en = ? WHERE id = ? RETURNING *";

const DELETE_BY_ID: &str = "DELETE FROM evidencias WHERE id = ?";

const AVERAGE_SCORE: &str = "SELECT AVG(e.calificacion) FROM evidencias e JOIN informes i ON i.id = e.informe_id \
     WHERE e.usuario_id = ? AND i.area_id = ? AND e.trimestre = ? AND e.anio = ? AND e.calificacion IS NOT NULL";

/// `SQLite`-backed evidence repository.
#[derive(Clone)]
pub struct SqliteEvidenceRepository {
    pool: SqlitePool,
}

impl SqliteEvidenceRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl EvidenceRepository for SqliteEvidenceRepository {
    fn open_slot(
        &self,
        key: EvidenceKey,
        at: Timestamp,
    ) -> impl Future<Output = Result<bool, PlanError>> + Send {
        let pool = self.pool.clone();
        async move {
            let at = time::to_stored(at);
            let result = sqlx::query(OPEN_SLOT)
                .bind(key.goal_id.get())
                .bind(key.user_id.get())
                .bind(i64::from(key.period.quarter))
                .bind(i64::from(key.period.year))
                .bind(&at)
                .bind(&at)
                .execute(&pool)
                .await
                .map_err(db)?;

            Ok(result.rows_affected() == 1)
        }
    }

    fn submit(
        &self,
        submission: EvidenceSubmission,
    ) -> impl Future<Output = Result<Evidence, PlanError>> + Send {
        let pool = self.pool.clone();
        async move {
            let EvidenceSubmission {
                key,
                file,
                window_id,
                submitted_at,
            } = submission;
            let at = time::to_stored(submitted_at);
            let row: Wrapper = sqlx::query_as(SUBMIT)
                .bind(key.goal_id.get())
                .bind(key.user_id.get())
                .bind(i64::from(key.period.quarter))
                .bind(i64::from(key.period.year))
                .bind(file.url)
                .bind(file.name)
                .bind(file.mime_type)
                .bind(file.size_bytes)
                .bind(window_id.map(WindowId::get))
                .bind(&at)
                .bind(&at)
                .fetch_one(&pool)
                .await
                .map_err(db)?;

            Ok(row.0)
        }
    }

    fn get_by_id(
        &self,
        id: EvidenceId,
    ) -> impl Future<Output = Result<Option<Evidence>, PlanError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
                .bind(id.get())
                .fetch_optional(&pool)
                .await
                .map_err(db)?;

            Ok(row.map(|w| w.0))
        }
    }

    fn list(
        &self,
        filter: EvidenceFilter,
    ) -> impl Future<Output = Result<Vec<Evidence>, PlanError>> + Send {
        let pool = self.pool.clone();
        async move {
            let user_id = filter.user_id.map(UserId::get);
            let goal_id = filter.goal_id.map(GoalId::get);
            let area_id = filter.area_id.map(AreaId::get);
            let quarter = filter.quarter.map(i64::from);
            let year = filter.year.map(i64::from);
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_FILTERED)
                .bind(user_id)
                .bind(user_id)
                .bind(goal_id)
                .bind(goal_id)
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

    fn review(
        &self,
        id: EvidenceId,
        review: EvidenceReview,
        at: Timestamp,
    ) -> impl Future<Output = Result<Option<Evidence>, PlanError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(REVIEW)
                .bind(review.score.get())
                .bind(review.observation)
                .bind(time::to_stored(at))
                .bind(id.get())
                .fetch_optional(&pool)
                .await
                .map_err(db)?;

            Ok(row.map(|w| w.0))
        }
    }

    fn delete(&self, id: EvidenceId) -> impl Future<Output = Result<bool, PlanError>> + Send {
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

    fn average_score(
        &self,
        user_id: UserId,
        area_id: AreaId,
        period: Period,
    ) -> impl Future<Output = Result<Option<Score>, PlanError>> + Send {
        let pool = self.pool.clone();
        async move {
            let average: Option<f64> = sqlx::query_scalar(AVERAGE_SCORE)
                .bind(user_id.get())
                .bind(area_id.get())
                .bind(i64::from(period.quarter))
                .bind(i64::from(period.year))
                .fetch_one(&pool)
                .await
                .map_err(db)?;

            Ok(average.map(Score::rounded))
        }
    }
}
