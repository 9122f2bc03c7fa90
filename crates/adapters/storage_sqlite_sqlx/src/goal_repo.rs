//! `SQLite` implementation of [`GoalRepository`] over the `informes` table.

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use plan_accion_app::ports::GoalRepository;
use plan_accion_domain::error::PlanError;
use plan_accion_domain::goal::{Goal, GoalFilter, NewGoal};
use plan_accion_domain::id::{AreaId, AxisId, GoalId, SubAxisId, UserId};
use plan_accion_domain::time;

use crate::decode;
use crate::error::db;

struct Wrapper(Goal);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let axis_id: Option<i64> = row.try_get("eje_id")?;
        let sub_axis_id: Option<i64> = row.try_get("sub_eje_id")?;
        Ok(Self(Goal {
            id: GoalId::new(row.try_get("id")?),
            user_id: UserId::new(row.try_get("usuario_id")?),
            area_id: AreaId::new(row.try_get("area_id")?),
            axis_id: axis_id.map(AxisId::new),
            sub_axis_id: sub_axis_id.map(SubAxisId::new),
            text: row.try_get("meta")?,
            status: decode::parsed(row, "estado")?,
            created_at: decode::timestamp(row, "creado_en")?,
        }))
    }
}

const INSERT: &str = "INSERT INTO informes (usuario_id, area_id, eje_id, sub_eje_id, meta, estado, creado_en) VALUES (?, ?, ?, ?, ?, ?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM informes WHERE id = ?";
const SELECT_FILTERED: &str = "SELECT * FROM informes WHERE (? IS NULL OR usuario_id = ?) AND (? IS NULL OR area_id = ?) ORDER BY creado_en DESC, id DESC";
const UPDATE: &str =
    "UPDATE informes SET eje_id = ?, sub_eje_id = ?, meta = ?, estado = ? WHERE id = ?";
const DELETE_BY_ID: &str = "DELETE FROM informes WHERE id = ?";

/// `SQLite`-backed goal repository.
#[derive(Clone)]
pub struct SqliteGoalRepository {
    pool: SqlitePool,
}

impl SqliteGoalRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl GoalRepository for SqliteGoalRepository {
    fn create(&self, goal: NewGoal) -> impl Future<Output = Result<Goal, PlanError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = sqlx::query(INSERT)
                .bind(goal.user_id.get())
                .bind(goal.area_id.get())
                .bind(goal.axis_id.map(AxisId::get))
                .bind(goal.sub_axis_id.map(SubAxisId::get))
                .bind(&goal.text)
                .bind(goal.status.as_str())
                .bind(time::to_stored(goal.created_at))
                .execute(&pool)
                .await
                .map_err(db)?;

            Ok(Goal {
                id: GoalId::new(result.last_insert_rowid()),
                user_id: goal.user_id,
                area_id: goal.area_id,
                axis_id: goal.axis_id,
                sub_axis_id: goal.sub_axis_id,
                text: goal.text,
                status: goal.status,
                created_at: goal.created_at,
            })
        }
    }

    fn get_by_id(&self, id: GoalId) -> impl Future<Output = Result<Option<Goal>, PlanError>> + Send {
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

    fn list(&self, filter: GoalFilter) -> impl Future<Output = Result<Vec<Goal>, PlanError>> + Send {
        let pool = self.pool.clone();
        async move {
            let user_id = filter.user_id.map(UserId::get);
            let area_id = filter.area_id.map(AreaId::get);
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_FILTERED)
                .bind(user_id)
                .bind(user_id)
                .bind(area_id)
                .bind(area_id)
                .fetch_all(&pool)
                .await
                .map_err(db)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn update(&self, goal: Goal) -> impl Future<Output = Result<Goal, PlanError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = sqlx::query(UPDATE)
                .bind(goal.axis_id.map(AxisId::get))
                .bind(goal.sub_axis_id.map(SubAxisId::get))
                .bind(&goal.text)
                .bind(goal.status.as_str())
                .bind(goal.id.get())
                .execute(&pool)
                .await
                .map_err(db)?;

            if result.rows_affected() == 0 {
                return Err(PlanError::not_found("Goal", goal.id));
            }
            Ok(goal)
        }
    }

    fn delete(&self, id: GoalId) -> impl Future<Output = Result<bool, PlanError>> + Send {
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
