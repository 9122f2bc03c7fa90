//! `SQLite` implementation of [`AxisRepository`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use plan_accion_app::ports::AxisRepository;
use plan_accion_domain::axis::{Axis, AxisTracking, NewAxis, NewSubAxis, SubAxis};
use plan_accion_domain::error::PlanError;
use plan_accion_domain::id::{AreaId, AxisId, SubAxisId};
use plan_accion_domain::period::Quarter;
use plan_accion_domain::time;

use crate::decode;
use crate::error::db;

struct AxisRow(Axis);

impl<'r> FromRow<'r, SqliteRow> for AxisRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(Axis {
            id: AxisId::new(row.try_get("id")?),
            name: row.try_get("nombre")?,
            description: row.try_get("descripcion")?,
        }))
    }
}

struct SubAxisRow(SubAxis);

impl<'r> FromRow<'r, SqliteRow> for SubAxisRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(SubAxis {
            id: SubAxisId::new(row.try_get("id")?),
            axis_id: AxisId::new(row.try_get("eje_id")?),
            name: row.try_get("nombre")?,
        }))
    }
}

struct TrackingRow(AxisTracking);

impl<'r> FromRow<'r, SqliteRow> for TrackingRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(AxisTracking {
            area_id: AreaId::new(row.try_get("area_id")?),
            axis_id: AxisId::new(row.try_get("eje_id")?),
            quarter: decode::quarter(row, "trimestre")?,
            selected: row.try_get("seleccionado")?,
            updated_at: decode::timestamp(row, "actualizado_en")?,
        }))
    }
}

const INSERT_AXIS: &str = "INSERT INTO ejes (nombre, descripcion) VALUES (?, ?)";
const SELECT_AXIS: &str = "SELECT * FROM ejes WHERE id = ?";
const SELECT_AXES: &str = "SELECT * FROM ejes ORDER BY id";
const UPDATE_AXIS: &str = "UPDATE ejes SET nombre = ?, descripcion = ? WHERE id = ?";
const DELETE_AXIS: &str = "DELETE FROM ejes WHERE id = ?";

const INSERT_SUB_AXIS: &str = "INSERT INTO sub_ejes (eje_id, nombre) VALUES (?, ?)";
const SELECT_SUB_AXIS: &str = "SELECT * FROM sub_ejes WHERE id = ?";
const SELECT_SUB_AXES: &str = "SELECT * FROM sub_ejes WHERE (? IS NULL OR eje_id = ?) ORDER BY id";
const DELETE_SUB_AXIS: &str = "DELETE FROM sub_ejes WHERE id = ?";

const UPSERT_TRACKING: &str = "INSERT INTO seguimiento_ejes (area_id, eje_id, trimestre, seleccionado, actualizado_en) VALUES (?, ?, ?, ?, ?) \
     ON CONFLICT (area_id, eje_id, trimestre) DO UPDATE SET seleccionado = excluded.seleccionado, actualizado_en = excluded.actualizado_en";
const SELECT_TRACKING: &str = "SELECT * FROM seguimiento_ejes WHERE area_id = ? AND (? IS NULL OR trimestre = ?) ORDER BY trimestre, eje_id";

/// `SQLite`-backed repository for axes, sub-axes and axis tracking.
#[derive(Clone)]
pub struct SqliteAxisRepository {
    pool: SqlitePool,
}

impl SqliteAxisRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl AxisRepository for SqliteAxisRepository {
    fn create_axis(&self, axis: NewAxis) -> impl Future<Output = Result<Axis, PlanError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = sqlx::query(INSERT_AXIS)
                .bind(&axis.name)
                .bind(axis.description.as_deref())
                .execute(&pool)
                .await
                .map_err(db)?;

            Ok(Axis {
                id: AxisId::new(result.last_insert_rowid()),
                name: axis.name,
                description: axis.description,
            })
        }
    }

    fn get_axis(&self, id: AxisId) -> impl Future<Output = Result<Option<Axis>, PlanError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<AxisRow> = sqlx::query_as(SELECT_AXIS)
                .bind(id.get())
                .fetch_optional(&pool)
                .await
                .map_err(db)?;

            Ok(row.map(|r| r.0))
        }
    }

    fn list_axes(&self) -> impl Future<Output = Result<Vec<Axis>, PlanError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<AxisRow> = sqlx::query_as(SELECT_AXES)
                .fetch_all(&pool)
                .await
                .map_err(db)?;

            Ok(rows.into_iter().map(|r| r.0).collect())
        }
    }

    fn update_axis(&self, axis: Axis) -> impl Future<Output = Result<Axis, PlanError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = sqlx::query(UPDATE_AXIS)
                .bind(&axis.name)
                .bind(axis.description.as_deref())
                .bind(axis.id.get())
                .execute(&pool)
                .await
                .map_err(db)?;

            if result.rows_affected() == 0 {
                return Err(PlanError::not_found("Axis", axis.id));
            }
            Ok(axis)
        }
    }

    fn delete_axis(&self, id: AxisId) -> impl Future<Output = Result<bool, PlanError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = sqlx::query(DELETE_AXIS)
                .bind(id.get())
                .execute(&pool)
                .await
                .map_err(db)?;

            Ok(result.rows_affected() > 0)
        }
    }

    fn create_sub_axis(
        &self,
        sub_axis: NewSubAxis,
    ) -> impl Future<Output = Result<SubAxis, PlanError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = sqlx::query(INSERT_SUB_AXIS)
                .bind(sub_axis.axis_id.get())
                .bind(&sub_axis.name)
                .execute(&pool)
                .await
                .map_err(db)?;

            Ok(SubAxis {
                id: SubAxisId::new(result.last_insert_rowid()),
                axis_id: sub_axis.axis_id,
                name: sub_axis.name,
            })
        }
    }

    fn get_sub_axis(
        &self,
        id: SubAxisId,
    ) -> impl Future<Output = Result<Option<SubAxis>, PlanError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<SubAxisRow> = sqlx::query_as(SELECT_SUB_AXIS)
                .bind(id.get())
                .fetch_optional(&pool)
                .await
                .map_err(db)?;

            Ok(row.map(|r| r.0))
        }
    }

    fn list_sub_axes(
        &self,
        axis_id: Option<AxisId>,
    ) -> impl Future<Output = Result<Vec<SubAxis>, PlanError>> + Send {
        let pool = self.pool.clone();
        async move {
            let axis_id = axis_id.map(AxisId::get);
            let rows: Vec<SubAxisRow> = sqlx::query_as(SELECT_SUB_AXES)
                .bind(axis_id)
                .bind(axis_id)
                .fetch_all(&pool)
                .await
                .map_err(db)?;

            Ok(rows.into_iter().map(|r| r.0).collect())
        }
    }

    fn delete_sub_axis(
        &self,
        id: SubAxisId,
    ) -> impl Future<Output = Result<bool, PlanError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = sqlx::query(DELETE_SUB_AXIS)
                .bind(id.get())
                .execute(&pool)
                .await
                .map_err(db)?;

            Ok(result.rows_affected() > 0)
        }
    }

    fn upsert_tracking(
        &self,
        tracking: AxisTracking,
    ) -> impl Future<Output = Result<AxisTracking, PlanError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(UPSERT_TRACKING)
                .bind(tracking.area_id.get())
                .bind(tracking.axis_id.get())
                .bind(i64::from(tracking.quarter))
                .bind(tracking.selected)
                .bind(time::to_stored(tracking.updated_at))
                .execute(&pool)
                .await
                .map_err(db)?;

            Ok(tracking)
        }
    }

    fn list_tracking(
        &self,
        area_id: AreaId,
        quarter: Option<Quarter>,
    ) -> impl Future<Output = Result<Vec<AxisTracking>, PlanError>> + Send {
        let pool = self.pool.clone();
        async move {
            let quarter = quarter.map(i64::from);
            let rows: Vec<TrackingRow> = sqlx::query_as(SELECT_TRACKING)
                .bind(area_id.get())
                .bind(quarter)
                .bind(quarter)
                .fetch_all(&pool)
                .await
                .map_err(db)?;

            Ok(rows.into_iter().map(|r| r.0).collect())
        }
    }
}
