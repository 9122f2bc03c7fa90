//! `SQLite` implementation of [`AreaRepository`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use plan_accion_app::ports::AreaRepository;
use plan_accion_domain::area::{Area, AreaUsage, NewArea};
use plan_accion_domain::error::PlanError;
use plan_accion_domain::id::AreaId;

use crate::error::db;

/// Wrapper for converting database rows into domain [`Area`].
struct Wrapper(Area);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Area> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(Area {
            id: AreaId::new(row.try_get("id")?),
            name: row.try_get("nombre")?,
            description: row.try_get("descripcion")?,
        }))
    }
}

const INSERT: &str = "INSERT INTO areas (nombre, descripcion) VALUES (?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM areas WHERE id = ?";
const SELECT_ALL: &str = "SELECT * FROM areas ORDER BY nombre";
const UPDATE: &str = "UPDATE areas SET nombre = ?, descripcion = ? WHERE id = ?";
const DELETE_BY_ID: &str = "DELETE FROM areas WHERE id = ?";
const COUNT_DEPENDENTS: &str = "SELECT (SELECT COUNT(*) FROM usuarios WHERE area_id = ?) AS users, (SELECT COUNT(*) FROM informes WHERE area_id = ?) AS goals";

/// `SQLite`-backed area repository.
#[derive(Clone)]
pub struct SqliteAreaRepository {
    pool: SqlitePool,
}

impl SqliteAreaRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl AreaRepository for SqliteAreaRepository {
    fn create(&self, area: NewArea) -> impl Future<Output = Result<Area, PlanError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = sqlx::query(INSERT)
                .bind(&area.name)
                .bind(area.description.as_deref())
                .execute(&pool)
                .await
                .map_err(db)?;

            Ok(Area {
                id: AreaId::new(result.last_insert_rowid()),
                name: area.name,
                description: area.description,
            })
        }
    }

    fn get_by_id(&self, id: AreaId) -> impl Future<Output = Result<Option<Area>, PlanError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
                .bind(id.get())
                .fetch_optional(&pool)
                .await
                .map_err(db)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Area>, PlanError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
                .fetch_all(&pool)
                .await
                .map_err(db)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn update(&self, area: Area) -> impl Future<Output = Result<Area, PlanError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = sqlx::query(UPDATE)
                .bind(&area.name)
                .bind(area.description.as_deref())
                .bind(area.id.get())
                .execute(&pool)
                .await
                .map_err(db)?;

            if result.rows_affected() == 0 {
                return Err(PlanError::not_found("Area", area.id));
            }
            Ok(area)
        }
    }

    fn delete(&self, id: AreaId) -> impl Future<Output = Result<bool, PlanError>> + Send {
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

    fn count_dependents(
        &self,
        id: AreaId,
    ) -> impl Future<Output = Result<AreaUsage, PlanError>> + Send {
        let pool = self.pool.clone();
        async move {
            let (users, goals): (i64, i64) = sqlx::query_as(COUNT_DEPENDENTS)
                .bind(id.get())
                .bind(id.get())
                .fetch_one(&pool)
                .await
                .map_err(db)?;

            Ok(AreaUsage { users, goals })
        }
    }
}
