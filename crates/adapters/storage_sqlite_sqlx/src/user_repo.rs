//! `SQLite` implementation of [`UserRepository`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use plan_accion_app::ports::UserRepository;
use plan_accion_domain::error::PlanError;
use plan_accion_domain::id::{AreaId, UserId};
use plan_accion_domain::time;
use plan_accion_domain::user::{Email, NewUser, Role, User, UserStatus};

use crate::decode;
use crate::error::db;

/// Wrapper for converting database rows into domain [`User`].
struct Wrapper(User);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let area_id: Option<i64> = row.try_get("area_id")?;
        Ok(Self(User {
            id: UserId::new(row.try_get("id")?),
            email: decode::parsed(row, "email")?,
            password_hash: row.try_get("password_hash")?,
            name: row.try_get("nombre")?,
            role: decode::parsed(row, "rol")?,
            status: decode::parsed(row, "estado")?,
            area_id: area_id.map(AreaId::new),
            photo_url: row.try_get("foto_url")?,
            requested_area: row.try_get("area_solicitada")?,
            created_at: decode::timestamp(row, "creado_en")?,
        }))
    }
}

const INSERT: &str = "INSERT INTO usuarios (email, password_hash, nombre, rol, estado, area_solicitada, creado_en) VALUES (?, ?, ?, ?, ?, ?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM usuarios WHERE id = ?";
const SELECT_BY_EMAIL: &str = "SELECT * FROM usuarios WHERE email = ?";
const SELECT_FILTERED: &str =
    "SELECT * FROM usuarios WHERE (? IS NULL OR estado = ?) ORDER BY creado_en DESC, id DESC";
const UPDATE: &str = "UPDATE usuarios SET email = ?, password_hash = ?, nombre = ?, estado = ?, area_id = ?, foto_url = ?, area_solicitada = ? WHERE id = ? RETURNING *";
// The guards count active administrators only.
const COUNT_ADMINS: &str = "SELECT COUNT(*) FROM usuarios WHERE rol = 'admin' AND estado = 'activo'";
const SET_ROLE_GUARDED: &str = "UPDATE usuarios SET rol = ? WHERE id = ? AND (? = 'admin' OR rol <> 'admin' OR estado <> 'activo' \
     OR (SELECT COUNT(*) FROM usuarios WHERE rol = 'admin' AND estado = 'activo') > 1)";
const DELETE_GUARDED: &str = "DELETE FROM usuarios WHERE id = ? AND (rol <> 'admin' OR estado <> 'activo' \
     OR (SELECT COUNT(*) FROM usuarios WHERE rol = 'admin' AND estado = 'activo') > 1)";

/// `SQLite`-backed user repository.
#[derive(Clone)]
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl UserRepository for SqliteUserRepository {
    fn create(&self, user: NewUser) -> impl Future<Output = Result<User, PlanError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = sqlx::query(INSERT)
                .bind(user.email.as_str())
                .bind(&user.password_hash)
                .bind(&user.name)
                .bind(user.role.as_str())
                .bind(user.status.as_str())
                .bind(user.requested_area.as_deref())
                .bind(time::to_stored(user.created_at))
                .execute(&pool)
                .await
                .map_err(db)?;

            Ok(User {
                id: UserId::new(result.last_insert_rowid()),
                email: user.email,
                password_hash: user.password_hash,
                name: user.name,
                role: user.role,
                status: user.status,
                area_id: None,
                photo_url: None,
                requested_area: user.requested_area,
                created_at: user.created_at,
            })
        }
    }

    fn get_by_id(&self, id: UserId) -> impl Future<Output = Result<Option<User>, PlanError>> + Send {
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

    fn get_by_email(
        &self,
        email: &Email,
    ) -> impl Future<Output = Result<Option<User>, PlanError>> + Send {
        let pool = self.pool.clone();
        let email = email.as_str().to_string();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_EMAIL)
                .bind(email)
                .fetch_optional(&pool)
                .await
                .map_err(db)?;

            Ok(row.map(|w| w.0))
        }
    }

    fn list(
        &self,
        status: Option<UserStatus>,
    ) -> impl Future<Output = Result<Vec<User>, PlanError>> + Send {
        let pool = self.pool.clone();
        async move {
            let status = status.map(UserStatus::as_str);
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_FILTERED)
                .bind(status)
                .bind(status)
                .fetch_all(&pool)
                .await
                .map_err(db)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn update(&self, user: User) -> impl Future<Output = Result<User, PlanError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(UPDATE)
                .bind(user.email.as_str())
                .bind(&user.password_hash)
                .bind(&user.name)
                .bind(user.status.as_str())
                .bind(user.area_id.map(AreaId::get))
                .bind(user.photo_url.as_deref())
                .bind(user.requested_area.as_deref())
                .bind(user.id.get())
                .fetch_optional(&pool)
                .await
                .map_err(db)?;

            row.map(|w| w.0)
                .ok_or_else(|| PlanError::not_found("User", user.id))
        }
    }

    fn set_role_unless_last_admin(
        &self,
        id: UserId,
        role: Role,
    ) -> impl Future<Output = Result<bool, PlanError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = sqlx::query(SET_ROLE_GUARDED)
                .bind(role.as_str())
                .bind(id.get())
                .bind(role.as_str())
                .execute(&pool)
                .await
                .map_err(db)?;

            Ok(result.rows_affected() == 1)
        }
    }

    fn delete_unless_last_admin(
        &self,
        id: UserId,
    ) -> impl Future<Output = Result<bool, PlanError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = sqlx::query(DELETE_GUARDED)
                .bind(id.get())
                .execute(&pool)
                .await
                .map_err(db)?;

            Ok(result.rows_affected() == 1)
        }
    }

    fn count_admins(&self) -> impl Future<Output = Result<i64, PlanError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query_scalar(COUNT_ADMINS)
                .fetch_one(&pool)
                .await
                .map_err(db)
        }
    }
}
