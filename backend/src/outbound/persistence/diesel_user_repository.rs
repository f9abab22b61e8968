//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{ContactNumber, EmailAddress, User, UserId};

use super::diesel_error_mapping::port_error_mapping;
use super::models::UserRow;
use super::pool::DbPool;
use super::schema::users;

port_error_mapping!(UserPersistenceError, |constraint: Option<String>| {
    UserPersistenceError::duplicate(duplicate_field(constraint.as_deref()))
});

fn duplicate_field(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some("users_contact_number_key") => "contact_number",
        _ => "email",
    }
}

fn to_domain(row: UserRow) -> Result<User, UserPersistenceError> {
    User::try_from(row).map_err(UserPersistenceError::query)
}

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Load at most one user matching `$filter`.
macro_rules! find_user {
    ($self:ident, $filter:expr) => {{
        let mut conn = $self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter($filter)
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(to_domain).transpose()
    }};
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(users::table)
            .values(UserRow::from(user))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(users::table.find(*user.id.as_uuid()))
            .set(UserRow::from(user))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated == 0 {
            return Err(UserPersistenceError::query("user not found"));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        find_user!(self, users::id.eq(*id.as_uuid()))
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        find_user!(self, users::email.eq(AsRef::<str>::as_ref(email)))
    }

    async fn find_by_contact_number(
        &self,
        number: &ContactNumber,
    ) -> Result<Option<User>, UserPersistenceError> {
        find_user!(self, users::contact_number.eq(AsRef::<str>::as_ref(number)))
    }
}
