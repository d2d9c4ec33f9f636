use entity::prelude::*;
use entity::*;

use log::error;
use rand::distributions::Alphanumeric;
use rand::Rng;
use rocket::http::{Cookie, CookieJar};
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, ModelTrait, QueryFilter, SqlErr,
};

use crate::dto::forms::ContactForm;
use crate::error::GenericError;

pub const SESSION_COOKIE: &str = "session";
const SESSION_TTL_DAYS: i64 = 7;

fn session_expiry() -> chrono::DateTime<chrono::FixedOffset> {
    (chrono::Utc::now() + chrono::Duration::days(SESSION_TTL_DAYS)).fixed_offset()
}

pub async fn create_account(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
) -> Result<account::Model, GenericError> {
    let email = email.trim().to_lowercase();
    if email.is_empty() || password.is_empty() {
        return Err(GenericError::BadRequest("Email and password are required"));
    }

    let hashed = bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|_| GenericError::UnknownError("Unable to hash password"))?;

    let new_account = account::ActiveModel {
        id: NotSet,
        email: Set(email),
        hashed_password: Set(hashed),
        created_at: Set(chrono::Utc::now().fixed_offset()),
    };

    match new_account.insert(db).await {
        Ok(account) => Ok(account),
        Err(e) => match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                Err(GenericError::Conflict("Email already registered"))
            }
            _ => {
                error!("error while creating account: {:#?}", e);
                Err(GenericError::UnknownError("Unable to create account"))
            }
        },
    }
}

/// Creates a session row and places its token in a private cookie.
pub async fn generate_cookie(
    db: &DatabaseConnection,
    account_id: i32,
    cookies: &CookieJar<'_>,
) -> Result<(), GenericError> {
    let token: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect();

    let session = session::ActiveModel {
        token: Set(token.clone()),
        account_id: Set(account_id),
        expires_at: Set(session_expiry()),
    };
    Session::insert(session)
        .exec(db)
        .await
        .map_err(|_| GenericError::UnknownError("Unable to store session"))?;

    cookies.add_private(Cookie::new(SESSION_COOKIE, token));
    Ok(())
}

/// Slides the session expiry forward and re-sets the cookie. Runs on every
/// guarded request, so any guarded response may rewrite cookies.
pub async fn refresh_session(
    db: &DatabaseConnection,
    session: session::Model,
    cookies: &CookieJar<'_>,
) -> Result<(), GenericError> {
    let token = session.token.clone();
    let mut active = session.into_active_model();
    active.expires_at = Set(session_expiry());
    active
        .update(db)
        .await
        .map_err(|_| GenericError::UnknownError("Unable to refresh session"))?;

    cookies.add_private(Cookie::new(SESSION_COOKIE, token));
    Ok(())
}

pub async fn remove_session(
    db: &DatabaseConnection,
    token: &str,
    cookies: &CookieJar<'_>,
) -> Result<(), GenericError> {
    if let Some(session) = Session::find_by_id(token.to_owned())
        .one(db)
        .await
        .map_err(|_| GenericError::UnknownError("db error while finding session"))?
    {
        session
            .delete(db)
            .await
            .map_err(|_| GenericError::UnknownError("Error while trying to delete session"))?;
    }
    cookies.remove_private(SESSION_COOKIE);
    Ok(())
}

/// Deletes sessions past their expiry so the table stays bounded. Expired
/// sessions are already rejected at lookup; this only reclaims the rows.
pub async fn purge_expired_sessions(db: &impl ConnectionTrait) -> Result<u64, GenericError> {
    let result = Session::delete_many()
        .filter(session::Column::ExpiresAt.lt(chrono::Utc::now().fixed_offset()))
        .exec(db)
        .await
        .map_err(|e| {
            error!("unable to purge expired sessions: {:#?}", e);
            GenericError::UnknownError("Unable to purge expired sessions")
        })?;
    Ok(result.rows_affected)
}

/// Stores a validated contact form with status "new". Validation happens
/// before this is called; a failure here is fatal to the request.
pub async fn insert_contact_message(
    db: &impl ConnectionTrait,
    form: &ContactForm,
) -> Result<contact_message::Model, GenericError> {
    let message = contact_message::ActiveModel {
        id: NotSet,
        name: Set(form.name.clone().unwrap_or_default()),
        email: Set(form.email.clone().unwrap_or_default()),
        phone: Set(form
            .phone
            .clone()
            .filter(|phone| !phone.trim().is_empty())),
        subject: Set(form.subject.clone().unwrap_or_default()),
        message: Set(form.message.clone().unwrap_or_default()),
        status: Set("new".to_string()),
        created_at: Set(chrono::Utc::now().fixed_offset()),
    };

    message.insert(db).await.map_err(|e| {
        error!("unable to store contact message: {:#?}", e);
        GenericError::UnknownError("Unable to store contact message")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    #[tokio::test]
    async fn purge_reports_how_many_sessions_were_deleted() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 3,
            }])
            .into_connection();

        assert_eq!(purge_expired_sessions(&db).await.unwrap(), 3);

        let log = format!("{:?}", db.into_transaction_log()).replace("\\\"", "\"");
        assert!(log.contains("DELETE FROM \"session\""));
        assert!(log.contains("expires_at"));
    }
}
