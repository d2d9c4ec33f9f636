use bcrypt::verify;

use entity::prelude::*;
use entity::*;

use log::error;

use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, DatabaseConnection, QueryOrder};

use crate::error::GenericError;

pub async fn authenticate(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
) -> Result<Option<account::Model>, GenericError> {
    let account = Account::find()
        .filter(account::Column::Email.eq(email.trim().to_lowercase()))
        .one(db)
        .await
        .map_err(|e| {
            error!("error while finding account: {:#?}", e);
            GenericError::UnknownError("Unknown error while finding account")
        })?;

    if let Some(account) = account {
        if verify(password, &account.hashed_password).unwrap_or(false) {
            return Ok(Some(account));
        }
    }
    Ok(None)
}

/// The sole authorization check of the admin area: a row in the admin
/// table matching the authenticated email, or nothing.
pub async fn get_admin_by_email(
    db: &impl ConnectionTrait,
    email: &str,
) -> Result<Option<admin::Model>, GenericError> {
    Admin::find()
        .filter(admin::Column::Email.eq(email))
        .one(db)
        .await
        .map_err(|e| {
            error!("error while finding admin: {:#?}", e);
            GenericError::UnknownError("Unknown error while finding admin")
        })
}

/// Resolves a session token to its account, ignoring expired sessions.
pub async fn get_live_session(
    db: &DatabaseConnection,
    token: &str,
) -> Result<Option<(session::Model, account::Model)>, GenericError> {
    let session = Session::find_by_id(token.to_owned())
        .one(db)
        .await
        .map_err(|_| GenericError::UnknownError("db error while finding session"))?;

    let Some(session) = session else {
        return Ok(None);
    };
    if session.expires_at < chrono::Utc::now().fixed_offset() {
        return Ok(None);
    }

    let account = session
        .find_related(Account)
        .one(db)
        .await
        .map_err(|_| GenericError::UnknownError("db error while finding account"))?;
    Ok(account.map(|account| (session, account)))
}

pub async fn players_by_points(
    db: &impl ConnectionTrait,
) -> Result<Vec<player::Model>, GenericError> {
    Player::find()
        .order_by_desc(player::Column::Points)
        .all(db)
        .await
        .map_err(|e| {
            error!("error while listing players: {:#?}", e);
            GenericError::UnknownError("Unknown error while listing players")
        })
}

pub async fn list_contact_messages(
    db: &impl ConnectionTrait,
) -> Result<Vec<contact_message::Model>, GenericError> {
    ContactMessage::find()
        .order_by_desc(contact_message::Column::CreatedAt)
        .all(db)
        .await
        .map_err(|e| {
            error!("error while listing contact messages: {:#?}", e);
            GenericError::UnknownError("Unknown error while listing contact messages")
        })
}
