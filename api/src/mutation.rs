use rocket::serde::json::Json;
use rocket::State;

use log::warn;
use rocket_okapi::openapi;
use sea_orm::DatabaseConnection;

use service::dto::forms::ContactForm;
use service::dto::{fftt, ContactOutcome, SyncReport};
use service::error::GenericError;

use crate::responses::{ContactResponse, SyncResponse};

/// # Contact form
///
/// Validates and stores a contact message, then notifies the club inbox on a
/// best-effort basis. The message is durable as soon as 200 is returned,
/// whether or not the notification went out.
#[openapi(tag = "Contact")]
#[post("/contact", format = "json", data = "<form>")]
pub(crate) async fn contact(
    form: Json<ContactForm>,
    db: &State<DatabaseConnection>,
) -> ContactResponse {
    let form = form.into_inner();

    if let Some(field) = form.missing_field() {
        return ContactResponse::Invalid(Json(ContactOutcome {
            success: false,
            message: format!("Missing required field: {field}"),
        }));
    }

    let stored = match service::insert_contact_message(db.inner(), &form).await {
        Ok(stored) => stored,
        Err(e) => {
            warn!("contact message rejected by storage: {:?}", e);
            return ContactResponse::Failed(Json(ContactOutcome {
                success: false,
                message: "Unable to store your message".to_string(),
            }));
        }
    };

    if let Err(e) = service::notify::send_contact_notification(&stored).await {
        warn!(
            "notification failed for contact message {}: {:?}",
            stored.id, e
        );
    }

    ContactResponse::Accepted(Json(ContactOutcome {
        success: true,
        message: "Your message has been received".to_string(),
    }))
}

/// # Roster sync
///
/// Pulls the club roster from the federation API and upserts every player,
/// reporting how many rows were inserted and how many updated.
#[openapi(tag = "Players")]
#[post("/players/sync")]
pub(crate) async fn sync_players(db: &State<DatabaseConnection>) -> SyncResponse {
    match fftt::run_sync(db.inner()).await {
        Ok(summary) => SyncResponse::Completed(Json(SyncReport::from(summary))),
        Err(GenericError::NotFound(m)) => SyncResponse::EmptyRoster(Json(SyncReport::failed(m))),
        Err(e) => SyncResponse::Failed(Json(SyncReport::failed(e.message()))),
    }
}
