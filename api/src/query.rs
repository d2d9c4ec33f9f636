use rocket::serde::json::Json;
use rocket::State;

use log::warn;
use rocket_okapi::openapi;
use sea_orm::DatabaseConnection;

use service::dto::{AdminInfo, ContactMessageInfo, FeedEnvelope, PlayerRanking};
use service::error::GenericError;
use service::feed::{fetch_feed, FeedSource};

use crate::authenticate::AdminUser;
use crate::responses::FeedProxyResponse;

async fn feed_response(source: FeedSource) -> FeedProxyResponse {
    match fetch_feed(source).await {
        Ok(items) => FeedProxyResponse::Filled(Json(FeedEnvelope::filled(source.label(), items))),
        Err(e) => {
            warn!("{} feed unavailable: {:?}", source.label(), e);
            FeedProxyResponse::Unavailable(Json(FeedEnvelope::failed(e.message())))
        }
    }
}

/// # Federation news feed
///
/// Proxies the FFTT news feed, cached for an hour.
#[openapi(tag = "Feeds")]
#[get("/rss/fftt")]
pub(crate) async fn feed_fftt() -> FeedProxyResponse {
    feed_response(FeedSource::Fftt).await
}

/// # Handisport news feed
///
/// Proxies the Handisport federation feed, cached for an hour.
#[openapi(tag = "Feeds")]
#[get("/rss/handisport")]
pub(crate) async fn feed_handisport() -> FeedProxyResponse {
    feed_response(FeedSource::Handisport).await
}

/// # Player rankings
///
/// All club players, best ranked first.
#[openapi(tag = "Players")]
#[get("/players")]
pub(crate) async fn get_players(
    db: &State<DatabaseConnection>,
) -> Result<Json<Vec<PlayerRanking>>, GenericError> {
    let players = service::players_by_points(db.inner()).await?;
    Ok(Json(players.into_iter().map(PlayerRanking::from).collect()))
}

/// # Current admin
#[openapi(tag = "Admin")]
#[get("/admin/me")]
pub(crate) async fn admin_me(user: AdminUser) -> Json<AdminInfo> {
    Json(AdminInfo::from(user.admin))
}

/// # Contact inbox
///
/// Every stored contact message, newest first.
#[openapi(tag = "Admin")]
#[get("/admin/messages")]
pub(crate) async fn admin_messages(
    db: &State<DatabaseConnection>,
    _user: AdminUser,
) -> Result<Json<Vec<ContactMessageInfo>>, GenericError> {
    let messages = service::list_contact_messages(db.inner()).await?;
    Ok(Json(
        messages.into_iter().map(ContactMessageInfo::from).collect(),
    ))
}
