use std::collections::HashSet;

use log::{error, info};
use reqwest::header::USER_AGENT;
use rocket_okapi::okapi::schemars;
use rocket_okapi::okapi::schemars::JsonSchema;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{sea_query, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};

use crate::error::GenericError;
use crate::feed::GENERIC_USER_AGENT;

use entity::player;
use entity::prelude::Player;

pub const DEFAULT_POINTS: i32 = 500;
const DEFAULT_API_BASE: &str = "https://fftt.dafunker.com/v1";

/// One roster entry as the federation API returns it. The upstream JSON is
/// loose about types, so the numeric-looking fields are captured as raw
/// strings and parsed with explicit fallback rules.
#[derive(Debug, Deserialize, Clone)]
pub struct RosterEntry {
    #[serde(deserialize_with = "flexible_string")]
    pub licence: String,
    #[serde(rename = "nom")]
    pub last_name: String,
    #[serde(rename = "prenom")]
    pub first_name: String,
    #[serde(default, rename = "point", deserialize_with = "flexible_string_opt")]
    pub points: Option<String>,
    #[serde(default, rename = "pointm", deserialize_with = "flexible_string_opt")]
    pub exact_points: Option<String>,
    #[serde(default, rename = "cat")]
    pub category: Option<String>,
}

mod serde_things {
    use serde::de::Visitor;
    use serde::{de, Deserializer};
    use std::fmt;

    struct FlexibleString;

    impl<'de> Visitor<'de> for FlexibleString {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a number")
        }

        fn visit_str<E>(self, value: &str) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value.to_owned())
        }

        fn visit_i64<E>(self, value: i64) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_f64<E>(self, value: f64) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }
    }

    pub(super) fn flexible_string<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(FlexibleString)
    }

    struct MaybeFlexibleString;

    impl<'de> Visitor<'de> for MaybeFlexibleString {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string, a number or null")
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_owned()))
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }
    }

    pub(super) fn flexible_string_opt<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(MaybeFlexibleString)
    }
}

use serde_things::{flexible_string, flexible_string_opt};

impl RosterEntry {
    /// Rounded ranking points; anything unparseable falls back to the
    /// federation's starting value of 500.
    pub fn ranking_points(&self) -> i32 {
        self.points
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i32>().ok())
            .unwrap_or(DEFAULT_POINTS)
    }

    /// Exact monthly points; falls back to the rounded value, then to 500.
    pub fn exact_ranking_points(&self) -> f64 {
        self.exact_points
            .as_deref()
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .or_else(|| {
                self.points
                    .as_deref()
                    .and_then(|raw| raw.trim().parse::<i32>().ok())
                    .map(f64::from)
            })
            .unwrap_or(f64::from(DEFAULT_POINTS))
    }

    fn to_active_model(
        &self,
        now: chrono::DateTime<chrono::FixedOffset>,
    ) -> player::ActiveModel {
        player::ActiveModel {
            id: NotSet,
            licence: Set(self.licence.clone()),
            first_name: Set(self.first_name.clone()),
            last_name: Set(self.last_name.clone()),
            points: Set(self.ranking_points()),
            exact_points: Set(self.exact_ranking_points()),
            category: Set(self.category.clone()),
            notes: NotSet,
            updated_at: Set(now),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RosterResponse {
    #[serde(default, rename = "liste")]
    players: Vec<RosterEntry>,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub total: usize,
    pub inserted: usize,
    pub updated: usize,
}

pub async fn fetch_club_roster(club_id: &str) -> Result<Vec<RosterEntry>, GenericError> {
    let base = std::env::var("FFTT_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
    let url = format!("{base}/joueurs/{club_id}");

    let response = reqwest::Client::new()
        .get(&url)
        .header(USER_AGENT, GENERIC_USER_AGENT)
        .send()
        .await
        .map_err(|e| {
            error!("unable to reach the federation API: {}", e);
            GenericError::FederationGaveUp("Unable to reach the federation API")
        })?;

    if !response.status().is_success() {
        error!("federation API answered with status {}", response.status());
        return Err(GenericError::FederationGaveUp(
            "Federation API returned an error status",
        ));
    }

    let roster: RosterResponse = response.json().await.map_err(|e| {
        error!("federation API sent an unreadable roster: {}", e);
        GenericError::FederationGaveUp("Unable to decode the federation roster")
    })?;

    Ok(roster.players)
}

/// Reconciles the fetched roster against the local player table. The write
/// is a single `ON CONFLICT (licence) DO UPDATE` batch, so overlapping runs
/// can never produce duplicate rows; `notes` stays admin-owned.
pub async fn sync_roster(
    db: &impl ConnectionTrait,
    roster: Vec<RosterEntry>,
) -> Result<SyncSummary, GenericError> {
    if roster.is_empty() {
        return Err(GenericError::NotFound("No players found for the club"));
    }

    let licences: Vec<String> = roster.iter().map(|p| p.licence.clone()).collect();
    let known: HashSet<String> = Player::find()
        .filter(player::Column::Licence.is_in(licences))
        .all(db)
        .await
        .map_err(|e| {
            error!("unable to read existing players: {}", e);
            GenericError::UnknownError("Unable to read existing players")
        })?
        .into_iter()
        .map(|p| p.licence)
        .collect();

    let now = chrono::Utc::now().fixed_offset();
    Player::insert_many(roster.iter().map(|p| p.to_active_model(now)))
        .on_conflict(
            sea_query::OnConflict::column(player::Column::Licence)
                .update_columns([
                    player::Column::FirstName,
                    player::Column::LastName,
                    player::Column::Points,
                    player::Column::ExactPoints,
                    player::Column::Category,
                    player::Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec(db)
        .await
        .map_err(|e| {
            error!("unable to upsert players: {}", e);
            GenericError::UnknownError("Unable to store the player roster")
        })?;

    let updated = roster.iter().filter(|p| known.contains(&p.licence)).count();
    Ok(SyncSummary {
        total: roster.len(),
        inserted: roster.len() - updated,
        updated,
    })
}

pub async fn run_sync(db: &impl ConnectionTrait) -> Result<SyncSummary, GenericError> {
    let club_id = std::env::var("CLUB_ID")
        .map_err(|_| GenericError::UnknownError("CLUB_ID not set"))?;
    let roster = fetch_club_roster(&club_id).await?;
    let summary = sync_roster(db, roster).await?;
    info!(
        "player sync finished: {} total, {} inserted, {} updated",
        summary.total, summary.inserted, summary.updated
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn entry(licence: &str, points: Option<&str>, exact: Option<&str>) -> RosterEntry {
        RosterEntry {
            licence: licence.to_string(),
            last_name: "DURAND".to_string(),
            first_name: "Claire".to_string(),
            points: points.map(str::to_string),
            exact_points: exact.map(str::to_string),
            category: Some("S".to_string()),
        }
    }

    #[test]
    fn unparseable_points_default_to_500() {
        assert_eq!(entry("1", Some("NC"), None).ranking_points(), DEFAULT_POINTS);
        assert_eq!(entry("1", None, None).ranking_points(), DEFAULT_POINTS);
        assert_eq!(entry("1", Some("1123"), None).ranking_points(), 1123);
    }

    #[test]
    fn exact_points_fall_back_to_rounded_then_500() {
        assert_eq!(
            entry("1", Some("1123"), Some("1123.5")).exact_ranking_points(),
            1123.5
        );
        assert_eq!(
            entry("1", Some("1123"), Some("n/a")).exact_ranking_points(),
            1123.0
        );
        assert_eq!(
            entry("1", Some("NC"), Some("n/a")).exact_ranking_points(),
            f64::from(DEFAULT_POINTS)
        );
    }

    #[test]
    fn roster_entry_accepts_numbers_or_strings() {
        let raw = r#"{"licence": 9439247, "nom": "MARTIN", "prenom": "Paul",
                      "point": "812", "pointm": 812.25, "cat": "V1"}"#;
        let parsed: RosterEntry = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.licence, "9439247");
        assert_eq!(parsed.ranking_points(), 812);
        assert_eq!(parsed.exact_ranking_points(), 812.25);
    }

    #[test]
    fn roster_entry_tolerates_null_points() {
        let raw = r#"{"licence": "12", "nom": "N", "prenom": "P", "point": null}"#;
        let parsed: RosterEntry = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.ranking_points(), DEFAULT_POINTS);
    }

    #[tokio::test]
    async fn sync_counts_updates_and_inserts() {
        let existing = player::Model {
            id: 1,
            licence: "123".to_string(),
            first_name: "Claire".to_string(),
            last_name: "DURAND".to_string(),
            points: 900,
            exact_points: 900.0,
            category: Some("S".to_string()),
            notes: None,
            updated_at: chrono::Utc::now().fixed_offset(),
        };
        let returned = player::Model {
            id: 2,
            licence: "456".to_string(),
            ..existing.clone()
        };
        // Postgres inserts run with RETURNING, so the upsert consumes a
        // query result; the exec result covers the non-returning path.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![existing], vec![returned]])
            .append_exec_results([MockExecResult {
                last_insert_id: 2,
                rows_affected: 2,
            }])
            .into_connection();

        let roster = vec![
            entry("123", Some("912"), Some("912.5")),
            entry("456", Some("534"), None),
        ];
        let summary = sync_roster(&db, roster).await.unwrap();
        assert_eq!(summary.total, 2);
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.inserted, 1);
        assert_eq!(summary.total, summary.inserted + summary.updated);
    }

    #[tokio::test]
    async fn empty_roster_is_an_error_and_writes_nothing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let result = sync_roster(&db, Vec::new()).await;
        assert!(matches!(result, Err(GenericError::NotFound(_))));
    }
}
