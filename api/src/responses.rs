use rocket::serde::json::Json;
use rocket_okapi::gen::OpenApiGenerator;
use rocket_okapi::okapi::openapi3::{RefOr, Response as OpenApiResponse, Responses};
use rocket_okapi::okapi::Map;
use rocket_okapi::response::OpenApiResponderInner;

use service::dto::{ContactOutcome, FeedEnvelope, SyncReport};

/// Feed proxies always answer with a JSON envelope; the variant only picks
/// the status code.
#[derive(Responder)]
pub enum FeedProxyResponse {
    #[response(status = 200)]
    Filled(Json<FeedEnvelope>),
    #[response(status = 500)]
    Unavailable(Json<FeedEnvelope>),
}

#[derive(Responder)]
pub enum ContactResponse {
    #[response(status = 200)]
    Accepted(Json<ContactOutcome>),
    #[response(status = 400)]
    Invalid(Json<ContactOutcome>),
    #[response(status = 500)]
    Failed(Json<ContactOutcome>),
}

#[derive(Responder)]
pub enum SyncResponse {
    #[response(status = 200)]
    Completed(Json<SyncReport>),
    #[response(status = 404)]
    EmptyRoster(Json<SyncReport>),
    #[response(status = 500)]
    Failed(Json<SyncReport>),
}

fn envelope_responses(codes: &[(&str, &str)]) -> Responses {
    let mut responses = Map::new();
    for (code, description) in codes {
        responses.insert(
            code.to_string(),
            RefOr::Object(OpenApiResponse {
                description: description.to_string(),
                ..Default::default()
            }),
        );
    }
    Responses {
        responses,
        ..Default::default()
    }
}

impl OpenApiResponderInner for FeedProxyResponse {
    fn responses(_: &mut OpenApiGenerator) -> rocket_okapi::Result<Responses> {
        Ok(envelope_responses(&[
            ("200", "Feed items, at most 10, descriptions capped at 200 characters."),
            ("500", "Upstream feed unreachable; envelope carries `error` and empty `items`."),
        ]))
    }
}

impl OpenApiResponderInner for ContactResponse {
    fn responses(_: &mut OpenApiGenerator) -> rocket_okapi::Result<Responses> {
        Ok(envelope_responses(&[
            ("200", "Message stored; notification is best-effort."),
            ("400", "A required field is missing; nothing was stored."),
            ("500", "The message could not be stored."),
        ]))
    }
}

impl OpenApiResponderInner for SyncResponse {
    fn responses(_: &mut OpenApiGenerator) -> rocket_okapi::Result<Responses> {
        Ok(envelope_responses(&[
            ("200", "Roster synchronized; counts satisfy total = inserted + updated."),
            ("404", "The federation returned no players; nothing was written."),
            ("500", "Federation or storage failure."),
        ]))
    }
}
