use rocket::serde::{Deserialize, Serialize};
use rocket_okapi::gen::OpenApiGenerator;
use rocket_okapi::okapi::openapi3::Responses;
use rocket_okapi::okapi::schemars;
use rocket_okapi::okapi::schemars::{JsonSchema, Map};
use rocket_okapi::response::OpenApiResponderInner;
use std::fmt::Debug;

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Responder)]
pub enum GenericError {
    #[response(status = 500)]
    UnknownError(&'static str),
    #[response(status = 500)]
    FederationGaveUp(&'static str),
    #[response(status = 500)]
    FeedUnavailable(&'static str),
    AuthError(AuthError),
    #[response(status = 409)]
    Conflict(&'static str),
    #[response(status = 404)]
    NotFound(&'static str),
    #[response(status = 400)]
    BadRequest(&'static str),
}

#[derive(Debug, JsonSchema, Deserialize, Serialize, Clone, Responder)]
pub enum AuthError {
    #[response(status = 401)]
    Missing(&'static str),
    #[response(status = 403)]
    Invalid(&'static str),
    #[response(status = 403)]
    WrongPassword(&'static str),
}

impl From<AuthError> for GenericError {
    fn from(e: AuthError) -> Self {
        Self::AuthError(e)
    }
}

impl GenericError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::UnknownError(m)
            | Self::FederationGaveUp(m)
            | Self::FeedUnavailable(m)
            | Self::Conflict(m)
            | Self::NotFound(m)
            | Self::BadRequest(m) => m,
            Self::AuthError(e) => e.message(),
        }
    }
}

impl AuthError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Missing(m) | Self::Invalid(m) | Self::WrongPassword(m) => m,
        }
    }
}

impl OpenApiResponderInner for GenericError {
    fn responses(_: &mut OpenApiGenerator) -> rocket_okapi::Result<Responses> {
        use rocket_okapi::okapi::openapi3::{RefOr, Response as OpenApiResponse};

        let mut responses = Map::new();
        responses.insert(
            "400".to_string(),
            RefOr::Object(OpenApiResponse {
                description: "\
                # [400 Bad Request](https://developer.mozilla.org/en-US/docs/Web/HTTP/Status/400)\n\
                The request given is wrongly formatted or data asked could not be fulfilled. \
                "
                .to_string(),
                ..Default::default()
            }),
        );
        responses.insert(
            "404".to_string(),
            RefOr::Object(OpenApiResponse {
                description: "\
                # [404 Not Found](https://developer.mozilla.org/en-US/docs/Web/HTTP/Status/404)\n\
                This response is given when you request a page that does not exists.\
                "
                .to_string(),
                ..Default::default()
            }),
        );
        responses.insert(
            "409".to_string(),
            RefOr::Object(OpenApiResponse {
                description: "\
                # [409 Conflict](https://developer.mozilla.org/en-US/docs/Web/HTTP/Status/409)\n\
                This response is given when you try to create a resource that already exists. \
                "
                .to_string(),
                ..Default::default()
            }),
        );
        responses.insert(
            "500".to_string(),
            RefOr::Object(OpenApiResponse {
                description: "\
                # [500 Internal Server Error](https://developer.mozilla.org/en-US/docs/Web/HTTP/Status/500)\n\
                This response is given when something wend wrong on the server. \
                ".to_string(),
                ..Default::default()
            }),
        );
        Ok(Responses {
            responses,
            ..Default::default()
        })
    }
}
