use entity::{account, admin};

use rocket::http::{CookieJar, Status};
use rocket::outcome::Outcome;
use rocket::serde::json::Json;
use rocket::{
    get,
    request::{self, FromRequest},
    Request, State,
};

use log::warn;
use rocket_okapi::{openapi, request::OpenApiFromRequest};
use sea_orm::DatabaseConnection;

use service::dto::LoginInput;
use service::error::{AuthError, GenericError};

/// A request carrying a valid, unexpired session cookie. Resolving the
/// guard slides the session expiry and re-sets the cookie, so any guarded
/// response may rewrite cookies.
#[derive(OpenApiFromRequest, Debug)]
pub struct SessionUser {
    pub account: account::Model,
    pub token: String,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for SessionUser {
    type Error = GenericError;

    async fn from_request(request: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let db = request
            .rocket()
            .state::<DatabaseConnection>()
            .expect("Database not found");

        let Some(cookie) = request.cookies().get_private(service::SESSION_COOKIE) else {
            return Outcome::Error((
                Status::Unauthorized,
                AuthError::Missing("No session cookie found").into(),
            ));
        };
        let token = cookie.value().to_string();

        match service::get_live_session(db, &token).await {
            Ok(Some((session, account))) => {
                if let Err(e) =
                    service::refresh_session(db, session, request.cookies()).await
                {
                    warn!("unable to refresh session: {:?}", e);
                }
                Outcome::Success(SessionUser { account, token })
            }
            Ok(None) => Outcome::Error((
                Status::Forbidden,
                AuthError::Invalid("Session expired or revoked").into(),
            )),
            Err(e) => Outcome::Error((Status::InternalServerError, e)),
        }
    }
}

/// A session whose account email has a row in the admin table. A missing
/// admin row fails exactly like an invalid session, so a logged-in
/// non-admin cannot tell the difference.
#[derive(OpenApiFromRequest, Debug)]
pub struct AdminUser {
    pub admin: admin::Model,
    pub account: account::Model,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AdminUser {
    type Error = GenericError;

    async fn from_request(request: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let db = request
            .rocket()
            .state::<DatabaseConnection>()
            .expect("Database not found");

        match request.guard::<SessionUser>().await {
            Outcome::Success(user) => {
                match service::get_admin_by_email(db, &user.account.email).await {
                    Ok(Some(admin)) => Outcome::Success(AdminUser {
                        admin,
                        account: user.account,
                    }),
                    Ok(None) => Outcome::Error((
                        Status::Forbidden,
                        AuthError::Invalid("Session expired or revoked").into(),
                    )),
                    Err(e) => Outcome::Error((Status::InternalServerError, e)),
                }
            }
            Outcome::Error(e) => Outcome::Error(e),
            Outcome::Forward(f) => Outcome::Forward(f),
        }
    }
}

/// # Register
///
/// Creates an account and opens a session for it.
#[openapi(tag = "Auth")]
#[post("/auth/register", format = "json", data = "<input>")]
pub(crate) async fn register(
    input: Json<LoginInput>,
    db: &State<DatabaseConnection>,
    cookies: &CookieJar<'_>,
) -> Result<&'static str, GenericError> {
    let input = input.into_inner();
    let account = service::create_account(db.inner(), &input.email, &input.password).await?;
    service::generate_cookie(db.inner(), account.id, cookies).await?;
    Ok("Successfully registered")
}

/// # Login
///
/// Verifies credentials and sets the session cookie.
#[openapi(tag = "Auth")]
#[post("/auth/login", format = "json", data = "<input>")]
pub(crate) async fn login(
    input: Json<LoginInput>,
    db: &State<DatabaseConnection>,
    cookies: &CookieJar<'_>,
) -> Result<&'static str, GenericError> {
    let input = input.into_inner();
    match service::authenticate(db.inner(), &input.email, &input.password).await? {
        Some(account) => {
            service::generate_cookie(db.inner(), account.id, cookies).await?;
            Ok("Successfully logged in")
        }
        None => Err(AuthError::WrongPassword("Wrong email or password").into()),
    }
}

#[openapi(tag = "Auth")]
#[post("/auth/logout")]
pub(crate) async fn logout(
    db: &State<DatabaseConnection>,
    cookies: &CookieJar<'_>,
    user: SessionUser,
) -> Result<&'static str, GenericError> {
    service::remove_session(db.inner(), &user.token, cookies).await?;
    Ok("Successfully logged out")
}

#[openapi(tag = "Auth")]
#[get("/auth/check")]
pub(crate) async fn check_cookie(_user: SessionUser) -> &'static str {
    "Authenticated"
}
