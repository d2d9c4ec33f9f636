mod authenticate;
mod mutation;
mod pages;
mod query;
mod responses;

use rocket_okapi::openapi_get_routes;

#[macro_use]
extern crate rocket;

use authenticate::*;
use mutation::*;
use pages::*;
use query::*;

use rocket::fs::FileServer;
use rocket::{Build, Rocket};
use sea_orm::DatabaseConnection;

use rocket_okapi::rapidoc::{make_rapidoc, GeneralConfig, HideShowConfig, RapiDocConfig};
use rocket_okapi::settings::UrlObject;
use rocket_okapi::swagger_ui::{make_swagger_ui, SwaggerUIConfig};

/// Deployment knobs read once at launch.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub base_url: String,
    pub static_path: String,
}

impl SiteConfig {
    pub fn new(base_url: &str, static_path: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            static_path: static_path.to_string(),
        }
    }

    pub fn from_env() -> Self {
        let base_url = std::env::var("SITE_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8000".to_string());
        let static_path = std::env::var("STATIC_PATH").expect("STATIC_PATH not set");
        Self::new(&base_url, &static_path)
    }
}

#[catch(404)]
fn general_not_found() -> &'static str {
    "Api endpoint not found"
}

pub fn routes() -> Vec<rocket::Route> {
    openapi_get_routes![
        contact,
        feed_fftt,
        feed_handisport,
        get_players,
        sync_players,
        register,
        login,
        logout,
        check_cookie,
        admin_me,
        admin_messages,
    ]
}

/// Page-gate and crawler routes mounted at the site root, in front of the
/// static file server.
pub fn site_routes() -> Vec<rocket::Route> {
    rocket::routes![
        robots_txt,
        sitemap_xml,
        admin_login_page,
        admin_home,
        admin_pages,
        member_pages,
    ]
}

pub async fn launch(db: DatabaseConnection) -> Rocket<Build> {
    let config = SiteConfig::from_env();
    let static_path = config.static_path.clone();

    rocket::build()
        .manage(db)
        .manage(config)
        .mount("/api", routes())
        .mount(
            "/api/swagger",
            make_swagger_ui(&SwaggerUIConfig {
                url: "../openapi.json".to_owned(),
                ..Default::default()
            }),
        )
        .mount(
            "/api/",
            make_rapidoc(&RapiDocConfig {
                general: GeneralConfig {
                    spec_urls: vec![UrlObject::new("General", "./openapi.json")],
                    ..Default::default()
                },
                hide_show: HideShowConfig {
                    allow_spec_url_load: false,
                    allow_spec_file_load: false,
                    ..Default::default()
                },
                ..Default::default()
            }),
        )
        .register("/api", catchers![general_not_found])
        .mount("/", site_routes())
        .mount("/", FileServer::from(static_path))
}
