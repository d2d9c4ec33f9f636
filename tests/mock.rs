extern crate rocket;
use rocket::async_test;

#[cfg(test)]
mod tests {
    use super::*;

    use dotenvy::dotenv;
    use migration::MigratorTrait;
    use rocket::figment::Profile;
    use rocket::http::Status;
    use rocket::local::asynchronous::Client;
    use rocket::log::private::LevelFilter;
    use rocket::{Build, Config, Rocket};
    use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait};

    use service::dto::forms::ContactForm;

    // These tests need a disposable Postgres database. They are skipped when
    // DEV_DATABASE_URL is not set so the unit suite stays runnable anywhere.
    fn database_configured() -> bool {
        dotenv().ok();
        std::env::var("DEV_DATABASE_URL").is_ok()
    }

    async fn make_db() -> DatabaseConnection {
        let db_url = std::env::var("DEV_DATABASE_URL").expect("DEV_DATABASE_URL not set");
        let mut opt = ConnectOptions::new(db_url);
        opt.sqlx_logging(false);
        opt.sqlx_logging_level(LevelFilter::Off);
        Database::connect(opt).await.expect("Database must exist")
    }

    async fn clear_db() -> DatabaseConnection {
        let db = make_db().await;
        migration::Migrator::fresh(&db).await.expect("Migration success");
        db
    }

    async fn rocket() -> Rocket<Build> {
        let config = Config {
            profile: Profile::Global,
            log_level: rocket::config::LogLevel::Critical,
            cli_colors: true,
            secret_key: rocket::config::SecretKey::from(&[1u8; 64]),
            ..Default::default()
        };

        rocket::build()
            .manage(make_db().await)
            .manage(api::SiteConfig::new("http://localhost:8000", "static"))
            .mount("/api", api::routes())
            .mount("/", api::site_routes())
            .configure(config)
    }

    async fn make_tracked_client() -> Client {
        Client::tracked(rocket().await)
            .await
            .expect("valid rocket instance")
    }

    async fn contact_message_count(db: &impl ConnectionTrait) -> usize {
        entity::contact_message::Entity::find()
            .all(db)
            .await
            .unwrap()
            .len()
    }

    fn valid_contact() -> ContactForm {
        ContactForm {
            name: Some("Jean Martin".to_string()),
            email: Some("jean@example.org".to_string()),
            phone: Some("".to_string()),
            subject: Some("Inscription".to_string()),
            message: Some("Bonjour, je souhaite m'inscrire au club.".to_string()),
        }
    }

    #[async_test]
    async fn contact_with_missing_field_stores_nothing() {
        if !database_configured() {
            return;
        }
        let db = clear_db().await;
        let client = make_tracked_client().await;

        let mut form = valid_contact();
        form.message = None;
        let res = client.post("/api/contact").json(&form).dispatch().await;

        assert_eq!(res.status(), Status::BadRequest);
        let body = res.into_string().await.unwrap();
        assert!(body.contains("Missing required field: message"));
        assert_eq!(contact_message_count(&db).await, 0);
    }

    #[async_test]
    async fn contact_round_trip_stores_message_as_new() {
        if !database_configured() {
            return;
        }
        let db = clear_db().await;
        let client = make_tracked_client().await;

        // Point the notifier at a relay that cannot be reached; a failed
        // notification must change neither the response nor the stored row.
        std::env::set_var("SMTP_HOST", "127.0.0.1");
        std::env::set_var("SMTP_USERNAME", "club");
        std::env::set_var("SMTP_PASSWORD", "secret");
        std::env::set_var("SMTP_FROM", "site@example.org");
        std::env::set_var("CONTACT_NOTIFY_TO", "president@example.org");

        let res = client
            .post("/api/contact")
            .json(&valid_contact())
            .dispatch()
            .await;
        assert_eq!(res.status(), Status::Ok);

        let stored = entity::contact_message::Entity::find()
            .all(&db)
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].status, "new");
        // A blank phone is stored as absent, not as an empty string.
        assert_eq!(stored[0].phone, None);
    }

    #[async_test]
    async fn anonymous_admin_page_redirects_to_login() {
        if !database_configured() {
            return;
        }
        clear_db().await;
        let client = make_tracked_client().await;

        let res = client.get("/admin/messages.html").dispatch().await;
        assert_eq!(res.status(), Status::SeeOther);
        assert_eq!(res.headers().get_one("Location"), Some("/admin/login"));
    }

    #[async_test]
    async fn authenticated_non_admin_redirects_like_anonymous() {
        if !database_configured() {
            return;
        }
        clear_db().await;
        let client = make_tracked_client().await;

        let credentials = serde_json::json!({
            "email": "adherent@example.org",
            "password": "trustno1",
        });
        let res = client
            .post("/api/auth/register")
            .json(&credentials)
            .dispatch()
            .await;
        assert_eq!(res.status(), Status::Ok);

        // The session is live, but no admin row matches the email, so the
        // admin area answers exactly as it does for an anonymous visitor.
        let res = client.get("/api/auth/check").dispatch().await;
        assert_eq!(res.status(), Status::Ok);

        let res = client.get("/admin/messages.html").dispatch().await;
        assert_eq!(res.status(), Status::SeeOther);
        assert_eq!(res.headers().get_one("Location"), Some("/admin/login"));
    }

    #[async_test]
    async fn register_opens_a_session_and_duplicate_conflicts() {
        if !database_configured() {
            return;
        }
        clear_db().await;
        let client = make_tracked_client().await;

        let credentials = serde_json::json!({
            "email": "membre@example.org",
            "password": "trustno1",
        });
        let res = client
            .post("/api/auth/register")
            .json(&credentials)
            .dispatch()
            .await;
        assert_eq!(res.status(), Status::Ok);

        // The tracked client kept the session cookie.
        let res = client.get("/api/auth/check").dispatch().await;
        assert_eq!(res.status(), Status::Ok);

        let res = client
            .post("/api/auth/register")
            .json(&credentials)
            .dispatch()
            .await;
        assert_eq!(res.status(), Status::Conflict);
    }
}
