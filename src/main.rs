use std::time::Duration;

use api::launch;
use dotenvy::dotenv;
use log::error;

#[rocket::main]
async fn main() -> Result<(), rocket::Error> {
    dotenv().ok();

    let db = sea_orm::Database::connect(std::env::var("DATABASE_URL").expect("DATABASE_URL not set"))
        .await
        .expect("database must be reachable");

    // Daily maintenance: roster refresh and expired-session cleanup. Running
    // the sync from a single in-process timer is what keeps concurrent
    // invocations from overlapping.
    let sync_db = db.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60 * 60 * 24));
        loop {
            interval.tick().await;
            if let Err(e) = service::dto::fftt::run_sync(&sync_db).await {
                error!("scheduled player sync failed: {:?}", e);
            }
            if let Err(e) = service::purge_expired_sessions(&sync_db).await {
                error!("expired session purge failed: {:?}", e);
            }
        }
    });

    launch(db).await.launch().await?;
    Ok(())
}
