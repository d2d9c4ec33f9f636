use std::path::{Path, PathBuf};

use rocket::fs::NamedFile;
use rocket::http::ContentType;
use rocket::response::Redirect;
use rocket::State;

use crate::authenticate::{AdminUser, SessionUser};
use crate::SiteConfig;

/// Pages listed in the sitemap. Everything behind a gate stays out.
const PUBLIC_PAGES: [&str; 1] = ["/"];

async fn serve(static_path: &str, relative: &Path) -> Option<NamedFile> {
    let mut full = PathBuf::from(static_path).join(relative);
    if full.is_dir() {
        full.push("index.html");
    }
    NamedFile::open(full).await.ok()
}

#[get("/robots.txt")]
pub(crate) async fn robots_txt(config: &State<SiteConfig>) -> (ContentType, String) {
    let body = format!(
        "User-agent: *\n\
         Disallow: /admin/\n\
         Disallow: /api/\n\
         Disallow: /espace-membre/\n\
         \n\
         Sitemap: {}/sitemap.xml\n",
        config.base_url
    );
    (ContentType::Plain, body)
}

#[get("/sitemap.xml")]
pub(crate) async fn sitemap_xml(config: &State<SiteConfig>) -> (ContentType, String) {
    let mut body = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for page in PUBLIC_PAGES {
        body.push_str(&format!(
            "  <url><loc>{}{}</loc></url>\n",
            config.base_url, page
        ));
    }
    body.push_str("</urlset>\n");
    (ContentType::XML, body)
}

/// Login page for the admin area. An already-authenticated admin is sent
/// straight to the dashboard.
#[get("/admin/login")]
pub(crate) async fn admin_login_page(
    user: Option<AdminUser>,
    config: &State<SiteConfig>,
) -> Result<Option<NamedFile>, Redirect> {
    if user.is_some() {
        return Err(Redirect::to("/admin"));
    }
    Ok(serve(&config.static_path, Path::new("admin/login.html")).await)
}

#[get("/admin")]
pub(crate) async fn admin_home(
    user: Option<AdminUser>,
    config: &State<SiteConfig>,
) -> Result<Option<NamedFile>, Redirect> {
    if user.is_none() {
        return Err(Redirect::to("/admin/login"));
    }
    Ok(serve(&config.static_path, Path::new("admin")).await)
}

/// Everything under /admin/ except the login page requires an admin
/// session; anonymous visitors land on the login page instead of a 403 so
/// the area stays navigable from a bookmark.
#[get("/admin/<path..>", rank = 2)]
pub(crate) async fn admin_pages(
    path: PathBuf,
    user: Option<AdminUser>,
    config: &State<SiteConfig>,
) -> Result<Option<NamedFile>, Redirect> {
    if user.is_none() {
        return Err(Redirect::to("/admin/login"));
    }
    Ok(serve(&config.static_path, &Path::new("admin").join(path)).await)
}

/// The members area only needs a live session, not an admin row. Anonymous
/// visitors are sent to the public home page.
#[get("/espace-membre/<path..>")]
pub(crate) async fn member_pages(
    path: PathBuf,
    user: Option<SessionUser>,
    config: &State<SiteConfig>,
) -> Result<Option<NamedFile>, Redirect> {
    if user.is_none() {
        return Err(Redirect::to("/"));
    }
    Ok(serve(&config.static_path, &Path::new("espace-membre").join(path)).await)
}

#[cfg(test)]
mod tests {
    use rocket::http::Status;
    use rocket::local::asynchronous::Client;

    use crate::SiteConfig;

    async fn client() -> Client {
        let rocket = rocket::build()
            .manage(SiteConfig::new("https://example.org", "static"))
            .mount("/", crate::site_routes());
        Client::tracked(rocket).await.expect("valid rocket")
    }

    #[rocket::async_test]
    async fn robots_disallows_gated_areas() {
        let client = client().await;
        let response = client.get("/robots.txt").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        let body = response.into_string().await.unwrap();
        assert!(body.contains("Disallow: /admin/"));
        assert!(body.contains("Disallow: /api/"));
        assert!(body.contains("Disallow: /espace-membre/"));
        assert!(body.contains("Sitemap: https://example.org/sitemap.xml"));
    }

    #[rocket::async_test]
    async fn sitemap_lists_only_public_pages() {
        let client = client().await;
        let response = client.get("/sitemap.xml").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        let body = response.into_string().await.unwrap();
        assert!(body.contains("<loc>https://example.org/</loc>"));
        assert!(!body.contains("admin"));
        assert!(!body.contains("espace-membre"));
    }
}
