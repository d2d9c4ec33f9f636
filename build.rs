use std::env;
fn main() {
    dotenvy::dotenv().ok();

    // Warn early about deployment variables the server expects at runtime.
    let required_vars = ["DATABASE_URL", "STATIC_PATH", "CLUB_ID"];

    for &var in &required_vars {
        if env::var(var).is_err() {
            println!("cargo:warning=Required environment variable {} is not set.", var);
        }
    }
}
