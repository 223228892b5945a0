// state.rs
use std::sync::Arc;
use std::time::Duration;

use crate::auth::{AuthService, JwtService};
use crate::config::Config;
use crate::db::listings::ListingStore;
use crate::domain::ListingService;
use crate::middleware::ClientRateLimiter;

/// Everything a request handler needs, shared across astra's workers.
pub struct AppState {
    pub config: Config,
    pub api_base: String,
    pub listings: ListingService,
    pub auth: AuthService,
    pub limiter: ClientRateLimiter,
}

impl AppState {
    pub fn new(config: Config, store: Arc<ListingStore>) -> Self {
        let jwt = JwtService::new(
            &config.jwt_secret,
            config.jwt_issuer.clone(),
            to_chrono(config.jwt_expires_in),
            to_chrono(config.jwt_refresh_expires_in),
        );
        let auth = AuthService::new(jwt)
            .with_demo_user(&config.demo_user_email, &config.demo_user_password);
        let limiter =
            ClientRateLimiter::new(config.rate_limit_window, config.rate_limit_max_requests);

        Self {
            api_base: config.api_base(),
            listings: ListingService::new(store),
            auth,
            limiter,
            config,
        }
    }
}

/// Token lifetimes are capped at ten years.
fn to_chrono(d: Duration) -> chrono::Duration {
    let cap = chrono::Duration::days(3650);
    chrono::Duration::from_std(d).map_or(cap, |d| d.min(cap))
}
