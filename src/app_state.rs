//! The state shared by every request handler.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use rusqlite::Connection;
use sha2::{Digest, Sha512};
use time::Duration;

use crate::{
    Error, auth::DEFAULT_COOKIE_DURATION, currency::Currency, db::initialize,
    timezone::get_local_offset,
};

/// The server configuration and the database handle.
///
/// Handlers extract the parts they need through their own `FromRef` states.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The key used to encrypt the private auth cookie.
    pub cookie_key: Key,

    /// How long a log-in lasts without activity.
    pub cookie_duration: Duration,

    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,

    /// The currency amounts of money are displayed in.
    pub currency: Currency,

    /// The connection to the SQLite database holding every user's records.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Create the tables in `db_connection` and wrap the server configuration.
    ///
    /// # Errors
    /// Returns:
    /// - [Error::InvalidTimezoneError] if `local_timezone` is not a canonical timezone name,
    /// - [Error::SqlError] if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        cookie_secret: &str,
        local_timezone: &str,
        currency: Currency,
    ) -> Result<Self, Error> {
        if get_local_offset(local_timezone).is_none() {
            return Err(Error::InvalidTimezoneError(local_timezone.to_owned()));
        }

        initialize(&db_connection)?;

        Ok(Self {
            cookie_key: create_cookie_key(cookie_secret),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            local_timezone: local_timezone.to_owned(),
            currency,
            db_connection: Arc::new(Mutex::new(db_connection)),
        })
    }
}

// `PrivateCookieJar` reads the key through this impl.
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Derive the cookie encryption key from the SHA-512 digest of `secret`.
pub fn create_cookie_key(secret: &str) -> Key {
    Key::from(&Sha512::digest(secret))
}
