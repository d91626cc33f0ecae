//! Ends a session by replacing the auth cookie with an expired one.

use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::PrivateCookieJar;

use crate::{auth::invalidate_auth_cookie, endpoints};

/// Invalidate the auth cookie and send the client back to the log-in page.
pub async fn get_log_out(jar: PrivateCookieJar) -> Response {
    (invalidate_auth_cookie(jar), Redirect::to(endpoints::LOG_IN_VIEW)).into_response()
}

#[cfg(test)]
mod log_out_tests {
    use axum::http::{StatusCode, header::LOCATION};
    use axum_extra::extract::cookie::Cookie;
    use axum_test::TestServer;
    use serde_json::json;
    use time::{Duration, OffsetDateTime};

    use crate::{
        AppState, PasswordHash, ValidatedPassword,
        auth::{COOKIE_TOKEN, create_user},
        build_router,
        currency::Currency,
        endpoints,
        test_utils::get_test_connection,
    };

    const EMAIL: &str = "saver@example.com";
    const PASSWORD: &str = "correcthorsebatterystaple";

    fn get_test_server() -> TestServer {
        let connection = get_test_connection();
        create_user(
            EMAIL.parse().unwrap(),
            PasswordHash::new(ValidatedPassword::new_unchecked(PASSWORD), 4).unwrap(),
            &connection,
        )
        .unwrap();
        let state = AppState::new(connection, "42", "Etc/UTC", Currency::Usd).unwrap();

        TestServer::try_new(build_router(state)).expect("Could not create test server.")
    }

    async fn log_in(server: &TestServer) -> Cookie<'static> {
        let response = server
            .post(endpoints::LOG_IN_API)
            .form(&[("email", EMAIL), ("password", PASSWORD)])
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        response.cookie(COOKIE_TOKEN)
    }

    #[tokio::test]
    async fn log_out_expires_cookie_and_redirects_to_log_in() {
        let server = get_test_server();
        let session = log_in(&server).await;

        let response = server.get(endpoints::LOG_OUT).add_cookie(session).await;

        response.assert_status_see_other();
        assert_eq!(response.header(LOCATION), endpoints::LOG_IN_VIEW);
        let expired = response.cookie(COOKIE_TOKEN);
        assert_eq!(expired.expires_datetime(), Some(OffsetDateTime::UNIX_EPOCH));
        assert_eq!(expired.max_age(), Some(Duration::ZERO));
    }

    #[tokio::test]
    async fn logged_out_cookie_cannot_read_records() {
        let server = get_test_server();
        let session = log_in(&server).await;
        server
            .get(endpoints::BALANCE_STATS_ACTION)
            .add_cookie(session.clone())
            .await
            .assert_status_ok();

        let expired = server
            .get(endpoints::LOG_OUT)
            .add_cookie(session)
            .await
            .cookie(COOKIE_TOKEN);

        let response = server
            .get(endpoints::BALANCE_STATS_ACTION)
            .add_cookie(expired.clone())
            .await;
        response.assert_status_unauthorized();
        response.assert_json(&json!({"success": false, "error": "Unauthorized"}));

        let response = server.get(endpoints::DASHBOARD_VIEW).add_cookie(expired).await;
        response.assert_status_see_other();
        let location = response.header(LOCATION);
        assert!(
            location.to_str().unwrap().starts_with(endpoints::LOG_IN_VIEW),
            "got location {location:?}"
        );
    }

    #[tokio::test]
    async fn log_out_without_session_still_redirects() {
        let server = get_test_server();

        let response = server.get(endpoints::LOG_OUT).await;

        response.assert_status_see_other();
        assert_eq!(response.header(LOCATION), endpoints::LOG_IN_VIEW);
    }
}
