//! Alert system for displaying success and error messages to users.
//!
//! Alerts are swapped out-of-band into the `#alert-container` element that
//! every page built with [crate::html::base] carries.

use axum::response::{Html, IntoResponse, Response};
use maud::{Markup, html};

/// A message shown to the user after an HTMX request.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// An operation succeeded, with a line of extra detail.
    Success {
        /// The headline shown in bold.
        message: String,
        /// Extra information shown under the headline.
        details: String,
    },
    /// An operation succeeded.
    SuccessSimple {
        /// The headline shown in bold.
        message: String,
    },
    /// An operation failed.
    Error {
        /// The headline shown in bold.
        message: String,
        /// What went wrong and how to fix it.
        details: String,
    },
}

impl Alert {
    /// Render the alert as an out-of-band swap for `#alert-container`.
    pub fn into_html(self) -> Markup {
        let (container_style, message, details) = match self {
            Alert::Success { message, details } => (
                "text-green-800 bg-green-50 border-green-300 \
                dark:bg-gray-800 dark:text-green-400 dark:border-green-800",
                message,
                Some(details),
            ),
            Alert::SuccessSimple { message } => (
                "text-green-800 bg-green-50 border-green-300 \
                dark:bg-gray-800 dark:text-green-400 dark:border-green-800",
                message,
                None,
            ),
            Alert::Error { message, details } => (
                "text-red-800 bg-red-50 border-red-300 \
                dark:bg-gray-800 dark:text-red-400 dark:border-red-800",
                message,
                Some(details),
            ),
        };

        html! {
            div
                id="alert-container"
                hx-swap-oob="true"
                class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                div
                    role="alert"
                    class={ "flex items-start justify-between gap-4 p-4 text-sm border rounded-lg " (container_style) }
                {
                    div
                    {
                        p class="font-semibold" { (message) }

                        @if let Some(details) = details.filter(|details| !details.is_empty()) {
                            p class="mt-1" { (details) }
                        }
                    }

                    button
                        type="button"
                        aria-label="Dismiss"
                        class="font-bold"
                        onclick="this.closest('[role=alert]').remove()"
                    {
                        "×"
                    }
                }
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        Html(self.into_html().into_string()).into_response()
    }
}
