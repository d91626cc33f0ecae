use axum::{body::Body, response::Response};
use scraper::{ElementRef, Html, Selector};

async fn read_body_text(response: Response<Body>) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Could not get response body");

    String::from_utf8_lossy(&body).into_owned()
}

pub(crate) async fn parse_html_document(response: Response<Body>) -> Html {
    Html::parse_document(&read_body_text(response).await)
}

pub(crate) async fn parse_html_fragment(response: Response<Body>) -> Html {
    Html::parse_fragment(&read_body_text(response).await)
}

#[track_caller]
pub(crate) fn assert_valid_html(html: &Html) {
    assert!(
        html.errors.is_empty(),
        "Got HTML parsing errors: {:?}",
        html.errors
    );
}

/// The text of the first element matching `selector`.
#[track_caller]
pub(crate) fn must_get_text(html: &Html, selector: &str) -> String {
    html.select(&Selector::parse(selector).unwrap())
        .next()
        .unwrap_or_else(|| panic!("nothing matches {selector}"))
        .text()
        .collect()
}

/// The budget cards on the budgets page, in display order.
pub(crate) fn get_budget_cards(html: &Html) -> Vec<ElementRef<'_>> {
    html.select(&Selector::parse("li[data-budget-card]").unwrap())
        .collect()
}

/// The URL of the delete button inside a table row or card.
#[track_caller]
pub(crate) fn must_get_delete_url<'a>(element: &ElementRef<'a>) -> &'a str {
    element
        .select(&Selector::parse("button[hx-delete]").unwrap())
        .next()
        .and_then(|button| button.value().attr("hx-delete"))
        .expect("No delete button found")
}

/// Assert that the progress bar inside `element` reports `want_percentage`.
#[track_caller]
pub(crate) fn assert_progress(element: &ElementRef<'_>, want_percentage: &str) {
    let progress_bar = element
        .select(&Selector::parse("[role=progressbar]").unwrap())
        .next()
        .expect("No progress bar found");

    assert_eq!(
        progress_bar.value().attr("aria-valuenow"),
        Some(want_percentage),
        "want progress of {want_percentage}%"
    );
}
