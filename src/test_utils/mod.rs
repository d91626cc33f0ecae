#![allow(missing_docs)]

pub(crate) mod db;
pub(crate) mod form;
pub(crate) mod html;
pub(crate) mod http;

pub(crate) use db::{get_test_connection, insert_test_user};
pub(crate) use form::{
    assert_form_input, assert_form_input_with_value, assert_form_submit_button,
    assert_hx_endpoint, get_category_suggestions, get_select_options, must_get_form,
};
pub(crate) use html::{
    assert_progress, assert_valid_html, get_budget_cards, must_get_delete_url, must_get_text,
    parse_html_document, parse_html_fragment,
};
pub(crate) use http::{
    assert_action_failure, assert_html_content_type, assert_hx_redirect, must_get_action_data,
    parse_action_result,
};
