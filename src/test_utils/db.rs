use rusqlite::Connection;

use crate::{
    PasswordHash,
    auth::{UserID, create_user},
    db::initialize,
};

/// An in-memory database with every table created.
pub(crate) fn get_test_connection() -> Connection {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    initialize(&connection).expect("Could not initialize test database");

    connection
}

#[track_caller]
pub(crate) fn insert_test_user(connection: &Connection, email: &str) -> UserID {
    create_user(
        email.parse().expect("Invalid test email"),
        PasswordHash::new_unchecked("hunter2"),
        connection,
    )
    .expect("Could not create test user")
    .id
}
