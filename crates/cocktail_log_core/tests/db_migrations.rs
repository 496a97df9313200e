use cocktail_log_core::db::migrations::{latest_version, schema_version};
use cocktail_log_core::db::{open_db, open_db_in_memory, DbError};
use cocktail_log_core::{
    RepoError, ReviewDraft, ReviewListQuery, ReviewService, SqliteRecipeRepository,
    SqliteReviewRepository,
};
use rusqlite::Connection;

#[test]
fn fresh_database_has_every_collection() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn).unwrap(), latest_version());
    assert_eq!(user_tables(&conn), vec!["recipes", "reviews"]);
}

#[test]
fn reopening_a_file_keeps_logged_reviews() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cocktail_log.sqlite3");

    let logged = {
        let mut conn = open_db(&path).unwrap();
        let mut service = ReviewService::new(SqliteReviewRepository::try_new(&mut conn).unwrap());
        service.create(&ReviewDraft::new("Doctor Funk", 5.0)).unwrap()
    };

    let mut reopened = open_db(&path).unwrap();
    assert_eq!(schema_version(&reopened).unwrap(), latest_version());
    let service = ReviewService::new(SqliteReviewRepository::try_new(&mut reopened).unwrap());
    assert_eq!(
        service.list(&ReviewListQuery::default()).unwrap(),
        vec![logged]
    );
}

#[test]
fn file_from_a_newer_build_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");
    Connection::open(&path)
        .unwrap()
        .pragma_update(None, "user_version", 999)
        .unwrap();

    let err = open_db(&path).unwrap_err();

    assert!(matches!(
        err,
        DbError::UnsupportedSchemaVersion { db_version: 999, latest_supported }
            if latest_supported == latest_version()
    ));
    assert!(err.to_string().contains("newer cocktail-log"));
    assert!(!err.is_busy());
}

#[test]
fn raw_connection_is_not_accepted_by_repositories() {
    let mut conn = Connection::open_in_memory().unwrap();

    let err = SqliteReviewRepository::try_new(&mut conn).err().unwrap();
    assert!(matches!(
        err,
        RepoError::UninitializedConnection { expected_version, actual_version: 0 }
            if expected_version == latest_version()
    ));
}

#[test]
fn hand_built_schema_missing_recipe_fields_is_rejected() {
    let mut conn = Connection::open_in_memory().unwrap();
    conn.pragma_update(None, "user_version", latest_version())
        .unwrap();
    assert!(matches!(
        SqliteRecipeRepository::try_new(&mut conn),
        Err(RepoError::MissingRequiredTable("recipes"))
    ));

    conn.execute_batch("CREATE TABLE recipes (id TEXT PRIMARY KEY NOT NULL, name TEXT NOT NULL);")
        .unwrap();
    assert!(matches!(
        SqliteRecipeRepository::try_new(&mut conn),
        Err(RepoError::MissingRequiredColumn {
            table: "recipes",
            column: "extra_json"
        })
    ));
}

fn user_tables(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare(
            "SELECT name FROM sqlite_master
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
             ORDER BY name;",
        )
        .unwrap();
    stmt.query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<Vec<String>, _>>()
        .unwrap()
}
