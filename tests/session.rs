mod common;

use common::*;

use crampon::CramponError;
use crampon::postgres::{PgRow, PostgresValue, Tracked, text};
use crampon::prelude::*;

fn session() -> Crampon<MockDriver> {
    Crampon::new(MockDriver::new())
}

#[tokio::test]
async fn exec_casts_models_and_aggregates() {
    let db = session();
    let mut pairs = user_row(1, "ada", r#"{"theme":"dark","beta":true}"#);
    pairs.push(("aggregate_0", PostgresValue::Bigint(4)));
    db.driver().push_rows(vec![PgRow::from_pairs(pairs)]);

    let post = Post::columns();
    let user = UserDemo::columns();
    let rows: Vec<(UserDemo, i64)> = db
        .exec(
            select((UserDemo::all(), func::count(post.id)))
                .join(JoinType::Left, Post::table(), eq(post.author_id, user.id))
                .group_by([user.id]),
        )
        .await
        .expect("exec");

    assert_eq!(rows.len(), 1);
    let (ada, posts) = &rows[0];
    assert_eq!(ada.name, "ada");
    assert!(ada.preferences.beta);
    assert_eq!(*posts, 4);

    let statements = db.driver().statements();
    assert_eq!(statements.len(), 1);
    assert!(statements[0].sql.ends_with(r#"GROUP BY "userdemo"."id""#));
}

#[tokio::test]
async fn exec_surfaces_cast_errors() {
    let db = session();
    db.driver()
        .push_rows(vec![PgRow::from_pairs([("something_else", PostgresValue::Integer(1))])]);

    let user = UserDemo::columns();
    let err = db.exec(select(user.id)).await.unwrap_err();
    assert!(matches!(err, CramponError::MissingColumn { row: 0, .. }));
}

#[tokio::test]
async fn raw_statements_pass_through() {
    let db = session();
    db.driver()
        .push_rows(vec![PgRow::from_pairs([("n", PostgresValue::Integer(1))])]);

    let rows = db
        .fetch_raw(text("SELECT $1::int AS n", [1]))
        .await
        .expect("fetch");
    assert_eq!(rows[0].get_at(0), Some(&PostgresValue::Integer(1)));

    db.driver().push_affected(7);
    let affected = db
        .execute(text("DELETE FROM posts", Vec::<PostgresValue>::new()))
        .await
        .expect("execute");
    assert_eq!(affected, 7);

    let statements = db.driver().statements();
    assert_eq!(statements[0].params, [PostgresValue::Integer(1)]);
    assert_eq!(statements[1].sql, "DELETE FROM posts");
}

#[tokio::test]
async fn insert_writes_back_generated_keys() {
    let db = session();
    db.driver().push_rows(vec![
        PgRow::from_pairs([("id", PostgresValue::Integer(11))]),
        PgRow::from_pairs([("id", PostgresValue::Integer(12))]),
    ]);

    let mut users = vec![user("ada"), user("grace")];
    db.insert(&mut users).await.expect("insert");

    assert_eq!(users[0].id, 11);
    assert_eq!(users[1].id, 12);
    let statements = db.driver().statements();
    assert_eq!(statements.len(), 1);
    assert!(statements[0].sql.ends_with(r#"RETURNING "id""#));
}

#[tokio::test]
async fn insert_rejects_short_returning() {
    let db = session();
    db.driver()
        .push_rows(vec![PgRow::from_pairs([("id", PostgresValue::Integer(1))])]);

    let mut users = vec![user("ada"), user("grace")];
    let err = db.insert(&mut users).await.unwrap_err();
    assert!(matches!(err, CramponError::ExecutionError(_)));
}

#[tokio::test]
async fn insert_without_primary_key_executes() {
    let db = session();
    let mut entries = vec![AuditEntry {
        message: "boot".into(),
    }];
    db.insert(&mut entries).await.expect("insert");

    let statements = db.driver().statements();
    assert_eq!(
        statements[0].sql,
        r#"INSERT INTO "audit_log" ("message") VALUES ($1)"#
    );
}

#[tokio::test]
async fn empty_insert_sends_nothing() {
    let db = session();
    db.insert::<UserDemo>(&mut []).await.expect("insert");
    assert!(db.driver().statements().is_empty());
}

fn tracked_user(id: i32, name: &str) -> Tracked<UserDemo> {
    let mut model = user(name);
    model.id = id;
    Tracked::new(model).expect("tracked")
}

#[tokio::test]
async fn update_and_delete_by_primary_key() {
    let db = session();
    let mut users = [tracked_user(5, "ada")];
    users[0].email = Some("ada@example.com".into());

    db.driver().push_affected(1).push_affected(1);
    assert_eq!(db.update(&mut users).await.expect("update"), 1);
    assert_eq!(db.delete(&[users[0].get().clone()]).await.expect("delete"), 1);

    let statements = db.driver().statements();
    assert_eq!(
        statements[0].sql,
        r#"UPDATE "userdemo" SET "email" = $1 WHERE "userdemo"."id" = $2"#
    );
    assert_eq!(
        statements[1].sql,
        r#"DELETE FROM "userdemo" WHERE "userdemo"."id" = $1"#
    );
    assert_eq!(statements[1].params, [PostgresValue::Integer(5)]);
}

#[tokio::test]
async fn unchanged_models_send_nothing() {
    let db = session();
    let mut users = [tracked_user(1, "ada"), tracked_user(2, "grace")];

    assert_eq!(db.update(&mut users).await.expect("update"), 0);
    assert!(db.driver().statements().is_empty());
}

#[tokio::test]
async fn update_skips_unchanged_and_clears_written_changes() {
    let db = session();
    let mut users = [tracked_user(1, "ada"), tracked_user(2, "grace")];
    users[1].name = "hopper".into();

    assert_eq!(db.update(&mut users).await.expect("update"), 1);
    let statements = db.driver().statements();
    assert_eq!(statements.len(), 1);
    assert_eq!(
        statements[0].params,
        [PostgresValue::Text("hopper".into()), PostgresValue::Integer(2)]
    );
    assert!(!users[1].is_modified().expect("diff"));

    assert_eq!(db.update(&mut users).await.expect("second update"), 0);
    assert_eq!(db.driver().statements().len(), 1);
}

#[tokio::test]
async fn loaded_models_track_changes() {
    let db = session();
    db.driver().push_rows(vec![PgRow::from_pairs(user_row(
        3,
        "ada",
        r#"{"theme":"dark","beta":true}"#,
    ))]);

    let mut users: Vec<Tracked<UserDemo>> = db.exec(select(UserDemo::all())).await.expect("exec");
    users[0].preferences.beta = false;
    db.update(&mut users).await.expect("update");

    let statements = db.driver().statements();
    assert_eq!(
        statements[1].sql,
        r#"UPDATE "userdemo" SET "preferences" = $1 WHERE "userdemo"."id" = $2"#
    );
}

#[tokio::test]
async fn insert_tracked_saves_generated_keys() {
    let db = session();
    db.driver()
        .push_rows(vec![PgRow::from_pairs([("id", PostgresValue::Integer(21))])]);

    let mut users = [Tracked::new(user("ada")).expect("tracked")];
    users[0].name = "ada lovelace".into();
    db.insert_tracked(&mut users).await.expect("insert");

    assert_eq!(users[0].id, 21);
    assert!(!users[0].is_modified().expect("diff"));
    assert_eq!(users[0].saved_primary_key(), Some(&PostgresValue::Integer(21)));
}

#[tokio::test]
async fn update_without_primary_key_fails_before_sending() {
    let db = session();
    let mut entries = [
        Tracked::new(AuditEntry {
            message: "x".into(),
        })
        .expect("tracked"),
    ];
    entries[0].message = "y".into();

    let err = db.update(&mut entries).await.unwrap_err();
    assert!(matches!(err, CramponError::QueryError(_)));
    assert!(db.driver().statements().is_empty());
}
