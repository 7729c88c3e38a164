mod common;

use common::*;

use crampon::CramponError;
use crampon::postgres::builder::{delete_instance, update_instance};
use crampon::postgres::{IntoStatement, PostgresValue};
use crampon::prelude::*;

// =============================================================================
// SELECT
// =============================================================================

#[test]
fn select_whole_model() {
    let (sql, params) = select(UserDemo::all()).build();
    assert_eq!(
        sql,
        concat!(
            r#"SELECT "userdemo"."id" AS "c0_0", "userdemo"."name" AS "c0_1", "#,
            r#""userdemo"."email" AS "c0_2", "#,
            r#""userdemo"."preferences" AS "c0_3" FROM "userdemo""#,
        )
    );
    assert!(params.is_empty());
}

#[test]
fn select_column_with_condition() {
    let user = UserDemo::columns();
    let (sql, params) = select(user.id).r#where(gt(user.id, 10)).build();
    assert_eq!(
        sql,
        r#"SELECT "userdemo"."id" AS "c0" FROM "userdemo" WHERE "userdemo"."id" > $1"#
    );
    assert_eq!(params, [PostgresValue::Integer(10)]);
}

#[test]
fn aggregates_are_numbered_in_select_order() {
    let post = Post::columns();
    let (sql, _) = select((post.author_id, func::count(post.id), func::max(post.views)))
        .group_by([post.author_id])
        .build();
    assert_eq!(
        sql,
        concat!(
            r#"SELECT "posts"."author_id" AS "c0", "#,
            r#"COUNT("posts"."id") AS aggregate_0, MAX("posts"."views") AS aggregate_1 "#,
            r#"FROM "posts" GROUP BY "posts"."author_id""#,
        )
    );
}

#[test]
fn logical_conditions_bind_in_order() {
    let user = UserDemo::columns();
    let (sql, params) = select(user.name)
        .r#where(or([
            and([eq(user.name, "ada"), is_not_null(user.email)]),
            like(user.name, "gr%"),
        ]))
        .build();
    assert_eq!(
        sql,
        concat!(
            r#"SELECT "userdemo"."name" AS "c0" FROM "userdemo" "#,
            r#"WHERE (("userdemo"."name" = $1 AND "userdemo"."email" IS NOT NULL) "#,
            r#"OR "userdemo"."name" LIKE $2)"#,
        )
    );
    assert_eq!(
        params,
        [
            PostgresValue::Text("ada".into()),
            PostgresValue::Text("gr%".into())
        ]
    );
}

#[test]
fn joins_render_before_where() {
    let user = UserDemo::columns();
    let post = Post::columns();
    let (sql, params) = select((user.name, post.title))
        .join(JoinType::Inner, Post::table(), eq(post.author_id, user.id))
        .r#where(gte(post.views, 100i64))
        .order_by([OrderBy::asc(post.title)])
        .limit(20)
        .build();
    assert_eq!(
        sql,
        concat!(
            r#"SELECT "userdemo"."name" AS "c0", "posts"."title" AS "c1" "#,
            r#"FROM "userdemo" INNER JOIN "posts" ON "posts"."author_id" = "userdemo"."id" "#,
            r#"WHERE "posts"."views" >= $1 ORDER BY "posts"."title" ASC LIMIT 20"#,
        )
    );
    assert_eq!(params, [PostgresValue::Bigint(100)]);
}

// =============================================================================
// INSERT / UPDATE / DELETE
// =============================================================================

#[test]
fn insert_skips_generated_and_excluded_columns() {
    let mut first = user("ada");
    first.session_token = Some("secret".into());
    let rows = [first, user("grace")];

    let statement = insert::<UserDemo>()
        .values(&rows)
        .returning_primary_key()
        .into_statement()
        .expect("statement");
    assert_eq!(
        statement.sql,
        concat!(
            r#"INSERT INTO "userdemo" ("name", "email", "preferences") "#,
            r#"VALUES ($1, $2, $3), ($4, $5, $6) RETURNING "id""#,
        )
    );
    assert_eq!(statement.params.len(), 6);
    assert_eq!(statement.params[0], PostgresValue::Text("ada".into()));
    assert_eq!(statement.params[1], PostgresValue::Null);
    assert!(matches!(statement.params[2], PostgresValue::Json(_)));
}

#[test]
fn update_by_primary_key() {
    let mut ada = user("ada");
    ada.id = 3;
    let statement = update_instance(&ada).expect("statement");
    assert_eq!(
        statement.sql,
        concat!(
            r#"UPDATE "userdemo" SET "name" = $1, "email" = $2, "preferences" = $3 "#,
            r#"WHERE "userdemo"."id" = $4"#,
        )
    );
    assert_eq!(statement.params[3], PostgresValue::Integer(3));
}

#[test]
fn typed_update_and_delete() {
    let post = Post::columns();
    let statement = update::<Post>()
        .set(post.views, 0i64)
        .r#where(lt(post.views, 0i64))
        .into_statement()
        .expect("statement");
    assert_eq!(
        statement.sql,
        r#"UPDATE "posts" SET "views" = $1 WHERE "posts"."views" < $2"#
    );

    let (sql, params) = delete::<Post>().r#where(eq(post.author_id, 9)).build();
    assert_eq!(sql, r#"DELETE FROM "posts" WHERE "posts"."author_id" = $1"#);
    assert_eq!(params, [PostgresValue::Integer(9)]);
}

#[test]
fn instance_writes_need_a_primary_key() {
    let entry = AuditEntry {
        message: "hi".into(),
    };
    assert!(matches!(
        update_instance(&entry),
        Err(CramponError::QueryError(_))
    ));
    assert!(matches!(
        delete_instance(&entry),
        Err(CramponError::QueryError(_))
    ));
}
