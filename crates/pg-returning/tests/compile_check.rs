//! Compile-only tests for core API patterns.
//!
//! These tests verify that key API surfaces compile correctly.
//! They do NOT execute against a database — they only check types and
//! signatures, plus the SQL text the builders produce.

#![allow(dead_code)]

use pg_returning::{
    Filter, FromRow, GenericClient, Model, Result, ReturningSet, ReturningStatement,
    SaveReturning, bulk_insert_returning, qb,
};

// ── Model definitions ────────────────────────────────────────────────────────

#[derive(Debug, Clone, FromRow, Model)]
#[orm(table = "compile_users")]
struct CompileUser {
    #[orm(id)]
    id: i64,
    name: String,
    email: Option<String>,
    visits: i32,
}

#[derive(Debug, Clone, FromRow, Model)]
#[orm(table = "compile_posts")]
struct CompilePost {
    #[orm(id)]
    id: i64,
    user_id: i64,
    #[orm(column = "post_title")]
    title: String,
}

// ── Derived metadata ─────────────────────────────────────────────────────────

#[test]
fn derived_model_metadata() {
    assert_eq!(CompileUser::TABLE, "compile_users");
    assert_eq!(CompileUser::COLUMNS, &["id", "name", "email", "visits"]);
    assert_eq!(CompileUser::PRIMARY_KEY, "id");

    // #[orm(column = ...)] renames the column, not the field.
    assert_eq!(CompilePost::COLUMNS, &["id", "user_id", "post_title"]);
}

#[test]
fn derived_value_of_covers_all_columns() {
    let user = CompileUser {
        id: 1,
        name: "alice".into(),
        email: None,
        visits: 0,
    };
    assert_eq!(user.pk(), 1);
    for column in CompileUser::COLUMNS {
        assert!(user.value_of(column).is_some());
    }
    assert!(user.value_of("missing").is_none());
}

// ── Builder SQL ──────────────────────────────────────────────────────────────

#[test]
fn update_builder_sql() {
    let sql = qb::update::<CompileUser>()
        .set("name", "bob")
        .set_raw("visits", "visits + 1")
        .gt("visits", 10i32)
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "UPDATE compile_users SET name = $1, visits = visits + 1 \
         WHERE visits > $2 RETURNING id, name, email, visits"
    );
}

#[test]
fn delete_builder_sql() {
    let sql = qb::delete::<CompileUser>()
        .in_list("id", vec![1i64, 2, 3])
        .only(&["name"])
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "DELETE FROM compile_users WHERE id IN ($1, $2, $3) RETURNING id, name"
    );
}

#[test]
fn insert_builder_sql() {
    let sql = qb::insert::<CompileUser>()
        .row(CompileUser {
            id: 0,
            name: "carol".into(),
            email: Some("carol@example.com".into()),
            visits: 0,
        })
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "INSERT INTO compile_users (name, email, visits) VALUES ($1, $2, $3) \
         RETURNING id, name, email, visits"
    );
}

#[test]
fn renamed_column_flows_through_builders() {
    let sql = qb::update::<CompilePost>()
        .set("post_title", "hello")
        .by_pk(3)
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "UPDATE compile_posts SET post_title = $1 WHERE id = $2 \
         RETURNING id, user_id, post_title"
    );
}

// ── Async surfaces (compile only) ────────────────────────────────────────────

async fn compile_execute(client: &impl GenericClient) -> Result<()> {
    let updated: ReturningSet<CompileUser> = qb::update::<CompileUser>()
        .set("name", "dave")
        .filter(Filter::or(vec![
            Filter::eq("visits", 0i32),
            Filter::is_null("email"),
        ]))
        .execute(client)
        .await?;

    for record in &updated {
        let _name: String = record.get("name")?;
    }
    let _typed: Vec<CompileUser> = updated.rows_as()?;
    let _names: Vec<String> = updated.flat_values("name")?;
    let _maps = updated.values()?;
    let _pairs = updated.values_list(&["id", "name"])?;

    let deleted = qb::delete::<CompileUser>()
        .eq("visits", 0i32)
        .defer(&["email"])
        .execute(client)
        .await?;
    let _ = deleted.count();

    Ok(())
}

async fn compile_save(client: &impl GenericClient) -> Result<()> {
    let mut user = CompileUser {
        id: 0,
        name: "erin".into(),
        email: None,
        visits: 0,
    };
    user.insert_returning(client).await?;
    let _matched: bool = user.save_returning(client).await?;
    let _matched: bool = user.save_fields_returning(client, ["name", "visits"]).await?;

    let _stored: Vec<CompileUser> = bulk_insert_returning(client, Vec::new()).await?;
    Ok(())
}

// The instance borrow here is shorter than the client borrow; the save
// futures must not force the two lifetimes to outlive each other.
async fn compile_save_per_item(
    client: &impl GenericClient,
    users: &mut [CompileUser],
) -> Result<()> {
    for user in users.iter_mut() {
        user.save_returning(client).await?;
    }
    Ok(())
}

async fn compile_deferred_load(client: &impl GenericClient) -> Result<()> {
    let mut result = qb::update::<CompileUser>()
        .set("visits", 1i32)
        .only(&["visits"])
        .execute(client)
        .await?;
    if let Some(record) = result.get_mut(0) {
        // "name" was not in RETURNING; this fetches it on demand.
        let _name: String = record.load(client, "name").await?;
    }
    Ok(())
}

#[cfg(feature = "pool")]
async fn compile_pool_clients() -> Result<()> {
    let pool = pg_returning::create_pool("postgres://localhost/test")?;
    let client = pool.get().await.map_err(pg_returning::Error::from)?;
    let _ = qb::delete::<CompileUser>().by_pk(1).execute(&client).await?;
    Ok(())
}

// Transactions satisfy GenericClient directly.
async fn compile_transaction(tx: &tokio_postgres::Transaction<'_>) -> Result<()> {
    let _ = qb::update::<CompileUser>()
        .set("visits", 0i32)
        .raw_filter("visits < 0")
        .execute(tx)
        .await?;
    Ok(())
}
