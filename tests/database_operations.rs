//! Database-backed operations run through handlers
//!
//! These need a PostgreSQL server: set `DATABASE_URL` and run with
//! `--ignored`.

use routehaus::prelude::*;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
struct Note {
    #[serde(rename = "_id")]
    #[sqlx(rename = "_id")]
    id: String,
    body: String,
}

struct NoteCreate {
    db: Database,
    table: String,
}

struct NoteGet {
    db: Database,
    table: String,
}

struct NoteUpdate {
    db: Database,
    table: String,
}

#[async_trait]
impl Operation for NoteCreate {
    type Input = Note;
    type Output = Note;

    async fn perform(&self, _ctx: &OperationContext, input: Note, output: &mut Note) -> OperationReport {
        let insert = match self.db.query().insert(&self.table).values_from(&input) {
            Ok(insert) => insert,
            Err(err) => return OperationReport::failed(err),
        };
        match insert.fetch_returning::<Note>().await {
            Ok((mut rows, outcome)) => {
                if let Some(row) = rows.pop() {
                    *output = row;
                }
                OperationReport::with_outcome(outcome)
            }
            Err(err) => OperationReport::failed(OperationError::from_store(err)),
        }
    }
}

#[async_trait]
impl Operation for NoteGet {
    type Input = String;
    type Output = Note;

    async fn perform(&self, _ctx: &OperationContext, input: String, output: &mut Note) -> OperationReport {
        let found = self
            .db
            .query()
            .select(&self.table)
            .filter(QueryFilter::eq("_id", input))
            .fetch_one::<Note>()
            .await;
        match found {
            Ok(note) => {
                *output = note;
                OperationReport::success()
            }
            Err(err) => OperationReport::failed(err),
        }
    }
}

#[async_trait]
impl Operation for NoteUpdate {
    type Input = Note;
    type Output = Note;

    async fn perform(&self, _ctx: &OperationContext, input: Note, _output: &mut Note) -> OperationReport {
        self.db
            .query()
            .update(&self.table)
            .set("body", input.body)
            .filter(QueryFilter::eq("_id", input.id))
            .execute()
            .await
            .into()
    }
}

async fn setup() -> (Database, String) {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");
    let pool = routehaus::core::pool_options(&DatabaseConfig::default())
        .connect(&url)
        .await
        .expect("Failed to connect to database");
    let db = Database::from_pool(pool);

    let table = format!("note_{}", uuid::Uuid::new_v4().simple());
    sqlx::query(&format!(
        "CREATE TABLE \"{table}\" (\"_id\" TEXT PRIMARY KEY, \"body\" TEXT NOT NULL)"
    ))
    .execute(db.pool())
    .await
    .expect("Failed to create table");

    (db, table)
}

async fn teardown(db: &Database, table: &str) {
    sqlx::query(&format!("DROP TABLE IF EXISTS \"{table}\""))
        .execute(db.pool())
        .await
        .expect("Failed to drop table");
    db.close().await;
}

fn note(id: &str, body: &str) -> Note {
    Note {
        id: id.to_string(),
        body: body.to_string(),
    }
}

#[tokio::test]
#[ignore = "requires database"]
async fn missing_row_is_not_found() {
    let (db, table) = setup().await;
    let get = Handler::new(NoteGet { db: db.clone(), table: table.clone() }, "Note");
    let ctx = OperationContext::new("Note");

    let err = get.call(&ctx, "nope".to_string()).await.unwrap_err();
    assert!(err.is_not_found());

    teardown(&db, &table).await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn update_of_missing_row_is_not_found() {
    let (db, table) = setup().await;
    let update = Handler::new(NoteUpdate { db: db.clone(), table: table.clone() }, "Note");
    let ctx = OperationContext::new("Note");

    let err = update.call(&ctx, note("ghost", "boo")).await.unwrap_err();
    assert!(err.is_not_found());

    teardown(&db, &table).await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn create_get_update() {
    let (db, table) = setup().await;
    let ctx = OperationContext::new("Note");
    let create = Handler::new(NoteCreate { db: db.clone(), table: table.clone() }, "Note");
    let get = Handler::new(NoteGet { db: db.clone(), table: table.clone() }, "Note");
    let update = Handler::new(NoteUpdate { db: db.clone(), table: table.clone() }, "Note");

    let created = create.call(&ctx, note("n1", "hello")).await.unwrap();
    assert_eq!(created, note("n1", "hello"));

    update.call(&ctx, note("n1", "updated")).await.unwrap();
    let fetched = get.call(&ctx, "n1".to_string()).await.unwrap();
    assert_eq!(fetched.body, "updated");

    teardown(&db, &table).await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn duplicate_key_is_already_exists() {
    let (db, table) = setup().await;
    let ctx = OperationContext::new("Note");
    let create = Handler::new(NoteCreate { db: db.clone(), table: table.clone() }, "Note");

    create.call(&ctx, note("n1", "one")).await.unwrap();
    let err = create.call(&ctx, note("n1", "two")).await.unwrap_err();
    assert_eq!(err.status(), ErrorStatus::AlreadyExists);

    teardown(&db, &table).await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn uuid_shaped_text_key_round_trips() {
    let (db, table) = setup().await;
    let ctx = OperationContext::new("Note");
    let create = Handler::new(NoteCreate { db: db.clone(), table: table.clone() }, "Note");
    let get = Handler::new(NoteGet { db: db.clone(), table: table.clone() }, "Note");
    let update = Handler::new(NoteUpdate { db: db.clone(), table: table.clone() }, "Note");

    let id = uuid::Uuid::new_v4().to_string();
    create.call(&ctx, note(&id, "2024-05-01T00:00:00Z")).await.unwrap();
    update.call(&ctx, note(&id, "2024-06-01T00:00:00Z")).await.unwrap();

    let fetched = get.call(&ctx, id.clone()).await.unwrap();
    assert_eq!(fetched, note(&id, "2024-06-01T00:00:00Z"));

    teardown(&db, &table).await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn typed_uuid_column_needs_a_cast() {
    #[derive(Debug, FromRow)]
    struct Row {
        body: String,
    }

    let (db, table) = setup().await;
    let typed = format!("{table}_typed");
    sqlx::query(&format!(
        "CREATE TABLE \"{typed}\" (\"_id\" UUID PRIMARY KEY, \"body\" TEXT NOT NULL)"
    ))
    .execute(db.pool())
    .await
    .expect("Failed to create table");

    let id = uuid::Uuid::new_v4().to_string();
    let outcome = db
        .query()
        .insert(&typed)
        .column_type("_id", "uuid")
        .value("_id", id.clone())
        .value("body", "typed")
        .execute()
        .await
        .unwrap();
    assert_eq!(outcome.rows_affected, Some(1));

    let row: Row = db
        .query()
        .select(&typed)
        .column_type("_id", "uuid")
        .filter(QueryFilter::eq("_id", id.clone()))
        .fetch_one()
        .await
        .unwrap();
    assert_eq!(row.body, "typed");

    let untyped = db
        .query()
        .select(&typed)
        .filter(QueryFilter::eq("_id", id))
        .fetch_one::<Row>()
        .await;
    assert!(untyped.is_err());

    sqlx::query(&format!("DROP TABLE IF EXISTS \"{typed}\""))
        .execute(db.pool())
        .await
        .expect("Failed to drop table");
    teardown(&db, &table).await;
}
