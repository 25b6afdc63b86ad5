//! Walkthrough of every query operation against a SQLite file.
//!
//! Run with: cargo run --example simple -p dbx
//!
//! Statement and error logs are written to the paths in `DBX_LOG_FILE` and
//! `DBX_ERROR_LOG_FILE` (read from the environment or a `.env` file), and
//! default to `./db.log` / `./db.error.log`.

use chrono::{NaiveDateTime, Utc};
use dbx::monitor::{self, DiagnosticsConfig};
use dbx::prelude::*;
use serde::Serialize;

#[derive(Debug, Default, Serialize, Record)]
struct User {
    #[dbx("uid,auto_increment")]
    uid: i64,
    #[dbx("gid")]
    gid: i64,
    #[dbx("name")]
    name: String,
    #[dbx("createDate")]
    create_date: Option<NaiveDateTime>,
}

const DDL: &str = "
DROP TABLE IF EXISTS user;
CREATE TABLE user
(
  uid        INTEGER PRIMARY KEY AUTOINCREMENT,
  gid        INTEGER NOT NULL DEFAULT '0',
  name       TEXT             DEFAULT '',
  name2      TEXT             DEFAULT '',
  name3      TEXT             DEFAULT '',
  createDate DATETIME         DEFAULT CURRENT_TIMESTAMP
);";

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let mut diagnostics = DiagnosticsConfig::from_env();
    if !diagnostics.is_enabled() {
        diagnostics = DiagnosticsConfig::new()
            .with_log_file("./db.log")
            .with_error_log_file("./db.error.log");
    }
    monitor::install(&diagnostics);

    std::fs::remove_file("./test.db").ok();
    let db = Db::open_sqlite("./test.db")?;
    db.client().execute_batch(DDL).await?;

    // Insert from write elements
    for i in 1..=5 {
        let uid = db
            .table("user")
            .insert(
                Doc::new()
                    .set("gid", 1)
                    .set("name", format!("admin{i}"))
                    .set("createDate", now()),
            )
            .await?;
        println!("Insert: {uid}");
    }

    // Insert from a record; `uid` is left to the database
    for i in 1..=5 {
        let user = User {
            gid: 3,
            name: format!("twoTest{i}"),
            create_date: Some(now()),
            ..User::default()
        };
        let uid = db.table("user").insert(&user).await?;
        println!("Insert: {uid}");
    }

    let n = db
        .table("user")
        .update(
            Doc::new().set("gid", 2).set("name", "test"),
            [Selector::eq("uid", 1)],
        )
        .await?;
    println!("\nUpdate: {n}");

    let n = db.table("user").count(Vec::<Selector>::new()).await?;
    println!("\nCount: {n}");

    let mut row: User = db
        .table("user")
        .find([Selector::eq("uid", 1)])
        .one()
        .await?;
    println!("\nRead: {row:?}");

    row.gid = 4;
    row.name = "test123".into();
    let n = db
        .table("user")
        .update(&row, [Selector::eq("uid", 1)])
        .await?;
    println!("\nUpdate2: {n}");

    let list: Vec<User> = db
        .table("user")
        .fields(["uid", "gid", "name", "createDate"])
        .sort(["-gid", "-uid"])
        .skip(0)
        .limit(10)
        .find([Selector::lte("uid", 5)])
        .all()
        .await?;
    println!("\nList: {list:?}");
    println!("Json: {}", serde_json::to_string(&list)?);

    let (row_map, columns) = db
        .table("user")
        .find([Selector::eq("uid", 1)])
        .one_map()
        .await?;
    println!("\nMap Columns: {columns:?}");
    println!("Map Row: {row_map:?}");
    println!("Map Json: {}", serde_json::to_string(&row_map)?);

    let (list_map, columns) = db
        .table("user")
        .find([Selector::lt("uid", 5)])
        .all_map()
        .await?;
    println!("\nMap Columns: {columns:?}");
    println!("Map List: {list_map:?}");
    println!("Map Json: {}", serde_json::to_string(&list_map)?);

    let n = db
        .table("user")
        .delete([Selector::eq("uid", 4)])
        .await?;
    println!("\nDelete: {n}");

    Ok(())
}
