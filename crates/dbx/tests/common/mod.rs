#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use dbx::{Db, Record, SqliteClient};

pub const USER_DDL: &str = "
    CREATE TABLE `user` (
        `uid` INTEGER PRIMARY KEY AUTOINCREMENT,
        `gid` INTEGER NOT NULL DEFAULT 0,
        `name` TEXT NOT NULL DEFAULT '',
        `score` INTEGER NOT NULL DEFAULT 0,
        `createDate` DATETIME
    );
";

#[derive(Debug, Clone, Default, PartialEq, Record)]
pub struct User {
    #[dbx("uid,auto_increment")]
    pub uid: i64,
    #[dbx("gid")]
    pub gid: i64,
    #[dbx("name")]
    pub name: String,
    #[dbx("score")]
    pub score: i64,
    #[dbx(column = "createDate")]
    pub create_date: Option<NaiveDateTime>,
    pub scratch: String,
}

pub fn at(h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 1)
        .unwrap()
        .and_hms_opt(h, 30, 0)
        .unwrap()
}

pub fn user(gid: i64, name: &str) -> User {
    User {
        gid,
        name: name.to_string(),
        create_date: Some(at(gid as u32 % 24)),
        ..User::default()
    }
}

pub async fn user_db() -> Db<SqliteClient> {
    let db = Db::open_sqlite_in_memory().unwrap();
    db.client().execute_batch(USER_DDL).await.unwrap();
    db
}
