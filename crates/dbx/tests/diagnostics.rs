mod common;

use common::{USER_DDL, user};
use dbx::{Db, DiagnosticsConfig, Doc, Selector, SqliteClient};
use std::path::PathBuf;

fn temp_log(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("dbx-it-{tag}-{}.log", uuid::Uuid::new_v4()))
}

async fn logged_db(config: &DiagnosticsConfig) -> Db<SqliteClient> {
    let db = Db::open_sqlite_in_memory()
        .unwrap()
        .with_diagnostics_config(config);
    db.client().execute_batch(USER_DDL).await.unwrap();
    db
}

#[tokio::test]
async fn statements_and_failures_are_logged() {
    let log = temp_log("stmt");
    let errors = temp_log("err");
    let config = DiagnosticsConfig::new()
        .with_log_file(&log)
        .with_error_log_file(&errors);
    let db = logged_db(&config).await;

    db.table("user").insert(&user(1, "o'neil")).await.unwrap();
    db.table("user")
        .update(Doc::new().set("name", r"c:\tmp"), [Selector::eq("uid", 1)])
        .await
        .unwrap();
    db.table("nope").delete([Selector::eq("uid", 1)]).await.unwrap_err();

    let statements = std::fs::read_to_string(&log).unwrap();
    let lines: Vec<&str> = statements.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].ends_with(
        " | INSERT INTO `user`(`gid`, `name`, `score`, `createDate`) \
         VALUES ('1', 'o\\'neil', '0', '2024-06-01 01:30:00')"
    ));
    assert!(lines[1].ends_with(" | UPDATE `user` SET `name`='c:\\\\tmp' WHERE `uid` = '1'"));
    assert!(lines[2].ends_with(" | DELETE FROM `nope` WHERE `uid` = '1'"));

    let failures = std::fs::read_to_string(&errors).unwrap();
    assert_eq!(failures.lines().count(), 1);
    assert!(failures.contains(" | ERROR: Client error: "));
    assert!(failures.trim_end().ends_with("| SQL: DELETE FROM `nope` WHERE `uid` = '1'"));

    std::fs::remove_file(log).ok();
    std::fs::remove_file(errors).ok();
}

#[tokio::test]
async fn config_file_drives_sink() {
    let log = temp_log("toml");
    let config_path = temp_log("config");
    std::fs::write(
        &config_path,
        format!("log_file = {:?}\n", log.display().to_string()),
    )
    .unwrap();

    let config = DiagnosticsConfig::load(&config_path).unwrap();
    assert_eq!(config.log_file.as_deref(), Some(log.as_path()));
    assert_eq!(config.error_log_file, None);

    let db = logged_db(&config).await;
    db.table("user").count([Selector::gt("uid", 0)]).await.unwrap();

    let written = std::fs::read_to_string(&log).unwrap();
    assert!(written.contains("SELECT COUNT(*) FROM `user` WHERE `uid` > '0'"));

    std::fs::remove_file(log).ok();
    std::fs::remove_file(config_path).ok();
}

#[tokio::test]
async fn unwritable_log_never_fails_the_query() {
    let missing_dir = std::env::temp_dir().join(format!("dbx-nodir-{}", uuid::Uuid::new_v4()));
    let config = DiagnosticsConfig::new().with_log_file(missing_dir.join("sql.log"));
    let db = logged_db(&config).await;

    let uid = db.table("user").insert(&user(2, "ok")).await.unwrap();
    assert_eq!(uid, 1);
}
