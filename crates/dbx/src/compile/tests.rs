//! Rendering tests for the selector/update compiler.

use super::*;
use crate::doc::Doc;
use crate::selector::Selector;
use crate::value::Value;

const NO_FIELDS: &[&str] = &[];

#[test]
fn test_fields_empty_is_star() {
    assert_eq!(render_fields(NO_FIELDS), "*");
}

#[test]
fn test_fields_quoted_and_stripped() {
    assert_eq!(
        render_fields(&["uid", " gid", "create Date"]),
        "`uid`,`gid`,`createDate`"
    );
}

#[test]
fn test_order_by() {
    assert_eq!(
        render_order_by(&["-gid", "uid"]),
        " ORDER BY `gid` DESC,`uid` ASC"
    );
    assert_eq!(render_order_by(NO_FIELDS), "");
    assert_eq!(render_order_by(&[" - uid "]), " ORDER BY `uid` DESC");
    assert_eq!(render_order_by(&["  "]), "");
}

#[test]
fn test_limit() {
    assert_eq!(render_limit(0, 0), "");
    assert_eq!(render_limit(25, 0), "");
    assert_eq!(render_limit(10, 5), " LIMIT 10,5");
    assert_eq!(render_limit(0, 10), " LIMIT 0,10");
}

#[test]
fn test_where_empty() {
    let frag = render_where(&[]).unwrap();
    assert!(frag.is_empty());
    assert!(frag.args.is_empty());
}

#[test]
fn test_where_predicates_in_order() {
    let selector = vec![
        Selector::eq("uid", 1),
        Selector::new("gid", "", 2).unwrap(),
        Selector::lte("score", 10i64),
        Selector::ne("name", "x"),
    ];
    let frag = render_where(&selector).unwrap();
    assert_eq!(
        frag.sql,
        " WHERE `uid` = ? AND `gid` = ? AND `score` <= ? AND `name` != ?"
    );
    assert_eq!(
        frag.args,
        vec![
            Value::Int(1),
            Value::Int(2),
            Value::BigInt(10),
            Value::Text("x".into())
        ]
    );
}

#[test]
fn test_where_predicate_count_matches_args() {
    for n in 1..6 {
        let selector: Vec<_> = (0..n).map(|i| Selector::gt(format!("c{i}"), i)).collect();
        let frag = render_where(&selector).unwrap();
        assert_eq!(frag.sql.matches(" AND ").count(), n as usize - 1);
        assert_eq!(frag.sql.matches('?').count(), n as usize);
        assert_eq!(frag.args.len(), n as usize);
    }
}

#[test]
fn test_where_in_expands() {
    let selector = vec![Selector::in_list("uid", vec![1, 2, 3]).unwrap()];
    let frag = render_where(&selector).unwrap();
    assert_eq!(frag.sql, " WHERE `uid` IN (?,?,?)");
    assert_eq!(frag.args, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
}

#[test]
fn test_where_in_strings_between_scalars() {
    let selector = vec![
        Selector::eq("gid", 1),
        Selector::in_list("name", vec!["a", "b"]).unwrap(),
        Selector::lt("uid", 9),
    ];
    let frag = render_where(&selector).unwrap();
    assert_eq!(frag.sql, " WHERE `gid` = ? AND `name` IN (?,?) AND `uid` < ?");
    assert_eq!(frag.args.len(), 4);
    assert_eq!(frag.args[1], Value::Text("a".into()));
}

#[test]
fn test_where_empty_in_contributes_nothing() {
    let selector = vec![
        Selector::in_list("uid", Vec::<i64>::new()).unwrap(),
        Selector::eq("gid", 3),
    ];
    let frag = render_where(&selector).unwrap();
    assert_eq!(frag.sql, " WHERE `gid` = ?");
    assert_eq!(frag.args, vec![Value::Int(3)]);
}

#[test]
fn test_where_only_empty_in_has_no_where() {
    let selector = vec![Selector::in_list("name", Vec::<String>::new()).unwrap()];
    let frag = render_where(&selector).unwrap();
    assert!(frag.is_empty());
    assert!(frag.args.is_empty());
}

#[test]
fn test_where_in_float_is_unsupported() {
    let selector = vec![
        Selector::eq("gid", 1),
        Selector {
            field: "score".into(),
            symbol: Symbol::In,
            value: Value::from(vec![1.5f64, 2.5]),
        },
    ];
    let err = render_where(&selector).unwrap_err();
    assert!(err.is_unsupported_value_type());
}

#[test]
fn test_where_in_scalar_is_unsupported() {
    let selector = vec![Selector {
        field: "uid".into(),
        symbol: Symbol::In,
        value: Value::BigInt(1),
    }];
    assert!(render_where(&selector).unwrap_err().is_unsupported_value_type());
}

#[test]
fn test_insert_fragment() {
    let doc = Doc::new().set("gid", 1).set("name", "admin1");
    let frag = render_insert(&doc).unwrap();
    assert_eq!(frag.columns, "`gid`, `name`");
    assert_eq!(frag.placeholders, "?, ?");
    assert_eq!(frag.args.len(), 2);
}

#[test]
fn test_insert_treats_sign_as_name() {
    let doc = Doc::new().set("+score", 1);
    let frag = render_insert(&doc).unwrap();
    assert_eq!(frag.columns, "`+score`");
}

#[test]
fn test_update_set() {
    let doc = Doc::new().set("gid", 2).set("name", "test");
    let frag = render_update_set(&doc).unwrap();
    assert_eq!(frag.sql, "`gid`=?, `name`=?");
    assert_eq!(frag.args, vec![Value::Int(2), Value::Text("test".into())]);
}

#[test]
fn test_update_increment_and_decrement() {
    let doc = Doc::new().incr("score", 5);
    let frag = render_update_set(&doc).unwrap();
    assert_eq!(frag.sql, "`score`=`score`+?");
    assert_eq!(frag.args, vec![Value::Int(5)]);

    let doc = Doc::new().decr("stock", 2).set("name", "n");
    let frag = render_update_set(&doc).unwrap();
    assert_eq!(frag.sql, "`stock`=`stock`-?, `name`=?");
}

#[test]
fn test_update_rejects_empty_specs() {
    assert!(render_update_set(&Doc::new()).is_err());
    assert!(render_update_set(&Doc::new().set("", 1)).is_err());
    assert!(render_update_set(&Doc::new().set("+", 1)).is_err());
    assert!(render_insert(&Doc::new()).is_err());
}

#[test]
fn test_build_insert_verbs() {
    let doc = Doc::new().set("gid", 1);
    let sql = |verb| build_insert(Dialect::MySql, verb, "user", &doc).unwrap().sql;
    assert_eq!(sql(InsertVerb::Insert), "INSERT INTO `user`(`gid`) VALUES (?)");
    assert_eq!(
        sql(InsertVerb::InsertIgnore),
        "INSERT IGNORE INTO `user`(`gid`) VALUES (?)"
    );
    assert_eq!(sql(InsertVerb::Replace), "REPLACE INTO `user`(`gid`) VALUES (?)");
}

#[test]
fn test_sqlite_spells_insert_ignore_differently() {
    let doc = Doc::new().set("gid", 1);
    let sql = |verb| build_insert(Dialect::Sqlite, verb, "user", &doc).unwrap().sql;
    assert_eq!(
        sql(InsertVerb::InsertIgnore),
        "INSERT OR IGNORE INTO `user`(`gid`) VALUES (?)"
    );
    assert_eq!(sql(InsertVerb::Insert), "INSERT INTO `user`(`gid`) VALUES (?)");
    assert_eq!(sql(InsertVerb::Replace), "REPLACE INTO `user`(`gid`) VALUES (?)");
}

#[test]
fn test_build_update_args_order() {
    let doc = Doc::new().set("gid", 2).incr("score", 5);
    let stmt = build_update("user", &doc, &[Selector::eq("uid", 1)]).unwrap();
    assert_eq!(
        stmt.sql,
        "UPDATE `user` SET `gid`=?, `score`=`score`+? WHERE `uid` = ?"
    );
    assert_eq!(stmt.args, vec![Value::Int(2), Value::Int(5), Value::Int(1)]);
}

#[test]
fn test_build_delete_and_count() {
    let stmt = build_delete("user", &[Selector::eq("uid", 4)]).unwrap();
    assert_eq!(stmt.sql, "DELETE FROM `user` WHERE `uid` = ?");
    let stmt = build_count("user", &[]).unwrap();
    assert_eq!(stmt.sql, "SELECT COUNT(*) FROM `user`");
    assert!(stmt.args.is_empty());
}

#[test]
fn test_build_select_page() {
    let stmt = build_select(
        "user",
        &["uid", "gid", "name", "createDate"],
        &[Selector::lte("uid", 5)],
        &["-gid", "-uid"],
        Window::Page { skip: 0, limit: 10 },
    )
    .unwrap();
    assert_eq!(
        stmt.sql,
        "SELECT `uid`,`gid`,`name`,`createDate` FROM `user` WHERE `uid` <= ? \
         ORDER BY `gid` DESC,`uid` DESC LIMIT 0,10"
    );
}

#[test]
fn test_build_select_first_ignores_paging() {
    let stmt = build_select("user", NO_FIELDS, &[], NO_FIELDS, Window::First).unwrap();
    assert_eq!(stmt.sql, "SELECT * FROM `user` LIMIT 1");
}

#[test]
fn test_build_select_unsupported_in_emits_nothing() {
    let selector = vec![Selector {
        field: "score".into(),
        symbol: Symbol::In,
        value: Value::from(vec![0.5f64]),
    }];
    let result = build_select("user", NO_FIELDS, &selector, NO_FIELDS, Window::First);
    assert!(result.unwrap_err().is_unsupported_value_type());
}
