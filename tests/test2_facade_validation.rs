use std::sync::Arc;

use sql_query_exec::prelude::*;
use sql_query_exec::test_utils::{ScriptedConnection, affected};

fn setup() -> (Arc<ScriptedConnection>, QueryExec<BasicQueryBuilder>) {
    let conn = ScriptedConnection::shared();
    let exec = QueryExec::new(BasicQueryBuilder::new(), conn.clone());
    (conn, exec)
}

fn record(pairs: &[(&str, RowValues)]) -> Record {
    pairs
        .iter()
        .map(|(col, val)| ((*col).to_string(), val.clone()))
        .collect()
}

#[tokio::test]
async fn update_without_filter_is_refused() {
    let (conn, exec) = setup();
    let set = record(&[("active", RowValues::Bool(false))]);

    let err = exec.update("users", set, None).unwrap_err();
    assert!(matches!(err, SqlExecError::NoWhereClause));
    assert_eq!(err.to_string(), "Where clause is not defined");
    assert!(conn.executed().is_empty());
}

#[tokio::test]
async fn explicit_unfiltered_update_has_no_where() -> Result<(), SqlExecError> {
    let (conn, exec) = setup();
    conn.push_ok(affected(12, 12));
    let set = record(&[("active", RowValues::Bool(false))]);

    let pending = exec.update("users", set.clone(), Some(WhereClause::Unfiltered))?;
    assert_eq!(pending.sql(), "UPDATE `users` SET `active` = 0");
    let res = pending.run().await?;
    assert_eq!(res.affected_rows, Some(12));

    let empty = exec.update("users", set, Some(WhereClause::Conditions(Vec::new())))?;
    assert_eq!(empty.sql(), "UPDATE `users` SET `active` = 0");
    Ok(())
}

#[tokio::test]
async fn update_with_conditions() -> Result<(), SqlExecError> {
    let (conn, exec) = setup();
    let pending = exec.update(
        "users",
        record(&[("name", RowValues::Text("O'Brien".into()))]),
        Some(WhereClause::from(vec![("id", RowValues::Int(7))])),
    )?;
    assert_eq!(
        pending.sql(),
        "UPDATE `users` SET `name` = 'O''Brien' WHERE `id` = 7"
    );
    pending.run().await?;
    assert_eq!(
        conn.executed(),
        vec!["UPDATE `users` SET `name` = 'O''Brien' WHERE `id` = 7"]
    );
    Ok(())
}

#[test]
fn blank_table_names_are_refused_before_building() {
    let (conn, exec) = setup();
    let set = record(&[("a", RowValues::Int(1))]);

    assert!(matches!(
        exec.insert("", set.clone()),
        Err(SqlExecError::NoTableName)
    ));
    assert!(matches!(
        exec.insert_ignore("  ", set.clone(), None),
        Err(SqlExecError::NoTableName)
    ));
    assert!(matches!(
        exec.insert_batch("", vec![set.clone()]),
        Err(SqlExecError::NoTableName)
    ));
    assert!(matches!(
        exec.update("", set.clone(), Some(WhereClause::Unfiltered)),
        Err(SqlExecError::NoTableName)
    ));
    assert!(matches!(
        exec.update_batch("", &[set], "id", Some(WhereClause::Unfiltered), |_, _| {}),
        Err(SqlExecError::NoTableName)
    ));
    assert!(matches!(exec.empty_table(""), Err(SqlExecError::NoTableName)));
    assert!(matches!(exec.truncate(""), Err(SqlExecError::NoTableName)));

    assert_eq!(
        SqlExecError::NoTableName.to_string(),
        "Table name not specified"
    );
    assert!(conn.executed().is_empty());
}

#[test]
fn get_where_validates_its_arguments() {
    let (conn, exec) = setup();

    assert!(matches!(
        exec.get_where("users", "x"),
        Err(SqlExecError::GetWhereConditions)
    ));
    assert!(matches!(
        exec.get_where("users", WhereClause::Unfiltered),
        Err(SqlExecError::GetWhereConditions)
    ));
    assert!(matches!(
        exec.get_where("", WhereClause::eq("id", 1)),
        Err(SqlExecError::GetWhereTable)
    ));
    assert!(matches!(
        exec.get_where(Vec::<String>::new(), WhereClause::eq("id", 1)),
        Err(SqlExecError::GetWhereTable)
    ));

    // nothing was built, so nothing was recorded by the builder either
    exec.with_builder(|qb| assert_eq!(qb.last_query(), None));
    assert!(conn.executed().is_empty());
}

#[tokio::test]
async fn get_where_over_several_tables() -> Result<(), SqlExecError> {
    let (conn, exec) = setup();
    let pending = exec.get_where(
        vec!["users", "orders"],
        vec![("users.id", RowValues::Int(3)), ("orders.total >", RowValues::Int(10))],
    )?;
    assert_eq!(
        pending.sql(),
        "SELECT * FROM `users`, `orders` WHERE `users`.`id` = 3 AND `orders`.`total` > 10"
    );
    pending.run().await?;
    assert_eq!(conn.executed().len(), 1);
    Ok(())
}

#[tokio::test]
async fn insert_variants() -> Result<(), SqlExecError> {
    let (conn, exec) = setup();
    conn.push_ok(RawResult::summary([
        ("insertId", RowValues::Int(5)),
        ("affectedRows", RowValues::Int(1)),
    ]));

    let res = exec
        .insert(
            "users",
            record(&[("name", RowValues::Text("amy".into())), ("age", RowValues::Int(30))]),
        )?
        .run()
        .await?;
    assert_eq!(res.insert_id, Some(5));

    let ignore = exec.insert_ignore(
        "users",
        record(&[("name", RowValues::Text("amy".into()))]),
        Some("ON DUPLICATE KEY UPDATE `name` = VALUES(`name`)"),
    )?;
    assert_eq!(
        ignore.sql(),
        "INSERT IGNORE INTO `users` (`name`) VALUES ('amy') ON DUPLICATE KEY UPDATE `name` = VALUES(`name`)"
    );

    let batch = exec.insert_batch(
        "users",
        vec![
            record(&[("name", RowValues::Text("a".into())), ("age", RowValues::Int(1))]),
            record(&[("age", RowValues::Int(2)), ("name", RowValues::Text("b".into()))]),
        ],
    )?;
    assert_eq!(
        batch.sql(),
        "INSERT INTO `users` (`name`, `age`) VALUES ('a', 1), ('b', 2)"
    );

    assert_eq!(
        conn.executed(),
        vec!["INSERT INTO `users` (`name`, `age`) VALUES ('amy', 30)"]
    );
    Ok(())
}

#[test]
fn delete_empty_and_truncate() -> Result<(), SqlExecError> {
    let (_conn, exec) = setup();

    assert_eq!(
        exec.delete(Some("sessions"), Some(WhereClause::eq("expired", true)))?
            .sql(),
        "DELETE FROM `sessions` WHERE `expired` = 1"
    );
    exec.with_builder(|qb| {
        qb.from("sessions");
    });
    assert_eq!(
        exec.delete(None, Some(WhereClause::Raw("`id` < 10".into())))?
            .sql(),
        "DELETE FROM `sessions` WHERE (`id` < 10)"
    );
    assert_eq!(exec.empty_table("sessions")?.sql(), "DELETE FROM `sessions`");
    assert_eq!(exec.truncate("sessions")?.sql(), "TRUNCATE `sessions`");

    let err = exec.delete(None, None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Builder);
    Ok(())
}

#[test]
fn builder_is_reset_after_each_generated_statement() -> Result<(), SqlExecError> {
    let (_conn, exec) = setup();
    exec.with_builder(|qb| {
        qb.select(&["id", "name"])
            .where_clause(WhereClause::eq("active", true))
            .order_by("name", false)
            .limit(10, Some(20));
    });

    let first = exec.get(Some("users"))?;
    assert_eq!(
        first.sql(),
        "SELECT `id`, `name` FROM `users` WHERE `active` = 1 ORDER BY `name` ASC LIMIT 10 OFFSET 20"
    );
    exec.with_builder(|qb| assert_eq!(qb.last_query(), Some(first.sql())));

    let second = exec.get(Some("users"))?;
    assert_eq!(second.sql(), "SELECT * FROM `users`");
    Ok(())
}

#[test]
fn failed_generation_keeps_staged_state() {
    let (_conn, exec) = setup();
    exec.with_builder(|qb| {
        qb.where_clause(WhereClause::eq("active", true));
    });

    // no table given and none staged
    assert!(matches!(exec.get(None), Err(SqlExecError::BuilderError(_))));
    exec.with_builder(|qb| assert_eq!(qb.last_query(), None));

    let sql = exec.get(Some("users")).unwrap();
    assert_eq!(sql.sql(), "SELECT * FROM `users` WHERE `active` = 1");
}
