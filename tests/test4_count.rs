use std::sync::Arc;

use sql_query_exec::prelude::*;
use sql_query_exec::test_utils::{ScriptedConnection, numrows};
use tokio::sync::oneshot;

fn setup() -> (Arc<ScriptedConnection>, QueryExec<BasicQueryBuilder>) {
    let conn = ScriptedConnection::shared();
    let exec = QueryExec::new(BasicQueryBuilder::new(), conn.clone());
    (conn, exec)
}

#[tokio::test]
async fn count_with_staged_table_resolves_to_numrows() -> Result<(), SqlExecError> {
    let (conn, exec) = setup();
    conn.push_ok(numrows(42));
    exec.with_builder(|qb| {
        qb.from("orders")
            .where_clause(WhereClause::eq("status", "open"));
    });

    let n = exec.count(None)?.run().await?;
    assert_eq!(n, 42);
    assert_eq!(
        conn.executed(),
        vec!["SELECT COUNT(*) AS `numrows` FROM `orders` WHERE `status` = 'open'"]
    );
    Ok(())
}

#[tokio::test]
async fn count_reports_the_same_number_in_both_modes() -> Result<(), SqlExecError> {
    let (conn, exec) = setup();
    conn.push_ok(numrows(7)).push_ok(numrows(7));

    let deferred = exec.count(Some("users"))?.deferred()?.await?;

    let (tx, rx) = oneshot::channel();
    exec.count(Some("users"))?.with_callback(move |outcome| {
        let _ = tx.send(outcome);
    })?;
    let called_back = rx.await.expect("callback dropped")?;

    assert_eq!(deferred, 7);
    assert_eq!(called_back, 7);
    Ok(())
}

#[tokio::test]
async fn count_accepts_textual_numrows() -> Result<(), SqlExecError> {
    let (conn, exec) = setup();
    let mut raw = RawResult::with_columns(vec!["numrows".to_string()]);
    raw.add_row_values(vec![RowValues::Text("19".into())]);
    conn.push_ok(raw);

    assert_eq!(exec.count(Some("users"))?.run().await?, 19);
    Ok(())
}

#[tokio::test]
async fn malformed_count_results_are_errors() -> Result<(), SqlExecError> {
    let (conn, exec) = setup();
    conn.push_ok(RawResult::with_columns(vec!["numrows".to_string()]));
    let mut wrong_column = RawResult::with_columns(vec!["total".to_string()]);
    wrong_column.add_row_values(vec![RowValues::Int(3)]);
    conn.push_ok(wrong_column);
    conn.push_err("table missing");

    for _ in 0..2 {
        let err = exec.count(Some("users"))?.run().await.unwrap_err();
        assert!(matches!(err, SqlExecError::ResultError(_)), "{err:?}");
    }
    let err = exec.count(Some("users"))?.run().await.unwrap_err();
    assert!(matches!(err, SqlExecError::ExecutionError(_)));
    Ok(())
}

#[test]
fn count_without_any_table_fails_to_build() {
    let (conn, exec) = setup();
    let err = exec.count(None).unwrap_err();
    assert!(matches!(err, SqlExecError::BuilderError(_)));
    assert!(conn.executed().is_empty());
}
