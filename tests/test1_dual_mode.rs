use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use sql_query_exec::prelude::*;
use sql_query_exec::test_utils::{ScriptedConnection, affected};
use tokio::runtime::Runtime;
use tokio::sync::oneshot;

fn exec_over(conn: &Arc<ScriptedConnection>) -> QueryExec<BasicQueryBuilder> {
    QueryExec::new(BasicQueryBuilder::new(), conn.clone())
}

fn insert_summary(id: i64) -> RawResult {
    RawResult::summary([
        ("insertId", RowValues::Int(id)),
        ("affectedRows", RowValues::Int(1)),
    ])
}

#[tokio::test]
async fn callback_runs_once_and_never_before_submission_returns() -> Result<(), SqlExecError> {
    let conn = ScriptedConnection::shared();
    conn.push_ok(affected(3, 2));
    let exec = exec_over(&conn);

    let calls = Arc::new(AtomicUsize::new(0));
    let (tx, rx) = oneshot::channel();
    let seen = Arc::clone(&calls);
    exec.query("UPDATE t SET a = 1")?.with_callback(move |outcome| {
        seen.fetch_add(1, Ordering::SeqCst);
        let _ = tx.send(outcome);
    })?;
    // current-thread runtime: nothing has run yet
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let res = rx.await.expect("callback dropped")?;
    assert_eq!(res.affected_rows, Some(3));
    assert_eq!(res.changed_rows, Some(2));
    assert_eq!(res.insert_id, None);

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    Ok(())
}

#[test]
fn deferred_and_callback_report_the_same_outcome() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let conn = ScriptedConnection::shared();
        conn.push_ok(insert_summary(41)).push_ok(insert_summary(41));
        let exec = exec_over(&conn);
        let row = || vec![("name".to_string(), RowValues::Text("bob".into()))];

        let deferred = exec.insert("users", row())?.deferred()?.await?;

        let (tx, rx) = oneshot::channel();
        exec.insert("users", row())?.with_callback(move |outcome| {
            let _ = tx.send(outcome);
        })?;
        let called_back = rx.await??;

        assert_eq!(deferred, called_back);
        assert_eq!(deferred.insert_id, Some(41));
        assert_eq!(deferred.affected_rows, Some(1));
        assert_eq!(conn.executed().len(), 2);
        assert_eq!(conn.executed()[0], conn.executed()[1]);
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

#[tokio::test]
async fn execution_errors_travel_through_the_completion_path() -> Result<(), SqlExecError> {
    let conn = ScriptedConnection::shared();
    conn.push_err("duplicate key").push_err("duplicate key");
    let exec = exec_over(&conn);

    let err = exec.query("INSERT INTO t VALUES (1)")?.run().await.unwrap_err();
    assert!(matches!(err, SqlExecError::ExecutionError(ref msg) if msg == "duplicate key"));
    assert_eq!(err.kind(), ErrorKind::Execution);

    let (tx, rx) = oneshot::channel();
    exec.query("INSERT INTO t VALUES (1)")?
        .with_callback(move |outcome| {
            let _ = tx.send(outcome);
        })?;
    let outcome = rx.await.expect("callback dropped");
    assert!(matches!(outcome, Err(SqlExecError::ExecutionError(_))));
    Ok(())
}

#[tokio::test]
async fn missing_connection_is_reported_synchronously() -> Result<(), SqlExecError> {
    let exec = QueryExec::builder(BasicQueryBuilder::new()).build();
    assert!(!exec.executor().has_connection());

    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let err = exec
        .query("SELECT 1")?
        .with_callback(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap_err();
    assert!(matches!(err, SqlExecError::NoConnection));
    assert!(err.is_usage_error());

    assert!(matches!(
        exec.get(Some("users"))?.deferred(),
        Err(SqlExecError::NoConnection)
    ));

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    Ok(())
}

#[test]
fn submitting_outside_a_runtime_is_a_configuration_error() {
    let conn = ScriptedConnection::shared();
    let exec = exec_over(&conn);

    let pending = exec.query("SELECT 1").unwrap();
    let err = pending.with_callback(|_| panic!("must not be called")).unwrap_err();
    assert!(matches!(err, SqlExecError::ConfigError(_)));
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert!(conn.executed().is_empty());
}

#[tokio::test]
async fn dropped_deferred_still_runs_the_statement() -> Result<(), SqlExecError> {
    let conn = ScriptedConnection::shared();
    let exec = exec_over(&conn);

    drop(exec.query("DELETE FROM sessions")?.deferred()?);

    tokio::time::timeout(Duration::from_secs(2), async {
        while conn.executed().is_empty() {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("statement never ran");
    assert_eq!(conn.executed(), vec!["DELETE FROM sessions"]);
    Ok(())
}

#[tokio::test]
async fn custom_result_fields_from_options() -> Result<(), Box<dyn std::error::Error>> {
    let options: ExecOptions = serde_json::from_str(
        r#"{ "result_fields": { "affected_rows": ["rowCount"], "insert_id": ["oid"] } }"#,
    )?;
    let conn = ScriptedConnection::shared();
    conn.push_ok(RawResult::summary([
        ("rowCount", RowValues::Int(4)),
        ("oid", RowValues::Text("17".into())),
        ("affectedRows", RowValues::Int(99)),
    ]));
    let exec = QueryExec::builder(BasicQueryBuilder::new())
        .connection(conn.clone())
        .options(options)
        .build();

    let res = exec.query("UPDATE t SET a = 1")?.run().await?;
    assert_eq!(res.affected_rows, Some(4));
    assert_eq!(res.insert_id, Some(17));
    assert_eq!(res.changed_rows, None);
    assert_eq!(res.raw.field("affectedRows"), Some(&RowValues::Int(99)));
    Ok(())
}
