//! Transaction manager.
//!
//! Transactions are passed explicitly rather than carried in ambient
//! state: [`TxManager::execute`] hands the closure a `&mut PgConnection`
//! that repositories accept directly. Nested transactions are
//! unrepresentable (the handle is a value) and double-rollback is a
//! compile error.

use std::panic::AssertUnwindSafe;

use futures::future::BoxFuture;
use futures::FutureExt;
use lingopod_core::error::CoreError;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};

/// Runs closures inside a database transaction with guaranteed
/// commit-or-rollback on every exit path, including panics and
/// cancellation (dropping an open [`Transaction`] queues a rollback).
#[derive(Clone)]
pub struct TxManager {
    pool: PgPool,
}

impl TxManager {
    pub fn new(pool: &PgPool) -> Self {
        Self { pool: pool.clone() }
    }

    /// Begin a transaction. The returned handle must be passed to
    /// [`commit`](Self::commit) or [`rollback`](Self::rollback), or
    /// dropped (which rolls back).
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, CoreError> {
        self.pool.begin().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to begin transaction");
            CoreError::Internal(format!("failed to begin transaction: {e}"))
        })
    }

    /// Commit a transaction, consuming the handle.
    pub async fn commit(&self, tx: Transaction<'static, Postgres>) -> Result<(), CoreError> {
        tx.commit().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to commit transaction");
            CoreError::Internal(format!("transaction commit failed: {e}"))
        })
    }

    /// Roll back a transaction, consuming the handle.
    pub async fn rollback(&self, tx: Transaction<'static, Postgres>) -> Result<(), CoreError> {
        tx.rollback().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to rollback transaction");
            CoreError::Internal(format!("transaction rollback failed: {e}"))
        })
    }

    /// Run `op` inside a transaction.
    ///
    /// - `op` returns `Ok`: the transaction commits; a commit failure is
    ///   returned as `Internal` (the connection's drop path finishes the
    ///   server-side rollback).
    /// - `op` returns `Err`: the transaction rolls back and the error is
    ///   returned unchanged. If the rollback itself fails, both failures
    ///   are folded into one `Internal` error and logged separately.
    /// - `op` panics: the panic is caught, the transaction rolls back,
    ///   and the panic message comes back as `Internal`. A panic never
    ///   leaves a transaction open or escapes this call.
    pub async fn execute<T, F>(&self, op: F) -> Result<T, CoreError>
    where
        T: Send,
        F: for<'c> FnOnce(&'c mut PgConnection) -> BoxFuture<'c, Result<T, CoreError>> + Send,
    {
        let mut tx = self.begin().await?;

        let outcome = AssertUnwindSafe(op(&mut tx)).catch_unwind().await;

        match outcome {
            Err(panic) => {
                let msg = panic_message(panic);
                match tx.rollback().await {
                    Ok(()) => {
                        tracing::error!(panic = %msg, "Transaction rolled back after panic");
                        Err(CoreError::Internal(format!(
                            "panic during transaction: {msg}"
                        )))
                    }
                    Err(rb_err) => {
                        tracing::error!(panic = %msg, rollback_error = %rb_err,
                            "Rollback failed after panic");
                        Err(CoreError::Internal(format!(
                            "panic during transaction ({msg}) and rollback failed: {rb_err}"
                        )))
                    }
                }
            }
            Ok(Err(op_err)) => match tx.rollback().await {
                Ok(()) => {
                    tracing::warn!(error = %op_err, "Transaction rolled back");
                    Err(op_err)
                }
                Err(rb_err) => {
                    tracing::error!(error = %op_err, rollback_error = %rb_err,
                        "Rollback failed after operation error");
                    Err(CoreError::Internal(format!(
                        "operation failed ({op_err}) and rollback failed: {rb_err}"
                    )))
                }
            },
            Ok(Ok(value)) => match tx.commit().await {
                Ok(()) => Ok(value),
                Err(commit_err) => {
                    tracing::error!(error = %commit_err, "Failed to commit transaction");
                    Err(CoreError::Internal(format!(
                        "transaction commit failed: {commit_err}"
                    )))
                }
            },
        }
    }
}

/// Best-effort extraction of a human-readable message from a panic payload.
fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
