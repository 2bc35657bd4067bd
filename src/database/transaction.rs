use std::{future::Future, pin::Pin};

use sqlx::{PgPool, Postgres, Transaction};

use crate::error::AppError;

#[derive(Debug)]
pub struct DatabaseTransaction;

impl DatabaseTransaction {
    /// Run a closure inside a transaction.
    ///
    /// Commits when the closure returns `Ok`, rolls back when it returns `Err`.
    /// If the future is dropped or panics before completing, the uncommitted
    /// `Transaction` is dropped and sqlx rolls it back.
    pub async fn run<T, F>(pool: &PgPool, f: F) -> Result<T, AppError>
    where
        F: for<'a> FnOnce(
            &'a mut Transaction<'_, Postgres>,
        ) -> Pin<Box<dyn Future<Output = Result<T, AppError>> + Send + 'a>>,
        T: Send,
    {
        let mut tx = pool.begin().await.map_err(AppError::from)?;

        match f(&mut tx).await {
            Ok(value) => {
                tx.commit().await.map_err(AppError::from)?;
                Ok(value)
            }
            Err(err) => {
                log::warn!("Transaction failed with error: {}, rolling back", err);
                if let Err(rollback_err) = tx.rollback().await {
                    log::error!(
                        "Rollback failed after error (orig: {}, rollback: {})",
                        err,
                        rollback_err
                    );
                }
                Err(err)
            }
        }
    }
}
