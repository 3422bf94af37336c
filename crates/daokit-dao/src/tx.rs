//! Transactions carried in the call context.
//!
//! The DAO contract has no transaction parameter. A caller opens a
//! transaction with [`new_tx`], which stores it in a derived [`Context`];
//! DAO implementations pick it up with [`get_tx`].

use async_trait::async_trait;
use daokit_core::{Context, DaoResult};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Context key the current transaction is stored under.
pub const TX_CONTEXT_KEY: &str = "db-tx";

/// An opaque transaction handle.
#[async_trait]
pub trait Tx: Send + Sync {
    type Id;

    fn id(&self) -> Self::Id;

    async fn commit(&self, ctx: &Context) -> DaoResult<()>;

    async fn rollback(&self, ctx: &Context) -> DaoResult<()>;
}

pub type SharedTx<I> = Arc<dyn Tx<Id = I>>;

/// Free-form settings handed to a [`TxProducer`] (isolation level, read-only
/// flag, ...). Interpreted by the producer only.
pub type TxConfig = HashMap<String, serde_json::Value>;

/// Opens transactions.
pub type TxProducer<I> = Arc<dyn Fn(&TxConfig) -> DaoResult<SharedTx<I>> + Send + Sync>;

/// Opens a transaction with `producer` and returns a child of `ctx` carrying
/// it. Producer errors are returned unchanged.
pub fn new_tx<I: 'static>(
    ctx: &Context,
    config: &TxConfig,
    producer: &TxProducer<I>,
) -> DaoResult<Context> {
    let tx = producer(config)?;
    debug!(key = TX_CONTEXT_KEY, "Transaction attached to context");
    Ok(ctx.with_value(TX_CONTEXT_KEY, tx))
}

/// Returns the transaction stored in `ctx`, if any.
///
/// Fails with `TypeMismatch` when the stored transaction has another id
/// type.
pub fn get_tx<I: 'static>(ctx: &Context) -> DaoResult<Option<SharedTx<I>>> {
    ctx.value::<SharedTx<I>>(TX_CONTEXT_KEY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use daokit_core::DaoError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static FINISHED: AtomicUsize = AtomicUsize::new(0);

    struct RecordingTx {
        id: u64,
    }

    #[async_trait]
    impl Tx for RecordingTx {
        type Id = u64;

        fn id(&self) -> u64 {
            self.id
        }

        async fn commit(&self, ctx: &Context) -> DaoResult<()> {
            ctx.check()?;
            FINISHED.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn rollback(&self, _ctx: &Context) -> DaoResult<()> {
            FINISHED.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn recording_producer() -> TxProducer<u64> {
        Arc::new(|config: &TxConfig| -> DaoResult<SharedTx<u64>> {
            let id = config
                .get("id")
                .and_then(serde_json::Value::as_u64)
                .unwrap_or(1);
            Ok(Arc::new(RecordingTx { id }))
        })
    }

    #[test]
    fn test_no_transaction_in_background() {
        let tx = get_tx::<u64>(&Context::background()).unwrap();
        assert!(tx.is_none());
    }

    #[tokio::test]
    async fn test_new_tx_and_get_tx() {
        let mut config = TxConfig::new();
        config.insert("id".to_string(), serde_json::json!(42));

        let parent = Context::background();
        let ctx = new_tx(&parent, &config, &recording_producer()).unwrap();

        let tx = get_tx::<u64>(&ctx).unwrap().unwrap();
        assert_eq!(tx.id(), 42);
        tx.commit(&ctx).await.unwrap();
        tx.rollback(&ctx).await.unwrap();
        assert!(FINISHED.load(Ordering::SeqCst) >= 2);

        assert!(get_tx::<u64>(&parent).unwrap().is_none());
    }

    #[test]
    fn test_get_tx_with_wrong_id_type() {
        let ctx = new_tx(&Context::background(), &TxConfig::new(), &recording_producer()).unwrap();
        let err = get_tx::<String>(&ctx).err().unwrap();
        assert!(matches!(err, DaoError::TypeMismatch { ref name, .. } if name == TX_CONTEXT_KEY));
    }

    #[test]
    fn test_producer_error_is_returned_unchanged() {
        let failing: TxProducer<u64> = Arc::new(|_: &TxConfig| -> DaoResult<SharedTx<u64>> {
            Err(DaoError::configuration("no connection"))
        });
        let err = new_tx(&Context::background(), &TxConfig::new(), &failing).unwrap_err();
        assert!(matches!(err, DaoError::Configuration(ref msg) if msg == "no connection"));
    }
}
