#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use tracing_test::traced_test;

    use crate::core::counter::selector::{select_count, SELECT_COUNT};
    use crate::core::counter::{CounterAction, CounterState};
    use crate::core::store::{AppState, Dispatched, Slice, Store, StoreConfig, StoreError};

    #[tokio::test]
    async fn test_dispatch_sequence() {
        let store = Store::new(StoreConfig::default());
        assert_eq!(store.select(select_count).await.unwrap(), 0);

        assert_eq!(store.dispatch(CounterAction::Increment).await.unwrap().value, 1);
        assert_eq!(
            store.dispatch(CounterAction::IncrementByAmount(5)).await.unwrap().value,
            6
        );
        assert_eq!(store.dispatch(CounterAction::Decrement).await.unwrap().value, 5);
        assert_eq!(store.select_named(SELECT_COUNT).await.unwrap(), 5);
    }

    #[tokio::test]
    #[traced_test]
    async fn test_dispatch_logs_transition() {
        let store = Store::new(StoreConfig::default());
        store.dispatch(CounterAction::IncrementByAmount(3)).await.unwrap();

        assert!(logs_contain("Counter 0 -> 3 via counter/incrementByAmount"));
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = Store::new(StoreConfig::default());
        let other = store.clone();

        other.dispatch(CounterAction::Increment).await.unwrap();
        assert_eq!(store.select(select_count).await.unwrap(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_dispatches_are_all_applied() {
        let store = Store::new(StoreConfig::default());

        let handles: Vec<_> = (0..100)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    let action = if i % 4 == 0 {
                        CounterAction::Decrement
                    } else {
                        CounterAction::IncrementByAmount(2)
                    };
                    store.dispatch(action).await.unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        // 75 increments of 2, 25 decrements
        assert_eq!(store.select(select_count).await.unwrap(), 125);
    }

    #[tokio::test]
    async fn test_dispatches_apply_in_submission_order() {
        let store = Store::new(StoreConfig::default());

        let mut handles = Vec::new();
        for i in 0..5 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.dispatch(CounterAction::IncrementByAmount(i)).await.unwrap()
            }));
            tokio::task::yield_now().await;
        }

        // running totals only come out like this when applied in spawn order
        let mut seen = Vec::new();
        for handle in handles {
            seen.push(handle.await.unwrap().value);
        }

        assert_eq!(seen, vec![0, 1, 3, 6, 10]);
        assert_eq!(store.select(select_count).await.unwrap(), 10);
    }

    #[tokio::test]
    async fn test_dispatch_keeps_other_slices() {
        let mut state = AppState::with_counter(CounterState::new(7));
        state.insert("other", Slice::Opaque(json!({"user": "ana"})));
        let store = Store::with_state(StoreConfig::default(), state);

        store.dispatch(CounterAction::Increment).await.unwrap();

        let snapshot = store.state().await;
        assert_eq!(snapshot.get("other"), Some(&Slice::Opaque(json!({"user": "ana"}))));
        assert_eq!(snapshot.counter().unwrap().value, 8);
    }

    #[tokio::test]
    async fn test_dispatch_without_counter_slice() {
        let store = Store::with_state(StoreConfig::default(), AppState::new());

        assert!(matches!(
            store.dispatch(CounterAction::Increment).await,
            Err(StoreError::MissingKey(key)) if key == "counter"
        ));
        assert!(matches!(
            store.select(select_count).await,
            Err(StoreError::MissingKey(_))
        ));
    }

    #[tokio::test]
    async fn test_dispatch_named_sync() {
        let store = Store::new(StoreConfig::default());

        let dispatched = store.dispatch_named("counter/incrementByAmount", Some(9)).await.unwrap();
        assert!(matches!(dispatched, Dispatched::Applied(CounterState { value: 9 })));

        let dispatched = store.dispatch_named("counter/decrement", None).await.unwrap();
        assert!(matches!(dispatched, Dispatched::Applied(CounterState { value: 8 })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispatch_named_async() {
        let store = Store::new(StoreConfig::default());

        let dispatched = store.dispatch_named("counter/incrementAsync", Some(10)).await.unwrap();
        let Dispatched::Scheduled(mut delayed) = dispatched else {
            panic!("expected a scheduled dispatch");
        };
        assert_eq!(store.select(select_count).await.unwrap(), 0);

        tokio::time::advance(Duration::from_millis(1000)).await;
        delayed.wait().await.unwrap();
        assert_eq!(store.select(select_count).await.unwrap(), 10);
    }

    #[tokio::test]
    async fn test_dispatch_named_errors() {
        let store = Store::new(StoreConfig::default());

        assert!(matches!(
            store.dispatch_named("counter/incrementAsync", None).await,
            Err(StoreError::MissingPayload(_))
        ));
        assert!(matches!(
            store.dispatch_named("todos/add", Some(1)).await,
            Err(StoreError::UnknownAction(_))
        ));
        assert!(matches!(
            store.select_named("counter/selectTotal").await,
            Err(StoreError::UnknownSelector(_))
        ));
        assert_eq!(store.select(select_count).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_initial_value_from_config() {
        let store = Store::new(StoreConfig {
            initial_value: -4,
            ..StoreConfig::default()
        });
        assert_eq!(store.select(select_count).await.unwrap(), -4);
        assert_eq!(store.config().async_delay, Duration::from_millis(1000));
    }
}
