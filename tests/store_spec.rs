mod common;

use std::sync::Arc;
use std::time::Duration;

use e2e_catalog::dashboard;
use e2e_catalog::provider::*;
use e2e_catalog::store::{DataStore, LoadError, LoadStatus};
use speculate2::speculate;
use tokio_test::block_on;
use tokio_util::sync::CancellationToken;

use common::BASE_PATH;

speculate! {
    before {
        let provider = Arc::new(common::provider());
        let store = DataStore::new(provider.clone());
    }

    describe "load_all" {
        it "starts empty and not loaded" {
            assert!(!store.is_loaded());
            assert_eq!(store.status().status, LoadStatus::Empty);
            assert!(store.snapshot().is_empty());
        }

        it "loads every collection" {
            block_on(store.load_all(BASE_PATH)).expect("load failed");

            let catalog = store.snapshot();
            assert!(store.is_loaded());
            assert_eq!(catalog.owners().len(), 2);
            assert_eq!(catalog.teams().len(), 2);
            assert_eq!(catalog.organizations().len(), 3);
            assert_eq!(catalog.features().len(), 3);
            assert_eq!(catalog.scenarios().len(), 4);

            let status = store.status();
            assert_eq!(status.status, LoadStatus::Loaded);
            assert_eq!(status.base_path.as_deref(), Some(BASE_PATH));
            assert!(status.loaded_at.is_some());
            assert!(status.last_error.is_none());
        }

        it "calls each provider step once, in order" {
            block_on(store.load_all(BASE_PATH)).expect("load failed");

            assert_eq!(provider.validate_calls(), 1);
            assert_eq!(provider.organization_calls(), 1);
            assert_eq!(provider.feature_calls(), 1);
        }

        it "rejects an empty base path before calling the provider" {
            let err = block_on(store.load_all("")).unwrap_err();

            assert_eq!(err, LoadError::Config("base path not found".to_string()));
            assert_eq!(provider.validate_calls(), 0);
            assert!(!store.is_loaded());
            assert_eq!(store.status().status, LoadStatus::Failed);
        }

        it "leaves a blank base path to repository validation" {
            provider.set_valid(false);

            let err = block_on(store.load_all("  ")).unwrap_err();

            assert_eq!(err, LoadError::RepoNotFound { path: "  ".to_string() });
            assert_eq!(provider.validate_calls(), 1);
            assert_eq!(store.base_path().as_deref(), Some("  "));
        }

        it "stops when the repository is not valid" {
            provider.set_valid(false);

            let err = block_on(store.load_all(BASE_PATH)).unwrap_err();

            assert_eq!(err, LoadError::RepoNotFound { path: BASE_PATH.to_string() });
            assert_eq!(provider.organization_calls(), 0);
            assert!(!store.is_loaded());
        }

        it "skips the feature fetch when organizations fail" {
            provider.set_organizations(Err(ProviderError::new("organization file not found")));

            let err = block_on(store.load_all(BASE_PATH)).unwrap_err();

            assert_eq!(err, LoadError::Provider("organization file not found".to_string()));
            assert_eq!(provider.feature_calls(), 0);
            assert!(!store.is_loaded());
            assert!(store.snapshot().is_empty());
            assert_eq!(
                store.status().last_error.as_deref(),
                Some("organization file not found")
            );
        }

        it "commits nothing when features fail" {
            provider.set_features(Err(ProviderError::new("features unreadable")));

            let err = block_on(store.load_all(BASE_PATH)).unwrap_err();

            assert_eq!(err, LoadError::Provider("features unreadable".to_string()));
            assert!(!store.is_loaded());
            assert_eq!(store.snapshot().organizations().len(), 0);
        }

        it "produces the same statistics when loaded twice" {
            block_on(store.load_all(BASE_PATH)).expect("first load failed");
            let first = dashboard::get_stats(&store.snapshot());

            block_on(store.load_all(BASE_PATH)).expect("second load failed");
            let second = dashboard::get_stats(&store.snapshot());

            assert_eq!(first, second);
            assert_eq!(store.status().generation, 2);
        }

        it "keeps the previous snapshot readable across a reload" {
            block_on(store.load_all(BASE_PATH)).expect("load failed");
            let held = store.snapshot();

            provider.set_organizations(Ok(OrganizationData::default()));
            block_on(store.load_all(BASE_PATH)).expect("reload failed");

            assert_eq!(held.organizations().len(), 3);
            assert_eq!(store.snapshot().organizations().len(), 0);
        }

        it "publishes status changes" {
            let rx = store.subscribe();
            assert_eq!(*rx.borrow(), LoadStatus::Empty);

            block_on(store.load_all(BASE_PATH)).expect("load failed");
            assert_eq!(*rx.borrow(), LoadStatus::Loaded);

            provider.set_valid(false);
            let _ = block_on(store.load_all(BASE_PATH));
            assert_eq!(*rx.borrow(), LoadStatus::Failed);
        }
    }

    describe "reload" {
        it "fails with a config error before any load" {
            let err = block_on(store.reload()).unwrap_err();
            assert!(matches!(err, LoadError::Config(_)));
        }

        it "reuses the last base path" {
            block_on(store.load_all(BASE_PATH)).expect("load failed");
            block_on(store.reload()).expect("reload failed");

            assert_eq!(provider.validate_calls(), 2);
            assert_eq!(store.base_path().as_deref(), Some(BASE_PATH));
            assert!(store.is_loaded());
        }

        it "keeps the old snapshot but reports not loaded on failure" {
            block_on(store.load_all(BASE_PATH)).expect("load failed");

            provider.set_features(Err(ProviderError::new("features unreadable")));
            let err = block_on(store.reload()).unwrap_err();

            assert!(matches!(err, LoadError::Provider(_)));
            assert!(!store.is_loaded());
            assert_eq!(store.snapshot().scenarios().len(), 4);
        }
    }

    describe "concurrent loads" {
        it "lets only the latest load commit" {
            provider.delay_next_organization_fetch(Duration::from_millis(100));

            let (first, second) = block_on(async {
                tokio::join!(store.load_all(BASE_PATH), async {
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    provider.set_organizations(Ok(OrganizationData {
                        organizations: vec![common::org("9", "Late Org", "ana", "core", &[])],
                        ..Default::default()
                    }));
                    store.load_all(BASE_PATH).await
                })
            });

            assert!(matches!(first, Err(LoadError::Superseded { generation: 1, latest: 2 })));
            assert!(first.unwrap_err().is_abandoned());
            assert!(second.is_ok());

            let catalog = store.snapshot();
            assert_eq!(catalog.organizations().len(), 1);
            assert!(catalog.find_organization("9").is_some());
            assert!(store.is_loaded());
            // the stale load never reached its feature fetch
            assert_eq!(provider.feature_calls(), 1);
        }

        it "abandons a cancelled load" {
            provider.delay_next_organization_fetch(Duration::from_millis(200));
            let token = CancellationToken::new();

            let (result, _) = block_on(async {
                tokio::join!(store.load_all_with(BASE_PATH, &token), async {
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    token.cancel();
                })
            });

            assert_eq!(result, Err(LoadError::Cancelled));
            assert_eq!(provider.feature_calls(), 0);
            assert!(!store.is_loaded());
            assert_eq!(store.status().status, LoadStatus::Failed);
        }

        it "does not let a stale failure overwrite a newer success" {
            provider.delay_next_organization_fetch(Duration::from_millis(100));
            provider.set_organizations(Err(ProviderError::new("slow failure")));

            let (first, second) = block_on(async {
                tokio::join!(store.load_all(BASE_PATH), async {
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    provider.set_organizations(Ok(common::organization_data()));
                    store.load_all(BASE_PATH).await
                })
            });

            assert!(first.is_err());
            assert!(second.is_ok());
            assert!(store.is_loaded());
            assert!(store.status().last_error.is_none());
        }

        it "ends loaded when many loads race on worker threads" {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .worker_threads(4)
                .enable_all()
                .build()
                .unwrap();

            let results = runtime.block_on(async {
                let mut loads = tokio::task::JoinSet::new();
                for _ in 0..200 {
                    let store = store.clone();
                    loads.spawn(async move { store.load_all(BASE_PATH).await });
                }
                loads.join_all().await
            });

            assert!(results.iter().any(|r| r.is_ok()));
            for result in &results {
                if let Err(e) = result {
                    assert!(e.is_abandoned(), "unexpected failure: {e}");
                }
            }

            let status = store.status();
            assert_eq!(status.generation, 200);
            assert_eq!(status.status, LoadStatus::Loaded);
            assert!(store.is_loaded());
            assert_eq!(*store.subscribe().borrow(), LoadStatus::Loaded);
        }
    }
}
