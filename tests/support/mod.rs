//! Shared fixtures for the integration and acceptance tests
#![allow(dead_code)]

pub mod demo_store;

use demo_store::{DemoStore, BASE_URL};
use std::sync::Arc;
use storefront_e2e::config::{PollSettings, RetrySettings};
use storefront_e2e::pages::BasePage;
use storefront_e2e::{HarnessConfig, MemoryLogger};

/// Config pointed at the simulated storefront with short waits
pub fn fast_config() -> HarnessConfig {
    HarnessConfig {
        base_url: BASE_URL.to_string(),
        retry: RetrySettings {
            max_retries: 3,
            initial_delay_ms: 10,
            max_delay_ms: 100,
        },
        poll: PollSettings {
            timeout_ms: 2_000,
            interval_ms: 10,
        },
        ..HarnessConfig::default()
    }
}

/// Page plumbing over a fresh simulated storefront
pub fn demo_page() -> (BasePage, Arc<DemoStore>, Arc<MemoryLogger>) {
    let store = Arc::new(DemoStore::new());
    let logger = Arc::new(MemoryLogger::new());
    let base = BasePage::new(store.clone(), fast_config(), logger.clone());

    (base, store, logger)
}
