use crate::support::demo_page;
use crate::support::demo_store::DemoStore;
use cucumber::World;
use std::fmt;
use std::sync::Arc;
use storefront_e2e::pages::{BasePage, CartPage, CheckoutPage, InventoryPage, LoginPage};
use storefront_e2e::{FailureArtifacts, MemoryLogger, OperationError};
use tempfile::TempDir;

/// One scenario's storefront, logger and last failure
#[derive(World)]
pub struct StoreWorld {
    pub base: BasePage,
    pub store: Arc<DemoStore>,
    pub logger: Arc<MemoryLogger>,
    pub last_error: Option<OperationError>,
    // removed with the scenario
    artifacts_dir: TempDir,
}

impl Default for StoreWorld {
    fn default() -> Self {
        let (base, store, logger) = demo_page();
        let artifacts_dir = TempDir::new().expect("create scenario tempdir");

        Self {
            base,
            store,
            logger,
            last_error: None,
            artifacts_dir,
        }
    }
}

impl fmt::Debug for StoreWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreWorld")
            .field("screen", &self.store.screen())
            .field("cart", &self.store.cart())
            .field("last_error", &self.last_error)
            .finish()
    }
}

impl StoreWorld {
    pub fn login_page(&self) -> LoginPage {
        LoginPage::new(self.base.clone())
    }

    pub fn inventory(&self) -> InventoryPage {
        InventoryPage::new(self.base.clone())
    }

    pub fn cart_page(&self) -> CartPage {
        CartPage::new(self.base.clone())
    }

    pub fn checkout(&self) -> CheckoutPage {
        CheckoutPage::new(self.base.clone())
    }

    pub fn artifacts(&self) -> FailureArtifacts {
        FailureArtifacts::new(self.artifacts_dir.path())
    }

    pub fn last_error(&self) -> &OperationError {
        self.last_error
            .as_ref()
            .expect("the scenario should have recorded a failure")
    }
}
