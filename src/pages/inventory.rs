//! Product listing page

use super::BasePage;
use crate::error::{ErrorContext, OperationResult};
use crate::test_data::{parse_price, product_slug};

pub const PATH: &str = "inventory.html";
pub const INVENTORY_LIST: &str = ".inventory_list";
pub const ITEM_NAME: &str = ".inventory_item_name";
pub const ITEM_PRICE: &str = ".inventory_item_price";
pub const CART_BADGE: &str = ".shopping_cart_badge";
pub const CART_LINK: &str = ".shopping_cart_link";
pub const MENU_BUTTON: &str = "#react-burger-menu-btn";
pub const LOGOUT_LINK: &str = "#logout_sidebar_link";

/// `data-test` selector of a product's add button
pub fn add_button(product: &str) -> String {
    format!("[data-test=\"add-to-cart-{}\"]", product_slug(product))
}

/// `data-test` selector of a product's remove button
pub fn remove_button(product: &str) -> String {
    format!("[data-test=\"remove-{}\"]", product_slug(product))
}

#[derive(Clone)]
pub struct InventoryPage {
    base: BasePage,
}

impl InventoryPage {
    pub fn new(base: BasePage) -> Self {
        Self { base }
    }

    pub async fn open(&self) -> OperationResult<()> {
        self.base.navigate(PATH).await?;
        self.wait_until_loaded().await
    }

    pub async fn wait_until_loaded(&self) -> OperationResult<()> {
        self.base.wait_for_url_contains(PATH).await?;
        self.base.wait_for_visible(INVENTORY_LIST, None).await
    }

    pub async fn product_names(&self) -> OperationResult<Vec<String>> {
        self.base.texts(ITEM_NAME).await
    }

    pub async fn product_prices(&self) -> OperationResult<Vec<f64>> {
        let labels = self.base.texts(ITEM_PRICE).await?;

        labels
            .iter()
            .map(|label| {
                parse_price(label).ok_or_else(|| {
                    self.base.unexpected(
                        ErrorContext::new("read prices").with_selector(ITEM_PRICE),
                        format!("Unreadable price label: {}", label),
                    )
                })
            })
            .collect()
    }

    pub async fn add_to_cart(&self, product: &str) -> OperationResult<()> {
        self.base.click_with_retry(&add_button(product)).await
    }

    pub async fn remove_from_cart(&self, product: &str) -> OperationResult<()> {
        self.base.click_with_retry(&remove_button(product)).await
    }

    /// Number on the cart badge, zero when there is no badge
    pub async fn cart_count(&self) -> OperationResult<usize> {
        if !self.base.is_visible(CART_BADGE).await? {
            return Ok(0);
        }

        let text = self.base.text(CART_BADGE).await?;
        text.parse().map_err(|_| {
            self.base.unexpected(
                ErrorContext::new("read cart badge").with_selector(CART_BADGE),
                format!("Cart badge is not a number: {}", text),
            )
        })
    }

    /// Poll until the cart badge shows `expected`
    pub async fn wait_for_cart_count(&self, expected: usize) -> OperationResult<()> {
        let options = self
            .base
            .config()
            .poll_options(
                ErrorContext::new("wait for cart count")
                    .with_selector(CART_BADGE)
                    .with_info("expected", expected),
            )
            .with_error_message(format!("Cart badge never showed {}", expected));

        self.base
            .poller()
            .wait_for_condition(|| async move { self.cart_count().await.map(|n| n == expected) }, options)
            .await
    }

    pub async fn open_cart(&self) -> OperationResult<()> {
        self.base.click(CART_LINK).await
    }

    pub async fn logout(&self) -> OperationResult<()> {
        self.base.click(MENU_BUTTON).await?;
        self.base.wait_for_visible(LOGOUT_LINK, None).await?;
        self.base.click(LOGOUT_LINK).await
    }
}
