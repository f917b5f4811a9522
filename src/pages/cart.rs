//! Shopping cart page

use super::BasePage;
use crate::error::OperationResult;

pub const PATH: &str = "cart.html";
pub const CART_ITEM: &str = ".cart_item";
pub const CART_ITEM_NAME: &str = ".cart_item .inventory_item_name";
pub const CHECKOUT_BUTTON: &str = "#checkout";
pub const CONTINUE_SHOPPING_BUTTON: &str = "#continue-shopping";

#[derive(Clone)]
pub struct CartPage {
    base: BasePage,
}

impl CartPage {
    pub fn new(base: BasePage) -> Self {
        Self { base }
    }

    pub async fn wait_until_loaded(&self) -> OperationResult<()> {
        self.base.wait_for_url_contains(PATH).await?;
        self.base.wait_for_visible(CHECKOUT_BUTTON, None).await
    }

    pub async fn item_names(&self) -> OperationResult<Vec<String>> {
        self.base.texts(CART_ITEM_NAME).await
    }

    pub async fn item_count(&self) -> OperationResult<usize> {
        self.base.count(CART_ITEM).await
    }

    pub async fn checkout(&self) -> OperationResult<()> {
        self.base.click_with_retry(CHECKOUT_BUTTON).await
    }

    pub async fn continue_shopping(&self) -> OperationResult<()> {
        self.base.click(CONTINUE_SHOPPING_BUTTON).await
    }
}
