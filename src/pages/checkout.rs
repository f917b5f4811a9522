//! Checkout flow: information form, overview and completion

use super::BasePage;
use crate::error::{ErrorContext, OperationResult};
use crate::test_data::{parse_price, CustomerInfo};

pub const FIRST_NAME_INPUT: &str = "#first-name";
pub const LAST_NAME_INPUT: &str = "#last-name";
pub const POSTAL_CODE_INPUT: &str = "#postal-code";
pub const CONTINUE_BUTTON: &str = "#continue";
pub const FINISH_BUTTON: &str = "#finish";
pub const SUBTOTAL_LABEL: &str = ".summary_subtotal_label";
pub const TOTAL_LABEL: &str = ".summary_total_label";
pub const COMPLETE_HEADER: &str = ".complete-header";
pub const ERROR_MESSAGE: &str = "[data-test=\"error\"]";

#[derive(Clone)]
pub struct CheckoutPage {
    base: BasePage,
}

impl CheckoutPage {
    pub fn new(base: BasePage) -> Self {
        Self { base }
    }

    pub async fn fill_information(&self, customer: &CustomerInfo) -> OperationResult<()> {
        self.base.fill(FIRST_NAME_INPUT, &customer.first_name).await?;
        self.base.fill(LAST_NAME_INPUT, &customer.last_name).await?;
        self.base.fill(POSTAL_CODE_INPUT, &customer.postal_code).await
    }

    pub async fn continue_to_overview(&self) -> OperationResult<()> {
        self.base.click_with_retry(CONTINUE_BUTTON).await
    }

    pub async fn subtotal(&self) -> OperationResult<f64> {
        self.read_price(SUBTOTAL_LABEL).await
    }

    pub async fn total(&self) -> OperationResult<f64> {
        self.read_price(TOTAL_LABEL).await
    }

    pub async fn finish(&self) -> OperationResult<()> {
        self.base.click_with_retry(FINISH_BUTTON).await
    }

    /// Header shown once the order is placed
    pub async fn completion_header(&self) -> OperationResult<String> {
        self.base.wait_for_visible(COMPLETE_HEADER, None).await?;
        self.base.text(COMPLETE_HEADER).await
    }

    pub async fn error_message(&self) -> OperationResult<Option<String>> {
        if !self.base.is_visible(ERROR_MESSAGE).await? {
            return Ok(None);
        }

        self.base.text(ERROR_MESSAGE).await.map(Some)
    }

    async fn read_price(&self, selector: &str) -> OperationResult<f64> {
        let label = self.base.text(selector).await?;

        parse_price(&label).ok_or_else(|| {
            self.base.unexpected(
                ErrorContext::new("read price").with_selector(selector),
                format!("Unreadable price label: {}", label),
            )
        })
    }
}
