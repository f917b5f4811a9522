//! Login page

use super::BasePage;
use crate::error::OperationResult;
use crate::test_data::User;

pub const USERNAME_INPUT: &str = "#user-name";
pub const PASSWORD_INPUT: &str = "#password";
pub const LOGIN_BUTTON: &str = "#login-button";
pub const ERROR_MESSAGE: &str = "[data-test=\"error\"]";

/// Storefront landing page with the sign-in form
#[derive(Clone)]
pub struct LoginPage {
    base: BasePage,
}

impl LoginPage {
    pub fn new(base: BasePage) -> Self {
        Self { base }
    }

    pub async fn open(&self) -> OperationResult<()> {
        self.base.navigate("").await?;
        self.base.wait_for_visible(LOGIN_BUTTON, None).await
    }

    /// Submit the form for `user`
    pub async fn login(&self, user: &User) -> OperationResult<()> {
        self.base.fill(USERNAME_INPUT, &user.username).await?;
        self.base.fill(PASSWORD_INPUT, &user.password).await?;
        self.base.click_with_retry(LOGIN_BUTTON).await
    }

    pub async fn is_displayed(&self) -> OperationResult<bool> {
        self.base.is_visible(LOGIN_BUTTON).await
    }

    /// Error banner text, if shown
    pub async fn error_message(&self) -> OperationResult<Option<String>> {
        if !self.base.is_visible(ERROR_MESSAGE).await? {
            return Ok(None);
        }

        self.base.text(ERROR_MESSAGE).await.map(Some)
    }
}
