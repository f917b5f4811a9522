//! In-process simulation of the demo storefront
//!
//! Implements [`BrowserSession`] over a small state machine so page objects
//! and step definitions run without a browser. Clicks can be made to fail and
//! the cart badge can lag behind, to exercise retries and polling.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use storefront_e2e::test_data::{product_slug, DEFAULT_PASSWORD, PRODUCTS};
use storefront_e2e::{BrowserSession, Cookie, SessionError, SessionResult, Viewport};

pub const BASE_URL: &str = "https://shop.test/";

const CART_BADGE: &str = ".shopping_cart_badge";
const ERROR_BANNER: &str = "[data-test=\"error\"]";
const KNOWN_USERS: &[&str] = &[
    "standard_user",
    "locked_out_user",
    "problem_user",
    "performance_glitch_user",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Inventory,
    Cart,
    CheckoutInfo,
    CheckoutOverview,
    CheckoutComplete,
    Unknown,
}

impl Screen {
    fn from_path(path: &str) -> Self {
        match path.trim_start_matches('/') {
            "" | "index.html" => Screen::Login,
            "inventory.html" => Screen::Inventory,
            "cart.html" => Screen::Cart,
            "checkout-step-one.html" => Screen::CheckoutInfo,
            "checkout-step-two.html" => Screen::CheckoutOverview,
            "checkout-complete.html" => Screen::CheckoutComplete,
            _ => Screen::Unknown,
        }
    }

    fn path(self) -> &'static str {
        match self {
            Screen::Login | Screen::Unknown => "",
            Screen::Inventory => "inventory.html",
            Screen::Cart => "cart.html",
            Screen::CheckoutInfo => "checkout-step-one.html",
            Screen::CheckoutOverview => "checkout-step-two.html",
            Screen::CheckoutComplete => "checkout-complete.html",
        }
    }

    fn requires_login(self) -> bool {
        !matches!(self, Screen::Login | Screen::Unknown)
    }
}

#[derive(Debug)]
struct State {
    screen: Screen,
    user: Option<String>,
    fields: HashMap<String, String>,
    error: Option<String>,
    cart: Vec<&'static str>,
    menu_open: bool,
    flaky_clicks: HashMap<String, u32>,
    clicks: HashMap<String, u32>,
    badge_lag: u32,
    pending_badge_checks: u32,
    failing_visibility_checks: u32,
}

impl Default for State {
    fn default() -> Self {
        Self {
            screen: Screen::Login,
            user: None,
            fields: HashMap::new(),
            error: None,
            cart: Vec::new(),
            menu_open: false,
            flaky_clicks: HashMap::new(),
            clicks: HashMap::new(),
            badge_lag: 0,
            pending_badge_checks: 0,
            failing_visibility_checks: 0,
        }
    }
}

impl State {
    fn url(&self) -> String {
        format!("{}{}", BASE_URL, self.screen.path())
    }

    fn show(&mut self, screen: Screen) {
        self.screen = screen;
        self.error = None;
        self.menu_open = false;
        self.fields.clear();
    }

    fn product_for(&self, selector: &str, prefix: &str) -> Option<&'static str> {
        let slug = selector
            .strip_prefix(&format!("[data-test=\"{}", prefix))?
            .strip_suffix("\"]")?;

        PRODUCTS
            .iter()
            .map(|(name, _)| *name)
            .find(|name| product_slug(name) == slug)
    }

    fn subtotal(&self) -> f64 {
        self.cart
            .iter()
            .filter_map(|name| storefront_e2e::test_data::product_price(name))
            .filter_map(storefront_e2e::test_data::parse_price)
            .sum()
    }

    fn has(&self, selector: &str) -> bool {
        let logged_in_screen = self.screen.requires_login() && self.user.is_some();

        match selector {
            ".shopping_cart_link" | "#react-burger-menu-btn" => return logged_in_screen,
            CART_BADGE => return logged_in_screen && !self.cart.is_empty(),
            "#logout_sidebar_link" => return logged_in_screen && self.menu_open,
            ERROR_BANNER => {
                return self.error.is_some()
                    && matches!(self.screen, Screen::Login | Screen::CheckoutInfo)
            }
            _ => {}
        }

        match self.screen {
            Screen::Login => matches!(selector, "#user-name" | "#password" | "#login-button"),
            Screen::Inventory => {
                matches!(
                    selector,
                    ".inventory_list" | ".inventory_item_name" | ".inventory_item_price"
                ) || self
                    .product_for(selector, "add-to-cart-")
                    .map_or(false, |name| !self.cart.contains(&name))
                    || self
                        .product_for(selector, "remove-")
                        .map_or(false, |name| self.cart.contains(&name))
            }
            Screen::Cart => match selector {
                "#checkout" | "#continue-shopping" => true,
                ".cart_item" | ".cart_item .inventory_item_name" => !self.cart.is_empty(),
                _ => self
                    .product_for(selector, "remove-")
                    .map_or(false, |name| self.cart.contains(&name)),
            },
            Screen::CheckoutInfo => matches!(
                selector,
                "#first-name" | "#last-name" | "#postal-code" | "#continue" | "#cancel"
            ),
            Screen::CheckoutOverview => matches!(
                selector,
                ".summary_subtotal_label" | ".summary_total_label" | "#finish" | ".cart_item"
            ),
            Screen::CheckoutComplete => selector == ".complete-header",
            Screen::Unknown => false,
        }
    }

    fn submit_login(&mut self) {
        let username = self.fields.get("#user-name").cloned().unwrap_or_default();
        let password = self.fields.get("#password").cloned().unwrap_or_default();

        let error = if username.is_empty() {
            Some("Epic sadface: Username is required")
        } else if password.is_empty() {
            Some("Epic sadface: Password is required")
        } else if !KNOWN_USERS.contains(&username.as_str()) || password != DEFAULT_PASSWORD {
            Some("Epic sadface: Username and password do not match any user in this service")
        } else if username == "locked_out_user" {
            Some("Epic sadface: Sorry, this user has been locked out.")
        } else {
            None
        };

        match error {
            Some(message) => self.error = Some(message.to_string()),
            None => {
                self.user = Some(username);
                self.show(Screen::Inventory);
            }
        }
    }

    fn submit_checkout_info(&mut self) {
        let missing = [
            ("#first-name", "Error: First Name is required"),
            ("#last-name", "Error: Last Name is required"),
            ("#postal-code", "Error: Postal Code is required"),
        ]
        .into_iter()
        .find(|(field, _)| self.fields.get(*field).map_or(true, |v| v.is_empty()));

        match missing {
            Some((_, message)) => self.error = Some(message.to_string()),
            None => self.show(Screen::CheckoutOverview),
        }
    }
}

/// Simulated storefront session
#[derive(Debug, Default)]
pub struct DemoStore {
    state: Mutex<State>,
}

impl DemoStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// Make the next `times` clicks on `selector` fail
    pub fn fail_clicks(&self, selector: &str, times: u32) {
        self.state().flaky_clicks.insert(selector.to_string(), times);
    }

    /// Hide the cart badge for `checks` visibility checks after each add
    pub fn set_badge_lag(&self, checks: u32) {
        self.state().badge_lag = checks;
    }

    /// Make the next `times` visibility checks fail as if the node detached
    pub fn fail_visibility_checks(&self, times: u32) {
        self.state().failing_visibility_checks = times;
    }

    /// Attempted clicks on `selector`, failed ones included
    pub fn click_count(&self, selector: &str) -> u32 {
        self.state().clicks.get(selector).copied().unwrap_or(0)
    }

    pub fn cart(&self) -> Vec<String> {
        self.state().cart.iter().map(|name| name.to_string()).collect()
    }

    pub fn screen(&self) -> Screen {
        self.state().screen
    }
}

#[async_trait]
impl BrowserSession for DemoStore {
    async fn url(&self) -> SessionResult<String> {
        Ok(self.state().url())
    }

    async fn title(&self) -> SessionResult<String> {
        Ok("Swag Labs".to_string())
    }

    async fn viewport(&self) -> SessionResult<Option<Viewport>> {
        Ok(Some(Viewport {
            width: 1280,
            height: 720,
        }))
    }

    async fn cookies(&self) -> SessionResult<Vec<Cookie>> {
        let state = self.state();

        Ok(state
            .user
            .iter()
            .map(|user| Cookie {
                name: "session-username".to_string(),
                value: user.clone(),
                domain: "shop.test".to_string(),
                path: "/".to_string(),
                expires: -1.0,
                http_only: false,
                secure: true,
            })
            .collect())
    }

    async fn local_storage(&self) -> SessionResult<String> {
        let state = self.state();
        let ids: Vec<usize> = state
            .cart
            .iter()
            .filter_map(|name| PRODUCTS.iter().position(|(product, _)| product == name))
            .collect();

        let mut storage = serde_json::Map::new();
        if !ids.is_empty() {
            storage.insert(
                "cart-contents".to_string(),
                serde_json::Value::from(serde_json::to_string(&ids).unwrap()),
            );
        }
        Ok(serde_json::Value::Object(storage).to_string())
    }

    async fn session_storage(&self) -> SessionResult<String> {
        Ok("{}".to_string())
    }

    async fn user_agent(&self) -> SessionResult<String> {
        Ok("DemoStore/1.0".to_string())
    }

    async fn goto(&self, url: &str) -> SessionResult<()> {
        let mut state = self.state();

        let Some(path) = url.strip_prefix(BASE_URL) else {
            return Err(SessionError::NavigationFailed(format!(
                "net::ERR_NAME_NOT_RESOLVED at {}",
                url
            )));
        };

        let screen = Screen::from_path(path);
        if screen.requires_login() && state.user.is_none() {
            state.show(Screen::Login);
            state.error = Some(format!(
                "Epic sadface: You can only access '/{}' when you are logged in.",
                screen.path()
            ));
        } else {
            state.show(screen);
        }

        Ok(())
    }

    async fn click(&self, selector: &str) -> SessionResult<()> {
        let mut state = self.state();
        *state.clicks.entry(selector.to_string()).or_default() += 1;

        if let Some(remaining) = state.flaky_clicks.get_mut(selector) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(SessionError::ActionFailed(format!(
                    "{} is not stable",
                    selector
                )));
            }
        }

        if !state.has(selector) {
            return Err(SessionError::Timeout(selector.to_string()));
        }

        if let Some(product) = state.product_for(selector, "add-to-cart-") {
            state.cart.push(product);
            state.pending_badge_checks = state.badge_lag;
            return Ok(());
        }
        if let Some(product) = state.product_for(selector, "remove-") {
            state.cart.retain(|name| *name != product);
            return Ok(());
        }

        match selector {
            "#login-button" => state.submit_login(),
            ".shopping_cart_link" => state.show(Screen::Cart),
            "#checkout" => state.show(Screen::CheckoutInfo),
            "#continue-shopping" | "#cancel" => state.show(Screen::Inventory),
            "#continue" => state.submit_checkout_info(),
            "#finish" => {
                state.cart.clear();
                state.show(Screen::CheckoutComplete);
            }
            "#react-burger-menu-btn" => state.menu_open = true,
            "#logout_sidebar_link" => {
                state.user = None;
                state.show(Screen::Login);
            }
            _ => {}
        }

        Ok(())
    }

    async fn fill(&self, selector: &str, value: &str) -> SessionResult<()> {
        let mut state = self.state();
        if !state.has(selector) {
            return Err(SessionError::Timeout(selector.to_string()));
        }

        state.fields.insert(selector.to_string(), value.to_string());
        Ok(())
    }

    async fn text_content(&self, selector: &str) -> SessionResult<Option<String>> {
        let state = self.state();
        if !state.has(selector) {
            return Err(SessionError::Timeout(selector.to_string()));
        }

        let subtotal = state.subtotal();
        let tax = (subtotal * 0.08 * 100.0).round() / 100.0;

        let text = match selector {
            ERROR_BANNER => state.error.clone().unwrap_or_default(),
            CART_BADGE => state.cart.len().to_string(),
            ".summary_subtotal_label" => format!("Item total: ${:.2}", subtotal),
            ".summary_total_label" => format!("Total: ${:.2}", subtotal + tax),
            ".complete-header" => "Thank you for your order!".to_string(),
            ".inventory_item_name" => PRODUCTS[0].0.to_string(),
            _ => String::new(),
        };

        Ok(Some(text))
    }

    async fn all_text_contents(&self, selector: &str) -> SessionResult<Vec<String>> {
        let state = self.state();
        if !state.has(selector) {
            return Ok(Vec::new());
        }

        Ok(match selector {
            ".inventory_item_name" => PRODUCTS.iter().map(|(name, _)| name.to_string()).collect(),
            ".inventory_item_price" => PRODUCTS.iter().map(|(_, price)| price.to_string()).collect(),
            ".cart_item .inventory_item_name" => {
                state.cart.iter().map(|name| name.to_string()).collect()
            }
            _ => vec![String::new()],
        })
    }

    async fn is_visible(&self, selector: &str) -> SessionResult<bool> {
        let mut state = self.state();

        if state.failing_visibility_checks > 0 {
            state.failing_visibility_checks -= 1;
            return Err(SessionError::ActionFailed(
                "Element is not attached to the DOM".to_string(),
            ));
        }

        if selector == CART_BADGE && state.pending_badge_checks > 0 {
            state.pending_badge_checks -= 1;
            return Ok(false);
        }

        Ok(state.has(selector))
    }

    async fn count(&self, selector: &str) -> SessionResult<usize> {
        let state = self.state();

        Ok(match selector {
            ".cart_item" if state.has(selector) => state.cart.len(),
            ".inventory_item_name" if state.has(selector) => PRODUCTS.len(),
            _ => usize::from(state.has(selector)),
        })
    }

    async fn screenshot(&self, _full_page: bool) -> SessionResult<Vec<u8>> {
        Ok(vec![0x89, b'P', b'N', b'G'])
    }
}
