use super::world::StoreWorld;
use cucumber::{given, then, when};
use storefront_e2e::pages::login::LOGIN_BUTTON;
use storefront_e2e::LogLevel;

#[given(expr = "the login button fails {int} times before responding")]
async fn flaky_login_button(world: &mut StoreWorld, times: u32) {
    world.store.fail_clicks(LOGIN_BUTTON, times);
}

#[given(expr = "the cart badge lags {int} checks behind")]
async fn lagging_badge(world: &mut StoreWorld, checks: u32) {
    world.store.set_badge_lag(checks);
}

#[when(expr = "I click the missing element {string}")]
async fn click_missing(world: &mut StoreWorld, selector: String) {
    world.last_error = world.base.click(&selector).await.err();
}

#[then(expr = "the log should record {int} retry warnings")]
async fn retry_warnings(world: &mut StoreWorld, expected: usize) {
    let retries = world
        .logger
        .at_level(LogLevel::Warn)
        .into_iter()
        .filter(|record| record.field("delay_ms").is_some())
        .count();
    assert_eq!(retries, expected);
}

#[then(expr = "the last error should report {string}")]
async fn last_error_reports(world: &mut StoreWorld, fragment: String) {
    let message = world.last_error().message();
    assert!(message.contains(&fragment), "unexpected message: {}", message);
}

#[then(expr = "the last error should name the selector {string}")]
async fn last_error_selector(world: &mut StoreWorld, selector: String) {
    assert_eq!(
        world.last_error().context().selector.as_deref(),
        Some(selector.as_str())
    );
}

#[then("the last error should carry diagnostics for the login page")]
async fn last_error_diagnostics(world: &mut StoreWorld) {
    let state = world
        .last_error()
        .diagnostics()
        .and_then(|snapshot| snapshot.page_state())
        .expect("captured page state");

    assert!(state.url.ends_with('/'), "unexpected url {}", state.url);
    assert_eq!(state.title, "Swag Labs");
}

#[then("the failure can be saved as an artifact")]
async fn failure_saved(world: &mut StoreWorld) {
    let diagnostics = world
        .last_error()
        .diagnostics()
        .cloned()
        .expect("captured diagnostics");

    let paths = world
        .artifacts()
        .record("missing element", diagnostics, None)
        .expect("write artifact");
    assert!(paths.report.exists());
    assert!(paths.screenshot.is_none());
}
