//! Test data for the demo storefront

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Password shared by every demo account
pub const DEFAULT_PASSWORD: &str = "secret_sauce";

/// A storefront account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub password: String,
}

impl User {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn standard() -> Self {
        Self::new("standard_user", DEFAULT_PASSWORD)
    }

    pub fn locked_out() -> Self {
        Self::new("locked_out_user", DEFAULT_PASSWORD)
    }

    pub fn problem() -> Self {
        Self::new("problem_user", DEFAULT_PASSWORD)
    }

    pub fn performance_glitch() -> Self {
        Self::new("performance_glitch_user", DEFAULT_PASSWORD)
    }

    /// Look up a known account by its alias or username
    pub fn named(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().replace(' ', "_").as_str() {
            "standard" | "standard_user" => Some(Self::standard()),
            "locked_out" | "locked_out_user" => Some(Self::locked_out()),
            "problem" | "problem_user" => Some(Self::problem()),
            "performance_glitch" | "performance_glitch_user" => Some(Self::performance_glitch()),
            _ => None,
        }
    }
}

/// Customer details for the checkout form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub first_name: String,
    pub last_name: String,
    pub postal_code: String,
}

const FIRST_NAMES: &[&str] = &["Ada", "Grace", "Linus", "Barbara", "Ken", "Margaret"];
const LAST_NAMES: &[&str] = &["Lovelace", "Hopper", "Torvalds", "Liskov", "Thompson", "Hamilton"];

impl CustomerInfo {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            postal_code: postal_code.into(),
        }
    }

    /// Deterministic customer for a seed
    pub fn from_seed(seed: u64) -> Self {
        let first = FIRST_NAMES[(seed % FIRST_NAMES.len() as u64) as usize];
        let last = LAST_NAMES[((seed / 7) % LAST_NAMES.len() as u64) as usize];
        let postal_code = format!("{:05}", seed % 100_000);

        Self::new(first, last, postal_code)
    }

    /// Random customer with a five-digit postal code
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let first = FIRST_NAMES.choose(&mut rng).copied().unwrap_or(FIRST_NAMES[0]);
        let last = LAST_NAMES.choose(&mut rng).copied().unwrap_or(LAST_NAMES[0]);
        let postal_code = rng.gen_range(10_000..100_000u32).to_string();

        Self::new(first, last, postal_code)
    }
}

/// Catalogue entries with their listed prices
pub const PRODUCTS: &[(&str, &str)] = &[
    ("Sauce Labs Backpack", "$29.99"),
    ("Sauce Labs Bike Light", "$9.99"),
    ("Sauce Labs Bolt T-Shirt", "$15.99"),
    ("Sauce Labs Fleece Jacket", "$49.99"),
    ("Sauce Labs Onesie", "$7.99"),
    ("Test.allTheThings() T-Shirt (Red)", "$15.99"),
];

/// Listed price of a product, if it is in the catalogue
pub fn product_price(name: &str) -> Option<&'static str> {
    PRODUCTS
        .iter()
        .find(|(product, _)| *product == name)
        .map(|(_, price)| *price)
}

/// Slug used in `data-test` attributes, e.g. `sauce-labs-backpack`
pub fn product_slug(name: &str) -> String {
    name.to_ascii_lowercase()
        .split(|c: char| c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Parse a price label such as `$29.99` or `Total: $32.39`
pub fn parse_price(label: &str) -> Option<f64> {
    label
        .rsplit('$')
        .next()
        .and_then(|amount| amount.trim().parse().ok())
}
