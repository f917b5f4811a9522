//! Page objects for the demo storefront

pub mod base;
pub mod cart;
pub mod checkout;
pub mod inventory;
pub mod login;

pub use base::BasePage;
pub use cart::CartPage;
pub use checkout::CheckoutPage;
pub use inventory::InventoryPage;
pub use login::LoginPage;
