//! The storefront scenarios
//!
//! Each scenario is a straight-line script against a page that has just
//! loaded the start URL in a fresh session. Any error ends the scenario;
//! nothing is retried.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::{Accounts, Credentials};
use crate::error::{E2eError, E2eResult};
use crate::page::Page;
use crate::storefront::{
    InventoryPage, LoginPage, ADD_TO_CART_LABEL, INVENTORY_PATH, REMOVE_LABEL,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    ValidLogin,
    InvalidPassword,
    EmptyCredentials,
    LockedOutUser,
    ProductCatalog,
    AddToCart,
    Logout,
}

impl Scenario {
    /// Every scenario, in run order
    pub const ALL: [Scenario; 7] = [
        Scenario::ValidLogin,
        Scenario::InvalidPassword,
        Scenario::EmptyCredentials,
        Scenario::LockedOutUser,
        Scenario::ProductCatalog,
        Scenario::AddToCart,
        Scenario::Logout,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Scenario::ValidLogin => "valid_login",
            Scenario::InvalidPassword => "invalid_password",
            Scenario::EmptyCredentials => "empty_credentials",
            Scenario::LockedOutUser => "locked_out_user",
            Scenario::ProductCatalog => "product_catalog",
            Scenario::AddToCart => "add_to_cart",
            Scenario::Logout => "logout",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Scenario::ValidLogin => "Verify successful login with valid credentials",
            Scenario::InvalidPassword => "Verify error message for invalid password",
            Scenario::EmptyCredentials => "Verify error message for empty credentials",
            Scenario::LockedOutUser => "Verify locked out user cannot login",
            Scenario::ProductCatalog => "Verify product catalog loads correctly",
            Scenario::AddToCart => "Verify add to cart functionality",
            Scenario::Logout => "Verify logout functionality",
        }
    }

    /// 1-based position in the default run order
    pub fn priority(&self) -> u32 {
        match self {
            Scenario::ValidLogin => 1,
            Scenario::InvalidPassword => 2,
            Scenario::EmptyCredentials => 3,
            Scenario::LockedOutUser => 4,
            Scenario::ProductCatalog => 5,
            Scenario::AddToCart => 6,
            Scenario::Logout => 7,
        }
    }

    pub async fn run(&self, ctx: &ScenarioContext) -> E2eResult<()> {
        match self {
            Scenario::ValidLogin => valid_login(ctx).await,
            Scenario::InvalidPassword => invalid_password(ctx).await,
            Scenario::EmptyCredentials => empty_credentials(ctx).await,
            Scenario::LockedOutUser => locked_out_user(ctx).await,
            Scenario::ProductCatalog => product_catalog(ctx).await,
            Scenario::AddToCart => add_to_cart(ctx).await,
            Scenario::Logout => logout(ctx).await,
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Scenario {
    type Err = E2eError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scenario::ALL
            .into_iter()
            .find(|scenario| scenario.name() == s)
            .ok_or_else(|| E2eError::Config(format!("Unknown scenario: {}", s)))
    }
}

/// What a scenario gets to work with
pub struct ScenarioContext {
    pub page: Page,
    pub accounts: Accounts,
    pub base_url: String,
}

/// Log in with the valid account and wait for the catalog.
pub async fn perform_login(ctx: &ScenarioContext) -> E2eResult<InventoryPage<'_>> {
    LoginPage::new(&ctx.page).login(&ctx.accounts.valid).await
}

fn check(condition: bool, message: impl Into<String>) -> E2eResult<()> {
    if condition {
        Ok(())
    } else {
        Err(E2eError::AssertionFailed(message.into()))
    }
}

fn check_eq<T>(actual: T, expected: T, message: &str) -> E2eResult<()>
where
    T: PartialEq + fmt::Debug,
{
    check(
        actual == expected,
        format!("{}: expected {:?}, got {:?}", message, expected, actual),
    )
}

/// URL equality that ignores the trailing slash browsers add to bare origins.
fn same_page(actual: &str, expected: &str) -> bool {
    actual.trim_end_matches('/') == expected.trim_end_matches('/')
}

async fn valid_login(ctx: &ScenarioContext) -> E2eResult<()> {
    let inventory = perform_login(ctx).await?;

    let url = ctx.page.current_url().await?;
    check(
        url.contains(INVENTORY_PATH),
        format!("Failed to navigate to products page (at {})", url),
    )?;
    check_eq(
        inventory.title().await?.as_str(),
        "Products",
        "Products page title mismatch",
    )
}

async fn expect_login_error(
    ctx: &ScenarioContext,
    credentials: &Credentials,
    expected: &str,
) -> E2eResult<()> {
    let login = LoginPage::new(&ctx.page);
    login.submit(credentials).await?;

    let message = login.error_message().await?;
    info!("Error shown: {}", message);
    check(
        message.contains(expected),
        format!("Unexpected error message: {}", message),
    )
}

async fn invalid_password(ctx: &ScenarioContext) -> E2eResult<()> {
    expect_login_error(
        ctx,
        &ctx.accounts.wrong_password(),
        "Username and password do not match",
    )
    .await
}

async fn empty_credentials(ctx: &ScenarioContext) -> E2eResult<()> {
    expect_login_error(ctx, &Credentials::empty(), "Username is required").await
}

async fn locked_out_user(ctx: &ScenarioContext) -> E2eResult<()> {
    expect_login_error(ctx, &ctx.accounts.locked_out(), "locked out").await
}

async fn product_catalog(ctx: &ScenarioContext) -> E2eResult<()> {
    let inventory = perform_login(ctx).await?;
    inventory.wait_for_items().await?;

    let products = inventory.products().await?;
    check(!products.is_empty(), "No products found on page")?;
    info!("Found {} products", products.len());

    for product in &products {
        check(!product.name.trim().is_empty(), "Product name is empty")?;
        check(
            !product.price.trim().is_empty(),
            format!("Product price is empty for '{}'", product.name),
        )?;
    }

    let sample = &products[0];
    info!("Sample product: {} - {}", sample.name, sample.price);
    Ok(())
}

async fn add_to_cart(ctx: &ScenarioContext) -> E2eResult<()> {
    let inventory = perform_login(ctx).await?;
    inventory.wait_for_items().await?;

    let initial = inventory.cart_count().await?;

    let button = inventory.first_item_button().await?;
    check_eq(
        button.text().await?.as_str(),
        ADD_TO_CART_LABEL,
        "Button text mismatch",
    )?;
    button.click().await?;
    info!("Added item to cart");

    let updated = inventory.wait_for_cart_count().await?;
    check_eq(updated, initial + 1, "Cart count did not increase")?;

    // Re-resolve: the click re-rendered the button.
    let button = inventory.first_item_button().await?;
    check_eq(
        button.text().await?.as_str(),
        REMOVE_LABEL,
        "Button did not change to Remove",
    )
}

async fn logout(ctx: &ScenarioContext) -> E2eResult<()> {
    let inventory = perform_login(ctx).await?;
    let login = inventory.open_menu().await?.logout().await?;

    let url = ctx.page.current_url().await?;
    check(
        same_page(&url, &ctx.base_url),
        format!("Did not return to login page: expected {}, got {}", ctx.base_url, url),
    )?;
    check(login.login_button_visible().await?, "Login button not visible after logout")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use test_case::test_case;

    #[test]
    fn test_all_scenarios_in_priority_order() {
        let priorities: Vec<u32> = Scenario::ALL.iter().map(|s| s.priority()).collect();
        assert_eq!(priorities, (1..=7).collect::<Vec<_>>());
    }

    #[test]
    fn test_names_are_unique_and_round_trip() {
        let names: HashSet<&str> = Scenario::ALL.iter().map(|s| s.name()).collect();
        assert_eq!(names.len(), Scenario::ALL.len());

        for scenario in Scenario::ALL {
            assert_eq!(scenario.name().parse::<Scenario>().unwrap(), scenario);
            assert!(!scenario.description().is_empty());
        }
    }

    #[test]
    fn test_unknown_name_is_config_error() {
        assert!(matches!(
            "checkout".parse::<Scenario>(),
            Err(E2eError::Config(_))
        ));
    }

    #[test]
    fn test_serde_name_matches_display() {
        let json = serde_json::to_string(&Scenario::AddToCart).unwrap();
        assert_eq!(json, format!("\"{}\"", Scenario::AddToCart));
    }

    #[test_case("https://www.saucedemo.com/", "https://www.saucedemo.com" ; "configured without slash")]
    #[test_case("https://www.saucedemo.com/", "https://www.saucedemo.com/" ; "identical")]
    #[test_case("http://localhost:3000", "http://localhost:3000/" ; "reported without slash")]
    fn test_same_page_ignores_trailing_slash(actual: &str, expected: &str) {
        assert!(same_page(actual, expected));
    }

    #[test]
    fn test_same_page_rejects_other_paths() {
        assert!(!same_page(
            "https://www.saucedemo.com/inventory.html",
            "https://www.saucedemo.com/"
        ));
    }

    #[test]
    fn test_check_eq_message() {
        let err = check_eq(2, 1, "Cart count did not increase").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Assertion failed: Cart count did not increase: expected 1, got 2"
        );
        check_eq("Remove", "Remove", "label").unwrap();
    }
}
