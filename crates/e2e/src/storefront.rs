//! Page objects for the demo storefront
//!
//! Everything here encodes the target site's DOM contract. The site is
//! owned by someone else, so when it changes these locators are the only
//! place that should need to follow.

use tracing::info;

use crate::config::Credentials;
use crate::error::{E2eError, E2eResult};
use crate::page::{Element, Page};

pub mod locators {
    use crate::page::Locator;

    pub const USERNAME: Locator = Locator::Id("user-name");
    pub const PASSWORD: Locator = Locator::Id("password");
    pub const LOGIN_BUTTON: Locator = Locator::Id("login-button");
    pub const ERROR_MESSAGE: Locator = Locator::Css("[data-test='error']");

    pub const INVENTORY_LIST: Locator = Locator::ClassName("inventory_list");
    pub const INVENTORY_ITEM: Locator = Locator::ClassName("inventory_item");
    pub const ITEM_NAME: Locator = Locator::ClassName("inventory_item_name");
    pub const ITEM_PRICE: Locator = Locator::ClassName("inventory_item_price");
    pub const ITEM_BUTTON: Locator = Locator::ClassName("btn_inventory");
    pub const TITLE: Locator = Locator::ClassName("title");
    pub const CART_BADGE: Locator = Locator::ClassName("shopping_cart_badge");

    pub const MENU_BUTTON: Locator = Locator::Id("react-burger-menu-btn");
    pub const LOGOUT_LINK: Locator = Locator::Id("logout_sidebar_link");
}

pub const INVENTORY_PATH: &str = "inventory.html";
pub const ADD_TO_CART_LABEL: &str = "Add to cart";
pub const REMOVE_LABEL: &str = "Remove";

/// Login form on the start page
pub struct LoginPage<'a> {
    page: &'a Page,
}

impl<'a> LoginPage<'a> {
    pub fn new(page: &'a Page) -> Self {
        Self { page }
    }

    /// Fill whatever parts of `credentials` are non-empty and submit.
    pub async fn submit(&self, credentials: &Credentials) -> E2eResult<()> {
        if !credentials.username.is_empty() {
            let field = self.page.find(locators::USERNAME).await?;
            self.page.type_into(&field, &credentials.username).await?;
            info!("Entered username: {}", credentials.username);
        }
        if !credentials.password.is_empty() {
            let field = self.page.find(locators::PASSWORD).await?;
            self.page.type_into(&field, &credentials.password).await?;
            info!("Entered password");
        }
        let button = self.page.find(locators::LOGIN_BUTTON).await?;
        self.page.click(&button).await?;
        info!("Clicked login button");
        Ok(())
    }

    /// Submit valid credentials and wait for the catalog to render.
    pub async fn login(&self, credentials: &Credentials) -> E2eResult<InventoryPage<'a>> {
        self.submit(credentials).await?;
        self.page.wait_for_presence(locators::INVENTORY_LIST).await?;
        Ok(InventoryPage::new(self.page))
    }

    /// The error banner, which must be present and visible.
    pub async fn error_message(&self) -> E2eResult<String> {
        let banner = self.page.find(locators::ERROR_MESSAGE).await?;
        if !banner.is_displayed().await? {
            return Err(E2eError::AssertionFailed("Error message not displayed".into()));
        }
        banner.text().await
    }

    pub async fn login_button_visible(&self) -> E2eResult<bool> {
        self.page.find(locators::LOGIN_BUTTON).await?.is_displayed().await
    }
}

/// Name and price text of one catalog entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub name: String,
    pub price: String,
}

/// Product catalog shown after login
pub struct InventoryPage<'a> {
    page: &'a Page,
}

impl<'a> InventoryPage<'a> {
    pub fn new(page: &'a Page) -> Self {
        Self { page }
    }

    pub async fn title(&self) -> E2eResult<String> {
        self.page.find(locators::TITLE).await?.text().await
    }

    pub async fn wait_for_items(&self) -> E2eResult<()> {
        self.page.wait_for_presence(locators::INVENTORY_ITEM).await?;
        Ok(())
    }

    pub async fn products(&self) -> E2eResult<Vec<Product>> {
        let mut products = Vec::new();
        for item in self.page.find_all(locators::INVENTORY_ITEM).await? {
            products.push(Product {
                name: item.find(locators::ITEM_NAME).await?.text().await?,
                price: item.find(locators::ITEM_PRICE).await?.text().await?,
            });
        }
        Ok(products)
    }

    /// Number on the cart badge; a missing badge means an empty cart.
    pub async fn cart_count(&self) -> E2eResult<u32> {
        match self.page.find_all(locators::CART_BADGE).await?.first() {
            Some(badge) => parse_cart_count(&badge.text().await?),
            None => Ok(0),
        }
    }

    /// Badge count once the badge has appeared.
    pub async fn wait_for_cart_count(&self) -> E2eResult<u32> {
        let badge = self.page.wait_for_presence(locators::CART_BADGE).await?;
        parse_cart_count(&badge.text().await?)
    }

    /// Action button of the first catalog entry
    pub async fn first_item_button(&self) -> E2eResult<Element> {
        self.page.find(locators::ITEM_BUTTON).await
    }

    pub async fn open_menu(&self) -> E2eResult<Menu<'a>> {
        let button = self.page.find(locators::MENU_BUTTON).await?;
        self.page.click(&button).await?;
        info!("Opened menu");
        Ok(Menu { page: self.page })
    }
}

/// Slide-out navigation menu
pub struct Menu<'a> {
    page: &'a Page,
}

impl<'a> Menu<'a> {
    pub async fn logout(&self) -> E2eResult<LoginPage<'a>> {
        let link = self.page.wait_for_clickable(locators::LOGOUT_LINK).await?;
        self.page.click(&link).await?;
        info!("Clicked logout");
        self.page.wait_for_presence(locators::LOGIN_BUTTON).await?;
        Ok(LoginPage::new(self.page))
    }
}

pub fn parse_cart_count(text: &str) -> E2eResult<u32> {
    text.trim().parse().map_err(|_| {
        E2eError::AssertionFailed(format!("Cart badge is not a number: '{}'", text))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("1", 1 ; "single digit")]
    #[test_case(" 3 ", 3 ; "padded")]
    #[test_case("12\n", 12 ; "trailing newline")]
    fn test_parse_cart_count(text: &str, expected: u32) {
        assert_eq!(parse_cart_count(text).unwrap(), expected);
    }

    #[test_case("" ; "empty")]
    #[test_case("one" ; "word")]
    #[test_case("-1" ; "negative")]
    fn test_parse_cart_count_rejects(text: &str) {
        assert!(matches!(
            parse_cart_count(text),
            Err(E2eError::AssertionFailed(_))
        ));
    }

    #[test]
    fn test_login_form_locators() {
        assert_eq!(locators::USERNAME.css(), "#user-name");
        assert_eq!(locators::ERROR_MESSAGE.css(), "[data-test='error']");
        assert_eq!(locators::CART_BADGE.css(), ".shopping_cart_badge");
    }
}
