//! Element location and simulated user input
//!
//! Lookups are immediate: a [`Page::find`] that matches nothing fails right
//! away with [`E2eError::ElementNotFound`]. Anything that has to wait for the
//! DOM to settle goes through the page's [`Waiter`].

use std::borrow::Cow;
use std::fmt;

use fantoccini::elements::Element as WdElement;
use fantoccini::Client;
use tracing::debug;

use crate::error::{E2eError, E2eResult};
use crate::wait::Waiter;

/// Rule identifying zero or more DOM elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locator {
    Id(&'static str),
    ClassName(&'static str),
    Css(&'static str),
}

impl Locator {
    /// CSS selector equivalent, which is what goes over the wire.
    pub fn css(&self) -> Cow<'static, str> {
        match *self {
            Locator::Id(id) => Cow::Owned(format!("#{}", id)),
            Locator::ClassName(class) => Cow::Owned(format!(".{}", class)),
            Locator::Css(selector) => Cow::Borrowed(selector),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Id(id) => write!(f, "id={}", id),
            Locator::ClassName(class) => write!(f, "class={}", class),
            Locator::Css(selector) => write!(f, "css={}", selector),
        }
    }
}

/// Handle to the page shown by one live session
#[derive(Clone)]
pub struct Page {
    client: Client,
    waiter: Waiter,
}

impl Page {
    pub(crate) fn new(client: Client, waiter: Waiter) -> Self {
        Self { client, waiter }
    }

    pub async fn goto(&self, url: &str) -> E2eResult<()> {
        debug!("Navigating to {}", url);
        self.client.goto(url).await?;
        Ok(())
    }

    pub async fn current_url(&self) -> E2eResult<String> {
        let url = self.client.current_url().await?;
        Ok(url.to_string())
    }

    /// Resolve exactly one element, failing immediately if none matches.
    pub async fn find(&self, locator: Locator) -> E2eResult<Element> {
        let css = locator.css();
        let inner = self
            .client
            .find(fantoccini::Locator::Css(&css))
            .await
            .map_err(|e| E2eError::from_command(e, &locator))?;
        Ok(Element { inner, locator })
    }

    /// Resolve every matching element; an empty result is not an error.
    pub async fn find_all(&self, locator: Locator) -> E2eResult<Vec<Element>> {
        let css = locator.css();
        let found = self
            .client
            .find_all(fantoccini::Locator::Css(&css))
            .await
            .map_err(|e| E2eError::from_command(e, &locator))?;
        Ok(found
            .into_iter()
            .map(|inner| Element { inner, locator })
            .collect())
    }

    pub async fn type_into(&self, element: &Element, text: &str) -> E2eResult<()> {
        element.type_text(text).await
    }

    pub async fn click(&self, element: &Element) -> E2eResult<()> {
        element.click().await
    }

    /// Wait until an element matching `locator` is attached to the DOM.
    pub async fn wait_for_presence(&self, locator: Locator) -> E2eResult<Element> {
        self.waiter
            .until(format!("presence of {}", locator), move || async move {
                match self.find(locator).await {
                    Ok(element) => Ok(Some(element)),
                    Err(e) if e.is_transient_lookup() => Ok(None),
                    Err(e) => Err(e),
                }
            })
            .await
    }

    /// Wait until an element matching `locator` is displayed and enabled.
    pub async fn wait_for_clickable(&self, locator: Locator) -> E2eResult<Element> {
        self.waiter
            .until(format!("{} to be clickable", locator), move || async move {
                let element = match self.find(locator).await {
                    Ok(element) => element,
                    Err(e) if e.is_transient_lookup() => return Ok(None),
                    Err(e) => return Err(e),
                };
                match element.is_clickable().await {
                    Ok(true) => Ok(Some(element)),
                    Ok(false) => Ok(None),
                    // Re-rendered between the lookup and the check; try again.
                    Err(e) if e.is_transient_lookup() => Ok(None),
                    Err(e) => Err(e),
                }
            })
            .await
    }
}

/// Transient reference to a DOM node, valid until the next page mutation
#[derive(Clone)]
pub struct Element {
    inner: WdElement,
    locator: Locator,
}

impl Element {
    pub async fn text(&self) -> E2eResult<String> {
        self.inner
            .text()
            .await
            .map_err(|e| E2eError::from_command(e, &self.locator))
    }

    pub async fn click(&self) -> E2eResult<()> {
        debug!("Clicking {}", self.locator);
        self.inner
            .click()
            .await
            .map_err(|e| E2eError::from_command(e, &self.locator))
    }

    pub async fn type_text(&self, text: &str) -> E2eResult<()> {
        self.inner
            .send_keys(text)
            .await
            .map_err(|e| E2eError::from_command(e, &self.locator))
    }

    pub async fn is_displayed(&self) -> E2eResult<bool> {
        self.inner
            .is_displayed()
            .await
            .map_err(|e| E2eError::from_command(e, &self.locator))
    }

    pub async fn is_enabled(&self) -> E2eResult<bool> {
        self.inner
            .is_enabled()
            .await
            .map_err(|e| E2eError::from_command(e, &self.locator))
    }

    /// Displayed and enabled
    pub async fn is_clickable(&self) -> E2eResult<bool> {
        Ok(self.is_displayed().await? && self.is_enabled().await?)
    }

    /// Resolve a descendant of this element.
    pub async fn find(&self, locator: Locator) -> E2eResult<Element> {
        let css = locator.css();
        let inner = self
            .inner
            .find(fantoccini::Locator::Css(&css))
            .await
            .map_err(|e| E2eError::from_command(e, &locator))?;
        Ok(Element { inner, locator })
    }
}
