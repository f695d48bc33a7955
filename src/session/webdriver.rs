//! `thirtyfour` implementation of the session seam.
//!
//! Talks to a running chromedriver. Presence waits are polling loops with a
//! fixed probe interval, not one-shot sleeps, so a page that renders early
//! is harvested early.

use async_trait::async_trait;
use std::time::Duration;
use thirtyfour::prelude::*;
use tokio_retry::{strategy::FixedInterval, Retry};
use tracing::{debug, info};

use super::{Session, SessionError};
use crate::config::SessionConfig;

pub struct WebDriverSession {
    driver: WebDriver,
    poll_interval: Duration,
}

impl WebDriverSession {
    /// Connect to chromedriver and open a browser window.
    pub async fn connect(cfg: &SessionConfig) -> Result<Self, SessionError> {
        let mut caps = DesiredCapabilities::chrome();
        caps.set_no_sandbox()?;
        caps.set_disable_dev_shm_usage()?;
        caps.add_chrome_arg("--disable-blink-features=AutomationControlled")?;
        caps.add_chrome_arg("disable-infobars")?;
        caps.add_chrome_arg(&format!("window-size={}", cfg.window_size))?;
        caps.add_chrome_arg(&format!("user-agent={}", cfg.user_agent))?;
        caps.add_chrome_option("excludeSwitches", ["enable-automation"])?;
        if cfg.headless {
            caps.set_headless()?;
        }

        let driver = WebDriver::new(&cfg.webdriver_url, caps).await.map_err(|e| {
            SessionError::Unavailable(format!(
                "cannot reach webdriver at {}: {}",
                cfg.webdriver_url, e
            ))
        })?;

        Ok(Self {
            driver,
            poll_interval: Duration::from_millis(cfg.poll_interval_ms.max(1)),
        })
    }

    /// Drive the retailer sign-in form to the authenticated state.
    ///
    /// Any failure here is `Unavailable`: no scraping proceeds without the
    /// authenticated session.
    pub async fn sign_in(&self, cfg: &SessionConfig, bound: Duration) -> Result<(), SessionError> {
        let (email, password) = match (&cfg.email, &cfg.password) {
            (Some(e), Some(p)) => (e.as_str(), p.as_str()),
            _ => {
                return Err(SessionError::Unavailable(
                    "credentials not configured (set AMAZON_EMAIL / AMAZON_PASSWORD)".to_string(),
                ))
            }
        };

        self.driver.goto(&cfg.signin_url).await?;

        let email_field = self
            .poll_present("#ap_email", bound)
            .await
            .map_err(|_| unreachable_signin("e-mail field never appeared"))?
            .remove(0);
        email_field.send_keys(email).await?;
        self.driver.find(By::Id("continue")).await?.click().await?;

        let password_field = self
            .poll_present("#ap_password", bound)
            .await
            .map_err(|_| unreachable_signin("password field never appeared"))?
            .remove(0);
        password_field.send_keys(password).await?;
        self.driver.find(By::Id("signInSubmit")).await?.click().await?;

        // The account-list nav entry only renders once signed in.
        self.poll_present("#nav-link-accountList", bound)
            .await
            .map_err(|_| unreachable_signin("check your credentials or network"))?;

        info!("Sign-in successful");
        Ok(())
    }

    /// Close the browser and end the webdriver session.
    pub async fn quit(self) -> Result<(), SessionError> {
        self.driver.quit().await?;
        Ok(())
    }

    async fn poll_present(
        &self,
        selector: &str,
        bound: Duration,
    ) -> Result<Vec<WebElement>, SessionError> {
        let interval = self.poll_interval;
        let retries = (bound.as_millis() / interval.as_millis().max(1)) as usize;
        let strategy = FixedInterval::new(interval).take(retries);

        Retry::spawn(strategy, || async {
            match self.driver.find_all(By::Css(selector)).await {
                Ok(found) if !found.is_empty() => Ok(found),
                Ok(_) => Err(()),
                Err(e) => {
                    debug!("probe for `{}` errored: {}", selector, e);
                    Err(())
                }
            }
        })
        .await
        .map_err(|_| SessionError::WaitTimeout {
            selector: selector.to_string(),
            waited: bound,
        })
    }
}

fn unreachable_signin(why: &str) -> SessionError {
    SessionError::Unavailable(format!("sign-in failed: {}", why))
}

#[async_trait]
impl Session for WebDriverSession {
    type Node = WebElement;

    async fn navigate(&self, url: &str) -> Result<(), SessionError> {
        self.driver.goto(url).await?;
        Ok(())
    }

    async fn wait_until_present(
        &self,
        selector: &str,
        bound: Duration,
    ) -> Result<Vec<WebElement>, SessionError> {
        self.poll_present(selector, bound).await
    }

    async fn find_on_page(&self, selector: &str) -> Result<Option<WebElement>, SessionError> {
        Ok(self
            .driver
            .find_all(By::Css(selector))
            .await?
            .into_iter()
            .next())
    }

    async fn find_within(
        &self,
        scope: &WebElement,
        selector: &str,
    ) -> Result<Vec<WebElement>, SessionError> {
        Ok(scope.find_all(By::Css(selector)).await?)
    }

    async fn find_optional(
        &self,
        scope: &WebElement,
        selector: &str,
    ) -> Result<Option<WebElement>, SessionError> {
        Ok(scope
            .find_all(By::Css(selector))
            .await?
            .into_iter()
            .next())
    }

    async fn text(&self, node: &WebElement) -> Result<String, SessionError> {
        Ok(node.text().await?)
    }

    async fn attr(&self, node: &WebElement, name: &str) -> Result<Option<String>, SessionError> {
        Ok(node.attr(name).await?)
    }

    async fn force_click(&self, node: &WebElement) -> Result<(), SessionError> {
        self.driver
            .execute("arguments[0].click();", vec![node.to_json()?])
            .await?;
        Ok(())
    }
}
