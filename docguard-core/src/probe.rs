//! Remote probes used by the package, account and URL checks
//!
//! The [`Probe`] trait is the only place the validator touches the network.
//! Any error it returns is reported as a failed check; no attempt is made to
//! tell an unreachable service apart from a genuinely missing resource.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    header,
    redirect,
    Client,
};
use serde::Deserialize;
use tracing::debug;

use crate::{
    config::{
        AccountMethod,
        ChainConfig,
        DocGuardConfig,
    },
    error::{
        DocGuardError,
        DocGuardResult,
    },
};

/// Network operations needed by the remote checks
#[async_trait]
pub trait Probe: Send + Sync {
    /// Latest published version of a package
    async fn package_version(&self, name: &str) -> DocGuardResult<String>;

    /// Raw response body for an account lookup
    async fn account_body(&self, id: &str) -> DocGuardResult<String>;

    /// HTTP status code returned for a URL
    async fn url_status(&self, url: &str) -> DocGuardResult<u16>;
}

/// Abbreviated package document returned by the registry
#[derive(Debug, Deserialize)]
struct PackageDocument {
    #[serde(rename = "dist-tags", default)]
    dist_tags: DistTags,
}

#[derive(Debug, Default, Deserialize)]
struct DistTags {
    latest: Option<String>,
}

/// [`Probe`] backed by `reqwest`
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client:       Client,
    registry_url: String,
    chain:        ChainConfig,
}

impl HttpProbe {
    /// Build a probe from the registry, chain and HTTP settings
    pub fn from_config(config: &DocGuardConfig) -> DocGuardResult<Self> {
        let policy = if config.http.follow_redirects {
            redirect::Policy::limited(10)
        } else {
            redirect::Policy::none()
        };
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http.timeout_secs))
            .user_agent(concat!("docguard/", env!("CARGO_PKG_VERSION")))
            .redirect(policy)
            .build()?;

        Ok(Self {
            client,
            registry_url: config.registry.url.trim_end_matches('/').to_string(),
            chain: config.chain.clone(),
        })
    }

    fn package_url(&self, name: &str) -> String {
        // Scoped names keep the `@` but escape the separator
        format!("{}/{}", self.registry_url, name.replace('/', "%2F"))
    }

    fn account_url(&self, id: &str) -> String {
        let path = self.chain.path.replace("{id}", id);
        format!(
            "{}/{}",
            self.chain.endpoint.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn account_request(&self, id: &str) -> reqwest::RequestBuilder {
        let url = self.account_url(id);
        match self.chain.method {
            AccountMethod::Get => {
                debug!("GET {}", url);
                self.client.get(url)
            },
            AccountMethod::Post => {
                debug!("POST {}", url);
                self.client
                    .post(url)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(self.chain.body.replace("{id}", id))
            },
        }
    }
}

#[async_trait]
impl Probe for HttpProbe {
    async fn package_version(&self, name: &str) -> DocGuardResult<String> {
        let url = self.package_url(name);
        debug!("GET {}", url);
        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT, "application/vnd.npm.install-v1+json")
            .send()
            .await?
            .error_for_status()?;
        let document: PackageDocument = response.json().await?;
        document
            .dist_tags
            .latest
            .filter(|v| !v.is_empty())
            .ok_or_else(|| DocGuardError::Response(format!("no latest version for {}", name)))
    }

    async fn account_body(&self, id: &str) -> DocGuardResult<String> {
        let response = self.account_request(id).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }

    async fn url_status(&self, url: &str) -> DocGuardResult<u16> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        Ok(response.status().as_u16())
    }
}
