//! HTTP lookups against UniProtKB and the AlphaFold database.
//!
//! Both lookups degrade to `None` on transport failures, non-success statuses and
//! unparsable payloads; the caller treats that as "no data" for the accession.

use crate::config::NetworkSettings;
use crate::error::Result;
use adscreen::core::io::alphamissense::read_substitutions;
use adscreen::core::io::uniprot::parse_features;
use adscreen::core::models::feature::FeatureAnnotation;
use reqwest::Client;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info, warn};

const UNIPROT_URL: &str = "https://rest.uniprot.org/uniprotkb";
const ALPHAFOLD_FILES_URL: &str = "https://alphafold.ebi.ac.uk/files";

pub fn uniprot_entry_url(accession: &str) -> String {
    format!("{}/{}.json", UNIPROT_URL, accession)
}

pub fn substitutions_url(accession: &str) -> String {
    format!("{}/AF-{}-F1-aa-substitutions.csv", ALPHAFOLD_FILES_URL, accession)
}

pub struct RemoteClient {
    client: Client,
    request_delay: Duration,
}

impl RemoteClient {
    pub fn new(settings: &NetworkSettings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(settings.timeout)
            .build()?;
        Ok(Self {
            client,
            request_delay: settings.request_delay,
        })
    }

    async fn get_text(&self, url: &str) -> Option<String> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status());
        let text = match response {
            Ok(response) => response.text().await,
            Err(e) => Err(e),
        };
        if !self.request_delay.is_zero() {
            tokio::time::sleep(self.request_delay).await;
        }
        match text {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("Request to {} failed: {}", url, e);
                None
            }
        }
    }

    /// Feature annotations of a UniProtKB entry.
    pub async fn fetch_features(&self, accession: &str) -> Option<Vec<FeatureAnnotation>> {
        info!("Searching UniProt for {}", accession);
        let body = self.get_text(&uniprot_entry_url(accession)).await?;
        match parse_features(&body) {
            Ok(features) => Some(features),
            Err(e) => {
                warn!("Malformed UniProt entry for {}: {}", accession, e);
                None
            }
        }
    }

    /// Per-position AlphaMissense pathogenicity of an accession.
    pub async fn fetch_substitutions(&self, accession: &str) -> Option<BTreeMap<usize, f64>> {
        info!("Downloading AlphaMissense data for {}", accession);
        let body = self.get_text(&substitutions_url(accession)).await?;
        match read_substitutions(body.as_bytes()) {
            Ok(scores) => Some(scores),
            Err(e) => {
                warn!("Malformed AlphaMissense table for {}: {}", accession, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_follow_service_layouts() {
        assert_eq!(
            uniprot_entry_url("P04637"),
            "https://rest.uniprot.org/uniprotkb/P04637.json"
        );
        assert_eq!(
            substitutions_url("P04637"),
            "https://alphafold.ebi.ac.uk/files/AF-P04637-F1-aa-substitutions.csv"
        );
    }

    #[test]
    fn client_builds_from_settings() {
        let settings = NetworkSettings {
            user_agent: "adscreen-test".into(),
            timeout: Duration::from_secs(1),
            request_delay: Duration::ZERO,
        };
        assert!(RemoteClient::new(&settings).is_ok());
    }

    #[tokio::test]
    async fn unreachable_host_yields_no_data() {
        let settings = NetworkSettings {
            user_agent: "adscreen-test".into(),
            timeout: Duration::from_millis(200),
            request_delay: Duration::ZERO,
        };
        let client = RemoteClient::new(&settings).unwrap();
        assert_eq!(client.get_text("http://127.0.0.1:9/unreachable").await, None);
    }
}
