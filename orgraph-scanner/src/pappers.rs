// HTTP client for the Pappers company registry API

use crate::error::{Result, ScanError};
use crate::record::{is_valid_siren, EntityRecord, MandateSummary, PersonQuery};
use crate::source::EntitySource;
use futures::future::BoxFuture;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;
use tracing::debug;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.pappers.fr/v2";

/// Extra sections requested with every entity record.
const ENTITY_FIELDS: &str = "representants,entreprises_dirigees,publications_bodacc";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    resultats: Option<Vec<SearchHit>>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(default)]
    entreprises: Option<Vec<SearchCompany>>,
}

#[derive(Debug, Deserialize)]
struct SearchCompany {
    siren: Option<String>,
    denomination: Option<String>,
    nom_entreprise: Option<String>,
}

pub struct PappersClient {
    client: Client,
    base_url: Url,
    api_token: String,
}

impl PappersClient {
    pub fn new(api_token: impl Into<String>) -> Result<Self> {
        Self::with_options(api_token, DEFAULT_BASE_URL, 10)
    }

    pub fn with_options(
        api_token: impl Into<String>,
        base_url: &str,
        timeout_secs: u64,
    ) -> Result<Self> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| ScanError::Other(format!("Invalid base URL {}: {}", base_url, e)))?;
        // Keep the version segment when joining endpoint names
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .user_agent(concat!("orgraph/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.div_ceil(2)))
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            client,
            base_url,
            api_token: api_token.into(),
        })
    }

    fn endpoint(&self, name: &str) -> Result<Url> {
        self.base_url
            .join(name)
            .map_err(|e| ScanError::Other(format!("Invalid endpoint {}: {}", name, e)))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, query: &[(&str, &str)]) -> Result<T> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .query(&[("api_token", self.api_token.as_str())])
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                body.chars().take(200).collect()
            };
            return Err(ScanError::Status {
                code: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<T>().await?)
    }

    pub async fn get_entity(&self, siren: &str) -> Result<EntityRecord> {
        if !is_valid_siren(siren) {
            return Err(ScanError::MalformedIdentifier(siren.to_string()));
        }
        let url = self.endpoint("entreprise")?;
        let mut record: EntityRecord = self
            .get_json(
                url,
                &[("siren", siren), ("champs_supplementaires", ENTITY_FIELDS)],
            )
            .await?;
        if record.siren.is_empty() {
            record.siren = siren.to_string();
        }
        Ok(record)
    }

    pub async fn search_person(&self, person: &PersonQuery) -> Result<Vec<MandateSummary>> {
        let url = self.endpoint("recherche-dirigeants")?;
        let mut query = vec![
            ("nom_dirigeant", person.last_name.as_str()),
            ("prenom_dirigeant", person.first_name.as_str()),
        ];
        if let Some(birth_date) = person.birth_date.as_deref() {
            query.push(("date_de_naissance_dirigeant_min", birth_date));
            query.push(("date_de_naissance_dirigeant_max", birth_date));
        }

        let response: SearchResponse = self.get_json(url, &query).await?;

        let mut seen = HashSet::new();
        let mandates = response
            .resultats
            .unwrap_or_default()
            .into_iter()
            .flat_map(|hit| hit.entreprises.unwrap_or_default())
            .filter_map(|company| {
                let siren = company.siren?;
                let name = company
                    .denomination
                    .or(company.nom_entreprise)
                    .unwrap_or_else(|| siren.clone());
                Some(MandateSummary { siren, name })
            })
            .filter(|m| seen.insert(m.siren.clone()))
            .collect::<Vec<_>>();

        debug!(
            "Found {} mandates for {} {}",
            mandates.len(),
            person.first_name,
            person.last_name
        );
        Ok(mandates)
    }
}

impl EntitySource for PappersClient {
    fn fetch_entity<'a>(&'a self, siren: &'a str) -> BoxFuture<'a, Result<EntityRecord>> {
        Box::pin(self.get_entity(siren))
    }

    fn search_mandates<'a>(
        &'a self,
        person: &'a PersonQuery,
    ) -> BoxFuture<'a, Result<Vec<MandateSummary>>> {
        Box::pin(self.search_person(person))
    }
}
