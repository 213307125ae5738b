//! Telephony number provider — Twilio when credentials are configured,
//! deterministic synthetic data otherwise.
//!
//! The variant is chosen once at startup by [`provider_from_settings`];
//! nothing probes configuration per call. Synthetic candidates are shaped
//! exactly like real ones — `is_configured` is the only way to tell the
//! two apart.

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::config::Settings;
use crate::error::ProviderError;
use crate::phone_numbers::model::{AvailableNumber, Capabilities, PhoneNumberType};

const TWILIO_API_BASE: &str = "https://api.twilio.com/2010-04-01";

/// Area codes the synthetic search rotates through.
const MOCK_AREA_CODES: &[&str] = &[
    "415", "650", "408", "510", "925", "707", "831", "209", "559", "661",
];

/// Synthetic search never returns more than this many candidates.
const MOCK_SEARCH_CAP: usize = 20;

/// Flat monthly price reported for every candidate.
const DEFAULT_MONTHLY_PRICE: f64 = 1.15;

/// Search filters for candidate numbers.
#[derive(Debug, Clone)]
pub struct SearchParams {
    pub country_code: String,
    pub area_code: Option<String>,
    pub number_type: PhoneNumberType,
    pub contains: Option<String>,
    pub limit: usize,
}

/// Outcome of a successful purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchasedNumber {
    pub phone_number: String,
    pub friendly_name: String,
    pub sid: String,
    pub status: String,
}

/// Contract for the number provider.
///
/// `search` never fails — a broken upstream degrades to synthetic data.
/// `purchase` and `release` surface their failures; callers must not mask
/// them.
#[async_trait]
pub trait NumberProvider: Send + Sync {
    fn is_configured(&self) -> bool;

    async fn search(&self, params: &SearchParams) -> Vec<AvailableNumber>;

    async fn purchase(
        &self,
        phone_number: &str,
        friendly_name: Option<&str>,
    ) -> Result<PurchasedNumber, ProviderError>;

    async fn release(&self, sid: &str) -> Result<(), ProviderError>;
}

/// Select the provider variant once, from startup settings.
pub fn provider_from_settings(settings: &Settings) -> Arc<dyn NumberProvider> {
    match (&settings.twilio_account_sid, &settings.twilio_auth_token) {
        (Some(sid), Some(token)) => {
            Arc::new(TwilioProvider::new(sid.clone(), token.clone()))
        }
        _ => Arc::new(MockNumberProvider),
    }
}

/// Deterministic candidates: same params, same result, every time.
fn synth_candidates(params: &SearchParams) -> Vec<AvailableNumber> {
    let area_codes: Vec<&str> = match params.area_code {
        Some(ref ac) => vec![ac.as_str()],
        None => MOCK_AREA_CODES.to_vec(),
    };

    (0..params.limit.min(MOCK_SEARCH_CAP))
        .map(|i| {
            let area_code = area_codes[i % area_codes.len()];
            AvailableNumber {
                phone_number: format!("+1{area_code}555{i:04}"),
                friendly_name: format!("({area_code}) 555-{i:04}"),
                locality: Some(
                    if area_code == "415" {
                        "San Francisco"
                    } else {
                        "California"
                    }
                    .to_string(),
                ),
                region: Some("CA".to_string()),
                country_code: params.country_code.clone(),
                capabilities: Capabilities {
                    voice: true,
                    sms: true,
                    mms: false,
                },
                price_monthly: DEFAULT_MONTHLY_PRICE,
                number_type: params.number_type,
            }
        })
        .collect()
}

// ── Mock ────────────────────────────────────────────────────────────────

/// Stand-in used when no Twilio credentials are configured.
pub struct MockNumberProvider;

#[async_trait]
impl NumberProvider for MockNumberProvider {
    fn is_configured(&self) -> bool {
        false
    }

    async fn search(&self, params: &SearchParams) -> Vec<AvailableNumber> {
        synth_candidates(params)
    }

    async fn purchase(
        &self,
        phone_number: &str,
        friendly_name: Option<&str>,
    ) -> Result<PurchasedNumber, ProviderError> {
        Ok(PurchasedNumber {
            phone_number: phone_number.to_string(),
            friendly_name: friendly_name.unwrap_or(phone_number).to_string(),
            sid: format!("PN_MOCK_{}", phone_number.replace('+', "")),
            status: "active".to_string(),
        })
    }

    async fn release(&self, _sid: &str) -> Result<(), ProviderError> {
        Ok(())
    }
}

// ── Twilio ──────────────────────────────────────────────────────────────

pub struct TwilioProvider {
    account_sid: String,
    auth_token: SecretString,
    client: reqwest::Client,
}

impl TwilioProvider {
    pub fn new(account_sid: String, auth_token: SecretString) -> Self {
        Self {
            account_sid,
            auth_token,
            client: reqwest::Client::new(),
        }
    }

    fn account_url(&self, resource: &str) -> String {
        format!("{TWILIO_API_BASE}/Accounts/{}/{resource}", self.account_sid)
    }

    async fn search_live(
        &self,
        params: &SearchParams,
    ) -> Result<Vec<AvailableNumber>, ProviderError> {
        let endpoint = format!(
            "AvailablePhoneNumbers/{}/{}.json",
            params.country_code,
            params.number_type.twilio_segment()
        );

        let mut query: Vec<(&str, String)> = vec![("PageSize", params.limit.to_string())];
        if let Some(ref area_code) = params.area_code {
            query.push(("AreaCode", area_code.clone()));
        }
        if let Some(ref contains) = params.contains {
            query.push(("Contains", contains.clone()));
        }

        let response = self
            .client
            .get(self.account_url(&endpoint))
            .basic_auth(&self.account_sid, Some(self.auth_token.expose_secret()))
            .query(&query)
            .send()
            .await
            .map_err(|e| ProviderError::Request {
                endpoint: endpoint.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                endpoint,
                status: status.as_u16(),
                body,
            });
        }

        let parsed: SearchResponse =
            response.json().await.map_err(|e| ProviderError::Request {
                endpoint,
                reason: e.to_string(),
            })?;

        Ok(parsed
            .available_phone_numbers
            .into_iter()
            .map(|c| AvailableNumber {
                friendly_name: c.friendly_name.unwrap_or_else(|| c.phone_number.clone()),
                phone_number: c.phone_number,
                locality: c.locality,
                region: c.region,
                country_code: params.country_code.clone(),
                capabilities: Capabilities {
                    voice: c.capabilities.voice,
                    sms: c.capabilities.sms,
                    mms: c.capabilities.mms,
                },
                price_monthly: DEFAULT_MONTHLY_PRICE,
                number_type: params.number_type,
            })
            .collect())
    }
}

#[async_trait]
impl NumberProvider for TwilioProvider {
    fn is_configured(&self) -> bool {
        true
    }

    async fn search(&self, params: &SearchParams) -> Vec<AvailableNumber> {
        match self.search_live(params).await {
            Ok(numbers) => numbers,
            Err(e) => {
                tracing::warn!(error = %e, "Twilio search failed; serving synthetic candidates");
                synth_candidates(params)
            }
        }
    }

    async fn purchase(
        &self,
        phone_number: &str,
        friendly_name: Option<&str>,
    ) -> Result<PurchasedNumber, ProviderError> {
        let endpoint = "IncomingPhoneNumbers.json".to_string();

        let mut form: Vec<(&str, &str)> = vec![("PhoneNumber", phone_number)];
        if let Some(friendly_name) = friendly_name {
            form.push(("FriendlyName", friendly_name));
        }

        let response = self
            .client
            .post(self.account_url(&endpoint))
            .basic_auth(&self.account_sid, Some(self.auth_token.expose_secret()))
            .form(&form)
            .send()
            .await
            .map_err(|e| ProviderError::Request {
                endpoint: endpoint.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                endpoint,
                status: status.as_u16(),
                body,
            });
        }

        let parsed: PurchaseResponse =
            response.json().await.map_err(|e| ProviderError::Request {
                endpoint,
                reason: e.to_string(),
            })?;

        Ok(PurchasedNumber {
            friendly_name: parsed
                .friendly_name
                .unwrap_or_else(|| parsed.phone_number.clone()),
            phone_number: parsed.phone_number,
            sid: parsed.sid,
            status: parsed.status.unwrap_or_else(|| "active".to_string()),
        })
    }

    async fn release(&self, sid: &str) -> Result<(), ProviderError> {
        let endpoint = format!("IncomingPhoneNumbers/{sid}.json");

        let response = self
            .client
            .delete(self.account_url(&endpoint))
            .basic_auth(&self.account_sid, Some(self.auth_token.expose_secret()))
            .send()
            .await
            .map_err(|e| ProviderError::Request {
                endpoint: endpoint.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                endpoint,
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

/// Twilio AvailablePhoneNumbers response subset.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    available_phone_numbers: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    phone_number: String,
    #[serde(default)]
    friendly_name: Option<String>,
    #[serde(default)]
    locality: Option<String>,
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    capabilities: CandidateCapabilities,
}

#[derive(Debug, Deserialize)]
struct CandidateCapabilities {
    #[serde(default = "default_true")]
    voice: bool,
    #[serde(rename = "SMS", default = "default_true")]
    sms: bool,
    #[serde(rename = "MMS", default)]
    mms: bool,
}

impl Default for CandidateCapabilities {
    fn default() -> Self {
        Self {
            voice: true,
            sms: true,
            mms: false,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Twilio IncomingPhoneNumbers response subset.
#[derive(Debug, Deserialize)]
struct PurchaseResponse {
    phone_number: String,
    #[serde(default)]
    friendly_name: Option<String>,
    sid: String,
    #[serde(default)]
    status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(limit: usize) -> SearchParams {
        SearchParams {
            country_code: "US".into(),
            area_code: None,
            number_type: PhoneNumberType::Local,
            contains: None,
            limit,
        }
    }

    #[test]
    fn synth_is_deterministic() {
        assert_eq!(synth_candidates(&params(20)), synth_candidates(&params(20)));
    }

    #[test]
    fn synth_rotates_area_codes() {
        let numbers = synth_candidates(&params(3));
        assert_eq!(numbers[0].phone_number, "+14155550000");
        assert_eq!(numbers[1].phone_number, "+16505550001");
        assert_eq!(numbers[2].phone_number, "+14085550002");
        assert_eq!(numbers[0].locality.as_deref(), Some("San Francisco"));
        assert_eq!(numbers[1].locality.as_deref(), Some("California"));
    }

    #[test]
    fn synth_honours_requested_area_code() {
        let p = SearchParams {
            area_code: Some("212".into()),
            ..params(2)
        };
        let numbers = synth_candidates(&p);
        assert_eq!(numbers[0].phone_number, "+12125550000");
        assert_eq!(numbers[1].phone_number, "+12125550001");
    }

    #[test]
    fn synth_caps_at_twenty() {
        assert_eq!(synth_candidates(&params(50)).len(), MOCK_SEARCH_CAP);
        assert_eq!(synth_candidates(&params(5)).len(), 5);
        assert!(synth_candidates(&params(0)).is_empty());
    }

    #[tokio::test]
    async fn mock_purchase_synthesizes_reference() {
        let provider = MockNumberProvider;
        let purchased = provider
            .purchase("+14155550000", Some("Front desk"))
            .await
            .unwrap();
        assert_eq!(purchased.phone_number, "+14155550000");
        assert_eq!(purchased.friendly_name, "Front desk");
        assert_eq!(purchased.sid, "PN_MOCK_14155550000");
        assert_eq!(purchased.status, "active");
    }

    #[tokio::test]
    async fn mock_purchase_defaults_friendly_name_to_number() {
        let purchased = MockNumberProvider.purchase("+1555", None).await.unwrap();
        assert_eq!(purchased.friendly_name, "+1555");
    }

    #[tokio::test]
    async fn mock_release_always_succeeds() {
        assert!(MockNumberProvider.release("PN_MOCK_1").await.is_ok());
    }

    #[test]
    fn factory_without_credentials_is_mock() {
        let provider = provider_from_settings(&Settings::default());
        assert!(!provider.is_configured());
    }

    #[test]
    fn factory_with_credentials_is_twilio() {
        let settings = Settings {
            twilio_account_sid: Some("AC123".into()),
            twilio_auth_token: Some(SecretString::from("token")),
            ..Default::default()
        };
        let provider = provider_from_settings(&settings);
        assert!(provider.is_configured());
    }

    #[test]
    fn twilio_capability_keys_are_uppercase() {
        let caps: CandidateCapabilities =
            serde_json::from_str(r#"{"voice": true, "SMS": false, "MMS": true}"#).unwrap();
        assert!(caps.voice);
        assert!(!caps.sms);
        assert!(caps.mms);
    }
}
