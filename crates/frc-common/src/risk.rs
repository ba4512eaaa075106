//! Risk intelligence payload of a successful siteverify response.
//!
//! Which fields are populated depends on the modules enabled for the
//! account. A sub-object belonging to a disabled module is `None`. A `null`
//! leaf decodes to its default, like a missing one.

use serde::{Deserialize, Serialize};

use crate::de::null_as_default;

/// Risk score from 1 (very low) to 5 (very high), 0 when unknown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RiskScore(u8);

impl RiskScore {
    pub const UNKNOWN: RiskScore = RiskScore(0);
    pub const VERY_LOW: RiskScore = RiskScore(1);
    pub const LOW: RiskScore = RiskScore(2);
    pub const MEDIUM: RiskScore = RiskScore(3);
    pub const HIGH: RiskScore = RiskScore(4);
    pub const VERY_HIGH: RiskScore = RiskScore(5);

    pub fn new(score: u8) -> Self {
        Self(score)
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn is_known(&self) -> bool {
        (1..=5).contains(&self.0)
    }

    /// Returns true for high and very high scores
    pub fn is_high(&self) -> bool {
        *self >= Self::HIGH && self.is_known()
    }
}

impl From<u8> for RiskScore {
    fn from(value: u8) -> Self {
        Self::new(value)
    }
}

/// All risk intelligence for one verification
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskIntelligenceData {
    /// Risk Scores module
    pub risk_scores: Option<RiskScoresData>,
    #[serde(deserialize_with = "null_as_default")]
    pub network: NetworkData,
    #[serde(deserialize_with = "null_as_default")]
    pub client: ClientData,
}

/// Summary scores per category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskScoresData {
    #[serde(deserialize_with = "null_as_default")]
    pub overall: RiskScore,
    #[serde(deserialize_with = "null_as_default")]
    pub network: RiskScore,
    #[serde(deserialize_with = "null_as_default")]
    pub browser: RiskScore,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkData {
    /// IP address that requested the challenge
    #[serde(deserialize_with = "null_as_default")]
    pub ip: String,

    /// IP Intelligence module
    #[serde(rename = "as")]
    pub autonomous_system: Option<NetworkAutonomousSystemData>,

    /// IP Intelligence module
    pub geolocation: Option<NetworkGeolocationData>,

    /// IP Intelligence module
    pub abuse_contact: Option<NetworkAbuseContactData>,

    /// Anonymization Detection module
    pub anonymization: Option<NetworkAnonymizationData>,
}

/// The autonomous system that owns the IP
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkAutonomousSystemData {
    /// ASN, e.g. 3209
    #[serde(deserialize_with = "null_as_default")]
    pub number: u32,
    /// Short name or handle, e.g. "VODANET"
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub company: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub domain: String,
    /// ISO 3166-1 alpha-2 country of registration
    #[serde(deserialize_with = "null_as_default")]
    pub country: String,
    /// Regional Internet Registry, e.g. "RIPE"
    #[serde(deserialize_with = "null_as_default")]
    pub rir: String,
    /// Route in CIDR notation
    #[serde(deserialize_with = "null_as_default")]
    pub route: String,
    /// e.g. "isp"
    #[serde(rename = "type")]
    #[serde(deserialize_with = "null_as_default")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkGeolocationCountryData {
    #[serde(deserialize_with = "null_as_default")]
    pub iso2: String,
    #[serde(deserialize_with = "null_as_default")]
    pub iso3: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name_native: String,
    #[serde(deserialize_with = "null_as_default")]
    pub region: String,
    #[serde(deserialize_with = "null_as_default")]
    pub subregion: String,
    /// ISO 4217 code
    #[serde(deserialize_with = "null_as_default")]
    pub currency: String,
    #[serde(deserialize_with = "null_as_default")]
    pub currency_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub phone_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub capital: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkGeolocationData {
    #[serde(deserialize_with = "null_as_default")]
    pub country: NetworkGeolocationCountryData,
    /// Empty if unknown
    #[serde(deserialize_with = "null_as_default")]
    pub city: String,
    /// State, region or province; empty if unknown
    #[serde(deserialize_with = "null_as_default")]
    pub state: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkAbuseContactData {
    #[serde(deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub phone: String,
}

/// VPN, proxy and anonymization service detection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkAnonymizationData {
    #[serde(deserialize_with = "null_as_default")]
    pub vpn_score: RiskScore,
    #[serde(deserialize_with = "null_as_default")]
    pub proxy_score: RiskScore,
    /// Tor exit node
    #[serde(deserialize_with = "null_as_default")]
    pub tor: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub icloud_private_relay: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientData {
    #[serde(deserialize_with = "null_as_default")]
    pub header_user_agent: String,

    /// Browser Identification module
    pub time_zone: Option<ClientTimeZoneData>,

    /// Browser Identification module
    pub browser: Option<ClientBrowserData>,

    /// Browser Identification module
    pub browser_engine: Option<ClientBrowserEngineData>,

    /// Browser Identification module
    pub device: Option<ClientDeviceData>,

    /// Browser Identification module
    pub os: Option<ClientOsData>,

    /// Bot Detection module
    pub tls_signature: Option<TlsSignatureData>,

    /// Bot Detection module
    pub automation: Option<ClientAutomationData>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientTimeZoneData {
    /// IANA name, e.g. "Europe/Berlin"
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// Country derived from the time zone, "XU" when it maps to none
    #[serde(deserialize_with = "null_as_default")]
    pub country_iso2: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientBrowserData {
    /// e.g. "firefox", "chrome_android", "safari_ios"
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub version: String,
    /// "YYYY-MM-DD", empty if unknown
    #[serde(deserialize_with = "null_as_default")]
    pub release_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientBrowserEngineData {
    /// e.g. "gecko", "blink", "webkit"
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientDeviceData {
    /// "desktop", "mobile" or "tablet"
    #[serde(rename = "type")]
    #[serde(deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(deserialize_with = "null_as_default")]
    pub brand: String,
    #[serde(deserialize_with = "null_as_default")]
    pub model: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientOsData {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub version: String,
}

/// TLS client hello signatures
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TlsSignatureData {
    #[serde(deserialize_with = "null_as_default")]
    pub ja3: String,
    #[serde(deserialize_with = "null_as_default")]
    pub ja3n: String,
    #[serde(deserialize_with = "null_as_default")]
    pub ja4: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientAutomationKnownBotData {
    #[serde(deserialize_with = "null_as_default")]
    pub detected: bool,
    /// e.g. "googlebot"; empty if nothing was detected
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "type")]
    #[serde(deserialize_with = "null_as_default")]
    pub kind: String,
    /// Link to the bot's documentation
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientAutomationToolData {
    #[serde(deserialize_with = "null_as_default")]
    pub detected: bool,
    /// e.g. "puppeteer", "playwright"
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "type")]
    #[serde(deserialize_with = "null_as_default")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientAutomationData {
    #[serde(deserialize_with = "null_as_default")]
    pub headless: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub automation_tool: ClientAutomationToolData,
    #[serde(deserialize_with = "null_as_default")]
    pub known_bot: ClientAutomationKnownBotData,
}

impl ClientData {
    /// Returns true if a headless browser, automation tool or known bot was detected
    pub fn automation_detected(&self) -> bool {
        self.automation.as_ref().is_some_and(|a| {
            a.headless || a.automation_tool.detected || a.known_bot.detected
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_score_levels() {
        assert!(!RiskScore::UNKNOWN.is_known());
        assert!(!RiskScore::UNKNOWN.is_high());
        assert!(RiskScore::HIGH.is_high());
        assert!(RiskScore::VERY_HIGH.is_high());
        assert!(!RiskScore::MEDIUM.is_high());
        assert!(!RiskScore::new(9).is_high());
    }

    #[test]
    fn test_falsy_values_are_present() {
        // Zero, false and "" are real values, not absence.
        let json = r#"{
            "network": {"ip": "", "anonymization": {"vpn_score": 0, "proxy_score": 0, "tor": false, "icloud_private_relay": false}},
            "client": {"automation": {"headless": false}}
        }"#;
        let ri: RiskIntelligenceData = serde_json::from_str(json).unwrap();

        let anon = ri.network.anonymization.unwrap();
        assert_eq!(anon.vpn_score, RiskScore::UNKNOWN);
        assert!(!anon.tor);
        assert!(ri.client.automation.is_some());
        assert!(!ri.client.automation_detected());
        assert!(ri.risk_scores.is_none());
    }

    #[test]
    fn test_automation_detected() {
        let json = r#"{"automation": {"known_bot": {"detected": true, "id": "googlebot", "type": "search"}}}"#;
        let client: ClientData = serde_json::from_str(json).unwrap();
        assert!(client.automation_detected());
        assert_eq!(client.automation.unwrap().known_bot.kind, "search");
    }
}
