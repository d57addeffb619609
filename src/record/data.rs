//! Disconnection record structures matching the churn extract format

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Service line type of a single disconnection order line
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceLineType {
    /// Copper access bearer removal (AB-CAB)
    InfraCopper,
    /// Fiber access bearer removal (AB-FTTH)
    InfraFiber,
    /// PEO TV delivered over copper (E-IPTV COPPER)
    ServiceCopper,
    /// PEO TV delivered over fiber (E-IPTV FTTH)
    ServiceFiber,
    /// Any other order line type, carried through untouched
    Other(String),
}

impl ServiceLineType {
    /// Map a raw ORDER_LINE_OSS_SERVICE_TYPE value to a service line type
    pub fn from_source(raw: &str) -> Self {
        match raw.trim() {
            "AB-CAB" => ServiceLineType::InfraCopper,
            "AB-FTTH" => ServiceLineType::InfraFiber,
            "E-IPTV COPPER" => ServiceLineType::ServiceCopper,
            "E-IPTV FTTH" => ServiceLineType::ServiceFiber,
            other => ServiceLineType::Other(other.to_string()),
        }
    }

    /// Get the string representation used in the source extract
    pub fn as_str(&self) -> &str {
        match self {
            ServiceLineType::InfraCopper => "AB-CAB",
            ServiceLineType::InfraFiber => "AB-FTTH",
            ServiceLineType::ServiceCopper => "E-IPTV COPPER",
            ServiceLineType::ServiceFiber => "E-IPTV FTTH",
            ServiceLineType::Other(raw) => raw,
        }
    }

    /// TV service removal of either medium
    pub fn is_service(&self) -> bool {
        matches!(self, ServiceLineType::ServiceCopper | ServiceLineType::ServiceFiber)
    }
}

/// Reason the line was deleted, normalized from the Deleted_method column
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChurnReason {
    CustomerRequested,
    PromotionUpgrade,
    PromotionDowngrade,
    NonPayment,
    Other(String),
}

impl ChurnReason {
    pub fn from_source(raw: &str) -> Self {
        match raw.trim() {
            "Customer Requested" => ChurnReason::CustomerRequested,
            "Promotion Upgrade" => ChurnReason::PromotionUpgrade,
            "Promotion Downgrade" => ChurnReason::PromotionDowngrade,
            "Non Payment" => ChurnReason::NonPayment,
            other => ChurnReason::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ChurnReason::CustomerRequested => "Customer Requested",
            ChurnReason::PromotionUpgrade => "Promotion Upgrade",
            ChurnReason::PromotionDowngrade => "Promotion Downgrade",
            ChurnReason::NonPayment => "Non Payment",
            ChurnReason::Other(raw) => raw,
        }
    }

    /// Reason class this reason rolls up into, if any
    pub fn class(&self) -> Option<ReasonClass> {
        match self {
            ChurnReason::CustomerRequested
            | ChurnReason::PromotionUpgrade
            | ChurnReason::PromotionDowngrade => Some(ReasonClass::CustomerRequested),
            ChurnReason::NonPayment => Some(ReasonClass::NonPayment),
            ChurnReason::Other(_) => None,
        }
    }
}

/// Reason vocabulary exposed to report filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReasonClass {
    /// Customer requested, including promotion-driven upgrades and downgrades
    CustomerRequested,
    /// Non payment
    NonPayment,
}

impl ReasonClass {
    /// Parse a filter label; `None` for labels outside the vocabulary
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "Customer Requested" => Some(ReasonClass::CustomerRequested),
            "Non Payment" => Some(ReasonClass::NonPayment),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReasonClass::CustomerRequested => "Customer Requested",
            ReasonClass::NonPayment => "Non Payment",
        }
    }
}

/// A single disconnection order line from the churn extract
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisconnectionRecord {
    /// Billing account number (shared by every line of the account)
    pub account_id: String,

    /// Date the line was terminated (None when the source date was unparseable)
    pub churn_date: Option<NaiveDate>,

    /// Date the line was originally activated
    pub activated_date: Option<NaiveDate>,

    pub service_line_type: ServiceLineType,

    /// Region area code, e.g. "RTO - GL"
    pub region_area: String,

    pub churn_reason: ChurnReason,

    /// Customer type, reporting only
    #[serde(default)]
    pub customer_segment: String,

    /// BSS tariff name, reporting only
    #[serde(default)]
    pub tariff_name: String,
}

impl DisconnectionRecord {
    /// Create a record with the fields used by classification
    pub fn new(
        account_id: impl Into<String>,
        churn_date: Option<NaiveDate>,
        activated_date: Option<NaiveDate>,
        service_line_type: ServiceLineType,
        region_area: impl Into<String>,
        churn_reason: ChurnReason,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            churn_date,
            activated_date,
            service_line_type,
            region_area: region_area.into(),
            churn_reason,
            customer_segment: String::new(),
            tariff_name: String::new(),
        }
    }

    pub fn churn_year(&self) -> Option<i32> {
        self.churn_date.map(|d| d.year())
    }

    pub fn churn_month(&self) -> Option<u32> {
        self.churn_date.map(|d| d.month())
    }

    pub fn churn_day(&self) -> Option<u32> {
        self.churn_date.map(|d| d.day())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_line_type_mapping() {
        assert_eq!(ServiceLineType::from_source("AB-CAB"), ServiceLineType::InfraCopper);
        assert_eq!(ServiceLineType::from_source("AB-FTTH"), ServiceLineType::InfraFiber);
        assert_eq!(ServiceLineType::from_source(" E-IPTV COPPER "), ServiceLineType::ServiceCopper);
        assert_eq!(ServiceLineType::from_source("E-IPTV FTTH"), ServiceLineType::ServiceFiber);

        let other = ServiceLineType::from_source("V-VOICE COPPER");
        assert_eq!(other, ServiceLineType::Other("V-VOICE COPPER".to_string()));
        assert_eq!(other.as_str(), "V-VOICE COPPER");
        assert!(!other.is_service());
    }

    #[test]
    fn test_reason_classes() {
        assert_eq!(ChurnReason::from_source("Promotion Upgrade").class(), Some(ReasonClass::CustomerRequested));
        assert_eq!(ChurnReason::from_source("Promotion Downgrade").class(), Some(ReasonClass::CustomerRequested));
        assert_eq!(ChurnReason::from_source("Customer Requested").class(), Some(ReasonClass::CustomerRequested));
        assert_eq!(ChurnReason::from_source("Non Payment").class(), Some(ReasonClass::NonPayment));
        assert_eq!(ChurnReason::from_source("Fault").class(), None);

        assert_eq!(ReasonClass::from_label("Non Payment"), Some(ReasonClass::NonPayment));
        assert_eq!(ReasonClass::from_label("Promotion Upgrade"), None);
    }

    #[test]
    fn test_churn_date_fields() {
        let record = DisconnectionRecord::new(
            "0040122054",
            NaiveDate::from_ymd_opt(2024, 4, 1),
            NaiveDate::from_ymd_opt(2018, 8, 1),
            ServiceLineType::ServiceCopper,
            "RTO - GL",
            ChurnReason::NonPayment,
        );
        assert_eq!(record.churn_year(), Some(2024));
        assert_eq!(record.churn_month(), Some(4));
        assert_eq!(record.churn_day(), Some(1));
    }
}
