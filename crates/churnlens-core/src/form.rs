//! Raw customer form and its validated, typed counterpart.
//!
//! [`CustomerForm`] mirrors the HTML form one-to-one: every field is optional
//! and absent fields deserialize to `None`. [`CustomerForm::validate`] is the
//! single place where raw strings become numbers and enums.

use std::fmt;

use serde::Deserialize;
use tracing::debug;

use crate::error::ValidationError;

/// Form field names as submitted by the browser.
pub mod fields {
    pub const MONTHLY_CHARGES: &str = "monthly_charges";
    pub const TOTAL_CHARGES: &str = "total_charges";
    pub const TENURE: &str = "tenure";
    pub const CONTRACT_TYPE: &str = "contract_type";
    pub const PAYMENT_METHOD: &str = "payment_method";
    pub const INTERNET_SERVICE: &str = "internet_service";
    pub const SENIOR_CITIZEN: &str = "senior_citizen";
    pub const PARTNER: &str = "partner";
    pub const DEPENDENTS: &str = "dependents";
    pub const PAPERLESS_BILLING: &str = "paperless_billing";
    pub const ONLINE_SECURITY: &str = "online_security";
    pub const ONLINE_BACKUP: &str = "online_backup";
    pub const DEVICE_PROTECTION: &str = "device_protection";
    pub const TECH_SUPPORT: &str = "tech_support";
    pub const STREAMING_TV: &str = "streaming_tv";
    pub const STREAMING_MOVIES: &str = "streaming_movies";
}

/// Payment methods offered on the form.
pub const PAYMENT_METHODS: &[&str] = &[
    "Electronic check",
    "Mailed check",
    "Bank transfer (automatic)",
    "Credit card (automatic)",
];

/// Payment methods that require the customer to act each billing cycle.
pub const MANUAL_PAYMENT_METHODS: &[&str] = &["Electronic check", "Mailed check"];

/// The only toggle value that counts as "on".
const YES: &str = "Yes";

/// A form submission exactly as received.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CustomerForm {
    pub monthly_charges: Option<String>,
    pub total_charges: Option<String>,
    pub tenure: Option<String>,
    pub contract_type: Option<String>,
    pub payment_method: Option<String>,
    pub internet_service: Option<String>,
    pub senior_citizen: Option<String>,
    pub partner: Option<String>,
    pub dependents: Option<String>,
    pub paperless_billing: Option<String>,
    pub online_security: Option<String>,
    pub online_backup: Option<String>,
    pub device_protection: Option<String>,
    pub tech_support: Option<String>,
    pub streaming_tv: Option<String>,
    pub streaming_movies: Option<String>,
}

impl CustomerForm {
    /// Build a form from `name -> value` pairs. Unrecognised names are ignored;
    /// a repeated name keeps its first value.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut form = Self::default();
        for (key, value) in pairs {
            let key = key.as_ref();
            match form.slot_mut(key) {
                Some(slot) if slot.is_none() => *slot = Some(value.into()),
                Some(_) => debug!(field = key, "ignoring repeated form field"),
                None => debug!(field = key, "ignoring unknown form field"),
            }
        }
        form
    }

    fn slot_mut(&mut self, name: &str) -> Option<&mut Option<String>> {
        use fields::*;
        let slot = match name {
            MONTHLY_CHARGES => &mut self.monthly_charges,
            TOTAL_CHARGES => &mut self.total_charges,
            TENURE => &mut self.tenure,
            CONTRACT_TYPE => &mut self.contract_type,
            PAYMENT_METHOD => &mut self.payment_method,
            INTERNET_SERVICE => &mut self.internet_service,
            SENIOR_CITIZEN => &mut self.senior_citizen,
            PARTNER => &mut self.partner,
            DEPENDENTS => &mut self.dependents,
            PAPERLESS_BILLING => &mut self.paperless_billing,
            ONLINE_SECURITY => &mut self.online_security,
            ONLINE_BACKUP => &mut self.online_backup,
            DEVICE_PROTECTION => &mut self.device_protection,
            TECH_SUPPORT => &mut self.tech_support,
            STREAMING_TV => &mut self.streaming_tv,
            STREAMING_MOVIES => &mut self.streaming_movies,
            _ => return None,
        };
        Some(slot)
    }

    /// Check every field and produce a typed profile.
    ///
    /// Yes/No toggles never fail: anything other than the literal `"Yes"`,
    /// including an absent field, reads as "No".
    pub fn validate(&self) -> Result<CustomerProfile, ValidationError> {
        use fields::*;

        let monthly_charges = parse_amount(MONTHLY_CHARGES, &self.monthly_charges)?;
        let total_charges = parse_amount(TOTAL_CHARGES, &self.total_charges)?;
        let tenure = parse_tenure(&self.tenure)?;

        let contract_raw = required(CONTRACT_TYPE, &self.contract_type)?;
        let contract =
            Contract::from_label(contract_raw).ok_or_else(|| ValidationError::UnknownCategory {
                field: CONTRACT_TYPE,
                value: contract_raw.to_string(),
            })?;

        let internet_raw = required(INTERNET_SERVICE, &self.internet_service)?;
        let internet_service = InternetService::from_label(internet_raw).ok_or_else(|| {
            ValidationError::UnknownCategory {
                field: INTERNET_SERVICE,
                value: internet_raw.to_string(),
            }
        })?;

        let payment_method = required(PAYMENT_METHOD, &self.payment_method)?.to_string();

        Ok(CustomerProfile {
            monthly_charges,
            total_charges,
            tenure,
            contract,
            payment_method,
            internet_service,
            household: Household {
                senior_citizen: is_yes(&self.senior_citizen),
                partner: is_yes(&self.partner),
                dependents: is_yes(&self.dependents),
            },
            paperless_billing: is_yes(&self.paperless_billing),
            services: Services {
                online_security: is_yes(&self.online_security),
                online_backup: is_yes(&self.online_backup),
                device_protection: is_yes(&self.device_protection),
                tech_support: is_yes(&self.tech_support),
                streaming_tv: is_yes(&self.streaming_tv),
                streaming_movies: is_yes(&self.streaming_movies),
            },
        })
    }
}

fn is_yes(value: &Option<String>) -> bool {
    value.as_deref() == Some(YES)
}

/// The submitted value, untouched. Blank counts as missing.
fn required<'a>(field: &'static str, value: &'a Option<String>) -> Result<&'a str, ValidationError> {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ValidationError::Missing { field }),
    }
}

fn parse_amount(field: &'static str, value: &Option<String>) -> Result<f64, ValidationError> {
    let raw = required(field, value)?.trim();
    let amount: f64 = raw.parse().map_err(|_| ValidationError::InvalidNumber {
        field,
        value: raw.to_string(),
    })?;
    if !amount.is_finite() || amount < 0.0 {
        return Err(ValidationError::OutOfRange {
            field,
            value: raw.to_string(),
        });
    }
    Ok(amount)
}

fn parse_tenure(value: &Option<String>) -> Result<u32, ValidationError> {
    let field = fields::TENURE;
    let raw = required(field, value)?.trim();
    let months: i64 = raw.parse().map_err(|_| ValidationError::InvalidNumber {
        field,
        value: raw.to_string(),
    })?;
    u32::try_from(months).map_err(|_| ValidationError::OutOfRange {
        field,
        value: raw.to_string(),
    })
}

/// Contract term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contract {
    MonthToMonth,
    OneYear,
    TwoYear,
}

impl Contract {
    pub const ALL: [Contract; 3] = [Self::MonthToMonth, Self::OneYear, Self::TwoYear];

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == label)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MonthToMonth => "Month-to-month",
            Self::OneYear => "One year",
            Self::TwoYear => "Two year",
        }
    }
}

impl fmt::Display for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Internet access product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InternetService {
    Dsl,
    FiberOptic,
    No,
}

impl InternetService {
    pub const ALL: [InternetService; 3] = [Self::Dsl, Self::FiberOptic, Self::No];

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == label)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dsl => "DSL",
            Self::FiberOptic => "Fiber optic",
            Self::No => "No",
        }
    }
}

impl fmt::Display for InternetService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a payment method counts as manual.
pub fn is_manual_payment(method: &str) -> bool {
    MANUAL_PAYMENT_METHODS.contains(&method)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Household {
    pub senior_citizen: bool,
    pub partner: bool,
    pub dependents: bool,
}

/// Add-on services. These, and only these, feed `Sum_Of_Services`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Services {
    pub online_security: bool,
    pub online_backup: bool,
    pub device_protection: bool,
    pub tech_support: bool,
    pub streaming_tv: bool,
    pub streaming_movies: bool,
}

impl Services {
    /// Number of subscribed add-on services (0..=6).
    pub fn count(&self) -> u32 {
        [
            self.online_security,
            self.online_backup,
            self.device_protection,
            self.tech_support,
            self.streaming_tv,
            self.streaming_movies,
        ]
        .into_iter()
        .filter(|&on| on)
        .count() as u32
    }
}

/// A validated customer.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerProfile {
    pub monthly_charges: f64,
    /// Echoed back to the user; not a model input.
    pub total_charges: f64,
    pub tenure: u32,
    pub contract: Contract,
    pub payment_method: String,
    pub internet_service: InternetService,
    pub household: Household,
    pub paperless_billing: bool,
    pub services: Services,
}
