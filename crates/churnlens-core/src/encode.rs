//! Feature encoding: validated customer → model input row.

use crate::error::ValidationError;
use crate::form::{Contract, CustomerForm, CustomerProfile, InternetService, is_manual_payment};
use crate::schema::{FEATURE_COUNT, Feature};

/// Tenure (in months) from which a customer counts as an old customer.
pub const OLD_CUSTOMER_MONTHS: u32 = 12;

/// One model input row, always [`FEATURE_COUNT`] values in training order.
///
/// Slots start at zero, so any feature an encoder does not set is 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn zeros() -> Self {
        Self([0.0; FEATURE_COUNT])
    }

    pub fn get(&self, feature: Feature) -> f64 {
        self.0[feature.index()]
    }

    pub fn set(&mut self, feature: Feature, value: f64) {
        self.0[feature.index()] = value;
    }

    fn flag(&mut self, feature: Feature, on: bool) {
        self.set(feature, if on { 1.0 } else { 0.0 });
    }

    /// Value of a column by its training name.
    pub fn by_column(&self, column: &str) -> Option<f64> {
        Feature::from_column(column).map(|f| self.get(f))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// `(column, value)` pairs in training order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        Feature::ALL.iter().map(|f| (f.column(), self.get(*f)))
    }

    /// Single-precision copy for runtimes that take `f32` input.
    pub fn to_f32(&self) -> Vec<f32> {
        self.0.iter().map(|&v| v as f32).collect()
    }
}

impl From<&CustomerProfile> for FeatureVector {
    fn from(p: &CustomerProfile) -> Self {
        let mut v = Self::zeros();

        v.set(Feature::MonthlyCharges, p.monthly_charges);
        v.set(Feature::TenureMonths, f64::from(p.tenure));
        v.flag(Feature::OldCustomer, p.tenure >= OLD_CUSTOMER_MONTHS);

        // Month-to-month is the dropped reference level.
        v.flag(Feature::ContractOneYear, p.contract == Contract::OneYear);
        v.flag(Feature::ContractTwoYear, p.contract == Contract::TwoYear);

        v.flag(Feature::ManualPayment, is_manual_payment(&p.payment_method));

        // DSL is the dropped reference level.
        v.flag(
            Feature::InternetFiberOptic,
            p.internet_service == InternetService::FiberOptic,
        );
        v.flag(Feature::InternetNone, p.internet_service == InternetService::No);

        v.flag(Feature::SeniorCitizen, p.household.senior_citizen);
        v.flag(Feature::Partner, p.household.partner);
        v.flag(Feature::Dependents, p.household.dependents);
        v.flag(Feature::PaperlessBilling, p.paperless_billing);

        let s = &p.services;
        v.flag(Feature::OnlineSecurity, s.online_security);
        v.flag(Feature::OnlineBackup, s.online_backup);
        v.flag(Feature::DeviceProtection, s.device_protection);
        v.flag(Feature::TechSupport, s.tech_support);
        v.flag(Feature::StreamingTv, s.streaming_tv);
        v.flag(Feature::StreamingMovies, s.streaming_movies);
        v.set(Feature::SumOfServices, f64::from(s.count()));

        v
    }
}

/// Validate a form and encode it.
pub fn encode_form(form: &CustomerForm) -> Result<FeatureVector, ValidationError> {
    let profile = form.validate()?;
    Ok(FeatureVector::from(&profile))
}

/// Encode raw `field -> value` inputs straight into a model row.
pub fn encode<I, K, V>(raw_inputs: I) -> Result<FeatureVector, ValidationError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    encode_form(&CustomerForm::from_pairs(raw_inputs))
}
