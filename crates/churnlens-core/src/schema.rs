//! Canonical feature schema for the churn model.
//!
//! The order of [`Feature::ALL`] is the column order the model was trained
//! on. Nothing else in the workspace is allowed to define column order.

use std::fmt;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;

use crate::encode::FeatureVector;

/// Number of columns the model consumes.
pub const FEATURE_COUNT: usize = 19;

/// One model input column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    SeniorCitizen,
    Partner,
    Dependents,
    TenureMonths,
    PaperlessBilling,
    MonthlyCharges,
    InternetFiberOptic,
    InternetNone,
    OnlineSecurity,
    OnlineBackup,
    DeviceProtection,
    TechSupport,
    StreamingTv,
    StreamingMovies,
    SumOfServices,
    OldCustomer,
    ContractOneYear,
    ContractTwoYear,
    ManualPayment,
}

impl Feature {
    /// All features in training order.
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::SeniorCitizen,
        Feature::Partner,
        Feature::Dependents,
        Feature::TenureMonths,
        Feature::PaperlessBilling,
        Feature::MonthlyCharges,
        Feature::InternetFiberOptic,
        Feature::InternetNone,
        Feature::OnlineSecurity,
        Feature::OnlineBackup,
        Feature::DeviceProtection,
        Feature::TechSupport,
        Feature::StreamingTv,
        Feature::StreamingMovies,
        Feature::SumOfServices,
        Feature::OldCustomer,
        Feature::ContractOneYear,
        Feature::ContractTwoYear,
        Feature::ManualPayment,
    ];

    /// The six add-on services counted by [`Feature::SumOfServices`].
    pub const SERVICES: [Feature; 6] = [
        Feature::OnlineSecurity,
        Feature::OnlineBackup,
        Feature::DeviceProtection,
        Feature::TechSupport,
        Feature::StreamingTv,
        Feature::StreamingMovies,
    ];

    /// Column name as it appeared in the training data.
    pub fn column(self) -> &'static str {
        match self {
            Self::SeniorCitizen => "Senior Citizen",
            Self::Partner => "Partner",
            Self::Dependents => "Dependents",
            Self::TenureMonths => "Tenure Months",
            Self::PaperlessBilling => "Paperless Billing",
            Self::MonthlyCharges => "Monthly Charges",
            Self::InternetFiberOptic => "Internet Service_Fiber optic",
            Self::InternetNone => "Internet Service_No",
            Self::OnlineSecurity => "Online Security_Yes",
            Self::OnlineBackup => "Online Backup_Yes",
            Self::DeviceProtection => "Device Protection_Yes",
            Self::TechSupport => "Tech Support_Yes",
            Self::StreamingTv => "Streaming TV_Yes",
            Self::StreamingMovies => "Streaming Movies_Yes",
            Self::SumOfServices => "Sum_Of_Services",
            Self::OldCustomer => "Tenure Category_Old_Customers",
            Self::ContractOneYear => "Contract_One year",
            Self::ContractTwoYear => "Contract_Two year",
            Self::ManualPayment => "Is Manual Payment",
        }
    }

    /// Position of this feature in the model input.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Look up a feature by its training column name.
    pub fn from_column(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.column() == name)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Arrow schema of a feature row: one non-null `Float64` per column.
pub fn feature_schema() -> Schema {
    Schema::new(
        Feature::ALL
            .iter()
            .map(|f| Field::new(f.column(), DataType::Float64, false))
            .collect::<Vec<_>>(),
    )
}

impl FeatureVector {
    /// A one-row [`RecordBatch`] laid out with [`feature_schema`].
    pub fn to_record_batch(&self) -> Result<RecordBatch, ArrowError> {
        let columns: Vec<ArrayRef> = self
            .as_slice()
            .iter()
            .map(|&v| Arc::new(Float64Array::from(vec![v])) as ArrayRef)
            .collect();
        RecordBatch::try_new(Arc::new(feature_schema()), columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discriminants_follow_training_order() {
        for (i, f) in Feature::ALL.iter().enumerate() {
            assert_eq!(f.index(), i, "{f} out of place");
        }
    }

    #[test]
    fn column_names_are_unique() {
        let mut names: Vec<&str> = Feature::ALL.iter().map(|f| f.column()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), FEATURE_COUNT);
    }

    #[test]
    fn from_column_round_trips_every_feature() {
        for f in Feature::ALL {
            assert_eq!(Feature::from_column(f.column()), Some(f));
        }
        assert_eq!(Feature::from_column("Total Charges"), None);
    }

    #[test]
    fn schema_has_expected_fields() {
        let schema = feature_schema();
        assert_eq!(schema.fields().len(), FEATURE_COUNT);
        assert_eq!(schema.field(0).name(), "Senior Citizen");
        assert_eq!(schema.field(18).name(), "Is Manual Payment");
        assert!(schema.field_with_name("Sum_Of_Services").is_ok());
        assert!(schema.fields().iter().all(|f| !f.is_nullable()));
    }

    #[test]
    fn record_batch_is_single_row() {
        let mut v = FeatureVector::zeros();
        v.set(Feature::MonthlyCharges, 42.5);
        let batch = v.to_record_batch().unwrap();
        assert_eq!(batch.num_rows(), 1);
        assert_eq!(batch.num_columns(), FEATURE_COUNT);

        let col = batch
            .column_by_name("Monthly Charges")
            .unwrap()
            .as_any()
            .downcast_ref::<Float64Array>()
            .unwrap();
        assert_eq!(col.value(0), 42.5);
    }
}
