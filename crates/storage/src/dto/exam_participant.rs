use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{Category, Level, MAX_VALUE, Medal, storable_value};

/// Rollup of an exam participant as shown on every display surface
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub exam_participant_id: Uuid,
    pub total: i32,
    pub medal: Medal,
    pub filled_categories: usize,
    pub has_swimming: bool,
    /// Discipline name or free-text source of the proof counted for this exam
    pub provenance_label: Option<String>,
    pub expiry_year: Option<i32>,
    pub categories: Vec<CategoryScore>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScore {
    pub category: Category,
    pub discipline_id: Option<Uuid>,
    pub discipline_name: Option<String>,
    pub value: Option<Decimal>,
    pub points: i32,
    pub level: Level,
}

/// Payload returned by every result and proof mutation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResultResponse {
    /// Points of the discipline touched by the mutation
    pub points: i32,
    pub level: Level,
    #[serde(flatten)]
    pub summary: SummaryResponse,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct EnrollRequest {
    pub participant_id: Uuid,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ChangeDisciplineRequest {
    /// `null` removes the category's current discipline
    pub discipline_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SetResultRequest {
    /// Measured value in the discipline's unit; `null` clears the input
    #[validate(custom(function = "validate_result_value"))]
    pub value: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AddProofRequest {
    pub discipline_id: Uuid,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ManualProofRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Source must be between 1 and 255 characters"
    ))]
    pub source: String,

    /// Defaults to today
    pub confirmed_at: Option<NaiveDate>,
}

/// Values must fit the result column once rounded to its precision
pub(crate) fn validate_result_value(value: &Decimal) -> Result<(), validator::ValidationError> {
    if storable_value(*value).is_some() {
        Ok(())
    } else {
        let mut error = validator::ValidationError::new("value_out_of_range");
        error.message = Some(format!("Value must not exceed {MAX_VALUE}").into());
        Err(error)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecomputeResponse {
    pub recomputed_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(value: &str) -> SetResultRequest {
        SetResultRequest {
            value: Some(value.parse().unwrap()),
        }
    }

    #[test]
    fn test_result_value_must_fit_column() {
        assert!(request("12.5").validate().is_ok());
        assert!(request("9.004").validate().is_ok());
        assert!(request("99999999.99").validate().is_ok());
        assert!(request("100000000").validate().is_err());
        assert!(SetResultRequest { value: None }.validate().is_ok());
    }
}
