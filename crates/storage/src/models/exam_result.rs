use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Decimal places of the `exam_results.value` column.
pub const VALUE_SCALE: u32 = 2;

/// Largest magnitude `NUMERIC(10, 2)` holds: 99 999 999.99.
pub const MAX_VALUE: Decimal = Decimal::from_parts(0x540B_E3FF, 2, 0, false, VALUE_SCALE);

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ExamResult {
    pub result_id: Uuid,
    pub exam_participant_id: Uuid,
    pub discipline_id: Uuid,
    pub value: Option<Decimal>,
    pub points: i32,
    pub level: String,
    pub updated_at: chrono::NaiveDateTime,
}

/// A measured value as the result column will store it, or `None` when it
/// does not fit. Rounds half away from zero like Postgres `NUMERIC`.
pub fn storable_value(value: Decimal) -> Option<Decimal> {
    let rounded = value.round_dp_with_strategy(VALUE_SCALE, RoundingStrategy::MidpointAwayFromZero);
    (rounded.abs() <= MAX_VALUE).then_some(rounded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_max_value_matches_column() {
        assert_eq!(MAX_VALUE, dec("99999999.99"));
    }

    #[test]
    fn test_storable_value_rounds_like_postgres() {
        assert_eq!(storable_value(dec("9.004")), Some(dec("9.00")));
        assert_eq!(storable_value(dec("9.005")), Some(dec("9.01")));
        assert_eq!(storable_value(dec("9.015")), Some(dec("9.02")));
        assert_eq!(storable_value(dec("12.5")), Some(dec("12.5")));
    }

    #[test]
    fn test_storable_value_rejects_overflow() {
        assert_eq!(storable_value(dec("99999999.994")), Some(MAX_VALUE));
        assert_eq!(storable_value(dec("99999999.995")), None);
        assert_eq!(storable_value(dec("100000000")), None);
        assert_eq!(storable_value(dec("-100000000")), None);
    }
}
