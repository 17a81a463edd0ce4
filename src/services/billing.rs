//! Cálculo de duración y tarifa del parqueo
//!
//! La duración se trunca a minutos completos y se cobra por hora iniciada:
//! 0 minutos no se cobran, de 1 a 60 minutos es una hora, 61 son dos.

use chrono::{DateTime, FixedOffset};

use crate::utils::errors::{validation_error, LedgerError};

/// Minutos completos entre entrada y salida, nunca negativos
pub fn parking_duration_minutes(in_time: &DateTime<FixedOffset>, out_time: &DateTime<FixedOffset>) -> i64 {
    out_time.signed_duration_since(*in_time).num_minutes().max(0)
}

/// Horas facturadas: techo de minutos / 60
pub fn billed_hours(duration_minutes: i64) -> i64 {
    (duration_minutes.max(0) + 59) / 60
}

/// Resumen del cobro de una salida
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParkingCharge {
    pub duration_minutes: i64,
    pub hours_billed: i64,
    pub fee: i64,
}

impl ParkingCharge {
    /// Calcular el cobro; falla si la tarifa total no cabe en un `i64`
    pub fn compute(
        in_time: &DateTime<FixedOffset>,
        out_time: &DateTime<FixedOffset>,
        rate_per_hour: i64,
    ) -> Result<Self, LedgerError> {
        let duration_minutes = parking_duration_minutes(in_time, out_time);
        let hours_billed = billed_hours(duration_minutes);
        let fee = hours_billed
            .checked_mul(rate_per_hour)
            .ok_or_else(|| validation_error("La tarifa calculada excede el máximo representable"))?;

        Ok(Self {
            duration_minutes,
            hours_billed,
            fee,
        })
    }
}
