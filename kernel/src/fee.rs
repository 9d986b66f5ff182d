use crate::model::booking::BookingKind;
use crate::model::slot::TimeSlot;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Surcharge applied to training sessions when the coach has no configured
/// hourly rate (or no coach was named): 25% of the facility fee.
const COACH_FEE_FALLBACK_FACTOR: Decimal = dec!(0.25);

/// The monetary outcome of pricing one booking. All components carry two
/// decimal places and are never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeBreakdown {
    pub facility_fee: Decimal,
    pub coach_fee: Decimal,
    pub total: Decimal,
}

/// Prices a slot for one booking kind. Kinds are dispatched through
/// [`policy_for`]; adding a kind means adding a policy there, not editing
/// the existing ones.
pub trait FeePolicy: Send + Sync {
    fn quote(
        &self,
        slot: &TimeSlot,
        facility_rate: Decimal,
        coach_rate: Option<Decimal>,
    ) -> FeeBreakdown;
}

pub fn policy_for(kind: BookingKind) -> &'static dyn FeePolicy {
    match kind {
        BookingKind::FacilityOnly => &FacilityOnlyFee,
        BookingKind::Training => &TrainingFee,
    }
}

pub struct FacilityOnlyFee;

impl FeePolicy for FacilityOnlyFee {
    fn quote(
        &self,
        slot: &TimeSlot,
        facility_rate: Decimal,
        _coach_rate: Option<Decimal>,
    ) -> FeeBreakdown {
        let facility_fee = round_money(hours(slot) * facility_rate);
        FeeBreakdown {
            facility_fee,
            coach_fee: Decimal::ZERO,
            total: facility_fee,
        }
    }
}

pub struct TrainingFee;

impl FeePolicy for TrainingFee {
    fn quote(
        &self,
        slot: &TimeSlot,
        facility_rate: Decimal,
        coach_rate: Option<Decimal>,
    ) -> FeeBreakdown {
        let facility_fee = round_money(hours(slot) * facility_rate);
        let coach_fee = match coach_rate {
            Some(rate) => round_money(hours(slot) * rate),
            None => round_money(facility_fee * COACH_FEE_FALLBACK_FACTOR),
        };
        FeeBreakdown {
            facility_fee,
            coach_fee,
            total: round_money(facility_fee + coach_fee),
        }
    }
}

fn hours(slot: &TimeSlot) -> Decimal {
    Decimal::from(slot.duration_minutes()) / dec!(60)
}

/// Two decimal places, half-up on the cent. Fees are floored at zero so a
/// misconfigured negative rate cannot produce a credit.
fn round_money(amount: Decimal) -> Decimal {
    amount
        .max(Decimal::ZERO)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
