//! Raw payment state → canonical status

use crate::record::PaymentRecord;
use crate::status::PaymentStatus;

/// Collapse a server payment object into a [`PaymentStatus`]
///
/// Rules, first match wins:
/// 1. a payment date or `is_paid == true` means `Paid`
/// 2. raw `processing` displays as `Paid`
/// 3. the parsed raw status, `Pending` when absent or unrecognized
///
/// Rule 2 shows a settling payment as paid to the student, even though it may
/// still fail.
#[must_use]
pub fn normalize(payment: &PaymentRecord) -> PaymentStatus {
    if payment.payment_date.is_some() || payment.is_paid == Some(true) {
        return PaymentStatus::Paid;
    }

    let Some(raw) = payment.status.as_deref() else {
        return PaymentStatus::Pending;
    };

    match raw.parse::<PaymentStatus>() {
        Ok(PaymentStatus::Processing) => PaymentStatus::Paid,
        Ok(status) => status,
        Err(e) => {
            tracing::debug!("Treating payment as pending: {}", e);
            PaymentStatus::Pending
        }
    }
}
