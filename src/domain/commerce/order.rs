//! Payment order aggregate and its state machine.
//!
//! ```text
//! initiated ──► paid ──► entitled
//!     │          ▲
//!     ▼          │
//!   failed ──────┘   (a later capture on the same order)
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    DomainError, ErrorCode, Money, OrderId, PaymentId, StateMachine, Timestamp, UserId,
};

use super::Product;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Created at the gateway, awaiting payment.
    Initiated,
    /// Payment confirmed, entitlement not yet granted.
    Paid,
    /// Entitlement granted. Final.
    Entitled,
    /// Payment attempt failed.
    Failed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Initiated => "initiated",
            OrderStatus::Paid => "paid",
            OrderStatus::Entitled => "entitled",
            OrderStatus::Failed => "failed",
        }
    }
}

impl StateMachine for OrderStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use OrderStatus::*;
        matches!(
            (self, target),
            (Initiated, Paid) | (Initiated, Failed) | (Failed, Paid) | (Paid, Entitled)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use OrderStatus::*;
        match self {
            Initiated => vec![Paid, Failed],
            Failed => vec![Paid],
            Paid => vec![Entitled],
            Entitled => vec![],
        }
    }
}

/// A gateway order for one product bought by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentOrder {
    pub id: OrderId,
    pub user_id: UserId,
    pub product: Product,
    pub amount: Money,
    pub receipt: String,
    pub status: OrderStatus,
    pub payment_id: Option<PaymentId>,
    pub failure_reason: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PaymentOrder {
    pub fn initiate(
        id: OrderId,
        user_id: UserId,
        product: Product,
        amount: Money,
        receipt: impl Into<String>,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            user_id,
            product,
            amount,
            receipt: receipt.into(),
            status: OrderStatus::Initiated,
            payment_id: None,
            failure_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns Forbidden unless `user_id` placed the order.
    pub fn check_owner(&self, user_id: &UserId) -> Result<(), DomainError> {
        if &self.user_id != user_id {
            return Err(DomainError::forbidden("Order belongs to another user")
                .with_detail("order_id", self.id.to_string()));
        }
        Ok(())
    }

    /// Records the confirmed payment.
    ///
    /// Re-confirming with the same payment id is a no-op, including after
    /// the order has been entitled.
    pub fn mark_paid(&mut self, payment_id: PaymentId) -> Result<(), DomainError> {
        if matches!(self.status, OrderStatus::Paid | OrderStatus::Entitled)
            && self.payment_id.as_ref() == Some(&payment_id)
        {
            return Ok(());
        }
        self.transition(OrderStatus::Paid)?;
        self.payment_id = Some(payment_id);
        self.failure_reason = None;
        Ok(())
    }

    /// Moves a paid order to entitled. No-op when already entitled.
    pub fn mark_entitled(&mut self) -> Result<(), DomainError> {
        if self.status == OrderStatus::Entitled {
            return Ok(());
        }
        self.transition(OrderStatus::Entitled)
    }

    pub fn mark_failed(&mut self, reason: impl Into<String>) -> Result<(), DomainError> {
        self.transition(OrderStatus::Failed)?;
        self.failure_reason = Some(reason.into());
        Ok(())
    }

    pub fn is_entitled(&self) -> bool {
        self.status == OrderStatus::Entitled
    }

    fn transition(&mut self, target: OrderStatus) -> Result<(), DomainError> {
        self.status = self.status.transition_to(target).map_err(|e| {
            DomainError::new(ErrorCode::InvalidStateTransition, e.to_string())
                .with_detail("order_id", self.id.to_string())
        })?;
        self.updated_at = Timestamp::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::CourseId;

    fn order() -> PaymentOrder {
        PaymentOrder::initiate(
            OrderId::new("order_test_1").unwrap(),
            UserId::new("student-1").unwrap(),
            Product::Course(CourseId::new()),
            Money::new(49_900, "INR").unwrap(),
            "rcpt_1",
        )
    }

    fn pay(id: &str) -> PaymentId {
        PaymentId::new(id).unwrap()
    }

    #[test]
    fn happy_path_reaches_entitled() {
        let mut o = order();
        o.mark_paid(pay("pay_1")).unwrap();
        o.mark_entitled().unwrap();
        assert!(o.is_entitled());
        assert!(o.status.is_terminal());
    }

    #[test]
    fn reconfirming_same_payment_is_noop() {
        let mut o = order();
        o.mark_paid(pay("pay_1")).unwrap();
        o.mark_entitled().unwrap();
        assert!(o.mark_paid(pay("pay_1")).is_ok());
        assert!(o.mark_entitled().is_ok());
        assert_eq!(o.status, OrderStatus::Entitled);
    }

    #[test]
    fn different_payment_on_entitled_order_is_rejected() {
        let mut o = order();
        o.mark_paid(pay("pay_1")).unwrap();
        o.mark_entitled().unwrap();
        let err = o.mark_paid(pay("pay_2")).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
    }

    #[test]
    fn initiated_cannot_skip_to_entitled() {
        let mut o = order();
        assert!(o.mark_entitled().is_err());
    }

    #[test]
    fn failed_order_can_still_be_paid() {
        let mut o = order();
        o.mark_failed("card declined").unwrap();
        assert_eq!(o.failure_reason.as_deref(), Some("card declined"));
        o.mark_paid(pay("pay_2")).unwrap();
        assert_eq!(o.status, OrderStatus::Paid);
        assert!(o.failure_reason.is_none());
    }

    #[test]
    fn check_owner_forbids_other_users() {
        let o = order();
        assert!(o.check_owner(&UserId::new("student-1").unwrap()).is_ok());
        let err = o.check_owner(&UserId::new("student-2").unwrap()).unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }
}
