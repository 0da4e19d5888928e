use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Purchase order lifecycle.
///
/// draft → ai_generated → sent → confirmed → delivered (terminal);
/// cancelled is reachable from any non-terminal state.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum PurchaseOrderStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "ai_generated")]
    AiGenerated,
    #[sea_orm(string_value = "sent")]
    Sent,
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    #[sea_orm(string_value = "delivered")]
    Delivered,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl PurchaseOrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::AiGenerated => "ai_generated",
            Self::Sent => "sent",
            Self::Confirmed => "confirmed",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Whether the state machine permits moving from `self` to `next`.
    pub fn can_transition_to(&self, next: PurchaseOrderStatus) -> bool {
        use PurchaseOrderStatus::*;
        if *self == next {
            return false;
        }
        match (self, next) {
            (_, Cancelled) => !self.is_terminal(),
            (Draft, AiGenerated) | (Draft, Sent) => true,
            (AiGenerated, Sent) => true,
            (Sent, Confirmed) => true,
            (Confirmed, Delivered) => true,
            _ => false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchase_orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub supplier_id: Uuid,
    #[sea_orm(unique)]
    pub order_number: String,
    pub status: PurchaseOrderStatus,
    pub total_amount: Decimal,
    pub ai_generated: bool,
    pub ai_reasoning: Option<String>,
    pub expected_delivery: DateTime<Utc>,
    pub actual_delivery: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::entities::supplier::Entity",
        from = "Column::SupplierId",
        to = "crate::entities::supplier::Column::Id"
    )]
    Supplier,
    #[sea_orm(has_many = "crate::entities::purchase_order_item::Entity")]
    Items,
}

impl Related<crate::entities::supplier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Supplier.def()
    }
}

impl Related<crate::entities::purchase_order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::PurchaseOrderStatus::*;

    #[test]
    fn happy_path_transitions_are_permitted() {
        assert!(Draft.can_transition_to(AiGenerated));
        assert!(AiGenerated.can_transition_to(Sent));
        assert!(Sent.can_transition_to(Confirmed));
        assert!(Confirmed.can_transition_to(Delivered));
    }

    #[test]
    fn cancellation_allowed_from_non_terminal_states_only() {
        assert!(Draft.can_transition_to(Cancelled));
        assert!(Sent.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Cancelled));
        assert!(!Delivered.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Cancelled));
    }

    #[test]
    fn backwards_and_skipping_transitions_are_rejected() {
        assert!(!Sent.can_transition_to(Draft));
        assert!(!Draft.can_transition_to(Confirmed));
        assert!(!Draft.can_transition_to(Delivered));
        assert!(!Delivered.can_transition_to(Sent));
        assert!(!Cancelled.can_transition_to(Sent));
    }
}
