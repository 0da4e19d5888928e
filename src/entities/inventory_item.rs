use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Derived stock status, recomputed on every quantity write.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum InventoryStatus {
    #[sea_orm(string_value = "in_stock")]
    InStock,
    #[sea_orm(string_value = "low_stock")]
    LowStock,
    #[sea_orm(string_value = "out_of_stock")]
    OutOfStock,
}

impl InventoryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InStock => "in_stock",
            Self::LowStock => "low_stock",
            Self::OutOfStock => "out_of_stock",
        }
    }

    /// Status derivation: zero stock is out_of_stock, at-or-below the
    /// minimum threshold is low_stock, everything else is in_stock.
    pub fn from_quantity(current: Decimal, minimum: Decimal) -> Self {
        if current <= Decimal::ZERO {
            Self::OutOfStock
        } else if current <= minimum {
            Self::LowStock
        } else {
            Self::InStock
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub name: String,
    pub category: String,
    pub unit: String,
    pub current_quantity: Decimal,
    pub minimum_threshold: Decimal,
    pub maximum_threshold: Decimal,
    pub cost_per_unit: Decimal,
    pub supplier_id: Option<Uuid>,
    pub last_restocked: Option<DateTime<Utc>>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub status: InventoryStatus,
    // Forecast columns, written only by the forecasting service.
    pub predicted_demand_per_week: Option<Decimal>,
    pub forecast_confidence: Option<f64>,
    pub reorder_date: Option<DateTime<Utc>>,
    pub forecast_generated_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub last_updated: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::entities::restaurant::Entity",
        from = "Column::RestaurantId",
        to = "crate::entities::restaurant::Column::Id"
    )]
    Restaurant,
    #[sea_orm(
        belongs_to = "crate::entities::supplier::Entity",
        from = "Column::SupplierId",
        to = "crate::entities::supplier::Column::Id"
    )]
    Supplier,
}

impl Related<crate::entities::restaurant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Restaurant.def()
    }
}

impl Related<crate::entities::supplier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Supplier.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn status_derivation_covers_all_bands() {
        assert_eq!(
            InventoryStatus::from_quantity(dec!(0), dec!(5)),
            InventoryStatus::OutOfStock
        );
        assert_eq!(
            InventoryStatus::from_quantity(dec!(5), dec!(5)),
            InventoryStatus::LowStock
        );
        assert_eq!(
            InventoryStatus::from_quantity(dec!(5.01), dec!(5)),
            InventoryStatus::InStock
        );
    }
}
