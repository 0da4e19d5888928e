use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_restaurants_table::Migration),
            Box::new(m20250101_000002_create_suppliers_table::Migration),
            Box::new(m20250101_000003_create_inventory_items_table::Migration),
            Box::new(m20250101_000004_create_purchase_order_tables::Migration),
            Box::new(m20250101_000005_create_customers_table::Migration),
            Box::new(m20250101_000006_create_order_tables::Migration),
            Box::new(m20250101_000007_create_staffing_tables::Migration),
            Box::new(m20250101_000008_create_marketing_campaigns_table::Migration),
        ]
    }
}

// Migration implementations

mod m20250101_000001_create_restaurants_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000001_create_restaurants_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Restaurants::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Restaurants::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Restaurants::Name).string().not_null())
                        .col(ColumnDef::new(Restaurants::Address).string().not_null())
                        .col(ColumnDef::new(Restaurants::Phone).string().not_null())
                        .col(ColumnDef::new(Restaurants::Email).string().not_null())
                        .col(ColumnDef::new(Restaurants::Timezone).string().not_null())
                        .col(ColumnDef::new(Restaurants::Currency).string().not_null())
                        .col(
                            ColumnDef::new(Restaurants::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Restaurants::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Restaurants::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum Restaurants {
        Table,
        Id,
        Name,
        Address,
        Phone,
        Email,
        Timezone,
        Currency,
        IsActive,
        CreatedAt,
    }
}

mod m20250101_000002_create_suppliers_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000002_create_suppliers_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Suppliers::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Suppliers::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Suppliers::RestaurantId).uuid().not_null())
                        .col(ColumnDef::new(Suppliers::Name).string().not_null())
                        .col(ColumnDef::new(Suppliers::ContactPerson).string().not_null())
                        .col(ColumnDef::new(Suppliers::Phone).string().not_null())
                        .col(ColumnDef::new(Suppliers::Email).string().not_null())
                        .col(ColumnDef::new(Suppliers::Address).string().not_null())
                        .col(
                            ColumnDef::new(Suppliers::Rating)
                                .double()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Suppliers::PaymentTerms).string().not_null())
                        .col(ColumnDef::new(Suppliers::Categories).json().not_null())
                        .col(
                            ColumnDef::new(Suppliers::OnTimeDelivery)
                                .double()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Suppliers::QualityRating)
                                .double()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Suppliers::ResponseTimeHours)
                                .double()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Suppliers::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Suppliers::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_suppliers_restaurant_id")
                        .table(Suppliers::Table)
                        .col(Suppliers::RestaurantId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Suppliers::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum Suppliers {
        Table,
        Id,
        RestaurantId,
        Name,
        ContactPerson,
        Phone,
        Email,
        Address,
        Rating,
        PaymentTerms,
        Categories,
        OnTimeDelivery,
        QualityRating,
        ResponseTimeHours,
        IsActive,
        CreatedAt,
    }
}

mod m20250101_000003_create_inventory_items_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000003_create_inventory_items_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(InventoryItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(InventoryItems::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::RestaurantId)
                                .uuid()
                                .not_null(),
                        )
                        .col(ColumnDef::new(InventoryItems::Name).string().not_null())
                        .col(ColumnDef::new(InventoryItems::Category).string().not_null())
                        .col(ColumnDef::new(InventoryItems::Unit).string().not_null())
                        .col(
                            ColumnDef::new(InventoryItems::CurrentQuantity)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::MinimumThreshold)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::MaximumThreshold)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::CostPerUnit)
                                .decimal()
                                .not_null(),
                        )
                        .col(ColumnDef::new(InventoryItems::SupplierId).uuid().null())
                        .col(
                            ColumnDef::new(InventoryItems::LastRestocked)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::ExpiryDate)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(ColumnDef::new(InventoryItems::Status).string().not_null())
                        .col(
                            ColumnDef::new(InventoryItems::PredictedDemandPerWeek)
                                .decimal()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::ForecastConfidence)
                                .double()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::ReorderDate)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::ForecastGeneratedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::LastUpdated)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_inventory_items_restaurant_id")
                        .table(InventoryItems::Table)
                        .col(InventoryItems::RestaurantId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_inventory_items_restaurant_category")
                        .table(InventoryItems::Table)
                        .col(InventoryItems::RestaurantId)
                        .col(InventoryItems::Category)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_inventory_items_restaurant_status")
                        .table(InventoryItems::Table)
                        .col(InventoryItems::RestaurantId)
                        .col(InventoryItems::Status)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_inventory_items_supplier_id")
                        .table(InventoryItems::Table)
                        .col(InventoryItems::SupplierId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(InventoryItems::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum InventoryItems {
        Table,
        Id,
        RestaurantId,
        Name,
        Category,
        Unit,
        CurrentQuantity,
        MinimumThreshold,
        MaximumThreshold,
        CostPerUnit,
        SupplierId,
        LastRestocked,
        ExpiryDate,
        Status,
        PredictedDemandPerWeek,
        ForecastConfidence,
        ReorderDate,
        ForecastGeneratedAt,
        IsActive,
        LastUpdated,
        CreatedAt,
    }
}

mod m20250101_000004_create_purchase_order_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000004_create_purchase_order_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(PurchaseOrders::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PurchaseOrders::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::RestaurantId)
                                .uuid()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PurchaseOrders::SupplierId).uuid().not_null())
                        .col(
                            ColumnDef::new(PurchaseOrders::OrderNumber)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(PurchaseOrders::Status).string().not_null())
                        .col(
                            ColumnDef::new(PurchaseOrders::TotalAmount)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::AiGenerated)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(PurchaseOrders::AiReasoning).text().null())
                        .col(
                            ColumnDef::new(PurchaseOrders::ExpectedDelivery)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::ActualDelivery)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_purchase_orders_restaurant_id")
                        .table(PurchaseOrders::Table)
                        .col(PurchaseOrders::RestaurantId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_purchase_orders_supplier_id")
                        .table(PurchaseOrders::Table)
                        .col(PurchaseOrders::SupplierId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_purchase_orders_restaurant_status")
                        .table(PurchaseOrders::Table)
                        .col(PurchaseOrders::RestaurantId)
                        .col(PurchaseOrders::Status)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PurchaseOrderItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PurchaseOrderItems::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderItems::PurchaseOrderId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderItems::InventoryItemId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderItems::ItemName)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderItems::Quantity)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderItems::UnitPrice)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderItems::TotalPrice)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderItems::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_purchase_order_items_po_id")
                        .table(PurchaseOrderItems::Table)
                        .col(PurchaseOrderItems::PurchaseOrderId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PurchaseOrderItems::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(PurchaseOrders::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum PurchaseOrders {
        Table,
        Id,
        RestaurantId,
        SupplierId,
        OrderNumber,
        Status,
        TotalAmount,
        AiGenerated,
        AiReasoning,
        ExpectedDelivery,
        ActualDelivery,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(Iden)]
    pub enum PurchaseOrderItems {
        Table,
        Id,
        PurchaseOrderId,
        InventoryItemId,
        ItemName,
        Quantity,
        UnitPrice,
        TotalPrice,
        CreatedAt,
    }
}

mod m20250101_000005_create_customers_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000005_create_customers_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Customers::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Customers::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Customers::RestaurantId).uuid().not_null())
                        .col(ColumnDef::new(Customers::Name).string().not_null())
                        .col(ColumnDef::new(Customers::Phone).string().not_null())
                        .col(ColumnDef::new(Customers::Email).string().null())
                        .col(ColumnDef::new(Customers::Preferences).json().not_null())
                        .col(
                            ColumnDef::new(Customers::DietaryRestrictions)
                                .json()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Customers::TotalOrders)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Customers::TotalSpent)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Customers::LastOrderDate)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(Customers::LoyaltyPoints)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Customers::Status).string().not_null())
                        .col(
                            ColumnDef::new(Customers::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_customers_restaurant_id")
                        .table(Customers::Table)
                        .col(Customers::RestaurantId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_customers_phone")
                        .table(Customers::Table)
                        .col(Customers::Phone)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Customers::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum Customers {
        Table,
        Id,
        RestaurantId,
        Name,
        Phone,
        Email,
        Preferences,
        DietaryRestrictions,
        TotalOrders,
        TotalSpent,
        LastOrderDate,
        LoyaltyPoints,
        Status,
        CreatedAt,
    }
}

mod m20250101_000006_create_order_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000006_create_order_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Orders::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Orders::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Orders::RestaurantId).uuid().not_null())
                        .col(ColumnDef::new(Orders::CustomerId).uuid().null())
                        .col(ColumnDef::new(Orders::OrderNumber).string().not_null())
                        .col(ColumnDef::new(Orders::Source).string().not_null())
                        .col(ColumnDef::new(Orders::Status).string().not_null())
                        .col(
                            ColumnDef::new(Orders::TotalAmount)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Orders::PaymentStatus).string().not_null())
                        .col(ColumnDef::new(Orders::PaymentMethod).string().null())
                        .col(ColumnDef::new(Orders::CustomerName).string().not_null())
                        .col(ColumnDef::new(Orders::CustomerPhone).string().not_null())
                        .col(ColumnDef::new(Orders::CustomerAddress).string().null())
                        .col(ColumnDef::new(Orders::MessageThreadId).string().null())
                        .col(
                            ColumnDef::new(Orders::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Orders::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_orders_restaurant_id")
                        .table(Orders::Table)
                        .col(Orders::RestaurantId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_orders_restaurant_status")
                        .table(Orders::Table)
                        .col(Orders::RestaurantId)
                        .col(Orders::Status)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_orders_created_at")
                        .table(Orders::Table)
                        .col(Orders::CreatedAt)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(OrderItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(OrderItems::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(OrderItems::OrderId).uuid().not_null())
                        .col(ColumnDef::new(OrderItems::RestaurantId).uuid().not_null())
                        .col(ColumnDef::new(OrderItems::InventoryItemId).uuid().null())
                        .col(ColumnDef::new(OrderItems::Name).string().not_null())
                        .col(ColumnDef::new(OrderItems::Quantity).decimal().not_null())
                        .col(ColumnDef::new(OrderItems::Price).decimal().not_null())
                        .col(ColumnDef::new(OrderItems::Notes).string().null())
                        .col(ColumnDef::new(OrderItems::Category).string().null())
                        .col(
                            ColumnDef::new(OrderItems::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_order_items_order_id")
                        .table(OrderItems::Table)
                        .col(OrderItems::OrderId)
                        .to_owned(),
                )
                .await?;

            // Order History Reader scans: (restaurant, item, time window)
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_order_items_restaurant_item")
                        .table(OrderItems::Table)
                        .col(OrderItems::RestaurantId)
                        .col(OrderItems::InventoryItemId)
                        .col(OrderItems::CreatedAt)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(OrderItems::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Orders::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum Orders {
        Table,
        Id,
        RestaurantId,
        CustomerId,
        OrderNumber,
        Source,
        Status,
        TotalAmount,
        PaymentStatus,
        PaymentMethod,
        CustomerName,
        CustomerPhone,
        CustomerAddress,
        MessageThreadId,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(Iden)]
    pub enum OrderItems {
        Table,
        Id,
        OrderId,
        RestaurantId,
        InventoryItemId,
        Name,
        Quantity,
        Price,
        Notes,
        Category,
        CreatedAt,
    }
}

mod m20250101_000007_create_staffing_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000007_create_staffing_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(JobPostings::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(JobPostings::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(JobPostings::RestaurantId).uuid().not_null())
                        .col(ColumnDef::new(JobPostings::Title).string().not_null())
                        .col(ColumnDef::new(JobPostings::Description).text().not_null())
                        .col(ColumnDef::new(JobPostings::Department).string().not_null())
                        .col(ColumnDef::new(JobPostings::Requirements).json().not_null())
                        .col(ColumnDef::new(JobPostings::SalaryMin).decimal().not_null())
                        .col(ColumnDef::new(JobPostings::SalaryMax).decimal().not_null())
                        .col(ColumnDef::new(JobPostings::SalaryType).string().not_null())
                        .col(ColumnDef::new(JobPostings::Status).string().not_null())
                        .col(
                            ColumnDef::new(JobPostings::ApplicationsCount)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(JobPostings::AiGenerated)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(JobPostings::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_job_postings_restaurant_status")
                        .table(JobPostings::Table)
                        .col(JobPostings::RestaurantId)
                        .col(JobPostings::Status)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(JobApplications::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(JobApplications::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(JobApplications::JobPostingId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(JobApplications::RestaurantId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(JobApplications::ApplicantName)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(JobApplications::ApplicantEmail)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(JobApplications::ApplicantPhone)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(JobApplications::Status).string().not_null())
                        .col(
                            ColumnDef::new(JobApplications::Notes)
                                .text()
                                .not_null()
                                .default(""),
                        )
                        .col(
                            ColumnDef::new(JobApplications::AppliedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_job_applications_posting_id")
                        .table(JobApplications::Table)
                        .col(JobApplications::JobPostingId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(JobApplications::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(JobPostings::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum JobPostings {
        Table,
        Id,
        RestaurantId,
        Title,
        Description,
        Department,
        Requirements,
        SalaryMin,
        SalaryMax,
        SalaryType,
        Status,
        ApplicationsCount,
        AiGenerated,
        CreatedAt,
    }

    #[derive(Iden)]
    pub enum JobApplications {
        Table,
        Id,
        JobPostingId,
        RestaurantId,
        ApplicantName,
        ApplicantEmail,
        ApplicantPhone,
        Status,
        Notes,
        AppliedAt,
    }
}

mod m20250101_000008_create_marketing_campaigns_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000008_create_marketing_campaigns_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(MarketingCampaigns::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(MarketingCampaigns::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MarketingCampaigns::RestaurantId)
                                .uuid()
                                .not_null(),
                        )
                        .col(ColumnDef::new(MarketingCampaigns::Name).string().not_null())
                        .col(
                            ColumnDef::new(MarketingCampaigns::CampaignType)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MarketingCampaigns::Status)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MarketingCampaigns::TargetAudience)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MarketingCampaigns::ContentTitle)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MarketingCampaigns::ContentMessage)
                                .text()
                                .not_null(),
                        )
                        .col(ColumnDef::new(MarketingCampaigns::CtaText).string().null())
                        .col(
                            ColumnDef::new(MarketingCampaigns::AiGenerated)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(MarketingCampaigns::AiPrompt).text().null())
                        .col(
                            ColumnDef::new(MarketingCampaigns::ScheduleStart)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MarketingCampaigns::ScheduleEnd)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(MarketingCampaigns::MetricSent)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(MarketingCampaigns::MetricDelivered)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(MarketingCampaigns::MetricOpened)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(MarketingCampaigns::MetricClicked)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(MarketingCampaigns::MetricConversions)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(MarketingCampaigns::MetricRevenue)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(MarketingCampaigns::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_marketing_campaigns_restaurant_status")
                        .table(MarketingCampaigns::Table)
                        .col(MarketingCampaigns::RestaurantId)
                        .col(MarketingCampaigns::Status)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(MarketingCampaigns::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum MarketingCampaigns {
        Table,
        Id,
        RestaurantId,
        Name,
        CampaignType,
        Status,
        TargetAudience,
        ContentTitle,
        ContentMessage,
        CtaText,
        AiGenerated,
        AiPrompt,
        ScheduleStart,
        ScheduleEnd,
        MetricSent,
        MetricDelivered,
        MetricOpened,
        MetricClicked,
        MetricConversions,
        MetricRevenue,
        CreatedAt,
    }
}
