pub mod customer;
pub mod inventory_item;
pub mod job_application;
pub mod job_posting;
pub mod marketing_campaign;
pub mod order;
pub mod order_item;
pub mod purchase_order;
pub mod purchase_order_item;
pub mod restaurant;
pub mod supplier;
