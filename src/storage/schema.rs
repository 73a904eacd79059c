//! Database schema definitions using sea-query.
//!
//! These define the table and column identifiers for type-safe query building.
//! The tables themselves are created by the migrations under `migrations/`.

use sea_query::Iden;

/// Categories table schema.
#[derive(Iden)]
pub enum Categories {
    Table,
    #[iden = "id"]
    Id,
    #[iden = "name"]
    Name,
    #[iden = "description"]
    Description,
}

/// Products table schema.
#[derive(Iden)]
pub enum Products {
    Table,
    #[iden = "id"]
    Id,
    #[iden = "category_id"]
    CategoryId,
    #[iden = "name"]
    Name,
    #[iden = "price"]
    Price,
    #[iden = "stock"]
    Stock,
}

/// Transactions table schema.
#[derive(Iden)]
pub enum Transactions {
    Table,
    #[iden = "id"]
    Id,
    #[iden = "total_amount"]
    TotalAmount,
    #[iden = "created_at"]
    CreatedAt,
}

/// Transaction details table schema.
#[derive(Iden)]
pub enum TransactionDetails {
    Table,
    #[iden = "id"]
    Id,
    #[iden = "transaction_id"]
    TransactionId,
    #[iden = "product_id"]
    ProductId,
    #[iden = "product_name"]
    ProductName,
    #[iden = "quantity"]
    Quantity,
    #[iden = "subtotal"]
    Subtotal,
}

/// Result column aliases used by aggregate queries.
#[derive(Iden)]
pub enum Aggregates {
    #[iden = "category_name"]
    CategoryName,
    #[iden = "total_revenue"]
    TotalRevenue,
    #[iden = "transaction_count"]
    TransactionCount,
    #[iden = "total_sold"]
    TotalSold,
}
