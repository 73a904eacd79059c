//! SalesStore interface tests.
//!
//! These tests verify the unit-of-work and aggregate contract of the
//! SalesStore trait. Each test uses its own calendar year so transactions
//! from other tests never fall inside its report windows.

use chrono::{NaiveDate, NaiveDateTime};

use kasir::models::{ProductInput, ReportWindow, TransactionDetail};
use kasir::storage::{CatalogStore, SalesStore};

pub fn at(year: i32, month: u32, day: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(h, m, s))
        .expect("valid timestamp")
}

pub fn day_window(year: i32, month: u32, day: u32) -> ReportWindow {
    ReportWindow::new(
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date"),
        None,
    )
}

async fn make_product<C: CatalogStore + ?Sized>(catalog: &C, name: &str, price: i64, stock: i64) -> i64 {
    catalog
        .create_product(&ProductInput {
            category_id: 1,
            name: name.to_string(),
            price,
            stock,
        })
        .await
        .expect("create product should succeed")
        .id
}

/// Commit one sale of `lines` (product id, name, quantity, subtotal) at `when`.
async fn record_sale<S: SalesStore + ?Sized>(
    sales: &S,
    when: NaiveDateTime,
    lines: &[(i64, &str, i64, i64)],
) -> i64 {
    let total: i64 = lines.iter().map(|l| l.3).sum();
    let mut uow = sales.begin().await.expect("begin should succeed");
    for &(product_id, _, quantity, _) in lines {
        uow.decrement_stock(product_id, quantity)
            .await
            .expect("decrement should succeed");
    }
    let id = uow
        .insert_transaction(total, when)
        .await
        .expect("insert header should succeed");
    let details: Vec<_> = lines
        .iter()
        .map(|&(product_id, name, quantity, subtotal)| TransactionDetail {
            transaction_id: id,
            product_id,
            product_name: name.to_string(),
            quantity,
            subtotal,
        })
        .collect();
    uow.insert_transaction_details(&details)
        .await
        .expect("insert details should succeed");
    uow.commit().await.expect("commit should succeed");
    id
}

// =============================================================================
// Unit of work
// =============================================================================

pub async fn test_uow_reads_product<C, S>(catalog: &C, sales: &S)
where
    C: CatalogStore + ?Sized,
    S: SalesStore + ?Sized,
{
    let id = make_product(catalog, "test_uow_read", 4500, 9).await;

    let mut uow = sales.begin().await.expect("begin should succeed");
    let snapshot = uow
        .get_product(id)
        .await
        .expect("get should succeed")
        .expect("product should exist");
    assert_eq!(snapshot.name, "test_uow_read");
    assert_eq!(snapshot.price, 4500);
    assert_eq!(snapshot.stock, 9);

    assert!(uow
        .get_product(i64::MAX)
        .await
        .expect("get should succeed")
        .is_none());
    uow.rollback().await.expect("rollback should succeed");
}

pub async fn test_uow_commit_is_visible<C, S>(catalog: &C, sales: &S)
where
    C: CatalogStore + ?Sized,
    S: SalesStore + ?Sized,
{
    let id = make_product(catalog, "test_uow_commit", 1000, 5).await;
    record_sale(sales, at(2001, 1, 1, 12, 0, 0), &[(id, "test_uow_commit", 3, 3000)]).await;

    let product = catalog
        .get_product(id)
        .await
        .expect("get should succeed")
        .expect("product should exist");
    assert_eq!(product.product.stock, 2);

    let totals = sales
        .sum_and_count_transactions(&day_window(2001, 1, 1))
        .await
        .expect("sum should succeed");
    assert_eq!(totals.revenue, 3000);
    assert_eq!(totals.count, 1);
}

pub async fn test_uow_stock_may_go_negative<C, S>(catalog: &C, sales: &S)
where
    C: CatalogStore + ?Sized,
    S: SalesStore + ?Sized,
{
    let id = make_product(catalog, "test_uow_negative", 1000, 1).await;
    record_sale(sales, at(2002, 1, 1, 12, 0, 0), &[(id, "test_uow_negative", 4, 4000)]).await;

    let product = catalog
        .get_product(id)
        .await
        .expect("get should succeed")
        .expect("product should exist");
    assert_eq!(product.product.stock, -3);
}

pub async fn test_uow_rollback_discards<C, S>(catalog: &C, sales: &S)
where
    C: CatalogStore + ?Sized,
    S: SalesStore + ?Sized,
{
    let id = make_product(catalog, "test_uow_rollback", 1000, 5).await;

    let mut uow = sales.begin().await.expect("begin should succeed");
    uow.decrement_stock(id, 2).await.expect("decrement should succeed");
    uow.insert_transaction(2000, at(2003, 1, 1, 12, 0, 0))
        .await
        .expect("insert header should succeed");
    uow.rollback().await.expect("rollback should succeed");

    let product = catalog
        .get_product(id)
        .await
        .expect("get should succeed")
        .expect("product should exist");
    assert_eq!(product.product.stock, 5);
    let totals = sales
        .sum_and_count_transactions(&day_window(2003, 1, 1))
        .await
        .expect("sum should succeed");
    assert_eq!(totals.count, 0);
}

pub async fn test_uow_drop_discards<C, S>(catalog: &C, sales: &S)
where
    C: CatalogStore + ?Sized,
    S: SalesStore + ?Sized,
{
    let id = make_product(catalog, "test_uow_drop", 1000, 5).await;

    {
        let mut uow = sales.begin().await.expect("begin should succeed");
        uow.decrement_stock(id, 5).await.expect("decrement should succeed");
    }

    let product = catalog
        .get_product(id)
        .await
        .expect("get should succeed")
        .expect("product should exist");
    assert_eq!(product.product.stock, 5);
}

pub async fn test_uow_lock_products<C, S>(catalog: &C, sales: &S)
where
    C: CatalogStore + ?Sized,
    S: SalesStore + ?Sized,
{
    let first = make_product(catalog, "test_lock_first", 100, 10).await;
    let second = make_product(catalog, "test_lock_second", 100, 10).await;

    let mut uow = sales.begin().await.expect("begin should succeed");
    uow.lock_products(&[]).await.expect("empty lock should succeed");
    uow.lock_products(&[first, second, i64::MAX])
        .await
        .expect("lock should succeed");
    let snapshot = uow
        .get_product(second)
        .await
        .expect("get should succeed")
        .expect("product should exist");
    assert_eq!(snapshot.stock, 10);
    uow.decrement_stock(second, 4).await.expect("decrement should succeed");
    uow.commit().await.expect("commit should succeed");

    let product = catalog
        .get_product(second)
        .await
        .expect("get should succeed")
        .expect("product should exist");
    assert_eq!(product.product.stock, 6);
}

// =============================================================================
// Aggregates
// =============================================================================

pub async fn test_empty_window<S: SalesStore + ?Sized>(sales: &S) {
    let window = day_window(1999, 12, 31);
    let totals = sales
        .sum_and_count_transactions(&window)
        .await
        .expect("sum should succeed");
    assert_eq!(totals.revenue, 0);
    assert_eq!(totals.count, 0);
    assert!(sales
        .top_selling_product(&window)
        .await
        .expect("top seller should succeed")
        .is_none());
}

pub async fn test_window_bounds_are_inclusive<C, S>(catalog: &C, sales: &S)
where
    C: CatalogStore + ?Sized,
    S: SalesStore + ?Sized,
{
    let id = make_product(catalog, "test_bounds", 100, 100).await;
    record_sale(sales, at(2004, 6, 10, 0, 0, 0), &[(id, "test_bounds", 1, 100)]).await;
    record_sale(sales, at(2004, 6, 10, 23, 59, 59), &[(id, "test_bounds", 2, 200)]).await;
    record_sale(sales, at(2004, 6, 11, 0, 0, 0), &[(id, "test_bounds", 4, 400)]).await;

    let totals = sales
        .sum_and_count_transactions(&day_window(2004, 6, 10))
        .await
        .expect("sum should succeed");
    assert_eq!(totals.revenue, 300);
    assert_eq!(totals.count, 2);
}

pub async fn test_top_seller_sums_quantities<C, S>(catalog: &C, sales: &S)
where
    C: CatalogStore + ?Sized,
    S: SalesStore + ?Sized,
{
    let kopi = make_product(catalog, "test_top_kopi", 100, 100).await;
    let teh = make_product(catalog, "test_top_teh", 100, 100).await;
    let when = at(2005, 2, 2, 9, 0, 0);
    record_sale(sales, when, &[(kopi, "test_top_kopi", 2, 200), (teh, "test_top_teh", 3, 300)]).await;
    record_sale(sales, when, &[(kopi, "test_top_kopi", 2, 200)]).await;

    let top = sales
        .top_selling_product(&day_window(2005, 2, 2))
        .await
        .expect("top seller should succeed")
        .expect("something sold");
    assert_eq!(top.product_name, "test_top_kopi");
    assert_eq!(top.quantity, 4);
}

pub async fn test_top_seller_tie_goes_to_lowest_id<C, S>(catalog: &C, sales: &S)
where
    C: CatalogStore + ?Sized,
    S: SalesStore + ?Sized,
{
    let first = make_product(catalog, "test_tie_first", 100, 100).await;
    let second = make_product(catalog, "test_tie_second", 100, 100).await;
    record_sale(
        sales,
        at(2006, 3, 3, 9, 0, 0),
        &[(second, "test_tie_second", 2, 200), (first, "test_tie_first", 2, 200)],
    )
    .await;

    let top = sales
        .top_selling_product(&day_window(2006, 3, 3))
        .await
        .expect("top seller should succeed")
        .expect("something sold");
    assert_eq!(top.product_name, "test_tie_first");
}

pub async fn test_summary_matches_separate_reads<C, S>(catalog: &C, sales: &S)
where
    C: CatalogStore + ?Sized,
    S: SalesStore + ?Sized,
{
    let kopi = make_product(catalog, "test_summary_kopi", 100, 100).await;
    let teh = make_product(catalog, "test_summary_teh", 100, 100).await;
    let when = at(2008, 4, 4, 15, 0, 0);
    record_sale(sales, when, &[(kopi, "test_summary_kopi", 1, 100), (teh, "test_summary_teh", 5, 500)]).await;
    record_sale(sales, when, &[(kopi, "test_summary_kopi", 2, 200)]).await;

    let window = day_window(2008, 4, 4);
    let summary = sales.summarize(&window).await.expect("summary should succeed");
    assert_eq!(summary.totals.revenue, 800);
    assert_eq!(summary.totals.count, 2);
    let top = summary.top_seller.as_ref().expect("something sold");
    assert_eq!(top.product_name, "test_summary_teh");
    assert_eq!(top.quantity, 5);

    let totals = sales
        .sum_and_count_transactions(&window)
        .await
        .expect("sum should succeed");
    let top_seller = sales
        .top_selling_product(&window)
        .await
        .expect("top seller should succeed");
    assert_eq!(summary.totals, totals);
    assert_eq!(summary.top_seller, top_seller);

    let empty = sales
        .summarize(&day_window(2008, 4, 5))
        .await
        .expect("summary should succeed");
    assert_eq!(empty.totals.count, 0);
    assert!(empty.top_seller.is_none());
}

pub async fn test_report_is_repeatable<C, S>(catalog: &C, sales: &S)
where
    C: CatalogStore + ?Sized,
    S: SalesStore + ?Sized,
{
    let id = make_product(catalog, "test_repeatable", 2500, 50).await;
    record_sale(sales, at(2009, 9, 9, 8, 0, 0), &[(id, "test_repeatable", 3, 7500)]).await;
    record_sale(sales, at(2009, 9, 9, 20, 0, 0), &[(id, "test_repeatable", 1, 2500)]).await;

    let window = day_window(2009, 9, 9);
    let first = sales.summarize(&window).await.expect("summary should succeed");
    let second = sales.summarize(&window).await.expect("summary should succeed");
    assert_eq!(first, second);
    assert_eq!(first.totals.revenue, 10000);

    // Reading does not change stock.
    let product = catalog
        .get_product(id)
        .await
        .expect("get should succeed")
        .expect("product should exist");
    assert_eq!(product.product.stock, 46);
}

/// A summary taken while sales are committing must see each sale entirely or
/// not at all: with one product at price 100 and quantity 1 per sale, revenue
/// is always 100 per transaction and the top seller quantity equals the count.
pub async fn test_summary_is_consistent_under_concurrent_sales<C, S>(catalog: &C, sales: &S)
where
    C: CatalogStore + ?Sized,
    S: SalesStore + ?Sized,
{
    const SALES: i64 = 20;
    let id = make_product(catalog, "test_snapshot", 100, 1000).await;
    let window = day_window(2010, 10, 10);

    let writer = async {
        for minute in 0..SALES {
            record_sale(
                sales,
                at(2010, 10, 10, 12, minute as u32, 0),
                &[(id, "test_snapshot", 1, 100)],
            )
            .await;
            tokio::task::yield_now().await;
        }
    };

    let reader = async {
        loop {
            let summary = sales.summarize(&window).await.expect("summary should succeed");
            let count = summary.totals.count;
            assert_eq!(summary.totals.revenue, count * 100);
            match &summary.top_seller {
                None => assert_eq!(count, 0),
                Some(top) => assert_eq!(top.quantity, count),
            }
            if count == SALES {
                break;
            }
            tokio::task::yield_now().await;
        }
    };

    tokio::join!(writer, reader);
}

/// Run all SalesStore tests against a catalog/sales pair sharing one database.
#[macro_export]
macro_rules! run_sales_store_tests {
    ($catalog:expr, $sales:expr) => {
        use $crate::storage::sales_store_tests::*;

        test_uow_reads_product($catalog, $sales).await;
        println!("  test_uow_reads_product: PASSED");

        test_uow_commit_is_visible($catalog, $sales).await;
        println!("  test_uow_commit_is_visible: PASSED");

        test_uow_stock_may_go_negative($catalog, $sales).await;
        println!("  test_uow_stock_may_go_negative: PASSED");

        test_uow_rollback_discards($catalog, $sales).await;
        println!("  test_uow_rollback_discards: PASSED");

        test_uow_drop_discards($catalog, $sales).await;
        println!("  test_uow_drop_discards: PASSED");

        test_uow_lock_products($catalog, $sales).await;
        println!("  test_uow_lock_products: PASSED");

        test_empty_window($sales).await;
        println!("  test_empty_window: PASSED");

        test_window_bounds_are_inclusive($catalog, $sales).await;
        println!("  test_window_bounds_are_inclusive: PASSED");

        test_top_seller_sums_quantities($catalog, $sales).await;
        println!("  test_top_seller_sums_quantities: PASSED");

        test_top_seller_tie_goes_to_lowest_id($catalog, $sales).await;
        println!("  test_top_seller_tie_goes_to_lowest_id: PASSED");

        test_summary_matches_separate_reads($catalog, $sales).await;
        println!("  test_summary_matches_separate_reads: PASSED");

        test_report_is_repeatable($catalog, $sales).await;
        println!("  test_report_is_repeatable: PASSED");

        test_summary_is_consistent_under_concurrent_sales($catalog, $sales).await;
        println!("  test_summary_is_consistent_under_concurrent_sales: PASSED");
    };
}
