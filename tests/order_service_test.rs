mod common;

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use common::TestApp;
use rust_decimal_macros::dec;
use warehouse_inventory::{
    entities::{order, order_item, OrderStatus},
    errors::ServiceError,
};

fn draft(number: &str) -> order::Model {
    let mut order = order::Model::new(number, "Robin Customer");
    order.customer_email = Some("robin@example.com".to_string());
    order.tax = Some(dec!(1.00));
    order.shipping_cost = Some(dec!(2.00));
    order
}

#[tokio::test]
async fn placing_an_order_stores_consistent_totals() {
    let app = TestApp::new().await;
    let drill = app.product("Drill", dec!(9.99)).await;
    let bits = app.product("Bits", dec!(5.50)).await;

    let placed = app
        .services
        .orders
        .place_order(
            draft("SO-1"),
            vec![
                order_item::Model::new(drill.id, 3, dec!(9.99)),
                order_item::Model::new(bits.id, 1, dec!(5.50)),
            ],
        )
        .await
        .unwrap();

    assert!(placed.order.id > 0);
    assert_eq!(placed.order.subtotal, dec!(35.47));
    assert_eq!(placed.order.total, dec!(38.47));
    assert!(placed.items.iter().all(|item| item.order_id == placed.order.id));
    assert_eq!(placed.items[0].subtotal, dec!(29.97));

    let loaded = app
        .services
        .orders
        .find_with_items(placed.order.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loaded.order.total, dec!(38.47));
    assert_eq!(loaded.items.len(), 2);
}

#[tokio::test]
async fn placing_rolls_back_when_a_line_is_invalid() {
    let app = TestApp::new().await;
    let drill = app.product("Drill", dec!(9.99)).await;

    let err = app
        .services
        .orders
        .place_order(
            draft("SO-1"),
            vec![
                order_item::Model::new(drill.id, 1, dec!(9.99)),
                order_item::Model::new(drill.id, 0, dec!(9.99)),
            ],
        )
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::ValidationError(_));
    assert_eq!(app.services.orders.count().await.unwrap(), 0);
    assert_eq!(app.services.order_items.count().await.unwrap(), 0);
}

#[tokio::test]
async fn adding_and_removing_lines_keeps_totals_current() {
    let app = TestApp::new().await;
    let drill = app.product("Drill", dec!(10.00)).await;
    let bits = app.product("Bits", dec!(5.50)).await;
    let orders = &app.services.orders;

    let placed = orders
        .place_order(draft("SO-1"), vec![order_item::Model::new(drill.id, 1, dec!(10.00))])
        .await
        .unwrap();
    assert_eq!(placed.order.total, dec!(13.00));

    let grown = orders
        .add_item(placed.order.id, order_item::Model::new(bits.id, 1, dec!(5.50)))
        .await
        .unwrap();
    assert_eq!(grown.items.len(), 2);
    assert_eq!(grown.order.subtotal, dec!(15.50));
    assert_eq!(grown.order.total, dec!(18.50));

    let first_line = grown.items[0].id;
    let shrunk = orders.remove_item(placed.order.id, first_line).await.unwrap();
    assert_eq!(shrunk.items.len(), 1);
    assert_eq!(shrunk.order.total, dec!(8.50));

    let stored = orders.get_by_id(placed.order.id).await.unwrap();
    assert_eq!(stored.total, dec!(8.50));
    assert!(app
        .services
        .order_items
        .find_by_id(first_line)
        .await
        .unwrap()
        .is_none());

    assert_matches!(
        orders.remove_item(placed.order.id, first_line).await,
        Err(ServiceError::NotFound(_))
    );
    assert_matches!(
        orders
            .add_item(placed.order.id + 10, order_item::Model::new(bits.id, 1, dec!(5.50)))
            .await,
        Err(ServiceError::NotFound(_))
    );
}

#[tokio::test]
async fn recalculating_picks_up_lines_saved_directly() {
    let app = TestApp::new().await;
    let drill = app.product("Drill", dec!(10.00)).await;
    let orders = &app.services.orders;
    let placed = orders.place_order(draft("SO-1"), Vec::new()).await.unwrap();
    assert_eq!(placed.order.total, dec!(3.00));

    let mut line = order_item::Model::new(drill.id, 2, dec!(10.00));
    line.order_id = placed.order.id;
    app.services.order_items.save(line).await.unwrap();
    assert_eq!(orders.get_by_id(placed.order.id).await.unwrap().total, dec!(3.00));

    let recalculated = orders.recalculate_totals(placed.order.id).await.unwrap();
    assert_eq!(recalculated.subtotal, dec!(20.00));
    assert_eq!(recalculated.total, dec!(23.00));
}

#[tokio::test]
async fn status_changes() {
    let app = TestApp::new().await;
    let orders = &app.services.orders;
    let placed = orders.place_order(draft("SO-1"), Vec::new()).await.unwrap();
    assert_eq!(placed.order.status, OrderStatus::Pending);

    let shipped = orders
        .update_status(placed.order.id, OrderStatus::Shipped)
        .await
        .unwrap();
    assert_eq!(shipped.status, OrderStatus::Shipped);
    assert_eq!(orders.count_by_status(OrderStatus::Shipped).await.unwrap(), 1);

    let cancelled = orders
        .cancel_order(placed.order.id, Some("customer request".to_string()))
        .await
        .unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(cancelled.notes.as_deref(), Some("Cancelled: customer request"));

    assert_matches!(
        orders.update_status(placed.order.id + 1, OrderStatus::Delivered).await,
        Err(ServiceError::NotFound(_))
    );
}

#[tokio::test]
async fn already_placed_orders_are_rejected() {
    let app = TestApp::new().await;
    let placed = app
        .services
        .orders
        .place_order(draft("SO-1"), Vec::new())
        .await
        .unwrap();

    assert_matches!(
        app.services.orders.place_order(placed.order, Vec::new()).await,
        Err(ServiceError::InvalidInput(_))
    );
}

#[tokio::test]
async fn saved_lines_cannot_be_placed_on_another_order() {
    let app = TestApp::new().await;
    let drill = app.product("Drill", dec!(10.00)).await;
    let orders = &app.services.orders;

    let first = orders
        .place_order(draft("SO-1"), vec![order_item::Model::new(drill.id, 2, dec!(10.00))])
        .await
        .unwrap();
    let saved_line = first.items[0].clone();

    assert_matches!(
        orders.place_order(draft("SO-2"), vec![saved_line]).await,
        Err(ServiceError::InvalidInput(_))
    );
    assert_eq!(orders.count().await.unwrap(), 1);

    let reloaded = orders.find_with_items(first.order.id).await.unwrap().unwrap();
    assert_eq!(reloaded.items.len(), 1);
    assert_eq!(reloaded.order.total, dec!(23.00));
}

#[tokio::test]
async fn removing_the_last_line_leaves_tax_and_shipping() {
    let app = TestApp::new().await;
    let drill = app.product("Drill", dec!(10.00)).await;
    let orders = &app.services.orders;

    let placed = orders
        .place_order(draft("SO-1"), vec![order_item::Model::new(drill.id, 2, dec!(10.00))])
        .await
        .unwrap();
    assert_eq!(placed.order.total, dec!(23.00));

    let emptied = orders
        .remove_item(placed.order.id, placed.items[0].id)
        .await
        .unwrap();
    assert!(emptied.items.is_empty());
    assert_eq!(emptied.order.subtotal, dec!(0));
    assert_eq!(emptied.order.total, dec!(3.00));
    assert_eq!(orders.get_by_id(placed.order.id).await.unwrap().total, dec!(3.00));
}

#[tokio::test]
async fn deleting_an_order_removes_its_lines() {
    let app = TestApp::new().await;
    let drill = app.product("Drill", dec!(10.00)).await;
    let placed = app
        .services
        .orders
        .place_order(
            draft("SO-1"),
            vec![order_item::Model::new(drill.id, 1, dec!(10.00))],
        )
        .await
        .unwrap();

    app.services.orders.delete_by_id(placed.order.id).await.unwrap();
    assert_eq!(app.services.order_items.count().await.unwrap(), 0);
}

#[tokio::test]
async fn order_queries() {
    let app = TestApp::new().await;
    let drill = app.product("Drill", dec!(10.00)).await;
    let saw = app.product("Saw", dec!(20.00)).await;
    let orders = &app.services.orders;
    let now = Utc::now();

    let mut old = draft("SO-OLD");
    old.order_date = now - Duration::days(30);
    old.customer_name = "Alex Archer".to_string();
    orders
        .place_order(old, vec![order_item::Model::new(saw.id, 1, dec!(20.00))])
        .await
        .unwrap();

    let recent = orders
        .place_order(
            draft("SO-NEW"),
            vec![
                order_item::Model::new(drill.id, 2, dec!(10.00)),
                order_item::Model::new(saw.id, 1, dec!(20.00)),
            ],
        )
        .await
        .unwrap();

    let cancelled = orders
        .place_order(draft("SO-CXL"), vec![order_item::Model::new(drill.id, 5, dec!(10.00))])
        .await
        .unwrap();
    orders.cancel_order(cancelled.order.id, None).await.unwrap();

    assert_eq!(
        orders.find_by_order_number("SO-NEW").await.unwrap().map(|o| o.id),
        Some(recent.order.id)
    );
    assert_eq!(orders.find_by_customer_name_containing("archer").await.unwrap().len(), 1);
    assert_eq!(orders.find_by_customer_email("robin@example.com").await.unwrap().len(), 3);
    assert_eq!(orders.find_by_status(OrderStatus::Cancelled).await.unwrap().len(), 1);

    let last_week = now - Duration::days(7);
    let tomorrow = now + Duration::days(1);
    assert_eq!(orders.find_by_date_between(last_week, tomorrow).await.unwrap().len(), 2);
    assert_eq!(
        orders
            .find_by_status_and_date_between(OrderStatus::Pending, last_week, tomorrow)
            .await
            .unwrap()
            .len(),
        1
    );

    // totals: SO-OLD 23.00, SO-NEW 43.00, SO-CXL 53.00
    assert_eq!(orders.find_by_total_at_least(dec!(43.00)).await.unwrap().len(), 2);
    assert_eq!(orders.find_by_total_at_most(dec!(43.00)).await.unwrap().len(), 2);

    let with_saw = orders.find_orders_containing_product(saw.id).await.unwrap();
    assert_eq!(with_saw.len(), 2);

    let sales = orders
        .total_sales_for_date_range(now - Duration::days(60), tomorrow)
        .await
        .unwrap();
    assert_eq!(sales, dec!(66.00));
    assert_eq!(
        orders
            .total_sales_for_date_range(now + Duration::days(2), now + Duration::days(3))
            .await
            .unwrap(),
        dec!(0)
    );
}

#[tokio::test]
async fn sales_statistics() {
    let app = TestApp::new().await;
    let drill = app.product("Drill", dec!(10.00)).await;
    let saw = app.product("Saw", dec!(20.00)).await;
    let tape = app.product("Tape", dec!(1.00)).await;
    let orders = &app.services.orders;
    let items = &app.services.order_items;

    orders
        .place_order(
            draft("SO-1"),
            vec![
                order_item::Model::new(drill.id, 4, dec!(10.00)),
                order_item::Model::new(saw.id, 1, dec!(20.00)),
                order_item::Model::new(tape.id, 10, dec!(1.00)),
            ],
        )
        .await
        .unwrap();
    orders
        .place_order(
            draft("SO-2"),
            vec![
                order_item::Model::new(saw.id, 1, dec!(20.00)),
                order_item::Model::new(tape.id, 10, dec!(1.00)),
            ],
        )
        .await
        .unwrap();

    assert_eq!(items.total_quantity_sold(tape.id).await.unwrap(), 20);
    assert_eq!(items.total_revenue(saw.id).await.unwrap(), dec!(40.00));
    assert_eq!(items.total_revenue(saw.id + 100).await.unwrap(), dec!(0));
    assert_eq!(items.find_by_product(saw.id).await.unwrap().len(), 2);
    assert_eq!(items.find_by_quantity_at_least(10).await.unwrap().len(), 2);
    assert_eq!(items.find_by_unit_price_at_least(dec!(20.00)).await.unwrap().len(), 2);

    let by_quantity = items.top_selling_by_quantity(2).await.unwrap();
    assert_eq!(by_quantity.len(), 2);
    assert_eq!(by_quantity[0].product_id, tape.id);
    assert_eq!(by_quantity[0].quantity, 20);
    assert_eq!(by_quantity[1].product_id, drill.id);

    // drill and saw tie on revenue; the lower id ranks first
    let by_revenue = items.top_selling_by_revenue(3).await.unwrap();
    assert_eq!(
        by_revenue.iter().map(|r| r.product_id).collect::<Vec<_>>(),
        [drill.id, saw.id, tape.id]
    );
    assert_eq!(by_revenue[0].revenue, dec!(40.00));
    assert_eq!(items.top_selling_by_revenue(1).await.unwrap().len(), 1);
}
