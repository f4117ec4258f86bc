//! Property-based tests for the stock and order arithmetic.

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use warehouse_inventory::entities::{inventory_item, order, order_item, OrderWithItems};

fn price_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn line_strategy() -> impl Strategy<Value = order_item::Model> {
    (1i64..1000, 1i32..500, price_strategy())
        .prop_map(|(product_id, quantity, price)| order_item::Model::new(product_id, quantity, price))
}

#[derive(Debug, Clone)]
enum LineOp {
    Add(order_item::Model),
    Remove(usize),
}

fn line_op_strategy() -> impl Strategy<Value = LineOp> {
    prop_oneof![
        line_strategy().prop_map(LineOp::Add),
        (0usize..8).prop_map(LineOp::Remove),
    ]
}

fn expected_total(order: &OrderWithItems) -> Decimal {
    let subtotal: Decimal = order
        .items
        .iter()
        .map(|item| item.unit_price * Decimal::from(item.quantity))
        .sum();
    subtotal
        + order.order.tax.unwrap_or_default()
        + order.order.shipping_cost.unwrap_or_default()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn adding_increases_quantity_by_exactly_the_amount(
        quantity in 0i32..1_000_000,
        to_add in 0i32..1_000_000,
    ) {
        let mut item = inventory_item::Model::new(1, 1, quantity);
        let result = item.add_quantity(to_add).unwrap();
        prop_assert_eq!(result, quantity + to_add);
        prop_assert_eq!(item.quantity, quantity + to_add);
    }

    #[test]
    fn removing_respects_bounds(quantity in 0i32..10_000, to_remove in -100i32..20_000) {
        let mut item = inventory_item::Model::new(1, 1, quantity);
        let result = item.remove_quantity(to_remove);
        if to_remove < 0 || to_remove > quantity {
            prop_assert!(result.is_err());
            prop_assert_eq!(item.quantity, quantity);
        } else {
            prop_assert_eq!(result.unwrap(), quantity - to_remove);
            prop_assert_eq!(item.quantity, quantity - to_remove);
        }
    }

    #[test]
    fn reorder_is_due_at_or_below_the_reorder_point(
        quantity in any::<i32>(),
        reorder_point in any::<i32>(),
    ) {
        let mut item = inventory_item::Model::new(1, 1, 0);
        item.quantity = quantity;
        item.reorder_point = reorder_point;
        prop_assert_eq!(item.needs_reorder(), quantity <= reorder_point);
    }

    #[test]
    fn zero_quantity_lines_have_zero_subtotal(price in price_strategy()) {
        let mut line = order_item::Model::new(1, 1, price);
        line.set_quantity(0);
        prop_assert_eq!(line.subtotal, Decimal::ZERO);
    }

    #[test]
    fn totals_follow_every_line_change(
        tax in proptest::option::of(price_strategy()),
        shipping in proptest::option::of(price_strategy()),
        ops in proptest::collection::vec(line_op_strategy(), 0..20),
    ) {
        let mut draft = order::Model::new("SO-1", "Robin");
        draft.tax = tax;
        draft.shipping_cost = shipping;
        let mut order = OrderWithItems::new(draft);
        prop_assert_eq!(order.total(), expected_total(&order));

        for op in ops {
            match op {
                LineOp::Add(line) => order.add_item(line),
                LineOp::Remove(index) => {
                    let before = order.items.len();
                    let removed = order.remove_item(index);
                    prop_assert_eq!(removed.is_some(), index < before);
                }
            }
            prop_assert_eq!(order.total(), expected_total(&order));
        }
    }
}

#[test]
fn subtotal_of_three_at_nine_ninety_nine() {
    let line = order_item::Model::new(1, 3, dec!(9.99));
    assert_eq!(line.subtotal, dec!(29.97));
}

#[test]
fn totals_of_two_lines_with_tax_and_shipping() {
    let mut first = order_item::Model::new(1, 1, dec!(10.00));
    first.subtotal = dec!(10.00);
    let second = order_item::Model::new(2, 1, dec!(5.50));

    let mut draft = order::Model::new("SO-1", "Robin");
    draft.tax = Some(dec!(1.00));
    draft.shipping_cost = Some(dec!(2.00));
    draft.calculate_totals(&[first, second]);

    assert_eq!(draft.subtotal, dec!(15.50));
    assert_eq!(draft.total, dec!(18.50));
}
