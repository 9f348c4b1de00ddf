//! Orders after checkout: status changes, stock, customers and WhatsApp.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use wholesale_core::{OrderStatus, Price};
use wholesale_integration_tests::{FlakyStore, stock_product, storefront};
use wholesale_storefront::Storefront;
use wholesale_storefront::services::CheckoutForm;

async fn place(shop: &Storefront, phone: &str, name: &str, address: &str) -> wholesale_core::Order {
    shop.checkout()
        .place_order(&CheckoutForm {
            name: name.to_owned(),
            phone: phone.to_owned(),
            address: address.to_owned(),
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn test_confirming_twice_decrements_stock_once() {
    let shop = storefront(Arc::new(FlakyStore::new())).await.unwrap();
    let rice = stock_product(&shop, "Rice", 100, 10).await.unwrap();
    shop.cart().add(&rice, 4).await.unwrap();
    let order = place(&shop, "03001234567", "Ali", "Main Bazaar").await;

    let first = shop
        .orders()
        .set_status(&order.id, OrderStatus::Confirmed)
        .await
        .unwrap();
    assert_eq!(first.previous, OrderStatus::Pending);
    assert!(first.adjusted_stock());
    assert_eq!(shop.catalog().get(&rice.id).await.unwrap().stock, 6);

    let second = shop
        .orders()
        .set_status(&order.id, OrderStatus::Confirmed)
        .await
        .unwrap();
    assert!(!second.adjusted_stock());
    assert_eq!(shop.catalog().get(&rice.id).await.unwrap().stock, 6);

    // Moving on and back into Confirmed decrements again.
    shop.orders()
        .set_status(&order.id, OrderStatus::Delivered)
        .await
        .unwrap();
    shop.orders()
        .set_status(&order.id, OrderStatus::Confirmed)
        .await
        .unwrap();
    assert_eq!(shop.catalog().get(&rice.id).await.unwrap().stock, 2);
}

#[tokio::test]
async fn test_confirmation_clamps_stock_at_zero() {
    let shop = storefront(Arc::new(FlakyStore::new())).await.unwrap();
    let rice = stock_product(&shop, "Rice", 100, 5).await.unwrap();
    shop.cart().add(&rice, 5).await.unwrap();
    let order = place(&shop, "03001234567", "Ali", "Main Bazaar").await;

    let mut scarce = shop.catalog().get(&rice.id).await.unwrap();
    scarce.stock = 2;
    shop.catalog().update(scarce).await.unwrap();

    let change = shop
        .orders()
        .set_status(&order.id, OrderStatus::Confirmed)
        .await
        .unwrap();

    let adjustment = change.adjustments.first().unwrap();
    assert!(adjustment.is_short());
    assert_eq!(adjustment.shortfall, 3);
    assert_eq!(shop.catalog().get(&rice.id).await.unwrap().stock, 0);
    assert_eq!(
        shop.orders().get(&order.id).await.unwrap().status,
        OrderStatus::Confirmed
    );
}

#[tokio::test]
async fn test_orders_from_one_phone_build_one_customer() {
    let shop = storefront(Arc::new(FlakyStore::new())).await.unwrap();
    let rice = stock_product(&shop, "Rice", 100, 50).await.unwrap();

    shop.cart().add(&rice, 2).await.unwrap();
    let first = place(&shop, "03001234567", "Ali", "Old Shop").await;
    shop.cart().add(&rice, 3).await.unwrap();
    let second = place(&shop, "+92 300 1234567", "Ali Traders", "New Shop").await;

    let customers = shop.customers().list().await;
    assert_eq!(customers.len(), 1);
    let customer = customers.first().unwrap();
    assert_eq!(customer.total_orders, 2);
    assert_eq!(customer.total_spent, Price::from_rupees(500));
    assert_eq!(customer.name, "Ali Traders");
    assert_eq!(customer.address, "New Shop");
    assert_eq!(customer.last_order_date, second.order_date);
    assert_eq!(customer.orders, vec![first.id, second.id.clone()]);

    let newest = shop.orders().list().await;
    assert_eq!(newest.first().unwrap().id, second.id);
}

#[tokio::test]
async fn test_whatsapp_link_for_order() {
    let shop = storefront(Arc::new(FlakyStore::new())).await.unwrap();
    let rice = stock_product(&shop, "Rice", 100, 10).await.unwrap();
    shop.cart().add(&rice, 2).await.unwrap();
    let order = place(&shop, "0300-1234567", "Ali", "Main Bazaar").await;

    let message = shop.orders().whatsapp_message(&order);
    assert!(message.starts_with("Hello Ali!\n\n"));
    assert!(message.contains(&format!("Your order #{} has been received", order.id)));
    assert!(message.contains("1. Rice - 2 x Rs.100 = Rs.200\n"));
    assert!(message.contains("*Total Amount: Rs.200*"));
    assert!(message.ends_with("Please reply with *YES* to confirm this order.\n\nThank you!"));

    let link = shop.orders().whatsapp_link(&order);
    assert!(link.starts_with("https://wa.me/923001234567?text=Hello%20Ali!"));
    assert!(link.contains("Rs.100%20%3D%20Rs.200"));
    assert!(!link.contains(' '));
}

#[tokio::test]
async fn test_order_keeps_snapshot_after_product_changes() {
    let shop = storefront(Arc::new(FlakyStore::new())).await.unwrap();
    let rice = stock_product(&shop, "Rice", 100, 10).await.unwrap();
    shop.cart().add(&rice, 2).await.unwrap();
    let order = place(&shop, "03001234567", "Ali", "Main Bazaar").await;

    let mut repriced = shop.catalog().get(&rice.id).await.unwrap();
    repriced.price = Price::from_rupees(150);
    shop.catalog().update(repriced).await.unwrap();
    shop.catalog().delete(&rice.id).await.unwrap();

    let stored = shop.orders().get(&order.id).await.unwrap();
    assert_eq!(stored.items.first().unwrap().product.price, Price::from_rupees(100));
    assert_eq!(stored.total_amount, Price::from_rupees(200));

    // Confirming with the product gone reports the line but still
    // records the status.
    let change = shop
        .orders()
        .set_status(&order.id, OrderStatus::Confirmed)
        .await
        .unwrap();
    assert_eq!(change.failures.len(), 1);
    assert_eq!(change.order.status, OrderStatus::Confirmed);
}

#[tokio::test]
async fn test_delete_order_leaves_customer_totals() {
    let shop = storefront(Arc::new(FlakyStore::new())).await.unwrap();
    let rice = stock_product(&shop, "Rice", 100, 10).await.unwrap();
    shop.cart().add(&rice, 1).await.unwrap();
    let order = place(&shop, "03001234567", "Ali", "Main Bazaar").await;

    shop.orders().delete(&order.id).await.unwrap();

    assert!(shop.orders().get(&order.id).await.is_none());
    let customer = shop
        .customers()
        .find_by_phone(&order.customer_phone)
        .await
        .unwrap();
    assert_eq!(customer.total_orders, 1);
}
