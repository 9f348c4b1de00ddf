//! Admin panel over a live storefront.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use wholesale_admin::{AdminConfig, AdminError, AdminState};
use wholesale_core::{OrderStatus, Price, ProductDraft};
use wholesale_integration_tests::{FlakyStore, admin, product, stock_product, storefront};
use wholesale_storefront::services::CheckoutForm;

fn form(phone: &str) -> CheckoutForm {
    CheckoutForm {
        name: "Ali".to_owned(),
        phone: phone.to_owned(),
        address: "Main Bazaar".to_owned(),
    }
}

#[tokio::test]
async fn test_operations_require_login() {
    let dir = tempfile::tempdir().unwrap();
    let shop = storefront(Arc::new(FlakyStore::new())).await.unwrap();
    let config = AdminConfig {
        invoice_dir: dir.path().to_path_buf(),
        ..AdminConfig::default()
    };
    let panel = AdminState::new(shop.clone(), config).await.unwrap();

    assert!(!panel.is_logged_in());
    assert!(matches!(
        panel.add_product(product("Rice", 100, 10)).await,
        Err(AdminError::Unauthorized)
    ));
    assert!(matches!(panel.orders(None).await, Err(AdminError::Unauthorized)));
    assert!(matches!(panel.dashboard().await, Err(AdminError::Unauthorized)));
    assert!(shop.catalog().list().await.is_empty());

    assert!(panel.login("admin", "wrong").await.is_err());
    assert!(!panel.is_logged_in());

    panel.login("admin", "admin123").await.unwrap();
    panel.add_product(product("Rice", 100, 10)).await.unwrap();
    assert_eq!(shop.catalog().list().await.len(), 1);

    panel.logout().await.unwrap();
    assert!(matches!(panel.customers().await, Err(AdminError::Unauthorized)));
}

#[tokio::test]
async fn test_login_survives_restart_on_same_backend() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FlakyStore::new());
    let shop = storefront(store.clone()).await.unwrap();
    admin(shop, dir.path()).await.unwrap();

    let reopened = storefront(store.clone()).await.unwrap();
    let config = AdminConfig {
        invoice_dir: dir.path().to_path_buf(),
        ..AdminConfig::default()
    };
    let panel = AdminState::new(reopened, config).await.unwrap();
    assert!(panel.is_logged_in());
}

#[tokio::test]
async fn test_order_workflow_from_admin() {
    let dir = tempfile::tempdir().unwrap();
    let shop = storefront(Arc::new(FlakyStore::new())).await.unwrap();
    let panel = admin(shop.clone(), dir.path()).await.unwrap();

    let rice = panel
        .add_product(ProductDraft {
            cost_price: Price::from_rupees(70),
            ..product("Rice", 100, 10)
        })
        .await
        .unwrap();
    shop.cart().add(&rice, 3).await.unwrap();
    let order = shop.checkout().place_order(&form("03001234567")).await.unwrap();

    let link = panel.send_whatsapp(&order.id).await.unwrap();
    assert!(link.starts_with("https://wa.me/923001234567?text="));
    assert_eq!(
        panel.order(&order.id).await.unwrap().status,
        OrderStatus::WhatsappSent
    );

    let change = panel
        .set_order_status(&order.id, OrderStatus::Confirmed)
        .await
        .unwrap();
    assert!(change.adjusted_stock());
    assert_eq!(shop.catalog().get(&rice.id).await.unwrap().stock, 7);

    let confirmed = panel.orders(Some(OrderStatus::Confirmed)).await.unwrap();
    assert_eq!(confirmed.len(), 1);
    assert!(panel.orders(Some(OrderStatus::Pending)).await.unwrap().is_empty());

    let metrics = panel.dashboard().await.unwrap();
    assert_eq!(metrics.order_count, 1);
    assert_eq!(metrics.revenue, Price::from_rupees(300));
    assert_eq!(metrics.profit, Price::from_rupees(90));
    assert_eq!(metrics.top_products.first().unwrap().quantity, 3);

    panel.invoice(&order.id).await.unwrap();
    let invoice =
        std::fs::read_to_string(dir.path().join(format!("invoice-{}.txt", order.id))).unwrap();
    assert!(invoice.contains("Ali"));
    assert!(invoice.contains("Rice"));

    panel.delete_order(&order.id).await.unwrap();
    assert!(matches!(
        panel.order(&order.id).await,
        Err(AdminError::Store(_))
    ));
}

#[tokio::test]
async fn test_start_order_for_existing_customer() {
    let dir = tempfile::tempdir().unwrap();
    let shop = storefront(Arc::new(FlakyStore::new())).await.unwrap();
    let panel = admin(shop.clone(), dir.path()).await.unwrap();
    let rice = stock_product(&shop, "Rice", 100, 10).await.unwrap();

    shop.cart().add(&rice, 1).await.unwrap();
    shop.checkout().place_order(&form("03001234567")).await.unwrap();

    let customers = panel.customers().await.unwrap();
    let customer = customers.first().unwrap();
    let selected = panel.start_order_for(&customer.id).await.unwrap();

    assert_eq!(selected.id, customer.id);
    assert_eq!(shop.customers().active().unwrap().phone, customer.phone);
}

#[tokio::test]
async fn test_outbox_replay_from_admin() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FlakyStore::new());
    let shop = storefront(store.clone()).await.unwrap();
    let panel = admin(shop.clone(), dir.path()).await.unwrap();
    let rice = stock_product(&shop, "Rice", 100, 10).await.unwrap();

    store
        .fail_writes(wholesale_storefront::db::keys::CUSTOMERS)
        .await;
    shop.cart().add(&rice, 1).await.unwrap();
    let order = shop.checkout().place_order(&form("03001234567")).await.unwrap();
    assert_eq!(panel.pending_customer_updates().await.unwrap(), vec![order.id]);

    store.heal(wholesale_storefront::db::keys::CUSTOMERS).await;
    assert_eq!(panel.replay_customer_outbox().await.unwrap(), 1);
    assert_eq!(panel.customers().await.unwrap().len(), 1);
}
