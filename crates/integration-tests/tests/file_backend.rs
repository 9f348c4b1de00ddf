//! The local file backend across restarts.

#![allow(clippy::unwrap_used)]

use std::path::Path;

use wholesale_core::OrderStatus;
use wholesale_integration_tests::test_config;
use wholesale_storefront::config::BackendConfig;
use wholesale_storefront::db::keys;
use wholesale_storefront::services::CheckoutForm;
use wholesale_storefront::{Storefront, StorefrontConfig};

fn config(dir: &Path, seed_catalog: bool) -> StorefrontConfig {
    StorefrontConfig {
        backend: BackendConfig::Local {
            data_dir: dir.to_path_buf(),
        },
        ..test_config(seed_catalog)
    }
}

#[tokio::test]
async fn test_everything_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();

    let order = {
        let shop = Storefront::open(config(dir.path(), true)).await.unwrap();
        assert_eq!(shop.catalog().list().await.len(), 12);

        let rice = shop.catalog().search("rice", None).await.pop().unwrap();
        shop.cart().add(&rice, 2).await.unwrap();
        let order = shop
            .checkout()
            .place_order(&CheckoutForm {
                name: "Ali".to_owned(),
                phone: "03001234567".to_owned(),
                address: "Main Bazaar".to_owned(),
            })
            .await
            .unwrap();
        shop.orders()
            .set_status(&order.id, OrderStatus::Confirmed)
            .await
            .unwrap();
        order
    };

    for key in [keys::PRODUCTS, keys::CART, keys::ORDERS, keys::CUSTOMERS] {
        assert!(dir.path().join(format!("{key}.json")).exists(), "{key}");
    }

    // Seeding is skipped once products exist.
    let shop = Storefront::open(config(dir.path(), true)).await.unwrap();
    assert_eq!(shop.catalog().list().await.len(), 12);

    let stored = shop.orders().get(&order.id).await.unwrap();
    assert_eq!(stored.status, OrderStatus::Confirmed);
    let rice = shop
        .catalog()
        .get(&stored.items.first().unwrap().product.id)
        .await
        .unwrap();
    assert_eq!(rice.stock, 98);
    assert!(shop.cart().is_empty().await);
    assert_eq!(shop.customers().list().await.len(), 1);
}

#[tokio::test]
async fn test_cart_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    {
        let shop = Storefront::open(config(dir.path(), true)).await.unwrap();
        let tea = shop.catalog().search("tea", None).await.pop().unwrap();
        shop.cart().add(&tea, 3).await.unwrap();
    }

    let shop = Storefront::open(config(dir.path(), false)).await.unwrap();
    assert_eq!(shop.cart().count().await, 3);
}

#[tokio::test]
async fn test_negative_stock_on_disk_loads_as_zero() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(format!("{}.json", keys::PRODUCTS)),
        r#"[{"id":"1","name":"Rice (25kg)","category":"Grains","price":3500,"stock":-2},
            {"id":"2","name":"Oil","category":"Cooking","price":"250","stock":4}]"#,
    )
    .unwrap();

    let shop = Storefront::open(config(dir.path(), true)).await.unwrap();

    let products = shop.catalog().list().await;
    assert_eq!(products.len(), 2);
    let rice = shop
        .catalog()
        .get(&wholesale_core::ProductId::new("1"))
        .await
        .unwrap();
    assert_eq!(rice.stock, 0);
    let oil = shop
        .catalog()
        .get(&wholesale_core::ProductId::new("2"))
        .await
        .unwrap();
    assert_eq!(oil.stock, 4);
    assert_eq!(oil.price, wholesale_core::Price::from_rupees(250));
}
