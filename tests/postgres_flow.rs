use std::time::Duration;

use bistro_api::{
    db::{create_orm_conn, run_migrations},
    models::{MenuItemPatch, NewCartItem, NewMenuItem, NewPayment, NewUser, Role},
    retry::RetryPolicy,
    store::{SeaStore, Store, StoreError},
};
use rust_decimal::Decimal;
use uuid::Uuid;

// Store round trip against a real database: menu edits, cart, payment and cleanup.
#[tokio::test]
async fn cart_payment_and_cleanup_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run store flow tests.");
            return Ok(());
        }
    };

    let conn = create_orm_conn(&database_url, Duration::from_secs(5)).await?;
    run_migrations(&conn).await?;
    let store = SeaStore::new(conn, RetryPolicy::default());
    store.truncate_all().await?;

    // Users
    let diner = store
        .insert_user(NewUser {
            email: "diner@bistro.test".into(),
            name: Some("Diner".into()),
            photo_url: None,
        })
        .await?;
    let dup = store
        .insert_user(NewUser {
            email: "diner@bistro.test".into(),
            name: None,
            photo_url: None,
        })
        .await;
    assert!(matches!(dup, Err(StoreError::Conflict(_))));

    let promoted = store.set_user_role(diner.id, Role::Admin).await?;
    assert_eq!(promoted.matched_count, 1);
    let stored = store.find_user_by_email("diner@bistro.test").await?;
    assert!(stored.is_some_and(|u| u.is_admin()));

    // Menu
    let duck = store
        .insert_menu_item(NewMenuItem {
            name: "Roast Duck Breast".into(),
            recipe: "Duck, sweet potato, cherry jus".into(),
            image: None,
            category: "popular".into(),
            price: Decimal::new(1450, 2),
        })
        .await?;
    let updated = store
        .update_menu_item(
            duck.id,
            MenuItemPatch {
                price: Some(Decimal::new(1500, 2)),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(updated.matched_count, 1);
    let reloaded = store.find_menu_item(duck.id).await?.expect("menu item");
    assert_eq!(reloaded.price, Decimal::new(1500, 2));

    // Cart
    let mut cart_ids = Vec::new();
    for _ in 0..2 {
        let item = store
            .insert_cart_item(NewCartItem {
                email: diner.email.clone(),
                menu_id: duck.id,
                name: duck.name.clone(),
                image: None,
                price: reloaded.price,
            })
            .await?;
        cart_ids.push(item.id);
    }
    let other = store
        .insert_cart_item(NewCartItem {
            email: "other@bistro.test".into(),
            menu_id: duck.id,
            name: duck.name.clone(),
            image: None,
            price: reloaded.price,
        })
        .await?;

    // Payment, replayed with the same key
    let key = Uuid::new_v4();
    let payment = NewPayment {
        idempotency_key: key,
        email: diner.email.clone(),
        amount: Decimal::new(3000, 2),
        transaction_id: Some("pi_test_3000".into()),
        cart_ids: [cart_ids.clone(), vec![other.id]].concat(),
        menu_item_ids: vec![duck.id],
        status: "pending".into(),
    };
    let first = store.insert_payment(payment.clone()).await?;
    let second = store.insert_payment(payment).await?;
    assert!(first.created);
    assert!(!second.created);
    assert_eq!(first.payment.id, second.payment.id);
    assert_eq!(first.payment.cart_ids.len(), 3);

    let cleared = store
        .delete_cart_items(&first.payment.email, &first.payment.cart_ids)
        .await?;
    assert_eq!(cleared.deleted_count, 2);
    assert!(store.list_cart_items(&diner.email).await?.is_empty());
    assert_eq!(store.list_cart_items("other@bistro.test").await?.len(), 1);

    let history = store.list_payments(&diner.email).await?;
    assert_eq!(history.len(), 1);

    store.truncate_all().await?;
    Ok(())
}
