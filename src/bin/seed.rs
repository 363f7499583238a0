use bistro_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    entity::reviews::{ActiveModel as ReviewActive, Entity as Reviews},
    models::{NewMenuItem, NewUser, Role},
    retry::RetryPolicy,
    store::{SeaStore, Store},
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url, config.db_connect_timeout).await?;
    // Ensure the schema exists.
    run_migrations(&orm).await?;
    let store = SeaStore::new(orm, RetryPolicy::default());

    let admin_email =
        std::env::var("SEED_ADMIN_EMAIL").unwrap_or_else(|_| "admin@bistro.example".to_string());
    let admin_id = ensure_admin(&store, &admin_email).await?;
    seed_menu(&store).await?;
    seed_reviews(&store).await?;

    println!("Seed completed. Admin ID: {admin_id}");
    Ok(())
}

async fn ensure_admin(store: &SeaStore, email: &str) -> anyhow::Result<Uuid> {
    let user = match store.find_user_by_email(email).await? {
        Some(user) => user,
        None => {
            store
                .insert_user(NewUser {
                    email: email.to_string(),
                    name: Some("Bistro Admin".to_string()),
                    photo_url: None,
                })
                .await?
        }
    };
    store.set_user_role(user.id, Role::Admin).await?;
    println!("Ensured admin {email}");
    Ok(user.id)
}

async fn seed_menu(store: &SeaStore) -> anyhow::Result<()> {
    let items = [
        ("Roast Duck Breast", "Roasted duck breast, sweet potato mash, cherry jus", "popular", 1450),
        ("Escalope de Veau", "Pan-fried veal cutlet with lemon butter", "popular", 1650),
        ("Tuna Niçoise", "Seared tuna, green beans, olives, soft egg", "salad", 1250),
        ("Fish Parmentier", "Cod, creamy potatoes, gruyère crust", "soup", 1350),
        ("Chocolate Lava Cake", "Warm chocolate cake, vanilla ice cream", "dessert", 850),
        ("Margherita", "Tomato, mozzarella, basil", "pizza", 1100),
        ("Sparkling Lemonade", "House lemonade with mint", "drinks", 450),
    ];

    let existing: Vec<String> = store
        .list_menu()
        .await?
        .into_iter()
        .map(|item| item.name)
        .collect();

    for (name, recipe, category, cents) in items {
        if existing.iter().any(|n| n == name) {
            continue;
        }
        store
            .insert_menu_item(NewMenuItem {
                name: name.to_string(),
                recipe: recipe.to_string(),
                image: None,
                category: category.to_string(),
                price: Decimal::new(cents, 2),
            })
            .await?;
    }

    println!("Seeded menu");
    Ok(())
}

async fn seed_reviews(store: &SeaStore) -> anyhow::Result<()> {
    let conn = store.connection();
    if Reviews::find().count(conn).await? > 0 {
        println!("Reviews already present");
        return Ok(());
    }

    let reviews = [
        ("Jane Doe", "The duck was cooked to perfection and the service was warm.", 5.0),
        ("Rahim", "Great salads, a little slow at lunch time.", 4.0),
        ("Mila", "Lovely desserts, will come back for the lava cake.", 4.5),
    ];
    for (name, details, rating) in reviews {
        ReviewActive {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            details: Set(details.to_string()),
            rating: Set(rating),
            created_at: Set(Utc::now().into()),
        }
        .insert(conn)
        .await?;
    }

    println!("Seeded reviews");
    Ok(())
}
