use rust_decimal::Decimal;
use storefront_api::{
    config::AppConfig,
    db::{create_pool, run_migrations},
    models::{NewUser, ProductFields},
    services::user_service::hash_password,
    store::{PgStore, ProductStore, UserStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(config.require_database_url()?).await?;
    // Ensure migrations are applied.
    run_migrations(&pool).await?;
    let store = PgStore::new(pool);

    let admin_id = ensure_user(&store, "admin", "admin@example.com", "admin123", true).await?;
    let user_id = ensure_user(&store, "player", "player@example.com", "player123", false).await?;
    let seeded = seed_products(&store).await?;

    println!("Seed completed. Admin ID: {admin_id}, User ID: {user_id}, products added: {seeded}");
    Ok(())
}

async fn ensure_user(
    store: &PgStore,
    username: &str,
    email: &str,
    password: &str,
    is_admin: bool,
) -> anyhow::Result<i64> {
    if let Some(id) = store.find_conflicting_user(username, email).await? {
        return Ok(id);
    }

    let password_hash = hash_password(password)?;
    let id = store
        .insert_user(&NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
            full_name: username.to_string(),
            is_admin,
        })
        .await?;
    Ok(id)
}

async fn seed_products(store: &PgStore) -> anyhow::Result<usize> {
    if !store.list_products().await?.is_empty() {
        return Ok(0);
    }

    let catalog = [
        ("Hollow Knight", "Metroidvania through a ruined bug kingdom", 1499, "Adventure", 25),
        ("Stardew Valley", "Farming and village life sim", 1499, "Simulation", 40),
        ("Celeste", "Precision platformer about climbing a mountain", 1999, "Platformer", 15),
        ("Hades", "Roguelike dungeon crawler out of the underworld", 2499, "Action", 30),
        ("Factorio", "Build and automate a factory", 3500, "Strategy", 10),
        ("Disco Elysium", "Detective role-playing game", 3999, "RPG", 8),
    ];

    for (name, description, cents, category, stock) in catalog {
        store
            .insert_product(&ProductFields {
                name: name.to_string(),
                description: description.to_string(),
                price: Decimal::new(cents, 2),
                category: category.to_string(),
                stock,
                image_url: String::new(),
            })
            .await?;
    }
    Ok(catalog.len())
}
