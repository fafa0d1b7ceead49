//! Seed the database with the demo catalog and demo users.
//!
//! Safe to run repeatedly: the catalog is only inserted into an empty
//! `product` table and each demo user only when its name is free.

use sqlx::PgPool;

use restore_api::db::products::NewProduct;
use restore_api::db::{ProductRepository, UserRepository};
use restore_api::models::user::MEMBER_ROLE;
use restore_api::services::auth::hash_password;
use restore_core::{Email, Price};

use super::CommandError;

const DEMO_PASSWORD: &str = "Pa$$w0rd";
const ADMIN_ROLE: &str = "Admin";

const DESCRIPTION: &str = "Lorem ipsum dolor sit amet, consectetuer adipiscing elit. \
    Maecenas porttitor congue massa. Fusce posuere, magna sed pulvinar ultricies, \
    purus lectus malesuada libero, sit amet commodo magna eros quis urna.";

/// (name, price in cents, picture, type, brand)
const CATALOG: &[(&str, i64, &str, &str, &str)] = &[
    ("Angular Speedster Board 2000", 20000, "sb-ang1.png", "Boards", "Angular"),
    ("Green Angular Board 3000", 15000, "sb-ang2.png", "Boards", "Angular"),
    ("Core Board Speed Rush 3", 18000, "sb-core1.png", "Boards", "NetCore"),
    ("Net Core Super Board", 30000, "sb-core2.png", "Boards", "NetCore"),
    ("React Board Super Whizzy Fast", 25000, "sb-react1.png", "Boards", "React"),
    ("Typescript Entry Board", 12000, "sb-ts1.png", "Boards", "TypeScript"),
    ("Core Blue Hat", 1000, "hat-core1.png", "Hats", "NetCore"),
    ("Green React Woolen Hat", 8000, "hat-react1.png", "Hats", "React"),
    ("Purple React Woolen Hat", 1500, "hat-react2.png", "Hats", "React"),
    ("Blue Code Gloves", 1800, "glove-code1.png", "Gloves", "VS Code"),
    ("Green Code Gloves", 1500, "glove-code2.png", "Gloves", "VS Code"),
    ("Purple React Gloves", 1600, "glove-react1.png", "Gloves", "React"),
    ("Green React Gloves", 1400, "glove-react2.png", "Gloves", "React"),
    ("Redis Red Boots", 25000, "boot-redis1.png", "Boots", "Redis"),
    ("Core Red Boots", 18999, "boot-core2.png", "Boots", "NetCore"),
    ("Core Purple Boots", 19999, "boot-core1.png", "Boots", "NetCore"),
    ("Angular Purple Boots", 15000, "boot-ang2.png", "Boots", "Angular"),
    ("Angular Blue Boots", 18000, "boot-ang1.png", "Boots", "Angular"),
];

/// (user name, email, roles)
const USERS: &[(&str, &str, &[&str])] = &[
    ("bob", "bob@test.com", &[MEMBER_ROLE]),
    ("admin", "admin@test.com", &[MEMBER_ROLE, ADMIN_ROLE]),
];

/// Seed catalog and users.
///
/// # Errors
///
/// Returns `CommandError` if a query or password hash fails.
pub async fn run(pool: &PgPool) -> Result<(), CommandError> {
    seed_users(pool).await?;
    seed_catalog(pool).await?;
    tracing::info!("Seeding complete");
    Ok(())
}

async fn seed_users(pool: &PgPool) -> Result<(), CommandError> {
    let users = UserRepository::new(pool);

    for (user_name, email, roles) in USERS {
        if users.user_name_exists(user_name).await? {
            tracing::info!(user_name, "User already exists, skipping");
            continue;
        }

        let email =
            Email::parse(email).map_err(|e| CommandError::InvalidSeed(format!("{email}: {e}")))?;
        let hash = hash_password(DEMO_PASSWORD)?;
        let user = users.create(user_name, &email, &hash, roles).await?;
        tracing::info!(user_id = %user.id, user_name, "Created demo user");
    }
    Ok(())
}

async fn seed_catalog(pool: &PgPool) -> Result<(), CommandError> {
    let products = ProductRepository::new(pool);

    if products.count().await? > 0 {
        tracing::info!("Catalog already seeded, skipping");
        return Ok(());
    }

    for (name, price, picture, product_type, brand) in CATALOG {
        let picture_url = format!("/images/products/{picture}");
        products
            .insert(&NewProduct {
                name,
                description: DESCRIPTION,
                price: Price::from_minor(*price),
                picture_url: &picture_url,
                product_type,
                brand,
                quantity_in_stock: 100,
            })
            .await?;
    }

    tracing::info!(count = CATALOG.len(), "Inserted demo catalog");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn test_catalog_covers_every_brand_and_type() {
        let brands: BTreeSet<&str> = CATALOG.iter().map(|p| p.4).collect();
        let types: BTreeSet<&str> = CATALOG.iter().map(|p| p.3).collect();

        assert_eq!(
            brands.into_iter().collect::<Vec<_>>(),
            vec!["Angular", "NetCore", "React", "Redis", "TypeScript", "VS Code"]
        );
        assert_eq!(
            types.into_iter().collect::<Vec<_>>(),
            vec!["Boards", "Boots", "Gloves", "Hats"]
        );
    }

    #[test]
    fn test_catalog_names_unique_and_prices_positive() {
        let names: BTreeSet<&str> = CATALOG.iter().map(|p| p.0).collect();
        assert_eq!(names.len(), CATALOG.len());
        assert!(CATALOG.iter().all(|p| p.1 > 0));
    }

    #[test]
    fn test_demo_password_passes_registration_rules() {
        assert!(restore_api::services::auth::validation::validate_password(DEMO_PASSWORD).is_empty());
    }

    #[test]
    fn test_demo_emails_parse() {
        assert!(USERS.iter().all(|(_, email, _)| Email::parse(email).is_ok()));
    }
}
