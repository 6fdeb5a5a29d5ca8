use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum_venue_rental_api::{config::AppConfig, db::create_pool};
use rust_decimal::Decimal;
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let admin_id = ensure_user(&pool, "admin@example.com", "admin123", "ADMIN").await?;
    let vendor_id = ensure_user(&pool, "vendor@example.com", "vendor123", "VENDOR").await?;
    let renter_id = ensure_user(&pool, "renter@example.com", "renter123", "RENTER").await?;
    seed_venues(&pool, vendor_id).await?;

    println!("Seed completed. Admin: {admin_id}, Vendor: {vendor_id}, Renter: {renter_id}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    email: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, full_name, role)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(format!("Seed {role}"))
    .bind(role)
    .fetch_optional(pool)
    .await?;

    // If user already exists, fetch id
    let user_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) = sqlx::query_as("SELECT id FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    println!("Ensured user {email} (role={role})");
    Ok(user_id)
}

async fn seed_venues(pool: &sqlx::PgPool, owner_id: Uuid) -> anyhow::Result<()> {
    let venues = vec![
        (
            "Riverside Pavilion",
            "Open-air pavilion with a river view",
            "Austin",
            "12 Riverside Dr",
            150,
            Decimal::new(85000, 2),
        ),
        (
            "Downtown Loft",
            "Industrial loft for mid-size receptions",
            "Austin",
            "401 Brazos St",
            80,
            Decimal::new(52000, 2),
        ),
        (
            "Garden Terrace",
            "Walled garden with a covered terrace",
            "Dallas",
            "9 Magnolia Ave",
            120,
            Decimal::new(67500, 2),
        ),
    ];

    for (name, desc, city, address, capacity, price) in venues {
        sqlx::query(
            r#"
            INSERT INTO venues
                (id, owner_id, name, description, city, address, capacity, price_per_day)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (owner_id, name) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(name)
        .bind(desc)
        .bind(city)
        .bind(address)
        .bind(capacity)
        .bind(price)
        .execute(pool)
        .await?;
    }

    println!("Seeded venues");
    Ok(())
}
