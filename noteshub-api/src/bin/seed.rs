//! Seeds the database with test tenants and users.
//!
//! Creates the `acme` and `globex` tenants on the free plan and four test
//! accounts, all with password "password":
//!
//! - admin@acme.test (Admin, Acme)
//! - user@acme.test (Member, Acme)
//! - admin@globex.test (Admin, Globex)
//! - user@globex.test (Member, Globex)
//!
//! Existing tenants, users, and notes are removed first.
//!
//! ```bash
//! cargo run -p noteshub-api --bin seed
//! ```

use noteshub_shared::auth::password::hash_password;
use noteshub_shared::db::pool::{create_pool, DatabaseConfig};
use noteshub_shared::models::tenant::{CreateTenant, Tenant, TenantPlan};
use noteshub_shared::models::user::{CreateUser, User, UserRole};
use sqlx::PgPool;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seed=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

    let pool = create_pool(DatabaseConfig {
        url: database_url,
        ..Default::default()
    })
    .await?;

    sqlx::migrate!("../migrations").run(&pool).await?;

    clear_existing_data(&pool).await?;
    tracing::info!("Cleared existing data");

    let acme = Tenant::create(
        &pool,
        CreateTenant {
            name: "Acme Corporation".to_string(),
            slug: "acme".to_string(),
            plan: TenantPlan::Free,
        },
    )
    .await?;

    let globex = Tenant::create(
        &pool,
        CreateTenant {
            name: "Globex Corporation".to_string(),
            slug: "globex".to_string(),
            plan: TenantPlan::Free,
        },
    )
    .await?;

    tracing::info!("Created tenants");

    let password_hash = hash_password("password")
        .map_err(|err| anyhow::anyhow!("Failed to hash seed password: {}", err))?;

    let test_users = [
        ("admin@acme.test", UserRole::Admin, acme.id),
        ("user@acme.test", UserRole::Member, acme.id),
        ("admin@globex.test", UserRole::Admin, globex.id),
        ("user@globex.test", UserRole::Member, globex.id),
    ];

    for (email, role, tenant_id) in test_users {
        User::create(
            &pool,
            CreateUser {
                email: email.to_string(),
                password_hash: password_hash.clone(),
                role,
                tenant_id,
            },
        )
        .await?;
    }

    tracing::info!("Created test users");
    tracing::info!("Database seeded successfully");
    tracing::info!("Test accounts (all with password \"password\"):");
    tracing::info!("- admin@acme.test (Admin, Acme)");
    tracing::info!("- user@acme.test (Member, Acme)");
    tracing::info!("- admin@globex.test (Admin, Globex)");
    tracing::info!("- user@globex.test (Member, Globex)");

    Ok(())
}

/// Removes all rows; notes go first so the user/tenant deletes do not
/// depend on cascade order.
async fn clear_existing_data(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM notes").execute(pool).await?;
    sqlx::query("DELETE FROM users").execute(pool).await?;
    sqlx::query("DELETE FROM tenants").execute(pool).await?;
    Ok(())
}
