use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use grua_ops_api::{
    config::AppConfig,
    db::{create_pool, orm_from_pool, run_migrations},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,grua_ops_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    let pool = create_pool(&config.database_url).await?;
    run_migrations(&orm_from_pool(&pool)).await?;

    let admin_id = ensure_user(&pool, "admin@grua.local", "admin12345", "admin").await?;
    let supervisor_id =
        ensure_user(&pool, "supervisor@grua.local", "supervisor123", "supervisor").await?;
    let operator_id = ensure_user(&pool, "operador@grua.local", "operador123", "employee").await?;

    ensure_employee(&pool, supervisor_id, "Marina Costa", "Supervisora de Obras").await?;
    let operator = ensure_employee(&pool, operator_id, "João Pereira", "Operador de Grua").await?;

    seed_stock(&pool, admin_id).await?;
    let client_id = ensure_client(&pool).await?;
    seed_site(&pool, client_id, operator, admin_id).await?;

    tracing::info!(%admin_id, %supervisor_id, %operator_id, "seed completed");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    email: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, role)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .fetch_one(pool)
    .await?;

    tracing::info!(email, role, "ensured user");
    Ok(id)
}

async fn ensure_employee(
    pool: &sqlx::PgPool,
    user_id: Uuid,
    name: &str,
    job_title: &str,
) -> anyhow::Result<Uuid> {
    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO employees (id, user_id, name, job_title, status, hired_at)
        VALUES ($1, $2, $3, $4, 'Ativo', CURRENT_DATE)
        ON CONFLICT (user_id) DO UPDATE SET name = EXCLUDED.name
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(name)
    .bind(job_title)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

async fn ensure_category(
    pool: &sqlx::PgPool,
    name: &str,
    description: &str,
) -> anyhow::Result<Uuid> {
    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO categories (id, name, description)
        VALUES ($1, $2, $3)
        ON CONFLICT (name) DO UPDATE SET description = EXCLUDED.description
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(description)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

async fn seed_stock(pool: &sqlx::PgPool, responsible: Uuid) -> anyhow::Result<()> {
    let cabling = ensure_category(pool, "Cabos e Acessórios", "Cabos de aço e laços").await?;
    let parts = ensure_category(pool, "Peças de Reposição", "Componentes mecânicos").await?;

    // (name, category, unit, price in centavos, min, max, available)
    let products = [
        ("Cabo de aço 12mm", cabling, "M", 4_500_i64, 200, Some(1_000), 150),
        ("Manilha 3/4", cabling, "UN", 8_900, 20, Some(100), 28),
        ("Rolamento da lança", parts, "UN", 125_000, 4, Some(12), 10),
        ("Óleo hidráulico", parts, "L", 3_200, 50, None, 40),
    ];

    for (name, category_id, unit, price, min, max, available) in products {
        let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM products WHERE name = $1")
            .bind(name)
            .fetch_optional(pool)
            .await?;
        if exists.is_some() {
            continue;
        }

        let mut tx = pool.begin().await?;
        let product_id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO products (id, name, category_id, unit, unit_price, min_stock, max_stock)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(product_id)
        .bind(name)
        .bind(category_id)
        .bind(unit)
        .bind(price)
        .bind(min)
        .bind(max)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO stock_levels
                (product_id, available, reserved, total_value, last_movement_at)
            VALUES ($1, $2, 0, $3, now())
            "#,
        )
        .bind(product_id)
        .bind(available)
        .bind(price * i64::from(available))
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO stock_movements
                (id, product_id, movement_type, quantity, quantity_before, quantity_after,
                 reason, responsible_id)
            VALUES ($1, $2, 'ENTRADA', $3, 0, $3, 'Estoque inicial', $4)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(product_id)
        .bind(available)
        .bind(responsible)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
    }

    tracing::info!("seeded stock");
    Ok(())
}

async fn ensure_client(pool: &sqlx::PgPool) -> anyhow::Result<Uuid> {
    let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM clients WHERE cnpj = $1")
        .bind("12345678000190")
        .fetch_optional(pool)
        .await?;
    if let Some((id,)) = existing {
        return Ok(id);
    }
    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO clients (id, name, cnpj, email)
        VALUES ($1, 'Construtora Horizonte', '12345678000190', 'contato@horizonte.local')
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .fetch_one(pool)
    .await?;
    Ok(id)
}

async fn seed_site(
    pool: &sqlx::PgPool,
    client_id: Uuid,
    operator: Uuid,
    created_by: Uuid,
) -> anyhow::Result<()> {
    let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM sites WHERE name = $1")
        .bind("Residencial Jardim Sul")
        .fetch_optional(pool)
        .await?;
    if existing.is_some() {
        return Ok(());
    }

    let site_id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO sites (id, name, client_id, address, city, state)
        VALUES ($1, 'Residencial Jardim Sul', $2, 'Av. das Palmeiras, 1200', 'São Paulo', 'SP')
        "#,
    )
    .bind(site_id)
    .bind(client_id)
    .execute(pool)
    .await?;

    let crane_id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO cranes (id, name, model, manufacturer, site_id)
        VALUES ($1, 'Grua 01', 'GT 250', 'Liebherr', $2)
        "#,
    )
    .bind(crane_id)
    .bind(site_id)
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO logbook_entries
            (id, crane_id, employee_id, entry_date, kind, description, created_by)
        VALUES ($1, $2, $3, CURRENT_DATE, 'checklist', 'Checklist diário sem pendências', $4)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(crane_id)
    .bind(operator)
    .bind(created_by)
    .execute(pool)
    .await?;

    tracing::info!(%site_id, %crane_id, "seeded site");
    Ok(())
}
