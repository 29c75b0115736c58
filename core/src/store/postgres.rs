// core/src/store/postgres.rs

use super::OrderStore;
use crate::error::{CheckoutError, CheckoutResult};
use crate::models::{NewOrder, Order, OrderStatus};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{error, info, instrument};

const ORDER_COLUMNS: &str = "id, transaction_id, customer_name, email, phone, document, roblox_username, \
   robux_amount, price_brl, status, created_at";

/// Orders in the `orders` table (see `core/migrations`).
#[derive(Debug, Clone)]
pub struct PgOrderStore {
  pool: PgPool,
}

impl PgOrderStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  pub async fn connect(database_url: &str) -> CheckoutResult<Self> {
    let pool = PgPoolOptions::new().max_connections(5).connect(database_url).await?;
    info!("Connected to the order database.");
    Ok(Self::new(pool))
  }

  pub async fn run_migrations(&self) -> CheckoutResult<()> {
    sqlx::migrate!("./migrations").run(&self.pool).await?;
    info!("Order database migrations applied.");
    Ok(())
  }

  pub fn pool(&self) -> &PgPool {
    &self.pool
  }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
  matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

#[async_trait]
impl OrderStore for PgOrderStore {
  #[instrument(name = "pg_order_store::insert_order", skip(self, order), fields(transaction_id = %order.transaction_id), err(Display))]
  async fn insert_order(&self, order: NewOrder) -> CheckoutResult<Order> {
    let pending = order.into_pending_order(chrono::Utc::now());

    let inserted: Order = sqlx::query_as(&format!(
      "INSERT INTO orders ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING {}",
      ORDER_COLUMNS, ORDER_COLUMNS
    ))
    .bind(pending.id)
    .bind(&pending.transaction_id)
    .bind(&pending.customer_name)
    .bind(&pending.email)
    .bind(&pending.phone)
    .bind(&pending.document)
    .bind(&pending.roblox_username)
    .bind(pending.robux_amount)
    .bind(pending.price_brl)
    .bind(pending.status)
    .bind(pending.created_at)
    .fetch_one(&self.pool)
    .await
    .map_err(|e| {
      if is_unique_violation(&e) {
        CheckoutError::Persistence(format!("duplicate transaction id {}", pending.transaction_id))
      } else {
        error!("Failed to insert order: {}", e);
        CheckoutError::from(e)
      }
    })?;

    Ok(inserted)
  }

  #[instrument(name = "pg_order_store::update_status", skip(self), err(Display))]
  async fn update_status(&self, transaction_id: &str, status: OrderStatus) -> CheckoutResult<u64> {
    let result = sqlx::query(
      "UPDATE orders SET status = $2 WHERE transaction_id = $1 AND (status = 'pending' OR status = $2)",
    )
    .bind(transaction_id)
    .bind(status)
    .execute(&self.pool)
    .await?;

    Ok(result.rows_affected())
  }

  #[instrument(name = "pg_order_store::list_orders", skip(self), err(Display))]
  async fn list_orders(&self) -> CheckoutResult<Vec<Order>> {
    let orders: Vec<Order> = sqlx::query_as(&format!(
      "SELECT {} FROM orders ORDER BY created_at DESC",
      ORDER_COLUMNS
    ))
    .fetch_all(&self.pool)
    .await?;
    Ok(orders)
  }
}
