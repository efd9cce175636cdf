use log::{debug, trace};
use sqlx::{sqlite::SqliteRow, FromRow, QueryBuilder, SqliteConnection};

use crate::{
    db_types::{NewOrder, Order, OrderId},
    order_objects::{ModifyOrderRequest, OrderQueryFilter},
    traits::OrderApiError,
};

/// Inserts a new order into the database using the given connection.
///
/// The `orders` table carries unique indices on both `order_id` and `gateway_order_ref`, so a duplicate of either
/// surfaces as [`OrderApiError::OrderAlreadyExists`] rather than a second row.
pub async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<Order, OrderApiError> {
    let customer = serde_json::to_string(&order.customer).map_err(|e| OrderApiError::EncodingError(e.to_string()))?;
    let items = serde_json::to_string(&order.items).map_err(|e| OrderApiError::EncodingError(e.to_string()))?;
    let order_id = order.order_id.clone();
    let inserted: Order = sqlx::query_as(
        r#"
            INSERT INTO orders (
                order_id,
                user_id,
                customer,
                items,
                subtotal,
                tax,
                shipping,
                total,
                payment_method,
                payment_status,
                gateway_order_ref,
                notes
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *;
        "#,
    )
    .bind(order.order_id)
    .bind(order.user_id)
    .bind(customer)
    .bind(items)
    .bind(order.subtotal)
    .bind(order.tax)
    .bind(order.shipping)
    .bind(order.total)
    .bind(order.payment_method)
    .bind(order.payment_status)
    .bind(order.gateway_order_ref)
    .bind(order.notes)
    .fetch_one(conn)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(de) if de.is_unique_violation() => OrderApiError::OrderAlreadyExists(order_id),
        _ => OrderApiError::from(e),
    })?;
    debug!("📝️ Order {} inserted with id {}", inserted.order_id, inserted.id);
    Ok(inserted)
}

pub async fn fetch_order_by_order_id(
    order_id: &OrderId,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order =
        sqlx::query_as("SELECT * FROM orders WHERE order_id = $1").bind(order_id.as_str()).fetch_optional(conn).await?;
    Ok(order)
}

pub async fn fetch_order_by_gateway_ref(
    gateway_order_ref: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE gateway_order_ref = $1")
        .bind(gateway_order_ref)
        .fetch_optional(conn)
        .await?;
    Ok(order)
}

/// The reconciliation primitive: one atomic conditional update keyed by `gateway_order_ref`.
///
/// The payment confirmation endpoint and the gateway webhook both land here, unordered and possibly more than
/// once. Because the transition is a single statement, concurrent and duplicate invocations are safe without any
/// locking: a second call observes `payment_status` already `'Paid'` and rewrites the same field values. `COALESCE`
/// keeps an already-recorded payment ref when a later caller (an `order.paid` event without a payment entity)
/// does not carry one.
pub async fn mark_paid_by_gateway_ref(
    gateway_order_ref: &str,
    gateway_payment_ref: Option<&str>,
    gateway_signature: Option<&str>,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, OrderApiError> {
    let order: Option<Order> = sqlx::query_as(
        r#"
            UPDATE orders SET
                payment_status = 'Paid',
                gateway_payment_ref = COALESCE($2, gateway_payment_ref),
                gateway_signature = COALESCE($3, gateway_signature),
                updated_at = CURRENT_TIMESTAMP
            WHERE gateway_order_ref = $1
            RETURNING *;
        "#,
    )
    .bind(gateway_order_ref)
    .bind(gateway_payment_ref)
    .bind(gateway_signature)
    .fetch_optional(conn)
    .await?;
    Ok(order)
}

/// Fetches orders according to the filter, newest first, with pagination applied.
pub async fn fetch_orders(query: &OrderQueryFilter, conn: &mut SqliteConnection) -> Result<Vec<Order>, sqlx::Error> {
    let mut builder = QueryBuilder::new("SELECT * FROM orders ");
    push_where_clause(&mut builder, query);
    builder.push(" ORDER BY created_at DESC, id DESC LIMIT ");
    builder.push_bind(i64::from(query.pagination.limit));
    builder.push(" OFFSET ");
    builder.push_bind(query.pagination.offset());
    trace!("📝️ Executing query: {}", builder.sql());
    let orders = builder.build_query_as::<Order>().fetch_all(conn).await?;
    trace!("📝️ Result of fetch_orders: {:?}", orders.len());
    Ok(orders)
}

/// Total number of orders matching the filter, ignoring pagination.
pub async fn count_orders(query: &OrderQueryFilter, conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM orders ");
    push_where_clause(&mut builder, query);
    let count: i64 = builder.build_query_scalar().fetch_one(conn).await?;
    Ok(count)
}

fn push_where_clause<'a>(builder: &mut QueryBuilder<'a, sqlx::Sqlite>, query: &'a OrderQueryFilter) {
    if query.user_id.is_none() && query.payment_status.is_none() {
        return;
    }
    builder.push("WHERE ");
    let mut where_clause = builder.separated(" AND ");
    if let Some(user_id) = query.user_id {
        where_clause.push("user_id = ");
        where_clause.push_bind_unseparated(user_id);
    }
    if let Some(status) = query.payment_status {
        where_clause.push("payment_status = ");
        where_clause.push_bind_unseparated(status.to_string());
    }
}

pub(crate) async fn update_order(
    id: &OrderId,
    update: ModifyOrderRequest,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, OrderApiError> {
    if update.is_empty() {
        debug!("📝️ No fields to update for order {id}. Update request skipped.");
        return Err(OrderApiError::ModificationNoOp);
    }
    let mut builder = QueryBuilder::new("UPDATE orders SET updated_at = CURRENT_TIMESTAMP, ");
    let mut set_clause = builder.separated(", ");
    if let Some(status) = update.new_status {
        set_clause.push("status = ");
        set_clause.push_bind_unseparated(status.to_string());
    }
    if let Some(payment_status) = update.new_payment_status {
        set_clause.push("payment_status = ");
        set_clause.push_bind_unseparated(payment_status.to_string());
    }
    if let Some(delivery_date) = update.new_delivery_date {
        set_clause.push("delivery_date = ");
        set_clause.push_bind_unseparated(delivery_date);
    }
    if let Some(notes) = update.new_notes {
        set_clause.push("notes = ");
        set_clause.push_bind_unseparated(notes);
    }
    if let Some(shipping) = update.new_shipping {
        // the stored total tracks the shipping charge
        set_clause.push("shipping = ");
        set_clause.push_bind_unseparated(shipping);
        set_clause.push("total = subtotal + tax + ");
        set_clause.push_bind_unseparated(shipping);
    }
    builder.push(" WHERE order_id = ");
    builder.push_bind(id.as_str());
    builder.push(" RETURNING *");
    trace!("📝️ Executing query: {}", builder.sql());
    let res = builder.build().fetch_optional(conn).await?.map(|row: SqliteRow| Order::from_row(&row)).transpose()?;
    trace!("📝️ Result of update_order: {res:?}");
    Ok(res)
}

pub(crate) async fn delete_order(id: &OrderId, conn: &mut SqliteConnection) -> Result<bool, OrderApiError> {
    let result = sqlx::query("DELETE FROM orders WHERE order_id = $1").bind(id.as_str()).execute(conn).await?;
    Ok(result.rows_affected() > 0)
}
