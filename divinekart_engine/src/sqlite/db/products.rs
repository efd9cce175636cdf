use sqlx::{QueryBuilder, SqliteConnection};

use crate::db_types::Product;

/// Batch lookup for the pricing resolver. Unknown ids are simply absent from the result.
pub async fn fetch_products_by_ids(ids: &[String], conn: &mut SqliteConnection) -> Result<Vec<Product>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut builder = QueryBuilder::new("SELECT * FROM products WHERE id IN (");
    let mut in_list = builder.separated(", ");
    for id in ids {
        in_list.push_bind(id.as_str());
    }
    builder.push(")");
    let products = builder.build_query_as::<Product>().fetch_all(conn).await?;
    Ok(products)
}

pub async fn upsert_product(product: &Product, conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
            INSERT INTO products (id, name, price, image_url) VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE SET name = excluded.name, price = excluded.price,
                image_url = excluded.image_url;
        "#,
    )
    .bind(&product.id)
    .bind(&product.name)
    .bind(product.price)
    .bind(&product.image_url)
    .execute(conn)
    .await?;
    Ok(())
}
