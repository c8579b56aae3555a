//! Cart commands. Positions on the command line are 1-based, as shown by
//! `cirrus cart`.

use std::num::NonZeroUsize;

use clap::Args;
use tracing::debug;

use cirrus_db::{Database, KeyValueStore};

use crate::error::AppResult;
use crate::render::CartView;

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Product id, e.g. p15
    pub product_id: String,
}

#[derive(Debug, Args)]
pub struct SetQtyArgs {
    /// Cart position (1-based)
    pub position: NonZeroUsize,

    /// New quantity; values below 1 become 1, values above 9999 become 9999
    #[arg(allow_negative_numbers = true)]
    pub qty: i64,
}

#[derive(Debug, Args)]
pub struct RemoveArgs {
    /// Cart position (1-based)
    pub position: NonZeroUsize,
}

fn index(position: NonZeroUsize) -> usize {
    position.get() - 1
}

pub async fn add<S: KeyValueStore>(db: &Database<S>, args: AddArgs) -> AppResult<String> {
    let product = db.products().get_by_id(&args.product_id).await?;
    let cart = db.carts().add(&product.id).await?;
    debug!(product_id = %product.id, "add command");
    Ok(format!(
        "Added {} to your cart ({} item(s)).\n",
        product.name,
        cart.item_count()
    ))
}

pub async fn view<S: KeyValueStore>(db: &Database<S>) -> AppResult<String> {
    let (_, totals) = db.carts().view().await?;
    Ok(CartView(&totals).to_string())
}

pub async fn set_quantity<S: KeyValueStore>(
    db: &Database<S>,
    args: SetQtyArgs,
) -> AppResult<String> {
    db.carts().set_quantity(index(args.position), args.qty).await?;
    view(db).await
}

pub async fn remove<S: KeyValueStore>(db: &Database<S>, args: RemoveArgs) -> AppResult<String> {
    db.carts().remove(index(args.position)).await?;
    view(db).await
}

pub async fn clear<S: KeyValueStore>(db: &Database<S>) -> AppResult<String> {
    db.carts().clear().await?;
    Ok("Cart cleared.\n".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::test_support::logged_in_db;
    use crate::error::ErrorCode;
    use crate::render::grid_rows;

    fn pos(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[tokio::test]
    async fn test_add_view_edit_cycle() {
        let db = logged_in_db().await;

        let out = add(&db, AddArgs { product_id: "p15".to_string() }).await.unwrap();
        assert_eq!(
            out,
            "Added 2025 Pokémon Scarlet & Violet Destined Rivals Booster Bundle to your cart (1 item(s)).\n"
        );
        add(&db, AddArgs { product_id: "p2".to_string() }).await.unwrap();

        let out = set_quantity(&db, SetQtyArgs { position: pos(1), qty: 2 }).await.unwrap();
        assert!(out.contains("$103.48"));

        let out = remove(&db, RemoveArgs { position: pos(2) }).await.unwrap();
        let rows = grid_rows(&out);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][0], "1");
        assert!(rows[1][1].starts_with("2025 Pokémon"));

        assert_eq!(clear(&db).await.unwrap(), "Cart cleared.\n");
        assert_eq!(view(&db).await.unwrap(), "Your cart is empty.\n");
    }

    #[tokio::test]
    async fn test_huge_quantity_then_add() {
        let db = logged_in_db().await;
        add(&db, AddArgs { product_id: "p1".to_string() }).await.unwrap();
        set_quantity(&db, SetQtyArgs { position: pos(1), qty: i64::MAX })
            .await
            .unwrap();

        let out = add(&db, AddArgs { product_id: "p1".to_string() }).await.unwrap();
        assert!(out.ends_with("(9999 item(s)).\n"));
        assert_eq!(grid_rows(&view(&db).await.unwrap())[1][2], "9999");
    }

    #[tokio::test]
    async fn test_bad_position() {
        let db = logged_in_db().await;
        add(&db, AddArgs { product_id: "p1".to_string() }).await.unwrap();

        let err = remove(&db, RemoveArgs { position: pos(3) }).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CartError);
    }

    #[tokio::test]
    async fn test_unknown_product() {
        let db = logged_in_db().await;
        let err = add(&db, AddArgs { product_id: "p99".to_string() }).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
