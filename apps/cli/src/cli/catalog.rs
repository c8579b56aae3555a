//! Catalog browsing. Works without a login.

use clap::Args;

use cirrus_core::catalog::parse_category_filter;
use cirrus_db::{Database, KeyValueStore};

use crate::error::AppResult;
use crate::render::ProductTable;

#[derive(Debug, Args)]
pub struct ProductsArgs {
    /// Case-insensitive text matched against name and description
    #[arg(default_value = "")]
    pub term: String,

    /// all, premium, trainer-box, booster or special
    #[arg(long, default_value = "all")]
    pub category: String,
}

#[derive(Debug, Args)]
pub struct ProductArgs {
    /// Product id, e.g. p15
    pub id: String,
}

pub async fn products<S: KeyValueStore>(db: &Database<S>, args: ProductsArgs) -> AppResult<String> {
    let filter = parse_category_filter(&args.category)?;
    let products = db.products().search(&args.term, filter).await?;
    Ok(ProductTable(&products).to_string())
}

pub async fn product<S: KeyValueStore>(db: &Database<S>, args: ProductArgs) -> AppResult<String> {
    let product = db.products().get_by_id(&args.id).await?;
    Ok(format!(
        "{}\n{}  {}\n{}\nImage: {}\n",
        product.name, product.category, product.price, product.description, product.image
    ))
}
