//! Checkout: turns the logged-in user's cart into an invoice.

use clap::Args;
use tracing::info;

use cirrus_core::{CheckoutRequest, Money, PaymentConfirmation, ShippingInfo};
use cirrus_db::{Database, KeyValueStore};

use crate::error::AppResult;
use crate::render::InvoiceView;

/// Shipping fields left out reach the invoice rules empty and are
/// reported by name.
#[derive(Debug, Args)]
pub struct CheckoutArgs {
    #[arg(long, default_value = "")]
    pub full_name: String,

    #[arg(long, default_value = "")]
    pub email: String,

    #[arg(long, default_value = "")]
    pub address: String,

    #[arg(long, default_value = "")]
    pub city: String,

    #[arg(long = "zip", default_value = "")]
    pub zip_code: String,

    /// Amount tendered, e.g. 200 or 183.97
    #[arg(long)]
    pub paid: Money,

    /// Accept an underpayment without asking
    #[arg(long)]
    pub yes: bool,
}

pub async fn checkout<S, C>(db: &Database<S>, args: CheckoutArgs, confirm: &C) -> AppResult<String>
where
    S: KeyValueStore,
    C: PaymentConfirmation + Sync + ?Sized,
{
    let user = db.session().require().await?;
    let request = CheckoutRequest {
        shipping: ShippingInfo {
            full_name: args.full_name,
            email: args.email,
            address: args.address,
            city: args.city,
            zip_code: args.zip_code,
        },
        amount_paid: args.paid,
    };

    let invoice = db.ledger().commit(&user, &request, confirm).await?;
    info!(invoice_number = %invoice.invoice_number, "Checkout complete");

    Ok(format!(
        "Thank you for your order!\n\n{}",
        InvoiceView(&invoice)
    ))
}
