//! Invoice lookups and registration statistics.

use clap::Args;

use cirrus_db::{Database, KeyValueStore};

use crate::error::AppResult;
use crate::render::{InvoiceList, InvoiceView, StatsView};

#[derive(Debug, Args)]
pub struct InvoicesArgs {
    /// Only invoices issued to this TRN (from the global ledger)
    #[arg(long)]
    pub trn: Option<String>,
}

#[derive(Debug, Args)]
pub struct UserInvoicesArgs {
    /// Registered user's TRN
    pub trn: String,
}

pub async fn last_invoice<S: KeyValueStore>(db: &Database<S>) -> AppResult<String> {
    Ok(match db.ledger().get_last().await? {
        Some(invoice) => InvoiceView(&invoice).to_string(),
        None => "No invoices yet.\n".to_string(),
    })
}

pub async fn invoices<S: KeyValueStore>(db: &Database<S>, args: InvoicesArgs) -> AppResult<String> {
    let invoices = match &args.trn {
        Some(trn) => db.ledger().find_by_issuer(trn).await?,
        None => db.ledger().all().await?,
    };
    Ok(InvoiceList(&invoices).to_string())
}

pub async fn user_invoices<S: KeyValueStore>(
    db: &Database<S>,
    args: UserInvoicesArgs,
) -> AppResult<String> {
    let invoices = db.ledger().user_history(&args.trn).await?;
    Ok(InvoiceList(&invoices).to_string())
}

pub async fn stats<S: KeyValueStore>(db: &Database<S>) -> AppResult<String> {
    let stats = db.accounts().stats().await?;
    Ok(StatsView(&stats).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::test_support::{logged_in_db, TEST_TRN};
    use crate::error::ErrorCode;
    use crate::render::grid_rows;
    use cirrus_core::{AlwaysProceed, CheckoutRequest, Money, ShippingInfo, ShopSettings};

    async fn place_order(db: &Database<cirrus_db::MemoryStore>) -> String {
        db.carts().add("p16").await.unwrap();
        let user = db.session().require().await.unwrap();
        let request = CheckoutRequest {
            shipping: ShippingInfo {
                full_name: "Misty Waterflower".to_string(),
                email: "misty@example.com".to_string(),
                address: "Cerulean Gym".to_string(),
                city: "Cerulean City".to_string(),
                zip_code: "CC01".to_string(),
            },
            amount_paid: Money::from_cents(5000),
        };
        db.ledger()
            .commit(&user, &request, &AlwaysProceed)
            .await
            .unwrap()
            .invoice_number
    }

    #[tokio::test]
    async fn test_no_invoices_yet() {
        let db = Database::in_memory(ShopSettings::default());
        assert_eq!(last_invoice(&db).await.unwrap(), "No invoices yet.\n");
        assert_eq!(
            invoices(&db, InvoicesArgs { trn: None }).await.unwrap(),
            "No invoices.\n"
        );
    }

    #[tokio::test]
    async fn test_invoice_listings() {
        let db = logged_in_db().await;
        let number = place_order(&db).await;

        assert!(last_invoice(&db).await.unwrap().contains(&number));

        let by_issuer = invoices(
            &db,
            InvoicesArgs {
                trn: Some(TEST_TRN.to_string()),
            },
        )
        .await
        .unwrap();
        assert!(by_issuer.contains(&number));

        let other = invoices(
            &db,
            InvoicesArgs {
                trn: Some("555-555-555".to_string()),
            },
        )
        .await
        .unwrap();
        assert_eq!(other, "No invoices.\n");

        let history = user_invoices(
            &db,
            UserInvoicesArgs {
                trn: TEST_TRN.to_string(),
            },
        )
        .await
        .unwrap();
        assert!(history.contains(&number));
    }

    #[tokio::test]
    async fn test_user_invoices_unknown_trn() {
        let db = logged_in_db().await;
        let err = user_invoices(
            &db,
            UserInvoicesArgs {
                trn: "555-555-555".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_stats() {
        let db = logged_in_db().await;
        let out = stats(&db).await.unwrap();
        assert!(out.contains("Registered users: 1"));
        let rows = grid_rows(&out);
        assert!(rows.contains(&vec!["Female".to_string(), "1".to_string()]));
        assert!(rows.contains(&vec!["Male".to_string(), "0".to_string()]));
        assert!(rows.contains(&vec!["26-35".to_string(), "1".to_string()]));
    }
}
