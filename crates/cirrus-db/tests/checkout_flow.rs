//! End-to-end storefront flow against a real SQLite file:
//! register → login → add to cart → checkout → last invoice.

use chrono::NaiveDate;
use cirrus_core::{
    AlwaysProceed, CheckoutRequest, CoreError, Decline, Gender, LoginAttempts, Money,
    RegistrationForm, ShippingInfo, ShopSettings,
};
use cirrus_db::{Database, DbConfig, DbError};

fn registration(trn: &str) -> RegistrationForm {
    RegistrationForm {
        first_name: "Serena".to_string(),
        last_name: "Yvonne".to_string(),
        dob: NaiveDate::from_ymd_opt(1999, 8, 20).unwrap(),
        gender: Gender::Female,
        phone: "876-555-0123".to_string(),
        email: "serena@example.com".to_string(),
        trn: trn.to_string(),
        password: "fennekin7".to_string(),
    }
}

fn shipping() -> ShippingInfo {
    ShippingInfo {
        full_name: "Serena Yvonne".to_string(),
        email: "serena@example.com".to_string(),
        address: "9 Vaniville Road".to_string(),
        city: "Kingston".to_string(),
        zip_code: "KN05".to_string(),
    }
}

#[tokio::test]
async fn test_register_login_checkout_over_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("cirrus.db");
    let db = Database::open(DbConfig::new(&db_path), ShopSettings::default())
        .await
        .unwrap();

    // Register and log in.
    db.accounts().register(registration("321-654-987")).await.unwrap();
    let mut attempts = LoginAttempts::default();
    db.accounts()
        .login("321-654-987", "fennekin7", &mut attempts)
        .await
        .unwrap();

    // Booster Bundle twice merges into one line; Elite Trainer Box once.
    db.carts().add("p15").await.unwrap();
    db.carts().add("p15").await.unwrap();
    db.carts().add("p2").await.unwrap();
    assert_eq!(db.carts().item_count().await.unwrap(), 3);

    let (cart, totals) = db.carts().view().await.unwrap();
    assert_eq!(cart.len(), 2);
    // 89.98 + 69.99, both under the discount threshold
    assert_eq!(totals.subtotal, Money::from_cents(15997));
    assert_eq!(totals.discount, Money::zero());

    // Underpayment declined: nothing committed.
    let user = db.session().require().await.unwrap();
    let short = CheckoutRequest {
        shipping: shipping(),
        amount_paid: Money::from_cents(1000),
    };
    let err = db.ledger().commit(&user, &short, &Decline).await.unwrap_err();
    assert!(matches!(err, DbError::Core(CoreError::CheckoutCancelled { .. })));
    assert!(db.ledger().get_last().await.unwrap().is_none());

    // Paid in full.
    let paid = CheckoutRequest {
        shipping: shipping(),
        amount_paid: Money::from_cents(20000),
    };
    let invoice = db.ledger().commit(&user, &paid, &AlwaysProceed).await.unwrap();
    assert_eq!(invoice.total, Money::from_cents(18397));
    assert_eq!(invoice.change_returned, Money::from_cents(1603));
    assert_eq!(invoice.trn.as_str(), "321-654-987");
    assert!(invoice.invoice_number.starts_with("INV-"));

    assert_eq!(db.carts().item_count().await.unwrap(), 0);
    db.close().await;

    // Everything is still there after reopening the file.
    let db = Database::open(DbConfig::new(&db_path), ShopSettings::default())
        .await
        .unwrap();
    assert_eq!(db.ledger().get_last().await.unwrap(), Some(invoice.clone()));
    assert_eq!(
        db.ledger().find_by_issuer("321-654-987").await.unwrap(),
        vec![invoice.clone()]
    );
    assert_eq!(
        db.ledger().user_history("321-654-987").await.unwrap(),
        vec![invoice]
    );

    db.accounts().logout().await.unwrap();
    assert!(matches!(db.carts().add("p1").await, Err(DbError::NotLoggedIn)));
}

#[tokio::test]
async fn test_second_checkout_of_same_cart_adds_second_invoice() {
    let db = Database::in_memory(ShopSettings::default());
    db.accounts().register(registration("111-000-111")).await.unwrap();
    db.accounts()
        .login("111-000-111", "fennekin7", &mut LoginAttempts::default())
        .await
        .unwrap();
    db.carts().add("p1").await.unwrap();

    let user = db.session().require().await.unwrap();
    let request = CheckoutRequest {
        shipping: shipping(),
        amount_paid: Money::from_cents(70000),
    };

    let first = db.ledger().commit(&user, &request, &Decline).await.unwrap();
    let second = db.ledger().commit(&user, &request, &Decline).await.unwrap();

    assert_ne!(first.invoice_number, second.invoice_number);
    assert_eq!(db.ledger().all().await.unwrap().len(), 2);
    assert_eq!(
        db.ledger().user_history("111-000-111").await.unwrap(),
        vec![first, second.clone()]
    );
    assert_eq!(db.ledger().get_last().await.unwrap(), Some(second));
}
