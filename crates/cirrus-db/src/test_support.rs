//! Fixtures shared by the unit tests in this crate.

use chrono::{NaiveDate, TimeZone, Utc};
use cirrus_core::{
    Cart, Gender, Invoice, InvoiceLine, Money, ShippingInfo, ShopSettings, Trn, User,
};

pub(crate) fn sample_user(trn: &str) -> User {
    User {
        first_name: "Ash".to_string(),
        last_name: "Ketchum".to_string(),
        dob: NaiveDate::from_ymd_opt(1997, 4, 1).unwrap(),
        gender: Gender::Male,
        phone: "876-555-0001".to_string(),
        email: "ash@example.com".to_string(),
        trn: Trn::parse(trn).unwrap(),
        password: "pikachu123".to_string(),
        date_of_registration: Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap(),
        cart: Cart::new(),
        invoices: Vec::new(),
    }
}

pub(crate) fn sample_shipping() -> ShippingInfo {
    ShippingInfo {
        full_name: "Ash Ketchum".to_string(),
        email: "ash@example.com".to_string(),
        address: "1 Route 1".to_string(),
        city: "Pallet Town".to_string(),
        zip_code: "KN001".to_string(),
    }
}

pub(crate) fn sample_invoice(number: &str, trn: &str) -> Invoice {
    Invoice {
        company_name: ShopSettings::default().company_name,
        invoice_number: number.to_string(),
        invoice_date: NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(),
        trn: Trn::parse(trn).unwrap(),
        shipping: sample_shipping(),
        items: vec![InvoiceLine {
            name: "Booster Bundle".to_string(),
            qty: 1,
            price: Money::from_cents(4499),
            discount: Money::zero(),
            tax: Money::from_cents(675),
            line_total: Money::from_cents(5174),
        }],
        subtotal: Money::from_cents(4499),
        discount: Money::zero(),
        tax: Money::from_cents(675),
        total: Money::from_cents(5174),
        amount_paid: Money::from_cents(6000),
        change_returned: Money::from_cents(826),
    }
}
