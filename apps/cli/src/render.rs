//! # Terminal Rendering
//!
//! Text views over storefront data, drawn with `tabled`. Each view is a
//! `Display` wrapper so commands can `println!` it and tests can
//! `to_string()` it.
//!
//! ```text
//! ╭───┬──────────────────────────────────────┬─────┬────────┬──────────┬────────┬─────────╮
//! │ # │ Item                                 │ Qty │  Price │ Discount │    Tax │   Total │
//! ├───┼──────────────────────────────────────┼─────┼────────┼──────────┼────────┼─────────┤
//! │ 1 │ 2025 Pokémon ... Booster Bundle      │   2 │ $44.99 │    $0.00 │ $13.50 │ $103.48 │
//! ╰───┴──────────────────────────────────────┴─────┴────────┴──────────┴────────┴─────────╯
//!  Subtotal    $89.98
//!  Discount     $0.00
//!  Tax         $13.50
//!  Total      $103.48
//! ```

use std::fmt;
use std::ops::Range;

use tabled::{
    Table,
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

use cirrus_core::{CartTotals, Invoice, Money, Product, User};
use cirrus_db::RegistrationStats;

/// Rounded-border table with the `numeric` columns right-aligned.
fn grid(builder: Builder, numeric: Range<usize>) -> Table {
    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.modify(Columns::new(numeric), Alignment::right());
    table
}

/// Borderless label/amount block printed under a grid.
fn summary(rows: &[(&str, Money)]) -> Table {
    let mut builder = Builder::default();
    for (label, amount) in rows {
        builder.push_record([label.to_string(), amount.to_string()]);
    }

    let mut table = builder.build();
    table.with(Style::blank());
    table.modify(Columns::new(1..2), Alignment::right());
    table
}

/// Catalog listing.
pub struct ProductTable<'a>(pub &'a [Product]);

impl fmt::Display for ProductTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No products match.");
        }

        let mut builder = Builder::default();
        builder.push_record(["ID", "Name", "Category", "Price", "Description"]);
        for product in self.0 {
            builder.push_record([
                product.id.clone(),
                product.name.clone(),
                product.category.as_str().to_string(),
                product.price.to_string(),
                product.description.clone(),
            ]);
        }
        writeln!(f, "{}", grid(builder, 3..4))
    }
}

/// Cart lines with per-line amounts and totals. Positions are 1-based.
pub struct CartView<'a>(pub &'a CartTotals);

impl fmt::Display for CartView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let totals = self.0;
        if totals.lines.is_empty() {
            return writeln!(f, "Your cart is empty.");
        }

        let mut builder = Builder::default();
        builder.push_record(["#", "Item", "Qty", "Price", "Discount", "Tax", "Total"]);
        for (i, priced) in totals.lines.iter().enumerate() {
            builder.push_record([
                (i + 1).to_string(),
                priced.line.name.clone(),
                priced.line.qty.to_string(),
                priced.line.price.to_string(),
                priced.calc.discount.to_string(),
                priced.calc.tax.to_string(),
                priced.calc.total.to_string(),
            ]);
        }
        writeln!(f, "{}", grid(builder, 2..7))?;
        writeln!(
            f,
            "{}",
            summary(&[
                ("Subtotal", totals.subtotal),
                ("Discount", totals.discount),
                ("Tax", totals.tax),
                ("Total", totals.total),
            ])
        )
    }
}

/// A full invoice.
pub struct InvoiceView<'a>(pub &'a Invoice);

impl fmt::Display for InvoiceView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let invoice = self.0;
        writeln!(f, "{}", invoice.company_name)?;
        writeln!(f, "Invoice {}    Date {}", invoice.invoice_number, invoice.invoice_date)?;
        writeln!(f, "TRN {}", invoice.trn)?;
        writeln!(f)?;

        let ship = &invoice.shipping;
        writeln!(f, "Ship to: {} <{}>", ship.full_name, ship.email)?;
        writeln!(f, "         {}, {} {}", ship.address, ship.city, ship.zip_code)?;

        let mut builder = Builder::default();
        builder.push_record(["Item", "Qty", "Price", "Discount", "Tax", "Total"]);
        for line in &invoice.items {
            builder.push_record([
                line.name.clone(),
                line.qty.to_string(),
                line.price.to_string(),
                line.discount.to_string(),
                line.tax.to_string(),
                line.line_total.to_string(),
            ]);
        }
        writeln!(f, "{}", grid(builder, 1..6))?;
        writeln!(
            f,
            "{}",
            summary(&[
                ("Subtotal", invoice.subtotal),
                ("Discount", invoice.discount),
                ("Tax", invoice.tax),
                ("Total", invoice.total),
                ("Amount paid", invoice.amount_paid),
                ("Change", invoice.change_returned),
            ])
        )
    }
}

/// One row per invoice.
pub struct InvoiceList<'a>(pub &'a [Invoice]);

impl fmt::Display for InvoiceList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No invoices.");
        }

        let mut builder = Builder::default();
        builder.push_record(["Invoice", "Date", "TRN", "Items", "Total"]);
        for invoice in self.0 {
            let items = invoice
                .items
                .iter()
                .fold(0_i64, |count, line| count.saturating_add(line.qty));
            builder.push_record([
                invoice.invoice_number.clone(),
                invoice.invoice_date.to_string(),
                invoice.trn.to_string(),
                items.to_string(),
                invoice.total.to_string(),
            ]);
        }
        writeln!(f, "{}", grid(builder, 3..5))
    }
}

/// Registration frequency tables.
pub struct StatsView<'a>(pub &'a RegistrationStats);

impl fmt::Display for StatsView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.0;
        writeln!(f, "Registered users: {}", stats.total)?;

        let mut gender = Builder::default();
        gender.push_record(["Gender", "Users"]);
        for (label, count) in [
            ("Male", stats.gender.male),
            ("Female", stats.gender.female),
            ("Other", stats.gender.other),
        ] {
            gender.push_record([label.to_string(), count.to_string()]);
        }
        writeln!(f, "{}", grid(gender, 1..2))?;

        let mut ages = Builder::default();
        ages.push_record(["Age group", "Users"]);
        for (label, count) in stats.age_groups.rows() {
            ages.push_record([label.to_string(), count.to_string()]);
        }
        writeln!(f, "{}", grid(ages, 1..2))
    }
}

/// Welcome block for the logged-in user.
pub struct Dashboard<'a> {
    pub user: &'a User,
    pub cart_count: i64,
}

impl fmt::Display for Dashboard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Welcome back, {}!", self.user.full_name())?;
        writeln!(f, "Email: {}", self.user.email)?;
        writeln!(f, "TRN:   {}", self.user.trn)?;
        writeln!(f, "Cart:  {} item(s)", self.cart_count)?;
        writeln!(f, "Orders: {}", self.user.invoices.len())
    }
}

/// Cell text of every bordered body row, header included.
#[cfg(test)]
pub(crate) fn grid_rows(text: &str) -> Vec<Vec<String>> {
    text.lines()
        .filter(|line| line.starts_with('│'))
        .map(|line| {
            line.trim_matches('│')
                .split('│')
                .map(|cell| cell.trim().to_string())
                .collect()
        })
        .collect()
}
