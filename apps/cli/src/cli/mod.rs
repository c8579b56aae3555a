//! # Commands
//!
//! One subcommand per storefront action. Each handler returns the text to
//! print so it can be exercised against an in-memory database.
//!
//! ```text
//! cirrus register ...        cirrus products [TERM] [--category C]
//! cirrus login <TRN>         cirrus add <PRODUCT_ID>
//! cirrus logout              cirrus cart
//! cirrus reset-password      cirrus set-qty <POS> <QTY>
//! cirrus dashboard           cirrus remove <POS> / clear
//!                            cirrus checkout --paid <AMOUNT> ...
//! cirrus invoice             cirrus invoices [--trn TRN]
//! cirrus user-invoices <TRN> cirrus stats
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use cirrus_core::AlwaysProceed;
use cirrus_db::{Database, KeyValueStore};

use crate::error::AppResult;
use crate::prompt::{self, TerminalConfirmation};

mod account;
mod cart;
mod catalog;
mod checkout;
mod report;

#[cfg(test)]
mod test_support;

#[derive(Debug, Parser)]
#[command(name = "cirrus", about = "Cirrus Trading Cards storefront", long_about = None)]
pub struct Cli {
    /// Config file (default: cirrus.toml in the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create an account
    Register(account::RegisterArgs),
    /// Log in by TRN and password
    Login(account::LoginArgs),
    /// End the current session
    Logout,
    /// Set a new password for a registered TRN
    ResetPassword(account::ResetPasswordArgs),
    /// Show the logged-in user's name, email and cart count
    Dashboard,

    /// Search the catalog
    Products(catalog::ProductsArgs),
    /// Show one product
    Product(catalog::ProductArgs),

    /// Add one unit of a product to the cart
    Add(cart::AddArgs),
    /// Show the cart with totals
    Cart,
    /// Change the quantity of a cart line
    SetQty(cart::SetQtyArgs),
    /// Remove a cart line
    Remove(cart::RemoveArgs),
    /// Empty the cart
    Clear,

    /// Pay for the cart and issue an invoice
    Checkout(checkout::CheckoutArgs),

    /// Show the most recent invoice
    Invoice,
    /// List invoices, optionally for one issuer TRN
    Invoices(report::InvoicesArgs),
    /// List a registered user's own invoice history
    UserInvoices(report::UserInvoicesArgs),
    /// Registration statistics by gender and age group
    Stats,
}

impl Commands {
    /// Runs the command against `db`, prompting on the terminal when needed.
    pub async fn run<S: KeyValueStore>(self, db: &Database<S>) -> AppResult<String> {
        match self {
            Commands::Register(args) => account::register(db, args).await,
            Commands::Login(args) => account::login(db, args, &mut prompt::terminal()).await,
            Commands::Logout => account::logout(db).await,
            Commands::ResetPassword(args) => account::reset_password(db, args).await,
            Commands::Dashboard => account::dashboard(db).await,

            Commands::Products(args) => catalog::products(db, args).await,
            Commands::Product(args) => catalog::product(db, args).await,

            Commands::Add(args) => cart::add(db, args).await,
            Commands::Cart => cart::view(db).await,
            Commands::SetQty(args) => cart::set_quantity(db, args).await,
            Commands::Remove(args) => cart::remove(db, args).await,
            Commands::Clear => cart::clear(db).await,

            Commands::Checkout(args) if args.yes => {
                checkout::checkout(db, args, &AlwaysProceed).await
            }
            Commands::Checkout(args) => checkout::checkout(db, args, &TerminalConfirmation).await,

            Commands::Invoice => report::last_invoice(db).await,
            Commands::Invoices(args) => report::invoices(db, args).await,
            Commands::UserInvoices(args) => report::user_invoices(db, args).await,
            Commands::Stats => report::stats(db).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_checkout() {
        let cli = Cli::try_parse_from([
            "cirrus", "checkout", "--full-name", "Ash Ketchum", "--email", "ash@example.com",
            "--address", "1 Route 1", "--city", "Pallet Town", "--zip", "KN001", "--paid",
            "120.50", "--yes",
        ])
        .unwrap();
        match cli.command {
            Commands::Checkout(args) => {
                assert!(args.yes);
                assert_eq!(args.paid.to_string(), "$120.50");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_positions_are_one_based() {
        assert!(Cli::try_parse_from(["cirrus", "remove", "0"]).is_err());
        assert!(Cli::try_parse_from(["cirrus", "set-qty", "1", "3"]).is_ok());
    }
}
