//! Account commands: register, login, logout, password reset, dashboard.

use std::io::{BufRead, Write};

use chrono::NaiveDate;
use clap::Args;

use cirrus_core::{CoreError, Gender, LoginAttempts, RegistrationForm};
use cirrus_db::{Database, DbError, KeyValueStore};

use crate::error::{AppError, AppResult};
use crate::prompt::Prompter;
use crate::render::Dashboard;

#[derive(Debug, Args)]
pub struct RegisterArgs {
    #[arg(long)]
    pub first_name: String,

    #[arg(long)]
    pub last_name: String,

    /// Date of birth (YYYY-MM-DD); registrants must be 18 or older
    #[arg(long)]
    pub dob: NaiveDate,

    /// male, female or other
    #[arg(long)]
    pub gender: Gender,

    #[arg(long)]
    pub phone: String,

    #[arg(long)]
    pub email: String,

    /// Taxpayer registration number, 000-000-000
    #[arg(long)]
    pub trn: String,

    /// At least 8 characters
    #[arg(long)]
    pub password: String,
}

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Taxpayer registration number
    pub trn: String,

    /// Password; prompted for (with retries) when omitted
    #[arg(long)]
    pub password: Option<String>,
}

#[derive(Debug, Args)]
pub struct ResetPasswordArgs {
    /// Taxpayer registration number
    pub trn: String,

    #[arg(long)]
    pub new_password: String,
}

pub async fn register<S: KeyValueStore>(db: &Database<S>, args: RegisterArgs) -> AppResult<String> {
    let form = RegistrationForm {
        first_name: args.first_name,
        last_name: args.last_name,
        dob: args.dob,
        gender: args.gender,
        phone: args.phone,
        email: args.email,
        trn: args.trn,
        password: args.password,
    };

    let user = db.accounts().register(form).await?;
    Ok(format!(
        "Registered {} (TRN {}). You can now log in.\n",
        user.full_name(),
        user.trn
    ))
}

/// Logs in, re-prompting for the password after each mismatch until the
/// attempt budget runs out. A password given on the command line gets
/// one try.
pub async fn login<S, R, W>(
    db: &Database<S>,
    args: LoginArgs,
    prompter: &mut Prompter<R, W>,
) -> AppResult<String>
where
    S: KeyValueStore,
    R: BufRead,
    W: Write,
{
    let mut attempts = LoginAttempts::new(db.settings().max_login_attempts);

    loop {
        let password = match &args.password {
            Some(password) => password.clone(),
            None => prompter
                .ask("Password: ")?
                .ok_or_else(|| AppError::validation("Password is required"))?,
        };

        match db.accounts().login(&args.trn, &password, &mut attempts).await {
            Ok(user) => return Ok(format!("Welcome, {}!\n", user.full_name())),
            Err(DbError::Core(err @ CoreError::InvalidCredentials { .. }))
                if args.password.is_none() =>
            {
                prompter.say(&err.to_string())?;
            }
            Err(err) => return Err(err.into()),
        }
    }
}

pub async fn logout<S: KeyValueStore>(db: &Database<S>) -> AppResult<String> {
    db.accounts().logout().await?;
    Ok("Logged out.\n".to_string())
}

pub async fn reset_password<S: KeyValueStore>(
    db: &Database<S>,
    args: ResetPasswordArgs,
) -> AppResult<String> {
    db.accounts()
        .reset_password(&args.trn, &args.new_password)
        .await?;
    Ok("Password updated.\n".to_string())
}

pub async fn dashboard<S: KeyValueStore>(db: &Database<S>) -> AppResult<String> {
    let user = db.session().require().await?;
    let cart_count = user.cart.item_count();
    Ok(Dashboard {
        user: &user,
        cart_count,
    }
    .to_string())
}
