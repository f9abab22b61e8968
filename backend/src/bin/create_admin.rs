//! Create an administrator account directly against the database.
//!
//! Administrators cannot sign up over HTTP. The password is read from
//! `BAZAAR_ADMIN_PASSWORD` so it never appears in shell history; database
//! and signing settings come from the usual `BAZAAR_*` variables.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::ffi::OsString;
use std::sync::Arc;

use bazaar::domain::{
    AccountPorts, AccountService, ContactNumber, EmailAddress, NewAccount, Password, PersonName,
};
use bazaar::outbound::persistence::{
    DbPool, DieselTokenBlacklist, DieselUserRepository, PoolConfig, run_pending_migrations,
};
use bazaar::outbound::security::{Argon2PasswordHasher, JwtTokenCodec};
use bazaar::settings::ServerSettings;
use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;

const PASSWORD_VAR: &str = "BAZAAR_ADMIN_PASSWORD";

/// `create-admin` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "create-admin",
    about = "Create a marketplace administrator account",
    version
)]
struct CliArgs {
    #[arg(long = "first-name", value_name = "name")]
    first_name: String,
    #[arg(long = "last-name", value_name = "name")]
    last_name: String,
    #[arg(long, value_name = "address")]
    email: String,
    #[arg(long = "contact-number", value_name = "digits")]
    contact_number: String,
}

impl CliArgs {
    fn into_account(self, password: &str) -> Result<NewAccount> {
        Ok(NewAccount {
            first_name: PersonName::new(&self.first_name).wrap_err("invalid first name")?,
            last_name: PersonName::new(&self.last_name).wrap_err("invalid last name")?,
            email: EmailAddress::new(&self.email).wrap_err("invalid email")?,
            contact_number: ContactNumber::new(&self.contact_number)
                .wrap_err("invalid contact number")?,
            password: Password::new(password).wrap_err("invalid password")?,
        })
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to create Tokio runtime")?;
    runtime.block_on(async_main())
}

#[expect(clippy::print_stdout, reason = "reports the created account to the operator")]
async fn async_main() -> Result<()> {
    let args = CliArgs::parse();
    let password = env::var(PASSWORD_VAR).map_err(|_| eyre!("{PASSWORD_VAR} must be set"))?;
    let account = args.into_account(&password)?;

    let settings = ServerSettings::load_from_iter([OsString::from("create-admin")])
        .map_err(|err| eyre!("failed to load settings: {err}"))?;
    let database_url = settings.database_url()?.to_owned();
    let tokens = JwtTokenCodec::new(&settings.jwt_secret()?)?;

    if settings.run_migrations() {
        let url = database_url.clone();
        tokio::task::spawn_blocking(move || run_pending_migrations(&url))
            .await
            .wrap_err("migration task panicked")?
            .wrap_err("failed to apply migrations")?;
    }

    let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(1))
        .await
        .wrap_err("failed to create database pool")?;
    let accounts = AccountService::new(
        AccountPorts {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            blacklist: Arc::new(DieselTokenBlacklist::new(pool)),
            hasher: Arc::new(Argon2PasswordHasher::new()),
            tokens: Arc::new(tokens),
        },
        Arc::new(DefaultClock),
        settings.token_lifetimes()?,
    );

    let admin = accounts
        .create_admin(account)
        .await
        .map_err(|err| eyre!("failed to create administrator: {err}"))?;

    println!("id={}", admin.id);
    println!("email={}", admin.email);
    Ok(())
}
