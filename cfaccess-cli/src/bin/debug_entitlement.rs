//! Debug a single entitlement for one user.

use anyhow::{Context, Result};
use cfaccess_cli::{setup, AccessOutcome, UserDirectory};
use cfaccess_sdk::{Client, DebugEntitlementAccessRequest, Specifier};
use clap::builder::NonEmptyStringValueParser;
use clap::Parser;
use std::time::Instant;

#[derive(Debug, Parser)]
#[command(
    name = "debug-entitlement",
    version,
    about = "Show whether a user can request a role on a target"
)]
struct Args {
    /// The account (target) to test access to
    #[arg(long, value_parser = NonEmptyStringValueParser::new())]
    account: String,

    /// The role to test access to
    #[arg(long, value_parser = NonEmptyStringValueParser::new())]
    role: String,

    /// Email of the user to test access for
    #[arg(long, value_parser = NonEmptyStringValueParser::new())]
    user: String,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    setup::init(args.verbose);

    let client = Client::from_env().context("failed to configure the platform client")?;

    let users = UserDirectory::fetch(&client)
        .await
        .context("failed to retrieve users")?;
    let user = users.find_by_email(&args.user)?;

    let started = Instant::now();

    let result = client
        .access()
        .debug_entitlement_access(DebugEntitlementAccessRequest {
            principal: Specifier::user(&user.id),
            target: Specifier::lookup(&args.account),
            role: Specifier::lookup(&args.role),
        })
        .await
        .context("error calling the Common Fate DebugEntitlementAccess API")?;

    println!("Can Request: {}", result.can_request);
    println!("Is Auto Approved: {}", result.auto_approved);
    println!("Outcome: {}", AccessOutcome::from(&result));
    println!("Took: {:?}", started.elapsed());

    Ok(())
}
