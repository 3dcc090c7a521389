//! Check whether one user is a member of one group.

use anyhow::{bail, Context, Result};
use cfaccess_cli::{find_member_group, setup, UserDirectory};
use cfaccess_sdk::Client;
use clap::builder::NonEmptyStringValueParser;
use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "check-group-membership",
    version,
    about = "Exit 0 if the user is a member of the group, 1 otherwise"
)]
struct Args {
    /// The group ID to test membership of
    #[arg(long = "group-id", value_parser = NonEmptyStringValueParser::new())]
    group_id: String,

    /// Email of the user to test group membership of
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

    let memberships = client
        .directory()
        .all_groups_for_user(&user.id)
        .await
        .context("failed to retrieve group memberships")?;

    match find_member_group(&memberships, &args.group_id).and_then(|m| m.group.as_ref()) {
        Some(group) => {
            println!(
                "user {} (email {}) is a member of group {} ({})",
                user.id, user.email, group.id, group.name
            );
            Ok(())
        }
        None => bail!(
            "user {} (email {}) is not a member of group {}",
            user.id,
            user.email,
            args.group_id
        ),
    }
}
