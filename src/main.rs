//! `zabbixctl` command-line tool
//!
//! Thin wrapper over [`zabbixctl::ZabbixClient`]: loads the configuration,
//! authenticates and prints the result of one command as pretty JSON.

use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;
use zabbixctl::config::{default_config_path, Config};
use zabbixctl::core::version::USERNAME_LOGIN_CONSTRAINT;
use zabbixctl::core::{init_logging, render_chain, LogConfig};
use zabbixctl::client::Item;
use zabbixctl::{Params, ZabbixClient};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Debug, Parser)]
#[command(name = "zabbixctl", version, about = "Work with the Zabbix server API")]
struct Cli {
    /// Configuration file (default: ~/.config/zabbixctl.conf)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v debug, -vv trace with response bodies)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Triggers in problem state
    Triggers {
        /// Include triggers in OK state
        #[arg(long)]
        all: bool,
    },
    /// Hosts
    Hosts,
    /// Host groups
    HostGroups,
    /// User groups with their members
    UserGroups,
    /// Users
    Users,
    /// Maintenance periods
    Maintenances,
    /// Items of a host
    Items { host: String },
    /// Latest values of an item
    History {
        itemid: String,
        #[arg(short, long, default_value_t = 20)]
        limit: u32,
    },
    /// Acknowledge events
    Acknowledge {
        #[arg(required = true)]
        eventids: Vec<String>,
    },
    /// Add a user to a user group
    AddUser { group: String, user: String },
    /// Remove a user from a user group
    RemoveUser { group: String, user: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let log = LogConfig::new(cli.verbose);
    if let Err(e) = init_logging(&log) {
        eprintln!("can't initialize logging: {}", e);
    }

    match run(cli, log.trace_bodies()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", render_chain(e.as_ref()));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, trace_bodies: bool) -> CliResult<()> {
    let path = match cli.config {
        Some(path) => path,
        None => default_config_path().ok_or("can't locate home directory for default config")?,
    };
    let config = Config::load(&path)?;

    let client = config
        .client_builder()?
        .trace_bodies(trace_bodies)
        .connect()
        .await?;

    match cli.command {
        Command::Triggers { all } => {
            let mut params = Params::new();
            if !all {
                params.insert("only_true", true);
                params.insert("filter", json!({"value": "1"}));
            }
            print(&client.get_triggers(params).await?)
        }
        Command::Hosts => print(&client.get_hosts(Params::new()).await?),
        Command::HostGroups => print(&client.get_host_groups(Params::new()).await?),
        Command::UserGroups => print(&client.get_user_groups(Params::new()).await?),
        Command::Users => print(&client.get_users(Params::new()).await?),
        Command::Maintenances => print(&client.get_maintenances(Params::new()).await?),
        Command::Items { host } => {
            let params = Params::new()
                .with("host", host)
                .with("selectHosts", json!(["name"]));
            print(&client.get_items(params).await?)
        }
        Command::History { itemid, limit } => {
            let items = client
                .get_items(Params::new().with("itemids", json!([itemid])))
                .await?;
            let item = items
                .first()
                .ok_or_else(|| format!("item {} not found", itemid))?;

            let params = Params::new()
                .with("itemids", json!([itemid]))
                .with("history", history_type(item)?)
                .with("limit", limit);
            print(&client.get_history(params).await?)
        }
        Command::Acknowledge { eventids } => {
            client.acknowledge(eventids.as_slice()).await?;
            print(&json!({ "acknowledged": eventids }))
        }
        Command::AddUser { group, user } => {
            let (groups, user) = resolve_membership(&client, &group, &user).await?;
            client.add_user_to_groups(&groups, &user).await?;
            print(&json!({ "group": group, "added": user.userid }))
        }
        Command::RemoveUser { group, user } => {
            let (groups, user) = resolve_membership(&client, &group, &user).await?;
            client.remove_user_from_groups(&groups, &user).await?;
            print(&json!({ "group": group, "removed": user.userid }))
        }
    }
}

/// Look up a user group by name and a user by login name
async fn resolve_membership(
    client: &ZabbixClient,
    group: &str,
    user: &str,
) -> CliResult<(Vec<zabbixctl::client::UserGroup>, zabbixctl::client::User)> {
    let groups = client
        .get_user_groups(Params::new().with("filter", json!({ "name": group })))
        .await?;
    if groups.is_empty() {
        return Err(format!("user group '{}' not found", group).into());
    }

    let login_field = if client.api_version().satisfies(USERNAME_LOGIN_CONSTRAINT)? {
        "username"
    } else {
        "alias"
    };
    let mut filter = serde_json::Map::new();
    filter.insert(login_field.to_string(), json!(user));
    let users = client
        .get_users(Params::new().with("filter", filter))
        .await?;
    let found = users
        .into_iter()
        .next()
        .ok_or_else(|| format!("user '{}' not found", user))?;

    Ok((groups, found))
}

/// History table of an item, taken from its `value_type`
fn history_type(item: &Item) -> CliResult<i64> {
    item.value_type.parse::<i64>().map_err(|e| {
        format!(
            "item {} has invalid value_type '{}': {}",
            item.itemid, item.value_type, e
        )
        .into()
    })
}

fn print<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_membership_command() {
        let cli = Cli::try_parse_from(["zabbixctl", "-vv", "add-user", "ops", "alice"]).unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::AddUser { group, user } => {
                assert_eq!(group, "ops");
                assert_eq!(user, "alice");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_acknowledge_requires_ids() {
        assert!(Cli::try_parse_from(["zabbixctl", "acknowledge"]).is_err());
    }

    fn item(value_type: &str) -> Item {
        serde_json::from_value(json!({
            "itemid": "23296",
            "type": "0",
            "value_type": value_type
        }))
        .unwrap()
    }

    #[test]
    fn test_history_type_follows_value_type() {
        assert_eq!(history_type(&item("3")).unwrap(), 3);
    }

    #[test]
    fn test_history_type_rejects_malformed_value_type() {
        let err = history_type(&item("float")).unwrap_err();
        assert!(err.to_string().contains("23296"));
        assert!(err.to_string().contains("'float'"));
    }

    #[test]
    fn test_missing_value_type_is_an_error() {
        assert!(history_type(&item("")).is_err());
    }
}
