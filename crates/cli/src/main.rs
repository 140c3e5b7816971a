//! PTT admin CLI - manage channels and users from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Start a session (password may also come from PTT_ADMIN_PASSWORD)
//! ptt-admin login -u root -p secret
//!
//! # List channels matching "ops"
//! ptt-admin channels list -s ops
//!
//! # Show a channel with its allowed and available users
//! ptt-admin channels show 7
//!
//! # Grant user 3 access to channel 7 and revoke user 1
//! ptt-admin channels edit 7 --add 3 --remove 1
//!
//! # Create a manager assigned to channels 4 and 7
//! ptt-admin users create --username alice --password hunter22 --role manager --channel 4 --channel 7
//!
//! # End the session
//! ptt-admin logout
//! ```
//!
//! # Commands
//!
//! - `login` / `logout` - Session management
//! - `channels` - List, show, create, edit and delete channels
//! - `users` - List, show, create, edit and delete users
//!
//! Tables go to stdout; logs go to stderr.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use ptt_admin::config::{ConsoleConfig, LogFormat};
use ptt_admin_core::{ChannelId, UserId, UserRole};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{CliError, Context};

#[derive(Parser)]
#[command(name = "ptt-admin")]
#[command(author, version, about = "PTT admin console CLI")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session
    Login {
        /// Admin username
        #[arg(short, long)]
        username: String,

        /// Admin password
        #[arg(short, long, env = "PTT_ADMIN_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// End the session and forget its cookies
    Logout,
    /// Manage channels
    Channels {
        #[command(subcommand)]
        action: ChannelAction,
    },
    /// Manage users
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum ChannelAction {
    /// List channels
    List {
        /// Only show channels whose name contains this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show a channel with its allowed and available users
    Show {
        id: ChannelId,

        /// Filter the available users
        #[arg(long)]
        available_search: Option<String>,

        /// Filter the allowed users
        #[arg(long)]
        allowed_search: Option<String>,
    },
    /// Create a channel
    Create {
        /// Channel name
        #[arg(short, long)]
        name: String,

        /// User allowed on the channel (repeatable)
        #[arg(long = "user")]
        users: Vec<UserId>,
    },
    /// Edit a channel
    Edit {
        id: ChannelId,

        /// New name
        #[arg(short, long)]
        name: Option<String>,

        /// User to allow (repeatable)
        #[arg(long)]
        add: Vec<UserId>,

        /// User to disallow (repeatable)
        #[arg(long)]
        remove: Vec<UserId>,
    },
    /// Delete a channel
    Delete {
        id: ChannelId,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// List users
    List {
        /// Only show users whose username contains this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show a user with their assigned and available channels
    Show {
        id: UserId,

        /// Filter the available channels
        #[arg(long)]
        available_search: Option<String>,

        /// Filter the assigned channels
        #[arg(long)]
        allowed_search: Option<String>,
    },
    /// Create a user
    Create {
        /// Login name
        #[arg(short, long)]
        username: String,

        /// Initial password
        #[arg(short, long)]
        password: String,

        /// Role (`regular`, `senior`, `manager`, `admin`)
        #[arg(short, long, default_value = "regular")]
        role: UserRole,

        /// Create the account disabled
        #[arg(long)]
        inactive: bool,

        /// Channel to assign (repeatable)
        #[arg(long = "channel")]
        channels: Vec<ChannelId>,
    },
    /// Edit a user
    Edit {
        id: UserId,

        /// New login name
        #[arg(short, long)]
        username: Option<String>,

        /// New password; omitted keeps the current one
        #[arg(short, long)]
        password: Option<String>,

        /// New role
        #[arg(short, long)]
        role: Option<UserRole>,

        /// Enable or disable the account
        #[arg(long)]
        active: Option<bool>,

        /// Channel to assign (repeatable)
        #[arg(long)]
        add: Vec<ChannelId>,

        /// Channel to unassign (repeatable)
        #[arg(long)]
        remove: Vec<ChannelId>,
    },
    /// Delete a user
    Delete {
        id: UserId,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ConsoleConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::debug!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Default filter when `RUST_LOG` is unset.
fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "ptt_admin=warn",
        1 => "ptt_admin=debug",
        _ => "ptt_admin=trace,reqwest=debug",
    }
}

fn init_tracing(config: &ConsoleConfig, verbose: u8) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(verbose).into());

    let is_json = config.log_format == LogFormat::Json;
    let json_layer = is_json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer =
        (!is_json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));
    let sentry_layer = config
        .sentry_dsn
        .is_some()
        .then(|| sentry_tracing::layer().event_filter(sentry_event_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_layer)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ConsoleConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing_subscriber::fmt().with_writer(std::io::stderr).init();
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(2);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);
    init_tracing(&config, cli.verbose);

    if let Err(e) = run(cli, config).await {
        tracing::error!("Command failed: {e}");
        if e.is_unauthorized() {
            tracing::error!("Not logged in or session expired. Run `ptt-admin login` first.");
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: ConsoleConfig) -> Result<(), CliError> {
    let ctx = Context::open(config)?;

    let result = dispatch(&ctx, cli.command).await;

    // Keep refreshed cookies even when the command failed
    ctx.save()?;
    result
}

async fn dispatch(ctx: &Context, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Login { username, password } => {
            commands::auth::login(ctx, &username, password).await
        }
        Commands::Logout => commands::auth::logout(ctx).await,
        Commands::Channels { action } => match action {
            ChannelAction::List { search } => {
                commands::records::list::<ptt_admin_core::Channel>(ctx, search).await
            }
            ChannelAction::Show {
                id,
                available_search,
                allowed_search,
            } => {
                commands::records::show::<ptt_admin_core::Channel>(
                    ctx,
                    id,
                    available_search,
                    allowed_search,
                )
                .await
            }
            ChannelAction::Create { name, users } => {
                commands::channels::create(ctx, name, users).await
            }
            ChannelAction::Edit {
                id,
                name,
                add,
                remove,
            } => commands::channels::edit(ctx, id, name, &add, &remove).await,
            ChannelAction::Delete { id, yes } => {
                commands::records::delete::<ptt_admin_core::Channel>(ctx, id, yes).await
            }
        },
        Commands::Users { action } => match action {
            UserAction::List { search } => {
                commands::records::list::<ptt_admin_core::User>(ctx, search).await
            }
            UserAction::Show {
                id,
                available_search,
                allowed_search,
            } => {
                commands::records::show::<ptt_admin_core::User>(
                    ctx,
                    id,
                    available_search,
                    allowed_search,
                )
                .await
            }
            UserAction::Create {
                username,
                password,
                role,
                inactive,
                channels,
            } => {
                let new_user = commands::users::NewUser {
                    username,
                    password: password.into(),
                    role,
                    active: !inactive,
                    channels,
                };
                commands::users::create(ctx, new_user).await
            }
            UserAction::Edit {
                id,
                username,
                password,
                role,
                active,
                add,
                remove,
            } => {
                let changes = commands::users::UserChanges {
                    username,
                    password: password.map(Into::into),
                    role,
                    active,
                };
                commands::users::edit(ctx, id, changes, &add, &remove).await
            }
            UserAction::Delete { id, yes } => {
                commands::records::delete::<ptt_admin_core::User>(ctx, id, yes).await
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_channel_edit() {
        let cli = Cli::try_parse_from([
            "ptt-admin", "channels", "edit", "7", "--add", "3", "--add", "4", "--remove", "1",
        ])
        .unwrap_or_else(|e| panic!("{e}"));
        let Commands::Channels {
            action: ChannelAction::Edit { id, add, remove, name },
        } = cli.command
        else {
            panic!("expected channels edit");
        };
        assert_eq!(id, ChannelId::new(7));
        assert_eq!(add, vec![UserId::new(3), UserId::new(4)]);
        assert_eq!(remove, vec![UserId::new(1)]);
        assert!(name.is_none());
    }

    #[test]
    fn test_parse_user_create_role() {
        let cli = Cli::try_parse_from([
            "ptt-admin", "users", "create", "--username", "alice", "--password", "pw", "--role",
            "manager", "--channel", "4",
        ])
        .unwrap_or_else(|e| panic!("{e}"));
        let Commands::Users {
            action: UserAction::Create { role, channels, inactive, .. },
        } = cli.command
        else {
            panic!("expected users create");
        };
        assert_eq!(role, UserRole::Manager);
        assert_eq!(channels, vec![ChannelId::new(4)]);
        assert!(!inactive);
    }

    #[test]
    fn test_rejects_unknown_role() {
        assert!(
            Cli::try_parse_from([
                "ptt-admin", "users", "create", "--username", "a", "--password", "b", "--role",
                "superuser",
            ])
            .is_err()
        );
    }

    #[test]
    fn test_verbosity_raises_filter() {
        assert_eq!(default_filter(0), "ptt_admin=warn");
        assert!(default_filter(2).contains("trace"));
    }
}
