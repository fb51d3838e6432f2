use std::io::Write;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::info;

use crate::application::ports::in_ports::UserManagementUseCase;
use crate::application::services::UserService;
use crate::domain::entities::user::{NewUser, User};
use crate::domain::repositories::{Fields, KeyedRepository, RecordId};

#[derive(Parser, Debug)]
#[command(version, about = "Manage r4gmi users", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the database schema if it does not exist yet
    Migrate,
    /// Operate on user records
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum UserAction {
    /// Register a new user and print its id
    Add {
        #[arg(short = 'n', long)]
        name: String,
        #[arg(short = 'e', long)]
        email: String,
    },
    /// Print every user, newest first
    List,
    /// Print one user
    Get { id: RecordId },
    /// Change the name of an existing user
    Rename {
        id: RecordId,
        #[arg(short = 'n', long)]
        name: String,
    },
}

/// Runs one user action, writing one JSON document per line to `out`.
pub async fn run_user_action<R, W>(service: &UserService<R>, action: UserAction, out: &mut W) -> Result<()>
where
    R: KeyedRepository<Record = User>,
    W: Write,
{
    match action {
        UserAction::Add { name, email } => {
            let user = NewUser::new(name, email)?;
            let id = service.add_user(user).await?;
            info!("user_added::{}", id);
            writeln!(out, "{}", json!({ "id": id }))?;
        }
        UserAction::List => {
            for user in service.get_users().await? {
                writeln!(out, "{}", serde_json::to_string(&user)?)?;
            }
        }
        UserAction::Get { id } => {
            let user = service.get_user(id).await?;
            writeln!(out, "{}", serde_json::to_string(&user)?)?;
        }
        UserAction::Rename { id, name } => {
            let mut data = Fields::new();
            data.insert("name".into(), name.into());
            service.repository().update(id, data).await?;
            info!("user_renamed::{}", id);
        }
    }
    Ok(())
}
