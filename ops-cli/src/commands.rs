use crate::cli::{role, Command};
use auth_permissions::{AuthorityError, PermissionAuthority};
use serde::Serialize;
use std::fmt;
use tracing::info;

/// Result of one `permctl` command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Outcome {
    Done { message: String },
    Decision { user: String, permission: String, allowed: bool },
    Roles { permission: String, roles: Vec<String> },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Done { message } => write!(f, "{}", message),
            Outcome::Decision { user, permission, allowed } => {
                let verdict = if *allowed { "allowed" } else { "denied" };
                write!(f, "{}: {} {}", verdict, user, permission)
            }
            Outcome::Roles { roles, .. } => write!(f, "{}", roles.join("\n")),
        }
    }
}

fn done(message: String) -> Outcome {
    info!("{}", message);
    Outcome::Done { message }
}

/// Run a command against the authority.
///
/// # Errors
///
/// Returns the [`AuthorityError`] of the underlying operation.
pub async fn execute(
    authority: &PermissionAuthority,
    command: &Command,
) -> Result<Outcome, AuthorityError> {
    match command {
        Command::Add(args) => {
            let permission = args.permission();
            authority.add_permission(&permission).await?;
            Ok(done(format!("Added permission {}", permission)))
        }
        Command::Delete(args) => {
            let permission = args.permission();
            authority.delete_permission(&permission).await?;
            Ok(done(format!("Deleted permission {}", permission)))
        }
        Command::Grant { permission, role_id, role_name } => {
            let permission = permission.permission();
            let role = role(role_id, role_name.as_deref());
            authority.grant_permission(&permission, &role).await?;
            Ok(done(format!("Granted {} to {}", permission, role)))
        }
        Command::Revoke { permission, role_id: Some(role_id) } => {
            let permission = permission.permission();
            let role = role(role_id, None);
            authority.revoke_permission_from_role(&permission, &role).await?;
            Ok(done(format!("Revoked {} from {}", permission, role)))
        }
        Command::Revoke { permission, role_id: None } => {
            let permission = permission.permission();
            authority.revoke_permission(&permission).await?;
            Ok(done(format!("Revoked {} from all roles", permission)))
        }
        Command::Check { permission, user } => {
            let permission = permission.permission();
            let allowed = authority.has_permission(user, &permission).await?;
            Ok(Outcome::Decision {
                user: user.clone(),
                permission: permission.to_string(),
                allowed,
            })
        }
        Command::Roles(args) => {
            let permission = args.permission();
            let roles = authority.granted_roles(&permission).await?;
            Ok(Outcome::Roles {
                permission: permission.to_string(),
                roles,
            })
        }
    }
}
