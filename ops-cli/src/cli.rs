use auth_permissions::{Permission, Role};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Manage permissions and role grants
#[derive(Parser, Debug)]
#[command(name = "permctl")]
#[command(version, about = "Manage permissions, role grants and authorization checks")]
pub struct Cli {
    /// Configuration file path (YAML or TOML)
    #[arg(short, long, env = "PERMCTL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,

    /// Print command results as JSON
    #[arg(long)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct PermissionArgs {
    /// Protected resource identifier
    #[arg(long)]
    pub resource: String,

    /// Action on the resource
    #[arg(long)]
    pub action: String,
}

impl PermissionArgs {
    pub fn permission(&self) -> Permission {
        Permission::new(&self.resource, &self.action)
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create a permission
    Add(PermissionArgs),

    /// Revoke a permission from every role and delete it
    Delete(PermissionArgs),

    /// Grant a permission to a role
    Grant {
        #[command(flatten)]
        permission: PermissionArgs,

        #[arg(long)]
        role_id: String,

        /// Display name recorded for the role, defaults to the id
        #[arg(long)]
        role_name: Option<String>,
    },

    /// Revoke a permission from one role, or from every role without --role-id
    Revoke {
        #[command(flatten)]
        permission: PermissionArgs,

        #[arg(long)]
        role_id: Option<String>,
    },

    /// Check whether a user holds a permission
    Check {
        #[command(flatten)]
        permission: PermissionArgs,

        #[arg(long)]
        user: String,
    },

    /// List the roles holding a permission
    Roles(PermissionArgs),
}

impl Command {
    /// Whether the command needs an identity provider
    pub fn resolves_users(&self) -> bool {
        matches!(self, Command::Check { .. })
    }
}

pub fn role(id: &str, name: Option<&str>) -> Role {
    Role::new(id, name.unwrap_or(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_grant() {
        let cli = Cli::try_parse_from([
            "permctl",
            "grant",
            "--resource",
            "dashboard-1",
            "--action",
            "view",
            "--role-id",
            "role-analyst",
        ])
        .unwrap();

        assert!(!cli.verbose);
        assert_eq!(
            cli.command,
            Command::Grant {
                permission: PermissionArgs {
                    resource: "dashboard-1".to_string(),
                    action: "view".to_string(),
                },
                role_id: "role-analyst".to_string(),
                role_name: None,
            }
        );
    }

    #[test]
    fn test_parse_global_flags_and_check() {
        let cli = Cli::try_parse_from([
            "permctl",
            "--config",
            "permctl.yaml",
            "-v",
            "--json",
            "check",
            "--resource",
            "dashboard-1",
            "--action",
            "view",
            "--user",
            "alice",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("permctl.yaml")));
        assert!(cli.verbose && cli.json && !cli.json_logs);
        assert!(cli.command.resolves_users());
    }

    #[test]
    fn test_revoke_role_is_optional() {
        let cli =
            Cli::try_parse_from(["permctl", "revoke", "--resource", "r", "--action", "a"]).unwrap();
        assert!(matches!(cli.command, Command::Revoke { role_id: None, .. }));
    }

    #[test]
    fn test_missing_action_is_rejected() {
        assert!(Cli::try_parse_from(["permctl", "add", "--resource", "dashboard-1"]).is_err());
    }

    #[test]
    fn test_role_name_defaults_to_id() {
        assert_eq!(role("role-admin", None), Role::new("role-admin", "role-admin"));
        assert_eq!(role("role-admin", Some("Admins")).display_name, "Admins");
    }
}
