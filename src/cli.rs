use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command-line front end for the Uniman admin console.
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Cli {
    /// Directory holding config, session and logs (default: ~/.uniman)
    #[arg(long = "data-dir", global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Server origin, overriding the config file and UNIMAN_ORIGIN
    #[arg(long, global = true, value_name = "URL")]
    pub origin: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Sign in with an administrator account
    SignIn {
        #[arg(long, short = 'l')]
        login: String,
        #[arg(long, short = 'p')]
        password: String,
    },

    /// Forget the stored session
    SignOut,

    /// Show the signed-in user's profile
    Whoami,

    /// Emoji management
    Emojis {
        #[command(subcommand)]
        command: EmojiCommand,
    },

    /// Open the dashboard and navigate, printing the resulting state
    Open {
        /// Dashboard URL or query to start from, e.g. `h=event&w=create-event`
        #[arg(long)]
        url: Option<String>,

        /// Section to navigate to after loading (`false` for none)
        #[arg(long = "h", value_name = "SECTION")]
        section: Option<String>,

        /// View to show; defaults to the section
        #[arg(long = "w", value_name = "VIEW")]
        view: Option<String>,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum EmojiCommand {
    /// List available emojis
    List,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_open_with_short_param_names() {
        let cli = Cli::parse_from(["uniman-admin", "--origin", "http://x", "open", "--h", "event", "--w", "create-event"]);
        assert_eq!(cli.origin.as_deref(), Some("http://x"));
        match cli.command {
            Command::Open { section, view, url } => {
                assert_eq!(section.as_deref(), Some("event"));
                assert_eq!(view.as_deref(), Some("create-event"));
                assert!(url.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_data_dir_after_subcommand() {
        let cli = Cli::parse_from(["uniman-admin", "emojis", "list", "--data-dir", "/tmp/u"]);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/u")));
        assert!(matches!(cli.command, Command::Emojis { command: EmojiCommand::List }));
    }
}
