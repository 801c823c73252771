use std::path::PathBuf;

use anyhow::{anyhow, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use pondwatch::{logging, report, App, MonitorConfig};
use pondwatch_client::{AuthEvent, Claims, Credentials, CurrentUser, Registration, UserProfile};
use pondwatch_types::Locale;

#[derive(Parser, Debug)]
#[command(name = "pondwatch")]
#[command(about = "Monitor aquaculture pond sensors from the terminal")]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Language for messages ("id" or "en"), overrides the configuration
    #[arg(long, global = true)]
    locale: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and store the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Create an account (does not log in)
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },

    /// End the session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Poll the dashboard and print every update until Ctrl-C
    Watch {
        /// Print the first loaded snapshot and exit
        #[arg(long)]
        once: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = MonitorConfig::load(args.config.as_deref())?;
    if let Some(tag) = &args.locale {
        config.locale =
            Locale::from_tag(tag).ok_or_else(|| anyhow!("Unsupported locale: {}", tag))?;
    }
    logging::init_tracing(&config.logging)?;

    let app = App::from_config(&config)?;

    match args.command {
        Command::Login { email, password } => {
            let session = app
                .sessions()
                .login(&Credentials::new(email, password))
                .await?;
            match session.profile {
                Some(profile) => println!("Logged in as {}", describe_profile(&profile)),
                None => println!("Logged in"),
            }
        }
        Command::Register {
            name,
            email,
            password,
            confirm_password,
        } => {
            let registration = Registration::new(name, email, password, confirm_password);
            let user = app.sessions().register(&registration).await?;
            println!("Registered {}. Log in with `pondwatch login`.", user.email);
        }
        Command::Logout => {
            app.monitor().logout().await;
            println!("Logged out");
        }
        Command::Whoami => {
            if !app.sessions().is_authenticated() {
                return Err(anyhow!("Not logged in"));
            }
            match app.monitor().navigate().await {
                Some(CurrentUser::Profile(profile)) => println!("{}", describe_profile(&profile)),
                Some(CurrentUser::Claims(claims)) => println!("{} (offline)", describe_claims(&claims)),
                None => return Err(anyhow!("Not logged in")),
            }
        }
        Command::Watch { once } => watch(&app, once).await?,
    }

    Ok(())
}

/// Mount the monitor and print each published snapshot.
async fn watch(app: &App, once: bool) -> Result<()> {
    let mut snapshots = app.monitor().dashboard().subscribe();
    let mut events = app.sessions().events().subscribe();

    if !app.monitor().mount() {
        return Err(anyhow!("Not logged in. Run `pondwatch login` first."));
    }
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => break,

            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                println!("{}", report::render(&snapshot, app.locale(), &Local));
                if once && !snapshot.loading {
                    break;
                }
            }

            event = events.recv() => {
                if let Ok(AuthEvent::SessionCleared { .. }) = event {
                    println!("{}", app.locale().session_expired());
                    break;
                }
            }
        }
    }

    app.monitor().unmount();
    Ok(())
}

fn describe_profile(profile: &UserProfile) -> String {
    let mut line = match &profile.name {
        Some(name) => format!("{} <{}>", name, profile.email),
        None => profile.email.clone(),
    };
    if let Some(role) = &profile.role {
        line.push_str(&format!(" [{}]", role));
    }
    line
}

fn describe_claims(claims: &Claims) -> String {
    let mut line = claims.email.clone().unwrap_or_else(|| "unknown user".to_string());
    if let Some(id) = &claims.user_id {
        line.push_str(&format!(" #{}", id));
    }
    if let Some(role) = &claims.role {
        line.push_str(&format!(" [{}]", role));
    }
    line
}
