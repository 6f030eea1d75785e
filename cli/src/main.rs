//! `clinic`: terminal front end over the ClinicSys session core.
//!
//! Uses the same store, provider, authenticator and route table as the web
//! client, with a JSON file in place of `localStorage`.

mod file_store;
mod transport;

use std::io::{self, BufRead};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use session::routes::protection_for;
use session::{
    ApiError, ApiRequest, AuthError, GuardDecision, HttpAuthService, RequestAuthenticator, SessionHandle,
    SessionProvider, SessionStore, SharedSession,
};

use crate::file_store::{FileStore, default_session_file};
use crate::transport::{DEFAULT_BASE_URL, ReqwestTransport, TerminalNavigator};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("login failed: {0}")]
    Login(#[from] AuthError),
    #[error("request failed: {0}")]
    Api(#[from] ApiError),
    #[error("not signed in")]
    NotSignedIn,
    #[error("missing password; pass --password, set CLINIC_PASSWORD, or pipe it on stdin")]
    MissingPassword,
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "clinic", about = "ClinicSys session and API CLI")]
struct Cli {
    #[arg(long, env = "CLINIC_API_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Defaults to `$HOME/.clinic-session.json`.
    #[arg(long, env = "CLINIC_SESSION_FILE")]
    session_file: Option<PathBuf>,

    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Exchange credentials for a session and store it.
    Login {
        #[arg(long)]
        username: String,
        #[arg(long, env = "CLINIC_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    Logout,
    Whoami,
    Get {
        path: String,
    },
    Delete {
        path: String,
    },
    Post(BodyArgs),
    Put(BodyArgs),
    /// Show what the route guard decides for `path` with the stored session.
    Guard {
        path: String,
    },
}

#[derive(Args, Debug)]
struct BodyArgs {
    path: String,
    #[arg(long)]
    data: String,
}

type CliHandle = SessionHandle<FileStore, SharedSession>;

struct CliContext {
    handle: CliHandle,
    transport: ReqwestTransport,
}

impl CliContext {
    fn provider(&self) -> SessionProvider<FileStore, SharedSession, HttpAuthService<ReqwestTransport>> {
        SessionProvider::new(self.handle.clone(), HttpAuthService::new(self.transport.clone()))
    }

    fn api(&self) -> RequestAuthenticator<ReqwestTransport, FileStore, SharedSession, TerminalNavigator> {
        RequestAuthenticator::new(self.transport.clone(), self.handle.clone(), TerminalNavigator)
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let level = if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };
    tracing_subscriber::fmt().with_writer(io::stderr).with_max_level(level).init();

    let path = cli.session_file.unwrap_or_else(default_session_file);
    let ctx = CliContext {
        handle: SessionHandle::new(SessionStore::new(FileStore::new(path)), SharedSession::default()),
        transport: ReqwestTransport::new(cli.base_url),
    };
    ctx.provider().initialize();

    match cli.command {
        Command::Login { username, password } => run_login(&ctx, &username, password).await,
        Command::Logout => {
            ctx.provider().logout();
            println!("signed out");
            Ok(())
        }
        Command::Whoami => run_whoami(&ctx),
        Command::Get { path } => run_request(&ctx, ApiRequest::get(path)).await,
        Command::Delete { path } => run_request(&ctx, ApiRequest::delete(path)).await,
        Command::Post(args) => {
            let body = serde_json::from_str::<Value>(&args.data)?;
            run_request(&ctx, ApiRequest::post(args.path, body)).await
        }
        Command::Put(args) => {
            let body = serde_json::from_str::<Value>(&args.data)?;
            run_request(&ctx, ApiRequest::put(args.path, body)).await
        }
        Command::Guard { path } => {
            println!("{}", guard_report(&ctx.handle.state(), &path));
            Ok(())
        }
    }
}

async fn run_login(ctx: &CliContext, username: &str, password: Option<String>) -> Result<(), CliError> {
    let password = match password {
        Some(password) => password,
        None => read_password_line()?,
    };
    let session = ctx.provider().login(username, &password).await?;
    println!("signed in as {} ({})", session.user.username, session.user.role);
    Ok(())
}

fn read_password_line() -> Result<String, CliError> {
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']).to_owned();
    if password.is_empty() {
        return Err(CliError::MissingPassword);
    }
    Ok(password)
}

fn run_whoami(ctx: &CliContext) -> Result<(), CliError> {
    let user = ctx.provider().user().ok_or(CliError::NotSignedIn)?;
    println!("{} ({})", user.username, user.role);
    Ok(())
}

async fn run_request(ctx: &CliContext, request: ApiRequest) -> Result<(), CliError> {
    let response = ctx.api().send(request).await?;
    let value: Value = response.json().map_err(|e| ApiError::Decode(e.to_string()))?;
    if !value.is_null() {
        println!("{}", serde_json::to_string_pretty(&value)?);
    }
    Ok(())
}

fn guard_report(state: &session::SessionState, path: &str) -> String {
    let Some(protection) = protection_for(path) else {
        return format!("{path}: public");
    };
    match protection.evaluate(state, path) {
        GuardDecision::Loading => format!("{path}: loading"),
        GuardDecision::Render => format!("{path}: render"),
        GuardDecision::Forbidden => format!("{path}: forbidden"),
        redirect @ GuardDecision::Redirect { .. } => {
            format!("{path}: redirect {}", redirect.redirect_url().unwrap_or_default())
        }
    }
}
