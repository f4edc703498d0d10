use clap::{Parser, Subcommand};
use dbdeck::api::ApiClient;
use dbdeck::auth::AuthHandle;
use dbdeck::error::DeckError;
use dbdeck::types::{DatabaseId, DatabaseRecord, User};
use dbdeck::views::auth::banner_message;
use dbdeck::views::{
    App, AuthPage, CreateDatabaseForm, Dashboard, DashboardMode, LoginForm, SignupForm,
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

/// dbdeck - terminal client for the database provisioning service
#[derive(Parser, Debug)]
#[command(name = "dbdeck", version, long_about = None)]
pub struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an account and sign in
    Signup {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long = "confirm-password")]
        confirm_password: String,
    },
    /// Sign in with an existing account
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Manage database instances
    Db {
        #[command(subcommand)]
        action: DbCommand,
    },
    /// Interactive dashboard
    Dashboard,
}

#[derive(Subcommand, Debug)]
pub enum DbCommand {
    /// List your databases
    List,
    /// Provision a new database and print its credentials
    Create {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long = "db-type", default_value = "POSTGRES")]
        db_type: String,
        #[arg(long = "db-version", default_value = "16")]
        db_version: String,
    },
    /// Show details and connection string for one database
    Show {
        id: DatabaseId,
        /// Print the password instead of masking it
        #[arg(long)]
        reveal: bool,
    },
    /// Delete a database
    Delete { id: DatabaseId },
}

const LOGOUT_FAILED: &str = "Could not clear the stored session; still logged in.";

pub struct Context {
    pub api: Arc<ApiClient>,
    pub auth: AuthHandle,
    /// Host used in connection strings when a record carries none.
    pub backend_host: String,
}

/// Run one command. Failures are printed as an error banner; the return value
/// says whether the command succeeded.
pub async fn run(command: Command, ctx: &Context) -> bool {
    match dispatch(command, ctx).await {
        Ok(ok) => ok,
        Err(e) => {
            print_banner(&banner_message(&e));
            false
        }
    }
}

async fn dispatch(command: Command, ctx: &Context) -> Result<bool, DeckError> {
    match command {
        Command::Signup {
            username,
            email,
            password,
            confirm_password,
        } => {
            let mut page = AuthPage::new(ctx.api.clone(), ctx.auth.clone());
            let form = SignupForm {
                username,
                email,
                password,
                confirm_password,
            };
            Ok(finish_auth(&page.submit_signup(form).await, &page))
        }
        Command::Login { email, password } => {
            let mut page = AuthPage::new(ctx.api.clone(), ctx.auth.clone());
            page.toggle();
            let form = LoginForm { email, password };
            Ok(finish_auth(&page.submit_login(form).await, &page))
        }
        Command::Logout => {
            if ctx.auth.logout().await? {
                println!("Logged out.");
                Ok(true)
            } else {
                print_banner(LOGOUT_FAILED);
                Ok(false)
            }
        }
        Command::Whoami => {
            match ctx.auth.current_user().await? {
                Some(user) => println!("{} <{}> (id {})", user.username, user.email, user.id),
                None => println!("Not logged in."),
            }
            Ok(true)
        }
        Command::Db { action } => {
            let user = ctx.auth.require_user().await?;
            db_command(action, Dashboard::new(ctx.api.clone(), user), ctx).await
        }
        Command::Dashboard => {
            let user = ctx.auth.require_user().await?;
            interactive(Dashboard::new(ctx.api.clone(), user), ctx).await
        }
    }
}

fn finish_auth(user: &Option<User>, page: &AuthPage) -> bool {
    match (user, page.error()) {
        (Some(user), _) => {
            println!("Signed in as {} <{}>.", user.username, user.email);
            true
        }
        (None, Some(message)) => {
            print_banner(message);
            false
        }
        (None, None) => false,
    }
}

async fn db_command(
    action: DbCommand,
    mut dash: Dashboard,
    ctx: &Context,
) -> Result<bool, DeckError> {
    match action {
        DbCommand::List => {
            dash.refresh().await;
            if let Some(err) = dash.error() {
                print_banner(err);
                return Ok(false);
            }
            render_list(dash.databases());
            Ok(true)
        }
        DbCommand::Create {
            name,
            description,
            db_type,
            db_version,
        } => {
            dash.begin_create();
            let form = CreateDatabaseForm {
                database_name: name,
                db_type,
                version: db_version,
                description,
            };
            match dash.submit_create(form).await {
                Some(record) => {
                    render_credentials(&record, &ctx.backend_host);
                    Ok(true)
                }
                None => {
                    if let Some(err) = dash.form_error().or(dash.error()) {
                        print_banner(err);
                    }
                    Ok(false)
                }
            }
        }
        DbCommand::Show { id, reveal } => {
            dash.refresh().await;
            if let Some(err) = dash.error() {
                print_banner(err);
                return Ok(false);
            }
            if !dash.select(id) {
                print_banner(&format!("No database with id {id}"));
                return Ok(false);
            }
            if let Some(record) = dash.drawer() {
                render_drawer(record, &ctx.backend_host, reveal);
            }
            Ok(true)
        }
        DbCommand::Delete { id } => {
            if dash.delete(id).await {
                println!("Deleted database {id}.");
                Ok(true)
            } else {
                if let Some(err) = dash.error() {
                    print_banner(err);
                }
                Ok(false)
            }
        }
    }
}

const HELP: &str = "\
commands:
  list                      reload and show databases
  create NAME [DESCRIPTION] provision a database
  cancel                    leave the create panel
  show ID                   open the detail drawer
  reveal                    toggle password visibility in the drawer
  close                     close credentials or the drawer
  delete ID                 delete a database
  dismiss                   clear the error banner
  logout                    sign out and quit
  quit                      leave the dashboard";

async fn interactive(mut dash: Dashboard, ctx: &Context) -> Result<bool, DeckError> {
    let mut app = App::new(ctx.auth.clone());
    app.get_started().await?;
    let mut reveal = false;

    println!("Signed in as {}. Type `help` for commands.", dash.user().username);
    dash.refresh().await;
    render(&dash, ctx, reveal);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let Ok(Some(line)) = lines.next_line().await else {
            break;
        };
        let mut words = line.split_whitespace();
        let Some(cmd) = words.next() else {
            continue;
        };
        match cmd {
            "help" | "?" => println!("{HELP}"),
            "list" | "ls" | "refresh" => dash.refresh().await,
            "create" | "new" => {
                dash.begin_create();
                match words.next() {
                    Some(name) => {
                        let mut form = CreateDatabaseForm::named(name);
                        form.description = words.collect::<Vec<_>>().join(" ");
                        dash.submit_create(form).await;
                    }
                    None => println!("usage: create NAME [DESCRIPTION]  (or `cancel`)"),
                }
            }
            "cancel" => dash.cancel_create(),
            "show" => match parse_id(words.next()) {
                Some(id) if dash.select(id) => reveal = false,
                _ => println!("usage: show ID (from the list)"),
            },
            "reveal" => reveal = !reveal,
            "close" => {
                if matches!(dash.mode(), DashboardMode::ShowingCredentials(_)) {
                    dash.close_credentials();
                } else {
                    dash.close_drawer();
                }
            }
            "delete" | "rm" => match parse_id(words.next()) {
                Some(id) => {
                    dash.delete(id).await;
                }
                None => println!("usage: delete ID"),
            },
            "dismiss" => dash.dismiss_error(),
            "logout" => {
                if app.logout().await? {
                    println!("Logged out.");
                    return Ok(true);
                }
                print_banner(LOGOUT_FAILED);
            }
            "quit" | "exit" | "q" => break,
            other => println!("unknown command `{other}`; try `help`"),
        }
        render(&dash, ctx, reveal);
    }
    Ok(true)
}

fn parse_id(word: Option<&str>) -> Option<DatabaseId> {
    word.and_then(|w| w.parse().ok())
}

fn render(dash: &Dashboard, ctx: &Context, reveal: bool) {
    if let Some(err) = dash.error() {
        print_banner(err);
    }
    match dash.mode() {
        DashboardMode::Listing => {
            if dash.is_loading() {
                println!("Loading databases...");
            } else {
                render_list(dash.databases());
            }
        }
        DashboardMode::Creating => {
            println!("-- Create Database (POSTGRES 16) --");
            if let Some(err) = dash.form_error() {
                println!("  ! {err}");
            }
        }
        DashboardMode::ShowingCredentials(record) => render_credentials(record, &ctx.backend_host),
    }
    if let Some(record) = dash.drawer() {
        render_drawer(record, &ctx.backend_host, reveal);
    }
}

fn display_host<'a>(record: &'a DatabaseRecord, backend_host: &'a str) -> &'a str {
    record
        .host
        .as_deref()
        .filter(|h| !h.is_empty())
        .unwrap_or(backend_host)
}

fn print_banner(message: &str) {
    eprintln!("error: {message}");
}

fn render_list(databases: &[DatabaseRecord]) {
    if databases.is_empty() {
        println!("No databases yet. Create your first database to get started.");
        return;
    }
    println!(
        "{:<6} {:<24} {:<10} {:<8} {:<8} {:<10}",
        "ID", "NAME", "TYPE", "VERSION", "PORT", "STATUS"
    );
    for db in databases {
        println!(
            "{:<6} {:<24} {:<10} {:<8} {:<8} {:<10}",
            db.id,
            db.db_name,
            db.db_type,
            db.db_version,
            db.port_or_default(),
            db.status.as_deref().unwrap_or("-")
        );
    }
}

fn render_credentials(record: &DatabaseRecord, backend_host: &str) {
    println!("Database `{}` is ready. Save these credentials now:", record.db_name);
    println!("  host:     {}", display_host(record, backend_host));
    println!("  port:     {}", record.port_or_default());
    println!("  database: {}", record.db_name);
    println!("  username: {}", record.username);
    println!("  password: {}", record.password);
    println!("  url:      {}", record.connection_string(backend_host));
}

fn render_drawer(record: &DatabaseRecord, backend_host: &str, reveal: bool) {
    let password = if reveal {
        record.password.clone()
    } else {
        "•".repeat(record.password.chars().count().max(8))
    };
    println!("== {} (id {}) ==", record.db_name, record.id);
    println!("  type:     {} {}", record.db_type, record.db_version);
    if let Some(desc) = record.description.as_deref().filter(|d| !d.is_empty()) {
        println!("  about:    {desc}");
    }
    println!("  status:   {}", record.status.as_deref().unwrap_or("-"));
    if let Some(created) = record.created_at {
        println!("  created:  {}", created.format("%Y-%m-%d %H:%M UTC"));
    }
    println!("  host:     {}", display_host(record, backend_host));
    println!("  port:     {}", record.port_or_default());
    println!("  username: {}", record.username);
    println!("  password: {password}");
    if reveal {
        println!("  url:      {}", record.connection_string(backend_host));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbdeck::api::Endpoints;
    use dbdeck::session::SessionStore;
    use dbdeck::storage::MemoryStore;
    use url::Url;

    async fn auth_page() -> AuthPage {
        let endpoints = Endpoints::new(Url::parse("http://127.0.0.1:9/api/").unwrap(), None);
        let api = Arc::new(ApiClient::new(reqwest::Client::new(), endpoints));
        let auth = dbdeck::auth::spawn(SessionStore::new(Arc::new(MemoryStore::new())))
            .await
            .unwrap();
        AuthPage::new(api, auth)
    }

    fn record(host: Option<&str>) -> DatabaseRecord {
        serde_json::from_value(serde_json::json!({
            "id": 3,
            "dbName": "orders",
            "host": host,
        }))
        .unwrap()
    }

    #[test]
    fn parse_id_accepts_only_integers() {
        assert_eq!(parse_id(Some("42")), Some(42));
        assert_eq!(parse_id(Some("x1")), None);
        assert_eq!(parse_id(Some("")), None);
        assert_eq!(parse_id(None), None);
    }

    #[test]
    fn empty_host_falls_back_to_backend() {
        assert_eq!(display_host(&record(Some("")), "db.local"), "db.local");
        assert_eq!(display_host(&record(None), "db.local"), "db.local");
        assert_eq!(display_host(&record(Some("10.1.2.3")), "db.local"), "10.1.2.3");
    }

    #[tokio::test]
    async fn finish_auth_maps_outcome_to_success() {
        let mut page = auth_page().await;
        let ada = User {
            id: 1,
            username: "ada".into(),
            email: "ada@example.com".into(),
        };
        assert!(finish_auth(&Some(ada), &page));
        assert!(!finish_auth(&None, &page));

        let form = LoginForm {
            email: "not-an-email".into(),
            password: "hunter22".into(),
        };
        assert!(page.submit_login(form).await.is_none());
        assert!(page.error().is_some());
        assert!(!finish_auth(&None, &page));
    }
}
