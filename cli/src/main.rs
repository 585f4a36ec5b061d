use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use library_client::api::PageRequest;
use library_client::api::books::{BookSort, SortDirection};
use library_client::types::{BookRequest, BorrowStatus, RegisterRequest};
use library_client::{App, ClientConfig, ClientError, LoginOutcome, Navigation};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("login failed: {}", .0.as_deref().unwrap_or("no reason given"))]
    LoginFailed(Option<String>),
    #[error("registration failed")]
    RegisterFailed,
    #[error("navigation to {from} redirected to {to}")]
    Redirected { from: String, to: &'static str },
    #[error("no route matches {0}")]
    NotFound(String),
    #[error("invalid borrow status: {0}")]
    InvalidStatus(String),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "library-cli", about = "Library management client")]
struct Cli {
    #[arg(long, env = "LIBRARY_API_BASE_URL")]
    base_url: Option<String>,

    #[arg(long, env = "LIBRARY_SESSION_FILE")]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        username: String,
        #[arg(long, env = "LIBRARY_PASSWORD")]
        password: String,
    },
    Register {
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    Logout,
    Whoami,
    /// Re-validate the stored token with the server.
    Check,
    /// Navigate to a path through the route guard.
    Open {
        path: String,
    },
    Books(BooksCommand),
    Borrows(BorrowsCommand),
    Users(UsersCommand),
    Admin(AdminCommand),
}

#[derive(Args, Debug, Clone, Copy)]
struct PageArgs {
    #[arg(long, default_value_t = 0)]
    page: u32,
    #[arg(long, default_value_t = library_client::api::DEFAULT_PAGE_SIZE)]
    size: u32,
}

impl From<PageArgs> for PageRequest {
    fn from(args: PageArgs) -> Self {
        PageRequest::new(args.page, args.size)
    }
}

#[derive(Args, Debug)]
struct BooksCommand {
    #[command(subcommand)]
    command: BooksSubcommand,
}

#[derive(Subcommand, Debug)]
enum BooksSubcommand {
    List {
        #[command(flatten)]
        page: PageArgs,
        #[arg(long, default_value = "id")]
        sort_by: String,
        #[arg(long, default_value_t = false)]
        desc: bool,
    },
    Search {
        keyword: String,
        #[command(flatten)]
        page: PageArgs,
    },
    Category {
        category: String,
        #[command(flatten)]
        page: PageArgs,
    },
    Author {
        author: String,
        #[command(flatten)]
        page: PageArgs,
    },
    Available,
    Show {
        id: i64,
    },
    Isbn {
        isbn: String,
    },
    Add {
        #[arg(long, help = "Book JSON, e.g. {\"isbn\":..,\"title\":..,\"totalCopies\":1}")]
        data: String,
    },
    Update {
        id: i64,
        #[arg(long)]
        data: String,
    },
    Delete {
        id: i64,
    },
}

#[derive(Args, Debug)]
struct BorrowsCommand {
    #[command(subcommand)]
    command: BorrowsSubcommand,
}

#[derive(Subcommand, Debug)]
enum BorrowsSubcommand {
    Request {
        book_id: i64,
        #[arg(long)]
        due_date: Option<String>,
    },
    Approve {
        id: i64,
    },
    Reject {
        id: i64,
    },
    Return {
        id: i64,
    },
    Show {
        id: i64,
    },
    List {
        #[command(flatten)]
        page: PageArgs,
    },
    User {
        user_id: i64,
        #[command(flatten)]
        page: PageArgs,
    },
    Book {
        book_id: i64,
        #[command(flatten)]
        page: PageArgs,
    },
    Status {
        status: String,
        #[command(flatten)]
        page: PageArgs,
    },
    Overdue,
    Current,
}

#[derive(Args, Debug)]
struct UsersCommand {
    #[command(subcommand)]
    command: UsersSubcommand,
}

#[derive(Subcommand, Debug)]
enum UsersSubcommand {
    List,
    Show {
        id: i64,
    },
    Update {
        id: i64,
        #[arg(long)]
        data: String,
    },
    Delete {
        id: i64,
    },
}

#[derive(Args, Debug)]
struct AdminCommand {
    #[command(subcommand)]
    command: AdminSubcommand,
}

#[derive(Subcommand, Debug)]
enum AdminSubcommand {
    Stats,
    Recent,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env();
    if let Some(base_url) = cli.base_url.as_deref() {
        config = config.with_base_url(base_url);
    }
    if let Some(session_file) = cli.session_file {
        config = config.with_session_file(session_file);
    }
    if !needs_startup_check(&cli.command) {
        config.check_on_startup = false;
    }

    let app = App::from_config(config)?;
    app.bootstrap().await;

    match cli.command {
        Command::Login { username, password } => run_login(&app, &username, &password).await,
        Command::Register { username, password, name, email, phone } => {
            let request = RegisterRequest { username, password, name, email, phone };
            if !app.store().register(&request).await {
                return Err(CliError::RegisterFailed);
            }
            print_json(&json!({ "registered": request.username }))
        }
        Command::Logout => {
            app.store().logout();
            print_json(&json!({ "loggedOut": true }))
        }
        Command::Whoami => {
            let session = app.store().snapshot();
            print_json(&json!({
                "user": session.user,
                "authenticated": session.is_authenticated(),
                "admin": session.is_admin(),
            }))
        }
        Command::Check => {
            let valid = app.store().check_auth().await;
            print_json(&json!({ "valid": valid }))
        }
        Command::Open { path } => print_json(&navigation_json(&app.navigate(&path))),
        Command::Books(books) => run_books(&app, books).await,
        Command::Borrows(borrows) => run_borrows(&app, borrows).await,
        Command::Users(users) => run_users(&app, users).await,
        Command::Admin(admin) => run_admin(&app, admin).await,
    }
}

async fn run_login(app: &App, username: &str, password: &str) -> Result<(), CliError> {
    match app.store().login(username, password).await {
        LoginOutcome::Success(user) => print_json(&user),
        LoginOutcome::Failure { message } => Err(CliError::LoginFailed(message)),
    }
}

async fn run_books(app: &App, books: BooksCommand) -> Result<(), CliError> {
    let api = app.books();
    match books.command {
        BooksSubcommand::List { page, sort_by, desc } => {
            enter(app, "/books")?;
            let direction = if desc { SortDirection::Desc } else { SortDirection::Asc };
            print_json(&api.list(page.into(), &BookSort { sort_by, direction }).await?)
        }
        BooksSubcommand::Search { keyword, page } => {
            enter(app, "/books")?;
            print_json(&api.search(&keyword, page.into()).await?)
        }
        BooksSubcommand::Category { category, page } => {
            enter(app, "/books")?;
            print_json(&api.by_category(&category, page.into()).await?)
        }
        BooksSubcommand::Author { author, page } => {
            enter(app, "/books")?;
            print_json(&api.by_author(&author, page.into()).await?)
        }
        BooksSubcommand::Available => {
            enter(app, "/books")?;
            print_json(&api.available().await?)
        }
        BooksSubcommand::Show { id } => {
            enter(app, &format!("/books/{id}"))?;
            print_json(&api.get(id).await?)
        }
        BooksSubcommand::Isbn { isbn } => {
            enter(app, "/books")?;
            print_json(&api.by_isbn(&isbn).await?)
        }
        BooksSubcommand::Add { data } => {
            enter(app, "/admin/books")?;
            let book = serde_json::from_str::<BookRequest>(&data)?;
            print_json(&api.add(&book).await?)
        }
        BooksSubcommand::Update { id, data } => {
            enter(app, "/admin/books")?;
            let book = serde_json::from_str::<BookRequest>(&data)?;
            print_json(&api.update(id, &book).await?)
        }
        BooksSubcommand::Delete { id } => {
            enter(app, "/admin/books")?;
            api.delete(id).await?;
            print_json(&json!({ "deleted": id }))
        }
    }
}

async fn run_borrows(app: &App, borrows: BorrowsCommand) -> Result<(), CliError> {
    let api = app.borrows();
    match borrows.command {
        BorrowsSubcommand::Request { book_id, due_date } => {
            enter(app, "/borrows")?;
            print_json(&api.request(book_id, due_date.as_deref()).await?)
        }
        BorrowsSubcommand::Approve { id } => {
            enter(app, "/admin/borrows")?;
            print_json(&api.approve(id).await?)
        }
        BorrowsSubcommand::Reject { id } => {
            enter(app, "/admin/borrows")?;
            print_json(&api.reject(id).await?)
        }
        BorrowsSubcommand::Return { id } => {
            enter(app, "/admin/borrows")?;
            print_json(&api.mark_returned(id).await?)
        }
        BorrowsSubcommand::Show { id } => {
            enter(app, "/borrows")?;
            print_json(&api.get(id).await?)
        }
        BorrowsSubcommand::List { page } => {
            enter(app, "/admin/borrows")?;
            print_json(&api.list(page.into()).await?)
        }
        BorrowsSubcommand::User { user_id, page } => {
            enter(app, "/admin/borrows")?;
            print_json(&api.by_user(user_id, page.into()).await?)
        }
        BorrowsSubcommand::Book { book_id, page } => {
            enter(app, "/admin/borrows")?;
            print_json(&api.by_book(book_id, page.into()).await?)
        }
        BorrowsSubcommand::Status { status, page } => {
            let status = status.parse::<BorrowStatus>().map_err(|_| CliError::InvalidStatus(status))?;
            enter(app, "/admin/borrows")?;
            print_json(&api.by_status(status, page.into()).await?)
        }
        BorrowsSubcommand::Overdue => {
            enter(app, "/admin/borrows")?;
            print_json(&api.overdue().await?)
        }
        BorrowsSubcommand::Current => {
            enter(app, "/borrows")?;
            print_json(&api.current().await?)
        }
    }
}

async fn run_users(app: &App, users: UsersCommand) -> Result<(), CliError> {
    enter(app, "/admin/users")?;
    let api = app.users();
    match users.command {
        UsersSubcommand::List => print_json(&api.list().await?),
        UsersSubcommand::Show { id } => print_json(&api.get(id).await?),
        UsersSubcommand::Update { id, data } => {
            let user = serde_json::from_str::<RegisterRequest>(&data)?;
            print_json(&api.update(id, &user).await?)
        }
        UsersSubcommand::Delete { id } => {
            api.delete(id).await?;
            print_json(&json!({ "deleted": id }))
        }
    }
}

async fn run_admin(app: &App, admin: AdminCommand) -> Result<(), CliError> {
    enter(app, "/admin")?;
    let api = app.admin();
    match admin.command {
        AdminSubcommand::Stats => print_json(&api.stats().await?),
        AdminSubcommand::Recent => print_json(&api.recent_borrows().await?),
    }
}

/// Commands that validate, replace or drop the session themselves gain
/// nothing from the bootstrap check.
fn needs_startup_check(command: &Command) -> bool {
    !matches!(command, Command::Check | Command::Logout | Command::Login { .. })
}

/// Navigate to the page a command belongs to; anything but arrival aborts it.
fn enter(app: &App, path: &str) -> Result<(), CliError> {
    match app.navigate(path) {
        Navigation::Arrived { .. } => Ok(()),
        Navigation::Redirected { from, to } => Err(CliError::Redirected { from, to }),
        Navigation::NotFound { path } => Err(CliError::NotFound(path)),
    }
}

fn navigation_json(navigation: &Navigation) -> Value {
    match navigation {
        Navigation::Arrived { path, name, params } => {
            json!({ "outcome": "arrived", "path": path, "name": name, "params": params })
        }
        Navigation::Redirected { from, to } => json!({ "outcome": "redirected", "from": from, "to": to }),
        Navigation::NotFound { path } => json!({ "outcome": "not_found", "path": path }),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use library_client::{History, MemoryStore};

    use super::*;

    fn offline_app() -> App {
        let config = ClientConfig::default().with_base_url("http://127.0.0.1:1");
        App::new(config, Arc::new(MemoryStore::new()), Arc::new(History::default())).unwrap()
    }

    // =========================================================================
    // enter
    // =========================================================================

    #[test]
    fn enter_aborts_anonymous_admin_command() {
        let app = offline_app();

        let err = enter(&app, "/admin/users").unwrap_err();

        assert!(matches!(err, CliError::Redirected { ref from, to: "/login" } if from == "/admin/users"));
    }

    #[test]
    fn enter_allows_public_pages() {
        let app = offline_app();
        assert!(enter(&app, "/books/3").is_ok());
    }

    #[test]
    fn enter_rejects_unknown_pages() {
        let app = offline_app();
        assert!(matches!(enter(&app, "/attic"), Err(CliError::NotFound(ref path)) if path == "/attic"));
    }

    // =========================================================================
    // startup check
    // =========================================================================

    #[test]
    fn session_commands_skip_startup_check() {
        let parse = |args: &[&str]| Cli::try_parse_from(args).unwrap().command;

        assert!(!needs_startup_check(&parse(&["library-cli", "check"])));
        assert!(!needs_startup_check(&parse(&["library-cli", "logout"])));
        assert!(!needs_startup_check(&parse(&["library-cli", "login", "alice", "--password", "pw"])));
        assert!(needs_startup_check(&parse(&["library-cli", "borrows", "current"])));
        assert!(needs_startup_check(&parse(&["library-cli", "whoami"])));
    }

    // =========================================================================
    // parsing and output
    // =========================================================================

    #[test]
    fn navigation_json_names_outcome() {
        let redirected = Navigation::Redirected { from: "/admin".into(), to: "/login" };
        assert_eq!(navigation_json(&redirected), json!({ "outcome": "redirected", "from": "/admin", "to": "/login" }));

        let missing = Navigation::NotFound { path: "/nowhere".into() };
        assert_eq!(navigation_json(&missing)["outcome"], "not_found");
    }

    #[test]
    fn cli_parses_nested_commands() {
        let cli = Cli::try_parse_from(["library-cli", "borrows", "status", "pending", "--size", "5"]).unwrap();
        let Command::Borrows(BorrowsCommand { command: BorrowsSubcommand::Status { status, page } }) = cli.command
        else {
            panic!("expected borrows status");
        };
        assert_eq!(status, "pending");
        assert_eq!(PageRequest::from(page), PageRequest::new(0, 5));
    }

    #[test]
    fn cli_accepts_global_overrides() {
        let cli =
            Cli::try_parse_from(["library-cli", "--base-url", "http://lib:9000", "open", "/admin/users"]).unwrap();
        assert_eq!(cli.base_url.as_deref(), Some("http://lib:9000"));
        assert!(matches!(cli.command, Command::Open { ref path } if path == "/admin/users"));
    }
}
