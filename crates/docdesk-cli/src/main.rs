mod tui;

use std::io::{BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use docdesk_core::api::ApiClient;
use docdesk_core::auth::{self, AuthService};
use docdesk_core::config::DocdeskConfig;
use docdesk_core::download;
use docdesk_core::error::DocdeskError;
use docdesk_core::format::{format_date, format_file_size, truncate};
use docdesk_core::model::*;
use docdesk_core::router::Route;
use docdesk_core::storage::create_store;
use docdesk_core::upload::UploadSelection;
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "docdesk",
    about = "docdesk: your company's documents and assistant, from the terminal",
    version
)]
enum Cli {
    /// Write a starter config file
    Init {
        /// Create .docdesk/config.toml in the current directory instead of the global config
        #[arg(long)]
        project: bool,
    },
    /// Sign in and remember the session
    Login {
        /// Account email
        email: String,
        /// Password (falls back to DOCDESK_PASSWORD, then a prompt)
        #[arg(long)]
        password: Option<String>,
    },
    /// Create a company and its first user
    Register {
        /// Company name
        #[arg(long)]
        company: String,
        /// Company contact email
        #[arg(long)]
        company_email: String,
        /// Your full name
        #[arg(long)]
        name: String,
        /// Your email (used to sign in)
        #[arg(long)]
        email: String,
        /// Password (falls back to DOCDESK_PASSWORD, then a prompt)
        #[arg(long)]
        password: Option<String>,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show the signed-in user and company
    Whoami {
        /// Ask the server instead of using the cached identity
        #[arg(long)]
        refresh: bool,
        /// Output raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Show document counters
    Stats {
        /// Output raw JSON
        #[arg(long)]
        json: bool,
    },
    /// List documents
    List {
        /// Only show documents whose name contains this text
        #[arg(short, long)]
        search: Option<String>,
        /// Output raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Upload one or more files
    Upload {
        /// Files to upload
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Delete a document
    Delete {
        /// Document ID
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Download a document
    Download {
        /// Document ID
        id: i64,
        /// Target directory (default from config, then the user's download directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Ask the assistant a question about your documents
    Chat {
        /// The question
        #[arg(required = true)]
        message: Vec<String>,
    },
    /// Open the interactive terminal UI
    Tui {
        /// View to open: dashboard, documents or chat
        #[arg(long)]
        view: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // stderr shares the terminal with the TUI, so it stays quiet unless RUST_LOG asks.
    let default_level = if matches!(cli, Cli::Tui { .. }) {
        "off"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .compact()
        .init();

    let config = DocdeskConfig::load(Some(&std::env::current_dir()?)).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to load config, using defaults");
        DocdeskConfig::default()
    });

    // A 401 on anything but the credential exchange means the stored token is stale.
    let clears_on_401 = !matches!(cli, Cli::Login { .. } | Cli::Register { .. });

    let result = run(cli, &config).await;
    if let Err(ref err) = result {
        let api_err = err.chain().find_map(|e| e.downcast_ref::<DocdeskError>());
        if let Some(api_err) = api_err {
            if clears_on_401 && api_err.is_unauthorized() {
                clear_stale_session(&config);
                eprintln!(
                    "{} your session has expired. Run {} to sign in again.",
                    "error:".red().bold(),
                    "docdesk login <email>".cyan()
                );
                std::process::exit(1);
            }
            if matches!(api_err, DocdeskError::NotSignedIn) {
                eprintln!(
                    "{} not signed in. Run {} first.",
                    "error:".red().bold(),
                    "docdesk login <email>".cyan()
                );
                std::process::exit(1);
            }
        }
    }
    result
}

async fn run(cli: Cli, config: &DocdeskConfig) -> Result<()> {
    match cli {
        Cli::Init { project } => cmd_init(project),
        Cli::Login { email, password } => {
            let mut auth = make_auth(config)?;
            cmd_login(&mut auth, &email, password).await
        }
        Cli::Register {
            company,
            company_email,
            name,
            email,
            password,
        } => {
            let auth = make_auth(config)?;
            let request = RegisterRequest {
                company_name: company,
                company_email,
                username: name,
                user_email: email,
                password: resolve_password(password)?,
            };
            cmd_register(&auth, &request).await
        }
        Cli::Logout => {
            let mut auth = make_auth(config)?;
            cmd_logout(&mut auth).await
        }
        Cli::Whoami { refresh, json } => {
            let mut auth = make_auth(config)?;
            cmd_whoami(&mut auth, refresh, json).await
        }
        Cli::Stats { json } => {
            let auth = make_auth(config)?;
            cmd_stats(&auth, json).await
        }
        Cli::List { search, json } => {
            let auth = make_auth(config)?;
            cmd_list(&auth, search.as_deref(), &config.ui.date_format, json).await
        }
        Cli::Upload { paths } => {
            let auth = make_auth(config)?;
            cmd_upload(&auth, &paths).await
        }
        Cli::Delete { id, yes } => {
            let auth = make_auth(config)?;
            cmd_delete(&auth, id, yes).await
        }
        Cli::Download { id, output } => {
            let auth = make_auth(config)?;
            let dir = output.unwrap_or_else(|| config.ui.resolved_download_dir());
            cmd_download(&auth, id, &dir).await
        }
        Cli::Chat { message } => {
            let auth = make_auth(config)?;
            cmd_chat(&auth, &message.join(" ")).await
        }
        Cli::Tui { view } => {
            let start = view
                .as_deref()
                .map(|v| {
                    Route::from_fragment(v)
                        .filter(|r| r.requires_auth())
                        .ok_or_else(|| {
                            anyhow::anyhow!("unknown view '{v}'. Valid: dashboard, documents, chat")
                        })
                })
                .transpose()?;
            tui::run_tui(config, start).await
        }
    }
}

fn make_auth(config: &DocdeskConfig) -> Result<AuthService> {
    let api = ApiClient::from_config(&config.api).context("failed to create API client")?;
    let store = create_store(config).context("failed to open local storage")?;
    Ok(AuthService::new(api, store))
}

/// Drop the stored session after the server rejected its token. Returns
/// whether the keys are gone.
fn clear_stale_session(config: &DocdeskConfig) -> bool {
    let cleared = make_auth(config).and_then(|mut auth| Ok(auth.clear()?));
    match cleared {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "failed to clear stored session");
            false
        }
    }
}

/// The stored session, or `NotSignedIn`.
fn signed_in(auth: &AuthService) -> Result<Session> {
    let session = auth.restore_session();
    Ok(auth::require(session.as_ref())?.clone())
}

/// `--password`, then `DOCDESK_PASSWORD`, then a no-echo prompt on a terminal
/// or one line from piped stdin.
fn resolve_password(flag: Option<String>) -> Result<String> {
    if let Some(p) = flag {
        return Ok(p);
    }
    if let Ok(p) = std::env::var("DOCDESK_PASSWORD") {
        return Ok(p);
    }
    if std::io::stdin().is_terminal() {
        return prompt_password("Password: ");
    }
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read password")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Outcome of one key press at the password prompt.
#[derive(Debug, PartialEq)]
enum PromptStep {
    Continue,
    Done,
    Cancelled,
}

fn password_key(buf: &mut String, key: KeyEvent) -> PromptStep {
    if key.kind != KeyEventKind::Press {
        return PromptStep::Continue;
    }
    match key.code {
        KeyCode::Enter => PromptStep::Done,
        KeyCode::Esc => PromptStep::Cancelled,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            PromptStep::Cancelled
        }
        KeyCode::Backspace => {
            buf.pop();
            PromptStep::Continue
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            buf.push(c);
            PromptStep::Continue
        }
        _ => PromptStep::Continue,
    }
}

/// Read a password in raw mode so nothing is echoed.
fn prompt_password(prompt: &str) -> Result<String> {
    eprint!("{prompt}");
    std::io::stderr().flush()?;

    terminal::enable_raw_mode().context("failed to enable raw mode")?;
    let read = read_password_keys();
    terminal::disable_raw_mode().context("failed to restore terminal")?;
    eprintln!();

    match read? {
        Some(password) => Ok(password),
        None => anyhow::bail!("password entry cancelled"),
    }
}

fn read_password_keys() -> Result<Option<String>> {
    let mut buf = String::new();
    loop {
        let Event::Key(key) = event::read().context("failed to read password")? else {
            continue;
        };
        match password_key(&mut buf, key) {
            PromptStep::Continue => {}
            PromptStep::Done => return Ok(Some(buf)),
            PromptStep::Cancelled => return Ok(None),
        }
    }
}

// ---------------------------------------------------------------------------
// init
// ---------------------------------------------------------------------------

fn cmd_init(project: bool) -> Result<()> {
    if !project {
        let path = DocdeskConfig::write_default().context("failed to write config")?;
        println!("{} {}", "Config:".green(), path.display());
        return Ok(());
    }

    let cwd = std::env::current_dir()?;
    let dir = cwd.join(".docdesk");
    let path = dir.join("config.toml");
    if path.exists() {
        println!("docdesk already initialized in this project.");
        return Ok(());
    }
    std::fs::create_dir_all(&dir)?;
    let toml_str = format!(
        "# docdesk project config. Secrets go in .docdesk/config.local.toml\n{}",
        toml::to_string_pretty(&DocdeskConfig::default())?
    );
    std::fs::write(&path, toml_str)?;

    // Keep the local override out of version control
    let gitignore_path = cwd.join(".gitignore");
    let entry = ".docdesk/config.local.toml";
    if gitignore_path.exists() {
        let contents = std::fs::read_to_string(&gitignore_path)?;
        if !contents.lines().any(|l| l.trim() == entry) {
            let mut appended = contents;
            if !appended.ends_with('\n') {
                appended.push('\n');
            }
            appended.push_str(entry);
            appended.push('\n');
            std::fs::write(&gitignore_path, appended)?;
        }
    }

    println!("{} {}", "Created".green(), path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// auth
// ---------------------------------------------------------------------------

async fn cmd_login(auth: &mut AuthService, email: &str, password: Option<String>) -> Result<()> {
    let password = resolve_password(password)?;
    let session = auth.login(email, &password).await.context("login failed")?;
    println!(
        "{} {} ({})",
        "Signed in as".green(),
        session.user.full_name.bold(),
        session.company.name.cyan()
    );
    Ok(())
}

async fn cmd_register(auth: &AuthService, request: &RegisterRequest) -> Result<()> {
    let message = auth
        .register(request)
        .await
        .context("registration failed")?;
    println!(
        "{} {}",
        "✓".green(),
        message.unwrap_or_else(|| "Registration successful".to_string())
    );
    println!(
        "  Sign in with {}",
        format!("docdesk login {}", request.user_email).cyan()
    );
    Ok(())
}

async fn cmd_logout(auth: &mut AuthService) -> Result<()> {
    let session = auth.restore_session();
    auth.logout(session.as_ref())
        .await
        .context("failed to clear stored session")?;
    println!("{}", "Signed out.".dimmed());
    Ok(())
}

async fn cmd_whoami(auth: &mut AuthService, refresh: bool, json: bool) -> Result<()> {
    let mut session = signed_in(auth)?;
    if refresh {
        session = auth
            .profile(&session)
            .await
            .context("failed to fetch profile")?;
    }

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "user": session.user,
                "company": session.company,
            }))?
        );
        return Ok(());
    }

    println!("{} <{}>", session.user.full_name.bold(), session.user.email);
    if let Some(ref role) = session.user.role {
        println!("  {} {}", "role:".dimmed(), role);
    }
    println!(
        "  {} {} {}",
        "company:".dimmed(),
        session.company.name.cyan(),
        format!("(#{})", session.company.id).dimmed()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// documents
// ---------------------------------------------------------------------------

async fn cmd_stats(auth: &AuthService, json: bool) -> Result<()> {
    let session = signed_in(auth)?;
    let stats = auth
        .api()
        .stats(&session)
        .await
        .context("failed to load stats")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("  {:<12} {}", "Documents".dimmed(), stats.total_documents.bold());
    println!("  {:<12} {}", "Processed".dimmed(), stats.processed_documents.green());
    println!("  {:<12} {}", "Processing".dimmed(), stats.pending().yellow());
    Ok(())
}

/// Case-insensitive name match used by `list --search`.
fn matches_search(doc: &Document, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    query.is_empty() || doc.display_name().to_lowercase().contains(&query)
}

async fn cmd_list(
    auth: &AuthService,
    search: Option<&str>,
    date_format: &str,
    json: bool,
) -> Result<()> {
    let session = signed_in(auth)?;
    let mut docs = auth
        .api()
        .list_documents(&session)
        .await
        .context("failed to load documents")?;
    if let Some(q) = search {
        docs.retain(|d| matches_search(d, q));
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&docs)?);
        return Ok(());
    }

    if docs.is_empty() {
        match search {
            Some(q) => println!("No documents match \"{q}\"."),
            None => println!(
                "No documents yet. Upload one with {}",
                "docdesk upload <file>".cyan()
            ),
        }
        return Ok(());
    }

    // Table header
    println!(
        "  {}  {}  {}  {}  {}  {}",
        format!("{:>6}", "ID").dimmed(),
        format!("{:<5}", "Type").dimmed(),
        format!("{:>10}", "Size").dimmed(),
        format!("{:<10}", "Status").dimmed(),
        format!("{:<10}", "Uploaded").dimmed(),
        "Name".dimmed(),
    );
    println!("{}", "─".repeat(78).dimmed());

    for doc in &docs {
        let status = format!("{:<10}", doc.status_label());
        let status = if doc.is_processed {
            status.green().to_string()
        } else {
            status.yellow().to_string()
        };
        println!(
            "  {}  {}  {:>10}  {}  {:<10}  {}",
            format!("{:>6}", doc.id).cyan(),
            format!("{:<5}", doc.badge()).magenta(),
            format_file_size(doc.file_size),
            status,
            format_date(doc.created_at.as_ref(), date_format),
            truncate(doc.display_name(), 48),
        );
    }

    println!("{}", "─".repeat(78).dimmed());
    println!(
        "  {} document{}",
        docs.len(),
        if docs.len() == 1 { "" } else { "s" }
    );
    Ok(())
}

async fn cmd_upload(auth: &AuthService, paths: &[PathBuf]) -> Result<()> {
    let session = signed_in(auth)?;
    let mut selection = UploadSelection::new();
    for path in paths {
        selection.add_path(path)?;
    }

    eprintln!("{} {}", "Uploading".dimmed(), selection.summary());
    let resp = auth
        .api()
        .upload(&session, &selection)
        .await
        .context("upload failed")?;

    println!(
        "{} {}",
        "✓".green(),
        resp.message
            .unwrap_or_else(|| "Files uploaded successfully".to_string())
    );
    for doc in &resp.files {
        println!(
            "  {} {}",
            format!("#{}", doc.id).cyan(),
            doc.display_name()
        );
    }
    Ok(())
}

/// Look a document up by ID in the full listing.
async fn find_document(auth: &AuthService, session: &Session, id: i64) -> Result<Document> {
    let docs = auth
        .api()
        .list_documents(session)
        .await
        .context("failed to load documents")?;
    docs.into_iter()
        .find(|d| d.id == id)
        .ok_or_else(|| anyhow::anyhow!("document {id} not found"))
}

fn confirm(prompt: &str) -> Result<bool> {
    if !std::io::stdin().is_terminal() {
        anyhow::bail!("refusing to delete without --yes when stdin is not a terminal");
    }
    eprint!("{prompt} [y/N] ");
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}

async fn cmd_delete(auth: &AuthService, id: i64, yes: bool) -> Result<()> {
    let session = signed_in(auth)?;
    let name = if yes {
        format!("document {id}")
    } else {
        let doc = find_document(auth, &session, id).await?;
        let name = doc.display_name().to_string();
        if !confirm(&format!("Delete {name}?"))? {
            println!("{}", "Kept.".dimmed());
            return Ok(());
        }
        name
    };

    let message = auth
        .api()
        .delete_document(&session, id)
        .await
        .context("failed to delete document")?;
    println!(
        "{} {}",
        "Deleted:".red(),
        message.unwrap_or(name)
    );
    Ok(())
}

async fn cmd_download(auth: &AuthService, id: i64, dir: &Path) -> Result<()> {
    let session = signed_in(auth)?;
    let doc = find_document(auth, &session, id).await?;
    let bytes = auth
        .api()
        .download_document(&session, id)
        .await
        .context("download failed")?;
    let path = download::save(dir, doc.display_name(), &bytes)
        .await
        .context("failed to save document")?;
    println!(
        "{} {} ({})",
        "Saved".green(),
        path.display(),
        format_file_size(bytes.len() as u64).dimmed()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// chat
// ---------------------------------------------------------------------------

async fn cmd_chat(auth: &AuthService, message: &str) -> Result<()> {
    let session = signed_in(auth)?;
    let message = message.trim();
    if message.is_empty() {
        anyhow::bail!("message cannot be empty");
    }
    let reply = auth
        .api()
        .send_chat(&session, message)
        .await
        .context("chat request failed")?;
    println!("{reply}");
    Ok(())
}
