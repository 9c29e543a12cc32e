//! BPassword CLI - command-line front-end for the credential service
//!
//! Stores the API key in the OS keychain (JSON file fallback) and drives the
//! credential API client: login/logout, CRUD, search, connection status,
//! password generation, and clipboard copy.

use std::io::Write;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use directories::ProjectDirs;
use tracing::warn;

use bpassword_client::{
    generate_password, is_valid_api_key, ApiClient, ConfigStore, ConnectionMonitor,
    ConnectionStatus, Credential, CredentialDraft, FileStore, KeychainStore, DEFAULT_LENGTH,
};

/// BPassword - password manager client
#[derive(Parser, Debug)]
#[command(name = "bpassword")]
#[command(version = "0.1.0")]
#[command(about = "Client for the BPassword credential service")]
struct Args {
    /// Use the plain JSON file store even when a keychain is available
    #[arg(long, global = true)]
    file_store: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Store the API key and probe the service
    Login {
        /// API key (64 hexadecimal characters); prompted for when omitted
        #[arg(long, env = "BPASSWORD_API_KEY", hide_env_values = true)]
        key: Option<String>,
    },
    /// Remove the stored API key
    Logout,
    /// Set the service base URL
    SetUrl {
        /// Base URL of the service, e.g. https://bpassword.b-services.be/api/
        url: String,
    },
    /// Refresh and show the connection status
    Status,
    /// List credentials, optionally filtered by a search query
    List {
        /// Case-insensitive name filter
        query: Option<String>,
    },
    /// Show a single credential
    Get {
        /// Credential id
        id: i64,
        /// Print the password instead of masking it
        #[arg(long)]
        show: bool,
        /// Copy the password to the clipboard
        #[arg(long)]
        copy: bool,
    },
    /// Create a credential
    Add {
        /// Display label
        #[arg(long)]
        name: String,
        /// Account identifier
        #[arg(long, default_value = "")]
        username: String,
        /// Secret value; mutually exclusive with --generate
        #[arg(long, conflicts_with = "generate")]
        password: Option<String>,
        /// Generate the password instead of supplying one
        #[arg(long)]
        generate: bool,
        /// Generated password length
        #[arg(long, default_value_t = DEFAULT_LENGTH)]
        length: usize,
        /// Site URL
        #[arg(long)]
        url: Option<String>,
        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// Update fields on an existing credential (full replacement on the wire)
    Update {
        /// Credential id
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        username: Option<String>,
        #[arg(long, conflicts_with = "generate")]
        password: Option<String>,
        /// Replace the password with a generated one
        #[arg(long)]
        generate: bool,
        #[arg(long, default_value_t = DEFAULT_LENGTH)]
        length: usize,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete a credential
    Delete {
        /// Credential id
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Generate a password without storing anything
    Generate {
        #[arg(long, default_value_t = DEFAULT_LENGTH)]
        length: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let store = select_store(args.file_store)?;
    let client = ApiClient::new(store);

    match args.command {
        Command::Login { key } => login(&client, key).await,
        Command::Logout => {
            client.clear_api_key().await?;
            println!("API key removed from the {} store.", client.store_backend());
            Ok(())
        }
        Command::SetUrl { url } => {
            // The client's setter does no validation; reject junk here.
            url::Url::parse(&url).with_context(|| format!("invalid URL: {}", url))?;
            client.set_api_url(&url).await?;
            println!("Base URL set to {}", client.api_url().await?);
            Ok(())
        }
        Command::Status => {
            let monitor = ConnectionMonitor::new(client);
            match monitor.refresh().await {
                ConnectionStatus::Connected => println!("Connected."),
                ConnectionStatus::NotConfigured => {
                    bail!("API Key not configured. Run `bpassword login` first.")
                }
                ConnectionStatus::Disconnected { message } => bail!("Disconnected: {}", message),
                ConnectionStatus::Unknown => unreachable!("refresh always derives a status"),
            }
            Ok(())
        }
        Command::List { query } => {
            let credentials = client.list_credentials(query.as_deref()).await?;
            if credentials.is_empty() {
                println!("No credentials found.");
            } else {
                print_table(&credentials);
            }
            Ok(())
        }
        Command::Get { id, show, copy } => get(&client, id, show, copy).await,
        Command::Add {
            name,
            username,
            password,
            generate,
            length,
            url,
            notes,
        } => {
            let password = resolve_password(password, generate, length)?;
            let mut draft = CredentialDraft::new(&name, &username, &password);
            draft.url = url;
            draft.notes = notes;
            draft.validate()?;

            let created = client.create_credential(&draft).await?;
            println!("Created credential {} ({}).", created.id, created.name);
            Ok(())
        }
        Command::Update {
            id,
            name,
            username,
            password,
            generate,
            length,
            url,
            notes,
        } => {
            // The server contract is full replacement, so fetch first and
            // overlay the requested changes.
            let existing = client.get_credential(id).await?;
            let mut draft = CredentialDraft::from(existing);
            if let Some(name) = name {
                draft.name = name;
            }
            if let Some(username) = username {
                draft.username = username;
            }
            if let Some(password) = password {
                draft.password = password;
            } else if generate {
                draft.password = generate_password(length);
            }
            if url.is_some() {
                draft.url = url;
            }
            if notes.is_some() {
                draft.notes = notes;
            }
            draft.validate()?;

            let updated = client.update_credential(id, &draft).await?;
            println!("Updated credential {} ({}).", updated.id, updated.name);
            Ok(())
        }
        Command::Delete { id, yes } => {
            if !yes && !confirm(&format!("Delete credential {}? [y/N] ", id))? {
                println!("Aborted.");
                return Ok(());
            }
            client.delete_credential(id).await?;
            println!("Deleted credential {}.", id);
            Ok(())
        }
        Command::Generate { length } => {
            println!("{}", generate_password(length));
            Ok(())
        }
    }
}

/// Pick the keychain when it works, otherwise the JSON file store
fn select_store(force_file: bool) -> anyhow::Result<Arc<dyn ConfigStore>> {
    if !force_file {
        let keychain = KeychainStore::new(None);
        if keychain.is_available() {
            return Ok(Arc::new(keychain));
        }
        warn!("Keychain unavailable, falling back to the JSON file store");
    }

    let dirs = ProjectDirs::from("be", "BPassword", "bpassword")
        .context("could not determine a configuration directory")?;
    Ok(Arc::new(FileStore::new(dirs.config_dir())))
}

async fn login(client: &ApiClient, key: Option<String>) -> anyhow::Result<()> {
    let key = match key {
        Some(key) => key,
        None => rpassword::prompt_password("API key: ")?,
    };
    let key = key.trim().to_string();

    if !is_valid_api_key(&key) {
        bail!("The API key must be exactly 64 hexadecimal characters.");
    }

    client.set_api_key(&key).await?;

    let probe = client.test_connection().await;
    if probe.success {
        println!(
            "{} Key stored in the {} store.",
            probe.message,
            client.store_backend()
        );
        Ok(())
    } else {
        // Keep the key stored; the URL may just be wrong or the host down.
        bail!("Key stored, but the connection test failed: {}", probe.message);
    }
}

async fn get(client: &ApiClient, id: i64, show: bool, copy: bool) -> anyhow::Result<()> {
    let credential = client.get_credential(id).await?;

    println!("id:       {}", credential.id);
    println!("name:     {}", credential.name);
    println!("username: {}", credential.username);
    if show {
        println!("password: {}", credential.password);
    } else {
        println!("password: ******** (use --show to print)");
    }
    if let Some(url) = &credential.url {
        println!("url:      {}", url);
    }
    if let Some(notes) = &credential.notes {
        println!("notes:    {}", notes);
    }

    if copy {
        let mut clipboard = arboard::Clipboard::new().context("clipboard unavailable")?;
        clipboard
            .set_text(credential.password.clone())
            .context("failed to copy to clipboard")?;
        println!("Password copied to clipboard.");
    }

    Ok(())
}

fn resolve_password(
    password: Option<String>,
    generate: bool,
    length: usize,
) -> anyhow::Result<String> {
    match password {
        Some(password) => Ok(password),
        None if generate => Ok(generate_password(length)),
        None => Ok(rpassword::prompt_password("Password: ")?),
    }
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    print!("{}", prompt);
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn print_table(credentials: &[Credential]) {
    let name_width = credentials
        .iter()
        .map(|c| c.name.len())
        .chain(std::iter::once("NAME".len()))
        .max()
        .unwrap_or(4);

    println!("{:>6}  {:<name_width$}  USERNAME", "ID", "NAME");
    for credential in credentials {
        println!(
            "{:>6}  {:<name_width$}  {}",
            credential.id, credential.name, credential.username
        );
    }
}
