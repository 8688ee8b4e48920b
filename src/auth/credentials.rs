//! Credential management for the database and Google Drive
//!
//! Credentials live in environment variables, usually loaded from a .env file
//! in the working directory. The .env file is written with owner-only
//! permissions.

use std::env;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use crate::app::{ClientConfig, DriveClient};
use crate::constants::{auth, env as env_constants};
use crate::errors::{AuthError, AuthResult, FetchError};

/// Authentication status information
#[derive(Debug, Clone)]
pub struct AuthStatus {
    /// Whether the Drive token environment variable is set
    pub token_set: bool,
    /// Whether the database URL environment variable is set
    pub database_url_set: bool,
    /// Whether .env file exists in current directory
    pub dotenv_file_exists: bool,
    /// Whether the token has been verified (None = not tested)
    pub token_valid: Option<bool>,
}

impl AuthStatus {
    /// Check if a Drive token is available
    pub fn has_credentials(&self) -> bool {
        self.token_set
    }

    /// Get descriptive status message for display
    pub fn status_message(&self) -> String {
        match (self.has_credentials(), self.token_valid) {
            (false, _) => {
                "Missing Drive token - images will not load. Run 'auth setup' to configure"
                    .to_string()
            }
            (true, None) => "Drive token configured but not verified".to_string(),
            (true, Some(true)) => "Drive token configured and verified".to_string(),
            (true, Some(false)) => "Drive token configured but invalid".to_string(),
        }
    }
}

fn env_is_set(name: &str) -> bool {
    env::var(name).map(|v| !v.trim().is_empty()).unwrap_or(false)
}

/// Check current authentication status
pub fn get_auth_status() -> AuthStatus {
    AuthStatus {
        token_set: env_is_set(env_constants::DRIVE_TOKEN),
        database_url_set: env_is_set(env_constants::DATABASE_URL),
        dotenv_file_exists: Path::new(auth::ENV_FILE_NAME).exists(),
        token_valid: None,
    }
}

/// Check if a Drive token exists in the environment
pub fn check_credentials() -> bool {
    env_is_set(env_constants::DRIVE_TOKEN)
}

/// Basic shape check for an OAuth access token
fn validate_token(token: &str) -> AuthResult<()> {
    if token.len() < auth::MIN_TOKEN_LENGTH {
        return Err(AuthError::InvalidToken {
            reason: format!("token is shorter than {} characters", auth::MIN_TOKEN_LENGTH),
        });
    }
    if token.chars().any(char::is_whitespace) {
        return Err(AuthError::InvalidToken {
            reason: "token cannot contain whitespace".to_string(),
        });
    }
    Ok(())
}

/// Prompt user for credentials interactively
///
/// Returns the Drive token and, if entered, a database URL.
pub fn prompt_credentials() -> AuthResult<(String, Option<String>)> {
    let token = rpassword::prompt_password("Google Drive access token: ")
        .map_err(AuthError::CredentialStorage)?;
    let token = token.trim().to_string();
    validate_token(&token)?;

    print!("PostgreSQL connection string (leave empty to keep current): ");
    io::stdout().flush()?;

    let mut database_url = String::new();
    io::stdin().read_line(&mut database_url)?;
    let database_url = database_url.trim();

    Ok((
        token,
        (!database_url.is_empty()).then(|| database_url.to_string()),
    ))
}

/// Merge `updates` into the .env content, replacing existing keys in place
fn merge_env_lines(existing: &str, updates: &[(&str, &str)]) -> Vec<String> {
    let mut found = vec![false; updates.len()];

    let mut lines: Vec<String> = existing
        .lines()
        .map(|line| {
            let trimmed = line.trim();
            for (i, (key, value)) in updates.iter().enumerate() {
                if trimmed.starts_with(&format!("{}=", key)) {
                    found[i] = true;
                    return format!("{}={}", key, value);
                }
            }
            line.to_string()
        })
        .collect();

    for (i, (key, value)) in updates.iter().enumerate() {
        if !found[i] {
            lines.push(format!("{}={}", key, value));
        }
    }

    lines
}

fn write_env_file(env_path: &Path, lines: &[String]) -> AuthResult<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(env_path)?;

    for line in lines {
        writeln!(file, "{}", line)?;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = file.metadata()?.permissions();
        perms.set_mode(auth::ENV_FILE_PERMISSIONS);
        file.set_permissions(perms)?;
    }

    Ok(())
}

/// Save credentials to the given .env file with secure permissions
pub fn save_credentials_to(
    env_path: &Path,
    token: &str,
    database_url: Option<&str>,
) -> AuthResult<()> {
    let existing = if env_path.exists() {
        fs::read_to_string(env_path)?
    } else {
        String::new()
    };

    let mut updates = vec![(env_constants::DRIVE_TOKEN, token)];
    if let Some(url) = database_url {
        updates.push((env_constants::DATABASE_URL, url));
    }

    write_env_file(env_path, &merge_env_lines(&existing, &updates))
}

/// Save credentials to .env in the current directory and the live environment
pub fn save_credentials(token: &str, database_url: Option<&str>) -> AuthResult<()> {
    save_credentials_to(Path::new(auth::ENV_FILE_NAME), token, database_url)?;

    // Update current environment so the rest of this process sees the change
    unsafe {
        env::set_var(env_constants::DRIVE_TOKEN, token);
        if let Some(url) = database_url {
            env::set_var(env_constants::DATABASE_URL, url);
        }
    }

    println!("Credentials saved to .env file");

    #[cfg(unix)]
    println!("File permissions set to owner-only (600)");

    #[cfg(not(unix))]
    println!(
        "Warning: File permissions not set (non-Unix system). Please ensure .env file is protected."
    );

    Ok(())
}

/// Remove stored credentials from the given .env file, keeping other lines
///
/// Returns the number of lines removed.
pub fn clear_credentials_from(env_path: &Path) -> AuthResult<usize> {
    if !env_path.exists() {
        return Ok(0);
    }

    let existing = fs::read_to_string(env_path)?;
    let keys = [env_constants::DRIVE_TOKEN, env_constants::DATABASE_URL];

    let kept: Vec<String> = existing
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !keys.iter().any(|key| trimmed.starts_with(&format!("{}=", key)))
        })
        .map(str::to_string)
        .collect();

    let removed = existing.lines().count() - kept.len();
    write_env_file(env_path, &kept)?;
    Ok(removed)
}

/// Remove stored credentials from .env and the live environment
pub fn clear_credentials() -> AuthResult<usize> {
    let removed = clear_credentials_from(Path::new(auth::ENV_FILE_NAME))?;
    unsafe {
        env::remove_var(env_constants::DRIVE_TOKEN);
        env::remove_var(env_constants::DATABASE_URL);
    }
    Ok(removed)
}

/// Verify the Drive token by asking the API for the current user
pub async fn verify_credentials(config: ClientConfig) -> AuthResult<bool> {
    if !check_credentials() {
        return Err(AuthError::MissingCredentials);
    }

    println!("Verifying Drive token...");

    let client = DriveClient::from_env_with_config(config)?;
    match client.verify_token().await {
        Ok(()) => {
            println!("Drive token verified successfully!");
            Ok(true)
        }
        Err(FetchError::Unauthorized { .. }) => {
            println!("Drive token was rejected");
            Ok(false)
        }
        Err(e) => {
            println!("Token verification failed: {}", e);
            Ok(false)
        }
    }
}

/// Interactive credential setup workflow
pub async fn setup_credentials(config: ClientConfig) -> AuthResult<()> {
    println!("Content Gallery Credential Setup");
    println!("================================");
    println!();
    println!("Your credentials will be stored in a .env file in the current directory.");
    println!();

    let (token, database_url) = prompt_credentials()?;

    println!();
    save_credentials(&token, database_url.as_deref())?;

    println!();
    if verify_credentials(config).await? {
        println!();
        println!("Setup complete!");
    } else {
        println!();
        println!("Token could not be verified. Run 'auth setup' again to re-enter it.");
    }

    Ok(())
}

/// Show current authentication status
pub async fn show_auth_status(config: ClientConfig) -> AuthResult<()> {
    let mut status = get_auth_status();

    println!("Content Gallery Credential Status");
    println!("=================================");
    println!();
    println!(
        "Drive token:  {}",
        if status.token_set { "Set" } else { "Not set" }
    );
    println!(
        "Database URL: {}",
        if status.database_url_set { "Set" } else { "Not set" }
    );
    println!(
        ".env file:    {}",
        if status.dotenv_file_exists { "Exists" } else { "Not found" }
    );
    println!();

    if status.has_credentials() {
        status.token_valid = Some(verify_credentials(config).await?);
        println!();
    }

    println!("Status: {}", status.status_message());

    Ok(())
}
