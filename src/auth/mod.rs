//! Auth context passed explicitly into the dashboard consumer.
//!
//! Holds the signed-in user's identity and a [`TokenSource`] that yields the
//! bearer credential. The token is read through the source at every fetch,
//! never cached by the consumer.

use std::fmt;
use std::fs;
use std::path::PathBuf;

/// Environment variable consulted before the token file.
pub const ACCESS_TOKEN_ENV: &str = "RESONANZE_ACCESS_TOKEN";

// ---------------------------------------------------------------------------
// Token sources
// ---------------------------------------------------------------------------

/// Something that can produce the current access token.
pub trait TokenSource {
    /// The current token, or `None` when the user is signed out.
    fn access_token(&self) -> Option<String>;
}

/// A fixed token, mostly for tests and embedding.
#[derive(Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl TokenSource for StaticToken {
    fn access_token(&self) -> Option<String> {
        non_empty(&self.0)
    }
}

/// Reads the token from a file on each call.
#[derive(Debug, Clone)]
pub struct FileToken {
    path: PathBuf,
}

impl FileToken {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TokenSource for FileToken {
    fn access_token(&self) -> Option<String> {
        let contents = fs::read_to_string(&self.path).ok()?;
        non_empty(&contents)
    }
}

/// `RESONANZE_ACCESS_TOKEN` if set and non-empty, else an optional file.
#[derive(Debug, Clone)]
pub struct EnvOrFileToken {
    var: String,
    file: Option<FileToken>,
}

impl EnvOrFileToken {
    pub fn new(file: Option<PathBuf>) -> Self {
        Self {
            var: ACCESS_TOKEN_ENV.to_string(),
            file: file.map(FileToken::new),
        }
    }

    /// Use a different environment variable name.
    pub fn with_var(mut self, var: impl Into<String>) -> Self {
        self.var = var.into();
        self
    }
}

impl TokenSource for EnvOrFileToken {
    fn access_token(&self) -> Option<String> {
        if let Ok(val) = std::env::var(&self.var)
            && let Some(token) = non_empty(&val)
        {
            return Some(token);
        }
        self.file.as_ref().and_then(|file| file.access_token())
    }
}

fn non_empty(raw: &str) -> Option<String> {
    let token = raw.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

// ---------------------------------------------------------------------------
// Auth context
// ---------------------------------------------------------------------------

/// Identity of the signed-in user plus access to their bearer token.
pub struct AuthContext {
    pub user_id: Option<String>,
    pub full_name: Option<String>,
    tokens: Box<dyn TokenSource>,
}

impl AuthContext {
    pub fn new(tokens: impl TokenSource + 'static) -> Self {
        Self {
            user_id: None,
            full_name: None,
            tokens: Box::new(tokens),
        }
    }

    /// Attach the user identity shown on the dashboard.
    pub fn with_user(mut self, user_id: Option<String>, full_name: Option<String>) -> Self {
        self.user_id = user_id.filter(|s| !s.trim().is_empty());
        self.full_name = full_name.filter(|s| !s.trim().is_empty());
        self
    }

    pub fn access_token(&self) -> Option<String> {
        self.tokens.access_token()
    }
}

// Tokens stay out of debug output.
impl fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthContext")
            .field("user_id", &self.user_id)
            .field("full_name", &self.full_name)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
