//! The signed-in user, as handed over by the identity provider's hosted login.
//! Only read here; the login/logout/callback handshake happens elsewhere.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub sub: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
}

impl SessionUser {
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.nickname.as_deref())
            .or(self.email.as_deref())
            .unwrap_or(&self.sub)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SessionFile {
    Wrapped { user: SessionUser },
    Bare(SessionUser),
}

pub fn parse_session_user(raw: &str) -> anyhow::Result<SessionUser> {
    let file: SessionFile = serde_json::from_str(raw).context("parse session user")?;
    let user = match file {
        SessionFile::Wrapped { user } => user,
        SessionFile::Bare(user) => user,
    };
    anyhow::ensure!(!user.sub.trim().is_empty(), "session user without sub");
    Ok(user)
}

pub fn load_session_user(path: &Path) -> anyhow::Result<SessionUser> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("read session file {}", path.display()))?;
    parse_session_user(&raw)
}
