//! Repository acquisition: clone a git URL into a temporary directory.

use crate::core::{Error, Result};
use git2::build::RepoBuilder;
use git2::{Cred, CredentialType, FetchOptions, RemoteCallbacks};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use tempfile::TempDir;

/// `git@host:owner/repo(.git)`
static SSH_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"git@[\w.-]+:([\w.-]+)/([\w.-]+?)(?:\.git)?$")
        .unwrap_or_else(|e| panic!("invalid built-in pattern: {e}"))
});

/// `scheme://host/.../owner/repo(.git)`
static URL_WITH_SCHEME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:https?|ssh|git|file)://[^/]*/(?:[^/]+/)*?([\w.-]+)/([\w.-]+?)(?:\.git)?/?$")
        .unwrap_or_else(|e| panic!("invalid built-in pattern: {e}"))
});

/// Owner and name parsed from a repository URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSpec {
    pub url: String,
    pub owner: String,
    pub name: String,
}

impl RepoSpec {
    pub fn parse(url: &str) -> Result<Self> {
        let url = url.trim();
        let caps = SSH_URL
            .captures(url)
            .or_else(|| URL_WITH_SCHEME.captures(url))
            .ok_or_else(|| {
                Error::Repository(format!(
                    "Invalid or unsupported repository URL format: {url}. \
                     Expected format like 'git@hostname:owner/repo.git'."
                ))
            })?;
        Ok(Self {
            url: url.to_string(),
            owner: caps[1].to_string(),
            name: caps[2].to_string(),
        })
    }

    /// Default output file for a scan of this repository.
    pub fn default_output_name(&self) -> String {
        format!("{}_analysis.jsonl", self.name)
    }
}

/// A checkout that lives as long as this value; the directory is removed on
/// drop, including after a failed clone.
#[derive(Debug)]
pub struct ClonedRepo {
    pub spec: RepoSpec,
    dir: TempDir,
}

impl ClonedRepo {
    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// Clone `url` into a fresh temporary directory.
///
/// SSH remotes authenticate through the running ssh-agent.
pub fn clone_repo(url: &str) -> Result<ClonedRepo> {
    let spec = RepoSpec::parse(url)?;
    let dir = tempfile::Builder::new()
        .prefix(&format!("repo_{}_{}_", spec.owner, spec.name))
        .tempdir()?;
    tracing::info!(url = %spec.url, dest = %dir.path().display(), "cloning repository");

    let mut callbacks = RemoteCallbacks::new();
    callbacks.credentials(|_url, username_from_url, allowed| {
        if allowed.contains(CredentialType::SSH_KEY) {
            Cred::ssh_key_from_agent(username_from_url.unwrap_or("git"))
        } else {
            Cred::default()
        }
    });
    let mut fetch = FetchOptions::new();
    fetch.remote_callbacks(callbacks);

    RepoBuilder::new()
        .fetch_options(fetch)
        .clone(&spec.url, dir.path())
        .map_err(|e| Error::Repository(format!("Failed to clone {}: {}", spec.url, e.message())))?;

    tracing::info!(name = %spec.name, owner = %spec.owner, "clone complete");
    Ok(ClonedRepo { spec, dir })
}
