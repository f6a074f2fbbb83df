//! CLI route: single route table and run context. Dispatches to workspace operations and presentation.

use crate::cli::parse::{Commands, OutputFormat};
use crate::cli::presentation::{
    format_commit_list_json, format_commit_list_text, format_commit_outcome,
    format_rollback_report,
};
use crate::config::VcsmConfig;
use crate::error::VcsError;
use crate::workspace::Workspace;
use std::path::Path;
use tracing::{debug, info};

/// Runtime context for CLI execution: the workspace bound to its configuration.
pub struct RunContext {
    workspace: Workspace,
}

impl RunContext {
    /// Create run context from workspace root and an already loaded configuration.
    pub fn new(workspace_root: &Path, config: VcsmConfig) -> Result<Self, VcsError> {
        let workspace = Workspace::with_config(workspace_root, config)?;
        debug!(root = %workspace.root().display(), "Run context created");
        Ok(Self { workspace })
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Execute a command and return the text to print on success.
    pub fn execute(&self, command: &Commands) -> Result<String, VcsError> {
        match command {
            Commands::Init => self.handle_init(),
            Commands::Purge { force } => self.handle_purge(*force),
            Commands::Commit { message } => self.handle_commit(message),
            Commands::ListCommits { format } => self.handle_list(*format),
            Commands::Rollback { digest, format } => self.handle_rollback(digest, *format),
        }
    }

    fn handle_init(&self) -> Result<String, VcsError> {
        let marker = self.workspace.init()?;
        Ok(format!(
            "An empty vcsm root initialized in {}",
            marker.display()
        ))
    }

    fn handle_purge(&self, force: bool) -> Result<String, VcsError> {
        if !self.workspace.is_initialized() {
            return Err(VcsError::NotInitialized(self.workspace.root().to_path_buf()));
        }
        if !force {
            use dialoguer::Confirm;
            let confirmed = Confirm::new()
                .with_prompt("Remove all stored commits?")
                .default(false)
                .interact()
                .map_err(|e| VcsError::ConfigError(format!("Failed to get user input: {}", e)))?;

            if !confirmed {
                return Ok("Purge cancelled".to_string());
            }
        }

        let removed = self.workspace.purge()?;
        info!(removed, "Purge finished");
        Ok("vcsm root purged".to_string())
    }

    fn handle_commit(&self, words: &[String]) -> Result<String, VcsError> {
        let message = words.join(" ");
        let outcome = self.workspace.commit(&message)?;
        Ok(format_commit_outcome(&outcome))
    }

    fn handle_list(&self, format: OutputFormat) -> Result<String, VcsError> {
        let commits = self.workspace.list_commits()?;
        match format {
            OutputFormat::Json => format_commit_list_json(&commits),
            OutputFormat::Text => Ok(format_commit_list_text(&commits)),
        }
    }

    fn handle_rollback(&self, digest: &str, format: OutputFormat) -> Result<String, VcsError> {
        let report = self.workspace.rollback(digest)?;
        format_rollback_report(&report, format)
    }
}
