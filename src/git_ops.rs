//! Git versioning of the trip data directory
//!
//! Every save becomes one commit touching one data file. Only fast-forward
//! pulls are attempted; diverged histories are left to the user.

use anyhow::{Context, Result, anyhow};
use git2::{Remote, Repository, Signature, Time};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

const FALLBACK_AUTHOR: &str = "Trip Planner";
const FALLBACK_EMAIL: &str = "trip-planner@localhost";

/// Repository holding the trip files, if there is one
pub struct GitOps {
    repo: Option<Mutex<Repository>>,
}

impl GitOps {
    /// Look for a repository enclosing `path` (a data file or the data directory)
    pub fn new(path: &Path) -> Self {
        let dir = if path.is_file() {
            path.parent().unwrap_or(path).to_path_buf()
        } else {
            path.to_path_buf()
        };

        let repo = Repository::discover(&dir).ok().map(Mutex::new);
        if repo.is_some() {
            debug!(dir = %dir.display(), "data directory is git managed");
        }
        Self { repo }
    }

    pub fn is_git_managed(&self) -> bool {
        self.repo.is_some()
    }

    fn lock(&self) -> Result<Option<MutexGuard<'_, Repository>>> {
        match &self.repo {
            Some(r) => r
                .lock()
                .map(Some)
                .map_err(|_| anyhow!("git repository lock poisoned")),
            None => Ok(None),
        }
    }

    fn branch_of(repo: &Repository) -> Result<String> {
        let head = repo.head().context("Cannot read HEAD of the trip repository")?;
        head.shorthand()
            .map(str::to_string)
            .context("HEAD of the trip repository is not on a branch")
    }

    fn origin(repo: &Repository) -> Result<Remote<'_>> {
        repo.find_remote("origin")
            .context("Trip repository has no 'origin' remote")
    }

    /// Bring in trip edits pushed by others
    pub fn pull(&self) -> Result<()> {
        let Some(repo) = self.lock()? else {
            return Ok(());
        };

        let branch = Self::branch_of(&repo)?;
        Self::origin(&repo)?
            .fetch(&[&branch], None, None)
            .with_context(|| format!("Fetching {} from origin failed", branch))?;

        let incoming = repo.reference_to_annotated_commit(&repo.find_reference("FETCH_HEAD")?)?;
        let (analysis, _) = repo.merge_analysis(&[&incoming])?;

        if analysis.is_up_to_date() {
            Ok(())
        } else if analysis.is_fast_forward() {
            let refname = format!("refs/heads/{}", branch);
            repo.find_reference(&refname)?
                .set_target(incoming.id(), "trip planner fast-forward")?;
            repo.set_head(&refname)?;
            repo.checkout_head(Some(git2::build::CheckoutBuilder::default().force()))?;
            debug!(%branch, "fast-forwarded from origin");
            Ok(())
        } else {
            Err(anyhow!(
                "Trip data on origin/{} diverged from the local copy; merge it by hand",
                branch
            ))
        }
    }

    fn relative_to_workdir(repo: &Repository, file: &Path) -> Result<PathBuf> {
        let workdir = repo
            .workdir()
            .context("Trip repository is bare")?
            .canonicalize()
            .context("Cannot resolve the repository directory")?;
        let file = file
            .canonicalize()
            .with_context(|| format!("Cannot resolve {}", file.display()))?;
        file.strip_prefix(&workdir)
            .map(Path::to_path_buf)
            .with_context(|| format!("{} lies outside the trip repository", file.display()))
    }

    /// Record the current content of one data file
    ///
    /// A file identical to HEAD produces no commit.
    pub fn commit(&self, file_path: &Path, message: &str) -> Result<()> {
        let Some(repo) = self.lock()? else {
            return Ok(());
        };

        let relative = Self::relative_to_workdir(&repo, file_path)?;
        let mut index = repo.index()?;
        index.add_path(&relative)?;
        index.write()?;
        let tree_id = index.write_tree()?;

        let parent = match repo.head() {
            Ok(head) => Some(
                head.peel_to_commit()
                    .context("HEAD does not point at a commit")?,
            ),
            Err(_) => None,
        };
        if parent.as_ref().is_some_and(|p| p.tree_id() == tree_id) {
            debug!(file = %relative.display(), "unchanged, nothing to commit");
            return Ok(());
        }

        let tree = repo.find_tree(tree_id)?;
        let author = Self::author(&repo)?;
        let parents: Vec<_> = parent.iter().collect();
        repo.commit(Some("HEAD"), &author, &author, message, &tree, &parents)?;
        debug!(file = %relative.display(), commit_message = message, "committed");
        Ok(())
    }

    /// Publish local commits to origin
    pub fn push(&self) -> Result<()> {
        let Some(repo) = self.lock()? else {
            return Ok(());
        };

        let branch = Self::branch_of(&repo)?;
        Self::origin(&repo)?
            .push(&[&format!("refs/heads/{}", branch)], None)
            .with_context(|| format!("Pushing {} to origin failed", branch))
    }

    /// Identity from the repository config, or the planner's own
    fn author(repo: &Repository) -> Result<Signature<'static>> {
        let config = repo.config()?;
        let name = config
            .get_string("user.name")
            .unwrap_or_else(|_| FALLBACK_AUTHOR.to_string());
        let email = config
            .get_string("user.email")
            .unwrap_or_else(|_| FALLBACK_EMAIL.to_string());

        Signature::now(&name, &email).or_else(|_| {
            // sandboxes without a usable clock
            Signature::new(&name, &email, &Time::new(1_700_000_000, 0))
                .context("Cannot build a commit signature")
        })
    }

    /// Commit one saved file and push it
    pub fn commit_and_push(&self, file_path: &Path, commit_message: &str) -> Result<()> {
        if !self.is_git_managed() {
            return Ok(());
        }
        self.commit(file_path, commit_message)
            .context("Failed to commit trip data")?;
        self.push().context("Failed to push trip data")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup_test_repo() -> (TempDir, Repository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = Repository::init(temp_dir.path()).unwrap();

        let mut config = repo.config().unwrap();
        config.set_str("user.name", "Test User").unwrap();
        config.set_str("user.email", "test@example.com").unwrap();

        (temp_dir, repo)
    }

    fn head_message(repo: &Repository) -> String {
        let head = repo.head().unwrap();
        let commit = repo.find_commit(head.target().unwrap()).unwrap();
        commit.message().unwrap().to_string()
    }

    #[test]
    fn test_non_git_directory() {
        let temp_dir = TempDir::new().unwrap();
        let git_ops = GitOps::new(temp_dir.path());
        assert!(!git_ops.is_git_managed());
    }

    #[test]
    fn test_git_managed_directory() {
        let (temp_dir, _repo) = setup_test_repo();
        let file_path = temp_dir.path().join("default.csv");
        fs::write(&file_path, "Title\n").unwrap();

        let git_ops = GitOps::new(&file_path);
        assert!(git_ops.is_git_managed());
    }

    #[test]
    fn test_commit_creates_initial_and_follow_up_commits() {
        let (temp_dir, repo) = setup_test_repo();
        let file_path = temp_dir.path().join("default.csv");
        let git_ops = GitOps::new(temp_dir.path());

        fs::write(&file_path, "Title\nCastle\n").unwrap();
        git_ops.commit(&file_path, "Add item Castle").unwrap();
        assert_eq!(head_message(&repo), "Add item Castle");

        fs::write(&file_path, "Title\nCastle\nBeach\n").unwrap();
        git_ops.commit(&file_path, "Add item Beach").unwrap();
        assert_eq!(head_message(&repo), "Add item Beach");
    }

    #[test]
    fn test_commit_without_changes_is_skipped() {
        let (temp_dir, repo) = setup_test_repo();
        let file_path = temp_dir.path().join("default.csv");
        let git_ops = GitOps::new(temp_dir.path());

        fs::write(&file_path, "Title\nCastle\n").unwrap();
        git_ops.commit(&file_path, "First").unwrap();
        git_ops.commit(&file_path, "Second").unwrap();
        assert_eq!(head_message(&repo), "First");
    }

    #[test]
    fn test_commit_and_push_non_git_is_noop() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("default.csv");
        fs::write(&file_path, "Title\n").unwrap();

        let git_ops = GitOps::new(temp_dir.path());
        assert!(git_ops.commit_and_push(&file_path, "Test commit").is_ok());
        assert!(git_ops.pull().is_ok());
    }
}
