//! where a workspace comes from
//!
//! A [Source] resolves to a local directory ([Checkout]) that can be read with [crate::fs::LocalFs]. Git repositories
//! are cloned with [git2] into a temporary directory, which is removed when the [Checkout] is dropped. Tokens from the
//! environment are handed to libgit2 when it asks for credentials, they never end up in the URL or the clone's config.
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Local {
        path: PathBuf,
        subdir: Option<PathBuf>,
    },
    Git {
        url: String,
        /// Branch, tag or commit. The remote's default branch when `None`.
        reference: Option<String>,
        subdir: Option<PathBuf>,
    },
}

/// A fetched source
#[derive(Debug)]
pub struct Checkout {
    root: PathBuf,
    _clone: Option<tempfile::TempDir>,
}

impl Checkout {
    /// Directory to parse
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Source {
    pub fn fetch(&self) -> Result<Checkout, SourceError> {
        match self {
            Source::Local { path, subdir } => {
                tracing::info!(path = %path.display(), "using local directory");
                Ok(Checkout {
                    root: with_subdir(path, subdir.as_deref()),
                    _clone: None,
                })
            }
            Source::Git {
                url,
                reference,
                subdir,
            } => {
                let clone = tempfile::Builder::new()
                    .prefix("tfsummary-")
                    .tempdir()
                    .map_err(SourceError::TempDir)?;

                clone_repository(url, reference.as_deref(), clone.path())?;

                Ok(Checkout {
                    root: with_subdir(clone.path(), subdir.as_deref()),
                    _clone: Some(clone),
                })
            }
        }
    }
}

fn with_subdir(root: &Path, subdir: Option<&Path>) -> PathBuf {
    match subdir {
        Some(subdir) => root.join(subdir),
        None => root.to_owned(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    /// A branch or tag name
    Named,
    /// An abbreviated or full commit hash
    Commit,
}

impl RefKind {
    /// 7 to 64 lowercase hex characters are treated as a commit hash
    pub fn detect(reference: &str) -> RefKind {
        let is_hash = (7..=64).contains(&reference.len())
            && reference
                .chars()
                .all(|c| matches!(c, '0'..='9' | 'a'..='f'));

        if is_hash {
            RefKind::Commit
        } else {
            RefKind::Named
        }
    }
}

#[tracing::instrument(level = "debug", skip_all, fields(url = %url))]
fn clone_repository(url: &str, reference: Option<&str>, into: &Path) -> Result<(), SourceError> {
    tracing::info!(url, ?reference, "cloning git repository");

    let mut callbacks = git2::RemoteCallbacks::new();
    if let Some(credentials) = credentials(url, |key| std::env::var(key).ok()) {
        tracing::debug!(username = credentials.username, "using token from environment");
        let mut attempted = false;
        callbacks.credentials(move |_url, _username, allowed| {
            // libgit2 asks again when the credentials are rejected
            if attempted || !allowed.contains(git2::CredentialType::USER_PASS_PLAINTEXT) {
                return Err(git2::Error::from_str("token from environment was not accepted"));
            }
            attempted = true;
            git2::Cred::userpass_plaintext(credentials.username, &credentials.token)
        });
    }

    let mut fetch = git2::FetchOptions::new();
    fetch.remote_callbacks(callbacks);
    // the local transport does not support shallow fetches, references may point anywhere in the history
    if reference.is_none() && is_remote(url) {
        fetch.depth(1);
    }

    let repository = git2::build::RepoBuilder::new()
        .fetch_options(fetch)
        .clone(url, into)
        .map_err(|source| SourceError::Clone {
            url: url.to_owned(),
            source,
        })?;

    if let Some(reference) = reference {
        checkout(&repository, reference).map_err(|source| SourceError::Reference {
            url: url.to_owned(),
            reference: reference.to_owned(),
            source,
        })?;
    }

    tracing::info!(url, "cloned git repository");
    Ok(())
}

/// Detach HEAD at a branch, tag or commit and update the work tree
fn checkout(repository: &git2::Repository, reference: &str) -> Result<(), git2::Error> {
    let object = match RefKind::detect(reference) {
        RefKind::Named => repository
            .revparse_single(&format!("origin/{reference}"))
            .or_else(|_| repository.revparse_single(reference))?,
        RefKind::Commit => repository.revparse_single(reference)?,
    };
    let commit = object.peel_to_commit()?;
    tracing::debug!(reference, commit = %commit.id(), "checking out");

    repository.checkout_tree(
        commit.as_object(),
        Some(git2::build::CheckoutBuilder::new().force()),
    )?;
    repository.set_head_detached(commit.id())
}

fn is_remote(url: &str) -> bool {
    match url::Url::parse(url) {
        Ok(parsed) => parsed.scheme() != "file",
        // scp-like ssh syntax, e.g. git@github.com:owner/repo.git
        Err(_) => url.contains('@') && url.contains(':'),
    }
}

/// User name and token for an https remote
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: &'static str,
    pub token: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Pick a token from the environment for an https URL
///
/// - github hosts use `GITHUB_TOKEN`
/// - gitlab hosts use `GITLAB_TOKEN`
/// - any host falls back to `GIT_TOKEN`
///
/// URLs that are not https, cannot be parsed or already carry a user name get no credentials.
pub fn credentials(url: &str, env: impl Fn(&str) -> Option<String>) -> Option<Credentials> {
    let parsed = url::Url::parse(url).ok()?;
    if parsed.scheme() != "https" || !parsed.username().is_empty() {
        return None;
    }

    let host = parsed.host_str().unwrap_or_default().to_lowercase();
    let token = |key: &str| env(key).filter(|token| !token.is_empty());

    let (username, token) = if let Some(token) = host
        .contains("github.com")
        .then(|| token("GITHUB_TOKEN"))
        .flatten()
    {
        (github_username(&token), token)
    } else if let Some(token) = host.contains("gitlab").then(|| token("GITLAB_TOKEN")).flatten() {
        ("gitlab-ci-token", token)
    } else {
        let token = token("GIT_TOKEN")?;
        (github_username(&token), token)
    };

    Some(Credentials { username, token })
}

/// Fine-grained github tokens need a different user name than classic ones
fn github_username(token: &str) -> &'static str {
    if token.starts_with("github_pat_") {
        "x-access-token"
    } else {
        "token"
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SourceError {
    #[error("failed to create temporary directory")]
    TempDir(#[source] std::io::Error),
    #[error("failed to clone {url}")]
    Clone {
        url: String,
        #[source]
        source: git2::Error,
    },
    #[error("failed to check out {reference} of {url}")]
    Reference {
        url: String,
        reference: String,
        #[source]
        source: git2::Error,
    },
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn ref_kind() {
        assert_eq!(RefKind::detect("main"), RefKind::Named);
        assert_eq!(RefKind::detect("v1.0.0"), RefKind::Named);
        assert_eq!(RefKind::detect("abc123d"), RefKind::Commit);
        assert_eq!(RefKind::detect("abc123"), RefKind::Named);
        assert_eq!(RefKind::detect("ABC123DEF"), RefKind::Named);
        assert_eq!(
            RefKind::detect("0123456789abcdef0123456789abcdef01234567"),
            RefKind::Commit
        );
    }

    fn credentials_for(url: &str, vars: &[(&str, &str)]) -> Option<(&'static str, String)> {
        credentials(url, env(vars)).map(|credentials| (credentials.username, credentials.token))
    }

    #[test]
    fn github_tokens() {
        assert_eq!(
            credentials_for(
                "https://github.com/owner/repo",
                &[("GITHUB_TOKEN", "ghp_secret")]
            ),
            Some(("token", "ghp_secret".to_string()))
        );
        assert_eq!(
            credentials_for(
                "https://github.com/owner/repo",
                &[("GITHUB_TOKEN", "github_pat_secret")]
            ),
            Some(("x-access-token", "github_pat_secret".to_string()))
        );
    }

    #[test]
    fn gitlab_token() {
        assert_eq!(
            credentials_for(
                "https://gitlab.example.com/group/repo.git",
                &[("GITLAB_TOKEN", "glpat")]
            ),
            Some(("gitlab-ci-token", "glpat".to_string()))
        );
    }

    #[test]
    fn generic_token_fallback() {
        assert_eq!(
            credentials_for("https://github.com/owner/repo", &[("GIT_TOKEN", "generic")]),
            Some(("token", "generic".to_string()))
        );
        assert_eq!(
            credentials_for(
                "https://git.example.com/repo",
                &[("GITHUB_TOKEN", "unused"), ("GIT_TOKEN", "generic")]
            ),
            Some(("token", "generic".to_string()))
        );
    }

    #[test]
    fn no_credentials() {
        let tokens = [("GIT_TOKEN", "generic")];
        assert_eq!(credentials_for("git@github.com:owner/repo.git", &tokens), None);
        assert_eq!(credentials_for("http://example.com/repo", &tokens), None);
        assert_eq!(credentials_for("https://me@example.com/repo", &tokens), None);
        assert_eq!(credentials_for("https://github.com/owner/repo", &[]), None);
        assert_eq!(
            credentials_for("https://github.com/owner/repo", &[("GITHUB_TOKEN", "")]),
            None
        );
    }

    #[test]
    fn token_is_not_printed() {
        let credentials = credentials("https://github.com/o/r", env(&[("GITHUB_TOKEN", "ghp_secret")]))
            .expect("credentials");
        assert!(!format!("{credentials:?}").contains("ghp_secret"));
    }

    #[test]
    fn remote_urls() {
        assert!(is_remote("https://github.com/owner/repo"));
        assert!(is_remote("ssh://git@github.com/owner/repo.git"));
        assert!(is_remote("git@github.com:owner/repo.git"));
        assert!(!is_remote("file:///srv/repo"));
        assert!(!is_remote("/srv/repo"));
    }

    /// Commit `contents` as main.tf on top of HEAD
    fn commit(repository: &git2::Repository, contents: &str) -> git2::Oid {
        let workdir = repository.workdir().unwrap();
        std::fs::write(workdir.join("main.tf"), contents).unwrap();

        let mut index = repository.index().unwrap();
        index.add_path(Path::new("main.tf")).unwrap();
        index.write().unwrap();
        let tree = repository.find_tree(index.write_tree().unwrap()).unwrap();

        let signature = git2::Signature::now("tfsummary", "tfsummary@example.com").unwrap();
        let parent = repository
            .head()
            .ok()
            .and_then(|head| head.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();
        repository
            .commit(Some("HEAD"), &signature, &signature, "update", &tree, &parents)
            .unwrap()
    }

    /// A repository with two commits, the first one tagged `v1.0.0` and branched as `stable`
    fn repository() -> (tempfile::TempDir, git2::Oid) {
        let dir = tempfile::tempdir().unwrap();
        let repository = git2::Repository::init(dir.path()).unwrap();

        let first = commit(&repository, "variable \"first\" {}\n");
        let first_commit = repository.find_commit(first).unwrap();
        repository
            .tag_lightweight("v1.0.0", first_commit.as_object(), false)
            .unwrap();
        repository.branch("stable", &first_commit, false).unwrap();

        commit(&repository, "variable \"second\" {}\n");
        (dir, first)
    }

    fn fetch_main_tf(url: &str, reference: Option<&str>) -> Result<String, SourceError> {
        let source = Source::Git {
            url: url.to_owned(),
            reference: reference.map(str::to_owned),
            subdir: None,
        };
        let checkout = source.fetch()?;
        Ok(std::fs::read_to_string(checkout.root().join("main.tf")).unwrap())
    }

    #[test]
    fn clone_references() {
        let (remote, first) = repository();
        let url = remote.path().to_str().unwrap();
        let abbreviated = first.to_string()[..10].to_string();

        assert!(fetch_main_tf(url, None).unwrap().contains("second"));
        assert!(fetch_main_tf(url, Some("v1.0.0")).unwrap().contains("first"));
        assert!(fetch_main_tf(url, Some("stable")).unwrap().contains("first"));
        assert!(fetch_main_tf(url, Some(&abbreviated)).unwrap().contains("first"));
    }

    #[test]
    fn clone_is_removed_with_checkout() {
        let (remote, _) = repository();
        let source = Source::Git {
            url: remote.path().to_str().unwrap().to_owned(),
            reference: None,
            subdir: None,
        };

        let checkout = source.fetch().unwrap();
        let root = checkout.root().to_owned();
        assert!(root.join("main.tf").is_file());
        drop(checkout);
        assert!(!root.exists());
    }

    #[test]
    fn unknown_reference() {
        let (remote, _) = repository();
        let err = fetch_main_tf(remote.path().to_str().unwrap(), Some("missing")).unwrap_err();
        assert!(
            matches!(&err, SourceError::Reference { reference, .. } if reference == "missing"),
            "{err:?}"
        );
    }

    #[test]
    fn unknown_repository() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let err = fetch_main_tf(missing.to_str().unwrap(), None).unwrap_err();
        assert!(matches!(err, SourceError::Clone { .. }), "{err:?}");
    }

    #[test]
    fn local_source_with_subdir() {
        let source = Source::Local {
            path: PathBuf::from("infra"),
            subdir: Some(PathBuf::from("modules/vpc")),
        };
        let checkout = source.fetch().unwrap();
        assert_eq!(checkout.root(), Path::new("infra/modules/vpc"));
    }
}
