//! # GitHub API Client
//!
//! A thin blocking client over the GitHub REST and GraphQL APIs, scoped to
//! exactly the operations the resource adapters need: repository metadata,
//! label CRUD, file contents, branch protection (GraphQL), repository
//! settings, deletion, and transfer.
//!
//! One [`GithubClient`] value is constructed per invocation from resolved
//! [`Credentials`](crate::auth::Credentials) and passed explicitly into each
//! adapter call; there is no global shared client.
//!
//! ## Error mapping
//!
//! HTTP 404, and only 404, becomes [`Error::NotFound`]; any other failing
//! status becomes [`Error::Remote`] with the request context and response
//! body. Transient transport failures surface as [`Error::Http`] and are
//! never mistaken for an absent resource.

use base64::Engine as _;
use serde::Deserialize;
use serde_json::{json, Value};
use url::Url;

use crate::adapters::labels::Label;
use crate::auth::Credentials;
use crate::error::{Error, Result};

const DEFAULT_BASE_URL: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("repo-steward/", env!("CARGO_PKG_VERSION"));

/// An `owner/name` repository reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    /// Parse an `owner/name` string. Anything else is a configuration error.
    pub fn parse(s: &str) -> Result<RepoRef> {
        match s.split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(RepoRef {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(Error::configuration_with_hint(
                format!("invalid repository reference '{s}'"),
                "expected the form owner/name, e.g. acme/widgets",
            )),
        }
    }
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Repository owner metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct Owner {
    pub login: String,
    pub node_id: String,
    /// `"User"` or `"Organization"`.
    #[serde(rename = "type")]
    pub kind: String,
}

impl Owner {
    pub fn is_user(&self) -> bool {
        self.kind == "User"
    }
}

/// Repository metadata, fetched fresh at the start of every command.
#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub name: String,
    pub full_name: String,
    pub node_id: String,
    pub owner: Owner,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub private: bool,
    pub language: Option<String>,
    #[serde(default = "default_branch")]
    pub default_branch: String,
}

fn default_branch() -> String {
    "main".to_string()
}

impl Repository {
    /// Reason to skip this repository, if any. Archived, disabled, forked
    /// and empty repositories are never administered.
    pub fn skip_reason(&self) -> Option<&'static str> {
        if self.archived {
            Some("archived")
        } else if self.disabled {
            Some("disabled")
        } else if self.fork {
            Some("fork")
        } else if self.size == 0 {
            Some("empty")
        } else {
            None
        }
    }

    /// Primary language, lowercased the way the adapters expect it.
    pub fn language_id(&self) -> Option<String> {
        self.language.as_ref().map(|l| l.to_lowercase())
    }
}

/// A file fetched through the contents API.
#[derive(Debug, Clone)]
pub struct RemoteFile {
    pub text: String,
    pub sha: String,
}

#[derive(Debug, Deserialize)]
struct ContentsResponse {
    content: String,
    sha: String,
}

/// The repository public key Actions secrets are sealed against.
#[derive(Debug, Clone, Deserialize)]
pub struct ActionsPublicKey {
    pub key_id: String,
    /// Base64-encoded 32-byte X25519 public key.
    pub key: String,
}

#[derive(Debug, Deserialize)]
struct SecretsListResponse {
    secrets: Vec<SecretName>,
}

#[derive(Debug, Deserialize)]
struct SecretName {
    name: String,
}

#[derive(Debug, Deserialize)]
struct VariableResponse {
    value: String,
}

/// Blocking GitHub API client, one per reconciliation invocation.
pub struct GithubClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl GithubClient {
    /// Build a client for the public GitHub API.
    pub fn new(credentials: &Credentials) -> Result<GithubClient> {
        Self::with_base_url(credentials, DEFAULT_BASE_URL)
    }

    /// Build a client against a custom API root (used by tests).
    pub fn with_base_url(credentials: &Credentials, base_url: &str) -> Result<GithubClient> {
        let mut headers = reqwest::header::HeaderMap::new();
        let mut auth = reqwest::header::HeaderValue::from_str(&format!(
            "Bearer {}",
            credentials.token()
        ))
        .map_err(|_| Error::configuration("token contains invalid header characters"))?;
        auth.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, auth);
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            reqwest::header::HeaderValue::from_static("2022-11-28"),
        );

        let http = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(GithubClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build an API URL from path segments, percent-encoding each segment.
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| Error::configuration(format!("invalid API base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| Error::configuration("API base URL cannot carry a path"))?
            .extend(segments);
        Ok(url)
    }

    /// Check a response status; 404 maps to `NotFound`, other failures to
    /// `Remote` with the response body as message.
    fn check(
        resp: reqwest::blocking::Response,
        context: &str,
    ) -> Result<reqwest::blocking::Response> {
        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound {
                resource: context.to_string(),
            });
        }
        if !status.is_success() {
            let message = resp.text().unwrap_or_default();
            return Err(Error::Remote {
                status: status.as_u16(),
                context: context.to_string(),
                message,
            });
        }
        Ok(resp)
    }

    // ---- repository metadata -------------------------------------------

    /// Fetch repository metadata.
    pub fn repository(&self, repo: &RepoRef) -> Result<Repository> {
        let context = format!("GET repos/{repo}");
        let url = self.url(&["repos", &repo.owner, &repo.name])?;
        let resp = Self::check(self.http.get(url).send()?, &context)?;
        Ok(resp.json()?)
    }

    // ---- labels ---------------------------------------------------------

    /// List up to 100 labels of a repository.
    pub fn list_labels(&self, repo: &RepoRef) -> Result<Vec<Label>> {
        let context = format!("GET repos/{repo}/labels");
        let mut url = self.url(&["repos", &repo.owner, &repo.name, "labels"])?;
        url.query_pairs_mut().append_pair("per_page", "100");
        let resp = Self::check(self.http.get(url).send()?, &context)?;
        Ok(resp.json()?)
    }

    /// Create a label.
    pub fn create_label(&self, repo: &RepoRef, label: &Label) -> Result<()> {
        let context = format!("POST repos/{repo}/labels ({})", label.name);
        let url = self.url(&["repos", &repo.owner, &repo.name, "labels"])?;
        Self::check(self.http.post(url).json(label).send()?, &context)?;
        Ok(())
    }

    /// Update a label in place (no rename; identity is the name).
    pub fn update_label(&self, repo: &RepoRef, label: &Label) -> Result<()> {
        let context = format!("PATCH repos/{repo}/labels/{}", label.name);
        let url = self.url(&["repos", &repo.owner, &repo.name, "labels", &label.name])?;
        Self::check(self.http.patch(url).json(label).send()?, &context)?;
        Ok(())
    }

    /// Delete a label by name.
    pub fn delete_label(&self, repo: &RepoRef, name: &str) -> Result<()> {
        let context = format!("DELETE repos/{repo}/labels/{name}");
        let url = self.url(&["repos", &repo.owner, &repo.name, "labels", name])?;
        Self::check(self.http.delete(url).send()?, &context)?;
        Ok(())
    }

    // ---- file contents --------------------------------------------------

    /// Fetch a file through the contents API, base64-decoded.
    pub fn get_content(&self, repo: &RepoRef, path: &str) -> Result<RemoteFile> {
        let context = format!("GET repos/{repo}/contents/{path}");
        let mut segments = vec!["repos", repo.owner.as_str(), repo.name.as_str(), "contents"];
        segments.extend(path.split('/'));
        let url = self.url(&segments)?;
        let resp = Self::check(self.http.get(url).send()?, &context)?;
        let body: ContentsResponse = resp.json()?;

        // The API wraps base64 at 60 columns; strip whitespace first.
        let packed: String = body.content.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(packed)
            .map_err(|e| Error::Remote {
                status: 200,
                context: context.clone(),
                message: format!("invalid base64 content: {e}"),
            })?;
        let text = String::from_utf8(bytes).map_err(|e| Error::Remote {
            status: 200,
            context,
            message: format!("content is not valid UTF-8: {e}"),
        })?;

        Ok(RemoteFile {
            text,
            sha: body.sha,
        })
    }

    /// Create or update a file through the contents API. Updates must carry
    /// the observed blob SHA.
    pub fn put_content(
        &self,
        repo: &RepoRef,
        path: &str,
        text: &str,
        message: &str,
        sha: Option<&str>,
    ) -> Result<()> {
        let context = format!("PUT repos/{repo}/contents/{path}");
        let mut segments = vec!["repos", repo.owner.as_str(), repo.name.as_str(), "contents"];
        segments.extend(path.split('/'));
        let url = self.url(&segments)?;

        let mut body = json!({
            "message": message,
            "content": base64::engine::general_purpose::STANDARD.encode(text),
        });
        if let Some(sha) = sha {
            body["sha"] = json!(sha);
        }

        Self::check(self.http.put(url).json(&body).send()?, &context)?;
        Ok(())
    }

    // ---- GraphQL --------------------------------------------------------

    /// Execute a GraphQL query or mutation and return the `data` payload.
    /// GraphQL-level errors surface as [`Error::Remote`].
    pub fn graphql(&self, query: &str, variables: Value) -> Result<Value> {
        let context = "POST graphql".to_string();
        let url = self.url(&["graphql"])?;
        let resp = Self::check(
            self.http
                .post(url)
                .json(&json!({ "query": query, "variables": variables }))
                .send()?,
            &context,
        )?;
        let mut body: Value = resp.json()?;

        if let Some(errors) = body.get("errors").and_then(Value::as_array) {
            if !errors.is_empty() {
                let message = errors
                    .iter()
                    .filter_map(|e| e.get("message").and_then(Value::as_str))
                    .collect::<Vec<_>>()
                    .join("; ");
                return Err(Error::Remote {
                    status: 200,
                    context,
                    message,
                });
            }
        }

        Ok(body["data"].take())
    }

    // ---- Actions secrets and variables ----------------------------------

    /// Fetch the public key secrets for this repository are sealed against.
    pub fn actions_public_key(&self, repo: &RepoRef) -> Result<ActionsPublicKey> {
        let context = format!("GET repos/{repo}/actions/secrets/public-key");
        let url = self.url(&[
            "repos",
            &repo.owner,
            &repo.name,
            "actions",
            "secrets",
            "public-key",
        ])?;
        let resp = Self::check(self.http.get(url).send()?, &context)?;
        Ok(resp.json()?)
    }

    /// List the names of up to 100 existing Actions secrets. Values are
    /// never readable through the API.
    pub fn list_secret_names(&self, repo: &RepoRef) -> Result<Vec<String>> {
        let context = format!("GET repos/{repo}/actions/secrets");
        let mut url = self.url(&["repos", &repo.owner, &repo.name, "actions", "secrets"])?;
        url.query_pairs_mut().append_pair("per_page", "100");
        let resp = Self::check(self.http.get(url).send()?, &context)?;
        let body: SecretsListResponse = resp.json()?;
        Ok(body.secrets.into_iter().map(|s| s.name).collect())
    }

    /// Create or update an Actions secret with an already-sealed value.
    pub fn put_secret(
        &self,
        repo: &RepoRef,
        name: &str,
        encrypted_value: &str,
        key_id: &str,
    ) -> Result<()> {
        let context = format!("PUT repos/{repo}/actions/secrets/{name}");
        let url = self.url(&["repos", &repo.owner, &repo.name, "actions", "secrets", name])?;
        Self::check(
            self.http
                .put(url)
                .json(&json!({ "encrypted_value": encrypted_value, "key_id": key_id }))
                .send()?,
            &context,
        )?;
        Ok(())
    }

    /// Fetch the value of an Actions variable.
    pub fn get_variable(&self, repo: &RepoRef, name: &str) -> Result<String> {
        let context = format!("GET repos/{repo}/actions/variables/{name}");
        let url = self.url(&["repos", &repo.owner, &repo.name, "actions", "variables", name])?;
        let resp = Self::check(self.http.get(url).send()?, &context)?;
        let body: VariableResponse = resp.json()?;
        Ok(body.value)
    }

    /// Create an Actions variable.
    pub fn create_variable(&self, repo: &RepoRef, name: &str, value: &str) -> Result<()> {
        let context = format!("POST repos/{repo}/actions/variables ({name})");
        let url = self.url(&["repos", &repo.owner, &repo.name, "actions", "variables"])?;
        Self::check(
            self.http
                .post(url)
                .json(&json!({ "name": name, "value": value }))
                .send()?,
            &context,
        )?;
        Ok(())
    }

    /// Update an existing Actions variable.
    pub fn update_variable(&self, repo: &RepoRef, name: &str, value: &str) -> Result<()> {
        let context = format!("PATCH repos/{repo}/actions/variables/{name}");
        let url = self.url(&["repos", &repo.owner, &repo.name, "actions", "variables", name])?;
        Self::check(
            self.http
                .patch(url)
                .json(&json!({ "name": name, "value": value }))
                .send()?,
            &context,
        )?;
        Ok(())
    }

    // ---- repository administration --------------------------------------

    /// PATCH repository settings with the given partial document.
    pub fn update_settings(&self, repo: &RepoRef, patch: &Value) -> Result<()> {
        let context = format!("PATCH repos/{repo}");
        let url = self.url(&["repos", &repo.owner, &repo.name])?;
        Self::check(self.http.patch(url).json(patch).send()?, &context)?;
        Ok(())
    }

    /// Enable Dependabot vulnerability alerts.
    pub fn enable_vulnerability_alerts(&self, repo: &RepoRef) -> Result<()> {
        let context = format!("PUT repos/{repo}/vulnerability-alerts");
        let url = self.url(&["repos", &repo.owner, &repo.name, "vulnerability-alerts"])?;
        Self::check(self.http.put(url).send()?, &context)?;
        Ok(())
    }

    /// Enable automated security fixes.
    pub fn enable_automated_security_fixes(&self, repo: &RepoRef) -> Result<()> {
        let context = format!("PUT repos/{repo}/automated-security-fixes");
        let url = self.url(&[
            "repos",
            &repo.owner,
            &repo.name,
            "automated-security-fixes",
        ])?;
        Self::check(self.http.put(url).send()?, &context)?;
        Ok(())
    }

    /// Delete the repository.
    pub fn delete_repository(&self, repo: &RepoRef) -> Result<()> {
        let context = format!("DELETE repos/{repo}");
        let url = self.url(&["repos", &repo.owner, &repo.name])?;
        Self::check(self.http.delete(url).send()?, &context)?;
        Ok(())
    }

    /// Transfer the repository to a new owner.
    pub fn transfer_repository(&self, repo: &RepoRef, new_owner: &str) -> Result<()> {
        let context = format!("POST repos/{repo}/transfer");
        let url = self.url(&["repos", &repo.owner, &repo.name, "transfer"])?;
        Self::check(
            self.http
                .post(url)
                .json(&json!({ "new_owner": new_owner }))
                .send()?,
            &context,
        )?;
        Ok(())
    }
}
