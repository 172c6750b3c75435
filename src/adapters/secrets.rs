//! Actions secrets and variables reconciliation.
//!
//! Desired state comes from a local YAML file with `secrets:` and
//! `variables:` maps; at least one must be non-empty. Variables follow the
//! usual flat-descriptor reconciliation (identity is the name, equality is
//! the value, managed names are never deleted). Secret values cannot be read
//! back through the API, so every desired secret is re-issued on every run;
//! the list of existing names only decides create versus update.
//!
//! Secret values are sealed against the repository public key before
//! transmission. The API only ever sees the ciphertext.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use base64::Engine as _;
use crypto_box::aead::OsRng;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::github::{ActionsPublicKey, GithubClient, RepoRef};
use crate::reconcile::{apply, reconcile, ApplyOptions, ApplyReport, ResourceOps};

/// Parsed desired state of the secrets file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecretsFile {
    #[serde(default)]
    pub secrets: BTreeMap<String, String>,
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
}

/// Parse the local secrets file.
///
/// A file defining neither secrets nor variables is rejected: the run would
/// silently do nothing, which almost always means the wrong path was given.
pub fn parse_secrets_file(path: &Path) -> Result<SecretsFile> {
    let text = fs::read_to_string(path).map_err(|e| Error::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let file: SecretsFile = serde_yaml::from_str(&text).map_err(|e| Error::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    if file.secrets.is_empty() && file.variables.is_empty() {
        return Err(Error::configuration(format!(
            "no secrets or variables found in {}",
            path.display()
        )));
    }
    Ok(file)
}

/// Seal a secret value against the repository public key.
///
/// Returns the base64-encoded sealed box the secrets API expects.
pub fn encrypt_secret(public_key: &ActionsPublicKey, value: &str) -> Result<String> {
    let remote = |message: String| Error::Remote {
        status: 200,
        context: "actions public key".to_string(),
        message,
    };

    let decoded = base64::engine::general_purpose::STANDARD
        .decode(public_key.key.trim())
        .map_err(|e| remote(format!("invalid base64 key: {e}")))?;
    let bytes: [u8; 32] = decoded
        .as_slice()
        .try_into()
        .map_err(|_| remote(format!("expected a 32-byte key, got {} bytes", decoded.len())))?;

    let sealed = crypto_box::PublicKey::from(bytes)
        .seal(&mut OsRng, value.as_bytes())
        .map_err(|e| remote(format!("sealed-box encryption failed: {e}")))?;

    Ok(base64::engine::general_purpose::STANDARD.encode(sealed))
}

/// One Actions secret with its plaintext value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Secret {
    pub name: String,
    pub value: String,
}

/// One Actions variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
    pub value: String,
}

struct SecretOps<'a> {
    client: &'a GithubClient,
    repo: &'a RepoRef,
    public_key: &'a ActionsPublicKey,
}

impl SecretOps<'_> {
    fn put(&self, item: &Secret) -> Result<()> {
        let encrypted = encrypt_secret(self.public_key, &item.value)?;
        self.client
            .put_secret(self.repo, &item.name, &encrypted, &self.public_key.key_id)
    }
}

impl ResourceOps<Secret> for SecretOps<'_> {
    fn describe(&self, item: &Secret) -> String {
        format!("secret '{}'", item.name)
    }

    fn create(&self, item: &Secret) -> Result<()> {
        self.put(item)
    }

    fn update(&self, item: &Secret) -> Result<()> {
        self.put(item)
    }

    fn delete(&self, item: &Secret) -> Result<()> {
        // Structurally unreachable: observed is keyed by the desired names.
        unreachable!("managed secrets are never deleted: {}", item.name)
    }
}

struct VariableOps<'a> {
    client: &'a GithubClient,
    repo: &'a RepoRef,
}

impl ResourceOps<Variable> for VariableOps<'_> {
    fn describe(&self, item: &Variable) -> String {
        format!("variable '{}'", item.name)
    }

    fn create(&self, item: &Variable) -> Result<()> {
        self.client.create_variable(self.repo, &item.name, &item.value)
    }

    fn update(&self, item: &Variable) -> Result<()> {
        self.client.update_variable(self.repo, &item.name, &item.value)
    }

    fn delete(&self, item: &Variable) -> Result<()> {
        unreachable!("managed variables are never deleted: {}", item.name)
    }
}

/// Reconcile the repository's Actions secrets and variables against an
/// already-parsed desired state.
pub fn sync(
    client: &GithubClient,
    repo_ref: &RepoRef,
    file: &SecretsFile,
    options: &ApplyOptions,
) -> Result<ApplyReport> {
    let mut report = ApplyReport::default();

    if !file.secrets.is_empty() {
        let public_key = client.actions_public_key(repo_ref)?;
        let existing: HashSet<String> = client.list_secret_names(repo_ref)?.into_iter().collect();

        let desired: Vec<Secret> = file
            .secrets
            .iter()
            .map(|(name, value)| Secret {
                name: name.clone(),
                value: value.clone(),
            })
            .collect();
        // Values are write-only, so an existing name is always "changed".
        let observed: Vec<Secret> = desired
            .iter()
            .filter(|s| existing.contains(&s.name))
            .map(|s| Secret {
                name: s.name.clone(),
                value: String::new(),
            })
            .collect();

        let delta = reconcile(&desired, &observed, |s| s.name.clone(), |_, _| false);
        report.extend(apply(
            &delta,
            &SecretOps {
                client,
                repo: repo_ref,
                public_key: &public_key,
            },
            options,
        ));
    }

    if !file.variables.is_empty() {
        let desired: Vec<Variable> = file
            .variables
            .iter()
            .map(|(name, value)| Variable {
                name: name.clone(),
                value: value.clone(),
            })
            .collect();

        let mut observed = Vec::new();
        for var in &desired {
            match client.get_variable(repo_ref, &var.name) {
                Ok(value) => observed.push(Variable {
                    name: var.name.clone(),
                    value,
                }),
                Err(e) if e.is_not_found() => {}
                Err(e) => return Err(e),
            }
        }

        let delta = reconcile(
            &desired,
            &observed,
            |v| v.name.clone(),
            |a, b| a.value == b.value,
        );
        if delta.is_empty() {
            log::info!("variables for {} already in sync", repo_ref);
        }
        report.extend(apply(&delta, &VariableOps { client, repo: repo_ref }, options));
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{content}").unwrap();
        file
    }

    #[test]
    fn test_parse_secrets_file_valid() {
        let file = write_file(
            "secrets:\n  NPM_TOKEN: \"abc123\"\nvariables:\n  NODE_ENV: \"production\"\n",
        );
        let parsed = parse_secrets_file(file.path()).unwrap();
        assert_eq!(parsed.secrets.get("NPM_TOKEN").unwrap(), "abc123");
        assert_eq!(parsed.variables.get("NODE_ENV").unwrap(), "production");
    }

    #[test]
    fn test_parse_secrets_file_secrets_only() {
        let file = write_file("secrets:\n  NPM_TOKEN: \"abc123\"\n");
        let parsed = parse_secrets_file(file.path()).unwrap();
        assert_eq!(parsed.secrets.len(), 1);
        assert!(parsed.variables.is_empty());
    }

    #[test]
    fn test_parse_secrets_file_rejects_empty() {
        let file = write_file("secrets: {}\nvariables: {}\n");
        let err = parse_secrets_file(file.path()).unwrap_err();
        assert!(format!("{}", err).contains("no secrets or variables"));
    }

    #[test]
    fn test_parse_secrets_file_malformed() {
        // A sequence where a map is expected.
        let file = write_file("secrets:\n  - NPM_TOKEN\n  - OTHER\n");
        let err = parse_secrets_file(file.path()).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn test_parse_secrets_file_missing() {
        let err = parse_secrets_file(Path::new("/nonexistent/.secrets.yml")).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn test_encrypt_secret_round_trips() {
        let secret_key = crypto_box::SecretKey::from([7u8; 32]);
        let public_key = ActionsPublicKey {
            key_id: "568250167242549743".to_string(),
            key: base64::engine::general_purpose::STANDARD
                .encode(secret_key.public_key().as_bytes()),
        };

        let sealed = encrypt_secret(&public_key, "hunter2").unwrap();
        let ciphertext = base64::engine::general_purpose::STANDARD
            .decode(sealed)
            .unwrap();
        let opened = secret_key.unseal(&ciphertext).unwrap();
        assert_eq!(opened, b"hunter2");
    }

    #[test]
    fn test_encrypt_secret_rejects_bad_key() {
        let bad_base64 = ActionsPublicKey {
            key_id: "1".to_string(),
            key: "not base64!!".to_string(),
        };
        assert!(encrypt_secret(&bad_base64, "x").is_err());

        let wrong_length = ActionsPublicKey {
            key_id: "1".to_string(),
            key: base64::engine::general_purpose::STANDARD.encode([0u8; 16]),
        };
        let err = encrypt_secret(&wrong_length, "x").unwrap_err();
        assert!(format!("{}", err).contains("32-byte"));
    }

    #[test]
    fn test_secret_delta_always_reissues() {
        // Both secrets desired, one already exists: the existing one is an
        // update, the other a create, and nothing is ever deleted.
        let desired = vec![
            Secret {
                name: "NEW".to_string(),
                value: "a".to_string(),
            },
            Secret {
                name: "EXISTING".to_string(),
                value: "b".to_string(),
            },
        ];
        let observed = vec![Secret {
            name: "EXISTING".to_string(),
            value: String::new(),
        }];

        let delta = reconcile(&desired, &observed, |s| s.name.clone(), |_, _| false);
        assert_eq!(delta.to_create.len(), 1);
        assert_eq!(delta.to_create[0].name, "NEW");
        assert_eq!(delta.to_update.len(), 1);
        assert_eq!(delta.to_update[0].name, "EXISTING");
        assert!(delta.to_delete.is_empty());
    }

    #[test]
    fn test_variable_delta_skips_equal_values() {
        let desired = vec![
            Variable {
                name: "NODE_ENV".to_string(),
                value: "production".to_string(),
            },
            Variable {
                name: "REGION".to_string(),
                value: "eu-west-1".to_string(),
            },
        ];
        let observed = vec![Variable {
            name: "NODE_ENV".to_string(),
            value: "production".to_string(),
        }];

        let delta = reconcile(
            &desired,
            &observed,
            |v| v.name.clone(),
            |a, b| a.value == b.value,
        );
        assert_eq!(delta.to_create.len(), 1);
        assert_eq!(delta.to_create[0].name, "REGION");
        assert!(delta.to_update.is_empty());
        assert!(delta.to_delete.is_empty());
    }
}
