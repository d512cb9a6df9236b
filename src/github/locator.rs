//! Identity wrappers for hosts, repositories, and pull requests.

use std::fmt;

use url::Url;

use super::error::RemoteError;

/// Repository owner wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryOwner(String);

impl RepositoryOwner {
    /// Validates that the owner is non-empty.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::MissingPathSegments` when the value is blank.
    pub fn new(value: &str) -> Result<Self, RemoteError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(RemoteError::MissingPathSegments);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the owner value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RepositoryOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Repository name wrapper to prevent parameter mix-ups.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryName(String);

impl RepositoryName {
    /// Validates that the repository name is non-empty.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::MissingPathSegments` when the value is blank.
    pub fn new(value: &str) -> Result<Self, RemoteError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(RemoteError::MissingPathSegments);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the repository name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RepositoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pull request number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PullRequestNumber(u64);

impl PullRequestNumber {
    /// Validates that the number is positive.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::InvalidPullRequestNumber` for zero.
    pub const fn new(value: u64) -> Result<Self, RemoteError> {
        if value == 0 {
            return Err(RemoteError::InvalidPullRequestNumber);
        }
        Ok(Self(value))
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PullRequestNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Personal access token wrapper enforcing presence.
#[derive(Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::MissingToken` when the supplied string is blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, RemoteError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(RemoteError::MissingToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

impl fmt::Debug for PersonalAccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PersonalAccessToken(<redacted>)")
    }
}

/// Web and API addresses of a GitHub installation.
///
/// `github.com` maps to `https://api.github.com`; every other host is treated
/// as GitHub Enterprise and served from `<scheme>://<host>/api/v3`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostAddress {
    web_url: Url,
    api_base: Url,
}

impl HostAddress {
    /// Address of the public `github.com` installation.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::InvalidUrl` if the built-in URLs fail to parse.
    pub fn github_com() -> Result<Self, RemoteError> {
        Self::parse("https://github.com")
    }

    /// Parses a host name (`ghe.example.com`) or web URL
    /// (`https://ghe.example.com:8443`).
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::InvalidUrl` when no host can be extracted.
    pub fn parse(input: &str) -> Result<Self, RemoteError> {
        let trimmed = input.trim();
        let with_scheme = if trimmed.contains("://") {
            trimmed.to_owned()
        } else {
            format!("https://{trimmed}")
        };
        let parsed =
            Url::parse(&with_scheme).map_err(|error| RemoteError::InvalidUrl(error.to_string()))?;
        let host = parsed
            .host_str()
            .ok_or_else(|| RemoteError::InvalidUrl("URL must include a host".to_owned()))?
            .to_ascii_lowercase();

        let mut web_url = Url::parse(&format!("{}://{host}", parsed.scheme()))
            .map_err(|error| RemoteError::InvalidUrl(error.to_string()))?;
        web_url
            .set_port(parsed.port())
            .map_err(|()| RemoteError::InvalidUrl("invalid port".to_owned()))?;

        let api_base = derive_api_base(&web_url, &host)?;
        Ok(Self { web_url, api_base })
    }

    /// Base URL for browsing (`https://github.com`).
    #[must_use]
    pub const fn web_url(&self) -> &Url {
        &self.web_url
    }

    /// Base URL for REST calls.
    #[must_use]
    pub const fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Host name without scheme or port.
    #[must_use]
    pub fn host(&self) -> &str {
        self.web_url.host_str().unwrap_or_default()
    }

    /// Returns true for the public `github.com` installation.
    #[must_use]
    pub fn is_github_com(&self) -> bool {
        self.host().eq_ignore_ascii_case("github.com")
    }
}

impl fmt::Display for HostAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.web_url.as_str().trim_end_matches('/'))
    }
}

fn derive_api_base(web_url: &Url, host: &str) -> Result<Url, RemoteError> {
    if host.eq_ignore_ascii_case("github.com") {
        return Url::parse("https://api.github.com")
            .map_err(|error| RemoteError::InvalidUrl(error.to_string()));
    }

    let mut api_url = web_url.clone();
    api_url.set_path("api/v3");
    Ok(api_url)
}

/// Fully qualified pull request identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PullRequestLocator {
    owner: RepositoryOwner,
    repository: RepositoryName,
    number: PullRequestNumber,
}

impl PullRequestLocator {
    /// Builds a locator from raw owner, repository, and number values.
    ///
    /// # Errors
    ///
    /// Returns `MissingPathSegments` for blank owner/repository and
    /// `InvalidPullRequestNumber` for zero.
    pub fn new(owner: &str, repository: &str, number: u64) -> Result<Self, RemoteError> {
        Ok(Self {
            owner: RepositoryOwner::new(owner)?,
            repository: RepositoryName::new(repository)?,
            number: PullRequestNumber::new(number)?,
        })
    }

    /// Repository owner.
    #[must_use]
    pub const fn owner(&self) -> &RepositoryOwner {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub const fn repository(&self) -> &RepositoryName {
        &self.repository
    }

    /// Pull request number.
    #[must_use]
    pub const fn number(&self) -> PullRequestNumber {
        self.number
    }

    /// Host-relative locator used for navigation: `owner/repo/pull/number`.
    #[must_use]
    pub fn navigation_path(&self) -> String {
        format!("{}/{}/pull/{}", self.owner, self.repository, self.number)
    }

    pub(crate) fn pull_request_path(&self) -> String {
        format!(
            "/repos/{}/{}/pulls/{}",
            self.owner, self.repository, self.number
        )
    }

    pub(crate) fn reviews_path(&self) -> String {
        format!("{}/reviews", self.pull_request_path())
    }

    pub(crate) fn review_events_path(&self, review_id: u64) -> String {
        format!("{}/reviews/{review_id}/events", self.pull_request_path())
    }

    pub(crate) fn review_comments_path(&self) -> String {
        format!("{}/comments", self.pull_request_path())
    }
}

impl fmt::Display for PullRequestLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repository, self.number)
    }
}
