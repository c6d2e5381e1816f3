use crate::error::LockError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A parsed Conan recipe reference: `name/version[@user/channel][#revision]`.
///
/// `user` and `channel` are either both present or both absent. The revision
/// is kept verbatim, including any `%timestamp` suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Reference {
    pub name: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
}

impl Reference {
    pub fn parse(input: &str) -> Result<Self, LockError> {
        if input.is_empty() {
            return Err(LockError::malformed(input, "reference is empty"));
        }

        let (body, revision) = match input.split_once('#') {
            Some((_, "")) => return Err(LockError::malformed(input, "empty revision after '#'")),
            Some((_, rev)) if rev.contains('#') => {
                return Err(LockError::malformed(input, "more than one '#'"))
            }
            Some((_, rev)) if rev.contains(['@', '/']) => {
                return Err(LockError::malformed(input, "unexpected separator in revision"))
            }
            Some((body, rev)) => (body, Some(rev.to_owned())),
            None => (input, None),
        };

        let (name_version, user_channel) = match body.split_once('@') {
            Some((nv, uc)) => (nv, Some(uc)),
            None => (body, None),
        };

        let Some((name, version)) = name_version.split_once('/') else {
            return Err(LockError::malformed(input, "expected 'name/version'"));
        };
        if name.is_empty() {
            return Err(LockError::malformed(input, "missing package name"));
        }
        if version.is_empty() {
            return Err(LockError::malformed(input, "missing package version"));
        }
        if version.contains('/') {
            return Err(LockError::malformed(input, "unexpected '/' in version"));
        }

        let (user, channel) = match user_channel {
            None => (None, None),
            Some(uc) => {
                let Some((user, channel)) = uc.split_once('/') else {
                    return Err(LockError::malformed(input, "'@' must be followed by 'user/channel'"));
                };
                if user.is_empty() || channel.is_empty() {
                    return Err(LockError::malformed(input, "user and channel must both be set"));
                }
                if channel.contains('/') || uc.contains('@') {
                    return Err(LockError::malformed(input, "unexpected separator in user/channel"));
                }
                (Some(user.to_owned()), Some(channel.to_owned()))
            }
        };

        Ok(Reference {
            name: name.to_owned(),
            version: version.to_owned(),
            user,
            channel,
            revision,
        })
    }

    /// Package URL for this reference; the revision is not part of it.
    pub fn purl(&self) -> String {
        crate::purl::package_url(
            &self.name,
            &self.version,
            self.user.as_deref(),
            self.channel.as_deref(),
        )
    }
}

impl FromStr for Reference {
    type Err = LockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Reference::parse(s)
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.version)?;
        if let (Some(user), Some(channel)) = (&self.user, &self.channel) {
            write!(f, "@{user}/{channel}")?;
        }
        if let Some(revision) = &self.revision {
            write!(f, "#{revision}")?;
        }
        Ok(())
    }
}
