//! Package URLs for Conan packages (`pkg:conan/...`).

use std::fmt::Write;

pub const PURL_TYPE: &str = "conan";

/// Build the package URL for a Conan recipe.
///
/// `user` becomes the purl namespace and `channel` the `channel` qualifier.
/// Empty strings are treated like `None`, so a lone user or lone channel still
/// yields a well-formed URL.
pub fn package_url(
    name: &str,
    version: &str,
    user: Option<&str>,
    channel: Option<&str>,
) -> String {
    let mut purl = format!("pkg:{PURL_TYPE}/");
    if let Some(user) = user.filter(|u| !u.is_empty()) {
        purl.push_str(&encode_component(user));
        purl.push('/');
    }
    purl.push_str(&encode_component(name));
    if !version.is_empty() {
        purl.push('@');
        purl.push_str(&encode_component(version));
    }
    if let Some(channel) = channel.filter(|c| !c.is_empty()) {
        purl.push_str("?channel=");
        purl.push_str(&encode_component(channel));
    }
    purl
}

/// Percent-encode everything outside the RFC 3986 unreserved set.
fn encode_component(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~') {
            out.push(char::from(byte));
        } else {
            let _ = write!(out, "%{byte:02X}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_and_version_only() {
        assert_eq!(
            package_url("zlib", "1.2.12", None, None),
            "pkg:conan/zlib@1.2.12"
        );
    }

    #[test]
    fn user_and_channel() {
        assert_eq!(
            package_url("mfast", "1.2.2", Some("my_user"), Some("my_channel")),
            "pkg:conan/my_user/mfast@1.2.2?channel=my_channel"
        );
    }

    #[test]
    fn lone_user_or_channel() {
        assert_eq!(
            package_url("poco", "1.9.4", Some("lasote"), None),
            "pkg:conan/lasote/poco@1.9.4"
        );
        assert_eq!(
            package_url("poco", "1.9.4", None, Some("stable")),
            "pkg:conan/poco@1.9.4?channel=stable"
        );
        assert_eq!(
            package_url("poco", "1.9.4", Some(""), Some("")),
            "pkg:conan/poco@1.9.4"
        );
    }

    #[test]
    fn reserved_characters_are_encoded() {
        assert_eq!(
            package_url("my lib", "1.0+build@x", Some("a/b"), Some("c?d#e")),
            "pkg:conan/a%2Fb/my%20lib@1.0%2Bbuild%40x?channel=c%3Fd%23e"
        );
    }

    #[test]
    fn percent_sign_is_encoded() {
        assert_eq!(
            package_url("pct", "100%", None, None),
            "pkg:conan/pct@100%25"
        );
    }

    #[test]
    fn non_ascii_is_utf8_encoded() {
        assert_eq!(package_url("caf\u{e9}", "1", None, None), "pkg:conan/caf%C3%A9@1");
    }
}
