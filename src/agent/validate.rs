//! Validation of the agent's final answer.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use super::Platform;
use crate::error::AgentError;

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>()\[\]"'`]+"#).expect("valid url regex"));

/// Pull a profile URL for `platform` out of the LLM's final answer.
///
/// The answer is expected to be a bare URL, but markdown links, angle
/// brackets and short lead-in sentences are tolerated: the first `http(s)`
/// URL whose host belongs to the platform wins.
pub fn extract_profile_url(answer: &str, platform: Platform) -> Result<String, AgentError> {
    let invalid = || AgentError::InvalidUrl {
        answer: answer.to_string(),
    };

    URL_PATTERN
        .find_iter(answer)
        .map(|m| m.as_str().trim_end_matches(['.', ',', ';', ':', '!', '?', '*']))
        .find_map(|candidate| {
            let url = Url::parse(candidate).ok()?;
            host_matches(&url, platform).then(|| url.to_string())
        })
        .ok_or_else(invalid)
}

fn host_matches(url: &Url, platform: Platform) -> bool {
    let Some(host) = url.host_str() else {
        return false;
    };
    let host = host.to_ascii_lowercase();
    platform
        .hosts()
        .iter()
        .any(|domain| host == *domain || host.ends_with(&format!(".{}", domain)))
}

/// Username from a Twitter/X profile URL (first path segment, `@` stripped).
pub fn twitter_username(profile_url: &str) -> Result<String, AgentError> {
    let invalid = || AgentError::InvalidUrl {
        answer: profile_url.to_string(),
    };

    let url = Url::parse(profile_url).map_err(|_| invalid())?;
    if !host_matches(&url, Platform::Twitter) {
        return Err(invalid());
    }

    url.path_segments()
        .and_then(|mut segments| segments.next())
        .map(|segment| segment.trim_start_matches('@'))
        .filter(|segment| !segment.is_empty() && !RESERVED_PATHS.contains(segment))
        .map(str::to_string)
        .ok_or_else(invalid)
}

/// First path segments that are Twitter pages rather than accounts.
const RESERVED_PATHS: [&str; 6] = ["home", "search", "i", "intent", "hashtag", "explore"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bare_url() {
        assert_eq!(
            extract_profile_url("https://www.linkedin.com/in/eden-marco/", Platform::LinkedIn)
                .expect("url"),
            "https://www.linkedin.com/in/eden-marco/"
        );
    }

    #[test]
    fn unwraps_markdown_and_prose() {
        let answer = "The profile is [Eden](https://il.linkedin.com/in/eden-marco).";
        assert_eq!(
            extract_profile_url(answer, Platform::LinkedIn).expect("url"),
            "https://il.linkedin.com/in/eden-marco"
        );
        assert_eq!(
            extract_profile_url("<https://x.com/elonmusk>", Platform::Twitter).expect("url"),
            "https://x.com/elonmusk"
        );
    }

    #[test]
    fn skips_urls_on_other_hosts() {
        let answer = "See https://en.wikipedia.org/wiki/Elon_Musk or https://twitter.com/elonmusk";
        assert_eq!(
            extract_profile_url(answer, Platform::Twitter).expect("url"),
            "https://twitter.com/elonmusk"
        );
    }

    #[test]
    fn rejects_non_urls_and_wrong_platforms() {
        for (answer, platform) in [
            ("I could not find a profile.", Platform::LinkedIn),
            ("linkedin.com/in/eden-marco", Platform::LinkedIn),
            ("https://twitter.com/elonmusk", Platform::LinkedIn),
            ("https://notlinkedin.com/in/eden", Platform::LinkedIn),
            ("ftp://linkedin.com/in/eden", Platform::LinkedIn),
        ] {
            assert!(
                matches!(
                    extract_profile_url(answer, platform),
                    Err(AgentError::InvalidUrl { .. })
                ),
                "{answer} should be rejected for {platform}"
            );
        }
    }

    #[test]
    fn extracts_twitter_username() {
        assert_eq!(
            twitter_username("https://twitter.com/EdenEmarco177").expect("username"),
            "EdenEmarco177"
        );
        assert_eq!(
            twitter_username("https://x.com/@elonmusk/").expect("username"),
            "elonmusk"
        );
        assert!(twitter_username("https://twitter.com/").is_err());
        assert!(twitter_username("https://twitter.com/search?q=elon").is_err());
        assert!(twitter_username("https://www.linkedin.com/in/eden-marco").is_err());
    }
}
