//! Lookup agent - finds a person's social profile URL.
//!
//! The agent follows a single-tool "tools in a loop" pattern:
//! 1. Ask the LLM for the profile URL of a full name, advertising one search tool
//! 2. If the LLM requests a search, run it and feed the results back
//! 3. Repeat until the LLM commits to a final answer or max iterations is reached
//! 4. Validate the final answer as a URL on the target platform

mod lookup;
mod prompt;
mod validate;

pub use lookup::{AgentRun, LookupAgent, ToolInvocation};
pub use prompt::{build_lookup_prompt, build_system_prompt};
pub use validate::{extract_profile_url, twitter_username};

use serde::{Deserialize, Serialize};

/// Social network whose profile is being looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    LinkedIn,
    Twitter,
}

impl Platform {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::LinkedIn => "LinkedIn",
            Self::Twitter => "Twitter",
        }
    }

    /// Name of the search tool as advertised to the LLM.
    pub fn tool_name(&self) -> &'static str {
        match self {
            Self::LinkedIn => "crawl_google_for_linkedin_profile_page",
            Self::Twitter => "crawl_google_for_twitter_profile_page",
        }
    }

    pub fn tool_description(&self) -> &'static str {
        match self {
            Self::LinkedIn => {
                "useful for when you need get the LinkedIn profile page URL of a person"
            }
            Self::Twitter => {
                "useful for when you need get the Twitter profile page URL of a person"
            }
        }
    }

    /// Registrable domains a profile URL may live on.
    pub fn hosts(&self) -> &'static [&'static str] {
        match self {
            Self::LinkedIn => &["linkedin.com"],
            Self::Twitter => &["twitter.com", "x.com"],
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
