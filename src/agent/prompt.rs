//! Prompt templates for the lookup agent.

use super::Platform;

/// The user instruction asking for a single profile URL.
pub fn build_lookup_prompt(name: &str, platform: Platform) -> String {
    format!(
        "given the full name {name}, I want you to get me a link to their {platform} profile page. \
         Your answer should be a valid URL and only contain the URL to the {platform} profile.",
        name = name.trim(),
        platform = platform.display_name(),
    )
}

/// System prompt describing the single search tool.
pub fn build_system_prompt(platform: Platform) -> String {
    format!(
        r#"Answer the following request as best you can. You have access to the following tool:

- **{tool}**: {description}

Use the tool to search before answering; do not guess profile URLs. Each search returns results with their URLs. Search again with a refined query if the results do not contain a {platform} profile of this person.

When you know the answer, reply with the {platform} profile URL only: no explanation, no markdown, no surrounding text."#,
        tool = platform.tool_name(),
        description = platform.tool_description(),
        platform = platform.display_name(),
    )
}
