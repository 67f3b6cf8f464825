pub fn build_search_prompt(startup_name: &str) -> String {
    format!(
        r#"Please search the web for information about the startup "{name}" and provide:

1. A short paragraph (2-3 sentences) describing what they do
2. Whether they are currently hiring (yes/no/unknown)
3. Contact information (email, website, social media, etc.)

Please format your response as a JSON object with the following structure:
{{
    "startup_name": "{name}",
    "description": "Brief description of what they do",
    "keywords": ["keyword1", "keyword2", ...],
    "hiring_status": "yes/no/unknown",
    "contact_info": {{
        "website": "URL if found",
        "email": "email if found",
        "linkedin": "LinkedIn URL if found",
        "twitter": "Twitter/X handle if found",
        "other": "Any other contact methods"
    }}
}}

If you cannot find certain information, use "Not found" as the value."#,
        name = startup_name
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_name_and_schema() {
        let prompt = build_search_prompt("Scale AI");

        assert!(prompt.contains(r#"the startup "Scale AI""#));
        assert!(prompt.contains(r#""startup_name": "Scale AI""#));
        assert!(prompt.contains(r#""hiring_status": "yes/no/unknown""#));
        assert!(prompt.contains("\"linkedin\""));
        assert!(prompt.contains(r#"use "Not found" as the value"#));
    }
}
