//! Fixed single-turn prompt templates.

/// Two-paragraph professional summary of `content`.
pub fn summary_prompt(content: &str) -> String {
    format!(
        r#"Create a professional 2-paragraph news summary from the following article content.
Follow these guidelines:
1. Omit any introductory phrases like "Here is a summary"
2. First paragraph: Core innovation/event and key facts
3. Second paragraph: Key entities and business implications
4. Include specific numbers and metrics when available
5. Maintain journalistic tone

Example structure:
[Company] has [achievement] using [technology]. The development [specific impact]...
Key players include [names] from [organizations]. This could [business implication]...

Article Content:
{content}

Professional Summary:"#
    )
}

/// One-word sentiment classification of `summary`.
pub fn sentiment_prompt(summary: &str) -> String {
    format!(
        r#"Classify the sentiment of the following news summary as POSITIVE, NEGATIVE, or NEUTRAL.
Consider these guidelines:
1. POSITIVE: Describes growth, success, breakthroughs, or favorable outcomes
2. NEGATIVE: Describes failures, controversies, losses, or unfavorable outcomes
3. NEUTRAL: Balanced reporting, announcements without clear positive/negative slant

Respond ONLY with one word: POSITIVE, NEGATIVE, or NEUTRAL.

News Summary:
{summary}

Sentiment:"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_prompt_embeds_content_before_answer_cue() {
        let p = summary_prompt("Acme raised $10M.");
        let body = p.find("Acme raised $10M.").unwrap();
        assert!(body < p.find("Professional Summary:").unwrap());
        assert!(p.contains("Omit any introductory phrases"));
    }

    #[test]
    fn sentiment_prompt_lists_all_labels() {
        let p = sentiment_prompt("Acme grew.");
        assert!(p.contains("POSITIVE, NEGATIVE, or NEUTRAL"));
        assert!(p.trim_end().ends_with("Sentiment:"));
    }
}
