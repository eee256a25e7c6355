//! Prompt construction for the four orchestration operations.
//!
//! Builders are pure: they take the request data (and the current date for
//! news) and return the system/user prompt pair sent to the model.

use chrono::NaiveDate;

use crate::models::{Article, NewsQuery, SocialContentRequest};

/// Articles used for a series; extra ones are ignored
pub const SERIES_MAX_ARTICLES: usize = 5;
/// Articles used for an analysis; extra ones are ignored
pub const ANALYSIS_MAX_ARTICLES: usize = 10;
/// A series needs at least this many articles
pub const SERIES_MIN_ARTICLES: usize = 2;

/// System + user prompt pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

/// Character limit and style guidance for one social platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformConfig {
    pub name: &'static str,
    pub char_limit: usize,
    pub style: &'static str,
}

pub const PLATFORMS: [PlatformConfig; 5] = [
    PlatformConfig { name: "twitter", char_limit: 280, style: "concise and engaging" },
    PlatformConfig { name: "linkedin", char_limit: 700, style: "professional and insightful" },
    PlatformConfig { name: "instagram", char_limit: 500, style: "visual and catchy" },
    PlatformConfig { name: "facebook", char_limit: 400, style: "conversational" },
    PlatformConfig { name: "tiktok", char_limit: 300, style: "trendy and casual" },
];

/// Look up a platform; unknown names get the twitter entry.
pub fn platform_config(platform: &str) -> PlatformConfig {
    PLATFORMS
        .iter()
        .find(|p| p.name == platform)
        .copied()
        .unwrap_or(PLATFORMS[0])
}

pub fn platform_names() -> Vec<&'static str> {
    PLATFORMS.iter().map(|p| p.name).collect()
}

pub fn news_prompts(query: &NewsQuery, today: NaiveDate) -> PromptPair {
    let today = today.format("%Y-%m-%d");
    let system = format!(
        r#"You are a global news summarizer.
Return ONLY valid JSON (no markdown, no commentary).
JSON must be an array of exactly {limit} objects with keys:
- title
- description
- source
- published_at  (must be {today} or within the last 2 days; use ISO-like YYYY-MM-DD)
- url
Constraints:
- Focus on the requested country and category.
- Return exactly the requested number of items.
- Be realistic and timely, but you may invent plausible headlines if needed.
- Do NOT include anything older than 2 days.
"#,
        limit = query.limit,
        today = today,
    );

    let user = format!(
        "Country: {}\nCategory: {}\nNumber of items: {}",
        query.country, query.category, query.limit
    );

    PromptPair { system, user }
}

pub fn social_prompts(request: &SocialContentRequest) -> PromptPair {
    let config = platform_config(&request.platform);
    let angle = request
        .custom_angle
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .unwrap_or("Standard news sharing");

    let system = format!(
        r#"You are a social media strategist. Create an engaging {platform} post.

Requirements:
- Character limit: {limit}
- Tone: {tone}
- Style: {style}
- Include hashtags: {hashtags}
- Include link: {link}
- Custom angle: {angle}
Return plain text only (no JSON).
"#,
        platform = request.platform,
        limit = config.char_limit,
        tone = request.tone,
        style = config.style,
        hashtags = yes_no(request.include_hashtags),
        link = yes_no(request.include_link),
        angle = angle,
    );

    let article = &request.article;
    let url = if request.include_link { article.url.as_str() } else { "" };
    let user = format!(
        "Title: {}\nDescription: {}\nURL: {}",
        article.title, article.description, url
    );

    PromptPair { system, user }
}

pub fn series_prompts(articles: &[Article], platform: &str, theme: &str, tone: &str) -> PromptPair {
    let system = format!(
        r#"You are a strategist. Create a {platform} series with theme '{theme}'.
- Tone: {tone}
- Provide an intro + one post per article
- If the platform supports threads, number them like (1/n), (2/n)...
Return plain text only.
"#
    );

    let user = articles
        .iter()
        .take(SERIES_MAX_ARTICLES)
        .map(|a| format!("- {} — {}", a.title, a.description))
        .collect::<Vec<_>>()
        .join("\n");

    PromptPair { system, user }
}

pub fn analysis_prompts(articles: &[Article]) -> PromptPair {
    let system = r#"You are a strategist. Analyze these articles and provide:
1) Sentiment breakdown (positive/negative/neutral %) and brief justification
2) Key themes and takeaways
3) Content strategy recommendations
4) Best posting times by platform (based on general best practices)
5) Potential viral angles or hooks
Return structured text (no JSON).
"#
    .to_string();

    let user = articles
        .iter()
        .take(ANALYSIS_MAX_ARTICLES)
        .map(|a| format!("{}: {}", a.title, a.description))
        .collect::<Vec<_>>()
        .join("\n");

    PromptPair { system, user }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(n: usize) -> Article {
        Article {
            title: format!("Title {}", n),
            description: format!("Description {}", n),
            source: "Wire".to_string(),
            published_at: "2026-10-15".to_string(),
            url: format!("https://news.example/{}", n),
        }
    }

    fn articles(count: usize) -> Vec<Article> {
        (1..=count).map(article).collect()
    }

    #[test]
    fn unknown_platform_uses_twitter() {
        let cfg = platform_config("myspace");
        assert_eq!(cfg.char_limit, 280);
        assert_eq!(cfg.style, "concise and engaging");
        assert_eq!(platform_config("linkedin").char_limit, 700);
    }

    #[test]
    fn news_prompt_embeds_date_and_limit() {
        let query = NewsQuery {
            category: "technology".to_string(),
            country: "in".to_string(),
            limit: 3,
        };
        let today = NaiveDate::from_ymd_opt(2026, 10, 15).unwrap();

        let prompts = news_prompts(&query, today);

        assert!(prompts.system.contains("2026-10-15"));
        assert!(prompts.system.contains("exactly 3 objects"));
        assert_eq!(prompts.user, "Country: in\nCategory: technology\nNumber of items: 3");
    }

    #[test]
    fn social_prompt_without_link_omits_url() {
        let mut request = SocialContentRequest::new(article(1), "linkedin", "professional");
        request.include_link = false;

        let prompts = social_prompts(&request);

        assert!(!prompts.user.contains("https://news.example/1"));
        assert!(prompts.user.ends_with("URL: "));
        assert!(prompts.system.contains("Include link: no"));
        assert!(prompts.system.contains("Character limit: 700"));
        assert!(prompts.system.contains("Custom angle: Standard news sharing"));
    }

    #[test]
    fn social_prompt_with_link_and_angle() {
        let mut request = SocialContentRequest::new(article(2), "unknown", "humorous");
        request.custom_angle = Some("Focus on startups".to_string());

        let prompts = social_prompts(&request);

        assert!(prompts.user.contains("URL: https://news.example/2"));
        assert!(prompts.system.contains("engaging unknown post"));
        assert!(prompts.system.contains("Character limit: 280"));
        assert!(prompts.system.contains("Custom angle: Focus on startups"));
        assert!(prompts.system.contains("Tone: humorous"));
    }

    #[test]
    fn series_prompt_truncates_to_five() {
        let five = series_prompts(&articles(5), "twitter", "Daily Update", "informative");
        let eight = series_prompts(&articles(8), "twitter", "Daily Update", "informative");

        assert_eq!(five, eight);
        assert_eq!(five.user.lines().count(), 5);
        assert_eq!(five.user.lines().next(), Some("- Title 1 — Description 1"));
        assert!(five.system.contains("theme 'Daily Update'"));
    }

    #[test]
    fn analysis_prompt_truncates_to_ten() {
        let ten = analysis_prompts(&articles(10));
        let twelve = analysis_prompts(&articles(12));

        assert_eq!(ten, twelve);
        assert_eq!(ten.user.lines().count(), 10);
        assert_eq!(ten.user.lines().last(), Some("Title 10: Description 10"));
        assert!(ten.system.contains("Sentiment breakdown"));
    }
}
