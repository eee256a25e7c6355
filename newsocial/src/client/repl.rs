//! Line commands of the terminal client and how results are rendered.

use crate::models::Article;

use super::session::SessionSettings;

pub const HELP: &str = "\
Commands:
  fetch                 fetch fresh headlines for the current category/country
  list                  show the fetched articles
  select <n>            select article n for post generation
  post                  generate a post for the selected article
  series                generate a series from the first 3 articles
  analyze               analyze all fetched articles
  set <key> <value>     change platform, tone, category or country
  settings              show the current settings
  health                check that the service is up
  help                  show this help
  quit                  leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Setting {
    Platform,
    Tone,
    Category,
    Country,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Fetch,
    List,
    /// Zero-based index
    Select(usize),
    Post,
    Series,
    Analyze,
    Set(Setting, String),
    Settings,
    Health,
    Help,
    Quit,
    Empty,
}

/// Parse one input line. Errors are user-facing messages.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        return Ok(Command::Empty);
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "fetch" => Command::Fetch,
        "list" | "ls" => Command::List,
        "select" => {
            let raw = parts.next().ok_or("usage: select <n>")?;
            match raw.parse::<usize>() {
                Ok(n) if n >= 1 => Command::Select(n - 1),
                _ => return Err(format!("'{}' is not an article number", raw)),
            }
        }
        "post" => Command::Post,
        "series" => Command::Series,
        "analyze" | "analyse" => Command::Analyze,
        "set" => {
            let key = parts.next().ok_or("usage: set <key> <value>")?;
            let setting = match key.to_ascii_lowercase().as_str() {
                "platform" => Setting::Platform,
                "tone" => Setting::Tone,
                "category" => Setting::Category,
                "country" => Setting::Country,
                other => return Err(format!("unknown setting '{}'", other)),
            };
            let value = parts.collect::<Vec<_>>().join(" ");
            if value.is_empty() {
                return Err("usage: set <key> <value>".to_string());
            }
            // Platforms are looked up by lowercase name; other values are sent as typed
            let value = match setting {
                Setting::Platform => value.to_ascii_lowercase(),
                _ => value,
            };
            Command::Set(setting, value)
        }
        "settings" => Command::Settings,
        "health" => Command::Health,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("unknown command '{}', try 'help'", other)),
    };

    Ok(command)
}

pub fn apply_setting(settings: &mut SessionSettings, setting: &Setting, value: String) {
    match setting {
        Setting::Platform => settings.platform = value,
        Setting::Tone => settings.tone = value,
        Setting::Category => settings.category = value,
        Setting::Country => settings.country = value,
    }
}

pub fn render_settings(settings: &SessionSettings) -> String {
    format!(
        "category: {} | country: {} | platform: {} | tone: {}",
        settings.category, settings.country, settings.platform, settings.tone
    )
}

pub fn render_article(index: usize, article: &Article) -> String {
    let source = if article.source.is_empty() { "Unknown" } else { &article.source };
    let mut out = format!(
        "[{}] {}\n    {} — {}\n    {}",
        index + 1,
        article.title,
        source,
        article.published_at,
        article.description
    );
    if !article.url.is_empty() {
        out.push_str("\n    ");
        out.push_str(&article.url);
    }
    out
}
