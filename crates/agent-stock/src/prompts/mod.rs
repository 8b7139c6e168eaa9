//! Stock analysis prompt templates
//!
//! This module contains all prompts used by the analysts and the manager.
//! Templates are organized into:
//! - `system`: system instructions for each agent
//! - `user`: request templates rendered with MiniJinja
//!
//! Every prompt exists in Traditional Chinese and English; the language is
//! chosen by [`ResponseLanguage`].

mod system;
mod user;

pub use system::system_prompt;

use crate::config::ResponseLanguage;
use crate::engine::AgentKind;
use minijinja::{Environment, ErrorKind};
use serde::Serialize;
use serde_json::{Map, Value};

/// Stands in for a report the manager did not receive
pub fn no_data_marker(lang: ResponseLanguage) -> &'static str {
    lang.pick("無資料。", "No data.")
}

/// Manager summary used when no synthesis could be produced
pub fn fallback_summary(lang: ResponseLanguage) -> &'static str {
    lang.pick(
        "因分析師報告出錯，無法產生經理總結。",
        "The manager summary could not be produced because the analyst reports failed.",
    )
}

fn render<S: Serialize>(template: &str, vars: S) -> Result<String, minijinja::Error> {
    let env = Environment::new();
    env.render_str(template, vars)
}

/// Request text for one analyst
pub fn analyst_prompt(
    kind: AgentKind,
    ticker: &str,
    lang: ResponseLanguage,
) -> Result<String, minijinja::Error> {
    let template = user::analyst_template(kind, lang).ok_or_else(|| {
        minijinja::Error::new(
            ErrorKind::TemplateNotFound,
            format!("no analyst prompt for {kind}"),
        )
    })?;
    render(template, minijinja::context! { ticker })
}

/// Append the expected output shape to a search-grounded prompt
pub fn search_prompt(
    prompt: &str,
    schema: &Value,
    lang: ResponseLanguage,
) -> Result<String, minijinja::Error> {
    let schema = serde_json::to_string_pretty(schema)
        .map_err(|e| minijinja::Error::new(ErrorKind::BadSerialization, e.to_string()))?;
    render(
        user::search_suffix_template(lang),
        minijinja::context! { prompt, schema },
    )
}

/// Manager request over the analyst reports
///
/// `reports` pairs each analyst with its pretty-printed report, or `None`
/// when that analyst failed.
pub fn manager_prompt(
    ticker: &str,
    reports: &[(AgentKind, Option<String>)],
    lang: ResponseLanguage,
) -> Result<String, minijinja::Error> {
    let no_data = no_data_marker(lang);

    let mut vars = Map::new();
    for kind in AgentKind::ANALYSTS {
        vars.insert(kind.as_str().to_string(), Value::String(no_data.to_string()));
    }
    for (kind, report) in reports {
        if let Some(report) = report {
            vars.insert(kind.as_str().to_string(), Value::String(report.clone()));
        }
    }
    vars.insert("ticker".to_string(), Value::String(ticker.to_string()));
    vars.insert("no_data".to_string(), Value::String(no_data.to_string()));

    render(user::manager_template(lang), Value::Object(vars))
}
