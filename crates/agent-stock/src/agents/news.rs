//! News analyst

use super::Analyst;
use crate::config::ResponseLanguage;
use crate::engine::AgentKind;
use agent_llm::schema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Recent headlines and their macro backdrop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsAnalysis {
    pub recent_headlines: Vec<String>,
    pub macro_impact: String,
}

/// Reads financial news and macro indicators
pub struct NewsAnalyst;

impl Analyst for NewsAnalyst {
    const KIND: AgentKind = AgentKind::News;
    type Report = NewsAnalysis;

    fn schema(lang: ResponseLanguage) -> Value {
        schema::object(
            json!({
                "recentHeadlines": schema::array(
                    lang.pick(
                        "總結2-3則近期最有影響力的新聞頭條。",
                        "Summarize the 2-3 most influential recent headlines.",
                    ),
                    json!({ "type": "STRING" }),
                ),
                "macroImpact": schema::string(lang.pick(
                    "分析宏觀經濟因素（如利率、通膨）對該股票的影響。",
                    "Analyze how macroeconomic factors (such as rates and inflation) affect the stock.",
                )),
            }),
            vec!["recentHeadlines", "macroImpact"],
        )
    }
}
