//! Fundamental analyst

use super::Analyst;
use crate::config::ResponseLanguage;
use crate::engine::AgentKind;
use agent_llm::schema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Financial health assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundamentalAnalysis {
    pub company_health: String,
    pub key_metrics: Vec<String>,
    pub red_flags: Vec<String>,
}

/// Assesses financial health from fundamentals
pub struct FundamentalAnalyst;

impl Analyst for FundamentalAnalyst {
    const KIND: AgentKind = AgentKind::Fundamental;
    type Report = FundamentalAnalysis;

    fn schema(lang: ResponseLanguage) -> Value {
        schema::object(
            json!({
                "companyHealth": schema::string(lang.pick(
                    "基於公司基本面數據，對其財務健康的總體摘要。",
                    "Overall summary of the company's financial health based on its fundamentals.",
                )),
                "keyMetrics": schema::array(
                    lang.pick(
                        "列出3-5個關鍵財務指標（例如，本益比、每股盈餘、營收增長、負債權益比）。",
                        "List 3-5 key financial metrics (e.g. P/E, EPS, revenue growth, debt-to-equity).",
                    ),
                    json!({ "type": "STRING" }),
                ),
                "redFlags": schema::array(
                    lang.pick(
                        "列出潛在的財務警訊或疑慮。",
                        "List potential financial red flags or concerns.",
                    ),
                    json!({ "type": "STRING" }),
                ),
            }),
            vec!["companyHealth", "keyMetrics", "redFlags"],
        )
    }
}
