//! Chip (shareholding distribution) analyst

use super::Analyst;
use crate::config::ResponseLanguage;
use crate::engine::AgentKind;
use agent_llm::schema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Shift in holdings between major shareholders and retail investors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChipAnalysis {
    pub trend: String,
    pub major_shareholder_action: String,
    pub retail_investor_action: String,
    pub price_impact_prediction: String,
}

/// Reads the shareholding dispersion table
pub struct ChipAnalyst;

impl Analyst for ChipAnalyst {
    const KIND: AgentKind = AgentKind::Chip;
    type Report = ChipAnalysis;

    fn schema(lang: ResponseLanguage) -> Value {
        schema::object(
            json!({
                "trend": schema::string(lang.pick(
                    "總結籌碼分佈的整體趨勢（例如：籌碼趨於集中、籌碼趨於分散、無明顯變化）。",
                    "Overall trend of the shareholding distribution (e.g. concentrating, dispersing, no clear change).",
                )),
                "majorShareholderAction": schema::string(lang.pick(
                    "描述千張以上大股東的持股比例變化趨勢。",
                    "How the holding ratio of major shareholders (over 1,000 lots) is changing.",
                )),
                "retailInvestorAction": schema::string(lang.pick(
                    "描述散戶（例如十張以下）的持股比例變化趨勢。",
                    "How the holding ratio of retail investors (e.g. under 10 lots) is changing.",
                )),
                "priceImpactPrediction": schema::string(lang.pick(
                    "基於籌碼變化，預測對未來股價的潛在影響。",
                    "Predicted impact of the shareholding shift on the future share price.",
                )),
            }),
            vec![
                "trend",
                "majorShareholderAction",
                "retailInvestorAction",
                "priceImpactPrediction",
            ],
        )
    }
}
