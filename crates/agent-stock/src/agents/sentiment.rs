//! Market sentiment analyst

use super::Analyst;
use crate::config::ResponseLanguage;
use crate::engine::AgentKind;
use agent_llm::schema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Markers the model uses when it could not obtain a PSY value
const PSY_UNAVAILABLE: [&str; 2] = ["N/A", "無法取得"];

/// PSY psychological line reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PsyAnalysis {
    pub value: String,
    pub interpretation: String,
    pub summary: String,
}

impl PsyAnalysis {
    /// The value, unless it is empty or flagged as unavailable
    pub fn displayable_value(&self) -> Option<&str> {
        let value = self.value.trim();
        if value.is_empty() || PSY_UNAVAILABLE.iter().any(|m| value.contains(m)) {
            None
        } else {
            Some(value)
        }
    }
}

/// Crowd mood around the stock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentAnalysis {
    pub overall_sentiment: String,
    pub key_themes: Vec<String>,
    pub psy_analysis: PsyAnalysis,
}

/// Gauges social media and forum sentiment, plus the PSY indicator
pub struct SentimentAnalyst;

impl Analyst for SentimentAnalyst {
    const KIND: AgentKind = AgentKind::Sentiment;
    type Report = SentimentAnalysis;

    fn schema(lang: ResponseLanguage) -> Value {
        schema::object(
            json!({
                "overallSentiment": schema::string(lang.pick(
                    "整體市場情緒（例如，非常看漲、看漲、中性、看跌、非常看跌）。",
                    "Overall market sentiment (e.g. very bullish, bullish, neutral, bearish, very bearish).",
                )),
                "keyThemes": schema::array(
                    lang.pick(
                        "列出2-4個在社群媒體和新聞評論中推動市場情緒的關鍵主題。",
                        "List 2-4 key themes driving sentiment on social media and in news comments.",
                    ),
                    json!({ "type": "STRING" }),
                ),
                "psyAnalysis": schema::described_object(
                    lang.pick(
                        "對PSY心理線指標的分析。如果找不到確切PSY數值，請基於過去12天上漲天數進行原理分析。",
                        "Analysis of the PSY psychological line. If no exact value is available, reason from the number of up days over the past 12 days.",
                    ),
                    json!({
                        "value": schema::string(lang.pick(
                            "目前的PSY指標數值，或基於上漲天數的估算，若無法取得請註明。",
                            "Current PSY value or an estimate from up days; say so if it cannot be obtained.",
                        )),
                        "interpretation": schema::string(lang.pick(
                            "PSY數值的市場意涵（例如：處於超買區、超賣區、或中性區）。",
                            "What the PSY value means for the market (e.g. overbought, oversold or neutral zone).",
                        )),
                        "summary": schema::string(lang.pick(
                            "總結PSY指標所反映的投資人心理狀態。",
                            "Summary of the investor psychology the PSY indicator reflects.",
                        )),
                    }),
                    vec!["value", "interpretation", "summary"],
                ),
            }),
            vec!["overallSentiment", "keyThemes", "psyAnalysis"],
        )
    }
}
