//! Technical analyst

use super::Analyst;
use crate::config::ResponseLanguage;
use crate::engine::AgentKind;
use agent_llm::schema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Latest close and volume versus the 5-day average
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosingPriceAnalysis {
    pub price_summary: String,
    pub volume_summary: String,
    pub volume_signal: String,
}

/// RSI and KD readings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorAnalysis {
    pub rsi: String,
    pub kd: String,
}

/// Price action, averages and indicators with a trade call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalAnalysis {
    pub recommendation: String,
    pub key_signal: String,
    pub closing_price_analysis: ClosingPriceAnalysis,
    pub moving_average_analysis: String,
    pub indicator_analysis: IndicatorAnalysis,
}

/// Reads price, volume, moving averages, RSI and KD
pub struct TechnicalAnalyst;

impl Analyst for TechnicalAnalyst {
    const KIND: AgentKind = AgentKind::Technical;
    type Report = TechnicalAnalysis;

    fn schema(lang: ResponseLanguage) -> Value {
        let closing = schema::described_object(
            lang.pick(
                "分析前一個交易日的收盤價與成交量，特別是成交量與5日均量的對比。",
                "Previous session's close and volume, especially volume against the 5-day average.",
            ),
            json!({
                "priceSummary": schema::string(lang.pick(
                    "描述收盤價的變動情況（例如：上漲/下跌點數、百分比）。",
                    "How the close moved (e.g. points and percent up or down).",
                )),
                "volumeSummary": schema::string(lang.pick(
                    "描述成交量的變動，並與5日均量比較（例如：顯著放大，為5日均量的150%）。",
                    "How volume changed against the 5-day average (e.g. sharply higher, 150% of average).",
                )),
                "volumeSignal": schema::string(lang.pick(
                    "基於成交量變動（對比5日均量超過130%或低於70%）提取的明確訊號，若無則為\"無明顯訊號\"。",
                    "Signal from volume above 130% or below 70% of the 5-day average, or \"No clear signal\".",
                )),
            }),
            vec!["priceSummary", "volumeSummary", "volumeSignal"],
        );

        let indicators = schema::object(
            json!({
                "rsi": schema::string(lang.pick(
                    "RSI指標的數值與解讀（例如：75 - 處於超買區）。",
                    "RSI value and reading (e.g. 75 - overbought).",
                )),
                "kd": schema::string(lang.pick(
                    "KD指標的狀態與解讀（例如：K值85, D值80, 高檔鈍化）。",
                    "KD state and reading (e.g. K 85, D 80, stalling at highs).",
                )),
            }),
            vec!["rsi", "kd"],
        );

        schema::object(
            json!({
                "recommendation": schema::string(lang.pick(
                    "基於以下分析，提供明確的買進、賣出或觀望建議。",
                    "A clear Buy, Sell or Hold call based on the analysis below.",
                )),
                "keySignal": schema::string(lang.pick(
                    "從分析中提取的最關鍵的單一技術訊號（例如：突破5日均線、KD黃金交叉、RSI超買）。",
                    "The single most important technical signal (e.g. break above the 5-day MA, KD golden cross, RSI overbought).",
                )),
                "closingPriceAnalysis": closing,
                "movingAverageAnalysis": schema::string(lang.pick(
                    "分析目前股價相對於5日均線的位置，以及其他重要均線（如20日、60日）的關係。",
                    "Price relative to the 5-day MA and other key averages (such as the 20- and 60-day).",
                )),
                "indicatorAnalysis": indicators,
            }),
            vec![
                "recommendation",
                "keySignal",
                "closingPriceAnalysis",
                "movingAverageAnalysis",
                "indicatorAnalysis",
            ],
        )
    }
}
