//! Terminal rendering for status and reports

use agent_stock::{
    AgentKind, AgentStatus, AnalysisStatusMap, ChipAnalysis, FundamentalAnalysis, NewsAnalysis,
    ResponseLanguage, SentimentAnalysis, StockAnalysisResult, TechnicalAnalysis,
};
use comfy_table::{Cell, Color, Table};
use std::fmt::Write;

pub fn status_icon(status: AgentStatus) -> &'static str {
    match status {
        AgentStatus::Pending => "·",
        AgentStatus::Working => "…",
        AgentStatus::Done => "✓",
        AgentStatus::Error => "✗",
    }
}

fn status_color(status: AgentStatus) -> Color {
    match status {
        AgentStatus::Pending => Color::DarkGrey,
        AgentStatus::Working => Color::Yellow,
        AgentStatus::Done => Color::Green,
        AgentStatus::Error => Color::Red,
    }
}

/// One-line progress summary, e.g. `✓ fundamental  … news  · manager`
pub fn status_line(status: &AnalysisStatusMap) -> String {
    status
        .iter()
        .map(|(kind, s)| format!("{} {kind}", status_icon(s)))
        .collect::<Vec<_>>()
        .join("  ")
}

pub fn status_table(status: &AnalysisStatusMap, lang: ResponseLanguage) -> Table {
    let mut table = Table::new();
    table.set_header(vec![lang.pick("代理人", "Agent"), lang.pick("狀態", "Status")]);

    for (kind, s) in status.iter() {
        table.add_row(vec![
            Cell::new(kind.label(lang)),
            Cell::new(format!("{} {s}", status_icon(s))).fg(status_color(s)),
        ]);
    }
    table
}

/// Full text report: manager verdict first, then each analyst, then sources
pub fn report(result: &StockAnalysisResult, lang: ResponseLanguage) -> String {
    let mut out = String::new();
    let manager = result.manager_report();

    let _ = writeln!(
        out,
        "== {} · {} ==",
        result.ticker(),
        AgentKind::Manager.label(lang)
    );
    let _ = writeln!(
        out,
        "{}: {}",
        lang.pick("分析時間", "Analyzed at"),
        result.analyzed_at().format("%Y-%m-%d %H:%M UTC")
    );
    let _ = writeln!(
        out,
        "{}: {} / 99 ({})",
        lang.pick("最終評分", "Final score"),
        manager.final_score,
        manager.band().label(lang)
    );
    let _ = writeln!(out, "{}\n", manager.summary);

    section(&mut out, AgentKind::Fundamental, result.fundamental(), lang, fundamental);
    section(&mut out, AgentKind::Sentiment, result.sentiment(), lang, sentiment);
    section(&mut out, AgentKind::News, result.news(), lang, news);
    section(&mut out, AgentKind::Technical, result.technical(), lang, technical);
    section(&mut out, AgentKind::Chip, result.chip(), lang, chip);

    if !result.sources().is_empty() {
        let _ = writeln!(out, "-- {} --", lang.pick("資料來源", "Sources"));
        for source in result.sources() {
            let _ = writeln!(out, "  {} <{}>", source.title, source.uri);
        }
    }

    out
}

fn section<T>(
    out: &mut String,
    kind: AgentKind,
    report: Option<&T>,
    lang: ResponseLanguage,
    body: fn(&mut String, &T, ResponseLanguage),
) {
    let _ = writeln!(out, "-- {} --", kind.label(lang));
    match report {
        Some(report) => body(out, report, lang),
        None => {
            let _ = writeln!(
                out,
                "  {}",
                lang.pick("分析失敗，無法取得報告。", "Analysis unavailable.")
            );
        }
    }
    out.push('\n');
}

fn field(out: &mut String, label: &str, value: &str) {
    let _ = writeln!(out, "  {label}: {value}");
}

fn list(out: &mut String, label: &str, items: &[String]) {
    let _ = writeln!(out, "  {label}:");
    for item in items {
        let _ = writeln!(out, "    - {item}");
    }
}

fn fundamental(out: &mut String, report: &FundamentalAnalysis, lang: ResponseLanguage) {
    field(out, lang.pick("財務健康", "Company health"), &report.company_health);
    list(out, lang.pick("關鍵指標", "Key metrics"), &report.key_metrics);
    list(out, lang.pick("潛在警訊", "Red flags"), &report.red_flags);
}

fn sentiment(out: &mut String, report: &SentimentAnalysis, lang: ResponseLanguage) {
    field(out, lang.pick("整體情緒", "Overall"), &report.overall_sentiment);
    list(out, lang.pick("關鍵主題", "Key themes"), &report.key_themes);

    let psy = &report.psy_analysis;
    match psy.displayable_value() {
        Some(value) => field(out, "PSY", &format!("{value} · {}", psy.interpretation)),
        None => field(out, "PSY", &psy.interpretation),
    }
    field(out, lang.pick("心理狀態", "Psychology"), &psy.summary);
}

fn news(out: &mut String, report: &NewsAnalysis, lang: ResponseLanguage) {
    list(out, lang.pick("近期頭條", "Recent headlines"), &report.recent_headlines);
    field(out, lang.pick("宏觀影響", "Macro impact"), &report.macro_impact);
}

fn technical(out: &mut String, report: &TechnicalAnalysis, lang: ResponseLanguage) {
    field(out, lang.pick("操作建議", "Recommendation"), &report.recommendation);
    field(out, lang.pick("關鍵訊號", "Key signal"), &report.key_signal);

    let closing = &report.closing_price_analysis;
    field(out, lang.pick("收盤價", "Close"), &closing.price_summary);
    field(out, lang.pick("成交量", "Volume"), &closing.volume_summary);
    field(out, lang.pick("量能訊號", "Volume signal"), &closing.volume_signal);

    field(out, lang.pick("均線", "Moving averages"), &report.moving_average_analysis);
    field(out, "RSI", &report.indicator_analysis.rsi);
    field(out, "KD", &report.indicator_analysis.kd);
}

fn chip(out: &mut String, report: &ChipAnalysis, lang: ResponseLanguage) {
    field(out, lang.pick("籌碼趨勢", "Trend"), &report.trend);
    field(out, lang.pick("大股東", "Major shareholders"), &report.major_shareholder_action);
    field(out, lang.pick("散戶", "Retail investors"), &report.retail_investor_action);
    field(out, lang.pick("股價影響", "Price impact"), &report.price_impact_prediction);
}
