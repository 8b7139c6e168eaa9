//! User message templates

use crate::config::ResponseLanguage;
use crate::engine::AgentKind;

/// Analyst request, rendered with `ticker`
pub(super) fn analyst_template(kind: AgentKind, lang: ResponseLanguage) -> Option<&'static str> {
    let template = match kind {
        AgentKind::Fundamental => lang.pick(
            "分析股票代碼為 {{ ticker }} 的基本面。",
            "Analyze the fundamentals of the stock with ticker {{ ticker }}.",
        ),
        AgentKind::Sentiment => lang.pick(
            "分析股票代碼為 {{ ticker }} 的市場情緒，並包含PSY心理線分析。",
            "Analyze market sentiment for the stock with ticker {{ ticker }}, including a PSY psychological line analysis.",
        ),
        AgentKind::News => lang.pick(
            "分析股票代碼為 {{ ticker }} 的最新新聞及宏觀經濟影響。",
            "Analyze the latest news and macroeconomic impact for the stock with ticker {{ ticker }}.",
        ),
        AgentKind::Technical => lang.pick(
            "為股票代碼為 {{ ticker }} 提供技術分析。",
            "Provide a technical analysis for the stock with ticker {{ ticker }}.",
        ),
        AgentKind::Chip => lang.pick(
            "分析股票代碼為 {{ ticker }} 的籌碼分佈與趨勢。",
            "Analyze the shareholding distribution and its trend for the stock with ticker {{ ticker }}.",
        ),
        AgentKind::Manager => return None,
    };
    Some(template)
}

/// Appended to every search-grounded prompt; `schema` is pretty JSON
pub(super) fn search_suffix_template(lang: ResponseLanguage) -> &'static str {
    lang.pick(
        "{{ prompt }}

請以 JSON 格式回覆，並嚴格遵守以下 schema。請不要在 JSON 內容以外添加任何其他文字或 markdown 標記。
```json
{{ schema }}
```",
        "{{ prompt }}

Reply in JSON and strictly follow the schema below. Do not add any other text or markdown outside the JSON content.
```json
{{ schema }}
```",
    )
}

/// Manager synthesis request
///
/// Each report variable is either pretty JSON or the no-data marker.
pub(super) fn manager_template(lang: ResponseLanguage) -> &'static str {
    lang.pick(
        "作為一位頂尖的量化投資組合經理，你的任務是綜合分析師團隊的報告，並產出一個包含質化總結和量化評分的最終決策。

請嚴格遵循以下步驟：
1. **評分**: 仔細閱讀每一份分析師報告，並為每一份報告打一個分數（0-99分），0分代表極度看跌/負面，99分代表極度看漲/正面。
2. **加權計算**: 使用以下權重計算最終的加權平均分數。如果某份報告為「{{ no_data }}」，請在計算加權平均時忽略該項，並將其權重按比例分配給其他可用的報告。
    * 技術分析: 60%
    * 基本面分析: 10%
    * 籌碼分析: 10%
    * 市場情緒分析: 10%
    * 新聞分析: 10%
    * 將最終結果四捨五入為整數。
3. **撰寫總結**: 根據所有報告和你的量化評分，撰寫一份專業的投資總結。總結需要包含對多空觀點的權衡，並給出明確的投資建議（例如，強力買進、觀望、賣出等）。
4. **輸出**: 將你的「總結」和計算出的「最終分數」以指定的 JSON 格式回覆。

**分析報告如下：**

**基本面分析：**
{{ fundamental }}

**市場情緒分析：**
{{ sentiment }}

**新聞分析：**
{{ news }}

**技術分析：**
{{ technical }}

**籌碼分析：**
{{ chip }}

請為股票 {{ ticker }} 提供你的最終決策。",
        "As a top quantitative portfolio manager, your task is to synthesize the analyst team's reports into a final decision with a qualitative summary and a quantitative score.

Follow these steps strictly:
1. **Score**: Read each analyst report carefully and give each one a score from 0 to 99, where 0 is extremely bearish/negative and 99 is extremely bullish/positive.
2. **Weighting**: Compute the final weighted average score with the weights below. If a report is \"{{ no_data }}\", leave it out of the average and redistribute its weight proportionally across the available reports.
    * Technical analysis: 60%
    * Fundamental analysis: 10%
    * Chip analysis: 10%
    * Sentiment analysis: 10%
    * News analysis: 10%
    * Round the final result to the nearest integer.
3. **Summary**: Based on all reports and your score, write a professional investment summary. Weigh the bullish and bearish views and give a clear recommendation (for example Strong Buy, Hold or Sell).
4. **Output**: Reply with your summary and the computed final score in the specified JSON format.

**Analyst reports:**

**Fundamental analysis:**
{{ fundamental }}

**Sentiment analysis:**
{{ sentiment }}

**News analysis:**
{{ news }}

**Technical analysis:**
{{ technical }}

**Chip analysis:**
{{ chip }}

Please give your final decision for {{ ticker }}.",
    )
}
