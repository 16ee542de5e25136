//! Prompt assembly and answer normalization.
//!
//! Pure string functions; each assembled prompt is consumed by exactly
//! one generation call.

use crate::models::{LABEL_FIRST, LABEL_SECOND};

/// Fixed system instruction for the answering call: cite the statute
/// name and article, map the user's facts to the statutory elements,
/// give preliminary guidance, answer 「不知道」 under uncertainty, and
/// close with a non-binding-advice disclaimer.
const ANSWER_INSTRUCTION: &str = "你是一位台灣法律諮詢顧問。請閱讀使用者的問題與檢索資料，並提供清楚的法律回覆，內容包含：
1. 相關法規的名稱、條號與條文內容
2. 使用者敘述與法條構成要件的對應說明
3. 初步法律建議（例如是否需尋求律師協助）
4. 不確定時請回答「不知道」，避免提供不實資訊
5. 回覆結尾請提醒使用者這不是正式法律意見";

/// Fixed instruction for the judge call: pick exactly one label based
/// on legal correctness and clarity.
const JUDGE_INSTRUCTION: &str = "你是一位台灣法律諮詢顧問。請閱讀「回答1」與「回答2」，根據兩者的法律正確性與表達清晰度，判斷哪一個回答比較適當。
請僅回覆「回答1」或「回答2」。";

/// Assembles the grounded answering prompt. An empty context block
/// omits the reference-material section entirely, so the model still
/// attempts an answer from general knowledge under the same
/// instruction.
pub fn answer_prompt(context: &str, query: &str) -> String {
    let mut prompt = String::from(ANSWER_INSTRUCTION);
    if !context.is_empty() {
        prompt.push_str("\n下列為檢索法條後的參考資料，請摘要重點做為參考: ");
        prompt.push_str(context);
    }
    prompt.push_str("\n使用者的問題: ");
    prompt.push_str(query);
    prompt
}

/// Assembles the judge prompt over two already-normalized candidates.
pub fn judge_prompt(answer_x: &str, answer_y: &str) -> String {
    format!(
        "{JUDGE_INSTRUCTION}\n{LABEL_FIRST}: {answer_x}\n{LABEL_SECOND}: {answer_y}\n較佳的回答是："
    )
}

/// Rewrites a candidate for judge readability: collapses embedded
/// newlines, then reinserts one after every sentence-terminating 。.
pub fn normalize_answer(answer: &str) -> String {
    answer.replace('\n', "").replace('。', "。\n")
}

/// Joins retrieved passage texts into the single context block fed to
/// `answer_prompt`.
pub fn join_context<'a, I>(passages: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    passages.into_iter().collect::<Vec<_>>().join("\n")
}
