//! Prompt Composer — turns a user question into the retrieval-augmented prompt
//! sent as the final user turn.
//!
//! Layout:
//! 1. fixed preamble naming the CV subject
//! 2. up to `top_k` `Q:`/`A:` blocks from the matched records, most relevant first,
//!    or the no-matches fallback when the index is not ready or returned nothing
//! 3. `Question: {question}\nAnswer:`

use tracing::debug;

use crate::chat::prompts::{context_preamble, no_matches_fallback, qa_block, question_suffix};
use crate::startup::ReadyState;

pub async fn compose(
    question: &str,
    knowledge: Option<&ReadyState>,
    subject: &str,
    top_k: usize,
) -> String {
    let mut prompt = context_preamble(subject);

    let mut blocks = 0;
    if let Some(ready) = knowledge {
        for id in ready.index.query(question, top_k).await {
            if let Some(record) = ready.corpus.get(id) {
                prompt.push_str(&qa_block(&record.question, &record.answer));
                blocks += 1;
            }
        }
    }

    if blocks == 0 {
        debug!(ready = knowledge.is_some(), "no CV matches, using fallback prompt");
        prompt.push_str(&no_matches_fallback(subject));
    }

    prompt.push_str(&question_suffix(question));
    prompt
}
