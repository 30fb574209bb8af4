// All LLM prompt constants for the Advising module.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::GENERIC_INSTITUTIONS_INSTRUCTION;
use crate::recommendation::ranking::RankedRecommendation;

/// Number of candidate slots listed in the initial prompt.
pub const CANDIDATE_SLOTS: usize = 5;

/// Initial advice prompt. Replace: {summary}, {candidates}, {institutions_instruction}
pub const INITIAL_PROMPT_TEMPLATE: &str = r#"Here is a short profile of the student:

{summary}

The rule-based mapping produced these top candidates:
{candidates}

Please:
1) Validate and sharpen 3-5 field/major recommendations (you may add or reorder).
2) Explain the reasons, linking them to subject scores, interests, learning style, and math comfort.
3) Give alternatives in case the student wants a path that is more or less math-intensive.
4) Write a 90-day action plan (topics to deepen, mini projects, competitions or extracurriculars).
5) {institutions_instruction}

Keep the answer concise and structured (headings + bullets) and friendly to students."#;

/// Retrieval-grounded chat prompt. Replace: {context}, {question}, {institutions_instruction}
pub const RAG_PROMPT_TEMPLATE: &str = r#"Use the following profile context to answer specifically, empathetically, and with actionable steps.

Profile Context:
{context}

User Question:
{question}

Instructions:
- Explain the reasons behind each recommendation (link them to subject scores, interests, and learning style).
- Give 3-5 major / study program group recommendations, plus alternatives if some requirements are a poor fit.
- Include examples of extracurricular activities or projects that can be tried within 3-6 months.
- If the user asks to compare majors, lay out differences in focus, core courses, and general prospects.
- {institutions_instruction}
Structure the answer so it is easy to read."#;

/// Fallback chat prompt used when no retrieval context exists.
/// Replace: {summary}, {question}, {institutions_instruction}
pub const FALLBACK_PROMPT_TEMPLATE: &str = r#"Answer specifically according to the student's profile.
{institutions_instruction}

Profile:
{summary}

Question: {question}

Answer:"#;

/// A canned starter question offered before the first exchange.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct QuickAction {
    pub label: &'static str,
    pub question: &'static str,
}

pub const QUICK_ACTIONS: [QuickAction; 3] = [
    QuickAction {
        label: "Cocoknya Ambil Jurusan Apa?",
        question: "Berdasarkan profil saya, jurusan kuliah apa yang paling cocok? Jelaskan alasannya.",
    },
    QuickAction {
        label: "Alternatif Minim Matematika",
        question: "Kalau saya kurang nyaman dengan matematika, apa alternatif jurusan yang tetap relevan dengan minat saya?",
    },
    QuickAction {
        label: "Ekskul & Proyek 3 Bulan",
        question: "Rekomendasikan kegiatan ekstrakurikuler dan proyek 3 bulan untuk menguji minat saya.",
    },
];

/// Fills `{name}` placeholders in one left-to-right pass. Substituted values
/// are never scanned again, so user text containing `{question}` or similar
/// stays literal. Unknown placeholders are left untouched.
fn fill_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open + 1..];
        let hit = tail.find('}').and_then(|close| {
            let key = &tail[..close];
            vars.iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (close, *value))
        });
        match hit {
            Some((close, value)) => {
                out.push_str(value);
                rest = &tail[close + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }

    out.push_str(rest);
    out
}

pub fn build_initial_prompt(summary: &str, recommendation: &RankedRecommendation) -> String {
    let names = recommendation.field_names();
    let candidates: Vec<String> = (0..CANDIDATE_SLOTS)
        .map(|i| format!("- {}", names.get(i).copied().unwrap_or("-")))
        .collect();

    fill_template(
        INITIAL_PROMPT_TEMPLATE,
        &[
            ("summary", summary),
            ("candidates", &candidates.join("\n")),
            ("institutions_instruction", GENERIC_INSTITUTIONS_INSTRUCTION),
        ],
    )
}

pub fn build_rag_prompt(question: &str, context: &str) -> String {
    fill_template(
        RAG_PROMPT_TEMPLATE,
        &[
            ("context", context),
            ("question", question),
            ("institutions_instruction", GENERIC_INSTITUTIONS_INSTRUCTION),
        ],
    )
}

/// Used outside any session, so the profile slot is rendered as `-`.
pub fn build_fallback_prompt(question: &str) -> String {
    fill_template(
        FALLBACK_PROMPT_TEMPLATE,
        &[
            ("summary", "-"),
            ("question", question),
            ("institutions_instruction", GENERIC_INSTITUTIONS_INSTRUCTION),
        ],
    )
}
