//! Prompt template for question generation

const PROMPT_TEMPLATE: &str = r#"
You are an expert NEET-PG question setter and medical educator.

Generate {count} high-quality multiple-choice questions (MCQs) for the topic: "{topic}".

Requirements:
- Difficulty: NEET-PG / AIIMS / USMLE-level.
- Include a mix of conceptual, clinical, and case-based questions.
- Include both medium (30%) and hard (70%) conceptual mixes (100% hard-creative).
- Each question must have 4 options (A–D).
- Include a detailed explanation for the correct answer.
- Output MUST be strictly valid JSON in the following structure:

{
  "topic": "{topic}",
  "questions": [
    {
      "serial": 1,
      "question": "Question text",
      "options": {
        "A": "Option A",
        "B": "Option B",
        "C": "Option C",
        "D": "Option D"
      },
      "correct_answer": {
        "option": "A",
        "text": "Correct option text"
      },
      "explanation": "Detailed explanation with reasoning for correct and incorrect answers."
    },
    ...
  ]
}

Do NOT include any text outside the JSON (no markdown, no commentary).
"#;

/// Build the generation prompt for a topic
///
/// The count is substituted before the topic so that a topic containing
/// a placeholder is inserted literally.
pub fn build_prompt(topic: &str, question_count: u32) -> String {
    PROMPT_TEMPLATE
        .replace("{count}", &question_count.to_string())
        .replace("{topic}", topic)
}
