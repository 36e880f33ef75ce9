use std::collections::BTreeSet;

use serde_json::Value;

const NO_EXAMPLE: &str = "there is no example";
const UNCATEGORIZED: &str = "uncategorized";
const RECOMMENDATION_COUNT: usize = 5;

/// The parts of a stored word the prompt needs.
pub trait PromptWord {
    fn vocabulary(&self) -> &str;
    fn meaning(&self) -> &str;
    fn translate(&self) -> &str;
    fn example(&self) -> Option<&str>;
    fn category(&self) -> &str;
}

fn category_label<W: PromptWord>(word: &W) -> &str {
    match word.category().trim() {
        "" => UNCATEGORIZED,
        category => category,
    }
}

pub fn build_prompt<W: PromptWord>(words: &[W]) -> String {
    let categories = words.iter().map(category_label).collect::<BTreeSet<&str>>();
    let categories = Value::Array(categories.into_iter().map(Value::from).collect());

    let existing = words
        .iter()
        .map(|word| {
            format!(
                "
    vocabulary: {},
    meaning: {},
    translate: {},
    example: {},
    category: {}
",
                word.vocabulary(),
                word.meaning(),
                word.translate(),
                word.example()
                    .filter(|example| !example.is_empty())
                    .unwrap_or(NO_EXAMPLE),
                category_label(word),
            )
        })
        .collect::<String>();

    format!(
        r#"<task>
Analyse the user's vocabulary and recommend {RECOMMENDATION_COUNT} new English words for a beginner Japanese learner.
</task>

<current_status>
  <total_words> {count} </total_words>
  <category_distribution> {categories} </category_distribution>
</current_status>

<existing_words>{existing}</existing_words>

<criteria>
1. No duplicates from existing words
2. Appropriate difficulty (slightly challenging is good)
3. High practical value for daily/business use
4. Related to existing words for systematic vocabulary building
5. Memorable and distinctive
</criteria>

<output_format>
Respond in this exact JSON format with exactly {RECOMMENDATION_COUNT} recommendations:

```json
{{
  "recommendations": [
    {{
      "vocabulary": "word",
      "meaning": "why recommended (connection to existing words)",
      "translate": "日本語意味",
      "category": "category_name",
      "example": "Example sentence in English"
    }}
  ],
  "learningAdvice": "Overall learning advice in Japanese"
}}
```
</output_format>

<instruction>
Focus on words that build upon existing vocabulary and maintain learning motivation.
</instruction>
"#,
        count = words.len(),
    )
}
