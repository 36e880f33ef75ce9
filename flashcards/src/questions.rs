use rand::{
    seq::{IteratorRandom, SliceRandom},
    Rng,
};

use crate::storage::{StoreError, WordStore};
use crate::word::{WordId, WordRecord};

const ANSWER_COUNT: usize = 4;

#[derive(Debug, Clone)]
pub struct Question {
    pub word_id: WordId,
    pub question: String,
    pub answers: Vec<Answer>,
}

#[derive(Debug, Clone)]
pub struct Answer {
    pub content: String,
    pub correct: bool,
    pub word_id: WordId,
}

#[derive(Debug, Clone, Copy)]
pub enum Choice<'q> {
    Picked(&'q Answer),
    Skip,
    Unclear,
}

impl Question {
    pub fn correct_answer(&self) -> Option<&Answer> {
        self.answers.iter().find(|answer| answer.correct)
    }

    /// Reads a 1-based answer number, `:s`/`:skip`, or text close enough to one answer.
    pub fn interpret(&self, input: &str) -> Choice<'_> {
        let input = input.trim();
        if let Ok(index) = input.parse::<usize>() {
            return match self.answers.get(index.wrapping_sub(1)) {
                Some(answer) => Choice::Picked(answer),
                None => Choice::Unclear,
            };
        }
        let input = input.to_lowercase();
        if input == ":s" || input == ":skip" {
            return Choice::Skip;
        }
        let mut scored = self
            .answers
            .iter()
            .map(|answer| (answer, strsim::jaro(&answer.content.to_lowercase(), &input)))
            .collect::<Vec<(&Answer, f64)>>();
        // most similar at the start
        scored.sort_unstable_by(|(_, a), (_, b)| b.total_cmp(a));
        let Some(&(best, best_score)) = scored.first() else {
            return Choice::Unclear;
        };
        let runner_up = scored.get(1).map_or(0.0, |(_, score)| *score);
        if best_score == 1.0 || (best_score > 0.9 && best_score - runner_up > 0.25) {
            Choice::Picked(best)
        } else {
            Choice::Unclear
        }
    }
}

/// Asks for the word matching a stored meaning, with other stored words as wrong
/// answers. Needs at least two distinct words.
pub fn generate_question<R: Rng + ?Sized>(words: &[WordRecord], rng: &mut R) -> Option<Question> {
    let target = words.choose(rng)?;
    let mut answers = Vec::with_capacity(ANSWER_COUNT);
    answers.push(Answer {
        content: target.vocabulary.clone(),
        correct: true,
        word_id: target.id,
    });
    let candidates = words
        .iter()
        .filter(|word| word.id != target.id)
        .choose_multiple(rng, words.len());
    for word in candidates {
        if answers.len() == ANSWER_COUNT {
            break;
        }
        let duplicate = answers
            .iter()
            .any(|answer| answer.content.eq_ignore_ascii_case(&word.vocabulary));
        if !duplicate {
            answers.push(Answer {
                content: word.vocabulary.clone(),
                correct: false,
                word_id: word.id,
            });
        }
    }
    if answers.len() < 2 {
        return None;
    }
    answers.shuffle(rng);
    Some(Question {
        word_id: target.id,
        question: format!("Which word means {:?}?", target.meaning),
        answers,
    })
}

/// Logs a quiz for the asked word once an answer was picked. `false` when nothing was recorded.
pub async fn record_attempt(
    store: &dyn WordStore,
    question: &Question,
    choice: Choice<'_>,
) -> Result<bool, StoreError> {
    match choice {
        Choice::Picked(_) => {
            store.record_quiz(question.word_id).await?;
            Ok(true)
        }
        Choice::Skip | Choice::Unclear => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MockWordStore;
    use crate::word::PartOfSpeechSet;
    use rand::{rngs::StdRng, SeedableRng};

    fn word(id: WordId, vocabulary: &str, meaning: &str) -> WordRecord {
        WordRecord {
            id,
            vocabulary: vocabulary.into(),
            meaning: meaning.into(),
            translate: "訳".into(),
            example: None,
            category: String::new(),
            part_of_speech: PartOfSpeechSet::new(),
        }
    }

    fn words() -> Vec<WordRecord> {
        vec![
            word(1, "ubiquitous", "existing everywhere"),
            word(2, "keen", "eager"),
            word(3, "brisk", "quick and energetic"),
            word(4, "terse", "using few words"),
            word(5, "candid", "honest and direct"),
        ]
    }

    fn fixed_question() -> Question {
        Question {
            word_id: 2,
            question: "Which word means \"eager\"?".into(),
            answers: ["ubiquitous", "keen", "brisk"]
                .into_iter()
                .zip([1, 2, 3])
                .map(|(content, word_id)| Answer {
                    content: content.into(),
                    correct: word_id == 2,
                    word_id,
                })
                .collect(),
        }
    }

    #[test]
    fn question_has_one_correct_answer_matching_meaning() {
        let words = words();
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let question = generate_question(&words, &mut rng).unwrap();
            assert_eq!(question.answers.len(), ANSWER_COUNT);
            assert_eq!(
                question.answers.iter().filter(|answer| answer.correct).count(),
                1
            );
            let correct = question.correct_answer().unwrap();
            let target = words.iter().find(|word| word.id == question.word_id).unwrap();
            assert_eq!(correct.content, target.vocabulary);
            assert!(question.question.contains(&target.meaning));
        }
    }

    #[test]
    fn needs_two_distinct_words() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(generate_question(&[], &mut rng).is_none());
        assert!(generate_question(&words()[..1], &mut rng).is_none());
        let twins = vec![word(1, "keen", "eager"), word(2, "Keen", "sharp")];
        assert!(generate_question(&twins, &mut rng).is_none());
        let pair = vec![word(1, "keen", "eager"), word(2, "terse", "brief")];
        assert_eq!(
            generate_question(&pair, &mut rng).unwrap().answers.len(),
            2
        );
    }

    #[test]
    fn interprets_numbers_skips_and_text() {
        let question = fixed_question();
        assert!(matches!(question.interpret("2"), Choice::Picked(answer) if answer.correct));
        assert!(matches!(question.interpret(" 1 "), Choice::Picked(answer) if answer.content == "ubiquitous"));
        assert!(matches!(question.interpret("0"), Choice::Unclear));
        assert!(matches!(question.interpret("4"), Choice::Unclear));
        assert!(matches!(question.interpret(":SKIP"), Choice::Skip));
        assert!(matches!(question.interpret("Keen"), Choice::Picked(answer) if answer.correct));
        assert!(matches!(question.interpret("qqq"), Choice::Unclear));
    }

    #[tokio::test]
    async fn picked_answers_are_recorded_for_the_asked_word() {
        let mut store = MockWordStore::new();
        store
            .expect_record_quiz()
            .withf(|id: &WordId| *id == 2)
            .times(2)
            .returning(|_| Ok(()));

        let question = fixed_question();
        let right = question.interpret("keen");
        assert!(record_attempt(&store, &question, right).await.unwrap());
        let wrong = question.interpret("1");
        assert!(record_attempt(&store, &question, wrong).await.unwrap());
    }

    #[tokio::test]
    async fn skipped_questions_are_not_recorded() {
        let mut store = MockWordStore::new();
        store.expect_record_quiz().never();

        let question = fixed_question();
        let skip = question.interpret(":s");
        assert!(!record_attempt(&store, &question, skip).await.unwrap());
        assert!(!record_attempt(&store, &question, Choice::Unclear).await.unwrap());
    }

    #[tokio::test]
    async fn failed_recording_is_reported() {
        let mut store = MockWordStore::new();
        store
            .expect_record_quiz()
            .times(1)
            .returning(|id| Err(StoreError::NotFound(id)));

        let question = fixed_question();
        let choice = question.interpret("2");
        assert!(matches!(
            record_attempt(&store, &question, choice).await,
            Err(StoreError::NotFound(2))
        ));
    }
}
