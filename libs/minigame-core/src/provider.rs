//! Content provider contract.
//!
//! The engines never fetch anything themselves; a provider hands them
//! already-populated entities. [`SampleContent`] is a small bundled data set
//! for demos and tests; real applications back this trait with their own
//! content pipeline.

use crate::types::{Category, Flashcard, GrammarExample, Question};

/// Read contract the game engines consume content through.
pub trait ContentProvider {
    /// Questions for one practice category.
    fn load_questions(&self, category: Category) -> Vec<Question>;

    /// All flashcards.
    fn flashcards(&self) -> Vec<Flashcard>;

    /// All grammar example sentences.
    fn grammar_points(&self) -> Vec<GrammarExample>;

    /// Questions across every category, in category order.
    fn load_all_questions(&self) -> Vec<Question> {
        Category::all()
            .iter()
            .flat_map(|c| self.load_questions(*c))
            .collect()
    }
}

/// Bundled in-memory content.
#[derive(Debug, Clone)]
pub struct SampleContent {
    questions: Vec<Question>,
    flashcards: Vec<Flashcard>,
    grammar: Vec<GrammarExample>,
}

impl SampleContent {
    /// Provider with a beginner-level Japanese data set.
    pub fn japanese() -> Self {
        let questions = vec![
            question("q-mizu", "水", &["water", "fire", "tree", "mountain"], "water", Category::Vocabulary),
            question("q-neko", "猫", &["dog", "cat", "bird", "fish"], "cat", Category::Vocabulary),
            question("q-taberu", "食べる", &["to drink", "to eat", "to sleep", "to run"], "to eat", Category::Vocabulary),
            question("q-particle-wa", "___は学生です。", &["私", "本", "行く", "赤い"], "私", Category::Grammar),
            question("q-particle-o", "パンを___。", &["食べます", "学生", "これ", "山"], "食べます", Category::Grammar),
            question("q-hiragana-a", "あ", &["a", "i", "u", "e"], "a", Category::Script),
            question("q-katakana-ka", "カ", &["sa", "ka", "ta", "na"], "ka", Category::Script),
        ];
        let flashcards = vec![
            flashcard("f-mizu", "水", "みず", "water"),
            flashcard("f-yama", "山", "やま", "mountain"),
            flashcard("f-neko", "猫", "ねこ", "cat"),
            flashcard("f-hon", "本", "ほん", "book"),
            flashcard("f-gakusei", "学生", "がくせい", "student"),
            flashcard("f-taberu", "食べる", "たべる", "to eat"),
        ];
        let grammar = vec![
            GrammarExample {
                id: "g-wa".to_string(),
                text: "私は学生です".to_string(),
                romanization: Some("watashi wa gakusei desu".to_string()),
                translation: "I am a student".to_string(),
            },
            GrammarExample {
                id: "g-o".to_string(),
                text: "水を飲みます".to_string(),
                romanization: Some("mizu o nomimasu".to_string()),
                translation: "I drink water".to_string(),
            },
            GrammarExample {
                id: "g-ni".to_string(),
                text: "学校に行きます".to_string(),
                romanization: Some("gakkou ni ikimasu".to_string()),
                translation: "I go to school".to_string(),
            },
        ];
        Self {
            questions,
            flashcards,
            grammar,
        }
    }
}

impl ContentProvider for SampleContent {
    fn load_questions(&self, category: Category) -> Vec<Question> {
        self.questions
            .iter()
            .filter(|q| q.category == category)
            .cloned()
            .collect()
    }

    fn flashcards(&self) -> Vec<Flashcard> {
        self.flashcards.clone()
    }

    fn grammar_points(&self) -> Vec<GrammarExample> {
        self.grammar.clone()
    }
}

fn question(
    id: &str,
    prompt: &str,
    options: &[&str],
    correct: &str,
    category: Category,
) -> Question {
    Question {
        id: id.to_string(),
        prompt: prompt.to_string(),
        options: options.iter().map(|s| s.to_string()).collect(),
        correct_answer: correct.to_string(),
        category,
        explanation: None,
    }
}

fn flashcard(id: &str, front: &str, back: &str, meaning: &str) -> Flashcard {
    Flashcard {
        id: id.to_string(),
        front: front.to_string(),
        back: back.to_string(),
        meaning: meaning.to_string(),
    }
}
