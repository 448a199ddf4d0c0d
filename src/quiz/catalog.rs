use crate::types::{GeoLink, Language, Media, Question, QuestionKind, TranslationBundle};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid catalog: {0}")]
    Invalid(String),
}

/// Ordered, fixed list of questions presented to every participant
#[derive(Debug, Clone, Default)]
pub struct QuestionCatalog {
    questions: Vec<Question>,
}

impl QuestionCatalog {
    /// Build a catalog, ordering questions by sequence number
    pub fn new(mut questions: Vec<Question>) -> Result<Self, CatalogError> {
        for q in &questions {
            if q.prompt.english.trim().is_empty() {
                return Err(CatalogError::Invalid(format!(
                    "question {} has no English prompt",
                    q.id
                )));
            }
            if let QuestionKind::MultipleChoice { options } = &q.kind {
                if options.iter().any(|o| o.english.trim().is_empty()) {
                    return Err(CatalogError::Invalid(format!(
                        "question {} has an option without English text",
                        q.id
                    )));
                }
                if options.len() < 2 {
                    return Err(CatalogError::Invalid(format!(
                        "question {} needs at least two options",
                        q.id
                    )));
                }
            }
        }

        questions.sort_by_key(|q| q.sequence);
        Ok(Self { questions })
    }

    pub fn load_from_file(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        let questions: Vec<Question> = serde_json::from_str(&raw)?;
        let catalog = Self::new(questions)?;
        tracing::info!(
            "Loaded {} questions from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Built-in questions
    pub fn seed() -> Self {
        let questions = vec![
            Question {
                id: "q1".to_string(),
                sequence: 1,
                kind: QuestionKind::MultipleChoice {
                    options: vec![
                        TranslationBundle::english("Paris")
                            .with(Language::Spanish, "París")
                            .with(Language::Papiamentu, "Paris")
                            .with(Language::Dutch, "Parijs"),
                        TranslationBundle::english("London")
                            .with(Language::Spanish, "Londres")
                            .with(Language::Papiamentu, "Londres")
                            .with(Language::Dutch, "Londen"),
                        TranslationBundle::english("Berlin")
                            .with(Language::Spanish, "Berlín")
                            .with(Language::Papiamentu, "Berlin")
                            .with(Language::Dutch, "Berlijn"),
                        TranslationBundle::english("Madrid"),
                    ],
                },
                prompt: TranslationBundle::english("What is the capital of France?")
                    .with(Language::Spanish, "¿Cuál es la capital de Francia?")
                    .with(Language::Papiamentu, "Kiko ta e kapital di Fransia?")
                    .with(Language::Dutch, "Wat is de hoofdstad van Frankrijk?"),
                correct_answer: TranslationBundle::english("Paris")
                    .with(Language::Spanish, "París")
                    .with(Language::Dutch, "Parijs"),
                media: Some(Media::Image {
                    url: "https://images.pexels.com/photos/338515/pexels-photo-338515.jpeg"
                        .to_string(),
                }),
                location: None,
                points: 10,
            },
            Question {
                id: "q2".to_string(),
                sequence: 2,
                kind: QuestionKind::TextInput,
                prompt: TranslationBundle::english("What is the old name of New York City?")
                    .with(
                        Language::Spanish,
                        "¿Cuál es el antiguo nombre de la ciudad de Nueva York?",
                    )
                    .with(Language::Papiamentu, "Kiko tabata e nòmber bieu di New York?")
                    .with(Language::Dutch, "Wat is de oude naam van New York City?"),
                correct_answer: TranslationBundle::english("New Amsterdam")
                    .with(Language::Spanish, "Nueva Ámsterdam")
                    .with(Language::Dutch, "Nieuw-Amsterdam"),
                media: Some(Media::Image {
                    url: "https://images.pexels.com/photos/338515/pexels-photo-338515.jpeg"
                        .to_string(),
                }),
                location: None,
                points: 10,
            },
            Question {
                id: "q3".to_string(),
                sequence: 3,
                kind: QuestionKind::MultipleChoice {
                    options: vec![
                        TranslationBundle::english("Venus"),
                        TranslationBundle::english("Mars").with(Language::Spanish, "Marte"),
                        TranslationBundle::english("Jupiter")
                            .with(Language::Spanish, "Júpiter"),
                        TranslationBundle::english("Saturn")
                            .with(Language::Spanish, "Saturno")
                            .with(Language::Dutch, "Saturnus"),
                    ],
                },
                prompt: TranslationBundle::english("Which planet is known as the Red Planet?")
                    .with(Language::Spanish, "¿Qué planeta es conocido como el Planeta Rojo?")
                    .with(Language::Dutch, "Welke planeet staat bekend als de Rode Planeet?"),
                correct_answer: TranslationBundle::english("Mars")
                    .with(Language::Spanish, "Marte"),
                media: Some(Media::Image {
                    url: "https://images.pexels.com/photos/73871/rocket-launch-rocket-take-off-nasa-73871.jpeg"
                        .to_string(),
                }),
                location: None,
                points: 10,
            },
            Question {
                id: "q4".to_string(),
                sequence: 4,
                kind: QuestionKind::Canvas,
                prompt: TranslationBundle::english("Draw the landmark you found at this stop")
                    .with(Language::Spanish, "Dibuja el monumento que encontraste en esta parada")
                    .with(Language::Dutch, "Teken het monument dat je bij deze stop vond"),
                correct_answer: TranslationBundle::english("Queen Emma Bridge"),
                media: None,
                location: Some(GeoLink {
                    label: "Queen Emma Bridge, Willemstad".to_string(),
                    maps_url: "https://maps.google.com/?q=Queen+Emma+Bridge+Willemstad"
                        .to_string(),
                }),
                points: 10,
            },
        ];

        Self { questions }
    }
}
