use super::catalog::QuestionCatalog;
use super::session::QuizSession;
use crate::types::{LeaderboardEntry, Question, QuestionKind};

/// Whether `answer` matches the question's correct answer in any language.
/// Canvas answers are never auto-scored.
pub fn is_correct(question: &Question, answer: &str) -> bool {
    if question.kind == QuestionKind::Canvas {
        return false;
    }
    let answer = answer.trim().to_lowercase();
    if answer.is_empty() {
        return false;
    }
    question
        .correct_answer
        .all_texts()
        .any(|expected| expected.trim().to_lowercase() == answer)
}

/// Sum of points for every correctly answered question, capped at `u32::MAX`
pub fn score_answers(catalog: &QuestionCatalog, answers: &[Option<String>]) -> u32 {
    catalog
        .questions()
        .iter()
        .zip(answers)
        .filter_map(|(question, answer)| {
            let answer = answer.as_deref()?;
            is_correct(question, answer).then_some(question.points)
        })
        .fold(0u32, u32::saturating_add)
}

/// Rank completed sessions by score, ties broken by earlier completion
pub fn leaderboard<'a>(sessions: impl IntoIterator<Item = &'a QuizSession>) -> Vec<LeaderboardEntry> {
    let mut completed: Vec<(&QuizSession, u32, &str)> = sessions
        .into_iter()
        .filter_map(|s| Some((s, s.score()?, s.completed_at()?)))
        .collect();

    // RFC 3339 timestamps in UTC sort lexicographically
    completed.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.2.cmp(b.2)));

    completed
        .into_iter()
        .enumerate()
        .map(|(i, (session, points, _))| {
            let identity = session.identity();
            let player = identity
                .email
                .split('@')
                .next()
                .unwrap_or_default()
                .to_string();
            let avatar = player
                .chars()
                .next()
                .map(|c| c.to_uppercase().to_string())
                .unwrap_or_default();

            LeaderboardEntry {
                rank: i as u32 + 1,
                player,
                location: identity
                    .country
                    .clone()
                    .unwrap_or_else(|| "Global".to_string()),
                points,
                avatar,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::CODE_LENGTH;
    use crate::types::{Language, TranslationBundle};

    fn catalog() -> QuestionCatalog {
        QuestionCatalog::seed()
    }

    #[test]
    fn test_correct_in_any_language_case_insensitive() {
        let catalog = catalog();
        let q = catalog.get(0).unwrap();
        assert!(is_correct(q, "Paris"));
        assert!(is_correct(q, "  parís "));
        assert!(is_correct(q, "PARIJS"));
        assert!(!is_correct(q, "London"));
        assert!(!is_correct(q, ""));
    }

    #[test]
    fn test_canvas_never_scored() {
        let catalog = catalog();
        let canvas = catalog.get(3).unwrap();
        assert!(!is_correct(canvas, "Queen Emma Bridge"));
    }

    #[test]
    fn test_score_answers_skips_missing_slots() {
        let catalog = catalog();
        let answers = vec![
            Some("Paris".to_string()),
            None,
            Some("marte".to_string()),
        ];
        assert_eq!(score_answers(&catalog, &answers), 20);
        assert_eq!(score_answers(&catalog, &[]), 0);
    }

    #[test]
    fn test_points_come_from_question() {
        let mut question = catalog().get(1).unwrap().clone();
        question.points = 25;
        question.correct_answer = TranslationBundle::english("x").with(Language::Dutch, "y");
        let catalog = QuestionCatalog::new(vec![question]).unwrap();
        assert_eq!(score_answers(&catalog, &[Some("Y".to_string())]), 25);
    }

    #[test]
    fn test_score_saturates() {
        let mut question = catalog().get(1).unwrap().clone();
        question.points = u32::MAX;
        let mut second = question.clone();
        second.id = "q-big-2".to_string();
        let catalog = QuestionCatalog::new(vec![question.clone(), second]).unwrap();
        let answer = Some(question.correct_answer.english.clone());
        assert_eq!(score_answers(&catalog, &[answer.clone(), answer]), u32::MAX);
    }

    fn finish(id: &str, email: &str, country: Option<&str>, answers: &[&str]) -> QuizSession {
        let catalog = QuestionCatalog::new(catalog().questions()[..2].to_vec()).unwrap();
        let mut session = QuizSession::new(id.to_string(), 600);
        session.set_email(email.to_string()).unwrap();
        session.set_country(country.map(str::to_string)).unwrap();
        for i in 0..CODE_LENGTH {
            session.set_code_digit(i, "1").unwrap();
        }
        session.continue_from_sign_in().unwrap();
        session.continue_from_location(&catalog).unwrap();
        session.select_option(&catalog, answers[0].to_string()).unwrap();
        session.next(&catalog).unwrap();
        session.type_answer(&catalog, answers[1].to_string()).unwrap();
        session.next(&catalog).unwrap();
        session
    }

    #[test]
    fn test_leaderboard_ranks_completed_sessions() {
        let low = finish("1", "low@x.com", None, &["London", "New Amsterdam"]);
        let high = finish("2", "high@x.com", Some("Curaçao"), &["Paris", "New Amsterdam"]);
        let unfinished = QuizSession::new("3".to_string(), 600);

        let board = leaderboard([&low, &high, &unfinished]);
        assert_eq!(board.len(), 2);
        assert_eq!(board[0].player, "high");
        assert_eq!(board[0].rank, 1);
        assert_eq!(board[0].points, 20);
        assert_eq!(board[0].location, "Curaçao");
        assert_eq!(board[0].avatar, "H");
        assert_eq!(board[1].player, "low");
        assert_eq!(board[1].location, "Global");
        assert_eq!(board[1].points, 10);
    }
}
