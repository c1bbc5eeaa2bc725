//! # Game Session
//!
//! The state machine of one player's round.
//!
//! ## States
//! - `Active`: fewer than three strikes and not every answer found
//! - `Won`: every movie of the answer set has been guessed
//! - `Lost`: three strikes
//!
//! `Won` and `Lost` are terminal. A session only changes through
//! `record_guess`; every rejected guess leaves it untouched.

use catalog::{CuratedMovie, MovieId};
use curation::{AnswerSet, max_revenue};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Incorrect guesses that end a round
pub const MAX_STRIKES: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundStatus {
    Active,
    Won,
    Lost,
}

impl RoundStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, RoundStatus::Active)
    }
}

/// Why a guess was rejected without touching the session
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvalidGuess {
    #[error("The round is already over")]
    RoundOver,

    #[error("No movie selected")]
    Empty,

    #[error("Not a movie id: {0}")]
    Malformed(String),

    #[error("Movie {0} was already guessed")]
    AlreadyGuessed(MovieId),
}

/// Result of one accepted guess
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuessOutcome {
    /// The movie that was guessed
    pub movie: CuratedMovie,
    pub correct: bool,
    /// Correct guesses so far, in guess order
    pub guessed: Vec<CuratedMovie>,
    pub strikes: u8,
    pub status: RoundStatus,
    pub terminal: bool,
    pub max_revenue: u64,
    /// The full answer set, only once the round is lost
    pub revealed_answers: Option<Vec<CuratedMovie>>,
}

/// Snapshot of a round for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundProgress {
    pub actor_name: String,
    pub guessed: Vec<CuratedMovie>,
    pub answers_total: usize,
    pub strikes: u8,
    pub status: RoundStatus,
    pub terminal: bool,
    pub max_revenue: u64,
    pub revealed_answers: Option<Vec<CuratedMovie>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    answers: AnswerSet,
    guessed: Vec<CuratedMovie>,
    strikes: u8,
    status: RoundStatus,
}

impl GameSession {
    /// A fresh round: active, no strikes, nothing guessed.
    ///
    /// An empty answer set is a valid round; it can only be lost.
    pub fn new(answers: AnswerSet) -> Self {
        Self {
            answers,
            guessed: Vec::new(),
            strikes: 0,
            status: RoundStatus::Active,
        }
    }

    pub fn actor_name(&self) -> &str {
        self.answers.actor_name()
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn guessed(&self) -> &[CuratedMovie] {
        &self.guessed
    }

    pub fn strikes(&self) -> u8 {
        self.strikes
    }

    pub fn status(&self) -> RoundStatus {
        self.status
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn has_guessed(&self, movie_id: MovieId) -> bool {
        self.guessed.iter().any(|m| m.id == movie_id)
    }

    /// Check a raw guess before anything is looked up.
    ///
    /// ## Algorithm
    /// 1. Terminal session → `RoundOver`
    /// 2. Blank input → `Empty`
    /// 3. Not a number → `Malformed`
    /// 4. Already in `guessed` → `AlreadyGuessed`
    ///
    /// # Returns
    /// The parsed movie id
    pub fn validate_guess(&self, raw_id: &str) -> Result<MovieId, InvalidGuess> {
        if self.is_terminal() {
            return Err(InvalidGuess::RoundOver);
        }
        let raw_id = raw_id.trim();
        if raw_id.is_empty() {
            return Err(InvalidGuess::Empty);
        }
        let movie_id: MovieId = raw_id
            .parse()
            .map_err(|_| InvalidGuess::Malformed(raw_id.to_string()))?;
        if self.has_guessed(movie_id) {
            return Err(InvalidGuess::AlreadyGuessed(movie_id));
        }
        Ok(movie_id)
    }

    /// Apply a guess whose movie has already been resolved.
    ///
    /// A correct guess is stored as the answer set's copy of the movie.
    pub fn record_guess(&mut self, movie: CuratedMovie) -> Result<GuessOutcome, InvalidGuess> {
        if self.is_terminal() {
            return Err(InvalidGuess::RoundOver);
        }
        if self.has_guessed(movie.id) {
            return Err(InvalidGuess::AlreadyGuessed(movie.id));
        }

        let correct = match self.answers.get(movie.id) {
            Some(answer) => {
                self.guessed.push(answer.clone());
                if self.guessed.len() == self.answers.len() {
                    self.status = RoundStatus::Won;
                }
                true
            }
            None => {
                self.strikes += 1;
                if self.strikes >= MAX_STRIKES {
                    self.status = RoundStatus::Lost;
                }
                false
            }
        };

        Ok(GuessOutcome {
            movie,
            correct,
            guessed: self.guessed.clone(),
            strikes: self.strikes,
            status: self.status,
            terminal: self.is_terminal(),
            max_revenue: self.max_revenue(),
            revealed_answers: self.revealed_answers().map(<[CuratedMovie]>::to_vec),
        })
    }

    /// Highest revenue among guessed movies; among all answers once lost
    pub fn max_revenue(&self) -> u64 {
        match self.status {
            RoundStatus::Lost => self.answers.max_revenue(),
            _ => max_revenue(&self.guessed),
        }
    }

    /// The answer set, revealed only after a loss
    pub fn revealed_answers(&self) -> Option<&[CuratedMovie]> {
        match self.status {
            RoundStatus::Lost => Some(self.answers.movies()),
            _ => None,
        }
    }

    pub fn progress(&self) -> RoundProgress {
        RoundProgress {
            actor_name: self.actor_name().to_string(),
            guessed: self.guessed.clone(),
            answers_total: self.answers.len(),
            strikes: self.strikes,
            status: self.status,
            terminal: self.is_terminal(),
            max_revenue: self.max_revenue(),
            revealed_answers: self.revealed_answers().map(<[CuratedMovie]>::to_vec),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn movie(id: MovieId, revenue: u64) -> CuratedMovie {
        CuratedMovie::new(id, format!("Movie {}", id), revenue)
    }

    fn session(movies: Vec<CuratedMovie>) -> GameSession {
        GameSession::new(AnswerSet::new("Test Actor", movies))
    }

    fn guess(session: &mut GameSession, id: MovieId) -> Result<GuessOutcome, InvalidGuess> {
        let movie_id = session.validate_guess(&id.to_string())?;
        session.record_guess(movie(movie_id, 0))
    }

    fn ids(movies: &[CuratedMovie]) -> Vec<MovieId> {
        movies.iter().map(|m| m.id).collect()
    }

    #[test]
    fn test_two_correct_guesses_win() {
        let mut s = session(vec![movie(1, 100), movie(2, 50)]);

        let first = guess(&mut s, 1).unwrap();
        assert!(first.correct);
        assert_eq!(ids(&first.guessed), vec![1]);
        assert_eq!(first.strikes, 0);
        assert!(!first.terminal);
        assert_eq!(first.max_revenue, 100);

        let second = guess(&mut s, 2).unwrap();
        assert!(second.correct);
        assert_eq!(ids(&second.guessed), vec![1, 2]);
        assert_eq!(second.strikes, 0);
        assert!(second.terminal);
        assert_eq!(second.status, RoundStatus::Won);
        assert_eq!(second.max_revenue, 100);
        assert!(second.revealed_answers.is_none());
    }

    #[test]
    fn test_empty_answer_set_can_only_be_lost() {
        let mut s = session(vec![]);
        assert_eq!(s.status(), RoundStatus::Active);

        for expected_strikes in 1..=3 {
            let outcome = guess(&mut s, 100 + expected_strikes as u32).unwrap();
            assert!(!outcome.correct);
            assert_eq!(outcome.strikes, expected_strikes);
        }
        assert_eq!(s.status(), RoundStatus::Lost);
        assert_eq!(s.revealed_answers(), Some(&[][..]));
        assert_eq!(s.max_revenue(), 0);
    }

    #[test]
    fn test_duplicate_guess_is_rejected() {
        let mut s = session(vec![movie(1, 100), movie(2, 50)]);
        guess(&mut s, 1).unwrap();
        let before = s.clone();

        assert_eq!(guess(&mut s, 1), Err(InvalidGuess::AlreadyGuessed(1)));
        assert_eq!(s, before);
    }

    #[test]
    fn test_third_strike_reveals_answers() {
        let mut s = session(vec![movie(1, 100), movie(2, 50)]);
        guess(&mut s, 7).unwrap();
        guess(&mut s, 8).unwrap();
        assert_eq!(s.strikes(), 2);

        let outcome = guess(&mut s, 9).unwrap();
        assert!(!outcome.correct);
        assert_eq!(outcome.strikes, 3);
        assert!(outcome.terminal);
        assert_eq!(outcome.status, RoundStatus::Lost);
        assert_eq!(ids(&outcome.revealed_answers.unwrap()), vec![1, 2]);
        assert_eq!(outcome.max_revenue, 100);
    }

    #[test]
    fn test_validation_order() {
        let mut s = session(vec![movie(1, 100)]);
        assert_eq!(s.validate_guess("   "), Err(InvalidGuess::Empty));
        assert_eq!(
            s.validate_guess("abc"),
            Err(InvalidGuess::Malformed("abc".to_string()))
        );
        assert_eq!(s.validate_guess(" 42 "), Ok(42));

        guess(&mut s, 1).unwrap();
        assert!(s.is_terminal());
        // terminal is checked before anything else
        assert_eq!(s.validate_guess(""), Err(InvalidGuess::RoundOver));
        assert_eq!(s.validate_guess("1"), Err(InvalidGuess::RoundOver));
    }

    #[test]
    fn test_max_revenue_while_active_uses_guessed_only() {
        let mut s = session(vec![movie(1, 900), movie(2, 50), movie(3, 10)]);
        assert_eq!(s.max_revenue(), 0);
        guess(&mut s, 2).unwrap();
        assert_eq!(s.max_revenue(), 50);
    }

    #[test]
    fn test_session_serde_round_trip() {
        let mut s = session(vec![movie(1, 100), movie(2, 50)]);
        guess(&mut s, 2).unwrap();
        guess(&mut s, 99).unwrap();

        let json = serde_json::to_string(&s).unwrap();
        let back: GameSession = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
        assert!(back.answers().contains(1));
    }

    /// Random guess sequences against random answer sets
    #[test]
    fn test_state_machine_properties() {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..500 {
            let size = rng.random_range(0..=5);
            let answers: Vec<CuratedMovie> = (1..=size)
                .map(|id| movie(id, rng.random_range(0..1_000)))
                .collect();
            let mut s = session(answers);

            let mut prev_strikes = 0;
            for _ in 0..12 {
                let id = rng.random_range(1..=8);
                let before = s.clone();
                match guess(&mut s, id) {
                    Ok(outcome) => {
                        if outcome.correct {
                            assert_eq!(s.strikes(), prev_strikes);
                        } else {
                            assert_eq!(s.strikes(), prev_strikes + 1);
                        }
                    }
                    Err(_) => assert_eq!(s, before),
                }
                assert!(s.strikes() >= prev_strikes);
                assert!(s.strikes() <= MAX_STRIKES);
                prev_strikes = s.strikes();

                let all_found = s.guessed().len() == s.answers().len() && !s.guessed().is_empty();
                assert_eq!(s.status() == RoundStatus::Won, all_found);
                assert_eq!(s.status() == RoundStatus::Lost, s.strikes() == MAX_STRIKES);
            }
        }
    }
}
