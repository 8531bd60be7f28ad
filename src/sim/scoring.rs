//! Shot outcome classification and scoring

use serde::{Deserialize, Serialize};

use super::state::SessionState;
use super::world::FlightResolution;
use crate::tuning::ScoringTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotOutcome {
    Hit,
    Miss,
    OutOfBounds,
}

impl From<FlightResolution> for ShotOutcome {
    fn from(resolution: FlightResolution) -> Self {
        match resolution {
            FlightResolution::Scored => ShotOutcome::Hit,
            FlightResolution::Stopped => ShotOutcome::Miss,
            FlightResolution::OutOfBounds => ShotOutcome::OutOfBounds,
        }
    }
}

/// Bounce bonus tiers (mutually exclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotBonus {
    /// Straight in
    NoBounce,
    /// Exactly one bounce
    BankShot,
    /// Two or more bounces
    TrickShot,
}

impl ShotBonus {
    pub fn for_bounces(bounce_count: u32) -> Self {
        match bounce_count {
            0 => ShotBonus::NoBounce,
            1 => ShotBonus::BankShot,
            _ => ShotBonus::TrickShot,
        }
    }

    pub fn points(&self, scoring: &ScoringTuning) -> u64 {
        match self {
            ShotBonus::NoBounce => scoring.no_bounce_bonus,
            ShotBonus::BankShot => scoring.bank_shot_bonus,
            ShotBonus::TrickShot => scoring.trick_shot_bonus,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ShotBonus::NoBounce => "Nothing but glass!",
            ShotBonus::BankShot => "Bank shot!",
            ShotBonus::TrickShot => "Trick shot!",
        }
    }
}

/// Result of one resolved throw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotRecord {
    pub outcome: ShotOutcome,
    pub bounce_count: u32,
    pub points_awarded: u64,
    pub bonus: Option<ShotBonus>,
    pub combo_multiplier: f32,
    /// Thrown while a crowd bump was active (informational, no points)
    pub crowd_bump: bool,
}

/// Multiplier for the given streak, clamped to the last table entry
pub fn combo_multiplier(table: &[f32], streak: u32) -> f32 {
    match table.len() {
        0 => 1.0,
        len => table[(streak as usize).min(len - 1)],
    }
}

/// Score a resolved flight against the current session
pub fn classify(
    resolution: FlightResolution,
    bounce_count: u32,
    crowd_bump: bool,
    session: &SessionState,
    scoring: &ScoringTuning,
) -> ShotRecord {
    let outcome = ShotOutcome::from(resolution);
    if outcome != ShotOutcome::Hit {
        return ShotRecord {
            outcome,
            bounce_count,
            points_awarded: 0,
            bonus: None,
            combo_multiplier: 1.0,
            crowd_bump,
        };
    }

    let multiplier = combo_multiplier(&scoring.combo_multipliers, session.combo_streak);
    let bonus = ShotBonus::for_bounces(bounce_count);
    let points = (scoring.successful_shot as f32 * multiplier).round() as u64 + bonus.points(scoring);

    ShotRecord {
        outcome,
        bounce_count,
        points_awarded: points,
        bonus: Some(bonus),
        combo_multiplier: multiplier,
        crowd_bump,
    }
}

/// Apply a shot to the session counters
pub fn apply_shot(session: &mut SessionState, record: &ShotRecord) {
    match record.outcome {
        ShotOutcome::Hit => {
            session.score += record.points_awarded;
            session.shots_made += 1;
            session.combo_streak += 1;
        }
        ShotOutcome::Miss | ShotOutcome::OutOfBounds => {
            session.combo_streak = 0;
        }
    }
}

/// Level-complete bonus for using few balls
pub fn efficiency_bonus(session: &SessionState, scoring: &ScoringTuning) -> u64 {
    if session.balls_used() < scoring.efficient_threshold {
        scoring.efficient_bonus
    } else {
        0
    }
}
