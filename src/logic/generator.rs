//! Bracket generation: participant count → seeded first round with byes.

use crate::models::{BracketPlan, Match, Seed, Slot};

/// Generate the seeded single-elimination plan for `participant_count` entrants.
///
/// The first round pairs seeds in the classic order (1 vs lowest seed, 2 vs second
/// lowest, halves kept apart). Seeds above `participant_count` become byes.
/// Fewer than two participants yields a complete plan with no rounds.
pub fn generate_bracket(participant_count: usize) -> BracketPlan {
    if participant_count < 2 {
        return BracketPlan {
            participant_count,
            round_count: 0,
            bracket_size: 0,
            complete: true,
            matches: Vec::new(),
        };
    }

    let bracket_size = participant_count.next_power_of_two();
    let round_count = bracket_size.trailing_zeros() as usize;

    let mut pairs: Vec<(Seed, Seed)> = vec![(1, 2)];
    for round in 1..round_count {
        // Seeds paired in a bracket of size 2^(round+1) add up to this.
        let sum = (1 << (round + 1)) + 1;
        pairs = pairs
            .iter()
            .flat_map(|&(home, away)| [(home, sum - home), (sum - away, away)])
            .collect();
    }

    let matches = pairs
        .into_iter()
        .map(|(home, away)| {
            Match::new(
                into_bye(home, participant_count),
                into_bye(away, participant_count),
            )
        })
        .collect();

    log::debug!(
        "Generated bracket: {} participants, {} rounds, size {}, {} byes",
        participant_count,
        round_count,
        bracket_size,
        bracket_size - participant_count
    );

    BracketPlan {
        participant_count,
        round_count,
        bracket_size,
        complete: false,
        matches,
    }
}

fn into_bye(seed: Seed, participant_count: usize) -> Slot {
    (seed <= participant_count).then_some(seed)
}
