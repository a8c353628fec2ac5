use crate::council::domain::{ConsensusSignal, OpinionSet, Vote, VoteTally};

const SEATS: f64 = 3.0;

/// Aggregate the three votes into a consensus signal.
///
/// Majority wins when at least two seats agree. With three seats over a
/// three-way vote set the tally is (3), (2,1), or (1,1,1); a two-way tie
/// cannot occur. A full three-way split resolves to Escalate with agreement
/// strength zero.
///
/// Agreement strength is the majority share scaled to 100, discounted by the
/// majority's own average confidence: three agents agreeing without
/// conviction carry no more weight than their conviction allows.
pub(crate) fn aggregate(opinions: &OpinionSet) -> ConsensusSignal {
    let mut tally = VoteTally::default();
    for opinion in opinions.iter() {
        match opinion.vote {
            Vote::Approve => tally.approve += 1,
            Vote::Reject => tally.reject += 1,
            Vote::Escalate => tally.escalate += 1,
        }
    }

    let (leading, majority_count) = [Vote::Approve, Vote::Reject, Vote::Escalate]
        .into_iter()
        .map(|vote| (vote, tally.count(vote)))
        .max_by_key(|&(_, count)| count)
        .unwrap_or((Vote::Escalate, 0));

    if majority_count < 2 {
        return ConsensusSignal {
            leading: Vote::Escalate,
            tally,
            agreement: 0.0,
            unanimous: false,
        };
    }

    let majority_confidence: f64 = opinions
        .iter()
        .filter(|opinion| opinion.vote == leading)
        .map(|opinion| opinion.confidence)
        .sum::<f64>()
        / f64::from(majority_count);

    let share = f64::from(majority_count) / SEATS * 100.0;
    let discount = majority_confidence / 100.0;

    ConsensusSignal {
        leading,
        tally,
        agreement: (share * discount).clamp(0.0, 100.0),
        unanimous: majority_count == 3,
    }
}
