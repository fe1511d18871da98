use crate::model::{Sequence, SEQUENCE_LENGTH};

/// Number of positions where `guess` and `hidden` hold the same symbol. Misplaced symbols
/// earn nothing.
pub fn evaluate(guess: &Sequence, hidden: &Sequence) -> usize {
    guess
        .iter()
        .zip(hidden.iter())
        .filter(|(g, h)| g == h)
        .count()
}

/// Per-position match flags; the aggregate of these is [`evaluate`]
pub fn position_matches(guess: &Sequence, hidden: &Sequence) -> [bool; SEQUENCE_LENGTH] {
    let mut matches = [false; SEQUENCE_LENGTH];
    for (index, flag) in matches.iter_mut().enumerate() {
        *flag = guess.get(index) == hidden.get(index);
    }
    matches
}
