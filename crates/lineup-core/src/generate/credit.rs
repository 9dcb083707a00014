// Credit validation: the lineup's total cost must sit inside the window.

use super::AttemptError;
use crate::model::player::Player;
use crate::spec::CreditWindow;

/// Sum of member credits.
pub fn total_credits(players: &[&Player]) -> f64 {
    players.iter().map(|p| p.credits).sum()
}

/// Pass iff `window.min <= total <= window.max`. Returns the total on success.
pub fn check_credits(players: &[&Player], window: &CreditWindow) -> Result<f64, AttemptError> {
    let total = total_credits(players);
    if window.contains(total) {
        Ok(total)
    } else {
        Err(AttemptError::CreditsOutOfWindow {
            total,
            min: window.min,
            max: window.max,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
