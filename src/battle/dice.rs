//! Dice odds for the 2d6 target-number rolls the rules use everywhere

/// Number of ways two six-sided dice can total `sum`
fn ways(sum: i32) -> i32 {
    if (2..=12).contains(&sum) {
        6 - (sum - 7).abs()
    } else {
        0
    }
}

/// Probability that 2d6 rolls `target` or better
pub fn two_d6_at_least(target: i32) -> f64 {
    if target <= 2 {
        return 1.0;
    }
    if target > 12 {
        return 0.0;
    }
    let hits: i32 = (target..=12).map(ways).sum();
    hits as f64 / 36.0
}
