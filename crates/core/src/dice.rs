//! Dice notation parsing and seeded rolling ("NdS", "NdS+M", "NdS-M", "M").

use std::fmt;
use std::str::FromStr;

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::Rng;
use tracing::error;

const MAX_DICE: u32 = 100;
const MAX_SIDES: u32 = 1000;
const MAX_MODIFIER: i32 = 1000;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DiceError {
    #[error("empty dice notation")]
    Empty,
    #[error("malformed dice notation `{0}`")]
    Malformed(String),
    #[error("dice count {0} outside 1..=100")]
    CountOutOfRange(u32),
    #[error("die size {0} outside 1..=1000")]
    SidesOutOfRange(u32),
    #[error("modifier {0} outside -1000..=1000")]
    ModifierOutOfRange(i32),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DiceExpr {
    pub count: u32,
    pub sides: u32,
    pub modifier: i32,
}

impl DiceExpr {
    pub const fn flat(modifier: i32) -> Self {
        Self { count: 0, sides: 0, modifier }
    }

    pub fn parse(notation: &str) -> Result<Self, DiceError> {
        let text: String = notation.chars().filter(|c| !c.is_whitespace()).collect();
        if text.is_empty() {
            return Err(DiceError::Empty);
        }
        let malformed = || DiceError::Malformed(notation.to_string());

        let Some(d_idx) = text.find(['d', 'D']) else {
            let modifier = text.parse::<i32>().map_err(|_| malformed())?;
            check_modifier(modifier)?;
            return Ok(Self::flat(modifier));
        };

        let (count_text, rest) = text.split_at(d_idx);
        let rest = &rest[1..];
        let count = if count_text.is_empty() {
            1
        } else {
            count_text.parse::<u32>().map_err(|_| malformed())?
        };

        let (sides_text, modifier) = match rest.find(['+', '-']) {
            Some(sign_idx) => {
                let (sides_text, modifier_text) = rest.split_at(sign_idx);
                let modifier = modifier_text.parse::<i32>().map_err(|_| malformed())?;
                (sides_text, modifier)
            }
            None => (rest, 0),
        };
        let sides = sides_text.parse::<u32>().map_err(|_| malformed())?;

        if !(1..=MAX_DICE).contains(&count) {
            return Err(DiceError::CountOutOfRange(count));
        }
        if !(1..=MAX_SIDES).contains(&sides) {
            return Err(DiceError::SidesOutOfRange(sides));
        }
        check_modifier(modifier)?;
        Ok(Self { count, sides, modifier })
    }

    pub fn min(&self) -> i32 {
        (self.count as i32).saturating_add(self.modifier)
    }

    pub fn max(&self) -> i32 {
        (self.count.saturating_mul(self.sides) as i32).saturating_add(self.modifier)
    }

    pub fn roll(&self, rng: &mut ChaCha8Rng) -> i32 {
        let mut total = self.modifier;
        for _ in 0..self.count {
            let face = (rng.next_u64() % u64::from(self.sides)) as i32 + 1;
            total = total.saturating_add(face);
        }
        total
    }
}

fn check_modifier(modifier: i32) -> Result<(), DiceError> {
    if (-MAX_MODIFIER..=MAX_MODIFIER).contains(&modifier) {
        Ok(())
    } else {
        Err(DiceError::ModifierOutOfRange(modifier))
    }
}

impl FromStr for DiceExpr {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DiceExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count == 0 {
            return write!(f, "{}", self.modifier);
        }
        write!(f, "{}d{}", self.count, self.sides)?;
        match self.modifier {
            0 => Ok(()),
            m if m > 0 => write!(f, "+{m}"),
            m => write!(f, "{m}"),
        }
    }
}

/// Rolls `notation`, yielding 0 (and logging) when it does not parse.
pub fn roll_dice_from_string(notation: &str, rng: &mut ChaCha8Rng) -> i32 {
    match DiceExpr::parse(notation) {
        Ok(expr) => expr.roll(rng),
        Err(err) => {
            error!(notation, %err, "roll_dice_from_string: rejected notation");
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use rand_chacha::rand_core::SeedableRng;

    use super::*;

    #[test]
    fn parses_common_forms() {
        assert_eq!(DiceExpr::parse("3d8").unwrap(), DiceExpr { count: 3, sides: 8, modifier: 0 });
        assert_eq!(
            DiceExpr::parse("1d20+5").unwrap(),
            DiceExpr { count: 1, sides: 20, modifier: 5 }
        );
        assert_eq!(
            DiceExpr::parse("2d6-1").unwrap(),
            DiceExpr { count: 2, sides: 6, modifier: -1 }
        );
        assert_eq!(DiceExpr::parse("d4").unwrap(), DiceExpr { count: 1, sides: 4, modifier: 0 });
        assert_eq!(DiceExpr::parse(" 4 ").unwrap(), DiceExpr::flat(4));
        assert_eq!(DiceExpr::parse("2D10").unwrap().sides, 10);
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(DiceExpr::parse(""), Err(DiceError::Empty));
        assert!(matches!(DiceExpr::parse("xd6"), Err(DiceError::Malformed(_))));
        assert!(matches!(DiceExpr::parse("2d"), Err(DiceError::Malformed(_))));
        assert!(matches!(DiceExpr::parse("2d6+"), Err(DiceError::Malformed(_))));
        assert_eq!(DiceExpr::parse("0d6"), Err(DiceError::CountOutOfRange(0)));
        assert_eq!(DiceExpr::parse("1d0"), Err(DiceError::SidesOutOfRange(0)));
    }

    #[test]
    fn rolls_stay_within_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let expr = DiceExpr::parse("3d8+5").unwrap();
        assert_eq!((expr.min(), expr.max()), (8, 29));
        for _ in 0..500 {
            let value = expr.roll(&mut rng);
            assert!((8..=29).contains(&value), "{value} out of range");
        }
    }

    #[test]
    fn same_seed_same_rolls() {
        let mut a = ChaCha8Rng::seed_from_u64(99);
        let mut b = ChaCha8Rng::seed_from_u64(99);
        let expr = DiceExpr::parse("4d6").unwrap();
        let left: Vec<i32> = (0..20).map(|_| expr.roll(&mut a)).collect();
        let right: Vec<i32> = (0..20).map(|_| expr.roll(&mut b)).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn malformed_string_rolls_zero() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(roll_dice_from_string("banana", &mut rng), 0);
        assert_eq!(roll_dice_from_string("5", &mut rng), 5);
    }

    #[test]
    fn oversized_modifier_is_rejected_not_rolled() {
        assert_eq!(
            DiceExpr::parse("1d6+2147483647"),
            Err(DiceError::ModifierOutOfRange(i32::MAX))
        );
        assert_eq!(DiceExpr::parse("-5000"), Err(DiceError::ModifierOutOfRange(-5000)));
        assert_eq!(DiceExpr::parse("1d6-1000").unwrap().modifier, -1000);

        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert_eq!(roll_dice_from_string("1d6+2147483647", &mut rng), 0);
    }

    #[test]
    fn hand_built_extremes_saturate() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let expr = DiceExpr { count: 100, sides: 1000, modifier: i32::MAX };
        assert_eq!(expr.roll(&mut rng), i32::MAX);
        assert_eq!(expr.max(), i32::MAX);
        assert_eq!(DiceExpr::flat(i32::MIN).min(), i32::MIN);
    }

    #[test]
    fn display_round_trips_notation() {
        for text in ["3d8", "1d20+5", "2d6-1", "7"] {
            assert_eq!(DiceExpr::parse(text).unwrap().to_string(), text);
        }
    }
}
