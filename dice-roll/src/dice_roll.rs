/*
Copyright 2021 Robin Marchart

   Licensed under the Apache License, Version 2.0 (the "License");
   you may not use this file except in compliance with the License.
   You may obtain a copy of the License at

       http://www.apache.org/licenses/LICENSE-2.0

   Unless required by applicable law or agreed to in writing, software
   distributed under the License is distributed on an "AS IS" BASIS,
   WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
   See the License for the specific language governing permissions and
   limitations under the License.
*/

use crate::dice_types::*;
use rand::Rng;
use std::fmt;
use thiserror::Error;

#[cfg(feature = "logging")]
use log::debug;

#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum EvaluationError {
    #[error("division by zero")]
    DivideByZero,
    #[error("result does not fit into a 64 bit integer")]
    Overflow,
}

/// The outcome of evaluating an expression once.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Roll {
    pub result: i64,
    /// the intermediate values, e.g. `(4 + 1 + 5) - 1`
    pub description: String,
}

impl fmt::Display for Roll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.description, self.result)
    }
}

pub trait DiceEvaluate {
    fn roll<R: Rng>(&self, rng: &mut R) -> Result<Roll, EvaluationError>;
}

impl SimpleDice {
    /// All draws in the order they were rolled.
    pub fn draw<R: Rng>(&self, rng: &mut R) -> Vec<i64> {
        let die = self.die();
        (0..self.count()).map(|_| die.roll(rng)).collect()
    }
}

fn describe_draws(draws: &[i64]) -> String {
    match draws {
        [single] => single.to_string(),
        _ => format!(
            "({})",
            draws
                .iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>()
                .join(" + ")
        ),
    }
}

/// Position of the draw to discard. Ties go to the earliest draw.
pub(crate) fn dropped_index(draws: &[i64], policy: DropPolicy) -> Option<usize> {
    let mut selected: Option<usize> = None;
    for (index, value) in draws.iter().enumerate() {
        selected = match selected {
            Some(current) => {
                let replace = match policy {
                    DropPolicy::Lowest => *value < draws[current],
                    DropPolicy::Highest => *value > draws[current],
                };
                if replace {
                    Some(index)
                } else {
                    Some(current)
                }
            }
            None => Some(index),
        };
    }
    selected
}

impl DiceEvaluate for SimpleDice {
    fn roll<R: Rng>(&self, rng: &mut R) -> Result<Roll, EvaluationError> {
        let draws = self.draw(rng);

        #[cfg(feature = "logging")]
        {
            debug!("Dice roll result for {} is {:?}", &self, &draws);
        }

        Ok(Roll {
            result: draws.iter().sum(),
            description: describe_draws(&draws),
        })
    }
}

impl DiceEvaluate for DroppingDice {
    fn roll<R: Rng>(&self, rng: &mut R) -> Result<Roll, EvaluationError> {
        let draws = self.dice.draw(rng);
        let dropped = dropped_index(&draws, self.policy)
            .map(|index| draws[index])
            .unwrap_or(0);

        #[cfg(feature = "logging")]
        {
            debug!("rolled {:?} for {}, dropping {}", &draws, &self, dropped);
        }

        Ok(Roll {
            result: draws.iter().sum::<i64>() - dropped,
            description: format!("{} - {}", describe_draws(&draws), dropped),
        })
    }
}

impl DiceEvaluate for Expression {
    fn roll<R: Rng>(&self, rng: &mut R) -> Result<Roll, EvaluationError> {
        let result = match self {
            Expression::Constant(modifier) => Ok(Roll {
                result: *modifier,
                description: modifier.to_string(),
            }),
            Expression::Simple(dice) => dice.roll(rng),
            Expression::Dropping(dice) => dice.roll(rng),
            Expression::Compound(lhs, op, rhs) => {
                let left_r = lhs.roll(rng)?;
                let right_r = rhs.roll(rng)?;
                let result = match op {
                    Operation::Add => left_r
                        .result
                        .checked_add(right_r.result)
                        .ok_or(EvaluationError::Overflow),
                    Operation::Sub => left_r
                        .result
                        .checked_sub(right_r.result)
                        .ok_or(EvaluationError::Overflow),
                    Operation::Mul => left_r
                        .result
                        .checked_mul(right_r.result)
                        .ok_or(EvaluationError::Overflow),
                    Operation::Div if right_r.result == 0 => Err(EvaluationError::DivideByZero),
                    Operation::Div => left_r
                        .result
                        .checked_div(right_r.result)
                        .ok_or(EvaluationError::Overflow),
                }?;
                Ok(Roll {
                    result,
                    description: format!("{} {} {}", left_r.description, op, right_r.description),
                })
            }
        };
        #[cfg(feature = "logging")]
        {
            debug!("got {:?} for term {}", &result, &self)
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{die::Die, limits::DiceLimits, parse};
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn rng(seed: u64) -> Xoshiro256PlusPlus {
        Xoshiro256PlusPlus::seed_from_u64(seed)
    }

    fn parsed(notation: &str) -> Expression {
        parse(notation).unwrap().unwrap()
    }

    /// Splits `(a + b + c) - d` into the draws and the dropped value.
    fn split_dropping_description(description: &str) -> (Vec<i64>, i64) {
        let (draws, dropped) = description.rsplit_once(" - ").unwrap();
        let draws = draws
            .trim_start_matches('(')
            .trim_end_matches(')')
            .split(" + ")
            .map(|d| d.parse().unwrap())
            .collect();
        (draws, dropped.parse().unwrap())
    }

    #[test]
    fn test_constant() {
        let roll = Expression::Constant(-3).roll(&mut rng(0)).unwrap();
        assert_eq!(
            roll,
            Roll {
                result: -3,
                description: "-3".to_string()
            }
        );
    }

    #[test]
    fn test_d12_range() {
        let expression = parsed("d12");
        let mut rng = rng(12);
        for _ in 0..1024 {
            let roll = expression.roll(&mut rng).unwrap();
            assert!((1..=12).contains(&roll.result));
            assert_eq!(roll.description, roll.result.to_string());
        }
    }

    #[test]
    fn test_2d10_range_and_mean() {
        let expression = parsed("2d10");
        let mut rng = rng(10);
        let trials = 4096;
        let mut total = 0;
        for _ in 0..trials {
            let roll = expression.roll(&mut rng).unwrap();
            assert!((2..=20).contains(&roll.result));
            assert!(roll.description.starts_with('(') && roll.description.ends_with(')'));
            total += roll.result;
        }
        let mean = total as f64 / trials as f64;
        assert!((mean - 11.0).abs() < 0.5, "mean was {}", mean);
    }

    #[test]
    fn test_simple_ranges_and_means() {
        let mut rng = rng(99);
        for die in Die::ALL.iter() {
            for count in 1..=4u32 {
                let dice = SimpleDice::new(*die, count).unwrap();
                let sides = i64::from(die.sides());
                let trials = 2000;
                let mut total = 0;
                for _ in 0..trials {
                    let roll = dice.roll(&mut rng).unwrap();
                    assert!(roll.result >= i64::from(count));
                    assert!(roll.result <= i64::from(count) * sides);
                    assert!(roll.result >= dice.min() && roll.result <= dice.max());
                    total += roll.result;
                }
                let mean = total as f64 / trials as f64;
                let expected = f64::from(count) * (sides as f64 + 1.0) / 2.0;
                assert!(
                    (mean - expected).abs() < expected * 0.1,
                    "{} mean {} expected {}",
                    dice,
                    mean,
                    expected
                );
            }
        }
    }

    #[test]
    fn test_drop_lowest() {
        let expression = parsed("4d6-L");
        let mut rng = rng(6);
        for _ in 0..1024 {
            let roll = expression.roll(&mut rng).unwrap();
            assert!((3..=18).contains(&roll.result));
            let (draws, dropped) = split_dropping_description(&roll.description);
            assert_eq!(draws.len(), 4);
            assert_eq!(dropped, *draws.iter().min().unwrap());
            assert_eq!(roll.result, draws.iter().sum::<i64>() - dropped);
        }
    }

    #[test]
    fn test_drop_highest() {
        let expression = parsed("4d6-H");
        let mut rng = rng(7);
        for _ in 0..1024 {
            let roll = expression.roll(&mut rng).unwrap();
            let (draws, dropped) = split_dropping_description(&roll.description);
            assert_eq!(dropped, *draws.iter().max().unwrap());
            assert_eq!(roll.result, draws.iter().sum::<i64>() - dropped);
        }
    }

    #[test]
    fn test_drop_single_die() {
        let roll = parsed("d20-L").roll(&mut rng(1)).unwrap();
        assert_eq!(roll.result, 0);
        let (draws, dropped) = split_dropping_description(&roll.description);
        assert_eq!(draws, vec![dropped]);
    }

    #[test]
    fn test_dropped_index_ties() {
        assert_eq!(dropped_index(&[3, 1, 5, 1], DropPolicy::Lowest), Some(1));
        assert_eq!(dropped_index(&[6, 2, 6], DropPolicy::Highest), Some(0));
        assert_eq!(dropped_index(&[4, 4, 4, 4], DropPolicy::Lowest), Some(0));
        assert_eq!(dropped_index(&[1, 2, 3], DropPolicy::Highest), Some(2));
        assert_eq!(dropped_index(&[], DropPolicy::Lowest), None);
    }

    #[test]
    fn test_compound_constants() {
        let roll = parsed("1+3").roll(&mut rng(0)).unwrap();
        assert_eq!(roll.description, "1 + 3");
        assert_eq!(roll.result, 4);
        let roll = parsed("2x3-1").roll(&mut rng(0)).unwrap();
        assert_eq!(roll.description, "2 x 3 - 1");
        assert_eq!(roll.result, 5);
    }

    #[test]
    fn test_compound_left_before_right() {
        let mut expected_rng = rng(20);
        let first = Die::D20.roll(&mut expected_rng);
        let second = Die::D8.roll(&mut expected_rng);
        let roll = parsed("d20+d8").roll(&mut rng(20)).unwrap();
        assert_eq!(roll.description, format!("{} + {}", first, second));
        assert_eq!(roll.result, first + second);
    }

    #[test]
    fn test_same_seed_same_roll() {
        let expression = parsed("3d4-H+d12-2+5");
        assert_eq!(
            expression.roll(&mut rng(3)).unwrap(),
            expression.roll(&mut rng(3)).unwrap()
        );
    }

    #[test]
    fn test_division_truncates() {
        assert_eq!(parsed("7/2").roll(&mut rng(0)).unwrap().result, 3);
        assert_eq!(parsed("1/4").roll(&mut rng(0)).unwrap().result, 0);
        let negative = Expression::compound(
            Expression::Constant(-7),
            Operation::Div,
            Expression::Constant(2),
        );
        assert_eq!(negative.roll(&mut rng(0)).unwrap().result, -3);
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(
            parsed("d6/0").roll(&mut rng(0)),
            Err(EvaluationError::DivideByZero)
        );
        assert_eq!(
            parsed("d6/d4-L").roll(&mut rng(0)),
            Err(EvaluationError::DivideByZero)
        );
    }

    #[test]
    fn test_overflow() {
        let sum = Expression::compound(
            Expression::Constant(i64::MAX),
            Operation::Add,
            Expression::Constant(1),
        );
        assert_eq!(sum.roll(&mut rng(0)), Err(EvaluationError::Overflow));
        let quotient = Expression::compound(
            Expression::Constant(i64::MIN),
            Operation::Div,
            Expression::Constant(-1),
        );
        assert_eq!(quotient.roll(&mut rng(0)), Err(EvaluationError::Overflow));
    }

    #[test]
    fn test_largest_term_stays_bounded() {
        let roll = parsed("1000d%").roll(&mut rng(8)).unwrap();
        assert!((1000..=100_000).contains(&roll.result));
        assert_eq!(roll.description.matches(" + ").count(), 999);
        assert!(roll.description.len() < 4 * 1000 + 3 * 999 + 2);
    }

    #[test]
    fn test_expression_is_untouched() {
        let expression = parsed("2d8+d4");
        let copy = expression.clone();
        let mut rng = rng(5);
        for _ in 0..10 {
            expression.roll(&mut rng).unwrap();
        }
        assert_eq!(expression, copy);
    }
}
