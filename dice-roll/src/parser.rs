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

use crate::{
    dice_types::{DropPolicy, DroppingDice, Expression, Operation, SimpleDice},
    die::Die,
    errors::DiceParseError,
    tokenizer::Token,
};
use std::{convert::TryFrom, str::FromStr};

#[cfg(feature = "logging")]
use log::debug;

/// A finished dice term that has not been combined into the expression yet.
#[derive(Debug, Clone, Copy)]
enum PendingDice {
    Simple(SimpleDice),
    Dropping(DroppingDice),
}

impl From<PendingDice> for Expression {
    fn from(dice: PendingDice) -> Self {
        match dice {
            PendingDice::Simple(d) => Expression::Simple(d),
            PendingDice::Dropping(d) => Expression::Dropping(d),
        }
    }
}

#[derive(Debug, Default)]
struct ParserState {
    last_number: Option<u32>,
    last_dice: Option<PendingDice>,
    last_math_operator: Option<Operation>,
    /// operator directly in front of a drop marker
    drop_operator: Option<Operation>,
    is_parsing_die: bool,
}

impl ParserState {
    fn finish_die(&mut self, sides: u32) -> Result<(), DiceParseError> {
        if self.last_dice.is_some() {
            return Err(DiceParseError::ConsecutiveDiceExpressions);
        }
        let die = Die::try_from(sides)?;
        let count = self.last_number.take().unwrap_or(1);
        self.last_dice = Some(PendingDice::Simple(SimpleDice::new(die, count)?));
        self.is_parsing_die = false;
        Ok(())
    }

    fn drop_marker(&mut self, policy: DropPolicy) -> Result<(), DiceParseError> {
        let dice = match self.last_dice {
            Some(PendingDice::Simple(dice)) => dice,
            _ => return Err(DiceParseError::MissingSimpleDice),
        };
        if self.drop_operator.take() != Some(Operation::Sub) {
            return Err(DiceParseError::MissingMinus);
        }
        self.last_dice = Some(PendingDice::Dropping(DroppingDice { dice, policy }));
        Ok(())
    }

    /// Takes the pending term out of the accumulator.
    fn flush(&mut self) -> Result<Option<Expression>, DiceParseError> {
        match (self.last_number.take(), self.last_dice.take()) {
            (Some(_), Some(_)) => Err(DiceParseError::ConsecutiveNumbers),
            (Some(number), None) => Ok(Some(Expression::Constant(i64::from(number)))),
            (None, dice) => Ok(dice.map(Expression::from)),
        }
    }

    fn combine(
        &mut self,
        expression: Option<Expression>,
    ) -> Result<Option<Expression>, DiceParseError> {
        let lhs = match expression {
            Some(lhs) => lhs,
            None => return self.flush(),
        };
        let op = match self.last_math_operator {
            Some(op) => op,
            None => return Ok(Some(lhs)),
        };
        Ok(Some(match self.flush()? {
            Some(rhs) => {
                self.last_math_operator = None;
                Expression::compound(lhs, op, rhs)
            }
            None => lhs,
        }))
    }
}

/// Builds an expression from tokens, strictly left to right.
///
/// There is no operator precedence: `1+2x3` is `(1+2)x3`.
pub fn parse_tokens(tokens: &[Token]) -> Result<Option<Expression>, DiceParseError> {
    let mut state = ParserState::default();
    let mut expression: Option<Expression> = None;

    for (index, token) in tokens.iter().enumerate() {
        match *token {
            Token::Number(sides) if state.is_parsing_die => state.finish_die(sides)?,
            Token::Number(number) => {
                if state.last_number.is_some() {
                    return Err(DiceParseError::ConsecutiveNumbers);
                }
                state.last_number = Some(number);
            }
            Token::Percentile => state.finish_die(100)?,
            Token::Die => {
                if state.is_parsing_die {
                    return Err(DiceParseError::ConsecutiveDiceExpressions);
                }
                state.is_parsing_die = true;
            }
            Token::Drop(policy) => state.drop_marker(policy)?,
            Token::MathOperator(op) => {
                if state.is_parsing_die {
                    return Err(DiceParseError::MissingDieSides);
                }
                if let Some(Token::Drop(_)) = tokens.get(index + 1) {
                    state.drop_operator = Some(op);
                } else {
                    expression = state.combine(expression)?;
                    if state.last_math_operator.is_some() {
                        return Err(DiceParseError::ConsecutiveMathOperators);
                    }
                    state.last_math_operator = Some(op);
                }
            }
        }
    }

    expression = state.combine(expression)?;
    if state.is_parsing_die {
        return Err(DiceParseError::MissingDieSides);
    }
    if state.last_math_operator.is_some() {
        return Err(DiceParseError::MissingExpression);
    }

    #[cfg(feature = "logging")]
    {
        if let Some(e) = &expression {
            debug!("parsed {:?} into {}", tokens, e);
        }
    }

    Ok(expression)
}

impl FromStr for Expression {
    type Err = DiceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parse(s)?.ok_or(DiceParseError::MissingExpression)
    }
}
