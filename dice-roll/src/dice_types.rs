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

use crate::{die::Die, errors::DiceParseError};
use std::{convert::TryFrom, fmt};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum DropPolicy {
    Lowest,
    Highest,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Operation {
    Add,
    Sub,
    Mul,
    Div,
}

/// Most dice a single term may roll.
pub const MAX_DICE_COUNT: u32 = 1000;

/// `count` independent draws of one die.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct SimpleDice {
    die: Die,
    count: u32,
}

impl SimpleDice {
    pub fn new(die: Die, count: u32) -> Result<SimpleDice, DiceParseError> {
        if count == 0 {
            Err(DiceParseError::InvalidDieCount)
        } else if count > MAX_DICE_COUNT {
            Err(DiceParseError::TooManyDice(count))
        } else {
            Ok(SimpleDice { die, count })
        }
    }

    pub fn die(&self) -> Die {
        self.die
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

/// A [`SimpleDice`] term that discards its lowest or highest draw.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct DroppingDice {
    pub dice: SimpleDice,
    pub policy: DropPolicy,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Expression {
    Constant(i64),
    Simple(SimpleDice),
    Dropping(DroppingDice),
    Compound(Box<Expression>, Operation, Box<Expression>),
}

impl Expression {
    pub fn compound(lhs: Expression, op: Operation, rhs: Expression) -> Expression {
        Expression::Compound(Box::new(lhs), op, Box::new(rhs))
    }

    /// Whether the rendered notation parses back into this exact tree.
    ///
    /// Notation has no parentheses and no signed literals, so right-nested
    /// compounds and negative or oversized constants cannot be written down.
    pub fn has_notation(&self) -> bool {
        match self {
            Expression::Constant(modifier) => u32::try_from(*modifier).is_ok(),
            Expression::Simple(_) | Expression::Dropping(_) => true,
            Expression::Compound(lhs, _, rhs) => {
                !matches!(**rhs, Expression::Compound(..))
                    && lhs.has_notation()
                    && rhs.has_notation()
            }
        }
    }
}

impl From<SimpleDice> for Expression {
    fn from(dice: SimpleDice) -> Self {
        Expression::Simple(dice)
    }
}

impl From<DroppingDice> for Expression {
    fn from(dice: DroppingDice) -> Self {
        Expression::Dropping(dice)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Add => "+",
            Operation::Sub => "-",
            Operation::Mul => "x",
            Operation::Div => "/",
        })
    }
}

impl fmt::Display for DropPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DropPolicy::Lowest => "L",
            DropPolicy::Highest => "H",
        })
    }
}

impl fmt::Display for SimpleDice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count == 1 {
            write!(f, "{}", self.die)
        } else {
            write!(f, "{}{}", self.count, self.die)
        }
    }
}

impl fmt::Display for DroppingDice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.dice, self.policy)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Constant(modifier) => write!(f, "{}", modifier),
            Expression::Simple(dice) => write!(f, "{}", dice),
            Expression::Dropping(dice) => write!(f, "{}", dice),
            Expression::Compound(lhs, op, rhs) => write!(f, "{}{}{}", lhs, op, rhs),
        }
    }
}
