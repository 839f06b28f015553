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

use thiserror::Error;

/// Everything that can go wrong while turning notation text into an
/// [`Expression`](crate::Expression). Parsing is all or nothing.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum DiceParseError {
    #[error("invalid character '{0}'")]
    InvalidCharacter(char),
    #[error("number {0} is too large")]
    NumberOutOfRange(String),
    #[error("there is no d{0}, allowed are d4, d6, d8, d10, d12, d20 and d100")]
    InvalidDieSides(u32),
    #[error("a dice term needs to roll at least one die")]
    InvalidDieCount,
    #[error("cannot roll {0} dice at once, at most 1000 are allowed")]
    TooManyDice(u32),
    #[error("drop marker must follow a '-'")]
    MissingMinus,
    #[error("drop marker must follow a plain dice term like 4d6")]
    MissingSimpleDice,
    #[error("die marker is missing its number of sides")]
    MissingDieSides,
    #[error("operator is missing its right hand side")]
    MissingExpression,
    #[error("two numbers without an operator between them")]
    ConsecutiveNumbers,
    #[error("two operators in a row")]
    ConsecutiveMathOperators,
    #[error("two dice terms without an operator between them")]
    ConsecutiveDiceExpressions,
}
