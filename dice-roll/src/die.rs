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

use crate::errors::DiceParseError;
use std::{convert::TryFrom, fmt};

#[cfg(feature = "roll")]
use rand::{distributions::Uniform, Rng};

/// The physical dice a notation may refer to.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Die {
    D4,
    D6,
    D8,
    D10,
    D12,
    D20,
    D100,
}

impl Die {
    pub const ALL: [Die; 7] = [
        Die::D4,
        Die::D6,
        Die::D8,
        Die::D10,
        Die::D12,
        Die::D20,
        Die::D100,
    ];

    pub fn sides(self) -> u32 {
        match self {
            Die::D4 => 4,
            Die::D6 => 6,
            Die::D8 => 8,
            Die::D10 => 10,
            Die::D12 => 12,
            Die::D20 => 20,
            Die::D100 => 100,
        }
    }

    /// One uniform draw in `1..=sides`.
    #[cfg(feature = "roll")]
    pub fn roll<R: Rng>(self, rng: &mut R) -> i64 {
        rng.sample(Uniform::new_inclusive(1, i64::from(self.sides())))
    }
}

impl TryFrom<u32> for Die {
    type Error = DiceParseError;

    fn try_from(sides: u32) -> Result<Self, Self::Error> {
        Die::ALL
            .iter()
            .copied()
            .find(|die| die.sides() == sides)
            .ok_or(DiceParseError::InvalidDieSides(sides))
    }
}

impl fmt::Display for Die {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Die::D100 => write!(f, "d%"),
            die => write!(f, "d{}", die.sides()),
        }
    }
}
