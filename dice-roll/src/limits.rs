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

use crate::{dice_types::*, die::Die};

/// Smallest and largest result an expression can produce.
pub trait DiceLimits {
    fn min(&self) -> i64;
    fn max(&self) -> i64;
}

impl DiceLimits for Die {
    fn min(&self) -> i64 {
        1
    }

    fn max(&self) -> i64 {
        i64::from(self.sides())
    }
}

impl DiceLimits for SimpleDice {
    fn min(&self) -> i64 {
        i64::from(self.count()) * self.die().min()
    }

    fn max(&self) -> i64 {
        i64::from(self.count()) * self.die().max()
    }
}

impl DiceLimits for DroppingDice {
    fn min(&self) -> i64 {
        i64::from(self.dice.count() - 1) * self.dice.die().min()
    }

    fn max(&self) -> i64 {
        i64::from(self.dice.count() - 1) * self.dice.die().max()
    }
}

/// Interval arithmetic over the two operand ranges.
fn bounds(lhs: (i64, i64), op: Operation, rhs: (i64, i64)) -> (i64, i64) {
    let candidates: Vec<i64> = match op {
        Operation::Add => vec![lhs.0.saturating_add(rhs.0), lhs.1.saturating_add(rhs.1)],
        Operation::Sub => vec![lhs.0.saturating_sub(rhs.1), lhs.1.saturating_sub(rhs.0)],
        Operation::Mul => vec![
            lhs.0.saturating_mul(rhs.0),
            lhs.0.saturating_mul(rhs.1),
            lhs.1.saturating_mul(rhs.0),
            lhs.1.saturating_mul(rhs.1),
        ],
        Operation::Div => {
            let mut divisors = vec![rhs.0, rhs.1];
            if rhs.0 <= -1 && -1 <= rhs.1 {
                divisors.push(-1);
            }
            if rhs.0 <= 1 && 1 <= rhs.1 {
                divisors.push(1);
            }
            divisors
                .into_iter()
                .filter(|d| *d != 0)
                .flat_map(|d| vec![lhs.0.saturating_div(d), lhs.1.saturating_div(d)])
                .collect()
        }
    };
    match (candidates.iter().min(), candidates.iter().max()) {
        (Some(min), Some(max)) => (*min, *max),
        // every possible divisor is zero
        _ => (0, 0),
    }
}

impl Expression {
    fn limits(&self) -> (i64, i64) {
        match self {
            Expression::Constant(modifier) => (*modifier, *modifier),
            Expression::Simple(dice) => (dice.min(), dice.max()),
            Expression::Dropping(dice) => (dice.min(), dice.max()),
            Expression::Compound(lhs, op, rhs) => bounds(lhs.limits(), *op, rhs.limits()),
        }
    }
}

impl DiceLimits for Expression {
    fn min(&self) -> i64 {
        self.limits().0
    }

    fn max(&self) -> i64 {
        self.limits().1
    }
}
