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

#[cfg(feature = "serde")]
pub mod decode;
#[cfg(feature = "roll")]
pub mod dice_roll;
pub mod dice_types;
pub mod die;
pub mod errors;
pub mod limits;
pub mod parser;
pub mod tokenizer;

pub use dice_types::*;
pub use die::Die;
pub use errors::DiceParseError;

#[cfg(feature = "roll")]
pub use dice_roll::{DiceEvaluate, EvaluationError, Roll};

/// Tokenizes and parses a notation string in one go.
///
/// Returns `Ok(None)` when the input contains no tokens at all.
pub fn parse(notation: &str) -> Result<Option<Expression>, DiceParseError> {
    let tokens = tokenizer::tokenize(notation)?;
    parser::parse_tokens(&tokens)
}
