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

use crate::{dice_types::DropPolicy, dice_types::Operation, errors::DiceParseError};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Token {
    Number(u32),
    /// `%`, the hundred-sided die
    Percentile,
    Die,
    MathOperator(Operation),
    Drop(DropPolicy),
}

/// Splits notation text into tokens, skipping whitespace.
///
/// Fails on the first character that is not part of the notation.
pub fn tokenize(text: &str) -> Result<Vec<Token>, DiceParseError> {
    let mut tokens = Vec::new();
    let mut digits = String::new();
    for c in text.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        flush_number(&mut digits, &mut tokens)?;
        match c {
            '+' => tokens.push(Token::MathOperator(Operation::Add)),
            '-' => tokens.push(Token::MathOperator(Operation::Sub)),
            'x' | '*' => tokens.push(Token::MathOperator(Operation::Mul)),
            '/' => tokens.push(Token::MathOperator(Operation::Div)),
            'd' | 'D' => tokens.push(Token::Die),
            'L' => tokens.push(Token::Drop(DropPolicy::Lowest)),
            'H' => tokens.push(Token::Drop(DropPolicy::Highest)),
            '%' => tokens.push(Token::Percentile),
            c if c.is_whitespace() => {}
            c => return Err(DiceParseError::InvalidCharacter(c)),
        }
    }
    flush_number(&mut digits, &mut tokens)?;
    Ok(tokens)
}

fn flush_number(digits: &mut String, tokens: &mut Vec<Token>) -> Result<(), DiceParseError> {
    if !digits.is_empty() {
        let number = digits
            .parse::<u32>()
            .map_err(|_| DiceParseError::NumberOutOfRange(digits.clone()))?;
        tokens.push(Token::Number(number));
        digits.clear();
    }
    Ok(())
}
