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

//! A dice field in structured data is either a raw non-negative integer
//! (a constant) or a notation string. Encoding always writes the notation.

use crate::{dice_types::Expression, errors::DiceParseError};
use serde::{
    de::{self, Visitor},
    ser,
    Deserialize, Deserializer, Serialize, Serializer,
};
use std::{convert::TryFrom, fmt};

fn decode_error<E: de::Error>(detail: impl fmt::Display) -> E {
    E::custom(format_args!("could not decode dice value: {}", detail))
}

impl Serialize for Expression {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if !self.has_notation() {
            return Err(ser::Error::custom(format_args!(
                "{:?} has no dice notation",
                self
            )));
        }
        serializer.collect_str(self)
    }
}

struct ExpressionVisitor;

impl<'de> Visitor<'de> for ExpressionVisitor {
    type Value = Expression;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a dice value (non-negative integer or dice notation)")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Expression, E> {
        i64::try_from(v)
            .map(Expression::Constant)
            .map_err(|_| decode_error(format_args!("{} is too large", v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Expression, E> {
        if v < 0 {
            Err(decode_error(format_args!("{} is negative", v)))
        } else {
            Ok(Expression::Constant(v))
        }
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Expression, E> {
        v.parse()
            .map_err(|e: DiceParseError| decode_error(format_args!("\"{}\": {}", v, e)))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Expression, E> {
        Err(decode_error(de::Unexpected::Bool(v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Expression, E> {
        Err(decode_error(de::Unexpected::Float(v)))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Expression, E> {
        Err(decode_error(de::Unexpected::Unit))
    }

    fn visit_none<E: de::Error>(self) -> Result<Expression, E> {
        Err(decode_error(de::Unexpected::Option))
    }

    fn visit_seq<A: de::SeqAccess<'de>>(self, _seq: A) -> Result<Expression, A::Error> {
        Err(decode_error(de::Unexpected::Seq))
    }

    fn visit_map<A: de::MapAccess<'de>>(self, _map: A) -> Result<Expression, A::Error> {
        Err(decode_error(de::Unexpected::Map))
    }
}

impl<'de> Deserialize<'de> for Expression {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ExpressionVisitor)
    }
}
