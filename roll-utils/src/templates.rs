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

//! Race, class and background templates as shipped in JSON content files.
//!
//! Only the dice fields are interpreted here. A malformed dice field means a
//! broken content file, so the whole load fails.

use chargen_dice_roll::Expression;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("unable to read templates: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid template file: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceTemplate {
    pub name: String,
    pub age: Expression,
    pub height_modifier: Expression,
    pub weight_modifier: Expression,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassTemplate {
    pub name: String,
    pub hit_dice: Expression,
    #[serde(default)]
    pub starting_gold: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundTemplate {
    pub name: String,
    pub starting_gold: Expression,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Templates {
    #[serde(default)]
    pub races: Vec<RaceTemplate>,
    #[serde(default)]
    pub classes: Vec<ClassTemplate>,
    #[serde(default)]
    pub backgrounds: Vec<BackgroundTemplate>,
}

impl Templates {
    pub fn from_json(json: &str) -> Result<Templates, TemplateError> {
        let templates: Templates = serde_json::from_str(json)?;
        log::info!(
            "loaded {} races, {} classes and {} backgrounds",
            templates.races.len(),
            templates.classes.len(),
            templates.backgrounds.len()
        );
        Ok(templates)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Templates, TemplateError> {
        Templates::from_json(&std::fs::read_to_string(path)?)
    }

    pub fn race(&self, name: &str) -> Option<&RaceTemplate> {
        self.races.iter().find(|r| r.name == name)
    }

    pub fn class(&self, name: &str) -> Option<&ClassTemplate> {
        self.classes.iter().find(|c| c.name == name)
    }

    pub fn background(&self, name: &str) -> Option<&BackgroundTemplate> {
        self.backgrounds.iter().find(|b| b.name == name)
    }
}
