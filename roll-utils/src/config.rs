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

use std::{convert::TryInto, path::Path, time::Duration};
use toml::{map::Map, Value};

const DEFAULT_RNG_WORKERS: u32 = 4;
const DEFAULT_RNG_RESEED_S: u32 = 300;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollerConfig {
    /// upper bound for the roll worker pool
    pub rng_workers: u32,
    pub rng_reseed: Duration,
    /// fixed seed for the master generator, disables reseeding
    pub seed: Option<u64>,
}

impl Default for RollerConfig {
    fn default() -> Self {
        RollerConfig {
            rng_workers: DEFAULT_RNG_WORKERS,
            rng_reseed: Duration::from_secs(u64::from(DEFAULT_RNG_RESEED_S)),
            seed: None,
        }
    }
}

fn read_positive(config: &mut Map<String, Value>, key: &str, default: u32) -> u32 {
    match config
        .get(key)
        .and_then(|v| v.as_integer())
        .and_then(|v| v.try_into().ok())
        .filter(|v: &u32| *v > 0)
    {
        Some(v) => v,
        None => {
            log::warn!("unable to read {}, overwriting with {}", key, default);
            config.insert(key.to_string(), Value::from(i64::from(default)));
            default
        }
    }
}

impl RollerConfig {
    /// Reads the config file, falling back to defaults for anything missing,
    /// and writes the completed config back.
    pub fn load<P: AsRef<Path>>(config_path: P) -> RollerConfig {
        let config_path = config_path.as_ref();
        let mut config: Map<String, Value> =
            match toml::from_slice(&match std::fs::read(config_path) {
                Ok(a) => a,
                Err(e) => {
                    log::warn!("Unable to read config file: {}", e);
                    vec![]
                }
            }) {
                Ok(a) => a,
                Err(e) => {
                    log::warn!("Unable to parse config: {}", e);
                    Map::new()
                }
            };

        let roller_config = RollerConfig::from_map(&mut config);

        match toml::to_vec(&config) {
            Ok(bytes) => {
                if let Err(e) = std::fs::write(config_path, bytes) {
                    log::error!("Error writing config: {}", e)
                }
            }
            Err(e) => log::error!("Error serializing config: {}", e),
        }

        roller_config
    }

    pub fn from_map(config: &mut Map<String, Value>) -> RollerConfig {
        let rng_workers = read_positive(config, "rng_workers", DEFAULT_RNG_WORKERS);
        let rng_reseed = Duration::from_secs(u64::from(read_positive(
            config,
            "rng_reseed_s",
            DEFAULT_RNG_RESEED_S,
        )));
        let seed = match config.get("seed") {
            None => None,
            Some(value) => {
                let seed: Option<u64> = value.as_integer().and_then(|s| s.try_into().ok());
                if seed.is_none() {
                    log::warn!("unable to read seed, rolling with entropy instead");
                }
                seed
            }
        };
        RollerConfig {
            rng_workers,
            rng_reseed,
            seed,
        }
    }
}
