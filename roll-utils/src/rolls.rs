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

use crate::config::RollerConfig;
use chargen_dice_roll::{DiceEvaluate, DiceParseError, EvaluationError, Expression, Roll};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rand_xoshiro::Xoshiro256PlusPlus;
use rusty_pool::{Builder, ThreadPool};
use std::{borrow::Borrow, time::Duration};
use thiserror::Error;
use tokio::{
    sync::{mpsc, oneshot, watch},
    task::{spawn, JoinHandle},
    time::{interval_at, Instant},
};

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum RollerError {
    #[error(transparent)]
    Parse(#[from] DiceParseError),
    #[error("the random number provider has stopped")]
    Stopped,
    #[error("the roll worker went away before answering")]
    WorkerLost,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct RollResult {
    /// canonical notation of the rolled expression
    pub text: String,
    pub roll: Result<Roll, EvaluationError>,
}

#[derive(Debug)]
enum RngProviderOps {
    GetRng(oneshot::Sender<Xoshiro256PlusPlus>),
    SetCryptoRng(ChaCha20Rng),
}

struct RngProvider {
    rng: ChaCha20Rng,
    receiver: mpsc::Receiver<RngProviderOps>,
}

impl RngProvider {
    pub async fn run(&mut self) {
        while let Some(op) = self.receiver.recv().await {
            match op {
                RngProviderOps::GetRng(channel) => {
                    let mut seed: <Xoshiro256PlusPlus as SeedableRng>::Seed = Default::default();
                    self.rng.fill(&mut seed);
                    // the requester may have given up already
                    let _ = channel.send(Xoshiro256PlusPlus::from_seed(seed));
                }
                RngProviderOps::SetCryptoRng(rng) => self.rng = rng,
            }
        }
    }
}

async fn wait_stop(stop: &mut watch::Receiver<bool>) {
    loop {
        if *watch::Receiver::borrow(stop) {
            break;
        }
        if stop.changed().await.is_err() {
            break;
        }
    }
}

fn start_rng_provider(
    master: ChaCha20Rng,
    rng_reseed: Option<Duration>,
    mut stop: watch::Receiver<bool>,
) -> (JoinHandle<()>, mpsc::Sender<RngProviderOps>) {
    let (sender, receiver) = mpsc::channel(32);
    let rng_handle = spawn(async move {
        RngProvider {
            rng: master,
            receiver,
        }
        .run()
        .await
    });
    let sender_clone = sender.clone();
    (
        spawn(async move {
            match rng_reseed {
                Some(rng_reseed) => {
                    let mut interval = interval_at(Instant::now() + rng_reseed, rng_reseed);
                    loop {
                        tokio::select! {
                            _ = interval.tick() => {
                                if sender_clone
                                    .send(RngProviderOps::SetCryptoRng(ChaCha20Rng::from_entropy()))
                                    .await
                                    .is_err()
                                {
                                    break;
                                }
                                log::debug!("reseeded master rng");
                            }
                            _ = wait_stop(&mut stop) => {
                                break;
                            }
                        }
                    }
                }
                None => wait_stop(&mut stop).await,
            }
            drop(sender_clone);
            log::info!("stopped reseeding task");
            if let Err(e) = rng_handle.await {
                log::error!("rng provider failed: {}", e);
            }
        }),
        sender,
    )
}

/// Rolls expressions on a worker pool, each roll with its own generator.
pub struct RollExecutor {
    pool: ThreadPool,
    rng_gen: mpsc::Sender<RngProviderOps>,
}

impl RollExecutor {
    /// The returned handle finishes once `stop` turned `true` and the
    /// executor has been dropped or shut down.
    pub async fn new(
        config: &RollerConfig,
        stop: watch::Receiver<bool>,
    ) -> (JoinHandle<()>, RollExecutor) {
        let (master, reseed) = match config.seed {
            Some(seed) => (ChaCha20Rng::seed_from_u64(seed), None),
            None => (ChaCha20Rng::from_entropy(), Some(config.rng_reseed)),
        };
        let (handle, rng) = start_rng_provider(master, reseed, stop);
        log::info!(
            "roll executor started with up to {} workers",
            config.rng_workers
        );
        (
            handle,
            RollExecutor {
                pool: Builder::new()
                    .core_size(1)
                    .max_size(config.rng_workers)
                    .name("Roll Worker".to_string())
                    .build(),
                rng_gen: rng,
            },
        )
    }

    pub async fn roll<Expr>(&self, expr: Expr) -> Result<RollResult, RollerError>
    where
        Expr: Borrow<Expression> + Sized + Send + 'static,
    {
        let text = expr.borrow().to_string();
        let (rng_send, rng_receive) = oneshot::channel();
        self.rng_gen
            .send(RngProviderOps::GetRng(rng_send))
            .await
            .map_err(|_| RollerError::Stopped)?;
        let mut rng = rng_receive.await.map_err(|_| RollerError::Stopped)?;
        let (result_sender, result_receiver) = oneshot::channel();
        self.pool.execute(move || {
            let _ = result_sender.send(expr.borrow().roll(&mut rng));
        });
        let roll = result_receiver
            .await
            .map_err(|_| RollerError::WorkerLost)?;
        log::debug!("rolled {:?} for {}", &roll, &text);
        Ok(RollResult { text, roll })
    }

    /// Parses and rolls in one go. Empty notation yields `None`.
    pub async fn roll_notation(&self, notation: &str) -> Result<Option<RollResult>, RollerError> {
        match chargen_dice_roll::parse(notation)? {
            Some(expr) => self.roll(expr).await.map(Some),
            None => Ok(None),
        }
    }

    /// Waits for running rolls to finish.
    pub fn shutdown(self) {
        self.pool.shutdown_join();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chargen_dice_roll::limits::DiceLimits;
    use std::sync::Arc;

    fn seeded(seed: u64) -> RollerConfig {
        RollerConfig {
            rng_workers: 2,
            seed: Some(seed),
            ..RollerConfig::default()
        }
    }

    async fn roll_all(config: &RollerConfig, notations: &[&str]) -> Vec<RollResult> {
        let (stop_sender, stop) = watch::channel(false);
        let (handle, executor) = RollExecutor::new(config, stop).await;
        let mut results = Vec::new();
        for notation in notations {
            results.push(executor.roll_notation(notation).await.unwrap().unwrap());
        }
        stop_sender.send(true).unwrap();
        executor.shutdown();
        handle.await.unwrap();
        results
    }

    #[tokio::test]
    async fn test_wait_stop() {
        let (stop_sender, mut stop) = watch::channel(false);
        let waiter = tokio::spawn(async move { wait_stop(&mut stop).await });
        stop_sender.send(true).unwrap();
        waiter.await.unwrap();

        let (stop_sender, mut stop) = watch::channel(true);
        wait_stop(&mut stop).await;
        drop(stop_sender);

        let (stop_sender, mut stop) = watch::channel(false);
        drop(stop_sender);
        wait_stop(&mut stop).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_roll_text_and_range() {
        let results = roll_all(&seeded(1), &["4 d 6 - L", "2d4+3d12-4", "1+3"]).await;
        assert_eq!(results[0].text, "4d6-L");
        assert_eq!(results[1].text, "2d4+3d12-4");
        let roll = results[0].roll.as_ref().unwrap();
        assert!((3..=18).contains(&roll.result));
        let roll = results[1].roll.as_ref().unwrap();
        assert!((1..=40).contains(&roll.result));
        assert_eq!(
            results[2].roll,
            Ok(Roll {
                result: 4,
                description: "1 + 3".to_string()
            })
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_fixed_seed_is_reproducible() {
        let notations = ["d20", "4d6-L", "3d4-H+d12-2+5", "d%"];
        let first = roll_all(&seeded(42), &notations).await;
        let second = roll_all(&seeded(42), &notations).await;
        assert_eq!(first, second);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_evaluation_errors_are_reported() {
        let results = roll_all(&seeded(3), &["d6/0"]).await;
        assert_eq!(results[0].roll, Err(EvaluationError::DivideByZero));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_parse_errors_and_empty_input() {
        let (stop_sender, stop) = watch::channel(false);
        let (handle, executor) = RollExecutor::new(&seeded(0), stop).await;
        assert_eq!(
            executor.roll_notation("d7").await,
            Err(RollerError::Parse(DiceParseError::InvalidDieSides(7)))
        );
        assert_eq!(executor.roll_notation("   ").await, Ok(None));
        stop_sender.send(true).unwrap();
        executor.shutdown();
        handle.await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_shared_expression_concurrently() {
        let (stop_sender, stop) = watch::channel(false);
        let config = RollerConfig {
            rng_workers: 4,
            ..RollerConfig::default()
        };
        let (handle, executor) = RollExecutor::new(&config, stop).await;
        let executor = Arc::new(executor);
        let expression: Arc<Expression> = Arc::new("3d4-H+d12-2+5".parse().unwrap());
        let tasks: Vec<_> = (0..64)
            .map(|_| {
                let executor = executor.clone();
                let expression = expression.clone();
                tokio::spawn(async move { executor.roll(expression).await })
            })
            .collect();
        for task in tasks {
            let result = task.await.unwrap().unwrap();
            let roll = result.roll.unwrap();
            assert!(roll.result >= expression.min() && roll.result <= expression.max());
        }
        stop_sender.send(true).unwrap();
        drop(executor);
        handle.await.unwrap();
    }
}
