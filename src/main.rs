use roll_utils::{RollExecutor, RollResult, RollerConfig};
use std::io::BufRead;
use tokio::sync::watch;

#[tokio::main(flavor = "multi_thread", worker_threads = 4)]
async fn main() {
    pretty_env_logger::init();
    log::info!("logger created");

    let mut args = std::env::args_os().skip(1);
    let config = match args.next() {
        Some(path) => RollerConfig::load(std::path::PathBuf::from(path)),
        None => {
            log::warn!("no config path given, using defaults");
            RollerConfig::default()
        }
    };
    let mut notations: Vec<String> = args.map(|a| a.to_string_lossy().into_owned()).collect();
    if notations.is_empty() {
        notations = match tokio::task::spawn_blocking(|| {
            std::io::stdin().lock().lines().collect::<std::io::Result<Vec<String>>>()
        })
        .await
        {
            Ok(Ok(lines)) => lines,
            Ok(Err(e)) => {
                log::error!("unable to read stdin: {}", e);
                vec![]
            }
            Err(e) => {
                log::error!("stdin reader failed: {}", e);
                vec![]
            }
        };
    }

    let (stop_sender, stop) = watch::channel(false);
    let (handle, executor) = RollExecutor::new(&config, stop).await;

    let mut failed = false;
    for notation in &notations {
        match executor.roll_notation(notation).await {
            Ok(Some(RollResult {
                text,
                roll: Ok(roll),
            })) => println!("{} = {}", text, roll),
            Ok(Some(RollResult { text, roll: Err(e) })) => {
                eprintln!("{}: {}", text, e);
                failed = true;
            }
            Ok(None) => {}
            Err(e) => {
                eprintln!("{}: {}", notation.trim(), e);
                failed = true;
            }
        }
    }

    if stop_sender.send(true).is_err() {
        log::warn!("reseeding task already gone");
    }
    executor.shutdown();
    if let Err(e) = handle.await {
        log::error!("rng tasks failed: {}", e);
    }
    if failed {
        std::process::exit(1);
    }
}
