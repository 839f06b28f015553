use chargen_dice_roll::{limits::DiceLimits, DiceEvaluate, Expression};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rand_xoshiro::Xoshiro256PlusPlus;
use std::{convert::TryFrom, error::Error};

const USAGE: &str = "usage: roll-cmd <notation> [count]";

/// Widest result range a histogram is built for.
const MAX_HISTOGRAM_LEN: usize = 1 << 20;

/// Counts per result value, starting at `min`.
fn histogram(
    expression: &Expression,
    num: u32,
    master_rng: &mut ChaCha20Rng,
) -> Result<Vec<i64>, Box<dyn Error>> {
    let (result_min, result_max) = (expression.min(), expression.max());
    let len = result_max
        .checked_sub(result_min)
        .and_then(|span| span.checked_add(1))
        .and_then(|len| usize::try_from(len).ok())
        .filter(|len| *len <= MAX_HISTOGRAM_LEN)
        .ok_or_else(|| {
            format!(
                "results range from {} to {}, too wide for a histogram",
                result_min, result_max
            )
        })?;
    let mut results: Vec<i64> = vec![0; len];

    for _ in 0..num {
        let mut seed: <Xoshiro256PlusPlus as SeedableRng>::Seed = Default::default();
        master_rng.fill(&mut seed);
        let mut rng = Xoshiro256PlusPlus::from_seed(seed);
        let roll = expression.roll(&mut rng)?;
        let slot = results
            .get_mut(usize::try_from(roll.result - result_min)?)
            .ok_or("roll outside of the expression limits")?;
        *slot += 1;
    }
    Ok(results)
}

fn main() -> Result<(), Box<dyn Error>> {
    let (expression, num) = {
        let mut args = std::env::args().skip(1);
        let expression: Expression = args.next().ok_or(USAGE)?.parse()?;
        (
            expression,
            match args.next() {
                Some(a) => a.parse::<u32>()?,
                None => 1,
            },
        )
    };
    let mut master_rng = ChaCha20Rng::from_entropy();

    let counts = histogram(&expression, num, &mut master_rng)?;
    let total: i64 = counts
        .iter()
        .zip(expression.min()..)
        .map(|(count, value)| count * value)
        .sum();
    println!(
        "{}: {} rolls in {}..={}, mean {:.3}",
        expression,
        num,
        expression.min(),
        expression.max(),
        total as f64 / f64::from(num.max(1))
    );

    let mut output = vec![expression.min()];
    output.extend(counts);
    npy::to_file("rolls.npy", output)?;
    Ok(())
}
