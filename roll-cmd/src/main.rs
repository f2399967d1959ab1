use dice_roll::{parse_strict, Expression, ExpressionEvaluate};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rand_xoshiro::Xoshiro256PlusPlus;
use std::collections::BTreeMap;

/// Widest value range a dense histogram may cover.
const MAX_SPAN: i64 = 1 << 24;

/// Flattens counts into `[smallest value, count, count, ...]` over the
/// whole consecutive range, zero filling gaps. Fails when the range is
/// wider than [`MAX_SPAN`].
fn histogram(counts: &BTreeMap<i64, i64>) -> Result<Vec<i64>, String> {
    let (min, max) = match (counts.keys().next(), counts.keys().next_back()) {
        (Some(min), Some(max)) => (*min, *max),
        _ => return Ok(vec![]),
    };
    match max.checked_sub(min) {
        Some(span) if span < MAX_SPAN => {
            let mut out = Vec::with_capacity(span as usize + 2);
            out.push(min);
            out.extend((min..=max).map(|value| counts.get(&value).copied().unwrap_or(0)));
            Ok(out)
        }
        _ => Err(format!(
            "range {}..={} too wide for a dense histogram",
            min, max
        )),
    }
}

/// The first expression that has something to roll.
fn first_rollable(expressions: &[Expression]) -> Option<&Expression> {
    expressions.iter().find(|e| !e.terms.is_empty())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let mut args = std::env::args().skip(1);
    let text = args
        .next()
        .ok_or("usage: roll-cmd EXPRESSION [TRIALS]")?;
    let trials = args
        .next()
        .and_then(|a| a.parse::<u32>().ok())
        .unwrap_or(1);
    let expressions = parse_strict(&text)?;
    let expression = first_rollable(&expressions).ok_or("no dice or numbers to sample")?;
    if expressions.len() > 1 {
        log::warn!("only sampling the first rollable segment of {:?}", text);
    }
    log::info!("sampling {} {} times", expression, trials);

    let mut master_rng = ChaCha20Rng::from_entropy();
    let mut totals: BTreeMap<i64, i64> = BTreeMap::new();
    let mut faces: BTreeMap<i64, i64> = BTreeMap::new();

    for mut rng in (0..trials).map(|_| {
        let mut seed: <Xoshiro256PlusPlus as SeedableRng>::Seed = Default::default();
        master_rng.fill(&mut seed);
        Xoshiro256PlusPlus::from_seed(seed)
    }) {
        let evaluation = expression.evaluate(&mut rng);
        *totals.entry(evaluation.total.floor() as i64).or_insert(0) += 1;
        for result in &evaluation.results {
            for face in result
                .rolls
                .iter()
                .chain(result.rerolls.iter())
                .chain(result.removed.iter())
            {
                *faces.entry(i64::from(*face)).or_insert(0) += 1;
            }
        }
    }

    npy::to_file("totals.npy", histogram(&totals)?)?;
    npy::to_file("faces.npy", histogram(&faces)?)?;
    Ok(())
}
