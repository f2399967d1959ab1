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

use crate::dice_types::*;
use crate::modifiers::Modifier;
use crate::random::RandomSource;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "logging")]
use log::{debug, warn};

/// Upper bound on the extra dice a single term may draw through explosion.
pub const EXPLOSION_LIMIT: u32 = 1000;

/// The outcome of rolling one [`Term`].
///
/// `rolls` holds the final faces after re-rolling and keeping, `rerolls` the
/// faces that were re-rolled away and `removed` the faces a keep dropped.
#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TermResult {
    pub term: Term,
    pub rolls: Vec<u32>,
    pub rerolls: Vec<u32>,
    pub removed: Vec<u32>,
}

impl TermResult {
    pub fn total(&self) -> i64 {
        if self.term.is_constant() {
            i64::from(self.term.number)
        } else {
            self.rolls.iter().map(|r| i64::from(*r)).sum()
        }
    }
}

pub trait TermEvaluate {
    fn evaluate<R: RandomSource + ?Sized>(&self, random: &mut R) -> TermResult;
}

impl TermEvaluate for Term {
    fn evaluate<R: RandomSource + ?Sized>(&self, random: &mut R) -> TermResult {
        if self.is_constant() {
            return TermResult {
                term: self.clone(),
                rolls: Vec::new(),
                rerolls: Vec::new(),
                removed: Vec::new(),
            };
        }

        let mut count = self.number;
        let mut exploded = 0;
        let mut warned = false;
        let mut rolls: Vec<u32> = Vec::with_capacity(self.number as usize);
        let mut index = 0;
        while index < count {
            let value = random.roll_die(self.sides);
            rolls.push(value);
            if self.explode && value == self.sides {
                if exploded < EXPLOSION_LIMIT {
                    exploded += 1;
                    count += 1;
                } else if !warned {
                    warned = true;
                    #[cfg(feature = "logging")]
                    {
                        warn!("explosion limit reached for {}", &self);
                    }
                }
            }
            index += 1;
        }

        let mut rerolls = Vec::new();
        if let Some(reroll) = &self.reroll {
            let modified = reroll.apply(rolls, self.sides, random);
            rolls = modified.rolls;
            rerolls = modified.discarded;
        }

        let mut removed = Vec::new();
        if let Some(keep) = &self.keep {
            let modified = keep.apply(rolls, self.sides, random);
            rolls = modified.rolls;
            removed = modified.discarded;
        }

        let result = TermResult {
            term: self.clone(),
            rolls,
            rerolls,
            removed,
        };
        #[cfg(feature = "logging")]
        {
            debug!(
                "rolled {:?} for {} (re-rolled {:?}, removed {:?})",
                &result.rolls, &self, &result.rerolls, &result.removed
            );
        }
        result
    }
}

/// Renders a running total the way a person would write it: no trailing
/// `.0` and never a negative zero. Magnitudes of `1e21` and above or below
/// `1e-6` switch to exponent notation, e.g. `1.5e+21` and `1e-7`.
pub fn format_total(total: f64) -> String {
    if total == 0.0 {
        return "0".to_string();
    }
    if total.is_nan() {
        return "NaN".to_string();
    }
    if total.is_infinite() {
        return if total > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let magnitude = total.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let exponent = format!("{:e}", total);
        match exponent.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => {
                format!("{}e+{}", mantissa, power)
            }
            _ => exponent,
        }
    } else {
        format!("{}", total)
    }
}

/// The outcome of rolling an entire [`Expression`] once.
///
/// `text` is markdown decorated (`*bold*`), `fallback` is plain.
#[derive(Debug, PartialEq, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Evaluation {
    pub expression: Expression,
    pub results: Vec<TermResult>,
    pub total: f64,
    pub text: String,
    pub fallback: String,
}

impl Evaluation {
    pub fn new(expression: &Expression, results: Vec<TermResult>) -> Evaluation {
        let mut total = 0.0;
        let mut text = String::new();
        let mut fallback = String::new();

        for (index, result) in results.iter().enumerate() {
            let value = result.total() as f64;
            let operator = result.term.operator;
            match operator {
                Operator::Add => total += value,
                Operator::Subtract => total -= value,
                Operator::Multiply => total *= value,
                Operator::Divide => {
                    // a zero divisor leaves the total alone
                    if value != 0.0 {
                        total /= value;
                    }
                }
                Operator::Max => {
                    if value > total {
                        total = value;
                    }
                }
                Operator::Min => {
                    if value < total {
                        total = value;
                    }
                }
            }

            if index > 0 {
                text.push_str(&format!(" {} ", operator));
                fallback.push_str(&format!(" {} ", operator));
            } else if operator == Operator::Subtract {
                text.push_str(&format!("{} ", operator));
                fallback.push_str(&format!("{} ", operator));
            }
            text.push_str(&format!("*{}*", result.total()));
            fallback.push_str(&result.total().to_string());
        }

        if results.is_empty() {
            text.push_str("*0*");
            fallback.push('0');
        }
        text.push_str(&format!(" = *{}*", format_total(total)));
        fallback.push_str(&format!(" = {}", format_total(total)));
        if let Some(purpose) = expression.purpose() {
            text.push_str(&format!(" for *{}*", purpose));
            fallback.push_str(&format!(" for {}", purpose));
        }

        #[cfg(feature = "logging")]
        {
            debug!("got {} for expression {}", format_total(total), expression);
        }

        Evaluation {
            expression: expression.clone(),
            results,
            total,
            text,
            fallback,
        }
    }
}

pub trait ExpressionEvaluate {
    fn evaluate<R: RandomSource + ?Sized>(&self, random: &mut R) -> Evaluation;
}

impl ExpressionEvaluate for Expression {
    fn evaluate<R: RandomSource + ?Sized>(&self, random: &mut R) -> Evaluation {
        let results = self.terms.iter().map(|term| term.evaluate(random)).collect();
        Evaluation::new(self, results)
    }
}

/// Rolls every expression against the same source, in order.
pub fn roll_with<R: RandomSource + ?Sized>(
    expressions: &[Expression],
    random: &mut R,
) -> Vec<Evaluation> {
    expressions
        .iter()
        .map(|expression| expression.evaluate(random))
        .collect()
}

/// Rolls every expression with the thread local RNG.
#[cfg(feature = "roll")]
pub fn roll(expressions: &[Expression]) -> Vec<Evaluation> {
    roll_with(expressions, &mut rand::thread_rng())
}
