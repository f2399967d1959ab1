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
use serde::{Deserialize, Serialize};
use std::fmt;

/// Combines a term's value into the running total of an evaluation.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Max,
    Min,
}

impl Operator {
    /// Looks up the operator for a symbol. Anything unknown, including the
    /// empty string, is [`Operator::Add`].
    pub fn for_symbol(symbol: &str) -> Operator {
        match symbol {
            "-" => Operator::Subtract,
            "*" | "×" | "x" => Operator::Multiply,
            "/" => Operator::Divide,
            "^" => Operator::Max,
            "v" => Operator::Min,
            _ => Operator::Add,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => 'x',
            Operator::Divide => '/',
            Operator::Max => '^',
            Operator::Min => 'v',
        }
    }
}

impl Default for Operator {
    fn default() -> Self {
        Operator::Add
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Keeps only the highest or lowest `n` dice of a roll.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Keep {
    Highest(u32),
    Lowest(u32),
}

impl Keep {
    pub fn limit(&self) -> u32 {
        match self {
            Keep::Highest(limit) | Keep::Lowest(limit) => *limit,
        }
    }
}

impl fmt::Display for Keep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Keep::Highest(limit) => write!(f, "K{}", limit),
            Keep::Lowest(limit) => write!(f, "k{}", limit),
        }
    }
}

/// Re-rolls every die matching a threshold, at most `times` times per die.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ReRoll {
    HigherThan { times: u32, threshold: u32 },
    LowerThan { times: u32, threshold: u32 },
}

impl ReRoll {
    pub fn times(&self) -> u32 {
        match self {
            ReRoll::HigherThan { times, .. } | ReRoll::LowerThan { times, .. } => *times,
        }
    }

    pub fn threshold(&self) -> u32 {
        match self {
            ReRoll::HigherThan { threshold, .. } | ReRoll::LowerThan { threshold, .. } => {
                *threshold
            }
        }
    }

    pub fn matches(&self, value: u32) -> bool {
        match self {
            ReRoll::HigherThan { threshold, .. } => value > *threshold,
            ReRoll::LowerThan { threshold, .. } => value < *threshold,
        }
    }

    /// The condition part of the suffix, e.g. `<3`.
    pub fn condition(&self) -> String {
        match self {
            ReRoll::HigherThan { threshold, .. } => format!(">{}", threshold),
            ReRoll::LowerThan { threshold, .. } => format!("<{}", threshold),
        }
    }
}

impl fmt::Display for ReRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}{}", self.times(), self.condition())
    }
}

/// One operand of an expression: either `NdX` with modifiers or a constant.
///
/// A term with a single side never rolls, its value is `number`.
#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Term {
    pub operator: Operator,
    pub number: u32,
    pub sides: u32,
    pub explode: bool,
    pub reroll: Option<ReRoll>,
    pub keep: Option<Keep>,
}

impl Term {
    pub fn constant(operator: Operator, value: u32) -> Term {
        Term {
            operator,
            number: value,
            ..Term::default()
        }
    }

    pub fn dice(operator: Operator, number: u32, sides: u32) -> Term {
        Term {
            operator,
            number: number.max(1),
            sides: sides.max(1),
            ..Term::default()
        }
    }

    pub fn with_explode(mut self) -> Term {
        self.explode = true;
        self
    }

    pub fn with_reroll(mut self, reroll: ReRoll) -> Term {
        self.reroll = Some(reroll);
        self
    }

    pub fn with_keep(mut self, keep: Keep) -> Term {
        self.keep = Some(keep);
        self
    }

    pub fn is_constant(&self) -> bool {
        self.sides == 1
    }
}

impl Default for Term {
    fn default() -> Self {
        Term {
            operator: Operator::Add,
            number: 1,
            sides: 1,
            explode: false,
            reroll: None,
            keep: None,
        }
    }
}

/// Canonical form without the operator: `5` or `2d6!r1<3K1`.
impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_constant() {
            return write!(f, "{}", self.number);
        }
        write!(f, "{}d{}", self.number, self.sides)?;
        if self.explode {
            f.write_str("!")?;
        }
        if let Some(reroll) = &self.reroll {
            write!(f, "{}", reroll)?;
        }
        if let Some(keep) = &self.keep {
            write!(f, "{}", keep)?;
        }
        Ok(())
    }
}

/// Ordered terms plus an optional label naming what the roll is for.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Expression {
    pub terms: Vec<Term>,
    pub purpose: Option<String>,
}

impl Expression {
    /// Empty purposes are treated as absent.
    pub fn new(terms: Vec<Term>, purpose: Option<String>) -> Expression {
        Expression {
            terms,
            purpose: purpose.filter(|p| !p.is_empty()),
        }
    }

    /// The purpose label, if there is a non-empty one.
    pub fn purpose(&self) -> Option<&str> {
        self.purpose.as_deref().filter(|p| !p.is_empty())
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.terms.split_first() {
            Some((first, rest)) => {
                if first.operator == Operator::Subtract {
                    write!(f, "{} ", first.operator)?;
                }
                write!(f, "{}", first)?;
                for term in rest {
                    write!(f, " {} {}", term.operator, term)?;
                }
            }
            None => f.write_str("0")?,
        }
        if let Some(purpose) = self.purpose() {
            write!(f, " for {}", purpose)?;
        }
        Ok(())
    }
}
