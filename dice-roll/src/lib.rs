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

//! Dice notation for chat commands: `2d20K1 + 5 for hit; 2d6r<3 + 5 for damage`.
//!
//! Text is parsed into [`Expression`]s, each of which rolls into an
//! [`Evaluation`] carrying the total and a markdown and plain rendering.

pub mod decorator;
pub mod dice_roll;
pub mod dice_types;
pub mod modifiers;
#[cfg(feature = "parser")]
pub mod parser;
pub mod random;
pub mod report;

pub use decorator::RollDecorator;
#[cfg(feature = "roll")]
pub use dice_roll::roll;
pub use dice_roll::{
    roll_with, Evaluation, ExpressionEvaluate, TermEvaluate, TermResult, EXPLOSION_LIMIT,
};
pub use dice_types::{Expression, Keep, Operator, ReRoll, Term};
#[cfg(feature = "parser")]
pub use parser::parse;
pub use random::{from_fn, FnSource, RandomSource};
pub use report::{ReportField, RollReport, ROLL_HELP};

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum RollError {
    #[error("no dice or numbers found in {0:?}")]
    NoTerms(String),
}

/// Like [`parse`], but fails when not a single segment holds a term.
#[cfg(feature = "parser")]
pub fn parse_strict(text: &str) -> Result<Vec<Expression>, RollError> {
    let expressions = parse(text);
    if expressions.iter().all(|e| e.terms.is_empty()) {
        Err(RollError::NoTerms(text.to_string()))
    } else {
        Ok(expressions)
    }
}

#[cfg(all(test, feature = "parser"))]
mod tests {
    use super::*;
    use crate::random::Scripted;

    #[test]
    fn test_parse_strict() {
        assert_eq!(
            parse_strict("hello there"),
            Err(RollError::NoTerms("hello there".to_string()))
        );
        assert_eq!(
            parse_strict("for nothing; ;"),
            Err(RollError::NoTerms("for nothing; ;".to_string()))
        );
        assert_eq!(parse_strict("1d6, nope").map(|e| e.len()), Ok(2));
    }

    #[test]
    fn test_advantage_end_to_end() {
        let text = RollDecorator::for_name("advantage").decorate("1d20 + 3 for hit");
        let expressions = parse(&text);
        assert_eq!(expressions[0].to_string(), "2d20K1 + 3 for hit");
        let evaluations = roll_with(&expressions, &mut Scripted::faces(20, &[4, 17]));
        assert_eq!(evaluations[0].total, 20.0);
        assert_eq!(evaluations[0].fallback, "17 + 3 = 20 for hit");
        assert_eq!(evaluations[0].results[0].removed, vec![4]);
    }

    #[test]
    fn test_disadvantage_end_to_end() {
        let text = RollDecorator::for_name("disadv").decorate("1d20 + 3");
        let evaluations = roll_with(&parse(&text), &mut Scripted::faces(20, &[4, 17]));
        assert_eq!(evaluations[0].fallback, "4 + 3 = 7");
    }

    #[test]
    fn test_divide_by_rolled_zero() {
        let evaluations = roll_with(&parse("3d4 / 0d1 - 1"), &mut Scripted::faces(4, &[1, 2, 3]));
        // 0d1 is the constant 1
        assert_eq!(evaluations[0].fallback, "6 / 1 - 1 = 5");
        let evaluations = roll_with(&parse("3d4 / 0"), &mut Scripted::faces(4, &[1, 2, 3]));
        assert_eq!(evaluations[0].total, 6.0);
        assert!(evaluations[0].total.is_finite());
    }

    #[test]
    fn test_one_sided_die_always_one() {
        for seed in 0..10 {
            let value = f64::from(seed) / 10.0;
            let evaluations = roll_with(&parse("1d1"), &mut from_fn(move || value));
            assert_eq!(evaluations[0].total, 1.0);
            assert_eq!(evaluations[0].fallback, "1 = 1");
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_evaluation_serde() {
        fn assert_serde<T: serde::Serialize + serde::de::DeserializeOwned>() {}
        assert_serde::<Evaluation>();
        assert_serde::<RollReport>();
        assert_serde::<Expression>();
    }
}
