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

use crate::dice_roll::{Evaluation, TermResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Usage line of the roll command.
pub const ROLL_HELP: &str =
    "/roll {dice-expression} [for {purpose}][, {dice-expression} [for {purpose}]]";

#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReportField {
    pub title: String,
    pub value: String,
    pub short: bool,
}

impl ReportField {
    fn short<T: ToString, V: ToString>(title: T, value: V) -> ReportField {
        ReportField {
            title: title.to_string(),
            value: value.to_string(),
            short: true,
        }
    }
}

/// What gets shown for one or more evaluations rolled by someone.
#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RollReport {
    pub text: String,
    pub fallback: String,
    pub fields: Vec<ReportField>,
}

fn join(values: &[u32]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn result_fields(result: &TermResult, fields: &mut Vec<ReportField>) {
    let term = &result.term;
    if term.is_constant() {
        return;
    }
    fields.push(ReportField::short("Dice", term));
    fields.push(ReportField::short("Rolls", join(&result.rolls)));
    if let Some(reroll) = &term.reroll {
        fields.push(ReportField::short(
            format!("When {}", reroll.condition()),
            format!("{} time(s)", reroll.times()),
        ));
        fields.push(ReportField::short("Re-rolled", join(&result.rerolls)));
    }
    if let Some(keep) = &term.keep {
        fields.push(ReportField::short("Keep", keep.limit()));
        fields.push(ReportField::short("Removed", join(&result.removed)));
    }
}

impl RollReport {
    pub fn new(who: &str, evaluations: &[Evaluation]) -> RollReport {
        let mut fields = Vec::new();
        for result in evaluations.iter().flat_map(|e| e.results.iter()) {
            result_fields(result, &mut fields);
        }
        let text = evaluations
            .iter()
            .map(|e| e.text.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        let fallback = evaluations
            .iter()
            .map(|e| e.fallback.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        RollReport {
            text: format!("{} rolled {}", who, text),
            fallback: format!("{} rolled {}", who, fallback),
            fields,
        }
    }
}
