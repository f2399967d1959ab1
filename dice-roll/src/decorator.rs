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

const TWENTY_SIDED: &str = "1d20";

/// Rewrites roll text before parsing to roll with advantage or disadvantage.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RollDecorator {
    Advantage,
    Disadvantage,
    None,
}

impl RollDecorator {
    /// Case insensitive lookup, unknown names decorate nothing.
    pub fn for_name(name: &str) -> RollDecorator {
        match name.to_lowercase().as_str() {
            "adv" | "advantage" => RollDecorator::Advantage,
            "disadv" | "disadvantage" => RollDecorator::Disadvantage,
            _ => RollDecorator::None,
        }
    }

    /// Replaces the first `1d20` only.
    pub fn decorate(&self, roll: &str) -> String {
        match self {
            RollDecorator::Advantage => roll.replacen(TWENTY_SIDED, "2d20K1", 1),
            RollDecorator::Disadvantage => roll.replacen(TWENTY_SIDED, "2d20k1", 1),
            RollDecorator::None => roll.to_string(),
        }
    }
}

impl Default for RollDecorator {
    fn default() -> Self {
        RollDecorator::None
    }
}
