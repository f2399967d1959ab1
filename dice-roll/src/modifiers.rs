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

use crate::dice_types::{Keep, ReRoll};
use crate::random::RandomSource;

/// Rolls after a modifier ran, plus the faces it discarded.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct Modified {
    pub rolls: Vec<u32>,
    pub discarded: Vec<u32>,
}

pub trait Modifier {
    fn apply<R: RandomSource + ?Sized>(&self, rolls: Vec<u32>, sides: u32, random: &mut R)
        -> Modified;
}

impl Modifier for Keep {
    fn apply<R: RandomSource + ?Sized>(&self, mut rolls: Vec<u32>, _: u32, _: &mut R) -> Modified {
        match self {
            Keep::Highest(_) => rolls.sort_unstable_by(|a, b| b.cmp(a)),
            Keep::Lowest(_) => rolls.sort_unstable(),
        }
        let limit = (self.limit() as usize).min(rolls.len());
        let discarded = rolls.split_off(limit);
        Modified { rolls, discarded }
    }
}

impl Modifier for ReRoll {
    fn apply<R: RandomSource + ?Sized>(
        &self,
        mut rolls: Vec<u32>,
        sides: u32,
        random: &mut R,
    ) -> Modified {
        let mut discarded = Vec::new();
        if !rolls.iter().any(|value| self.matches(*value)) {
            return Modified { rolls, discarded };
        }
        for value in rolls.iter_mut() {
            let mut attempts = 0;
            while attempts < self.times() && self.matches(*value) {
                discarded.push(*value);
                *value = random.roll_die(sides);
                attempts += 1;
            }
        }
        Modified { rolls, discarded }
    }
}
