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

/// Uniform floats in `[0, 1)`, queried once per die face drawn.
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;

    /// Draws a face in `[1, sides]`.
    fn roll_die(&mut self, sides: u32) -> u32 {
        let face = (self.next_f64() * f64::from(sides)).floor();
        if face < 0.0 {
            1
        } else {
            (face as u32).saturating_add(1).min(sides.max(1))
        }
    }
}

#[cfg(feature = "roll")]
impl<R: rand::Rng + ?Sized> RandomSource for R {
    fn next_f64(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Adapts a closure into a [`RandomSource`].
pub struct FnSource<F: FnMut() -> f64>(pub F);

impl<F: FnMut() -> f64> RandomSource for FnSource<F> {
    fn next_f64(&mut self) -> f64 {
        (self.0)()
    }
}

pub fn from_fn<F: FnMut() -> f64>(f: F) -> FnSource<F> {
    FnSource(f)
}

#[cfg(test)]
pub(crate) use scripted::{face, Scripted};

#[cfg(test)]
mod scripted {
    use super::RandomSource;

    /// Replays a fixed list of floats, starting over when exhausted.
    pub(crate) struct Scripted {
        values: Vec<f64>,
        position: usize,
        pub(crate) draws: usize,
    }

    impl Scripted {
        pub fn new(values: Vec<f64>) -> Self {
            Self {
                values,
                position: 0,
                draws: 0,
            }
        }

        pub fn faces(sides: u32, faces: &[u32]) -> Self {
            Self::new(faces.iter().map(|f| face(*f, sides)).collect())
        }
    }

    impl RandomSource for Scripted {
        fn next_f64(&mut self) -> f64 {
            self.draws += 1;
            if self.values.is_empty() {
                return 0.0;
            }
            let value = self.values[self.position % self.values.len()];
            self.position += 1;
            value
        }
    }

    /// The float that makes a `sides` sided die show `value`.
    pub(crate) fn face(value: u32, sides: u32) -> f64 {
        (f64::from(value) - 0.5) / f64::from(sides)
    }
}
