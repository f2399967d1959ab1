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

use crate::dice_types::{Expression, Keep, Operator, ReRoll, Term};

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while_m_n},
    character::complete::{char, multispace0, one_of},
    combinator::{map, map_res, opt, recognize},
    sequence::{pair, preceded, tuple},
    IResult,
};

/// Separates the terms of an expression from its purpose.
const PURPOSE_DELIMITER: &str = " for ";

fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn digits(min: usize, max: usize) -> impl Fn(&str) -> IResult<&str, &str> {
    move |input| take_while_m_n(min, max, is_digit)(input)
}

fn number(min: usize, max: usize) -> impl Fn(&str) -> IResult<&str, u32> {
    move |input| map_res(digits(min, max), |s: &str| s.parse::<u32>())(input)
}

pub fn parse_operator(input: &str) -> IResult<&str, Operator> {
    map(
        recognize(alt((one_of("+-*/^vx"), char('×')))),
        Operator::for_symbol,
    )(input)
}

pub fn parse_sides(input: &str) -> IResult<&str, u32> {
    alt((map(tag("%"), |_| 100), map(number(1, 3), |s: u32| s.max(1))))(input)
}

/// `r{times}{<|>}{value}`; the value is clamped into `[1, sides]`.
pub fn parse_reroll(sides: u32) -> impl Fn(&str) -> IResult<&str, ReRoll> {
    move |input| {
        map(
            tuple((char('r'), digits(0, 3), one_of("<>"), number(1, 3))),
            |(_, times, direction, value): (char, &str, char, u32)| {
                let times = times.parse::<u32>().map(|t| t.max(1)).unwrap_or(1);
                let threshold = value.max(1).min(sides);
                if direction == '>' {
                    ReRoll::HigherThan { times, threshold }
                } else {
                    ReRoll::LowerThan { times, threshold }
                }
            },
        )(input)
    }
}

/// `{k|K}{limit}`; the limit is clamped into `[1, number]`.
pub fn parse_keep(number_of_dice: u32) -> impl Fn(&str) -> IResult<&str, Keep> {
    move |input| {
        map(pair(one_of("kK"), number(1, 3)), |(kind, limit): (char, u32)| {
            let limit = limit.max(1).min(number_of_dice);
            if kind == 'K' {
                Keep::Highest(limit)
            } else {
                Keep::Lowest(limit)
            }
        })(input)
    }
}

/// A dice group such as `4d6!r<2K3`, without the leading operator.
pub fn parse_dice(input: &str) -> IResult<&str, Term> {
    let (input, count) = digits(0, 3)(input)?;
    let (input, _) = char('d')(input)?;
    let (input, sides) = parse_sides(input)?;
    let (input, explode) = opt(char('!'))(input)?;
    let number = count.parse::<u32>().map(|n| n.max(1)).unwrap_or(1);
    let (input, reroll) = opt(parse_reroll(sides))(input)?;
    let (input, keep) = opt(parse_keep(number))(input)?;
    Ok((
        input,
        Term {
            operator: Operator::Add,
            number,
            sides,
            explode: explode.is_some(),
            reroll,
            keep,
        },
    ))
}

pub fn parse_constant(input: &str) -> IResult<&str, Term> {
    map(number(1, 5), |value| Term::constant(Operator::Add, value))(input)
}

/// One term token: an optional operator, optional whitespace, then a dice
/// group or a constant.
pub fn parse_term(input: &str) -> IResult<&str, Term> {
    map(
        pair(
            opt(parse_operator),
            preceded(multispace0, alt((parse_dice, parse_constant))),
        ),
        |(operator, term): (Option<Operator>, Term)| Term {
            operator: operator.unwrap_or_default(),
            ..term
        },
    )(input)
}

/// Walks a piece of text and yields every term token in it, skipping
/// characters that do not start one.
pub struct TermScanner<'a> {
    rest: &'a str,
}

impl<'a> TermScanner<'a> {
    pub fn new(text: &'a str) -> TermScanner<'a> {
        TermScanner { rest: text }
    }

    /// Text not scanned yet.
    pub fn rest(&self) -> &'a str {
        self.rest
    }
}

impl<'a> Iterator for TermScanner<'a> {
    type Item = Term;

    fn next(&mut self) -> Option<Term> {
        while !self.rest.is_empty() {
            match parse_term(self.rest) {
                Ok((rest, term)) => {
                    self.rest = rest;
                    return Some(term);
                }
                Err(_) => {
                    let mut chars = self.rest.chars();
                    chars.next();
                    self.rest = chars.as_str();
                }
            }
        }
        None
    }
}

/// Parses one segment, e.g. `2d6 + 5 for damage`.
pub fn parse_expression(segment: &str) -> Expression {
    let (terms, purpose) = match segment.find(PURPOSE_DELIMITER) {
        Some(index) => (
            segment[..index].trim(),
            Some(segment[index + PURPOSE_DELIMITER.len()..].trim().to_string()),
        ),
        None => (segment, None),
    };
    Expression::new(TermScanner::new(terms).collect(), purpose)
}

/// Splits text on `,` and `;`, trimming whitespace around each separator.
pub fn split_segments(text: &str) -> Vec<&str> {
    let parts: Vec<&str> = text.split(|c: char| c == ',' || c == ';').collect();
    let last = parts.len() - 1;
    parts
        .into_iter()
        .enumerate()
        .map(|(index, part)| {
            let part = if index > 0 { part.trim_start() } else { part };
            if index < last {
                part.trim_end()
            } else {
                part
            }
        })
        .collect()
}

/// Parses every segment of the text into an [`Expression`], in order.
pub fn parse(text: &str) -> Vec<Expression> {
    split_segments(text)
        .into_iter()
        .map(parse_expression)
        .collect()
}

#[cfg(test)]
mod tests {

    use super::*;

    fn dice(number: u32, sides: u32) -> Term {
        Term::dice(Operator::Add, number, sides)
    }

    #[test]
    fn test_parse_operator() {
        assert_eq!(parse_operator("+"), Ok(("", Operator::Add)));
        assert_eq!(parse_operator("-1"), Ok(("1", Operator::Subtract)));
        assert_eq!(parse_operator("*"), Ok(("", Operator::Multiply)));
        assert_eq!(parse_operator("×"), Ok(("", Operator::Multiply)));
        assert_eq!(parse_operator("x"), Ok(("", Operator::Multiply)));
        assert_eq!(parse_operator("/"), Ok(("", Operator::Divide)));
        assert_eq!(parse_operator("^"), Ok(("", Operator::Max)));
        assert_eq!(parse_operator("v"), Ok(("", Operator::Min)));
        assert!(parse_operator("d").is_err());
        assert!(parse_operator("").is_err());
    }

    #[test]
    fn test_parse_sides() {
        assert_eq!(parse_sides("20"), Ok(("", 20)));
        assert_eq!(parse_sides("%"), Ok(("", 100)));
        assert_eq!(parse_sides("0"), Ok(("", 1)));
        assert_eq!(parse_sides("1000"), Ok(("0", 100)));
        assert!(parse_sides("x").is_err());
    }

    #[test]
    fn test_parse_reroll() {
        assert_eq!(
            parse_reroll(6)("r<3"),
            Ok((
                "",
                ReRoll::LowerThan {
                    times: 1,
                    threshold: 3
                }
            ))
        );
        assert_eq!(
            parse_reroll(20)("r2>18"),
            Ok((
                "",
                ReRoll::HigherThan {
                    times: 2,
                    threshold: 18
                }
            ))
        );
        assert_eq!(
            parse_reroll(6)("r0<9"),
            Ok((
                "",
                ReRoll::LowerThan {
                    times: 1,
                    threshold: 6
                }
            ))
        );
        assert_eq!(
            parse_reroll(6)("r>0"),
            Ok((
                "",
                ReRoll::HigherThan {
                    times: 1,
                    threshold: 1
                }
            ))
        );
        assert!(parse_reroll(6)("r3").is_err());
        assert!(parse_reroll(6)("r=3").is_err());
    }

    #[test]
    fn test_parse_keep() {
        assert_eq!(parse_keep(2)("K1"), Ok(("", Keep::Highest(1))));
        assert_eq!(parse_keep(4)("k3"), Ok(("", Keep::Lowest(3))));
        assert_eq!(parse_keep(2)("K5"), Ok(("", Keep::Highest(2))));
        assert_eq!(parse_keep(2)("k0"), Ok(("", Keep::Lowest(1))));
        assert!(parse_keep(2)("K").is_err());
    }

    #[test]
    fn test_parse_dice() {
        assert_eq!(parse_dice("d20"), Ok(("", dice(1, 20))));
        assert_eq!(parse_dice("0d6"), Ok(("", dice(1, 6))));
        assert_eq!(parse_dice("d%"), Ok(("", dice(1, 100))));
        assert_eq!(parse_dice("4d6!"), Ok(("", dice(4, 6).with_explode())));
        assert_eq!(
            parse_dice("4d6r<2K3 + 1"),
            Ok((
                " + 1",
                dice(4, 6)
                    .with_reroll(ReRoll::LowerThan {
                        times: 1,
                        threshold: 2
                    })
                    .with_keep(Keep::Highest(3))
            ))
        );
        assert_eq!(parse_dice("2d6r5"), Ok(("r5", dice(2, 6))));
        assert!(parse_dice("1234d6").is_err());
        assert!(parse_dice("D6").is_err());
    }

    #[test]
    fn test_parse_term() {
        assert_eq!(
            parse_term("- 1d4"),
            Ok(("", Term::dice(Operator::Subtract, 1, 4)))
        );
        assert_eq!(
            parse_term("x3"),
            Ok(("", Term::constant(Operator::Multiply, 3)))
        );
        assert_eq!(
            parse_term("123456"),
            Ok(("6", Term::constant(Operator::Add, 12345)))
        );
        assert_eq!(parse_term("0"), Ok(("", Term::constant(Operator::Add, 0))));
        assert!(parse_term("+ +5").is_err());
        assert!(parse_term("for").is_err());
    }

    #[test]
    fn test_scanner_skips_noise() {
        let terms: Vec<Term> = TermScanner::new("roll 2d6 and then +5!").collect();
        assert_eq!(
            terms,
            vec![dice(2, 6), Term::constant(Operator::Add, 5)]
        );
        let terms: Vec<Term> = TermScanner::new("1234d6").collect();
        assert_eq!(
            terms,
            vec![Term::constant(Operator::Add, 1234), dice(1, 6)]
        );
        let mut scanner = TermScanner::new("1d20 + 3");
        assert_eq!(scanner.next(), Some(dice(1, 20)));
        assert_eq!(scanner.rest(), " + 3");
    }

    #[test]
    fn test_split_segments() {
        assert_eq!(split_segments("a , b;c"), vec!["a", "b", "c"]);
        assert_eq!(split_segments(" a ; b "), vec![" a", "b "]);
        assert_eq!(split_segments(""), vec![""]);
        assert_eq!(split_segments("a,"), vec!["a", ""]);
    }

    #[test]
    fn test_parse_round_trip() {
        let expressions = parse("2d6r<3 + 5 for damage");
        assert_eq!(expressions.len(), 1);
        assert_eq!(expressions[0].to_string(), "2d6r1<3 + 5 for damage");
        assert_eq!(expressions[0].purpose.as_deref(), Some("damage"));
    }

    #[test]
    fn test_parse_multiple() {
        let expressions = parse("2d20K1 + 5 for hit; 2d6r<3 + 5 for damage");
        assert_eq!(expressions.len(), 2);
        assert_eq!(expressions[0].to_string(), "2d20K1 + 5 for hit");
        assert_eq!(expressions[1].to_string(), "2d6r1<3 + 5 for damage");
    }

    #[test]
    fn test_parse_operators_and_constants() {
        let expressions = parse("-1d4 x 2 / 3 ^ 4 v 5 * 6");
        assert_eq!(
            expressions[0].terms,
            vec![
                Term::dice(Operator::Subtract, 1, 4),
                Term::constant(Operator::Multiply, 2),
                Term::constant(Operator::Divide, 3),
                Term::constant(Operator::Max, 4),
                Term::constant(Operator::Min, 5),
                Term::constant(Operator::Multiply, 6),
            ]
        );
        assert_eq!(expressions[0].to_string(), "- 1d4 x 2 / 3 ^ 4 v 5 x 6");
    }

    #[test]
    fn test_parse_purpose_uses_first_delimiter() {
        let expressions = parse("1d20 for luck for real");
        assert_eq!(expressions[0].terms, vec![dice(1, 20)]);
        assert_eq!(expressions[0].purpose.as_deref(), Some("luck for real"));
    }

    #[test]
    fn test_parse_without_terms() {
        let expressions = parse("");
        assert_eq!(expressions, vec![Expression::default()]);
        let expressions = parse("hello for nothing");
        assert!(expressions[0].terms.is_empty());
        assert_eq!(expressions[0].purpose.as_deref(), Some("nothing"));
        let expressions = parse("2d6 for ");
        assert_eq!(expressions[0].purpose, None);
    }

    #[test]
    fn test_parse_degenerate_dice() {
        let expressions = parse("3d0 + 1d1");
        assert_eq!(
            expressions[0].terms,
            vec![
                Term::constant(Operator::Add, 3),
                Term::constant(Operator::Add, 1)
            ]
        );
        assert_eq!(expressions[0].to_string(), "3 + 1");
    }
}
