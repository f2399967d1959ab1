mod config;

use config::{Config, Format};
use dice_roll::{parse_strict, roll_with, RandomSource, RollDecorator, RollReport, ROLL_HELP};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

const USAGE: &str = "usage: dnd-roll [--config PATH] [--adv|--disadv] [--json|--markdown|--plain] [--name NAME] [EXPRESSION...]";

#[derive(Debug, Default, PartialEq)]
struct Options {
    config: Option<PathBuf>,
    decorator: RollDecorator,
    format: Option<Format>,
    name: Option<String>,
    expression: Vec<String>,
    help: bool,
}

fn parse_args<I: Iterator<Item = String>>(mut args: I) -> Result<Options, String> {
    let mut options = Options::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => options.help = true,
            "--config" => {
                options.config = Some(PathBuf::from(
                    args.next().ok_or("--config needs a path")?,
                ))
            }
            "--name" => options.name = Some(args.next().ok_or("--name needs a value")?),
            "--adv" | "--advantage" => options.decorator = RollDecorator::Advantage,
            "--disadv" | "--disadvantage" => options.decorator = RollDecorator::Disadvantage,
            "--json" => options.format = Some(Format::Json),
            "--markdown" => options.format = Some(Format::Markdown),
            "--plain" => options.format = Some(Format::Plain),
            _ => options.expression.push(arg),
        }
    }
    Ok(options)
}

fn render(report: &RollReport, format: Format, details: bool) -> Result<String, serde_json::Error> {
    if format == Format::Json {
        return serde_json::to_string_pretty(report);
    }
    let mut out = match format {
        Format::Markdown => report.text.clone(),
        _ => report.fallback.clone(),
    };
    if details {
        for field in &report.fields {
            out.push_str(&format!("\n  {}: {}", field.title, field.value));
        }
    }
    Ok(out)
}

fn roll_line<R: RandomSource>(
    line: &str,
    options: &Options,
    config: &Config,
    random: &mut R,
) -> Result<String, Box<dyn std::error::Error>> {
    let text = options.decorator.decorate(line);
    let expressions = parse_strict(&text)?;
    let evaluations = roll_with(&expressions, random);
    let name = options.name.as_deref().unwrap_or(&config.name);
    let report = RollReport::new(name, &evaluations);
    let format = options.format.unwrap_or(config.format);
    Ok(render(&report, format, config.details)?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let options = parse_args(std::env::args().skip(1))?;
    if options.help {
        println!("{}\n\nroll syntax: {}", USAGE, ROLL_HELP);
        return Ok(());
    }

    let config = match Config::locate(options.config.clone()) {
        Some(path) => Config::load(&path),
        None => Config::default(),
    };
    let mut rng = match config.seed {
        Some(seed) => {
            log::info!("rolling with fixed seed {}", seed);
            ChaCha20Rng::seed_from_u64(seed)
        }
        None => ChaCha20Rng::from_entropy(),
    };

    if !options.expression.is_empty() {
        let line = options.expression.join(" ");
        println!("{}", roll_line(&line, &options, &config, &mut rng)?);
        return Ok(());
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    print!("> ");
    io::stdout().flush()?;
    while let Some(line) = lines.next() {
        let line = line?;
        if !line.trim().is_empty() {
            match roll_line(&line, &options, &config, &mut rng) {
                Ok(out) => println!("{}", out),
                Err(why) => eprintln!("Error: {}", why),
            }
        }
        print!("> ");
        io::stdout().flush()?;
    }
    Ok(())
}
