use anyhow::{bail, Context, Result};
use std::env;
use std::path::Path;

use owner_parties::{
    validate_report, ExtractionRun, NameRules, OwnerMentions, PartyClassifier, VERSION,
};

const USAGE: &str = "Usage:
  owner-parties classify <raw>...
  owner-parties extract <owners.json|mentions.csv> [--rules <rules.json>]";

fn main() -> Result<()> {
    pretty_env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();

    match args.first().map(String::as_str) {
        Some("classify") => run_classify(&args[1..]),
        Some("extract") => run_extract(&args[1..]),
        Some("--version") => {
            println!("owner-parties {}", VERSION);
            Ok(())
        }
        _ => {
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    }
}

/// Split `--rules <path>` out of the argument list
fn load_classifier(args: &[String]) -> Result<(PartyClassifier, Vec<&String>)> {
    let mut rules = None;
    let mut rest = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--rules" {
            let path = iter.next().context("--rules needs a file path")?;
            rules = Some(NameRules::from_file(path)?);
        } else {
            rest.push(arg);
        }
    }

    let classifier = match rules {
        Some(rules) => PartyClassifier::with_rules(rules),
        None => PartyClassifier::new(),
    };
    Ok((classifier, rest))
}

fn run_classify(args: &[String]) -> Result<()> {
    let (classifier, inputs) = load_classifier(args)?;
    if inputs.is_empty() {
        bail!("classify needs at least one name\n{}", USAGE);
    }

    for raw in inputs {
        let parties = classifier.classify_all(raw);
        let output = serde_json::json!({
            "raw": raw,
            "parties": parties,
        });
        println!("{}", serde_json::to_string(&output)?);
    }

    Ok(())
}

fn run_extract(args: &[String]) -> Result<()> {
    let (classifier, inputs) = load_classifier(args)?;
    let input = match inputs.as_slice() {
        [path] => Path::new(path.as_str()),
        _ => bail!("extract needs exactly one input file\n{}", USAGE),
    };

    let mentions = OwnerMentions::from_path(input)?;
    log::info!("Loaded {} mentions from {:?}", mentions.len(), input);

    let report = ExtractionRun::new(classifier).run(&mentions);
    let validation = validate_report(&report);
    log::info!("{}", validation.summary());

    println!("{}", serde_json::to_string_pretty(&report)?);

    if !validation.is_valid() {
        eprintln!("❌ Validation failed: {}", validation.summary());
        std::process::exit(1);
    }

    Ok(())
}
