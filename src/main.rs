use clap::{Arg, Command};
use log::LevelFilter;
use mailsift::classifier::Classifier;
use mailsift::config::RuleSet;
use mailsift::message::EmailRecord;
use std::process;

fn main() {
    let matches = Command::new("mailsift")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Heuristic rule-based spam classifier for email messages")
        .arg(
            Arg::new("email")
                .value_name("FILE")
                .help("Email file to classify (headers, blank line, body)"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Rule set file (YAML); built-in rules are used when omitted"),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .value_name("FILE")
                .help("Write the built-in rule set to a file and exit")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("test-config")
                .long("test-config")
                .help("Validate the rule set (pattern compilation) and exit")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the verdict as JSON")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let log_level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    if let Some(path) = matches.get_one::<String>("generate-config") {
        match RuleSet::default().to_file(path) {
            Ok(()) => println!("Default rule set written to {path}"),
            Err(e) => {
                eprintln!("Error writing rule set: {e}");
                process::exit(1);
            }
        }
        return;
    }

    let rules = match matches.get_one::<String>("config") {
        Some(path) => match RuleSet::from_file(path) {
            Ok(rules) => rules,
            Err(e) => {
                eprintln!("Error loading rule set from {path}: {e}");
                process::exit(1);
            }
        },
        None => RuleSet::default(),
    };

    if matches.get_flag("test-config") {
        println!(
            "Rule set: {} header, {} content, {} URL rules, threshold {:.1}",
            rules.header_rules.len(),
            rules.content_rules.len(),
            rules.url_rules.len(),
            rules.threshold
        );
        match Classifier::new(rules) {
            Ok(_) => println!("All rule patterns compiled successfully."),
            Err(e) => {
                eprintln!("Rule set validation failed: {e}");
                process::exit(1);
            }
        }
        return;
    }

    let email_file = match matches.get_one::<String>("email") {
        Some(file) => file,
        None => {
            eprintln!("No email file given (see --help)");
            process::exit(1);
        }
    };

    let raw = match std::fs::read_to_string(email_file) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading {email_file}: {e}");
            process::exit(1);
        }
    };

    let classifier = match Classifier::new(rules) {
        Ok(classifier) => classifier,
        Err(e) => {
            eprintln!("Error building classifier: {e}");
            process::exit(1);
        }
    };

    let email = EmailRecord::parse(&raw);
    let verdict = classifier.classify(&email);

    if matches.get_flag("json") {
        match serde_json::to_string_pretty(&verdict) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing verdict: {e}");
                process::exit(1);
            }
        }
    } else {
        println!("Score: {:.1} (threshold {:.1})", verdict.score, classifier.threshold());
        println!("Spam: {}", if verdict.is_spam { "yes" } else { "no" });
        if verdict.reasons.is_empty() {
            println!("No rules triggered.");
        } else {
            println!("Triggered rules:");
            for reason in &verdict.reasons {
                println!("  - {reason}");
            }
        }
    }

    if verdict.is_spam {
        process::exit(2);
    }
}
