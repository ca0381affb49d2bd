use std::env;
use std::io::BufRead;

use posdfa::regex::render;
use posdfa::{Config, Regex};

fn config_from_env() -> Config {
    let mut config = Config::default();
    if let Some(c) = env::var("POSDFA_EPSILON").ok().and_then(|s| s.chars().next()) {
        config = config.with_epsilon(c);
    }
    match env::var("POSDFA_STATE_LIMIT").map(|s| s.parse::<usize>()) {
        Ok(Ok(limit)) => config = config.with_state_limit(limit),
        Ok(Err(e)) => eprintln!("ignoring POSDFA_STATE_LIMIT: {}", e),
        Err(_) => {}
    }
    if let Err(e) = config.check() {
        eprintln!("ignoring POSDFA_EPSILON: {}", e);
        config.epsilon = Config::default().epsilon;
    }
    config
}

// Each line: a pattern, then any number of test strings. `""` is the empty string.
fn main() {
    let config = config_from_env();
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("error: {}", e);
                break;
            }
        };
        let mut words = line.split_whitespace();
        let pattern = match words.next() {
            Some("\"\"") => "",
            Some(p) => p,
            None => continue,
        };
        match Regex::with_config(pattern, &config) {
            Err(e) => println!("error: {}", e),
            Ok(re) => {
                println!("postfix: {}", render(re.postfix(), &config));
                for (p, symbol, follow) in re.followpos().iter() {
                    println!("followpos({}) [{:?}] = {:?}", p, symbol, follow);
                }
                println!("DFA: {:?}\n", re.dfa());
                println!("Minimized DFA: {:?}\n", re.minimal());
                for word in words {
                    let input = if word == "\"\"" { "" } else { word };
                    let verdict = if re.is_match(input) { "accept" } else { "reject" };
                    println!("{:?}: {}", input, verdict);
                }
            }
        }
    }
}
