// vihje-tokenize: segment phrases against a vocabulary.
//
// Reads phrases (one per line) from stdin and prints the matched tokens
// with their ids, flagging out-of-vocabulary content.
//
// Usage:
//   vihje-tokenize -v VOCAB_FILE
//
// Options:
//   -v, --vocab FILE   Vocabulary file, one symbol per line (ids from 1)
//   -h, --help         Print help

use std::io::{self, BufRead};

use vihje_bias::tokenizer;
use vihje_core::symbols::Vocabulary;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (vocab_path, args) = vihje_cli::parse_value_arg(&args, "--vocab", "-v");

    if vihje_cli::wants_help(&args) {
        println!("vihje-tokenize: segment phrases against a vocabulary.");
        println!();
        println!("Usage: vihje-tokenize -v VOCAB_FILE");
        println!();
        println!("Reads phrases from stdin, one per line, and prints their");
        println!("vocabulary segmentation.");
        println!();
        println!("Options:");
        println!("  -v, --vocab FILE   Vocabulary file, one symbol per line");
        println!("  -h, --help         Print this help");
        return;
    }

    let vocab_path = vocab_path.unwrap_or_else(|| vihje_cli::fatal("missing --vocab FILE"));
    let vocab = vihje_cli::load_vocabulary(&vocab_path).unwrap_or_else(|e| vihje_cli::fatal(&e));

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let phrase = line.unwrap_or_else(|e| vihje_cli::fatal(&format!("stdin: {e}")));
        if phrase.trim().is_empty() {
            continue;
        }

        let segmentation = tokenizer::split_phrase(&phrase, &vocab);
        let rendered: Vec<String> = segmentation
            .tokens
            .iter()
            .map(|t| {
                let id = vocab.find(t).unwrap_or(0);
                format!("{t}:{id}")
            })
            .collect();

        let status = if segmentation.fully_matched() {
            "ok"
        } else {
            "oov"
        };
        println!(
            "{status:3} {phrase}  ->  [{}]{}",
            rendered.join(", "),
            if segmentation.oov_count > 0 {
                format!("  ({} unmatched)", segmentation.oov_count)
            } else {
                String::new()
            }
        );
    }
}
