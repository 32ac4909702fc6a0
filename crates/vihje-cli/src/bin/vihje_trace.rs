// vihje-trace: simulate a decoder stepping through a compiled graph.
//
// Compiles the phrase file, then reads decoded token strings from stdin
// (whitespace-separated) and prints the per-step outcome a decoder would
// see: score delta, next match-state, and boundary annotations.
//
// Usage:
//   vihje-trace -v VOCAB_FILE -p PHRASE_FILE [OPTIONS]
//
// Options:
//   -v, --vocab FILE          Vocabulary file, one symbol per line
//   -p, --phrases FILE        Phrase file, one phrase per line
//   -b, --base-score F        First-position score (default 3.0)
//   -i, --incremental-score F Per-position score growth (default 0.0)
//   -n, --max-phrases N       Phrase cap (default 5000)
//   -h, --help                Print help

use std::io::{self, Read};
use std::path::Path;

use vihje_bias::VihjeHandle;
use vihje_core::symbols::Vocabulary;
use vihje_fst::START_STATE;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (vocab_path, args) = vihje_cli::parse_value_arg(&args, "--vocab", "-v");
    let (phrase_path, args) = vihje_cli::parse_value_arg(&args, "--phrases", "-p");
    let (config, args) = vihje_cli::parse_config(&args);

    if vihje_cli::wants_help(&args) {
        println!("vihje-trace: step a word sequence through a context graph.");
        println!();
        println!("Usage: vihje-trace -v VOCAB_FILE -p PHRASE_FILE [OPTIONS]");
        println!();
        println!("Reads whitespace-separated decoded tokens from stdin and");
        println!("prints score deltas and boundary annotations per step.");
        println!();
        println!("Options:");
        println!("  -v, --vocab FILE           Vocabulary file, one symbol per line");
        println!("  -p, --phrases FILE         Phrase file, one phrase per line");
        println!("  -b, --base-score F         First-position score (default 3.0)");
        println!("  -i, --incremental-score F  Per-position score growth (default 0.0)");
        println!("  -n, --max-phrases N        Phrase cap (default 5000)");
        println!("  -h, --help                 Print this help");
        return;
    }

    let vocab_path = vocab_path.unwrap_or_else(|| vihje_cli::fatal("missing --vocab FILE"));
    let phrase_path = phrase_path.unwrap_or_else(|| vihje_cli::fatal("missing --phrases FILE"));

    let mut vocab =
        vihje_cli::load_vocabulary(&vocab_path).unwrap_or_else(|e| vihje_cli::fatal(&e));
    let phrases =
        vihje_cli::read_lines(Path::new(&phrase_path)).unwrap_or_else(|e| vihje_cli::fatal(&e));

    let handle = VihjeHandle::new(config);
    let stats = handle
        .rebuild(&phrases, &mut vocab)
        .unwrap_or_else(|e| vihje_cli::fatal(&e.to_string()));
    println!(
        "compiled {} phrases ({} skipped)",
        stats.compiled,
        stats.skipped_too_long + stats.skipped_oov + stats.skipped_over_limit
    );

    let Some(graph) = handle.graph() else {
        vihje_cli::fatal("no active graph (empty phrase list)");
    };

    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .unwrap_or_else(|e| vihje_cli::fatal(&format!("failed to read stdin: {e}")));

    let mut state = START_STATE;
    let mut total = 0.0_f32;
    for token in input.split_whitespace() {
        let Some(word) = vocab.find(token) else {
            println!("{token:>12}  (not in vocabulary, no step)");
            continue;
        };

        let outcome = graph.step(state, word);
        total += outcome.score;

        let mut notes = Vec::new();
        if outcome.starts_phrase {
            notes.push("starts");
        }
        if outcome.ends_phrase {
            notes.push("ends");
        }
        println!(
            "{token:>12}  state {state:>3} -> {:>3}  delta {:+8.3}  total {total:+8.3}  {}",
            outcome.next_state,
            outcome.score,
            notes.join("+")
        );
        state = outcome.next_state;
    }
}
