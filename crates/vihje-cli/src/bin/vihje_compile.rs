// vihje-compile: compile a phrase list and dump the resulting graph.
//
// Reads phrases (one per line) from stdin, compiles them against the
// vocabulary, and prints compilation stats plus every state with its
// outgoing transitions.
//
// Usage:
//   vihje-compile -v VOCAB_FILE [OPTIONS]
//
// Options:
//   -v, --vocab FILE          Vocabulary file, one symbol per line
//   -b, --base-score F        First-position score (default 3.0)
//   -i, --incremental-score F Per-position score growth (default 0.0)
//   -n, --max-phrases N       Phrase cap (default 5000)
//   -h, --help                Print help

use std::io::{self, Read};

use vihje_bias::VihjeHandle;
use vihje_fst::{Label, StateId};

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (vocab_path, args) = vihje_cli::parse_value_arg(&args, "--vocab", "-v");
    let (config, args) = vihje_cli::parse_config(&args);

    if vihje_cli::wants_help(&args) {
        println!("vihje-compile: compile a phrase list into a context graph.");
        println!();
        println!("Usage: vihje-compile -v VOCAB_FILE [OPTIONS]");
        println!();
        println!("Reads phrases from stdin, one per line.");
        println!();
        println!("Options:");
        println!("  -v, --vocab FILE           Vocabulary file, one symbol per line");
        println!("  -b, --base-score F         First-position score (default 3.0)");
        println!("  -i, --incremental-score F  Per-position score growth (default 0.0)");
        println!("  -n, --max-phrases N        Phrase cap (default 5000)");
        println!("  -h, --help                 Print this help");
        return;
    }

    let vocab_path = vocab_path.unwrap_or_else(|| vihje_cli::fatal("missing --vocab FILE"));
    let mut vocab =
        vihje_cli::load_vocabulary(&vocab_path).unwrap_or_else(|e| vihje_cli::fatal(&e));

    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .unwrap_or_else(|e| vihje_cli::fatal(&format!("failed to read stdin: {e}")));
    let phrases: Vec<&str> = input.lines().filter(|l| !l.trim().is_empty()).collect();

    let handle = VihjeHandle::new(config);
    let stats = handle
        .rebuild(&phrases, &mut vocab)
        .unwrap_or_else(|e| vihje_cli::fatal(&e.to_string()));

    println!("=== Stats ===");
    println!("compiled:           {}", stats.compiled);
    println!("skipped (too long): {}", stats.skipped_too_long);
    println!("skipped (oov):      {}", stats.skipped_oov);
    println!("skipped (over cap): {}", stats.skipped_over_limit);

    let Some(graph) = handle.graph() else {
        println!();
        println!("no active graph (empty phrase list)");
        return;
    };

    let fst = graph.fst();
    println!();
    println!(
        "=== Graph: {} states, {} transitions ===",
        fst.num_states(),
        fst.num_transitions()
    );
    for state in 0..fst.num_states() as StateId {
        let marker = if fst.is_final(state) { " (final)" } else { "" };
        println!("state {state}{marker}:");
        for t in fst.transitions(state) {
            match t.label {
                Label::Symbol(id) => {
                    let name = vocab.name(id).unwrap_or("?");
                    println!("  --[{name}:{id} / {:+.2}]--> {}", t.weight, t.target);
                }
                Label::Escape => {
                    println!("  --[<escape> / {:+.2}]--> {}", t.weight, t.target);
                }
            }
        }
    }
}
