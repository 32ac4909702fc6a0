// Subset-construction determinization over the weighted context graph.
//
// Phrases sharing a prefix produce parallel same-label transitions out of
// the shared states; this transform merges them so every state ends up
// with at most one transition per distinct symbol (and at most one escape
// transition). The escape label participates like any other label -- it is
// never closed over, because traversal reads it as data, not as a
// spontaneous move.

use hashbrown::HashMap;

use crate::graph::{ContextFst, Label, StateId, Transition, START_STATE};

/// Tolerance for the weight agreement invariant between merged same-label
/// transitions. The graph builder derives weights from position and token
/// length only, so merged transitions from a shared prefix must agree;
/// anything beyond this is reported and the earliest-inserted weight wins.
const WEIGHT_TOLERANCE: f32 = 1e-6;

/// Determinize `fst`, producing a structurally equivalent graph in which
/// every state has at most one outgoing transition per label.
///
/// Merged states are final iff any member state is final. When two merged
/// transitions disagree on weight, the earliest-inserted transition (the
/// earliest-registered phrase) wins; the disagreement is logged at debug
/// level.
#[must_use]
pub fn determinize(fst: &ContextFst) -> ContextFst {
    let mut out = ContextFst::new();
    if fst.num_states() == 0 {
        return out;
    }

    let mut subset_ids: HashMap<Vec<StateId>, StateId> = HashMap::new();
    let mut worklist: Vec<Vec<StateId>> = Vec::new();

    let start_subset = vec![START_STATE];
    let start = out.add_state();
    if subset_is_final(fst, &start_subset) {
        out.set_final(start);
    }
    subset_ids.insert(start_subset.clone(), start);
    worklist.push(start_subset);

    while let Some(subset) = worklist.pop() {
        let from = subset_ids[&subset];

        // Group member transitions by label, preserving first-seen order.
        // Members are sorted ascending, so earlier-created states (earlier
        // phrases) contribute first.
        let mut groups: Vec<(Label, f32, Vec<StateId>)> = Vec::new();
        let mut group_index: HashMap<Label, usize> = HashMap::new();
        for &member in &subset {
            for t in fst.transitions(member) {
                match group_index.get(&t.label) {
                    Some(&i) => {
                        let (_, first_weight, targets) = &mut groups[i];
                        if (t.weight - *first_weight).abs() > WEIGHT_TOLERANCE {
                            log::debug!(
                                "merged {:?} transitions disagree on weight \
                                 ({} vs {}); keeping the earliest",
                                t.label,
                                first_weight,
                                t.weight
                            );
                        }
                        targets.push(t.target);
                    }
                    None => {
                        group_index.insert(t.label, groups.len());
                        groups.push((t.label, t.weight, vec![t.target]));
                    }
                }
            }
        }

        for (label, weight, mut targets) in groups {
            targets.sort_unstable();
            targets.dedup();
            let target = match subset_ids.get(&targets) {
                Some(&id) => id,
                None => {
                    let id = out.add_state();
                    if subset_is_final(fst, &targets) {
                        out.set_final(id);
                    }
                    subset_ids.insert(targets.clone(), id);
                    worklist.push(targets);
                    id
                }
            };
            out.add_transition(
                from,
                Transition {
                    label,
                    weight,
                    target,
                },
            );
        }
    }

    out
}

fn subset_is_final(fst: &ContextFst, subset: &[StateId]) -> bool {
    subset.iter().any(|&s| fst.is_final(s))
}
