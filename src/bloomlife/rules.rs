//! Rule table generation for B3/S23 with lifecycle classification.
//!
//! The table maps (currently alive, alive neighbor count) to the next
//! liveness and the lifecycle class the cell is rendered with. A non-alive
//! cell that stays lifeless classifies as `Empty`; the engine demotes any
//! `Dead` marker it carried.

use super::lifecycle::Lifecycle;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub alive: bool,
    pub class: Lifecycle,
}

const EMPTY_OUTCOME: Outcome = Outcome {
    alive: false,
    class: Lifecycle::Empty,
};

pub struct RuleTable {
    table: [Outcome; 18],
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleTable {
    pub fn new() -> Self {
        let mut table = [EMPTY_OUTCOME; 18];
        for alive in [false, true] {
            for neighbors in 0u8..=8 {
                table[slot(alive, neighbors)] = output_for(alive, neighbors);
            }
        }
        Self { table }
    }

    #[inline(always)]
    pub fn lookup(&self, alive: bool, neighbors: u8) -> Outcome {
        debug_assert!(neighbors <= 8, "neighbor count {neighbors} out of range");
        self.table[slot(alive, neighbors)]
    }
}

#[inline(always)]
fn slot(alive: bool, neighbors: u8) -> usize {
    (alive as usize) * 9 + neighbors as usize
}

fn output_for(alive: bool, neighbors: u8) -> Outcome {
    match (alive, neighbors) {
        (true, 2 | 3) => Outcome {
            alive: true,
            class: Lifecycle::Survivor,
        },
        (true, _) => Outcome {
            alive: false,
            class: Lifecycle::Dead,
        },
        (false, 3) => Outcome {
            alive: true,
            class: Lifecycle::New,
        },
        (false, _) => EMPTY_OUTCOME,
    }
}
