//! The six placement strategies behind one small capability surface:
//! start-cell ordering, neighbor ordering, and an optional fill pass. The
//! search kernel itself lives in [`crate::pathfinder`]; everything here only
//! biases it.

pub mod edge_hugger;
pub mod fill;
pub mod max_clump;
pub mod random_adaptive;
pub mod smart_dynamic;
pub mod spiral_fill;
pub mod symmetric;

use std::collections::VecDeque;

use decorum::N64;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use tinyvec::TinyVec;

use snakeout_grid::{Cell, Delta, Occupancy};

use crate::driver::Constraints;
use crate::layout::Layout;
use crate::pathfinder::{
    find_exitable_path, SearchLimits, DEFAULT_MAX_NODES, DEFAULT_STOP_CHANCE,
};
use symmetric::SymmetryKind;

/// Which bonus fill a strategy runs after its main phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillPass {
    None,
    MultiPass,
    MinFragment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    SmartDynamic,
    RandomAdaptive,
    EdgeHugger,
    MaxClump,
    SpiralFill,
    Symmetrical,
}

impl StrategyKind {
    pub fn parse(name: &str) -> Option<StrategyKind> {
        match name {
            "SMART_DYNAMIC" => Some(StrategyKind::SmartDynamic),
            "RANDOM_ADAPTIVE" => Some(StrategyKind::RandomAdaptive),
            "EDGE_HUGGER" => Some(StrategyKind::EdgeHugger),
            "MAX_CLUMP" => Some(StrategyKind::MaxClump),
            "SPIRAL_FILL" => Some(StrategyKind::SpiralFill),
            "SYMMETRICAL" => Some(StrategyKind::Symmetrical),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::SmartDynamic => "SMART_DYNAMIC",
            StrategyKind::RandomAdaptive => "RANDOM_ADAPTIVE",
            StrategyKind::EdgeHugger => "EDGE_HUGGER",
            StrategyKind::MaxClump => "MAX_CLUMP",
            StrategyKind::SpiralFill => "SPIRAL_FILL",
            StrategyKind::Symmetrical => "SYMMETRICAL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpiralDirection {
    Random,
    Clockwise,
    CounterClockwise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpiralStart {
    Random,
    Center,
    Corner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymmetryChoice {
    Random,
    Horizontal,
    Vertical,
    Both,
    Radial,
}

/// Tuning knobs for all strategies, with the defaults the engine ships with.
/// Requests may override any subset.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    // SmartDynamic
    pub depth_priority: f64,
    pub pool_fraction: f64,
    // EdgeHugger
    pub edge_distance_max: i32,
    pub corner_priority: bool,
    pub wall_follow_strength: f64,
    // MaxClump
    pub min_area_size: usize,
    pub expansion_rate: f64,
    pub avoid_edges: bool,
    // SpiralFill
    pub spiral_direction: SpiralDirection,
    pub spiral_start: SpiralStart,
    pub tightness: f64,
    // Symmetrical
    pub symmetry_type: SymmetryChoice,
    // RandomAdaptive
    pub prefer_edges: bool,
    pub avoid_corners: bool,
}

impl Default for StrategyConfig {
    fn default() -> StrategyConfig {
        StrategyConfig {
            depth_priority: 0.7,
            pool_fraction: 0.25,
            edge_distance_max: 2,
            corner_priority: true,
            wall_follow_strength: 0.8,
            min_area_size: 4,
            expansion_rate: 0.6,
            avoid_edges: false,
            spiral_direction: SpiralDirection::Random,
            spiral_start: SpiralStart::Random,
            tightness: 0.7,
            symmetry_type: SymmetryChoice::Random,
            prefer_edges: false,
            avoid_corners: false,
        }
    }
}

/// One strategy instance, holding its config plus whatever per-attempt state
/// the variant needs (the SmartDynamic candidate cache, resolved spiral and
/// symmetry choices).
#[derive(Debug)]
pub struct Strategy {
    kind: StrategyKind,
    cfg: StrategyConfig,
    cache: VecDeque<Cell>,
    spiral_cycle: [Delta; 4],
    spiral_start: SpiralStart,
    symmetry: SymmetryKind,
}

impl Strategy {
    pub fn new(kind: StrategyKind, cfg: StrategyConfig) -> Strategy {
        Strategy {
            kind,
            cfg,
            cache: VecDeque::new(),
            spiral_cycle: spiral_fill::CLOCKWISE,
            spiral_start: SpiralStart::Center,
            symmetry: SymmetryKind::Horizontal,
        }
    }

    pub fn kind(&self) -> StrategyKind {
        self.kind
    }

    pub fn symmetry(&self) -> SymmetryKind {
        self.symmetry
    }

    /// Resolve the `random` config choices and reset cached state. Called
    /// once per generate attempt.
    pub fn begin_attempt(&mut self, rng: &mut ChaCha8Rng) {
        self.cache.clear();
        match self.kind {
            StrategyKind::SpiralFill => {
                let (cycle, start) = spiral_fill::resolve(&self.cfg, rng);
                self.spiral_cycle = cycle;
                self.spiral_start = start;
            }
            StrategyKind::Symmetrical => {
                self.symmetry = symmetric::resolve(self.cfg.symmetry_type, rng);
            }
            _ => {}
        }
    }

    pub fn fill_pass(&self) -> FillPass {
        match self.kind {
            StrategyKind::SmartDynamic => FillPass::None,
            StrategyKind::RandomAdaptive => FillPass::MultiPass,
            _ => FillPass::MinFragment,
        }
    }

    pub fn pick_starts(&mut self, occ: &Occupancy, rng: &mut ChaCha8Rng) -> Vec<Cell> {
        match self.kind {
            StrategyKind::SmartDynamic => {
                smart_dynamic::pick_starts(&self.cfg, &mut self.cache, occ, rng)
            }
            StrategyKind::RandomAdaptive => random_adaptive::pick_starts(&self.cfg, occ, rng),
            StrategyKind::EdgeHugger => edge_hugger::pick_starts(&self.cfg, occ, rng),
            StrategyKind::MaxClump => max_clump::pick_starts(&self.cfg, occ, rng),
            StrategyKind::SpiralFill => spiral_fill::pick_starts(self.spiral_start, occ, rng),
            StrategyKind::Symmetrical => symmetric::pick_starts(self.symmetry, occ, rng),
        }
    }

    pub fn order_neighbors(
        &self,
        occ: &Occupancy,
        path: &[Cell],
        nbs: &mut TinyVec<[Cell; 4]>,
        rng: &mut ChaCha8Rng,
    ) {
        match self.kind {
            StrategyKind::SmartDynamic => smart_dynamic::order(&self.cfg, occ, nbs, rng),
            StrategyKind::RandomAdaptive | StrategyKind::Symmetrical => nbs.shuffle(rng),
            StrategyKind::EdgeHugger => edge_hugger::order(&self.cfg, occ, nbs, rng),
            StrategyKind::MaxClump => max_clump::order(&self.cfg, occ, path, nbs, rng),
            StrategyKind::SpiralFill => {
                spiral_fill::order(self.spiral_cycle, self.cfg.tightness, path, nbs, rng)
            }
        }
    }
}

/// Run one full generation attempt: the strategy's main phase, then its
/// bonus fill when the request asked for one.
pub fn run_generation(
    strategy: &mut Strategy,
    layout: &mut Layout,
    constraints: &Constraints,
    bonus_fill: bool,
    rng: &mut ChaCha8Rng,
) {
    strategy.begin_attempt(rng);

    if strategy.kind() == StrategyKind::Symmetrical {
        symmetric::generate(strategy.symmetry(), layout, constraints, rng);
    } else {
        let limits = SearchLimits {
            min_len: constraints.min_len,
            max_len: constraints.max_len,
            min_bends: constraints.min_bends,
            max_bends: constraints.max_bends,
            max_nodes: DEFAULT_MAX_NODES,
            stop_chance: DEFAULT_STOP_CHANCE,
        };
        // Starts tried per snake before the placement is logged as failed.
        const START_POOL: usize = 20;
        for snake_no in 1..=constraints.arrow_count {
            let mut pool = strategy.pick_starts(&layout.occ, rng);
            if pool.is_empty() {
                pool = layout.occ.free_cells();
                pool.shuffle(rng);
            }
            pool.truncate(START_POOL);

            let mut placed = false;
            for &start in &pool {
                let occ = &layout.occ;
                let found = find_exitable_path(
                    occ,
                    start,
                    &limits,
                    rng,
                    &mut |path, nbs, rng| strategy.order_neighbors(occ, path, nbs, rng),
                );
                if let Some(path) = found {
                    let color = layout.pick_color(rng);
                    layout.place(path, color);
                    placed = true;
                    break;
                }
            }
            if !placed {
                layout.log(format!(
                    "Warning: Could not place Snake {snake_no} (Strict Solvability Mode)."
                ));
            }
        }
    }

    if bonus_fill {
        match strategy.fill_pass() {
            FillPass::None => {}
            FillPass::MultiPass => fill::multi_pass_fill(layout, constraints, rng),
            FillPass::MinFragment => fill::min_fragment_fill(layout, constraints, rng),
        }
    }
}

/// Distance from a cell to the nearest grid edge.
pub(crate) fn edge_distance(cell: Cell, rows: i32, cols: i32) -> i32 {
    cell.row
        .min(rows - 1 - cell.row)
        .min(cell.col)
        .min(cols - 1 - cell.col)
}

/// Sort cells ascending by a float score, via a total-ordered wrapper.
pub(crate) fn sorted_by_score(
    cells: impl IntoIterator<Item = Cell>,
    mut score: impl FnMut(Cell) -> f64,
) -> Vec<Cell> {
    let mut scored: Vec<(N64, Cell)> = cells
        .into_iter()
        .map(|cell| (N64::from(score(cell)), cell))
        .collect();
    scored.sort_by_key(|&(s, _)| s);
    scored.into_iter().map(|(_, cell)| cell).collect()
}

/// Reorder a neighbor list ascending by a float score.
pub(crate) fn order_by_score(
    nbs: &mut TinyVec<[Cell; 4]>,
    score: impl FnMut(Cell) -> f64,
) {
    let sorted = sorted_by_score(nbs.iter().copied(), score);
    nbs.clear();
    nbs.extend(sorted);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_names_round_trip() {
        for kind in [
            StrategyKind::SmartDynamic,
            StrategyKind::RandomAdaptive,
            StrategyKind::EdgeHugger,
            StrategyKind::MaxClump,
            StrategyKind::SpiralFill,
            StrategyKind::Symmetrical,
        ] {
            assert_eq!(StrategyKind::parse(kind.name()), Some(kind));
        }
        assert_eq!(StrategyKind::parse("LAYERED"), None);
    }

    #[test]
    fn config_overrides_merge_over_defaults() {
        let cfg: StrategyConfig =
            serde_json::from_str(r#"{"symmetry_type":"vertical","tightness":0.5}"#).unwrap();
        assert_eq!(cfg.symmetry_type, SymmetryChoice::Vertical);
        assert!((cfg.tightness - 0.5).abs() < 1e-9);
        assert!((cfg.depth_priority - 0.7).abs() < 1e-9);
    }

    #[test]
    fn edge_distance_is_symmetric() {
        assert_eq!(edge_distance(Cell::new(0, 5), 10, 10), 0);
        assert_eq!(edge_distance(Cell::new(4, 4), 10, 10), 4);
        assert_eq!(edge_distance(Cell::new(9, 2), 10, 10), 0);
    }
}
