//! Genetic operators for placement layouts.
//!
//! Initialization strategies, positional crossover, and the three mutation
//! operators (move, rotate, swap). All operators work on whole
//! [`PlacementSolution`]s, treat parents as read-only, and mark every
//! offspring unevaluated so the runner rescores it.

use rand::Rng;

use super::solution::PlacementSolution;
use crate::asset::{required_spacing, Asset, ALLOWED_ROTATIONS};

/// Largest per-axis displacement (meters) the move mutation applies.
pub const MOVE_MUTATION_MAX_OFFSET_M: f64 = 15.0;

/// Population initialization strategy, chosen once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitStrategy {
    /// Uniform random positions and rotations inside the placement extent.
    #[default]
    Random,
    /// A jittered lattice sized so neighbors start roughly spacing-apart.
    Grid,
    /// Centroid-biased placement: larger assets start nearer the center.
    Heuristic,
}

/// Axis-aligned extent assets may be placed in, with its centroid.
///
/// Derived by the runner from the buildable area (falling back to the site
/// boundary's bounding box).
#[derive(Debug, Clone, Copy)]
pub struct PlacementArea {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl PlacementArea {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x: max_x.max(min_x),
            max_y: max_y.max(min_y),
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Clamps a point into the extent.
    pub fn clamp(&self, x: f64, y: f64) -> (f64, f64) {
        (
            x.clamp(self.min_x, self.max_x),
            y.clamp(self.min_y, self.max_y),
        )
    }

    fn random_point<R: Rng>(&self, rng: &mut R) -> (f64, f64) {
        let x = if self.width() > 0.0 {
            rng.random_range(self.min_x..self.max_x)
        } else {
            self.min_x
        };
        let y = if self.height() > 0.0 {
            rng.random_range(self.min_y..self.max_y)
        } else {
            self.min_y
        };
        (x, y)
    }
}

/// Draws one of the allowed rotations.
fn random_rotation<R: Rng>(rng: &mut R) -> f64 {
    ALLOWED_ROTATIONS[rng.random_range(0..ALLOWED_ROTATIONS.len())]
}

/// Builds the initial population with the configured strategy.
///
/// Every individual contains one clone of each template asset with fresh
/// positions and rotations; identity and footprint are carried over.
pub fn initialize_population<R: Rng>(
    templates: &[Asset],
    area: PlacementArea,
    strategy: InitStrategy,
    population_size: usize,
    rng: &mut R,
) -> Vec<PlacementSolution> {
    (0..population_size)
        .map(|_| match strategy {
            InitStrategy::Random => random_individual(templates, area, rng),
            InitStrategy::Grid => grid_individual(templates, area, rng),
            InitStrategy::Heuristic => heuristic_individual(templates, area, rng),
        })
        .collect()
}

fn random_individual<R: Rng>(
    templates: &[Asset],
    area: PlacementArea,
    rng: &mut R,
) -> PlacementSolution {
    let assets = templates
        .iter()
        .map(|t| {
            let (x, y) = area.random_point(rng);
            t.clone().at(x, y).with_rotation(random_rotation(rng))
        })
        .collect();
    PlacementSolution::new(assets)
}

/// Lattice pitch: the widest footprint dimension plus the largest pairwise
/// spacing demand, so grid neighbors start out of each other's buffers.
fn grid_pitch(templates: &[Asset]) -> f64 {
    let max_dim = templates
        .iter()
        .map(|t| t.width_m.max(t.length_m))
        .fold(1.0, f64::max);
    let mut max_spacing = 0.0f64;
    for (i, a) in templates.iter().enumerate() {
        for b in &templates[i + 1..] {
            max_spacing = max_spacing.max(required_spacing(a, b));
        }
    }
    max_dim + max_spacing
}

fn grid_individual<R: Rng>(
    templates: &[Asset],
    area: PlacementArea,
    rng: &mut R,
) -> PlacementSolution {
    let pitch = grid_pitch(templates);
    let cols = ((area.width() / pitch).floor() as usize).max(1);

    // Whole-lattice jitter so individuals don't collapse onto one layout.
    let jitter = pitch * 0.25;
    let (ox, oy) = (
        rng.random_range(-jitter..jitter),
        rng.random_range(-jitter..jitter),
    );

    let assets = templates
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let (col, row) = (i % cols, i / cols);
            let x = area.min_x + pitch / 2.0 + col as f64 * pitch + ox;
            let y = area.min_y + pitch / 2.0 + row as f64 * pitch + oy;
            let (x, y) = area.clamp(x, y);
            t.clone().at(x, y).with_rotation(random_rotation(rng))
        })
        .collect();
    PlacementSolution::new(assets)
}

fn heuristic_individual<R: Rng>(
    templates: &[Asset],
    area: PlacementArea,
    rng: &mut R,
) -> PlacementSolution {
    // Largest assets claim the center; smaller ones scatter further out.
    let mut order: Vec<&Asset> = templates.iter().collect();
    order.sort_by(|a, b| {
        b.area()
            .partial_cmp(&a.area())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let (cx, cy) = area.center();
    let half_w = (area.width() / 2.0).max(1.0);
    let half_h = (area.height() / 2.0).max(1.0);
    let n = order.len().max(1) as f64;

    let mut assets: Vec<Asset> = order
        .into_iter()
        .enumerate()
        .map(|(i, t)| {
            let reach = ((i + 1) as f64 / n).sqrt();
            let x = cx + rng.random_range(-1.0..1.0) * half_w * reach;
            let y = cy + rng.random_range(-1.0..1.0) * half_h * reach;
            let (x, y) = area.clamp(x, y);
            t.clone().at(x, y).with_rotation(random_rotation(rng))
        })
        .collect();

    // Restore template order so crossover matches assets positionally too.
    assets.sort_by_key(|a| {
        templates
            .iter()
            .position(|t| t.id == a.id)
            .unwrap_or(usize::MAX)
    });
    PlacementSolution::new(assets)
}

/// Positional crossover: a convex blend of the parents' coordinates.
///
/// One blend factor `t` is drawn per child and applied to every matched
/// asset: `child = p1 + t * (p2 - p1)`. Rotations are inherited whole from
/// the nearer parent. Assets without a counterpart keep their first-parent
/// placement.
pub fn positional_crossover<R: Rng>(
    p1: &PlacementSolution,
    p2: &PlacementSolution,
    rng: &mut R,
) -> PlacementSolution {
    let mut child = p1.clone();
    let t: f64 = rng.random_range(0.0..=1.0);
    for asset in &mut child.assets {
        if let Some(twin) = p2.asset(&asset.id) {
            let x = asset.x + t * (twin.x - asset.x);
            let y = asset.y + t * (twin.y - asset.y);
            asset.set_position(x, y);
            if t >= 0.5 {
                asset.rotation_deg = twin.rotation_deg;
            }
        }
    }
    child.invalidate();
    child
}

/// Displaces one random asset by up to [`MOVE_MUTATION_MAX_OFFSET_M`] per
/// axis, clamped to the placement extent.
pub fn move_mutation<R: Rng>(solution: &mut PlacementSolution, area: PlacementArea, rng: &mut R) {
    if solution.assets.is_empty() {
        return;
    }
    let idx = rng.random_range(0..solution.assets.len());
    let dx = rng.random_range(-MOVE_MUTATION_MAX_OFFSET_M..MOVE_MUTATION_MAX_OFFSET_M);
    let dy = rng.random_range(-MOVE_MUTATION_MAX_OFFSET_M..MOVE_MUTATION_MAX_OFFSET_M);
    let asset = &mut solution.assets[idx];
    let (x, y) = area.clamp(asset.x + dx, asset.y + dy);
    asset.set_position(x, y);
    solution.invalidate();
}

/// Assigns one random asset a different allowed rotation.
pub fn rotate_mutation<R: Rng>(solution: &mut PlacementSolution, rng: &mut R) {
    if solution.assets.is_empty() {
        return;
    }
    let idx = rng.random_range(0..solution.assets.len());
    let asset = &mut solution.assets[idx];
    let current = asset.rotation_deg;
    let choices: Vec<f64> = ALLOWED_ROTATIONS
        .iter()
        .copied()
        .filter(|&r| r != current)
        .collect();
    asset.rotation_deg = choices[rng.random_range(0..choices.len())];
    solution.invalidate();
}

/// Exchanges the positions of two distinct random assets.
///
/// Rotations stay with the assets. Falls back to a move mutation when the
/// layout has fewer than two assets.
pub fn swap_mutation<R: Rng>(solution: &mut PlacementSolution, area: PlacementArea, rng: &mut R) {
    let n = solution.assets.len();
    if n < 2 {
        move_mutation(solution, area, rng);
        return;
    }
    let i = rng.random_range(0..n);
    let mut j = rng.random_range(0..n - 1);
    if j >= i {
        j += 1;
    }
    let (xi, yi) = solution.assets[i].position();
    let (xj, yj) = solution.assets[j].position();
    solution.assets[i].set_position(xj, yj);
    solution.assets[j].set_position(xi, yi);
    solution.invalidate();
}

/// Applies exactly one mutation operator, chosen uniformly.
pub fn mutate<R: Rng>(solution: &mut PlacementSolution, area: PlacementArea, rng: &mut R) {
    match rng.random_range(0..3) {
        0 => move_mutation(solution, area, rng),
        1 => rotate_mutation(solution, rng),
        _ => swap_mutation(solution, area, rng),
    }
}
