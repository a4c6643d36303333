//! Per-species trait vectors.
//!
//! A genome is an ordered, fixed set of named `f64` genes. The two species
//! carry disjoint field sets; [`Genome`] tags which one an agent owns.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Species tag derived from a genome variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Prey,
    Predator,
}

/// Flocking traits of a prey boid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreyGenome {
    /// How far neighbours are seen
    pub visual_range: f64,
    /// Velocity nudge applied near a world edge
    pub turning_factor: f64,
    /// Distance from an edge at which turning starts
    pub screen_margin: f64,
    /// Heading of the directional bias, in degrees
    pub bias_direction: f64,
    /// Blend weight toward the bias heading
    pub bias_val: f64,
    pub speed_limit: f64,
    pub speed_pref: f64,
    /// Gain steering speed toward `speed_pref`
    pub propulsion: f64,
    pub avoid_factor: f64,
    /// Neighbours closer than this are avoided rather than followed
    pub protected_range: f64,
    pub matching_factor: f64,
    pub centering_factor: f64,
    pub predator_detection_range: f64,
    pub predator_turn_factor: f64,
}

impl PreyGenome {
    pub const FIELDS: [&'static str; 14] = [
        "visual_range",
        "turning_factor",
        "screen_margin",
        "bias_direction",
        "bias_val",
        "speed_limit",
        "speed_pref",
        "propulsion",
        "avoid_factor",
        "protected_range",
        "matching_factor",
        "centering_factor",
        "predator_detection_range",
        "predator_turn_factor",
    ];

    pub fn genes(&self) -> [f64; 14] {
        [
            self.visual_range,
            self.turning_factor,
            self.screen_margin,
            self.bias_direction,
            self.bias_val,
            self.speed_limit,
            self.speed_pref,
            self.propulsion,
            self.avoid_factor,
            self.protected_range,
            self.matching_factor,
            self.centering_factor,
            self.predator_detection_range,
            self.predator_turn_factor,
        ]
    }

    pub fn from_genes(g: [f64; 14]) -> Self {
        Self {
            visual_range: g[0],
            turning_factor: g[1],
            screen_margin: g[2],
            bias_direction: g[3],
            bias_val: g[4],
            speed_limit: g[5],
            speed_pref: g[6],
            propulsion: g[7],
            avoid_factor: g[8],
            protected_range: g[9],
            matching_factor: g[10],
            centering_factor: g[11],
            predator_detection_range: g[12],
            predator_turn_factor: g[13],
        }
    }
}

impl Default for PreyGenome {
    fn default() -> Self {
        Self {
            visual_range: 40.0,
            turning_factor: 0.2,
            screen_margin: 20.0,
            bias_direction: 0.0,
            bias_val: 0.001,
            speed_limit: 6.0,
            speed_pref: 4.0,
            propulsion: 0.05,
            avoid_factor: 0.05,
            protected_range: 8.0,
            matching_factor: 0.05,
            centering_factor: 0.0005,
            predator_detection_range: 60.0,
            predator_turn_factor: 0.5,
        }
    }
}

/// Pursuit traits of a predator boid
///
/// `close_radius`, `group_follow_size` and `grouping_radius` are carried for
/// config compatibility and inheritance; nearest-prey pursuit does not read them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredatorGenome {
    pub speed_limit: f64,
    pub speed_pref: f64,
    pub vision_radius: f64,
    pub close_radius: f64,
    pub group_follow_size: f64,
    pub grouping_radius: f64,
    /// Prey strictly closer than this are caught
    pub catch_radius: f64,
}

impl PredatorGenome {
    pub const FIELDS: [&'static str; 7] = [
        "speed_limit",
        "speed_pref",
        "vision_radius",
        "close_radius",
        "group_follow_size",
        "grouping_radius",
        "catch_radius",
    ];

    pub fn genes(&self) -> [f64; 7] {
        [
            self.speed_limit,
            self.speed_pref,
            self.vision_radius,
            self.close_radius,
            self.group_follow_size,
            self.grouping_radius,
            self.catch_radius,
        ]
    }

    pub fn from_genes(g: [f64; 7]) -> Self {
        Self {
            speed_limit: g[0],
            speed_pref: g[1],
            vision_radius: g[2],
            close_radius: g[3],
            group_follow_size: g[4],
            grouping_radius: g[5],
            catch_radius: g[6],
        }
    }
}

impl Default for PredatorGenome {
    fn default() -> Self {
        Self {
            speed_limit: 8.0,
            speed_pref: 5.0,
            vision_radius: 80.0,
            close_radius: 30.0,
            group_follow_size: 5.0,
            grouping_radius: 20.0,
            catch_radius: 3.0,
        }
    }
}

/// Genome of a single agent, tagged by species
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "species", rename_all = "lowercase")]
pub enum Genome {
    Prey(PreyGenome),
    Predator(PredatorGenome),
}

impl Genome {
    pub fn species(&self) -> Species {
        match self {
            Genome::Prey(_) => Species::Prey,
            Genome::Predator(_) => Species::Predator,
        }
    }

    /// Gene names in canonical order
    pub fn field_names(&self) -> &'static [&'static str] {
        match self {
            Genome::Prey(_) => &PreyGenome::FIELDS,
            Genome::Predator(_) => &PredatorGenome::FIELDS,
        }
    }

    /// Gene values in canonical order
    pub fn genes(&self) -> Vec<f64> {
        match self {
            Genome::Prey(g) => g.genes().to_vec(),
            Genome::Predator(g) => g.genes().to_vec(),
        }
    }

    /// Build a genome of the same species from `genes`.
    ///
    /// Returns `None` if the length does not match the species' field set.
    pub fn with_genes(&self, genes: &[f64]) -> Option<Genome> {
        match self {
            Genome::Prey(_) => genes
                .try_into()
                .ok()
                .map(|g: [f64; 14]| Genome::Prey(PreyGenome::from_genes(g))),
            Genome::Predator(_) => genes
                .try_into()
                .ok()
                .map(|g: [f64; 7]| Genome::Predator(PredatorGenome::from_genes(g))),
        }
    }

    /// Named view of the genes, in canonical order
    pub fn fields(&self) -> Vec<(&'static str, f64)> {
        self.field_names()
            .iter()
            .copied()
            .zip(self.genes())
            .collect()
    }

    /// Return a copy with every gene scaled by `1 + U(-rate, rate)`.
    ///
    /// A gene of exactly zero stays zero.
    pub fn vary<R: Rng + ?Sized>(&self, rate: f64, rng: &mut R) -> Genome {
        let varied: Vec<f64> = self
            .genes()
            .into_iter()
            .map(|g| g * (1.0 + rng.gen_range(-rate..=rate)))
            .collect();
        match self {
            Genome::Prey(_) => Genome::Prey(PreyGenome::from_genes(to_array(&varied))),
            Genome::Predator(_) => Genome::Predator(PredatorGenome::from_genes(to_array(&varied))),
        }
    }

    /// Radius used when querying the spatial index for this agent
    pub fn visual_range(&self) -> f64 {
        match self {
            Genome::Prey(g) => g.visual_range,
            Genome::Predator(g) => g.vision_radius,
        }
    }

    pub fn speed_limit(&self) -> f64 {
        match self {
            Genome::Prey(g) => g.speed_limit,
            Genome::Predator(g) => g.speed_limit,
        }
    }

    pub fn as_prey(&self) -> Option<&PreyGenome> {
        match self {
            Genome::Prey(g) => Some(g),
            Genome::Predator(_) => None,
        }
    }

    pub fn as_predator(&self) -> Option<&PredatorGenome> {
        match self {
            Genome::Predator(g) => Some(g),
            Genome::Prey(_) => None,
        }
    }
}

fn to_array<const N: usize>(genes: &[f64]) -> [f64; N] {
    let mut out = [0.0; N];
    out.copy_from_slice(genes);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_field_sets_are_disjoint_in_kind() {
        let prey = Genome::Prey(PreyGenome::default());
        let pred = Genome::Predator(PredatorGenome::default());

        assert_eq!(prey.field_names().len(), 14);
        assert_eq!(pred.field_names().len(), 7);
        assert_eq!(prey.species(), Species::Prey);
        assert_eq!(pred.species(), Species::Predator);
    }

    #[test]
    fn test_gene_order_matches_field_names() {
        let genome = Genome::Prey(PreyGenome::default());
        let fields = genome.fields();

        assert_eq!(fields[0], ("visual_range", 40.0));
        assert_eq!(fields[9], ("protected_range", 8.0));
        assert_eq!(fields[13].0, "predator_turn_factor");
    }

    #[test]
    fn test_with_genes_rejects_wrong_length() {
        let genome = Genome::Predator(PredatorGenome::default());
        assert!(genome.with_genes(&[1.0; 14]).is_none());

        let rebuilt = genome.with_genes(&[2.0; 7]).unwrap();
        assert_eq!(rebuilt.as_predator().unwrap().catch_radius, 2.0);
    }

    #[test]
    fn test_vary_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let genome = Genome::Prey(PreyGenome::default());

        for _ in 0..100 {
            let varied = genome.vary(0.1, &mut rng);
            for (before, after) in genome.genes().iter().zip(varied.genes()) {
                assert!((after - before).abs() <= 0.1 * before.abs() + 1e-12);
            }
        }
    }

    #[test]
    fn test_vary_keeps_zero_genes() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let genome = Genome::Prey(PreyGenome::default());
        let varied = genome.vary(0.5, &mut rng);

        // bias_direction defaults to 0.0
        assert_eq!(varied.as_prey().unwrap().bias_direction, 0.0);
    }

    #[test]
    fn test_genome_yaml_field_names() {
        let yaml = serde_yaml::to_string(&PredatorGenome::default()).unwrap();
        for name in PredatorGenome::FIELDS {
            assert!(yaml.contains(name), "missing {}", name);
        }
    }
}
