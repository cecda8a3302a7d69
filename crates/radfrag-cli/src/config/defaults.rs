use radfrag::core::fragmentation::StrategyKind;
use radfrag::core::models::candidate::SameMoleculeRule;

pub struct DefaultsConfig {
    pub species: String,
    pub ambiguity_level: u8,
    pub same_molecule_rule: SameMoleculeRule,
    pub ppm: f64,
    pub missed_monoisotopics: u32,
    pub strategy: StrategyKind,
    pub variable_mod_count: usize,
    pub missed_cleavages: usize,
    pub max_fragmentation_events: usize,
    pub max_exhaustive_pool: usize,
    pub max_combinations_per_size: usize,
    pub chunk_count: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            species: "unspecified".to_string(),
            ambiguity_level: 1,
            same_molecule_rule: SameMoleculeRule::IdentityOrSequence,
            ppm: 10.0,
            missed_monoisotopics: 0,
            strategy: StrategyKind::Backbone,
            variable_mod_count: 0,
            missed_cleavages: 0,
            max_fragmentation_events: 1,
            max_exhaustive_pool: 24,
            max_combinations_per_size: 100_000,
            chunk_count: 16,
        }
    }
}
