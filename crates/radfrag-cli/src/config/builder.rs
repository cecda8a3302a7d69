use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::AppConfig;
use crate::cli::ExploreArgs;
use crate::error::{CliError, Result};
use radfrag::core::fragmentation::FragmentationParams;
use radfrag::core::tolerance::MassTolerance;
use radfrag::engine::config::{self as core_config, AmbiguityLevel, SearchLimits};
use std::str::FromStr;

pub fn build_config(args: &ExploreArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let analysis_file = file_config.analysis.take().unwrap_or_default();
    let species = args
        .species
        .clone()
        .or(analysis_file.species)
        .unwrap_or(defaults.species);
    let ambiguity_level = args
        .ambiguity_level
        .or(analysis_file.ambiguity_level)
        .unwrap_or(defaults.ambiguity_level);
    let ambiguity_level =
        AmbiguityLevel::try_from(ambiguity_level).map_err(|e| CliError::Config(e.to_string()))?;
    let same_molecule_rule = analysis_file
        .same_molecule_rule
        .unwrap_or(defaults.same_molecule_rule);

    let tolerance_file = file_config.tolerance.take().unwrap_or_default();
    let ppm = args.ppm.or(tolerance_file.ppm).unwrap_or(defaults.ppm);
    let missed_monoisotopics = args
        .missed_monoisotopics
        .or(tolerance_file.missed_monoisotopics)
        .unwrap_or(defaults.missed_monoisotopics);
    let mut tolerance = MassTolerance::ppm(ppm).with_missed_monoisotopics(missed_monoisotopics);
    if let Some(spacing) = tolerance_file.isotope_spacing {
        tolerance = tolerance.with_isotope_spacing(spacing);
    }

    let fragmentation_file = file_config.fragmentation.take().unwrap_or_default();
    let strategy = args
        .strategy
        .or(fragmentation_file.strategy)
        .unwrap_or(defaults.strategy);
    let params = FragmentationParams {
        variable_mod_count: args
            .variable_mod_count
            .or(fragmentation_file.variable_mod_count)
            .unwrap_or(defaults.variable_mod_count),
        missed_cleavages: fragmentation_file
            .missed_cleavages
            .unwrap_or(defaults.missed_cleavages),
        max_fragmentation_events: args
            .max_fragmentation_events
            .or(fragmentation_file.max_fragmentation_events)
            .unwrap_or(defaults.max_fragmentation_events),
        target_residue: fragmentation_file.target_residue,
    };

    let search_file = file_config.search.take().unwrap_or_default();
    let search_limits = SearchLimits {
        max_exhaustive_pool: search_file
            .max_exhaustive_pool
            .unwrap_or(defaults.max_exhaustive_pool),
        max_combinations_per_size: search_file
            .max_combinations_per_size
            .unwrap_or(defaults.max_combinations_per_size),
    };

    let execution_file = file_config.execution.take().unwrap_or_default();
    let chunk_count = args
        .chunk_count
        .or(execution_file.chunk_count)
        .unwrap_or(defaults.chunk_count);
    let override_existing =
        args.override_existing || execution_file.override_existing.unwrap_or(false);
    let verify_chunks = args.verify_chunks || execution_file.verify_chunks.unwrap_or(false);

    let core_config = core_config::ExplorerConfigBuilder::new()
        .species(species)
        .ambiguity_level(ambiguity_level)
        .same_molecule_rule(same_molecule_rule)
        .tolerance(tolerance)
        .strategy(strategy)
        .fragmentation_params(params)
        .site_seed(fragmentation_file.site_seed)
        .search_limits(search_limits)
        .output_dir(args.output.clone())
        .chunk_count(chunk_count)
        .max_threads(execution_file.max_threads)
        .override_existing(override_existing)
        .verify_chunks(verify_chunks)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(AppConfig {
        input_path: args.input.clone(),
        core_config,
    })
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| {
        CliError::Config(format!(
            "Invalid value for {}: '{}' ({} expected)",
            key,
            value,
            std::any::type_name::<T>()
        ))
    })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    if set_values.is_empty() {
        return Ok(config);
    }
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };

        match key {
            "analysis.species" => {
                config.analysis.get_or_insert_with(Default::default).species =
                    Some(value_str.to_string());
            }
            "analysis.ambiguity-level" => {
                config
                    .analysis
                    .get_or_insert_with(Default::default)
                    .ambiguity_level = Some(parse_value(key, value_str)?);
            }
            "analysis.same-molecule-rule" => {
                config
                    .analysis
                    .get_or_insert_with(Default::default)
                    .same_molecule_rule = Some(
                    value_str
                        .parse()
                        .map_err(|e: String| CliError::Config(e))?,
                );
            }
            "tolerance.ppm" => {
                config.tolerance.get_or_insert_with(Default::default).ppm =
                    Some(parse_value(key, value_str)?);
            }
            "tolerance.missed-monoisotopics" => {
                config
                    .tolerance
                    .get_or_insert_with(Default::default)
                    .missed_monoisotopics = Some(parse_value(key, value_str)?);
            }
            "tolerance.isotope-spacing" => {
                config
                    .tolerance
                    .get_or_insert_with(Default::default)
                    .isotope_spacing = Some(parse_value(key, value_str)?);
            }
            "fragmentation.strategy" => {
                config
                    .fragmentation
                    .get_or_insert_with(Default::default)
                    .strategy = Some(
                    value_str
                        .parse()
                        .map_err(|e: String| CliError::Config(e))?,
                );
            }
            "fragmentation.variable-mod-count" => {
                config
                    .fragmentation
                    .get_or_insert_with(Default::default)
                    .variable_mod_count = Some(parse_value(key, value_str)?);
            }
            "fragmentation.missed-cleavages" => {
                config
                    .fragmentation
                    .get_or_insert_with(Default::default)
                    .missed_cleavages = Some(parse_value(key, value_str)?);
            }
            "fragmentation.max-fragmentation-events" => {
                config
                    .fragmentation
                    .get_or_insert_with(Default::default)
                    .max_fragmentation_events = Some(parse_value(key, value_str)?);
            }
            "fragmentation.target-residue" => {
                config
                    .fragmentation
                    .get_or_insert_with(Default::default)
                    .target_residue = Some(parse_value(key, value_str)?);
            }
            "fragmentation.site-seed" => {
                config
                    .fragmentation
                    .get_or_insert_with(Default::default)
                    .site_seed = Some(parse_value(key, value_str)?);
            }
            "search.max-exhaustive-pool" => {
                config
                    .search
                    .get_or_insert_with(Default::default)
                    .max_exhaustive_pool = Some(parse_value(key, value_str)?);
            }
            "search.max-combinations-per-size" => {
                config
                    .search
                    .get_or_insert_with(Default::default)
                    .max_combinations_per_size = Some(parse_value(key, value_str)?);
            }
            "execution.chunk-count" => {
                config
                    .execution
                    .get_or_insert_with(Default::default)
                    .chunk_count = Some(parse_value(key, value_str)?);
            }
            "execution.max-threads" => {
                config
                    .execution
                    .get_or_insert_with(Default::default)
                    .max_threads = Some(parse_value(key, value_str)?);
            }
            "execution.override-existing" => {
                config
                    .execution
                    .get_or_insert_with(Default::default)
                    .override_existing = Some(parse_value(key, value_str)?);
            }
            "execution.verify-chunks" => {
                config
                    .execution
                    .get_or_insert_with(Default::default)
                    .verify_chunks = Some(parse_value(key, value_str)?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
