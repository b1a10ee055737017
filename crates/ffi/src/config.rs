use wildfire_ca_core::{
    ClassifierConfig, ExecutionMode, RegrowthStart, SimulationConfig, TransitionParams,
};

/// C-compatible, flattened simulation configuration.
///
/// Obtain reference values with `wildfire_config_default()` and override fields
/// as needed before passing it to `wildfire_new`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WildfireConfig {
    pub width: usize,
    pub height: usize,
    /// Multiplier on the spontaneous ignition probability
    pub scale_factor: f64,
    pub tick_interval_ms: u64,
    /// Frames an ignition marker stays visible
    pub outline_display_length: u32,
    /// Sharpen blend applied before classification, 0 disables
    pub sharpen_amount: f64,
    /// When false `seed` is ignored and streams are drawn from entropy
    pub use_seed: bool,
    pub seed: u64,
    /// Step rows across a thread pool; results equal sequential stepping
    pub parallel: bool,

    pub burnable_hue: f64,
    pub max_hue_delta: f64,
    pub max_tree_value: f64,
    /// When false the saturation floor is not checked
    pub use_saturation_floor: bool,
    pub min_tree_saturation: f64,
    pub max_fuel: f64,

    pub energy_transfer_mean: f64,
    pub energy_transfer_std_dev: f64,
    pub probability_of_fire_transfer: f64,
    pub random_burn_rate_probability: f64,
    pub initial_energy_mean: f64,
    pub initial_energy_std_dev: f64,
    pub extinguish_threshold: f64,
    pub regrowth_k_iterations: f64,
    /// Burned cells regrow at full capacity instead of zero fuel
    pub regrow_full: bool,
    pub ignition_fuel_ratio: f64,
}

impl From<&SimulationConfig> for WildfireConfig {
    fn from(config: &SimulationConfig) -> Self {
        let c = &config.classifier;
        let t = &config.transition;
        Self {
            width: config.width,
            height: config.height,
            scale_factor: config.scale_factor,
            tick_interval_ms: config.tick_interval_ms,
            outline_display_length: config.outline_display_length,
            sharpen_amount: config.sharpen_amount,
            use_seed: config.seed.is_some(),
            seed: config.seed.unwrap_or(0),
            parallel: config.execution == ExecutionMode::Parallel,
            burnable_hue: c.burnable_hue,
            max_hue_delta: c.max_hue_delta,
            max_tree_value: c.max_tree_value,
            use_saturation_floor: c.min_tree_saturation.is_some(),
            min_tree_saturation: c.min_tree_saturation.unwrap_or(0.0),
            max_fuel: c.max_fuel,
            energy_transfer_mean: t.energy_transfer_mean,
            energy_transfer_std_dev: t.energy_transfer_std_dev,
            probability_of_fire_transfer: t.probability_of_fire_transfer,
            random_burn_rate_probability: t.random_burn_rate_probability,
            initial_energy_mean: t.initial_energy_mean,
            initial_energy_std_dev: t.initial_energy_std_dev,
            extinguish_threshold: t.extinguish_threshold,
            regrowth_k_iterations: t.regrowth_k_iterations,
            regrow_full: t.regrowth_start == RegrowthStart::Full,
            ignition_fuel_ratio: t.ignition_fuel_ratio,
        }
    }
}

impl From<&WildfireConfig> for SimulationConfig {
    fn from(config: &WildfireConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            scale_factor: config.scale_factor,
            tick_interval_ms: config.tick_interval_ms,
            outline_display_length: config.outline_display_length,
            sharpen_amount: config.sharpen_amount,
            seed: config.use_seed.then_some(config.seed),
            execution: if config.parallel {
                ExecutionMode::Parallel
            } else {
                ExecutionMode::Sequential
            },
            classifier: ClassifierConfig {
                burnable_hue: config.burnable_hue,
                max_hue_delta: config.max_hue_delta,
                max_tree_value: config.max_tree_value,
                min_tree_saturation: config
                    .use_saturation_floor
                    .then_some(config.min_tree_saturation),
                max_fuel: config.max_fuel,
            },
            transition: TransitionParams {
                energy_transfer_mean: config.energy_transfer_mean,
                energy_transfer_std_dev: config.energy_transfer_std_dev,
                probability_of_fire_transfer: config.probability_of_fire_transfer,
                random_burn_rate_probability: config.random_burn_rate_probability,
                initial_energy_mean: config.initial_energy_mean,
                initial_energy_std_dev: config.initial_energy_std_dev,
                extinguish_threshold: config.extinguish_threshold,
                regrowth_k_iterations: config.regrowth_k_iterations,
                regrowth_start: if config.regrow_full {
                    RegrowthStart::Full
                } else {
                    RegrowthStart::Depleted
                },
                ignition_fuel_ratio: config.ignition_fuel_ratio,
            },
        }
    }
}

/// Reference configuration (928×800 raster, one tick per second, entropy seeding).
#[no_mangle]
pub extern "C" fn wildfire_config_default() -> WildfireConfig {
    WildfireConfig::from(&SimulationConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_round_trips_through_c_layout() {
        let config = SimulationConfig {
            seed: Some(42),
            ..SimulationConfig::default()
        };
        let c = WildfireConfig::from(&config);
        assert!(c.use_seed);
        assert_eq!(SimulationConfig::from(&c), config);
        assert_eq!(wildfire_config_default().width, 928);
    }
}
