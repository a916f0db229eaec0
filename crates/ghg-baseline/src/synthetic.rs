//! Deterministic synthetic training population
//!
//! Companies are drawn around the industry intensity benchmarks:
//!
//! ```text
//! revenue      ~ LogNormal(μ, σ)
//! employees    = revenue / U(100k, 500k)
//! energy spend = revenue × U(0.02, 0.05)
//! floor area   = employees × U(100, 500) sq ft
//! total        = revenue / 1M × intensity × U(0.7, 1.3) × U(0.9, 1.1)
//! ```

use crate::config::BaselineConfig;
use crate::error::BaselineError;
use ghg_domain::Industry;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::LogNormal;

/// One synthetic company
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSample {
    /// Annual revenue, USD
    pub revenue: f64,
    /// Headcount
    pub employees: f64,
    /// Annual energy spend, USD
    pub energy_spend: f64,
    /// Floor area, sq ft
    pub facility_area: f64,
    /// Industry
    pub industry: Industry,
    /// Annual emissions, t CO2e
    pub total: f64,
}

/// Generate `config.samples` companies from `config.seed`
pub fn generate(config: &BaselineConfig) -> Result<Vec<TrainingSample>, BaselineError> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let revenue_dist = LogNormal::new(config.revenue_log_mean, config.revenue_log_sigma)
        .map_err(|e| BaselineError::Sampling(format!("revenue distribution: {}", e)))?;

    let industries = Industry::BENCHMARKED;
    let mut samples = Vec::with_capacity(config.samples);

    for _ in 0..config.samples {
        let industry = industries[rng.gen_range(0..industries.len())].clone();
        let revenue: f64 = revenue_dist.sample(&mut rng);
        let employees = (revenue / rng.gen_range(100_000.0..500_000.0)).floor();
        let energy_spend = revenue * rng.gen_range(0.02..0.05);
        let facility_area = employees * rng.gen_range(100.0..500.0);

        let noise: f64 = rng.gen_range(0.7..1.3);
        let regional: f64 = rng.gen_range(0.9..1.1);
        let total = revenue / 1_000_000.0 * industry.intensity() * noise * regional;

        samples.push(TrainingSample {
            revenue,
            employees,
            energy_spend,
            facility_area,
            industry,
            total,
        });
    }

    Ok(samples)
}
