//! Integration tests for the command layer
//!
//! Drives each command's computation against files in a temporary
//! directory, the same way the binary does, without capturing stdout.

use ghg_calc::CalcError;
use ghg_cli::cli::{BaselineArgs, BatchArgs, CalculateArgs, MethodArg, NormalizeArgs};
use ghg_cli::commands::{baseline, batch, calculate, normalize};
use ghg_cli::{CliError, Config};
use ghg_pipeline::BaselineMethod;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const DATASET: &str = r#"{
    "company_name": "Northwind Components",
    "reporting_year": 2024,
    "facilities": [
        {
            "facility_id": "PLANT-1",
            "region": "US",
            "electricity_mwh": 2000,
            "natural_gas_therms": 10000,
            "data_quality": "Tier 2",
            "reporting_completeness": 0.9
        },
        {
            "facility_id": "DEPOT-2",
            "region": "DE",
            "scope_2": 50.0,
            "activities": [
                {
                    "facility_id": "DEPOT-2",
                    "scope": 1,
                    "category": "diesel",
                    "period_start": "2024-01-01",
                    "period_end": "2024-12-31",
                    "amount": 1000.0,
                    "unit": "liters"
                }
            ]
        }
    ],
    "company_profile": {"revenue": 20000000.0, "industry": "manufacturing_light"}
}"#;

const FACTORS: &str = r#"
[[factor]]
scope = 1
category = "diesel"
value = 2.68
unit = "kg_co2e_per_liter"
valid_from = "2020-01-01"

[[factor]]
scope = 2
category = "electricity"
value = 0.389
unit = "kg_co2e_per_kwh"
valid_from = "2020-01-01"
"#;

const RECORDS: &str = r#"[
    {
        "facility_id": "PLANT-1",
        "scope": 2,
        "category": "electricity",
        "period_start": "2024-01-01",
        "period_end": "2024-12-31",
        "amount": 1000.0,
        "unit": "kWh"
    },
    {
        "facility_id": "PLANT-1",
        "scope": 1,
        "category": "propane",
        "period_start": "2024-01-01",
        "period_end": "2024-12-31",
        "amount": 50.0,
        "unit": "gallons"
    }
]"#;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("dataset.json"), DATASET).unwrap();
        fs::write(dir.path().join("factors.toml"), FACTORS).unwrap();
        fs::write(dir.path().join("records.json"), RECORDS).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn normalize_args(&self) -> NormalizeArgs {
        NormalizeArgs {
            input: self.path("dataset.json"),
            factors: Some(self.path("factors.toml")),
            baseline: false,
            show_log: false,
            output: None,
        }
    }
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn test_normalize_with_factor_table() {
    let ws = Workspace::new();
    let out = normalize::normalize(&ws.normalize_args(), &Config::default()).unwrap();

    let plant = &out.facilities[0];
    assert_eq!(plant.electricity_kwh, Some(2_000_000.0));
    assert!(close(plant.scope_1.unwrap(), 10_000.0 * 0.0053));
    assert!(close(plant.scope_2.unwrap(), 2_000_000.0 * 0.000389));
    assert!(plant.scope_1_estimated);

    let depot = &out.facilities[1];
    assert!(close(depot.scope_1.unwrap(), 2.68));
    assert!(!depot.scope_1_estimated);

    // profile present, no estimator requested
    let baseline = out.baseline.unwrap();
    assert_eq!(baseline.method, BaselineMethod::IndustryAverage);
    assert!(close(baseline.value, 120.0 * 20.0));
}

#[test]
fn test_normalize_with_regression_baseline() {
    let ws = Workspace::new();
    let args = NormalizeArgs {
        baseline: true,
        ..ws.normalize_args()
    };
    let out = normalize::normalize(&args, &Config::default()).unwrap();
    assert_eq!(out.baseline.unwrap().method, BaselineMethod::EstimatorOnly);
}

#[test]
fn test_normalize_uses_configured_pipeline() {
    let ws = Workspace::new();
    let mut config = Config::default();
    config.pipeline.scope_3_ratio = 0.0;

    let out = normalize::normalize(&ws.normalize_args(), &config).unwrap();
    assert_eq!(out.facilities[0].scope_3, Some(0.0));
}

#[test]
fn test_normalize_missing_input() {
    let ws = Workspace::new();
    let args = NormalizeArgs {
        input: ws.path("absent.json"),
        ..ws.normalize_args()
    };
    assert!(matches!(
        normalize::normalize(&args, &Config::default()),
        Err(CliError::Io(_))
    ));
}

#[test]
fn test_malformed_factor_table() {
    let ws = Workspace::new();
    fs::write(ws.path("bad.toml"), "[[factor]]\nscope = \"one\"\n").unwrap();
    let args = NormalizeArgs {
        factors: Some(ws.path("bad.toml")),
        ..ws.normalize_args()
    };
    assert!(matches!(
        normalize::normalize(&args, &Config::default()),
        Err(CliError::InvalidInput(_))
    ));
}

#[test]
fn test_batch_reports_failures_per_record() {
    let ws = Workspace::new();
    let args = BatchArgs {
        records: ws.path("records.json"),
        factors: ws.path("factors.toml"),
        region: None,
    };
    let outcome = batch::batch(&args, &Config::default()).unwrap();

    assert_eq!(outcome.results.len(), 1);
    assert!(close(outcome.results[0].result.co2e_kg, 389.0));
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].index, 1);
    assert!(matches!(outcome.failures[0].error, CalcError::MissingFactor(_)));
}

#[test]
fn test_calculate_routes_by_scope() {
    let args = CalculateArgs {
        scope: 2,
        category: "electricity".to_string(),
        amount: 100.0,
        unit: "MWh".to_string(),
        factor: 0.389,
        factor_unit: "kg_co2e_per_kwh".to_string(),
        scope3_category: None,
        method: None,
    };
    let result = calculate::calculate(&args, &Config::default()).unwrap();
    assert!(close(result.co2e_kg, 38_900.0));

    let args = CalculateArgs {
        scope: 3,
        category: "purchased_goods".to_string(),
        amount: 5_000.0,
        unit: "USD".to_string(),
        factor: 0.4,
        factor_unit: "kg_co2e_per_usd".to_string(),
        scope3_category: Some(1),
        method: Some(MethodArg::Spend),
    };
    let result = calculate::calculate(&args, &Config::default()).unwrap();
    assert!(close(result.co2e_kg, 2_000.0));
}

#[test]
fn test_calculate_invalid_scope() {
    let args = CalculateArgs {
        scope: 4,
        category: "general".to_string(),
        amount: 1.0,
        unit: "kWh".to_string(),
        factor: 1.0,
        factor_unit: "kg_co2e_per_kwh".to_string(),
        scope3_category: None,
        method: None,
    };
    assert!(matches!(
        calculate::calculate(&args, &Config::default()),
        Err(CliError::Calc(CalcError::InvalidScope(4)))
    ));
}

#[test]
fn test_baseline_prediction_and_blending() {
    let mut args = BaselineArgs {
        revenue: 10_000_000.0,
        industry: Some("technology".to_string()),
        employees: None,
        energy_spend: None,
        area: None,
        region: None,
        history: Vec::new(),
    };

    let (prediction, outcome) = baseline::baseline(&args, &Config::default()).unwrap();
    assert!(prediction.total > 0.0);
    assert!(outcome.is_none());

    args.history = vec![10.0; 12];
    let (_, outcome) = baseline::baseline(&args, &Config::default()).unwrap();
    let outcome = outcome.unwrap();
    assert_eq!(outcome.method, BaselineMethod::HistoricalAverage);
    assert!(close(outcome.value, 120.0));
}
