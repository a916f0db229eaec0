//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use ghg_calc::BatchOutcome;
use ghg_domain::{BaselinePrediction, EmissionResult, NormalizationLog, Severity};
use ghg_pipeline::{BaselineOutcome, NormalizedDataset};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
    Table,
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Active output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format a normalized dataset: facilities, totals and the Scope 3 breakdown.
    pub fn format_normalized(&self, dataset: &NormalizedDataset) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(dataset)?),
            OutputFormat::Table => Ok(self.format_normalized_table(dataset)),
        }
    }

    fn format_normalized_table(&self, dataset: &NormalizedDataset) -> String {
        let inventory = &dataset.inventory;
        let mut sections = Vec::new();

        if let Some(name) = &dataset.company_name {
            let title = match dataset.reporting_year {
                Some(year) => format!("{} ({})", name, year),
                None => name.clone(),
            };
            sections.push(self.colorize(&title, "cyan"));
        }

        if inventory.facilities.is_empty() {
            sections.push(self.colorize("No facilities found.", "yellow"));
        } else {
            let mut builder = Builder::default();
            builder.push_record([
                "Facility", "Scope 1", "Scope 2 (loc)", "Scope 2 (mkt)", "Scope 3", "Total", "Tier", "Quality",
            ]);
            for f in &inventory.facilities {
                builder.push_record([
                    f.facility_id.clone(),
                    mark(f.scope_1, f.scope_1_estimated),
                    mark(f.scope_2_location, f.scope_2_estimated),
                    mark(f.scope_2_market, f.scope_2_estimated),
                    mark(f.scope_3, f.scope_3_estimated),
                    format!("{:.2}", f.total()),
                    f.tier.to_string(),
                    format!("{:.2}", f.quality_score),
                ]);
            }
            sections.push(styled(builder.build()));
        }

        let mut builder = Builder::default();
        builder.push_record(["Metric", "Value"]);
        builder.push_record(["Scope 1 (t CO2e)".to_string(), format!("{:.2}", inventory.scope_1_total)]);
        builder.push_record([
            "Scope 2 location-based".to_string(),
            format!("{:.2}", inventory.scope_2_location_total),
        ]);
        builder.push_record([
            "Scope 2 market-based".to_string(),
            format!("{:.2}", inventory.scope_2_market_total),
        ]);
        builder.push_record(["Scope 3".to_string(), format!("{:.2}", inventory.scope_3_total)]);
        builder.push_record(["Grand total".to_string(), format!("{:.2}", inventory.grand_total())]);
        builder.push_record(["Quality score".to_string(), format!("{:.2}", inventory.quality_score)]);
        builder.push_record([
            "Reporting completeness".to_string(),
            format!("{:.0}%", inventory.reporting_completeness * 100.0),
        ]);
        builder.push_record(["Estimated data".to_string(), format!("{:.0}%", inventory.estimated_data_pct)]);
        sections.push(styled(builder.build()));

        if !inventory.scope_3_breakdown.is_empty() || !inventory.exclusions.is_empty() {
            let mut builder = Builder::default();
            builder.push_record(["#", "Category", "t CO2e", "Notes"]);
            for (category, value) in &inventory.scope_3_breakdown {
                builder.push_record([
                    category.number().to_string(),
                    category.name(),
                    format!("{:.2}", value),
                    inventory.methodology.get(category).cloned().unwrap_or_default(),
                ]);
            }
            for (category, reason) in &inventory.exclusions {
                builder.push_record([
                    category.number().to_string(),
                    category.name(),
                    "excluded".to_string(),
                    reason.clone(),
                ]);
            }
            sections.push(styled(builder.build()));
        }

        if let Some(baseline) = &dataset.baseline {
            sections.push(self.info(&format!(
                "Baseline: {:.2} t CO2e ({}, {} months of data)",
                baseline.value, baseline.method, baseline.months_of_data
            )));
        }

        let summary = format!(
            "{} facilities normalized, {} warnings, {} errors",
            inventory.facilities.len(),
            dataset.warnings(),
            dataset.errors()
        );
        sections.push(if dataset.errors() > 0 {
            self.warning(&summary)
        } else {
            self.success(&summary)
        });

        sections.join("\n")
    }

    /// Format the normalization log.
    pub fn format_log(&self, log: &NormalizationLog) -> Result<String> {
        if let OutputFormat::Json = self.format {
            return Ok(serde_json::to_string_pretty(log)?);
        }

        if log.is_empty() {
            return Ok(self.colorize("Normalization log is empty.", "yellow"));
        }

        let mut builder = Builder::default();
        builder.push_record(["Severity", "Action", "Detail"]);
        for entry in log.iter() {
            let color = match entry.severity {
                Severity::Info => "blue",
                Severity::Warning => "yellow",
                Severity::Error => "red",
            };
            builder.push_record([
                self.colorize(entry.severity.as_str(), color),
                entry.action.clone(),
                entry.detail.clone(),
            ]);
        }
        Ok(styled(builder.build()))
    }

    /// Format a single calculation result.
    pub fn format_result(&self, result: &EmissionResult) -> Result<String> {
        if let OutputFormat::Json = self.format {
            return Ok(serde_json::to_string_pretty(result)?);
        }

        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        builder.push_record(["CO2e (kg)".to_string(), format!("{:.4}", result.co2e_kg)]);
        builder.push_record(["CO2e (t)".to_string(), format!("{:.6}", result.co2e_kg / 1000.0)]);
        for (gas, value) in [("CO2", result.co2_kg), ("CH4", result.ch4_kg), ("N2O", result.n2o_kg)] {
            if let Some(v) = value {
                builder.push_record([format!("{} (kg)", gas), format!("{:.4}", v)]);
            }
        }
        if let Some(pct) = result.uncertainty_pct {
            builder.push_record(["Uncertainty".to_string(), format!("±{:.1}%", pct)]);
        }
        builder.push_record(["Formula".to_string(), result.formula.clone()]);

        let mut lines = vec![styled(builder.build())];
        for assumption in &result.assumptions {
            lines.push(self.warning(&assumption.to_string()));
        }
        Ok(lines.join("\n"))
    }

    /// Format a batch outcome.
    pub fn format_batch(&self, outcome: &BatchOutcome) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let failures: Vec<serde_json::Value> = outcome
                    .failures
                    .iter()
                    .map(|f| {
                        serde_json::json!({
                            "index": f.index,
                            "facility_id": f.facility_id,
                            "error": f.error.to_string(),
                        })
                    })
                    .collect();
                let totals: serde_json::Map<String, serde_json::Value> = outcome
                    .totals_by_scope()
                    .into_iter()
                    .map(|(scope, kg)| (scope.to_string(), serde_json::json!(kg)))
                    .collect();
                Ok(serde_json::to_string_pretty(&serde_json::json!({
                    "results": outcome.results,
                    "failures": failures,
                    "totals_kg": totals,
                    "total_kg": outcome.total_kg(),
                }))?)
            }
            OutputFormat::Table => Ok(self.format_batch_table(outcome)),
        }
    }

    fn format_batch_table(&self, outcome: &BatchOutcome) -> String {
        let mut sections = Vec::new();

        if outcome.results.is_empty() {
            sections.push(self.colorize("No records calculated.", "yellow"));
        } else {
            let mut builder = Builder::default();
            builder.push_record(["Facility", "Scope", "Category", "Region", "kg CO2e", "Tier", "Factor source"]);
            for r in &outcome.results {
                let category = match r.scope_3_category {
                    Some(c) => format!("{} ({})", r.category, c.number()),
                    None => r.category.clone(),
                };
                builder.push_record([
                    r.facility_id.clone(),
                    r.scope.to_string(),
                    category,
                    r.region.clone(),
                    format!("{:.2}", r.result.co2e_kg),
                    r.tier.to_string(),
                    r.factor_source.clone(),
                ]);
            }
            sections.push(styled(builder.build()));
        }

        for failure in &outcome.failures {
            sections.push(self.error(&format!(
                "record {} ({}): {}",
                failure.index, failure.facility_id, failure.error
            )));
        }

        let summary = format!(
            "{} calculated, {} failed, {:.2} kg CO2e total",
            outcome.results.len(),
            outcome.failures.len(),
            outcome.total_kg()
        );
        sections.push(if outcome.is_complete() {
            self.success(&summary)
        } else {
            self.warning(&summary)
        });
        sections.join("\n")
    }

    /// Format a unit conversion.
    pub fn format_conversion(&self, value: f64, from: &str, converted: f64, to: &str) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "value": value,
                "from": from,
                "converted": converted,
                "to": to,
            }))?),
            OutputFormat::Table => Ok(format!("{} {} = {} {}", value, from, converted, to)),
        }
    }

    /// Format a baseline prediction and, when history was given, the blended outcome.
    pub fn format_baseline(
        &self,
        prediction: Option<&BaselinePrediction>,
        outcome: Option<&BaselineOutcome>,
    ) -> Result<String> {
        if let OutputFormat::Json = self.format {
            return Ok(serde_json::to_string_pretty(&serde_json::json!({
                "prediction": prediction,
                "baseline": outcome,
            }))?);
        }

        let mut sections = Vec::new();
        if let Some(p) = prediction {
            let mut builder = Builder::default();
            builder.push_record(["Field", "t CO2e"]);
            builder.push_record(["Total".to_string(), format!("{:.2}", p.total)]);
            builder.push_record(["Scope 1".to_string(), format!("{:.2}", p.scope_1)]);
            builder.push_record(["Scope 2".to_string(), format!("{:.2}", p.scope_2)]);
            builder.push_record(["Scope 3".to_string(), format!("{:.2}", p.scope_3)]);
            builder.push_record([
                "Interval".to_string(),
                format!("[{:.2}, {:.2}]", p.interval.lower, p.interval.upper),
            ]);
            builder.push_record(["Uncertainty".to_string(), format!("{:.1}%", p.uncertainty_pct)]);
            sections.push(styled(builder.build()));
            sections.push(self.info(&p.method));
        }

        if let Some(o) = outcome {
            sections.push(self.success(&format!(
                "Baseline: {:.2} t CO2e ({}, {} months of data)",
                o.value, o.method, o.months_of_data
            )));
            sections.push(o.annotation.clone());
        }

        if sections.is_empty() {
            return Ok(self.colorize("No baseline available.", "yellow"));
        }
        Ok(sections.join("\n"))
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Two decimals, with a trailing `*` on estimated values.
fn mark(value: f64, estimated: bool) -> String {
    if estimated {
        format!("{:.2}*", value)
    } else {
        format!("{:.2}", value)
    }
}

fn styled(mut table: Table) -> String {
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghg_domain::Interval;
    use ghg_pipeline::{NormalizationPipeline, RawDataset};

    fn normalized() -> NormalizedDataset {
        let raw = RawDataset::from_json(
            r#"{
                "company_name": "Acme",
                "facilities": [
                    {"facility_id": "F1", "scope_1": 10.0, "scope_2": 20.0, "scope_3": 5.0},
                    {"facility_id": "F2"}
                ]
            }"#,
        )
        .unwrap();
        NormalizationPipeline::default().run(&raw).unwrap()
    }

    #[test]
    fn test_json_format() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_normalized(&normalized()).unwrap();
        assert!(output.contains("\"inventory\""));
        assert!(output.contains("\"normalization_log\""));
    }

    #[test]
    fn test_table_format() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_normalized(&normalized()).unwrap();
        assert!(output.contains("Acme"));
        assert!(output.contains("Facility"));
        assert!(output.contains("Grand total"));
        // F2 had nothing reported, so its values are estimates
        assert!(output.contains("0.00*"));
    }

    #[test]
    fn test_empty_log() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_log(&NormalizationLog::new()).unwrap();
        assert!(output.contains("empty"));
    }

    #[test]
    fn test_result_lists_assumptions() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let result = EmissionResult::new(12.5, "12.5 kg").with_assumption(ghg_domain::Assumption::MassUnit {
            unit: "stone".to_string(),
        });
        let output = formatter.format_result(&result).unwrap();
        assert!(output.contains("12.5000"));
        assert!(output.contains("⚠ assumed 'stone' is kg"));
    }

    #[test]
    fn test_conversion_output() {
        let table = Formatter::new(OutputFormat::Table, false);
        assert_eq!(table.format_conversion(1.0, "MWh", 1000.0, "kWh").unwrap(), "1 MWh = 1000 kWh");

        let json = Formatter::new(OutputFormat::Json, false);
        let value: serde_json::Value =
            serde_json::from_str(&json.format_conversion(1.0, "MWh", 1000.0, "kWh").unwrap()).unwrap();
        assert_eq!(value["converted"], 1000.0);
    }

    #[test]
    fn test_baseline_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let prediction = BaselinePrediction {
            total: 100.0,
            scope_1: 10.0,
            scope_2: 40.0,
            scope_3: 50.0,
            interval: Interval::new(80.0, 120.0),
            uncertainty_pct: 40.0,
            method: "test model".to_string(),
        };
        let output = formatter.format_baseline(Some(&prediction), None).unwrap();
        assert!(output.contains("[80.00, 120.00]"));
        assert!(output.contains("ℹ test model"));

        assert!(formatter.format_baseline(None, None).unwrap().contains("No baseline"));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
        assert_eq!(formatter.warning("test"), "⚠ test");
    }
}
