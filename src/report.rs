//! Savings report generation.
//!
//! This module renders a [`CalculationResult`] for people: an input summary,
//! technical, financial and environmental analysis, and the methodology behind
//! the numbers. Export formats are Markdown, HTML, CSV and JSON.

use crate::calc::finance::HORIZON_YEARS;
use crate::calc::physics::UNINSULATED_U_VALUE;
use crate::calc::CalculationResult;
use crate::materials::MaterialQuote;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Output format of a savings report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportFormat {
    Markdown,
    Html,
    Csv,
    Json,
}

impl ReportFormat {
    /// Picks a format from a file extension.
    pub fn from_extension(path: &Path) -> Option<Self> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("md") | Some("txt") => Some(ReportFormat::Markdown),
            Some("html") => Some(ReportFormat::Html),
            Some("csv") => Some(ReportFormat::Csv),
            Some("json") => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Markdown => write!(f, "markdown"),
            ReportFormat::Html => write!(f, "html"),
            ReportFormat::Csv => write!(f, "csv"),
            ReportFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for ReportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            "html" => Ok(ReportFormat::Html),
            "csv" => Ok(ReportFormat::Csv),
            "json" => Ok(ReportFormat::Json),
            other => Err(ReportError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Error types for report rendering and export.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("unsupported report format: {0}")]
    UnsupportedFormat(String),

    #[error("unsupported file extension for {0}; use .md, .txt, .html, .csv or .json")]
    UnsupportedExtension(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// A savings report for a single calculation.
#[derive(Debug, Clone)]
pub struct SavingsReport<'a> {
    /// The calculation being reported
    pub result: &'a CalculationResult,
    /// Material quote the upgrade cost came from, if any
    pub quote: Option<&'a MaterialQuote>,
}

impl<'a> SavingsReport<'a> {
    pub fn new(result: &'a CalculationResult) -> Self {
        Self { result, quote: None }
    }

    pub fn with_quote(mut self, quote: &'a MaterialQuote) -> Self {
        self.quote = Some(quote);
        self
    }

    /// Payback for display, "never" for the sentinel.
    pub fn payback_string(&self) -> String {
        if self.result.never_pays_back() {
            "never".to_string()
        } else {
            format!("{:.2} years", self.result.payback_period)
        }
    }

    fn heating_source_label(&self) -> String {
        let mut label = String::new();
        for (i, word) in self.result.heating_source.split('_').enumerate() {
            if i > 0 {
                label.push(' ');
            }
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                label.extend(first.to_uppercase());
                label.push_str(chars.as_str());
            }
        }
        label
    }

    /// `(label, value)` rows of the input summary.
    fn input_rows(&self) -> Vec<(&'static str, String)> {
        let r = self.result;
        vec![
            ("Location", r.location.clone()),
            ("Roof Area", format!("{:.2} m²", r.roof_area)),
            ("Current R-value", format!("{:.2} m²·K/W", r.current_r_value)),
            ("Proposed R-value", format!("{:.2} m²·K/W", r.proposed_r_value)),
            ("Heating Source", self.heating_source_label()),
            ("Energy Price", format!("€{:.3}/kWh", r.energy_price_per_kwh)),
        ]
    }

    fn financial_rows(&self) -> Vec<(&'static str, String)> {
        let r = self.result;
        vec![
            ("Annual Cost Savings", format!("€{:.2}", r.annual_cost_savings)),
            ("Insulation Upgrade Cost", format!("€{:.2}", r.insulation_upgrade_cost)),
            ("Payback Period", self.payback_string()),
            ("10-Year Net Savings", format!("€{:.2}", r.ten_year_total_savings)),
        ]
    }

    fn environmental_rows(&self) -> Vec<(&'static str, String)> {
        let r = self.result;
        vec![
            (
                "Annual CO₂ Reduction",
                format!(
                    "{:.2} kg ({:.2} t)",
                    r.annual_co2_reduction,
                    r.annual_co2_reduction / 1000.0
                ),
            ),
            (
                "10-Year CO₂ Reduction",
                format!(
                    "{:.2} kg ({:.2} t)",
                    r.ten_year_co2_reduction,
                    r.ten_year_co2_reduction / 1000.0
                ),
            ),
        ]
    }

    /// Generates a Markdown report.
    pub fn to_markdown(&self) -> String {
        let r = self.result;
        let mut output = String::new();

        output.push_str("# Roof Insulation Savings Report\n\n");

        output.push_str("## Input Summary\n\n");
        output.push_str("| Parameter | Value |\n");
        output.push_str("|-----------|-------|\n");
        for (label, value) in self.input_rows() {
            output.push_str(&format!("| {} | {} |\n", label, value));
        }
        output.push('\n');

        if let Some(quote) = self.quote {
            output.push_str("## Material Quote\n\n");
            output.push_str("| Material | Surface | Thickness | Cost |\n");
            output.push_str("|----------|---------|-----------|------|\n");
            output.push_str(&format!(
                "| {} | {:.1} m² | {:.1} cm | €{:.2} |\n\n",
                quote.material_id,
                quote.surface_area,
                quote.thickness_m * 100.0,
                quote.total_cost
            ));
        }

        output.push_str("## Technical Analysis\n\n");
        output.push_str("| Metric | Current | Proposed | Change |\n");
        output.push_str("|--------|---------|----------|--------|\n");
        output.push_str(&format!(
            "| U-value (W/m²·K) | {:.4} | {:.4} | {:.1}% reduction |\n",
            r.current_u_value,
            r.proposed_u_value,
            r.u_value_reduction_percent()
        ));
        output.push_str(&format!(
            "| Annual Heat Loss (kWh) | {:.2} | {:.2} | {:.2} saved |\n",
            r.annual_heat_loss_current, r.annual_heat_loss_proposed, r.annual_energy_savings
        ));
        output.push('\n');

        output.push_str("## Financial Analysis\n\n");
        output.push_str("| Metric | Value |\n");
        output.push_str("|--------|-------|\n");
        for (label, value) in self.financial_rows() {
            output.push_str(&format!("| {} | {} |\n", label, value));
        }
        output.push('\n');

        output.push_str("## Environmental Impact\n\n");
        output.push_str("| Metric | Value |\n");
        output.push_str("|--------|-------|\n");
        for (label, value) in self.environmental_rows() {
            output.push_str(&format!("| {} | {} |\n", label, value));
        }
        output.push('\n');

        output.push_str("## Methodology\n\n");
        output.push_str(&format!(
            "- Heating degree days: {} K·day/year\n",
            r.heating_degree_days
        ));
        output.push_str(&format!(
            "- CO₂ intensity factor: {:.3} kg CO₂/kWh\n",
            r.co2_intensity_factor
        ));
        output.push_str(&format!(
            "- U = 1 / R (U = {:.1} W/m²·K for an uninsulated roof)\n",
            UNINSULATED_U_VALUE
        ));
        output.push_str("- Annual heat loss = U × A × HDD × 24 / 1000\n");
        output.push_str("- Payback = upgrade cost / annual cost savings\n");
        output.push_str(&format!(
            "- {}-year savings = annual cost savings × {} − upgrade cost\n",
            HORIZON_YEARS, HORIZON_YEARS
        ));

        output
    }

    /// Generates an HTML report.
    pub fn to_html(&self) -> String {
        let r = self.result;
        let mut html = String::new();

        html.push_str("<!DOCTYPE html>\n");
        html.push_str("<html>\n");
        html.push_str("<head>\n");
        html.push_str("  <meta charset=\"utf-8\">\n");
        html.push_str("  <title>Roof Insulation Savings Report</title>\n");
        html.push_str("  <style>\n");
        html.push_str("    body { font-family: Arial, sans-serif; margin: 40px; }\n");
        html.push_str("    h1 { color: #1a5490; }\n");
        html.push_str("    h2 { color: #1a5490; border-bottom: 1px solid #ddd; }\n");
        html.push_str(
            "    table { border-collapse: collapse; width: 100%; margin-bottom: 20px; }\n",
        );
        html.push_str("    th, td { border: 1px solid #ddd; padding: 8px; text-align: left; }\n");
        html.push_str("    th { background-color: #1a5490; color: white; }\n");
        html.push_str("    tr:nth-child(even) { background-color: #f9f9f9; }\n");
        html.push_str("    .positive { color: green; }\n");
        html.push_str("    .negative { color: red; }\n");
        html.push_str("  </style>\n");
        html.push_str("</head>\n");
        html.push_str("<body>\n");

        html.push_str("  <h1>Roof Insulation Savings Report</h1>\n");

        push_html_table(&mut html, "Input Summary", &self.input_rows());

        html.push_str("  <h2>Technical Analysis</h2>\n");
        html.push_str("  <table>\n");
        html.push_str(
            "    <tr><th>Metric</th><th>Current</th><th>Proposed</th><th>Change</th></tr>\n",
        );
        html.push_str(&format!(
            "    <tr><td>U-value (W/m²·K)</td><td>{:.4}</td><td>{:.4}</td><td>{:.1}% reduction</td></tr>\n",
            r.current_u_value,
            r.proposed_u_value,
            r.u_value_reduction_percent()
        ));
        html.push_str(&format!(
            "    <tr><td>Annual Heat Loss (kWh)</td><td>{:.2}</td><td>{:.2}</td><td>{:.2} saved</td></tr>\n",
            r.annual_heat_loss_current, r.annual_heat_loss_proposed, r.annual_energy_savings
        ));
        html.push_str("  </table>\n");

        push_html_table(&mut html, "Financial Analysis", &self.financial_rows());
        let net_class = if r.ten_year_total_savings >= 0.0 {
            "positive"
        } else {
            "negative"
        };
        html.push_str(&format!(
            "  <p class=\"{}\">Net result after {} years: €{:.2}</p>\n",
            net_class, HORIZON_YEARS, r.ten_year_total_savings
        ));

        push_html_table(&mut html, "Environmental Impact", &self.environmental_rows());

        html.push_str("</body>\n");
        html.push_str("</html>\n");

        html
    }

    /// Generates a CSV report with one `field,value` row per result field.
    pub fn to_csv(&self) -> String {
        let r = self.result;
        let mut csv = String::new();

        csv.push_str("field,value\n");
        csv.push_str(&format!("location,{}\n", r.location));
        csv.push_str(&format!("roof_area,{}\n", r.roof_area));
        csv.push_str(&format!("current_r_value,{}\n", r.current_r_value));
        csv.push_str(&format!("proposed_r_value,{}\n", r.proposed_r_value));
        csv.push_str(&format!("heating_source,{}\n", r.heating_source));
        csv.push_str(&format!("energy_price_per_kwh,{}\n", r.energy_price_per_kwh));
        csv.push_str(&format!("current_u_value,{}\n", r.current_u_value));
        csv.push_str(&format!("proposed_u_value,{}\n", r.proposed_u_value));
        csv.push_str(&format!("annual_heat_loss_current,{}\n", r.annual_heat_loss_current));
        csv.push_str(&format!("annual_heat_loss_proposed,{}\n", r.annual_heat_loss_proposed));
        csv.push_str(&format!("annual_energy_savings,{}\n", r.annual_energy_savings));
        csv.push_str(&format!("annual_cost_savings,{}\n", r.annual_cost_savings));
        csv.push_str(&format!("insulation_upgrade_cost,{}\n", r.insulation_upgrade_cost));
        csv.push_str(&format!("payback_period,{}\n", r.payback_period));
        csv.push_str(&format!("ten_year_total_savings,{}\n", r.ten_year_total_savings));
        csv.push_str(&format!("annual_co2_reduction,{}\n", r.annual_co2_reduction));
        csv.push_str(&format!("ten_year_co2_reduction,{}\n", r.ten_year_co2_reduction));
        csv.push_str(&format!("heating_degree_days,{}\n", r.heating_degree_days));
        csv.push_str(&format!("co2_intensity_factor,{}\n", r.co2_intensity_factor));

        csv
    }

    /// Generates pretty-printed JSON of the result record.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self.result)?)
    }

    /// Renders the report in the requested format.
    pub fn render(&self, format: ReportFormat) -> Result<String, ReportError> {
        match format {
            ReportFormat::Markdown => Ok(self.to_markdown()),
            ReportFormat::Html => Ok(self.to_html()),
            ReportFormat::Csv => Ok(self.to_csv()),
            ReportFormat::Json => self.to_json(),
        }
    }

    /// Saves the report to a file, choosing the format from the extension.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ReportError> {
        let path = path.as_ref();
        let format = ReportFormat::from_extension(path)
            .ok_or_else(|| ReportError::UnsupportedExtension(path.display().to_string()))?;
        std::fs::write(path, self.render(format)?)?;
        Ok(())
    }

    /// Prints a summary to stdout.
    pub fn print_summary(&self) {
        let r = self.result;
        println!("Savings Summary ({}, {}):", r.location, self.heating_source_label());
        println!("  Energy Saved: {:.2} kWh/year", r.annual_energy_savings);
        println!("  Cost Saved: €{:.2}/year", r.annual_cost_savings);
        println!("  Upgrade Cost: €{:.2}", r.insulation_upgrade_cost);
        println!("  Payback: {}", self.payback_string());
        println!("  10-Year Net: €{:.2}", r.ten_year_total_savings);
        println!("  CO₂ Avoided: {:.2} kg/year", r.annual_co2_reduction);
    }
}

fn push_html_table(html: &mut String, heading: &str, rows: &[(&'static str, String)]) {
    html.push_str(&format!("  <h2>{}</h2>\n", heading));
    html.push_str("  <table>\n");
    html.push_str("    <tr><th>Metric</th><th>Value</th></tr>\n");
    for (label, value) in rows {
        html.push_str(&format!("    <tr><td>{}</td><td>{}</td></tr>\n", label, value));
    }
    html.push_str("  </table>\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> CalculationResult {
        CalculationResult {
            location: "Vlaams".to_string(),
            roof_area: 100.0,
            current_r_value: 2.0,
            proposed_r_value: 6.0,
            heating_source: "heat_pump".to_string(),
            energy_price_per_kwh: 0.35,
            current_u_value: 0.5,
            proposed_u_value: 0.1667,
            annual_heat_loss_current: 3360.0,
            annual_heat_loss_proposed: 1120.0,
            annual_energy_savings: 2240.0,
            annual_cost_savings: 784.0,
            insulation_upgrade_cost: 4500.0,
            payback_period: 5.74,
            ten_year_total_savings: 3340.0,
            annual_co2_reduction: 123.2,
            ten_year_co2_reduction: 1232.0,
            heating_degree_days: 2800.0,
            co2_intensity_factor: 0.055,
        }
    }

    #[test]
    fn test_markdown_sections() {
        let result = sample_result();
        let markdown = SavingsReport::new(&result).to_markdown();
        assert!(markdown.contains("# Roof Insulation Savings Report"));
        assert!(markdown.contains("| Heating Source | Heat Pump |"));
        assert!(markdown.contains("| Energy Price | €0.350/kWh |"));
        assert!(markdown.contains("66.7% reduction"));
        assert!(markdown.contains("| Payback Period | 5.74 years |"));
        assert!(!markdown.contains("## Material Quote"));
    }

    #[test]
    fn test_markdown_with_quote() {
        let result = sample_result();
        let quote = MaterialQuote {
            material_id: "glass_wool".to_string(),
            surface_area: 125.0,
            thickness_m: 0.21,
            total_cost: 2187.5,
            target_r_value: 6.0,
        };
        let markdown = SavingsReport::new(&result).with_quote(&quote).to_markdown();
        assert!(markdown.contains("| glass_wool | 125.0 m² | 21.0 cm | €2187.50 |"));
    }

    #[test]
    fn test_sentinel_payback_renders_never() {
        let mut result = sample_result();
        result.payback_period = crate::calc::finance::NO_PAYBACK_YEARS;
        let report = SavingsReport::new(&result);
        assert_eq!(report.payback_string(), "never");
    }

    #[test]
    fn test_csv_has_every_field() {
        let result = sample_result();
        let csv = SavingsReport::new(&result).to_csv();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines[0], "field,value");
        assert_eq!(lines.len(), 20);
        assert!(csv.contains("proposed_u_value,0.1667\n"));
        assert!(csv.contains("payback_period,5.74\n"));
    }

    #[test]
    fn test_json_round_trips() {
        let result = sample_result();
        let json = SavingsReport::new(&result).to_json().unwrap();
        let parsed: CalculationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, result);
    }

    #[test]
    fn test_html_negative_net_class() {
        let mut result = sample_result();
        result.ten_year_total_savings = -1500.0;
        let html = SavingsReport::new(&result).to_html();
        assert!(html.contains("<p class=\"negative\">"));
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("md".parse::<ReportFormat>().unwrap(), ReportFormat::Markdown);
        assert_eq!("json".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert!(matches!(
            "pdf".parse::<ReportFormat>(),
            Err(ReportError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_save_to_file_by_extension() {
        let result = sample_result();
        let report = SavingsReport::new(&result);
        let dir = tempfile::tempdir().unwrap();

        let path = dir.path().join("report.csv");
        report.save_to_file(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("field,value"));

        let bad = dir.path().join("report.pdf");
        assert!(matches!(
            report.save_to_file(&bad),
            Err(ReportError::UnsupportedExtension(_))
        ));
    }
}
